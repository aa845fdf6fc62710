/// Edge-function coverage walkers
/// Two interchangeable arithmetic strategies decide which pixels a screen
/// triangle covers under the top-left fill rule and hand normalized
/// barycentric weights to the caller's plot callback
use glam::Vec2;

/// Fill-rule bias for the floating-point walker, one unit of the same 1/256
/// subpixel grid the fixed-point walker snaps to. f32::EPSILON would vanish
/// against edge values of typical magnitude, leaving ties unbroken.
pub const FLOAT_EDGE_BIAS: f32 = 1.0 / 256.0;

/// Subpixel scale of the fixed-point walker (24.8).
const FIXED_ONE: i64 = 256;

/// Arithmetic strategy for the coverage test, selected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePrecision {
    /// f32 edge functions with an epsilon fill-rule bias.
    Float,
    /// 24.8 fixed point with an exact one-unit bias; tie-breaking on shared
    /// edges is bit-reproducible.
    Fixed,
}

/// Inclusive pixel rectangle a walker may visit. Already clamped to the
/// target buffers by the caller.
#[derive(Debug, Clone, Copy)]
pub struct PixelRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

/// Signed, doubled triangle area; positive for front-facing screen triangles.
#[inline]
pub fn edge_function(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Top-left classification of the directed edge a -> b in y-down screen
/// space: a top edge is horizontal pointing right, a left edge points
/// upward. Pixels exactly on any other edge are given to the neighbor.
#[inline]
fn is_top_left_f32(a: Vec2, b: Vec2) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dy == 0.0 && dx > 0.0) || dy < 0.0
}

#[inline]
fn is_top_left_i64(ax: i64, ay: i64, bx: i64, by: i64) -> bool {
    let dx = bx - ax;
    let dy = by - ay;
    (dy == 0 && dx > 0) || dy < 0
}

/// Visits every pixel a triangle covers. Implementations must agree on the
/// fill rule so strategies can be swapped without changing coverage away
/// from shared-edge ties.
pub trait EdgeWalker {
    /// Walk `bounds` and call `plot(x, y, alpha, beta, gamma)` for each
    /// covered pixel center, with weights normalized to sum to one.
    /// Returns false without plotting when the triangle area is not
    /// positive (degenerate or back-facing input).
    fn walk<F: FnMut(i32, i32, f32, f32, f32)>(v: [Vec2; 3], bounds: PixelRect, plot: F) -> bool;
}

/// f32 edge walker. Fast default; ties on shared edges are broken at 1/256
/// granularity, which can differ from the exact result when accumulated
/// rounding exceeds the bias.
pub struct FloatEdges;

impl EdgeWalker for FloatEdges {
    fn walk<F: FnMut(i32, i32, f32, f32, f32)>(
        v: [Vec2; 3],
        bounds: PixelRect,
        mut plot: F,
    ) -> bool {
        let area = edge_function(v[0], v[1], v[2]);
        if !(area > 0.0) {
            return false;
        }
        let inv_area = 1.0 / area;

        // Edge i runs opposite vertex i: e0 spans (v1, v2) and weights v0.
        // Per-pixel steps: d/dx edge(a, b, p) = a.y - b.y, d/dy = b.x - a.x.
        let e0_dx = v[1].y - v[2].y;
        let e0_dy = v[2].x - v[1].x;
        let e1_dx = v[2].y - v[0].y;
        let e1_dy = v[0].x - v[2].x;
        let e2_dx = v[0].y - v[1].y;
        let e2_dy = v[1].x - v[0].x;

        // A pixel on a non-top-left edge (value 0) must fail the test.
        let t0 = if is_top_left_f32(v[1], v[2]) { 0.0 } else { FLOAT_EDGE_BIAS };
        let t1 = if is_top_left_f32(v[2], v[0]) { 0.0 } else { FLOAT_EDGE_BIAS };
        let t2 = if is_top_left_f32(v[0], v[1]) { 0.0 } else { FLOAT_EDGE_BIAS };

        // Evaluate the three edges once at the top-left pixel center, then
        // step incrementally across the rectangle.
        let p_start = Vec2::new(bounds.min_x as f32 + 0.5, bounds.min_y as f32 + 0.5);
        let mut e0_row = edge_function(v[1], v[2], p_start);
        let mut e1_row = edge_function(v[2], v[0], p_start);
        let mut e2_row = edge_function(v[0], v[1], p_start);

        for y in bounds.min_y..=bounds.max_y {
            let mut e0 = e0_row;
            let mut e1 = e1_row;
            let mut e2 = e2_row;

            for x in bounds.min_x..=bounds.max_x {
                if e0 >= t0 && e1 >= t1 && e2 >= t2 {
                    plot(x, y, e0 * inv_area, e1 * inv_area, e2 * inv_area);
                }
                e0 += e0_dx;
                e1 += e1_dx;
                e2 += e2_dx;
            }

            e0_row += e0_dy;
            e1_row += e1_dy;
            e2_row += e2_dy;
        }

        true
    }
}

/// 24.8 fixed-point edge walker. Coordinates snap to the subpixel grid and
/// all edge arithmetic is exact in i64, so two triangles sharing an edge
/// make bit-identical tie decisions regardless of vertex order.
pub struct FixedPointEdges;

#[inline]
fn snap(v: f32) -> i64 {
    (v * FIXED_ONE as f32).round() as i64
}

#[inline]
fn edge_function_i64(ax: i64, ay: i64, bx: i64, by: i64, px: i64, py: i64) -> i64 {
    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}

impl EdgeWalker for FixedPointEdges {
    fn walk<F: FnMut(i32, i32, f32, f32, f32)>(
        v: [Vec2; 3],
        bounds: PixelRect,
        mut plot: F,
    ) -> bool {
        let x0 = snap(v[0].x);
        let y0 = snap(v[0].y);
        let x1 = snap(v[1].x);
        let y1 = snap(v[1].y);
        let x2 = snap(v[2].x);
        let y2 = snap(v[2].y);

        // NaN snaps to 0 and collapses the area, rejecting the triangle.
        let area = edge_function_i64(x0, y0, x1, y1, x2, y2);
        if area <= 0 {
            return false;
        }
        let inv_area = 1.0 / area as f32;

        // One pixel step is FIXED_ONE subpixel units.
        let e0_dx = (y1 - y2) * FIXED_ONE;
        let e0_dy = (x2 - x1) * FIXED_ONE;
        let e1_dx = (y2 - y0) * FIXED_ONE;
        let e1_dy = (x0 - x2) * FIXED_ONE;
        let e2_dx = (y0 - y1) * FIXED_ONE;
        let e2_dy = (x1 - x0) * FIXED_ONE;

        // Bias of exactly one fixed-point unit on non-top-left edges.
        let t0 = if is_top_left_i64(x1, y1, x2, y2) { 0 } else { 1 };
        let t1 = if is_top_left_i64(x2, y2, x0, y0) { 0 } else { 1 };
        let t2 = if is_top_left_i64(x0, y0, x1, y1) { 0 } else { 1 };

        let px = bounds.min_x as i64 * FIXED_ONE + FIXED_ONE / 2;
        let py = bounds.min_y as i64 * FIXED_ONE + FIXED_ONE / 2;
        let mut e0_row = edge_function_i64(x1, y1, x2, y2, px, py);
        let mut e1_row = edge_function_i64(x2, y2, x0, y0, px, py);
        let mut e2_row = edge_function_i64(x0, y0, x1, y1, px, py);

        for y in bounds.min_y..=bounds.max_y {
            let mut e0 = e0_row;
            let mut e1 = e1_row;
            let mut e2 = e2_row;

            for x in bounds.min_x..=bounds.max_x {
                if e0 >= t0 && e1 >= t1 && e2 >= t2 {
                    plot(
                        x,
                        y,
                        e0 as f32 * inv_area,
                        e1 as f32 * inv_area,
                        e2 as f32 * inv_area,
                    );
                }
                e0 += e0_dx;
                e1 += e1_dx;
                e2 += e2_dx;
            }

            e0_row += e0_dy;
            e1_row += e1_dy;
            e2_row += e2_dy;
        }

        true
    }
}
