/// Triangle rasterization pipeline
/// Perspective-correct attribute interpolation over a pluggable
/// edge-walking core, with view-space clipping against the camera frustum
use glam::{Vec2, Vec4};

use super::clipping::{clip_triangle, ClipVertex};
use super::depth::DepthBuffer;
use super::edge::{
    edge_function, EdgePrecision, EdgeWalker, FixedPointEdges, FloatEdges, PixelRect,
};
use super::framebuffer::{rgb_to_u32, Framebuffer};
use super::texture::Texture;
use crate::camera::Camera;
use crate::perf::FUNCTION_COUNTERS;
use crate::scene::light::{apply_intensity, DirectionalLight};
use crate::scene::mesh::Mesh;
use crate::{count_add, count_call};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Wireframe,
    Filled,
    Textured,
}

/// What a filled pixel reads its base color from.
#[derive(Clone, Copy)]
enum FillSource<'a> {
    Textured(&'a Texture),
    Solid(u32),
}

pub struct Rasterizer {
    pub mode: RenderMode,
    pub precision: EdgePrecision,
    pub backface_culling: bool,
    /// If false, skip per-vertex lighting and render geometry at full
    /// brightness.
    pub enable_lighting: bool,
    /// Solid color for `RenderMode::Filled`.
    pub fill_color: u32,
    /// Line color for `RenderMode::Wireframe`.
    pub wire_color: u32,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            mode: RenderMode::Textured,
            precision: EdgePrecision::Float,
            backface_culling: true,
            enable_lighting: true,
            fill_color: rgb_to_u32(200, 200, 200),
            wire_color: rgb_to_u32(0, 255, 0),
        }
    }

    /// Render a mesh through the full pipeline: model and view transform,
    /// view-space backface culling, frustum clipping, projection and
    /// per-triangle rasterization in the configured mode.
    pub fn render_mesh(
        &self,
        mesh: &Mesh,
        texture: &Texture,
        camera: &Camera,
        light: &DirectionalLight,
        framebuffer: &mut Framebuffer,
        depth_buffer: &mut DepthBuffer,
    ) {
        if mesh.faces.is_empty() {
            return;
        }

        let frustum = camera.frustum();
        let projection = camera.projection_matrix();
        let model = mesh.model_matrix();
        let model_view = camera.view_matrix() * model;
        let fb_width = framebuffer.width as f32;
        let fb_height = framebuffer.height as f32;

        for face in &mesh.faces {
            count_call!(FUNCTION_COUNTERS.total_triangles_processed);

            let view_pos = [
                model_view.transform_point3(mesh.positions[face.vertices[0]]),
                model_view.transform_point3(mesh.positions[face.vertices[1]]),
                model_view.transform_point3(mesh.positions[face.vertices[2]]),
            ];

            // A back face's geometric normal points along the eye ray
            // through any of its vertices.
            if self.backface_culling {
                let normal = (view_pos[1] - view_pos[0]).cross(view_pos[2] - view_pos[0]);
                if normal.dot(view_pos[0]) >= 0.0 {
                    count_call!(FUNCTION_COUNTERS.triangles_culled_backface);
                    continue;
                }
            }

            let corner = |k: usize| {
                let uv = mesh.uvs[face.uvs[k]];
                let intensity = if self.enable_lighting {
                    let normal = model
                        .transform_vector3(mesh.normals[face.normals[k]])
                        .normalize_or_zero();
                    light.intensity(normal)
                } else {
                    1.0
                };
                ClipVertex::new(view_pos[k], uv, intensity)
            };
            let tri = [corner(0), corner(1), corner(2)];

            let (tri_count, clipped) = clip_triangle(&frustum, &tri);
            if tri_count == 0 {
                count_call!(FUNCTION_COUNTERS.triangles_clipped_away);
                continue;
            }
            count_add!(FUNCTION_COUNTERS.clip_output_triangles, tri_count as u64);

            for t in clipped.iter().take(tri_count) {
                let mut vertices = [Vec4::ZERO; 3];
                let mut uvs = [Vec2::ZERO; 3];
                let mut intensities = [0.0f32; 3];

                for (k, cv) in t.iter().enumerate() {
                    // Clipping guarantees view z >= near, so clip w is
                    // positive and the divide is safe.
                    let clip = projection * cv.position.extend(1.0);
                    let ndc = clip.truncate() / clip.w;
                    let screen = Self::ndc_to_screen(Vec2::new(ndc.x, ndc.y), fb_width, fb_height);
                    vertices[k] = Vec4::new(screen.x, screen.y, ndc.z, clip.w);
                    uvs[k] = cv.uv;
                    intensities[k] = cv.intensity;
                }

                match self.mode {
                    RenderMode::Wireframe => {
                        self.draw_wireframe_triangle(framebuffer, &vertices, self.wire_color);
                    }
                    RenderMode::Filled => {
                        self.draw_filled_triangle(
                            framebuffer,
                            depth_buffer,
                            &vertices,
                            &intensities,
                            self.fill_color,
                        );
                    }
                    RenderMode::Textured => {
                        self.draw_textured_triangle(
                            framebuffer,
                            depth_buffer,
                            &vertices,
                            &uvs,
                            &intensities,
                            texture,
                        );
                    }
                }
            }
        }
    }

    /// Fill a screen-space triangle with perspective-correct texture
    /// sampling. `vertices` hold screen x/y, NDC z and the view-space
    /// depth in w. Returns true when at least one pixel passed the depth
    /// test.
    pub fn draw_textured_triangle(
        &self,
        framebuffer: &mut Framebuffer,
        depth_buffer: &mut DepthBuffer,
        vertices: &[Vec4; 3],
        uvs: &[Vec2; 3],
        intensities: &[f32; 3],
        texture: &Texture,
    ) -> bool {
        count_call!(FUNCTION_COUNTERS.render_triangle_calls);
        self.dispatch_fill(
            framebuffer,
            depth_buffer,
            vertices,
            uvs,
            intensities,
            FillSource::Textured(texture),
        )
    }

    /// Fill a screen-space triangle with a solid color modulated by the
    /// interpolated vertex intensity.
    pub fn draw_filled_triangle(
        &self,
        framebuffer: &mut Framebuffer,
        depth_buffer: &mut DepthBuffer,
        vertices: &[Vec4; 3],
        intensities: &[f32; 3],
        color: u32,
    ) -> bool {
        count_call!(FUNCTION_COUNTERS.render_triangle_calls);
        self.dispatch_fill(
            framebuffer,
            depth_buffer,
            vertices,
            &[Vec2::ZERO; 3],
            intensities,
            FillSource::Solid(color),
        )
    }

    /// Draw triangle edges with DDA lines. Wireframe ignores the depth
    /// buffer so hidden edges stay visible.
    pub fn draw_wireframe_triangle(
        &self,
        framebuffer: &mut Framebuffer,
        vertices: &[Vec4; 3],
        color: u32,
    ) {
        count_call!(FUNCTION_COUNTERS.render_triangle_calls);
        let a = Vec2::new(vertices[0].x, vertices[0].y);
        let b = Vec2::new(vertices[1].x, vertices[1].y);
        let c = Vec2::new(vertices[2].x, vertices[2].y);
        Self::draw_line(framebuffer, a, b, color);
        Self::draw_line(framebuffer, b, c, color);
        Self::draw_line(framebuffer, c, a, color);
    }

    /// Single dispatch point for the configured edge arithmetic.
    fn dispatch_fill(
        &self,
        framebuffer: &mut Framebuffer,
        depth_buffer: &mut DepthBuffer,
        vertices: &[Vec4; 3],
        uvs: &[Vec2; 3],
        intensities: &[f32; 3],
        source: FillSource<'_>,
    ) -> bool {
        match self.precision {
            EdgePrecision::Float => Self::fill_triangle::<FloatEdges>(
                framebuffer,
                depth_buffer,
                vertices,
                uvs,
                intensities,
                source,
                self.enable_lighting,
            ),
            EdgePrecision::Fixed => Self::fill_triangle::<FixedPointEdges>(
                framebuffer,
                depth_buffer,
                vertices,
                uvs,
                intensities,
                source,
                self.enable_lighting,
            ),
        }
    }

    fn fill_triangle<W: EdgeWalker>(
        framebuffer: &mut Framebuffer,
        depth_buffer: &mut DepthBuffer,
        vertices: &[Vec4; 3],
        uvs: &[Vec2; 3],
        intensities: &[f32; 3],
        source: FillSource<'_>,
        lighting: bool,
    ) -> bool {
        debug_assert!(
            vertices.iter().all(|v| v.w > 0.0),
            "fill requires near-clipped vertices, got w = {:?}",
            [vertices[0].w, vertices[1].w, vertices[2].w]
        );
        debug_assert!(
            framebuffer.width == depth_buffer.width && framebuffer.height == depth_buffer.height,
            "color and depth targets must match: {}x{} vs {}x{}",
            framebuffer.width,
            framebuffer.height,
            depth_buffer.width,
            depth_buffer.height
        );

        let mut v = *vertices;
        let mut uv = *uvs;
        let mut li = *intensities;

        // The fill rule is defined for positively wound triangles. With
        // culling disabled, back faces arrive mirror-wound and are
        // reoriented instead of dropped.
        let xy = |p: Vec4| Vec2::new(p.x, p.y);
        if edge_function(xy(v[0]), xy(v[1]), xy(v[2])) < 0.0 {
            v.swap(1, 2);
            uv.swap(1, 2);
            li.swap(1, 2);
        }
        let p = [xy(v[0]), xy(v[1]), xy(v[2])];

        // Bounding box clamped to the framebuffer.
        let mut min_x = p[0].x.min(p[1].x).min(p[2].x).floor() as i32;
        let mut max_x = p[0].x.max(p[1].x).max(p[2].x).ceil() as i32;
        let mut min_y = p[0].y.min(p[1].y).min(p[2].y).floor() as i32;
        let mut max_y = p[0].y.max(p[1].y).max(p[2].y).ceil() as i32;

        min_x = min_x.max(0);
        max_x = max_x.min(framebuffer.width as i32 - 1);
        min_y = min_y.max(0);
        max_y = max_y.min(framebuffer.height as i32 - 1);

        if min_x > max_x || min_y > max_y {
            return false;
        }

        count_add!(
            FUNCTION_COUNTERS.total_pixels_tested,
            (max_x - min_x + 1) as u64 * (max_y - min_y + 1) as u64
        );

        let inv_w = [1.0 / v[0].w, 1.0 / v[1].w, 1.0 / v[2].w];
        let u_over_w = [
            uv[0].x * inv_w[0],
            uv[1].x * inv_w[1],
            uv[2].x * inv_w[2],
        ];
        let v_over_w = [
            uv[0].y * inv_w[0],
            uv[1].y * inv_w[1],
            uv[2].y * inv_w[2],
        ];
        let i_over_w = [
            li[0] * inv_w[0],
            li[1] * inv_w[1],
            li[2] * inv_w[2],
        ];

        let bounds = PixelRect {
            min_x,
            min_y,
            max_x,
            max_y,
        };

        let mut any_drawn = false;
        let walked = W::walk(p, bounds, |x, y, alpha, beta, gamma| {
            count_call!(FUNCTION_COUNTERS.pixels_covered);

            // Interpolating 1/w is linear in screen space; depth keeps
            // the near-to-far ordering of view z.
            let inv_w_interp = alpha * inv_w[0] + beta * inv_w[1] + gamma * inv_w[2];
            let depth = 1.0 - inv_w_interp;

            if depth_buffer.test_and_set(x as usize, y as usize, depth) {
                count_call!(FUNCTION_COUNTERS.depth_test_passed);

                let base = match source {
                    FillSource::Textured(tex) => {
                        let u = (alpha * u_over_w[0] + beta * u_over_w[1] + gamma * u_over_w[2])
                            / inv_w_interp;
                        let vv = (alpha * v_over_w[0] + beta * v_over_w[1] + gamma * v_over_w[2])
                            / inv_w_interp;
                        tex.sample(u, vv)
                    }
                    FillSource::Solid(color) => color,
                };

                let color = if lighting {
                    let intensity = (alpha * i_over_w[0]
                        + beta * i_over_w[1]
                        + gamma * i_over_w[2])
                        / inv_w_interp;
                    apply_intensity(base, intensity)
                } else {
                    base
                };

                framebuffer.set_pixel(x as usize, y as usize, color);
                any_drawn = true;
            } else {
                count_call!(FUNCTION_COUNTERS.depth_test_failed);
            }
        });

        if !walked {
            count_call!(FUNCTION_COUNTERS.triangles_degenerate);
        }
        any_drawn
    }

    /// DDA line draw stepping along the longer axis.
    fn draw_line(framebuffer: &mut Framebuffer, from: Vec2, to: Vec2, color: u32) {
        let delta = to - from;
        let side_length = delta.x.abs().max(delta.y.abs()).round();
        if !side_length.is_finite() {
            return;
        }
        if side_length < 1.0 {
            Self::plot(framebuffer, from.x.round() as i32, from.y.round() as i32, color);
            return;
        }

        let inc = delta / side_length;
        let mut current = from;
        for _ in 0..=side_length as i32 {
            Self::plot(
                framebuffer,
                current.x.round() as i32,
                current.y.round() as i32,
                color,
            );
            current += inc;
        }
    }

    #[inline]
    fn plot(framebuffer: &mut Framebuffer, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 {
            framebuffer.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Map NDC to pixel coordinates, flipping y so screen y grows
    /// downward.
    fn ndc_to_screen(ndc: Vec2, width: f32, height: f32) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * width,
            (1.0 - ndc.y) * 0.5 * height,
        )
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}
