/// Per-pixel depth storage for visibility resolution
/// One f32 per pixel, cleared to the far sentinel each frame
use crate::count_call;
use crate::perf::FUNCTION_COUNTERS;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{_mm256_set1_ps, _mm256_storeu_ps, _mm_set1_ps, _mm_storeu_ps};

/// Depth value of an untouched pixel. Every drawn surface maps to a smaller
/// value (depth = 1 - 1/w with w >= near), so the first write always passes.
pub const CLEAR_DEPTH: f32 = 1.0;

pub struct DepthBuffer {
    pub width: usize,
    pub height: usize,
    data: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![CLEAR_DEPTH; width * height],
        }
    }

    /// Reset every cell to the far sentinel.
    pub fn clear(&mut self) {
        count_call!(FUNCTION_COUNTERS.depth_clear_calls);

        #[cfg(target_arch = "x86_64")]
        {
            // Prefer AVX (8 lanes per store) when available,
            // otherwise fall back to SSE2 (4 lanes per store).
            if std::arch::is_x86_feature_detected!("avx") {
                unsafe {
                    return self.clear_simd_avx();
                }
            }
            if std::arch::is_x86_feature_detected!("sse2") {
                unsafe {
                    return self.clear_simd_sse2();
                }
            }
        }

        // Generic scalar fallback for non-x86_64 or CPUs without SIMD.
        self.data.fill(CLEAR_DEPTH);
    }

    #[cfg(target_arch = "x86_64")]
    #[target_feature(enable = "sse2")]
    unsafe fn clear_simd_sse2(&mut self) {
        let len = self.data.len();
        let mut i = 0usize;
        let clear_vec = _mm_set1_ps(CLEAR_DEPTH);
        while i + 4 <= len {
            let ptr = self.data.as_mut_ptr().add(i);
            _mm_storeu_ps(ptr, clear_vec);
            i += 4;
        }
        for j in i..len {
            self.data[j] = CLEAR_DEPTH;
        }
    }

    #[cfg(target_arch = "x86_64")]
    #[target_feature(enable = "avx")]
    unsafe fn clear_simd_avx(&mut self) {
        let len = self.data.len();
        let mut i = 0usize;
        let clear_vec = _mm256_set1_ps(CLEAR_DEPTH);
        while i + 8 <= len {
            let ptr = self.data.as_mut_ptr().add(i);
            _mm256_storeu_ps(ptr, clear_vec);
            i += 8;
        }
        for j in i..len {
            self.data[j] = CLEAR_DEPTH;
        }
    }

    /// Stored depth at (x, y). Out-of-range coordinates read as the sentinel.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return CLEAR_DEPTH;
        }
        self.data[y as usize * self.width + x as usize]
    }

    /// Store depth at (x, y). Out-of-range coordinates are a no-op.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.data[y as usize * self.width + x as usize] = value;
    }

    /// Depth test and conditional store for in-bounds pixels.
    /// Returns true (and records the new depth) when `depth` is nearer than
    /// the stored value. Callers clamp their bounding box to the buffer
    /// dimensions first, so this skips the per-axis range checks.
    #[inline]
    pub fn test_and_set(&mut self, x: usize, y: usize, depth: f32) -> bool {
        let index = y * self.width + x;
        if depth < self.data[index] {
            self.data[index] = depth;
            true
        } else {
            false
        }
    }

    /// Resize to a new output resolution. Contents are undefined until the
    /// next `clear`.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.data.resize(width * height, CLEAR_DEPTH);
    }
}
