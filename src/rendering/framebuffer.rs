/// Color target for software rendering
///
/// Memory layout optimized for cache efficiency:
/// - Hot metadata (width, height) stored first for bounds checking
/// - Pixels are a single contiguous Vec<u32> in ARGB order, the layout
///   the presentation surface consumes without conversion
use crate::count_call;
use crate::perf::FUNCTION_COUNTERS;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{_mm256_set1_epi32, _mm256_storeu_si256, _mm_set1_epi32, _mm_storeu_si128};

pub struct Framebuffer {
    // Hot data: used for every bounds check and index calculation
    pub width: usize,
    pub height: usize,
    pub color_buffer: Vec<u32>, // ARGB format
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            color_buffer: vec![0; width * height],
        }
    }

    /// Clear the color buffer to a solid color
    pub fn clear(&mut self, clear_color: u32) {
        count_call!(FUNCTION_COUNTERS.framebuffer_clear_calls);

        #[cfg(target_arch = "x86_64")]
        {
            // Prefer AVX (8 pixels per iteration) when available,
            // otherwise fall back to SSE2 (4 pixels per iteration).
            if std::arch::is_x86_feature_detected!("avx") {
                unsafe {
                    return self.clear_simd_avx(clear_color);
                }
            }
            if std::arch::is_x86_feature_detected!("sse2") {
                unsafe {
                    return self.clear_simd_sse2(clear_color);
                }
            }
        }

        // Generic scalar fallback for non-x86_64 or CPUs without SIMD.
        self.color_buffer.fill(clear_color);
    }

    /// SIMD-accelerated clear for x86_64 with SSE2.
    /// Clears 4 pixels per iteration using vector stores.
    #[cfg(target_arch = "x86_64")]
    #[target_feature(enable = "sse2")]
    unsafe fn clear_simd_sse2(&mut self, clear_color: u32) {
        let len = self.color_buffer.len();

        let mut i = 0usize;
        let color_vec = _mm_set1_epi32(clear_color as i32);
        while i + 4 <= len {
            let ptr = self.color_buffer.as_mut_ptr().add(i) as *mut _;
            _mm_storeu_si128(ptr, color_vec);
            i += 4;
        }
        // Tail
        for j in i..len {
            self.color_buffer[j] = clear_color;
        }
    }

    /// SIMD-accelerated clear for x86_64 with AVX.
    /// Clears 8 pixels per iteration using 256-bit vector stores.
    #[cfg(target_arch = "x86_64")]
    #[target_feature(enable = "avx")]
    unsafe fn clear_simd_avx(&mut self, clear_color: u32) {
        let len = self.color_buffer.len();

        let mut i = 0usize;
        let color_vec = _mm256_set1_epi32(clear_color as i32);
        while i + 8 <= len {
            let ptr = self.color_buffer.as_mut_ptr().add(i) as *mut _;
            _mm256_storeu_si256(ptr, color_vec);
            i += 8;
        }
        // Tail
        for j in i..len {
            self.color_buffer[j] = clear_color;
        }
    }

    /// Write one pixel. Out-of-range coordinates are silently ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.color_buffer[y * self.width + x] = color;
        }
    }

    /// Read one pixel. Out-of-range coordinates read as 0.
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> u32 {
        if x < self.width && y < self.height {
            self.color_buffer[y * self.width + x]
        } else {
            0
        }
    }

    /// Write one pixel without bounds checking.
    /// Callers must guarantee x,y are within the framebuffer.
    #[inline]
    pub unsafe fn set_pixel_unchecked(&mut self, x: usize, y: usize, color: u32) {
        *self.color_buffer.get_unchecked_mut(y * self.width + x) = color;
    }

    /// Get color buffer as slice (for presenting)
    pub fn color_buffer_slice(&self) -> &[u32] {
        &self.color_buffer
    }

    /// Resize to a new output resolution
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.color_buffer.resize(width * height, 0);
    }
}

/// Convert RGB to ARGB u32
#[inline]
pub const fn rgb_to_u32(r: u8, g: u8, b: u8) -> u32 {
    0xFF000000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}
