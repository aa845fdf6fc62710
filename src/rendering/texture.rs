/// Texture storage and nearest-neighbor sampling
use std::path::Path;

use image::GenericImageView;

/// Image data in the same 0xAARRGGBB packing the framebuffer uses.
/// Rows are stored bottom-up so V follows the OBJ convention (V grows
/// toward the top of the image).
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<u32>,
}

impl Texture {
    /// Decodes an image file (PNG in the default build) into ARGB texels.
    pub fn load<P: AsRef<Path>>(path: P) -> image::ImageResult<Self> {
        let img = image::open(path)?;
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let mut texels = Vec::with_capacity((width * height) as usize);
        for y in (0..height).rev() {
            for x in 0..width {
                let p = rgba.get_pixel(x, y).0;
                let (r, g, b, a) = (p[0] as u32, p[1] as u32, p[2] as u32, p[3] as u32);
                texels.push((a << 24) | (r << 16) | (g << 8) | b);
            }
        }

        Ok(Self {
            width: width as usize,
            height: height as usize,
            texels,
        })
    }

    /// Procedural checkerboard, `cell` pixels per square.
    pub fn checkerboard(width: usize, height: usize, cell: usize, light: u32, dark: u32) -> Self {
        let cell = cell.max(1);
        let mut texels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let color = if (x / cell + y / cell) % 2 == 0 { light } else { dark };
                texels.push(color);
            }
        }
        Self {
            width,
            height,
            texels,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Raw texel fetch. `x` and `y` must already be wrapped into range.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.texels[y * self.width + x]
    }

    /// Nearest-neighbor sample with repeat wrapping. Out-of-range
    /// coordinates, including negatives, tile the image.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let w = self.width as i32;
        let h = self.height as i32;
        let x = ((u * (w - 1) as f32) as i32).rem_euclid(w);
        let y = ((v * (h - 1) as f32) as i32).rem_euclid(h);
        self.pixel(x as usize, y as usize)
    }
}
