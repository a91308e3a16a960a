//! Render buffers and results

/// Linear RGBA float image
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl RenderBuffer {
    /// Buffer filled with transparent black
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0.0; 4])
    }

    /// Buffer filled with `color`
    pub fn filled(width: u32, height: u32, color: [f32; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Overwrite every pixel
    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    /// Pixel at `(x, y)`, origin top-left
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.offset(x, y).map(|offset| self.pixels[offset])
    }

    /// Set the pixel at `(x, y)`; out-of-range writes are dropped
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if let Some(offset) = self.offset(x, y) {
            self.pixels[offset] = color;
        }
    }

    /// Row-major pixels
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Raw bytes of the pixel data, for upload or copying into host buffers
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Blend `sample` into this buffer as the `count`-th sample of a running
    /// average (`count` starts at 1).
    pub fn accumulate(&mut self, sample: &Self, count: u32) {
        if sample.width != self.width || sample.height != self.height {
            log::warn!(
                "Dropping {}x{} sample for {}x{} accumulation buffer",
                sample.width,
                sample.height,
                self.width,
                self.height
            );
            return;
        }
        let weight = 1.0 / count.max(1) as f32;
        for (dst, src) in self.pixels.iter_mut().zip(&sample.pixels) {
            for channel in 0..4 {
                dst[channel] += (src[channel] - dst[channel]) * weight;
            }
        }
    }

    /// 8-bit sRGB-encoded copy with straight alpha
    pub fn to_rgba8(&self) -> Vec<u8> {
        let encode = |value: f32| {
            let value = value.clamp(0.0, 1.0).powf(1.0 / 2.2);
            (value * 255.0).round() as u8
        };
        self.pixels
            .iter()
            .flat_map(|[r, g, b, a]| {
                [
                    encode(*r),
                    encode(*g),
                    encode(*b),
                    (a.clamp(0.0, 1.0) * 255.0).round() as u8,
                ]
            })
            .collect()
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}

/// One named output of a render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    /// Pass name, e.g. `"Combined"`
    pub name: String,
    /// Pixels
    pub buffer: RenderBuffer,
}

/// Output of a render call
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    /// Passes produced
    pub passes: Vec<RenderPass>,
    /// Samples actually executed
    pub samples_completed: u32,
    /// Whether the stop flag cut the render short
    pub stopped: bool,
}

impl RenderResult {
    /// Name of the beauty pass
    pub const COMBINED: &'static str = "Combined";

    /// Pass by name
    pub fn pass(&self, name: &str) -> Option<&RenderBuffer> {
        self.passes
            .iter()
            .find(|pass| pass.name == name)
            .map(|pass| &pass.buffer)
    }

    /// The beauty pass
    pub fn combined(&self) -> Option<&RenderBuffer> {
        self.pass(Self::COMBINED)
    }
}
