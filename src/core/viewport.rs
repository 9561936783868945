//! Viewport dimensions and pointer normalisation

/// Window size in CSS pixels plus the (capped) device pixel ratio
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            pixel_ratio: device_pixel_ratio.clamp(1.0, max_pixel_ratio),
        }
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }

    /// CSS size of the canvas element
    pub fn css_size(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    /// Size of the drawing buffer in device pixels
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).floor() as u32,
            (self.height * self.pixel_ratio).floor() as u32,
        )
    }
}

/// Pointer position in normalised device coordinates (x right, y up)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    /// Convert client coordinates (origin top-left, y down) to NDC
    pub fn from_client(client_x: f64, client_y: f64, viewport: &Viewport) -> Self {
        Self {
            x: (client_x / viewport.width * 2.0 - 1.0) as f32,
            y: (-(client_y / viewport.height) * 2.0 + 1.0) as f32,
        }
    }

    pub fn as_array(&self) -> [f32; 2] {
        [self.x, self.y]
    }
}
