//! Dark theme shared by the stylesheet and the particle renderer

/// RGB color usable both as a CSS value and as a GL uniform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn css_alpha(&self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {})", self.0, self.1, self.2, alpha)
    }

    pub fn to_gl(self) -> [f32; 3] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        ]
    }
}

pub mod colors {
    use super::Rgb;

    // === Backgrounds ===
    pub const BG_PRIMARY: Rgb = Rgb(5, 6, 15);     // #05060f - near-black navy
    pub const BG_ELEVATED: Rgb = Rgb(18, 20, 38);  // #121426 - input fill

    // === Text ===
    pub const TEXT_PRIMARY: Rgb = Rgb(255, 255, 255);
    pub const TEXT_SECONDARY: Rgb = Rgb(168, 172, 196);
    pub const TEXT_MUTED: Rgb = Rgb(96, 100, 128);

    // === Accent ===
    pub const ACCENT: Rgb = Rgb(124, 140, 255);    // button + links
    pub const SUCCESS: Rgb = Rgb(110, 231, 183);

    // === Particles ===
    pub const PARTICLE: Rgb = Rgb(160, 180, 255);
}
