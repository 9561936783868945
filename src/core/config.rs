//! Page configuration
//!
//! Every constant the page uses lives here so the browser build and the
//! preview CLI agree. All sections default independently, so a JSON
//! override only needs the fields it changes.

use serde::Deserialize;
use tracing::warn;

/// Upper bound on either point count. Larger values fall back to defaults.
pub const MAX_POINTS: usize = 100_000;

/// Top-level page configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub content: ContentConfig,
    pub ids: ElementIds,
    pub particles: ParticleConfig,
    pub camera: CameraConfig,
    /// Upper bound for `devicePixelRatio` when sizing the drawing buffer
    pub max_pixel_ratio: f64,
    /// How long the "subscribed" state stays visible before reverting
    pub revert_delay_ms: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            content: ContentConfig::default(),
            ids: ElementIds::default(),
            particles: ParticleConfig::default(),
            camera: CameraConfig::default(),
            max_pixel_ratio: 2.0,
            revert_delay_ms: 3000,
        }
    }
}

/// Visible text of the page
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    pub brand: String,
    pub heading: String,
    pub tagline: String,
    pub input_placeholder: String,
    pub button_label: String,
    pub button_label_subscribed: String,
    pub success_message: String,
    pub social_links: Vec<SocialLink>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            brand: "Nebula".into(),
            heading: "Coming Soon".into(),
            tagline: "Something new is taking shape. Be the first to know when we launch.".into(),
            input_placeholder: "Enter your email".into(),
            button_label: "Notify Me".into(),
            button_label_subscribed: "Subscribed!".into(),
            success_message: "Thanks! We'll let you know when we launch.".into(),
            social_links: vec![
                SocialLink::new("Twitter", "https://twitter.com"),
                SocialLink::new("Instagram", "https://instagram.com"),
                SocialLink::new("LinkedIn", "https://linkedin.com"),
                SocialLink::new("GitHub", "https://github.com"),
            ],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SocialLink {
    pub label: String,
    pub href: String,
}

impl SocialLink {
    pub fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

/// DOM element identifiers the page controller and renderer look up
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ElementIds {
    pub particle_container: String,
    pub email_form: String,
    pub email_input: String,
    pub submit_button: String,
    pub success_message: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            particle_container: "particle-container".into(),
            email_form: "email-form".into(),
            email_input: "email-input".into(),
            submit_button: "submit-button".into(),
            success_message: "success-message".into(),
        }
    }
}

/// Point cloud generation parameters
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    /// Viewports at least this wide get `dense_count` points
    pub breakpoint: f64,
    pub dense_count: usize,
    pub sparse_count: usize,
    /// Half the edge length of the cube points are scattered in
    pub extent: f32,
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            breakpoint: 768.0,
            dense_count: 1500,
            sparse_count: 800,
            extent: 50.0,
            min_size: 1.0,
            max_size: 4.0,
        }
    }
}

/// Camera and host-side motion parameters
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the origin along +Z
    pub distance: f32,
    /// Amplitude of the camera's oscillating offset
    pub sway: f32,
    /// Angular speed of the camera oscillation (rad/s)
    pub sway_speed: f32,
    /// Point cloud rotation speed around Y (rad/s)
    pub spin_y: f32,
    /// Point cloud rotation speed around X (rad/s)
    pub spin_x: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 50.0,
            sway: 2.0,
            sway_speed: 0.1,
            spin_y: 0.05,
            spin_x: 0.02,
        }
    }
}

impl PageConfig {
    /// Parse a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: PageConfig = serde_json::from_str(json)?;
        Ok(config.validate())
    }

    /// Replace degenerate values with defaults so generation never panics
    pub fn validate(mut self) -> Self {
        let defaults = ParticleConfig::default();
        let p = &mut self.particles;
        // Sampling needs a non-empty range whose width is still finite
        if !(p.min_size < p.max_size && (p.max_size - p.min_size).is_finite()) {
            warn!(min = p.min_size, max = p.max_size, "Invalid point size range, using defaults");
            p.min_size = defaults.min_size;
            p.max_size = defaults.max_size;
        }
        if !(p.extent > 0.0 && (2.0 * p.extent).is_finite()) {
            warn!(extent = p.extent, "Invalid point extent, using default");
            p.extent = defaults.extent;
        }
        if p.dense_count > MAX_POINTS {
            warn!(count = p.dense_count, max = MAX_POINTS, "Dense point count too large, using default");
            p.dense_count = defaults.dense_count;
        }
        if p.sparse_count > MAX_POINTS {
            warn!(count = p.sparse_count, max = MAX_POINTS, "Sparse point count too large, using default");
            p.sparse_count = defaults.sparse_count;
        }
        if !(self.max_pixel_ratio >= 1.0) {
            warn!(ratio = self.max_pixel_ratio, "Invalid max pixel ratio, using default");
            self.max_pixel_ratio = 2.0;
        }
        let camera_defaults = CameraConfig::default();
        let c = &mut self.camera;
        if !(c.near > 0.0 && c.near < c.far) {
            warn!(near = c.near, far = c.far, "Invalid clip planes, using defaults");
            c.near = camera_defaults.near;
            c.far = camera_defaults.far;
        }
        if !(c.fov_degrees > 0.0 && c.fov_degrees < 180.0) {
            warn!(fov = c.fov_degrees, "Invalid field of view, using default");
            c.fov_degrees = camera_defaults.fov_degrees;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PointCloud;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn defaults_match_page_constants() {
        let config = PageConfig::default();
        assert_eq!(config.particles.breakpoint, 768.0);
        assert_eq!(config.particles.dense_count, 1500);
        assert_eq!(config.particles.sparse_count, 800);
        assert_eq!(config.revert_delay_ms, 3000);
        assert_eq!(config.ids.particle_container, "particle-container");
        assert_eq!(config.ids.email_form, "email-form");
        assert_eq!(config.ids.email_input, "email-input");
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let json = r#"{
            "content": { "heading": "Launching Soon" },
            "revert_delay_ms": 1500
        }"#;
        let config = PageConfig::from_json(json).unwrap();
        assert_eq!(config.content.heading, "Launching Soon");
        assert_eq!(config.content.button_label, "Notify Me");
        assert_eq!(config.revert_delay_ms, 1500);
        assert_eq!(config.particles, ParticleConfig::default());
    }

    #[test]
    fn social_links_replace_the_default_list() {
        let json = r#"{
            "content": { "social_links": [ { "label": "Mastodon", "href": "https://example.social" } ] }
        }"#;
        let config = PageConfig::from_json(json).unwrap();
        assert_eq!(config.content.social_links.len(), 1);
        assert_eq!(config.content.social_links[0].label, "Mastodon");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(PageConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn degenerate_values_fall_back_to_defaults() {
        let json = r#"{
            "particles": { "min_size": 5.0, "max_size": 2.0, "extent": 0.0 },
            "camera": { "near": 10.0, "far": 1.0, "fov_degrees": 0.0 },
            "max_pixel_ratio": 0.0
        }"#;
        let config = PageConfig::from_json(json).unwrap();
        assert_eq!(config.particles.min_size, 1.0);
        assert_eq!(config.particles.max_size, 4.0);
        assert_eq!(config.particles.extent, 50.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.camera.far, 1000.0);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.max_pixel_ratio, 2.0);
    }

    #[test]
    fn overflowing_extent_falls_back_and_generates() {
        let config = PageConfig::from_json(r#"{ "particles": { "extent": 3e38 } }"#).unwrap();
        assert_eq!(config.particles.extent, 50.0);

        let cloud = PointCloud::generate(&mut StdRng::seed_from_u64(1), 1280.0, &config.particles);
        assert_eq!(cloud.len(), 1500);
        assert!(cloud.positions.iter().flatten().all(|c| (-50.0..50.0).contains(c)));
    }

    #[test]
    fn overflowing_size_range_falls_back_and_generates() {
        let json = r#"{ "particles": { "min_size": -3e38, "max_size": 3e38 } }"#;
        let config = PageConfig::from_json(json).unwrap();
        assert_eq!(config.particles.min_size, 1.0);
        assert_eq!(config.particles.max_size, 4.0);

        let cloud = PointCloud::generate(&mut StdRng::seed_from_u64(2), 320.0, &config.particles);
        assert_eq!(cloud.len(), 800);
        assert!(cloud.sizes.iter().all(|s| (1.0..4.0).contains(s)));
    }

    #[test]
    fn oversized_point_counts_fall_back() {
        let json = r#"{ "particles": { "dense_count": 50000000, "sparse_count": 100001 } }"#;
        let config = PageConfig::from_json(json).unwrap();
        assert_eq!(config.particles.dense_count, 1500);
        assert_eq!(config.particles.sparse_count, 800);

        let at_limit = format!(r#"{{ "particles": {{ "dense_count": {} }} }}"#, MAX_POINTS);
        let config = PageConfig::from_json(&at_limit).unwrap();
        assert_eq!(config.particles.dense_count, MAX_POINTS);
    }
}
