//! Standalone CLI for previewing the page without a browser
//!
//! Prints the static HTML document for the configured page and logs the
//! point cloud the renderer would generate.
//!
//! Run with: cargo run --features cli --bin coming-soon-cli > preview.html

use std::io::Write;

use coming_soon::core::markup::render_document;
use coming_soon::core::{PageConfig, PointCloud};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,coming_soon=debug"));
    // Logs go to stderr so stdout stays a clean HTML document
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::var("COMING_SOON_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading page config");
            PageConfig::from_json(&std::fs::read_to_string(&path)?)?
        }
        Err(_) => PageConfig::default(),
    };

    let width: f64 = std::env::var("COMING_SOON_WIDTH")
        .ok()
        .and_then(|w| w.parse().ok())
        .unwrap_or(1280.0);

    let cloud = PointCloud::generate(&mut rand::thread_rng(), width, &config.particles);
    let mean_size = if cloud.is_empty() {
        0.0
    } else {
        cloud.sizes.iter().sum::<f32>() / cloud.len() as f32
    };
    info!(
        width,
        points = cloud.len(),
        mean_size = format!("{:.2}", mean_size),
        bytes = cloud.len() * std::mem::size_of::<coming_soon::core::GpuPoint>(),
        "point cloud"
    );

    let document = render_document(&config);
    std::io::stdout().lock().write_all(document.as_bytes())?;
    info!(bytes = document.len(), "Preview written");
    Ok(())
}
