//! Coming-soon landing page
//!
//! A single page compiled to WebAssembly:
//! - animated WebGL2 point cloud background that drifts, rotates and
//!   shies away from the pointer
//! - brand, heading, tagline and social links overlay
//! - email form with a purely local "subscribed" confirmation
//!
//! Everything that does not need a browser lives in [`core`] and is
//! tested natively. The browser glue is behind the `wasm` feature.

pub mod core;
pub mod theme;
pub mod time;

#[cfg(feature = "wasm")]
mod web;

#[cfg(feature = "wasm")]
pub use web::ComingSoonPage;
