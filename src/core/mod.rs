//! Platform-agnostic core - shared between the wasm page and the preview CLI

pub mod camera;
pub mod config;
pub mod frame_loop;
pub mod markup;
pub mod motion;
pub mod particles;
pub mod shaders;
pub mod subscription;
pub mod viewport;

pub use camera::PerspectiveCamera;
pub use config::{CameraConfig, ContentConfig, ElementIds, PageConfig, ParticleConfig, SocialLink};
pub use frame_loop::{FrameLoop, LoopState};
pub use motion::{frame_uniforms, FrameUniforms};
pub use particles::{point_count, GpuPoint, PointCloud};
pub use subscription::{FormSurface, SubmitOutcome, Subscription, SubscriptionPhase};
pub use viewport::{Pointer, Viewport};
