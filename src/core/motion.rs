//! Per-frame motion
//!
//! Host side: slow rotation of the cloud and a small camera sway, both pure
//! functions of elapsed time. Shader side: the wave, pointer repulsion and
//! sprite fade are evaluated per point on the GPU; the functions below
//! mirror that math so it can be checked without a GL context. The
//! constants are injected into the GLSL source (see `shaders`), so both
//! sides always agree.

use glam::{EulerRot, Mat4, Vec2, Vec3, Vec4};

use super::camera::PerspectiveCamera;
use super::config::CameraConfig;
use super::viewport::Pointer;

pub const WAVE_AMPLITUDE: f32 = 2.0;
pub const WAVE_FREQUENCY: f32 = 0.05;
pub const WAVE_SPEED: [f32; 3] = [0.5, 0.3, 0.4];
/// NDC radius around the pointer inside which points are pushed away
pub const REPULSION_RADIUS: f32 = 0.3;
pub const REPULSION_STRENGTH: f32 = 0.01;
/// Point size attenuation numerator (pixels at unit view depth)
pub const SIZE_SCALE: f32 = 200.0;
pub const BASE_ALPHA: f32 = 0.8;
/// Opacity multiplier for points sitting right under the pointer
pub const NEAR_POINTER_ALPHA: f32 = 0.35;

/// Everything the shader needs for one draw call
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameUniforms {
    pub time: f32,
    pub mouse: [f32; 2],
    pub pixel_ratio: f32,
    pub model_view: Mat4,
    pub projection: Mat4,
}

/// Rotation of the point cloud after `elapsed` seconds
pub fn model_rotation(elapsed: f32, config: &CameraConfig) -> Mat4 {
    Mat4::from_euler(
        EulerRot::XYZ,
        elapsed * config.spin_x,
        elapsed * config.spin_y,
        0.0,
    )
}

/// Oscillating camera offset after `elapsed` seconds
pub fn camera_offset(elapsed: f32, config: &CameraConfig) -> Vec3 {
    let phase = elapsed * config.sway_speed;
    Vec3::new(phase.sin() * config.sway, phase.cos() * config.sway, 0.0)
}

/// Advance the camera for this frame and collect the shader inputs
pub fn frame_uniforms(
    camera: &mut PerspectiveCamera,
    elapsed: f32,
    pointer: Pointer,
    pixel_ratio: f32,
    config: &CameraConfig,
) -> FrameUniforms {
    camera.set_offset(camera_offset(elapsed, config));
    FrameUniforms {
        time: elapsed,
        mouse: pointer.as_array(),
        pixel_ratio,
        model_view: camera.view_matrix() * model_rotation(elapsed, config),
        projection: camera.projection_matrix(),
    }
}

/// Wave perturbation keyed on time and the point's own coordinates
pub fn wave_offset(base: Vec3, time: f32) -> Vec3 {
    Vec3::new(
        (time * WAVE_SPEED[0] + base.y * WAVE_FREQUENCY).sin() * WAVE_AMPLITUDE,
        (time * WAVE_SPEED[1] + base.x * WAVE_FREQUENCY).cos() * WAVE_AMPLITUDE,
        (time * WAVE_SPEED[2] + base.z * WAVE_FREQUENCY).sin() * WAVE_AMPLITUDE,
    )
}

/// NDC offset pushing a point away from the pointer.
///
/// Magnitude is `REPULSION_STRENGTH / dist` inside the radius, zero outside.
/// A point exactly under the pointer normalises a zero vector and divides by
/// zero, so the result is non-finite there, same as on the GPU.
pub fn repulsion(ndc: Vec2, mouse: Vec2) -> Vec2 {
    let dir = ndc - mouse;
    let dist = dir.length();
    if dist < REPULSION_RADIUS {
        // glam's normalize() is x * (1/len), which matches GLSL's NaN for zero
        dir * dist.recip() * (REPULSION_STRENGTH / dist)
    } else {
        Vec2::ZERO
    }
}

/// GLSL `smoothstep`
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Sprite opacity at distance `r` from the sprite centre (0.5 = edge)
pub fn sprite_alpha(r: f32) -> f32 {
    if r > 0.5 {
        return 0.0;
    }
    (1.0 - smoothstep(0.0, 0.5, r)) * BASE_ALPHA
}

/// Opacity multiplier from the point's NDC distance to the pointer
pub fn pointer_fade(dist: f32) -> f32 {
    let t = smoothstep(0.0, REPULSION_RADIUS, dist);
    NEAR_POINTER_ALPHA + (1.0 - NEAR_POINTER_ALPHA) * t
}

/// Rendered sprite size in device pixels; `view_depth` is the (negative) view-space z
pub fn point_size(size: f32, pixel_ratio: f32, view_depth: f32) -> f32 {
    size * pixel_ratio * (SIZE_SCALE / -view_depth)
}

/// Host evaluation of the vertex stage: final NDC position of a point
pub fn displaced_ndc(base: Vec3, uniforms: &FrameUniforms) -> Vec2 {
    let pos = base + wave_offset(base, uniforms.time);
    let clip = uniforms.projection * uniforms.model_view * Vec4::from((pos, 1.0));
    let ndc = Vec2::new(clip.x, clip.y) / clip.w;
    ndc + repulsion(ndc, Vec2::from(uniforms.mouse))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn rotation_is_identity_at_start_and_advances_slowly() {
        let config = CameraConfig::default();
        assert_eq!(model_rotation(0.0, &config), Mat4::IDENTITY);

        // After 10s: 0.2 rad around X, 0.5 rad around Y
        let expected = Mat4::from_euler(EulerRot::XYZ, 0.2, 0.5, 0.0);
        assert!(model_rotation(10.0, &config).abs_diff_eq(expected, 1e-6));

        // Pure rotation, no scaling
        let rotated = model_rotation(10.0, &config).transform_point3(Vec3::Z);
        assert!(approx(rotated.length(), 1.0));
    }

    #[test]
    fn camera_sway_is_bounded_and_periodic() {
        let config = CameraConfig::default();
        assert_eq!(camera_offset(0.0, &config), Vec3::new(0.0, 2.0, 0.0));
        for i in 0..200 {
            let t = i as f32 * 0.37;
            let off = camera_offset(t, &config);
            assert!(off.x.abs() <= 2.0 + 1e-6 && off.y.abs() <= 2.0 + 1e-6);
            assert_eq!(off.z, 0.0);
            assert!(approx(off.truncate().length(), 2.0));
        }
    }

    #[test]
    fn frame_uniforms_carry_time_and_pointer() {
        let config = CameraConfig::default();
        let mut camera = PerspectiveCamera::new(&config, 1.5);
        let pointer = Pointer { x: 0.25, y: -0.5 };
        let u = frame_uniforms(&mut camera, 3.0, pointer, 2.0, &config);
        assert_eq!(u.time, 3.0);
        assert_eq!(u.mouse, [0.25, -0.5]);
        assert_eq!(u.pixel_ratio, 2.0);
        assert_eq!(u.projection, camera.projection_matrix());
        assert_eq!(camera.position.z, 50.0);
        assert!(approx(camera.position.x, (0.3f32).sin() * 2.0));
    }

    #[test]
    fn wave_offset_is_bounded_by_amplitude() {
        for i in 0..50 {
            let base = Vec3::new(i as f32 - 25.0, 25.0 - i as f32, i as f32 * 0.5);
            let off = wave_offset(base, i as f32 * 0.1);
            assert!(off.abs().max_element() <= WAVE_AMPLITUDE + 1e-6);
        }
        // Depends on the point's own coordinates
        assert_ne!(wave_offset(Vec3::ZERO, 1.0), wave_offset(Vec3::splat(10.0), 1.0));
    }

    #[test]
    fn repulsion_pushes_away_and_weakens_with_distance() {
        let mouse = Vec2::ZERO;
        let near = repulsion(Vec2::new(0.05, 0.0), mouse);
        let far = repulsion(Vec2::new(0.2, 0.0), mouse);
        assert!(near.x > 0.0 && near.y.abs() < 1e-6);
        assert!(near.length() > far.length());
        assert!(approx(near.length(), REPULSION_STRENGTH / 0.05));
        assert!(approx(far.length() * 0.2, near.length() * 0.05));

        assert_eq!(repulsion(Vec2::new(0.5, 0.0), mouse), Vec2::ZERO);
        assert_eq!(repulsion(Vec2::new(-0.3, 0.0), mouse), Vec2::ZERO);

        let below = repulsion(Vec2::new(0.3, -0.15), Vec2::new(0.3, 0.0));
        assert!(below.y < 0.0);
    }

    #[test]
    fn repulsion_at_the_pointer_is_not_finite() {
        // Left undefined on purpose, see the doc comment on `repulsion`
        let at = repulsion(Vec2::new(0.4, -0.2), Vec2::new(0.4, -0.2));
        assert!(!at.is_finite());
    }

    #[test]
    fn sprite_fades_from_centre_to_edge() {
        assert!(approx(sprite_alpha(0.0), BASE_ALPHA));
        assert!(sprite_alpha(0.25) < sprite_alpha(0.1));
        assert!(approx(sprite_alpha(0.5), 0.0));
        assert_eq!(sprite_alpha(0.6), 0.0);
    }

    #[test]
    fn points_near_pointer_are_dimmer() {
        assert!(approx(pointer_fade(0.0), NEAR_POINTER_ALPHA));
        assert!(pointer_fade(0.1) < pointer_fade(0.2));
        assert!(approx(pointer_fade(REPULSION_RADIUS), 1.0));
        assert!(approx(pointer_fade(1.0), 1.0));
    }

    #[test]
    fn point_size_attenuates_with_depth() {
        assert!(approx(point_size(2.0, 1.0, -50.0), 8.0));
        assert!(approx(point_size(2.0, 2.0, -50.0), 16.0));
        assert!(point_size(2.0, 1.0, -25.0) > point_size(2.0, 1.0, -100.0));
    }

    #[test]
    fn displaced_point_moves_away_from_pointer() {
        let config = CameraConfig::default();
        let mut camera = PerspectiveCamera::new(&config, 1.0);

        // Find where the origin lands with the pointer far away
        let far = frame_uniforms(&mut camera, 0.0, Pointer { x: 0.99, y: 0.99 }, 1.0, &config);
        let rest = displaced_ndc(Vec3::ZERO, &far);

        // Pointer just left of that spot pushes it right
        let pointer = Pointer { x: rest.x - 0.1, y: rest.y };
        let near = frame_uniforms(&mut camera, 0.0, pointer, 1.0, &config);
        let pushed = displaced_ndc(Vec3::ZERO, &near);
        assert!(pushed.x > rest.x);
        assert!(approx(pushed.y, rest.y));
    }
}
