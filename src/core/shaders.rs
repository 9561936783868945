//! GLSL ES 3.0 sources for the point cloud program
//!
//! Motion constants are prepended as `#define`s from `motion`, so the GPU
//! and the host-side mirror share one set of numbers.

use super::motion::{
    BASE_ALPHA, NEAR_POINTER_ALPHA, REPULSION_RADIUS, REPULSION_STRENGTH, SIZE_SCALE,
    WAVE_AMPLITUDE, WAVE_FREQUENCY, WAVE_SPEED,
};

/// Attribute locations, bound with `layout(location = N)`
pub const POSITION_LOCATION: u32 = 0;
pub const SIZE_LOCATION: u32 = 1;

pub const UNIFORM_TIME: &str = "u_time";
pub const UNIFORM_MOUSE: &str = "u_mouse";
pub const UNIFORM_PIXEL_RATIO: &str = "u_pixel_ratio";
pub const UNIFORM_MODEL_VIEW: &str = "u_model_view";
pub const UNIFORM_PROJECTION: &str = "u_projection";
pub const UNIFORM_COLOR: &str = "u_color";

const VERTEX_BODY: &str = r#"
layout(location = 0) in vec3 a_position;
layout(location = 1) in float a_size;

uniform float u_time;
uniform vec2 u_mouse;
uniform float u_pixel_ratio;
uniform mat4 u_model_view;
uniform mat4 u_projection;

out float v_pointer_dist;

void main() {
    vec3 pos = a_position;
    pos.x += sin(u_time * WAVE_SPEED_X + a_position.y * WAVE_FREQUENCY) * WAVE_AMPLITUDE;
    pos.y += cos(u_time * WAVE_SPEED_Y + a_position.x * WAVE_FREQUENCY) * WAVE_AMPLITUDE;
    pos.z += sin(u_time * WAVE_SPEED_Z + a_position.z * WAVE_FREQUENCY) * WAVE_AMPLITUDE;

    vec4 mv = u_model_view * vec4(pos, 1.0);
    vec4 clip = u_projection * mv;

    // Repulsion happens in NDC so the pointer radius is screen-relative.
    // Undefined when the point sits exactly under the pointer.
    vec2 ndc = clip.xy / clip.w;
    vec2 dir = ndc - u_mouse;
    float dist = length(dir);
    if (dist < REPULSION_RADIUS) {
        ndc += normalize(dir) * (REPULSION_STRENGTH / dist);
        clip.xy = ndc * clip.w;
    }

    v_pointer_dist = dist;
    gl_Position = clip;
    gl_PointSize = a_size * u_pixel_ratio * (SIZE_SCALE / -mv.z);
}
"#;

const FRAGMENT_BODY: &str = r#"
uniform vec3 u_color;

in float v_pointer_dist;
out vec4 out_color;

void main() {
    float r = length(gl_PointCoord - vec2(0.5));
    if (r > 0.5) {
        discard;
    }
    float alpha = (1.0 - smoothstep(0.0, 0.5, r)) * BASE_ALPHA;
    alpha *= mix(NEAR_POINTER_ALPHA, 1.0, smoothstep(0.0, REPULSION_RADIUS, v_pointer_dist));
    out_color = vec4(u_color, alpha);
}
"#;

fn header(precision: &str) -> String {
    // Debug formatting keeps the decimal point GLSL needs for float literals
    format!(
        "#version 300 es\n\
         precision {precision} float;\n\
         #define WAVE_AMPLITUDE {:?}\n\
         #define WAVE_FREQUENCY {:?}\n\
         #define WAVE_SPEED_X {:?}\n\
         #define WAVE_SPEED_Y {:?}\n\
         #define WAVE_SPEED_Z {:?}\n\
         #define REPULSION_RADIUS {:?}\n\
         #define REPULSION_STRENGTH {:?}\n\
         #define SIZE_SCALE {:?}\n\
         #define BASE_ALPHA {:?}\n\
         #define NEAR_POINTER_ALPHA {:?}\n",
        WAVE_AMPLITUDE,
        WAVE_FREQUENCY,
        WAVE_SPEED[0],
        WAVE_SPEED[1],
        WAVE_SPEED[2],
        REPULSION_RADIUS,
        REPULSION_STRENGTH,
        SIZE_SCALE,
        BASE_ALPHA,
        NEAR_POINTER_ALPHA,
    )
}

pub fn vertex_source() -> String {
    header("highp") + VERTEX_BODY
}

pub fn fragment_source() -> String {
    header("mediump") + FRAGMENT_BODY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_directive_comes_first() {
        assert!(vertex_source().starts_with("#version 300 es\n"));
        assert!(fragment_source().starts_with("#version 300 es\n"));
    }

    #[test]
    fn constants_are_float_literals() {
        let src = vertex_source();
        assert!(src.contains("#define SIZE_SCALE 200.0\n"));
        assert!(src.contains("#define REPULSION_RADIUS 0.3\n"));
        assert!(src.contains("#define WAVE_AMPLITUDE 2.0\n"));
    }

    #[test]
    fn sources_declare_cached_uniforms() {
        let vs = vertex_source();
        for name in [
            UNIFORM_TIME,
            UNIFORM_MOUSE,
            UNIFORM_PIXEL_RATIO,
            UNIFORM_MODEL_VIEW,
            UNIFORM_PROJECTION,
        ] {
            assert!(vs.contains(&format!(" {};", name)), "vertex shader missing {}", name);
        }
        assert!(fragment_source().contains(&format!(" {};", UNIFORM_COLOR)));
    }

    #[test]
    fn attribute_locations_match_layout() {
        let vs = vertex_source();
        assert!(vs.contains(&format!("layout(location = {}) in vec3 a_position", POSITION_LOCATION)));
        assert!(vs.contains(&format!("layout(location = {}) in float a_size", SIZE_LOCATION)));
    }
}
