//! WebGL2 point cloud renderer
//!
//! Owns a canvas inside the mount element, one static vertex buffer with
//! the whole cloud, and a `requestAnimationFrame` loop that pushes time,
//! pointer and camera matrices as uniforms before each draw.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, HtmlElement, MouseEvent, WebGl2RenderingContext as GL, WebGlBuffer,
    WebGlProgram, WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject, WebglLoseContext,
    Window,
};

use super::{document, js_err};
use crate::core::shaders::{self, POSITION_LOCATION, SIZE_LOCATION};
use crate::core::{
    frame_uniforms, CameraConfig, FrameLoop, FrameUniforms, GpuPoint, PageConfig,
    PerspectiveCamera, PointCloud, Pointer, Viewport,
};
use crate::theme::colors;
use crate::time::now_seconds;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

#[derive(Default)]
struct UniformLocations {
    time: Option<WebGlUniformLocation>,
    mouse: Option<WebGlUniformLocation>,
    pixel_ratio: Option<WebGlUniformLocation>,
    model_view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
}

/// GPU handles, released together on teardown
struct GpuResources {
    program: WebGlProgram,
    vertex_shader: WebGlShader,
    fragment_shader: WebGlShader,
    vao: WebGlVertexArrayObject,
    buffer: WebGlBuffer,
}

/// Mutable renderer state shared with the frame and event callbacks
struct RenderState {
    gl: GL,
    canvas: HtmlCanvasElement,
    gpu: Option<GpuResources>,
    uniforms: UniformLocations,
    point_count: i32,
    camera: PerspectiveCamera,
    camera_config: CameraConfig,
    max_pixel_ratio: f64,
    viewport: Viewport,
    pointer: Pointer,
    frame_loop: FrameLoop<i32>,
}

pub struct ParticleRenderer {
    state: Rc<RefCell<RenderState>>,
    frame_callback: FrameCallback,
    on_pointer_move: Option<Closure<dyn FnMut(MouseEvent)>>,
    on_resize: Option<Closure<dyn FnMut()>>,
}

impl ParticleRenderer {
    /// Attach a canvas to `container`, upload the cloud and start animating
    pub fn new(container: &HtmlElement, config: &PageConfig) -> Result<Self, JsValue> {
        let window = super::window()?;
        let canvas = document()?
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;

        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"antialias".into(), &JsValue::TRUE)?;
        js_sys::Reflect::set(&options, &"alpha".into(), &JsValue::TRUE)?;
        let gl: GL = canvas
            .get_context_with_context_options("webgl2", &options)?
            .ok_or_else(|| js_err("WebGL2 not supported"))?
            .dyn_into()?;

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE);
        gl.disable(GL::DEPTH_TEST);

        let viewport = read_viewport(&window, config.max_pixel_ratio)?;
        let cloud = PointCloud::generate(&mut rand::thread_rng(), viewport.width, &config.particles);
        let (gpu, uniforms) = upload(&gl, &cloud)?;
        // Only a working renderer leaves a canvas behind
        if let Err(e) = container.append_child(&canvas) {
            release_gpu(&gl, &gpu);
            return Err(e);
        }

        let camera = PerspectiveCamera::new(&config.camera, viewport.aspect());

        let mut state = RenderState {
            gl,
            canvas,
            gpu: Some(gpu),
            uniforms,
            point_count: cloud.len() as i32,
            camera,
            camera_config: config.camera.clone(),
            max_pixel_ratio: config.max_pixel_ratio,
            viewport,
            pointer: Pointer::default(),
            frame_loop: FrameLoop::new(now_seconds()),
        };
        state.resize(viewport);
        state.apply_static_uniforms();

        info!(
            points = cloud.len(),
            width = viewport.width,
            height = viewport.height,
            pixel_ratio = viewport.pixel_ratio,
            "Particle renderer created"
        );

        let mut renderer = Self {
            state: Rc::new(RefCell::new(state)),
            frame_callback: Rc::new(RefCell::new(None)),
            on_pointer_move: None,
            on_resize: None,
        };
        renderer.register_listeners(&window)?;
        renderer.start_loop(&window)?;
        Ok(renderer)
    }

    fn register_listeners(&mut self, window: &Window) -> Result<(), JsValue> {
        let state = self.state.clone();
        let on_pointer_move = Closure::wrap(Box::new(move |e: MouseEvent| {
            let mut state = state.borrow_mut();
            state.pointer = Pointer::from_client(e.client_x() as f64, e.client_y() as f64, &state.viewport);
        }) as Box<dyn FnMut(MouseEvent)>);
        window.add_event_listener_with_callback(
            "pointermove",
            on_pointer_move.as_ref().unchecked_ref(),
        )?;
        self.on_pointer_move = Some(on_pointer_move);

        let state = self.state.clone();
        let on_resize = Closure::wrap(Box::new(move || {
            let Ok(window) = super::window() else {
                return;
            };
            let mut state = state.borrow_mut();
            match read_viewport(&window, state.max_pixel_ratio) {
                Ok(viewport) => state.resize(viewport),
                Err(e) => warn!(?e, "Failed to read viewport on resize"),
            }
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        self.on_resize = Some(on_resize);

        Ok(())
    }

    fn start_loop(&self, window: &Window) -> Result<(), JsValue> {
        // The closure reschedules itself through `frame_callback`, which is
        // cleared in destroy() to break the cycle.
        let state = self.state.clone();
        let frame_callback = self.frame_callback.clone();
        *self.frame_callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if !state.borrow_mut().render_frame(now_seconds()) {
                return;
            }
            let Ok(window) = super::window() else {
                return;
            };
            if let Some(callback) = frame_callback.borrow().as_ref() {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(handle) => {
                        if !state.borrow_mut().frame_loop.schedule(handle) {
                            let _ = window.cancel_animation_frame(handle);
                        }
                    }
                    Err(e) => warn!(?e, "requestAnimationFrame failed, animation stopped"),
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(callback) = self.frame_callback.borrow().as_ref() {
            let handle = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
            self.state.borrow_mut().frame_loop.schedule(handle);
        }
        Ok(())
    }

    /// Frames drawn since construction
    pub fn frames(&self) -> u64 {
        self.state.borrow().frame_loop.frames()
    }

    /// Cancel the pending frame, detach listeners, release GPU resources.
    /// Repeated calls do nothing.
    pub fn destroy(&mut self) {
        let window = web_sys::window();
        let pending = self.state.borrow_mut().frame_loop.stop();

        if let Some(window) = window.as_ref() {
            if let Some(handle) = pending {
                if let Err(e) = window.cancel_animation_frame(handle) {
                    warn!(?e, "cancelAnimationFrame failed");
                }
            }
            if let Some(cb) = self.on_pointer_move.take() {
                if let Err(e) = window
                    .remove_event_listener_with_callback("pointermove", cb.as_ref().unchecked_ref())
                {
                    warn!(?e, "Failed to remove pointermove listener");
                }
            }
            if let Some(cb) = self.on_resize.take() {
                if let Err(e) =
                    window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
                {
                    warn!(?e, "Failed to remove resize listener");
                }
            }
        }
        self.frame_callback.borrow_mut().take();

        if self.state.borrow_mut().release() {
            info!(frames = self.frames(), "Particle renderer destroyed");
        }
    }
}

impl Drop for ParticleRenderer {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl RenderState {
    fn apply_static_uniforms(&self) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        self.gl.use_program(Some(&gpu.program));
        let [r, g, b] = colors::PARTICLE.to_gl();
        self.gl.uniform3f(self.uniforms.color.as_ref(), r, g, b);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());

        let (css_w, css_h) = viewport.css_size();
        let style = self.canvas.style();
        for (property, value) in [("width", css_w), ("height", css_h)] {
            if let Err(e) = style.set_property(property, &format!("{}px", value)) {
                warn!(?e, property, "Failed to size canvas");
            }
        }

        let (w, h) = viewport.drawing_buffer_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        self.gl.viewport(0, 0, w as i32, h as i32);

        debug!(width = css_w, height = css_h, buffer_w = w, buffer_h = h, "Renderer resized");
    }

    /// One animation frame. Returns false once the loop is stopped.
    fn render_frame(&mut self, now: f64) -> bool {
        let Some(elapsed) = self.frame_loop.begin_frame(now) else {
            return false;
        };
        let uniforms = frame_uniforms(
            &mut self.camera,
            elapsed,
            self.pointer,
            self.viewport.pixel_ratio as f32,
            &self.camera_config,
        );
        self.draw(&uniforms);
        true
    }

    fn draw(&self, u: &FrameUniforms) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let gl = &self.gl;
        let [r, g, b] = colors::BG_PRIMARY.to_gl();
        gl.clear_color(r, g, b, 1.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        gl.use_program(Some(&gpu.program));
        gl.uniform1f(self.uniforms.time.as_ref(), u.time);
        gl.uniform2f(self.uniforms.mouse.as_ref(), u.mouse[0], u.mouse[1]);
        gl.uniform1f(self.uniforms.pixel_ratio.as_ref(), u.pixel_ratio);
        gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.model_view.as_ref(),
            false,
            &u.model_view.to_cols_array(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.projection.as_ref(),
            false,
            &u.projection.to_cols_array(),
        );

        gl.bind_vertex_array(Some(&gpu.vao));
        gl.draw_arrays(GL::POINTS, 0, self.point_count);
        gl.bind_vertex_array(None);
    }

    /// Free GPU objects and drop the canvas. Returns false if already released.
    fn release(&mut self) -> bool {
        let Some(gpu) = self.gpu.take() else {
            return false;
        };
        release_gpu(&self.gl, &gpu);
        self.uniforms = UniformLocations::default();
        self.canvas.remove();
        true
    }
}

/// Delete every GPU object and ask the browser to drop the context
fn release_gpu(gl: &GL, gpu: &GpuResources) {
    gl.bind_vertex_array(None);
    gl.bind_buffer(GL::ARRAY_BUFFER, None);
    gl.use_program(None);
    gl.delete_buffer(Some(&gpu.buffer));
    gl.delete_vertex_array(Some(&gpu.vao));
    delete_program(gl, &gpu.program, &gpu.vertex_shader, &gpu.fragment_shader);

    if let Ok(Some(ext)) = gl.get_extension("WEBGL_lose_context") {
        ext.unchecked_into::<WebglLoseContext>().lose_context();
    }
}

fn read_viewport(window: &Window, max_pixel_ratio: f64) -> Result<Viewport, JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(1.0);
    let height = window.inner_height()?.as_f64().unwrap_or(1.0);
    Ok(Viewport::new(
        width,
        height,
        window.device_pixel_ratio(),
        max_pixel_ratio,
    ))
}

/// Compile the program and upload the cloud into a single interleaved buffer
fn upload(gl: &GL, cloud: &PointCloud) -> Result<(GpuResources, UniformLocations), JsValue> {
    let vertex_shader = compile_shader(gl, &shaders::vertex_source(), GL::VERTEX_SHADER)?;
    let fragment_shader =
        match compile_shader(gl, &shaders::fragment_source(), GL::FRAGMENT_SHADER) {
            Ok(shader) => shader,
            Err(e) => {
                gl.delete_shader(Some(&vertex_shader));
                return Err(e);
            }
        };
    let program = match link_program(gl, &vertex_shader, &fragment_shader) {
        Ok(program) => program,
        Err(e) => {
            gl.delete_shader(Some(&vertex_shader));
            gl.delete_shader(Some(&fragment_shader));
            return Err(e);
        }
    };

    let Some(vao) = gl.create_vertex_array() else {
        delete_program(gl, &program, &vertex_shader, &fragment_shader);
        return Err(js_err("failed to create vertex array"));
    };
    gl.bind_vertex_array(Some(&vao));

    let Some(buffer) = gl.create_buffer() else {
        gl.bind_vertex_array(None);
        gl.delete_vertex_array(Some(&vao));
        delete_program(gl, &program, &vertex_shader, &fragment_shader);
        return Err(js_err("failed to create point buffer"));
    };
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));

    let points = cloud.to_gpu();
    gl.buffer_data_with_u8_array(GL::ARRAY_BUFFER, bytemuck::cast_slice(&points), GL::STATIC_DRAW);

    gl.vertex_attrib_pointer_with_i32(
        POSITION_LOCATION,
        3,
        GL::FLOAT,
        false,
        GpuPoint::STRIDE,
        GpuPoint::POSITION_OFFSET,
    );
    gl.enable_vertex_attrib_array(POSITION_LOCATION);
    gl.vertex_attrib_pointer_with_i32(
        SIZE_LOCATION,
        1,
        GL::FLOAT,
        false,
        GpuPoint::STRIDE,
        GpuPoint::SIZE_OFFSET,
    );
    gl.enable_vertex_attrib_array(SIZE_LOCATION);
    gl.bind_vertex_array(None);

    let uniforms = UniformLocations {
        time: gl.get_uniform_location(&program, shaders::UNIFORM_TIME),
        mouse: gl.get_uniform_location(&program, shaders::UNIFORM_MOUSE),
        pixel_ratio: gl.get_uniform_location(&program, shaders::UNIFORM_PIXEL_RATIO),
        model_view: gl.get_uniform_location(&program, shaders::UNIFORM_MODEL_VIEW),
        projection: gl.get_uniform_location(&program, shaders::UNIFORM_PROJECTION),
        color: gl.get_uniform_location(&program, shaders::UNIFORM_COLOR),
    };

    let gpu = GpuResources {
        program,
        vertex_shader,
        fragment_shader,
        vao,
        buffer,
    };
    Ok((gpu, uniforms))
}

fn delete_program(gl: &GL, program: &WebGlProgram, vert: &WebGlShader, frag: &WebGlShader) {
    gl.detach_shader(program, vert);
    gl.detach_shader(program, frag);
    gl.delete_shader(Some(vert));
    gl.delete_shader(Some(frag));
    gl.delete_program(Some(program));
}

fn compile_shader(gl: &GL, src: &str, shader_type: u32) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| js_err("could not create shader"))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if !gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        return Err(js_err(&log));
    }
    Ok(shader)
}

fn link_program(gl: &GL, vert: &WebGlShader, frag: &WebGlShader) -> Result<WebGlProgram, JsValue> {
    let program = gl
        .create_program()
        .ok_or_else(|| js_err("could not create program"))?;
    gl.attach_shader(&program, vert);
    gl.attach_shader(&program, frag);
    gl.link_program(&program);
    if !gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        return Err(js_err(&log));
    }
    Ok(program)
}
