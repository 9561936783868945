//! Page controller: DOM structure, renderer mount, subscription form

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement};

use super::renderer::ParticleRenderer;
use super::{document, element_by_id, js_err, window};
use crate::core::markup;
use crate::core::{ContentConfig, FormSurface, PageConfig, SubmitOutcome, Subscription};

const STYLE_ELEMENT_ID: &str = "coming-soon-style";

/// Live handles to the form elements. Any of them may be missing.
struct DomForm {
    input: Option<HtmlInputElement>,
    button: Option<Element>,
    message: Option<HtmlElement>,
}

impl DomForm {
    fn lookup(document: &Document, config: &PageConfig) -> Self {
        Self {
            input: element_by_id(document, &config.ids.email_input),
            button: element_by_id(document, &config.ids.submit_button),
            message: element_by_id(document, &config.ids.success_message),
        }
    }
}

impl FormSurface for DomForm {
    fn input_value(&self) -> String {
        self.input.as_ref().map(|i| i.value()).unwrap_or_default()
    }

    fn clear_input(&mut self) {
        if let Some(input) = &self.input {
            input.set_value("");
        }
    }

    fn set_button_label(&mut self, label: &str) {
        if let Some(button) = &self.button {
            button.set_text_content(Some(label));
        }
    }

    fn set_message_visible(&mut self, visible: bool) {
        if let Some(message) = &self.message {
            message.set_hidden(!visible);
        }
    }
}

/// Subscription flag, its timer, and the elements it drives
struct FormState {
    subscription: Subscription<i32>,
    dom: DomForm,
    content: ContentConfig,
    revert_delay_ms: i32,
    /// Kept alive until the timer fires or teardown clears it
    revert_callback: Option<Closure<dyn FnMut()>>,
}

pub struct PageController {
    renderer: Option<ParticleRenderer>,
    form_state: Rc<RefCell<FormState>>,
    submit_listener: Option<(Element, Closure<dyn FnMut(Event)>)>,
}

impl PageController {
    /// Replace the body, start the particle background, wire the form
    pub fn mount(config: PageConfig) -> Result<Self, JsValue> {
        let document = document()?;
        let body = document.body().ok_or_else(|| js_err("missing body"))?;

        inject_stylesheet(&document)?;
        body.set_inner_html(&markup::render_body(&config));
        info!(brand = %config.content.brand, "Page markup mounted");

        let renderer = element_by_id::<HtmlElement>(&document, &config.ids.particle_container)
            .and_then(|container| match ParticleRenderer::new(&container, &config) {
                Ok(renderer) => Some(renderer),
                Err(e) => {
                    // Page stays usable without the background
                    error!(?e, "Particle renderer unavailable");
                    None
                }
            });

        let form_state = Rc::new(RefCell::new(FormState {
            subscription: Subscription::default(),
            dom: DomForm::lookup(&document, &config),
            content: config.content.clone(),
            revert_delay_ms: config.revert_delay_ms.min(i32::MAX as u32) as i32,
            revert_callback: None,
        }));

        let mut controller = Self {
            renderer,
            form_state,
            submit_listener: None,
        };

        if let Some(form) = element_by_id::<Element>(&document, &config.ids.email_form) {
            controller.attach_submit_handler(form)?;
        }

        Ok(controller)
    }

    fn attach_submit_handler(&mut self, form: Element) -> Result<(), JsValue> {
        let state = self.form_state.clone();
        let on_submit = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            handle_submit(&state);
        }) as Box<dyn FnMut(Event)>);
        form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
        self.submit_listener = Some((form, on_submit));
        Ok(())
    }

    /// Clear the pending revert timer, detach the form, tear down the renderer
    pub fn destroy(&mut self) {
        let pending = {
            let mut state = self.form_state.borrow_mut();
            state.revert_callback = None;
            state.subscription.take_revert_timer()
        };
        if let (Some(handle), Ok(window)) = (pending, window()) {
            window.clear_timeout_with_handle(handle);
            debug!("Pending revert timer cleared");
        }

        if let Some((form, callback)) = self.submit_listener.take() {
            if let Err(e) =
                form.remove_event_listener_with_callback("submit", callback.as_ref().unchecked_ref())
            {
                warn!(?e, "Failed to detach submit handler");
            }
        }

        if let Some(mut renderer) = self.renderer.take() {
            renderer.destroy();
        }
    }
}

// Dropping without destroy() would free closures the DOM still calls
impl Drop for PageController {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn handle_submit(state: &Rc<RefCell<FormState>>) {
    let outcome = {
        let mut guard = state.borrow_mut();
        let FormState {
            subscription,
            dom,
            content,
            ..
        } = &mut *guard;
        subscription.submit(dom, content)
    };
    if outcome != SubmitOutcome::Accepted {
        return;
    }

    if let Err(e) = schedule_revert(state) {
        // Without a timer the form would stay stuck, so revert right away
        warn!(?e, "Failed to schedule revert, reverting now");
        revert(&Rc::downgrade(state));
    }
}

fn schedule_revert(state: &Rc<RefCell<FormState>>) -> Result<(), JsValue> {
    let weak = Rc::downgrade(state);
    let callback = Closure::wrap(Box::new(move || revert(&weak)) as Box<dyn FnMut()>);

    let delay = state.borrow().revert_delay_ms;
    let handle = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        delay,
    )?;

    let mut guard = state.borrow_mut();
    guard.subscription.arm_revert(handle);
    guard.revert_callback = Some(callback);
    Ok(())
}

fn revert(state: &Weak<RefCell<FormState>>) {
    // Controller already gone
    let Some(state) = state.upgrade() else {
        return;
    };
    let mut guard = state.borrow_mut();
    let FormState {
        subscription,
        dom,
        content,
        ..
    } = &mut *guard;
    subscription.revert(dom, content);
}

fn inject_stylesheet(document: &Document) -> Result<(), JsValue> {
    let css = markup::stylesheet();
    if let Some(existing) = document.get_element_by_id(STYLE_ELEMENT_ID) {
        existing.set_text_content(Some(&css));
        return Ok(());
    }
    let Some(head) = document.head() else {
        warn!("Document has no head, skipping stylesheet");
        return Ok(());
    };
    let style = document.create_element("style")?;
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(&css));
    head.append_child(&style)?;
    Ok(())
}
