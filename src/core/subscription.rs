//! Email subscription state
//!
//! Purely cosmetic: a valid submission flips the form into a "subscribed"
//! look for a fixed delay, then everything reverts. Nothing is sent
//! anywhere.
//!
//! ```text
//! Idle --(non-empty submit)--> Submitting --(timer)--> Idle
//! ```

use tracing::{debug, trace};

use super::config::ContentConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubscriptionPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// State flipped to submitting; the caller must schedule the revert
    Accepted,
    /// Input was blank, nothing changed
    EmptyInput,
    /// A previous submission is still showing, nothing changed
    InFlight,
}

/// The parts of the form the subscription state touches
pub trait FormSurface {
    fn input_value(&self) -> String;
    fn clear_input(&mut self);
    fn set_button_label(&mut self, label: &str);
    fn set_message_visible(&mut self, visible: bool);
}

/// In-flight flag plus the handle of the pending revert timer
#[derive(Debug)]
pub struct Subscription<T> {
    phase: SubscriptionPhase,
    revert_timer: Option<T>,
}

impl<T> Default for Subscription<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subscription<T> {
    pub fn new() -> Self {
        Self {
            phase: SubscriptionPhase::Idle,
            revert_timer: None,
        }
    }

    pub fn phase(&self) -> SubscriptionPhase {
        self.phase
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == SubscriptionPhase::Submitting
    }

    /// Handle a form submission
    pub fn submit<F: FormSurface + ?Sized>(
        &mut self,
        form: &mut F,
        content: &ContentConfig,
    ) -> SubmitOutcome {
        if self.is_in_flight() {
            trace!("Submission ignored, already subscribed");
            return SubmitOutcome::InFlight;
        }
        if form.input_value().trim().is_empty() {
            trace!("Submission ignored, empty input");
            return SubmitOutcome::EmptyInput;
        }

        self.phase = SubscriptionPhase::Submitting;
        form.set_button_label(&content.button_label_subscribed);
        form.set_message_visible(true);
        debug!("Subscription accepted");
        SubmitOutcome::Accepted
    }

    /// Remember the timer that will call `revert`
    pub fn arm_revert(&mut self, handle: T) {
        self.revert_timer = Some(handle);
    }

    /// Undo an accepted submission. Returns false if there was nothing to undo.
    pub fn revert<F: FormSurface + ?Sized>(&mut self, form: &mut F, content: &ContentConfig) -> bool {
        self.revert_timer = None;
        if !self.is_in_flight() {
            return false;
        }
        form.set_button_label(&content.button_label);
        form.set_message_visible(false);
        form.clear_input();
        self.phase = SubscriptionPhase::Idle;
        debug!("Subscription display reverted");
        true
    }

    /// Take the pending timer handle so teardown can clear it
    pub fn take_revert_timer(&mut self) -> Option<T> {
        self.revert_timer.take()
    }
}
