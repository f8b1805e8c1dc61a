//! Application state shared by all commands.

use crate::cancel::Generation;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use studio_core::{BoxedStore, Studio, User};
use studio_services::PaymentIntent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Marketing page: hero, how-it-works, pricing.
    #[default]
    Landing,
    Studio,
    Payment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutPhase {
    /// No checkout in progress.
    #[default]
    Closed,
    Initializing,
    Ready,
    Processing,
    /// Intent creation failed; the page shows the error.
    Failed,
    /// No payment key configured.
    Unavailable,
}

#[derive(Debug, Clone, Default)]
pub struct Checkout {
    pub phase: CheckoutPhase,
    pub intent: Option<PaymentIntent>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Assistant {
    pub topic: String,
    pub idea: Option<String>,
    pub error: Option<String>,
    pub loading: bool,
}

/// Everything the view renders, behind one lock.
pub struct Shell {
    pub studio: Studio,
    pub view: View,
    /// True until the identity provider has reported for the first time.
    pub loading: bool,
    pub sign_in_open: bool,
    /// One-shot message for the user, cleared once it has been returned.
    pub notice: Option<String>,
    pub checkout: Checkout,
    pub assistant: Assistant,
    pub(crate) checkout_generation: Generation,
    pub(crate) assistant_generation: Generation,
}

impl Shell {
    pub fn new(store: BoxedStore) -> Self {
        Self {
            studio: Studio::new(store),
            view: View::Landing,
            loading: true,
            sign_in_open: false,
            notice: None,
            checkout: Checkout::default(),
            assistant: Assistant::default(),
            checkout_generation: Generation::default(),
            assistant_generation: Generation::default(),
        }
    }

    pub(crate) fn apply_identity(&mut self, user: Option<User>) {
        self.loading = false;

        let Some(user) = user else {
            self.studio.identity_changed(None);
            self.leave_payment();
            self.leave_studio();
            self.view = View::Landing;
            return;
        };

        let switching = self.studio.user().is_none_or(|current| current.uid != user.uid);
        if switching {
            self.leave_payment();
            self.leave_studio();
            self.view = View::Studio;
        }
        self.studio.identity_changed(Some(user));
        self.sign_in_open = false;
    }

    /// Drop the checkout page and anything still in flight for it.
    pub(crate) fn leave_payment(&mut self) {
        self.checkout_generation.invalidate();
        self.checkout = Checkout::default();
    }

    pub(crate) fn leave_studio(&mut self) {
        self.assistant_generation.invalidate();
        self.assistant = Assistant::default();
    }

    /// Where to go when the payment page closes.
    pub(crate) fn home_view(&self) -> View {
        if self.studio.user().is_some() {
            View::Studio
        } else {
            View::Landing
        }
    }
}

/// Shared application state.
///
/// The shell lock is never held across an `.await`; async commands take a
/// ticket, release the lock, and re-check the ticket when they resume.
pub struct AppState<I, P, G> {
    pub(crate) shell: Mutex<Shell>,
    pub(crate) identity: I,
    pub(crate) payments: P,
    pub(crate) ideas: G,
}

impl<I, P, G> AppState<I, P, G> {
    pub fn new(store: BoxedStore, identity: I, payments: P, ideas: G) -> Self {
        Self {
            shell: Mutex::new(Shell::new(store)),
            identity,
            payments,
            ideas,
        }
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Shell>, String> {
        self.shell
            .lock()
            .map_err(|_| "Failed to acquire session lock".to_string())
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn payments(&self) -> &P {
        &self.payments
    }

    pub fn ideas(&self) -> &G {
        &self.ideas
    }
}
