//! Commands the view dispatches.
//!
//! Each command locks the shell, performs one operation, and returns a
//! [`StudioSnapshot`] to keep the view in sync. Async commands release the
//! lock while a collaborator is working and drop the result if the flow was
//! abandoned in the meantime.

use crate::dto::{PlanSummary, StudioSnapshot, pricing_plans, shell_to_snapshot};
use crate::state::{AppState, Assistant, Checkout, CheckoutPhase, Shell, View};
use std::sync::{Arc, Weak};
use studio_core::{Command, SessionError, TrackId, TransportAction, User};
use studio_services::{
    Identity, IdeaGenerator, IdentityListener, IdentityProvider, PaymentProcessor, ServiceError,
    SignInProvider, Subscription,
};
use tracing::{debug, info, warn};

type CommandResult<T> = Result<T, String>;

const NOT_READY: &str = "Payment is not ready. Please try again.";
const PAYMENT_SUCCEEDED: &str = "Subscription successful! You now have Premium access.";
const ASSISTANT_LOCKED: &str = "Upgrade to Premium to unlock the Creative Assistant.";

/// Snapshot the shell and consume its one-shot notice.
fn respond(shell: &mut Shell) -> StudioSnapshot {
    let snapshot = shell_to_snapshot(shell);
    shell.notice = None;
    snapshot
}

fn user_from_identity(identity: Identity) -> User {
    User {
        uid: identity.id,
        name: identity.display_name,
        email: identity.email,
        avatar_url: identity.photo_url,
    }
}

// ============================================================================
// Auth Commands
// ============================================================================

/// Fold an identity notification into the shell.
pub fn auth_identity_changed<I, P, G>(
    identity: Option<Identity>,
    state: &AppState<I, P, G>,
) -> CommandResult<StudioSnapshot> {
    let mut shell = state.lock()?;
    shell.apply_identity(identity.map(user_from_identity));
    Ok(respond(&mut shell))
}

/// Route the identity provider's notifications into `state`.
///
/// The listener holds only a weak reference; dropping the returned
/// subscription detaches it.
pub fn attach_identity<I, P, G>(state: &Arc<AppState<I, P, G>>) -> Subscription
where
    I: IdentityProvider + 'static,
    P: Send + Sync + 'static,
    G: Send + Sync + 'static,
{
    let weak: Weak<AppState<I, P, G>> = Arc::downgrade(state);
    let listener: IdentityListener = Arc::new(move |identity: Option<Identity>| {
        if let Some(state) = weak.upgrade() {
            if let Err(e) = auth_identity_changed(identity, &state) {
                warn!(error = %e, "Dropped identity notification");
            }
        }
    });
    state.identity.subscribe(listener)
}

/// Show the sign-in dialog.
pub fn auth_open_sign_in<I, P, G>(state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot> {
    let mut shell = state.lock()?;
    shell.sign_in_open = true;
    Ok(respond(&mut shell))
}

/// Dismiss the sign-in dialog.
pub fn auth_close_sign_in<I, P, G>(state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot> {
    let mut shell = state.lock()?;
    shell.sign_in_open = false;
    Ok(respond(&mut shell))
}

/// Sign in through `provider`. Failures are surfaced as a notice and leave
/// the sign-in dialog open.
pub async fn auth_sign_in<I, P, G>(
    provider: SignInProvider,
    state: &AppState<I, P, G>,
) -> CommandResult<StudioSnapshot>
where
    I: IdentityProvider,
{
    let result = state.identity.sign_in(provider).await;

    let mut shell = state.lock()?;
    match result {
        Ok(identity) => shell.apply_identity(Some(user_from_identity(identity))),
        Err(e) => {
            warn!(%provider, error = %e, "Sign-in failed");
            shell.notice = Some(sign_in_failure(&e));
        }
    }
    Ok(respond(&mut shell))
}

fn sign_in_failure(err: &ServiceError) -> String {
    if err.is_configuration_missing() {
        "Sign-in is unavailable: authentication is not configured.".to_string()
    } else {
        format!("Sign-in failed: {err}")
    }
}

/// Erase the durable record, leave the studio, then tell the provider.
pub async fn auth_sign_out<I, P, G>(state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot>
where
    I: IdentityProvider,
{
    {
        let mut shell = state.lock()?;
        shell.studio.sign_out();
        shell.leave_payment();
        shell.leave_studio();
        shell.view = View::Landing;
    }

    if let Err(e) = state.identity.sign_out().await {
        warn!(error = %e, "Identity provider sign-out failed");
    }

    let mut shell = state.lock()?;
    Ok(respond(&mut shell))
}

// ============================================================================
// Navigation Commands
// ============================================================================

/// Get the current state without changing it.
pub fn app_get_state<I, P, G>(state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot> {
    let mut shell = state.lock()?;
    Ok(respond(&mut shell))
}

/// "Go Premium": asks for sign-in first when nobody is signed in.
pub fn app_subscribe<I, P, G>(state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot> {
    let mut shell = state.lock()?;
    open_upgrade(&mut shell);
    Ok(respond(&mut shell))
}

fn open_upgrade(shell: &mut Shell) {
    if shell.studio.user().is_none() {
        shell.sign_in_open = true;
        return;
    }
    if shell.view != View::Payment {
        shell.leave_studio();
        shell.checkout = Checkout::default();
        shell.view = View::Payment;
    }
}

/// The Free and Premium plans with their features.
pub fn app_pricing() -> Vec<PlanSummary> {
    pricing_plans()
}

// ============================================================================
// Track Commands
// ============================================================================

fn dispatch<I, P, G>(command: Command, state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot> {
    let mut shell = state.lock()?;
    match shell.studio.dispatch(command) {
        Ok(applied) => debug!(?applied, "Command applied"),
        Err(SessionError::NotSignedIn) => return Err(SessionError::NotSignedIn.to_string()),
        Err(e) => {
            shell.notice = Some(e.user_message());
            if e.suggests_upgrade() {
                open_upgrade(&mut shell);
            }
        }
    }
    Ok(respond(&mut shell))
}

/// Add a track. At the Free limit this shows the upgrade prompt and opens
/// checkout instead.
pub fn track_add<I, P, G>(state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot> {
    dispatch(Command::AddTrack, state)
}

/// Arm or disarm a track for recording. Several tracks may be armed at once.
pub fn track_toggle_arm<I, P, G>(
    track_id: u64,
    state: &AppState<I, P, G>,
) -> CommandResult<StudioSnapshot> {
    dispatch(Command::ToggleArm(TrackId(track_id)), state)
}

/// Mute or unmute a track.
pub fn track_toggle_mute<I, P, G>(
    track_id: u64,
    state: &AppState<I, P, G>,
) -> CommandResult<StudioSnapshot> {
    dispatch(Command::ToggleMute(TrackId(track_id)), state)
}

/// Solo or unsolo a track.
pub fn track_toggle_solo<I, P, G>(
    track_id: u64,
    state: &AppState<I, P, G>,
) -> CommandResult<StudioSnapshot> {
    dispatch(Command::ToggleSolo(TrackId(track_id)), state)
}

/// Toggle the real-time vocal preset on a track. Ignored on the Free tier.
pub fn track_toggle_vocal_preset<I, P, G>(
    track_id: u64,
    state: &AppState<I, P, G>,
) -> CommandResult<StudioSnapshot> {
    dispatch(Command::ToggleVocalPreset(TrackId(track_id)), state)
}

/// Rename a track.
pub fn track_rename<I, P, G>(
    track_id: u64,
    name: String,
    state: &AppState<I, P, G>,
) -> CommandResult<StudioSnapshot> {
    dispatch(
        Command::RenameTrack {
            id: TrackId(track_id),
            name,
        },
        state,
    )
}

/// Set the master volume (0 to 100).
pub fn mixer_set_master_volume<I, P, G>(
    volume: i32,
    state: &AppState<I, P, G>,
) -> CommandResult<StudioSnapshot> {
    dispatch(Command::SetMasterVolume(volume), state)
}

/// Set the master pan (-100 to 100).
pub fn mixer_set_master_pan<I, P, G>(
    pan: i32,
    state: &AppState<I, P, G>,
) -> CommandResult<StudioSnapshot> {
    dispatch(Command::SetMasterPan(pan), state)
}

// ============================================================================
// Transport Commands
// ============================================================================

/// Start or pause playback. Ignored while recording; use stop.
pub fn transport_toggle_play<I, P, G>(state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot> {
    dispatch(Command::Transport(TransportAction::TogglePlay), state)
}

/// Start recording, starting playback with it.
pub fn transport_record<I, P, G>(state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot> {
    dispatch(Command::Transport(TransportAction::Record), state)
}

/// Stop playback and recording.
pub fn transport_stop<I, P, G>(state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot> {
    dispatch(Command::Transport(TransportAction::Stop), state)
}

// ============================================================================
// Checkout Commands
// ============================================================================

/// Create the payment intent when the payment page opens. Ignored while a
/// payment is processing so the pending confirmation still lands.
pub async fn checkout_begin<I, P, G>(state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot>
where
    P: PaymentProcessor,
{
    let ticket = {
        let mut shell = state.lock()?;
        if shell.view != View::Payment {
            return Err("Checkout is not open".to_string());
        }
        if shell.checkout.phase == CheckoutPhase::Processing {
            return Ok(respond(&mut shell));
        }
        shell.checkout = Checkout {
            phase: CheckoutPhase::Initializing,
            ..Checkout::default()
        };
        shell.checkout_generation.begin()
    };

    let result = state.payments.create_payment_intent().await;

    let mut shell = state.lock()?;
    if !shell.checkout_generation.is_current(ticket) {
        debug!("Discarding payment intent for an abandoned checkout");
        return Ok(respond(&mut shell));
    }
    shell.checkout = match result {
        Ok(intent) => Checkout {
            phase: CheckoutPhase::Ready,
            intent: Some(intent),
            error: None,
        },
        Err(e) if e.is_configuration_missing() => Checkout {
            phase: CheckoutPhase::Unavailable,
            intent: None,
            error: Some(
                "Payment processing is not enabled. Provide STRIPE_PUBLISHABLE_KEY to enable it."
                    .to_string(),
            ),
        },
        Err(e) => {
            warn!(error = %e, "Failed to create payment intent");
            Checkout {
                phase: CheckoutPhase::Failed,
                intent: None,
                error: Some(format!("Failed to initialize payment: {e}")),
            }
        }
    };
    Ok(respond(&mut shell))
}

/// Confirm the payment. On success the user is upgraded and returned to
/// the studio.
pub async fn checkout_pay<I, P, G>(state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot>
where
    P: PaymentProcessor,
{
    let (ticket, intent) = {
        let mut shell = state.lock()?;
        let ready = shell.view == View::Payment && shell.checkout.phase == CheckoutPhase::Ready;
        let Some(intent) = shell.checkout.intent.clone().filter(|_| ready) else {
            shell.checkout.error = Some(NOT_READY.to_string());
            return Ok(respond(&mut shell));
        };
        shell.checkout.phase = CheckoutPhase::Processing;
        shell.checkout.error = None;
        (shell.checkout_generation.begin(), intent)
    };

    let result = state.payments.confirm_payment(&intent).await;

    let mut shell = state.lock()?;
    if !shell.checkout_generation.is_current(ticket) {
        debug!("Discarding payment confirmation for an abandoned checkout");
        return Ok(respond(&mut shell));
    }
    match result {
        Ok(()) => {
            shell.studio.payment_succeeded();
            shell.leave_payment();
            shell.view = shell.home_view();
            shell.notice = Some(PAYMENT_SUCCEEDED.to_string());
        }
        Err(e) => {
            warn!(error = %e, "Payment confirmation failed");
            shell.checkout.phase = CheckoutPhase::Ready;
            shell.checkout.error = Some(e.to_string());
        }
    }
    Ok(respond(&mut shell))
}

/// Leave the payment page. Ignored while a payment is processing.
pub fn checkout_go_back<I, P, G>(state: &AppState<I, P, G>) -> CommandResult<StudioSnapshot> {
    let mut shell = state.lock()?;
    if shell.checkout.phase == CheckoutPhase::Processing {
        return Ok(respond(&mut shell));
    }
    shell.leave_payment();
    shell.view = shell.home_view();
    Ok(respond(&mut shell))
}

// ============================================================================
// Creative Assistant Commands
// ============================================================================

/// Ask for an idea about `topic`. Blank topics are ignored.
pub async fn assistant_generate<I, P, G>(
    topic: String,
    state: &AppState<I, P, G>,
) -> CommandResult<StudioSnapshot>
where
    G: IdeaGenerator,
{
    let topic = topic.trim().to_string();

    let ticket = {
        let mut shell = state.lock()?;
        if topic.is_empty() || shell.view != View::Studio {
            return Ok(respond(&mut shell));
        }
        let allowed = shell
            .studio
            .session()
            .is_some_and(|s| s.capabilities().creative_assistant_allowed);
        if !allowed {
            shell.notice = Some(ASSISTANT_LOCKED.to_string());
            return Ok(respond(&mut shell));
        }
        shell.assistant = Assistant {
            topic: topic.clone(),
            loading: true,
            ..Assistant::default()
        };
        shell.assistant_generation.begin()
    };

    let result = state.ideas.generate_idea(&topic).await;

    let mut shell = state.lock()?;
    if !shell.assistant_generation.is_current(ticket) {
        debug!(%topic, "Discarding idea for an abandoned request");
        return Ok(respond(&mut shell));
    }
    shell.assistant.loading = false;
    match result {
        Ok(idea) => {
            info!(%topic, "Generated idea");
            shell.assistant.idea = Some(idea);
        }
        Err(e) if e.is_configuration_missing() => {
            shell.assistant.error =
                Some("API Key is not configured. The Creative Assistant is unavailable.".to_string());
        }
        Err(e) => {
            warn!(%topic, error = %e, "Idea generation failed");
            shell.assistant.error = Some(format!("Error generating idea: {e}"));
        }
    }
    Ok(respond(&mut shell))
}
