//! Data Transfer Objects returned to the view.
//!
//! Serialized to camelCase JSON. A snapshot is a complete picture of the
//! shell at one point in time, so the view never needs a follow-up query.

use crate::state::{CheckoutPhase, Shell, View};
use serde::Serialize;
use studio_core::{
    Capabilities, PREMIUM_PRICE_USD, Session, SubscriptionTier, Track, User, capabilities_for,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioSnapshot {
    pub view: View,
    pub is_loading: bool,
    pub sign_in_open: bool,
    pub notice: Option<String>,
    pub user: Option<UserSummary>,
    pub tier: SubscriptionTier,
    pub capabilities: CapabilitiesSummary,
    pub session: Option<SessionSummary>,
    pub checkout: CheckoutSummary,
    pub assistant: AssistantSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub uid: String,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesSummary {
    pub track_limit: usize,
    pub vocal_preset_allowed: bool,
    pub creative_assistant_allowed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub tracks: Vec<TrackSummary>,
    pub track_count: usize,
    pub track_limit: usize,
    pub is_playing: bool,
    pub is_recording: bool,
    pub master_volume: u8,
    pub master_pan: i8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub id: u64,
    /// Zero-padded id shown next to the name.
    pub label: String,
    pub name: String,
    pub is_muted: bool,
    pub is_solo: bool,
    pub is_armed: bool,
    pub use_vocal_preset: bool,
    /// The preset flag only has an effect while the tier allows it.
    pub vocal_preset_active: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub phase: CheckoutPhase,
    pub client_secret: Option<String>,
    pub amount_cents: u64,
    pub currency: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantSummary {
    pub topic: String,
    pub idea: Option<String>,
    pub error: Option<String>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub tier: SubscriptionTier,
    pub price_usd: u64,
    pub billing: String,
    pub description: String,
    pub features: Vec<String>,
}

impl From<Capabilities> for CapabilitiesSummary {
    fn from(caps: Capabilities) -> Self {
        Self {
            track_limit: caps.track_limit,
            vocal_preset_allowed: caps.vocal_preset_allowed,
            creative_assistant_allowed: caps.creative_assistant_allowed,
        }
    }
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            uid: user.uid.clone(),
            display_name: user.display_name().to_string(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

fn track_summary(track: &Track, caps: Capabilities) -> TrackSummary {
    TrackSummary {
        id: track.id.0,
        label: format!("{:02}", track.id.0),
        name: track.name.clone(),
        is_muted: track.muted,
        is_solo: track.solo,
        is_armed: track.armed,
        use_vocal_preset: track.vocal_preset,
        vocal_preset_active: track.vocal_preset && caps.vocal_preset_allowed,
    }
}

fn session_summary(session: &Session) -> SessionSummary {
    let caps = session.capabilities();
    SessionSummary {
        tracks: session
            .tracks()
            .iter()
            .map(|track| track_summary(track, caps))
            .collect(),
        track_count: session.tracks().len(),
        track_limit: caps.track_limit,
        is_playing: session.is_playing(),
        is_recording: session.is_recording(),
        master_volume: session.master().volume(),
        master_pan: session.master().pan(),
    }
}

/// Convert the shell into a snapshot.
///
/// This is the conversion used by every command.
pub fn shell_to_snapshot(shell: &Shell) -> StudioSnapshot {
    let tier = shell.studio.tier();
    let intent = shell.checkout.intent.as_ref();

    StudioSnapshot {
        view: shell.view,
        is_loading: shell.loading,
        sign_in_open: shell.sign_in_open,
        notice: shell.notice.clone(),
        user: shell.studio.user().map(UserSummary::from),
        tier,
        capabilities: capabilities_for(tier).into(),
        session: shell.studio.session().map(session_summary),
        checkout: CheckoutSummary {
            phase: shell.checkout.phase,
            client_secret: intent.map(|i| i.client_secret.clone()),
            amount_cents: intent.map_or(PREMIUM_PRICE_USD * 100, |i| i.amount_cents),
            currency: intent.map_or_else(|| "usd".to_string(), |i| i.currency.clone()),
            error: shell.checkout.error.clone(),
        },
        assistant: AssistantSummary {
            topic: shell.assistant.topic.clone(),
            idea: shell.assistant.idea.clone(),
            error: shell.assistant.error.clone(),
            is_loading: shell.assistant.loading,
        },
    }
}

/// The plan table shown on the landing page.
pub fn pricing_plans() -> Vec<PlanSummary> {
    let free = capabilities_for(SubscriptionTier::Free);
    let premium = capabilities_for(SubscriptionTier::Premium);
    vec![
        PlanSummary {
            tier: SubscriptionTier::Free,
            price_usd: 0,
            billing: "forever".to_string(),
            description: "Perfect for starting out and basic projects.".to_string(),
            features: vec![
                format!("{} Audio Tracks", free.track_limit),
                "Drag & Drop Interface".to_string(),
                "Save to Device".to_string(),
            ],
        },
        PlanSummary {
            tier: SubscriptionTier::Premium,
            price_usd: PREMIUM_PRICE_USD,
            billing: "one-time".to_string(),
            description: "Unlock the full potential of your mobile studio with all features."
                .to_string(),
            features: vec![
                format!("{} Audio Tracks", premium.track_limit),
                "Real-time Vocal Preset".to_string(),
                "AI Creative Assistant".to_string(),
            ],
        },
    ]
}
