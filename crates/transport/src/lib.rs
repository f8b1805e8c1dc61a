mod tier;
mod transport;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use tier::{
    Capabilities, FREE_TRACK_LIMIT, PREMIUM_PRICE_USD, PREMIUM_TRACK_LIMIT, SubscriptionTier,
    capabilities_for,
};
pub use transport::{TransportAction, TransportState};

/// Session-unique track identifier. Starts at 1 and is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One channel in a session's track list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub muted: bool,
    pub solo: bool,
    pub armed: bool,
    /// Real-time vocal preset. Only switchable on Premium; a stale `true`
    /// after a downgrade is kept but inert.
    pub vocal_preset: bool,
}

impl Track {
    pub fn new(id: TrackId, name: String) -> Self {
        Self {
            id,
            name,
            muted: false,
            solo: false,
            armed: false,
            vocal_preset: false,
        }
    }

    /// A track named `"Audio Track {id}"`.
    pub fn with_default_name(id: TrackId) -> Self {
        Self::new(id, format!("Audio Track {}", id.0))
    }
}

pub const MIXER_VOLUME_MAX: u8 = 100;
pub const MIXER_PAN_LIMIT: i8 = 100;

/// Volume (0..=100) and pan (-100 left ..= 100 right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixerState {
    volume: u8,
    pan: i8,
}

impl MixerState {
    /// Out-of-range values are clamped.
    pub fn new(volume: i32, pan: i32) -> Self {
        Self {
            volume: volume.clamp(0, MIXER_VOLUME_MAX as i32) as u8,
            pan: pan.clamp(-(MIXER_PAN_LIMIT as i32), MIXER_PAN_LIMIT as i32) as i8,
        }
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn pan(&self) -> i8 {
        self.pan
    }

    pub fn with_volume(self, volume: i32) -> Self {
        Self::new(volume, self.pan as i32)
    }

    pub fn with_pan(self, pan: i32) -> Self {
        Self::new(self.volume as i32, pan)
    }
}

impl Default for MixerState {
    fn default() -> Self {
        Self { volume: 80, pan: 0 }
    }
}

/// Every mutation a session accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTrack,
    ToggleArm(TrackId),
    ToggleMute(TrackId),
    ToggleSolo(TrackId),
    ToggleVocalPreset(TrackId),
    RenameTrack { id: TrackId, name: String },
    SetTier(SubscriptionTier),
    Transport(TransportAction),
    SetMasterVolume(i32),
    SetMasterPan(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_track_name() {
        let track = Track::with_default_name(TrackId(3));
        assert_eq!(track.name, "Audio Track 3");
        assert!(!track.muted);
        assert!(!track.solo);
        assert!(!track.armed);
        assert!(!track.vocal_preset);
    }

    #[test]
    fn test_mixer_clamps_out_of_range() {
        let mixer = MixerState::new(150, -300);
        assert_eq!(mixer.volume(), 100);
        assert_eq!(mixer.pan(), -100);

        let mixer = MixerState::new(-5, 250);
        assert_eq!(mixer.volume(), 0);
        assert_eq!(mixer.pan(), 100);
    }

    #[test]
    fn test_mixer_setters_keep_other_field() {
        let mixer = MixerState::default().with_pan(-40);
        assert_eq!(mixer.volume(), 80);
        assert_eq!(mixer.pan(), -40);

        let mixer = mixer.with_volume(55);
        assert_eq!(mixer.volume(), 55);
        assert_eq!(mixer.pan(), -40);
    }

    #[test]
    fn test_tier_serializes_as_marker() {
        let json = serde_json::to_string(&SubscriptionTier::Premium).expect("serialize");
        assert_eq!(json, "\"Premium\"");
    }
}
