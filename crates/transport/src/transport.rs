use serde::{Deserialize, Serialize};

/// Play/record/stop state of a session.
///
/// Recording always implies playback, so the two flags are derived from a
/// single state instead of being stored separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    #[default]
    Idle,
    Playing,
    Recording,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportAction {
    /// Play/pause button.
    TogglePlay,
    Record,
    Stop,
}

impl TransportState {
    pub fn is_playing(&self) -> bool {
        !matches!(self, TransportState::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, TransportState::Recording)
    }

    pub fn apply(self, action: TransportAction) -> Self {
        match (self, action) {
            (TransportState::Idle, TransportAction::TogglePlay) => TransportState::Playing,
            (TransportState::Playing, TransportAction::TogglePlay) => TransportState::Idle,
            // Pausing is not exposed while recording; stop ends the take.
            (TransportState::Recording, TransportAction::TogglePlay) => TransportState::Recording,
            (_, TransportAction::Record) => TransportState::Recording,
            (_, TransportAction::Stop) => TransportState::Idle,
        }
    }
}
