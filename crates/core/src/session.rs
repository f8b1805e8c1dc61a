use crate::{SessionError, TrackList};
use studio_transport::{
    Capabilities, Command, MixerState, SubscriptionTier, Track, TransportAction, TransportState,
    capabilities_for,
};

/// What a successfully applied command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    TrackAdded(studio_transport::TrackId),
    Updated,
    /// Accepted but had no effect: unknown track id, gated feature, or a
    /// transport action that leaves the state as it was.
    Ignored,
}

impl Applied {
    fn from_changed(changed: bool) -> Self {
        if changed { Applied::Updated } else { Applied::Ignored }
    }
}

/// In-memory model of one editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    tier: SubscriptionTier,
    tracks: TrackList,
    transport: TransportState,
    master: MixerState,
}

impl Session {
    pub fn new(tier: SubscriptionTier) -> Self {
        Self {
            tier,
            tracks: TrackList::with_default_track(),
            transport: TransportState::Idle,
            master: MixerState::default(),
        }
    }

    /// Back to a single default track with the transport stopped. The tier
    /// is kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.tier);
    }

    /// Apply one command. A rejected command leaves the session unchanged.
    pub fn apply(&mut self, command: Command) -> Result<Applied, SessionError> {
        let applied = match command {
            Command::AddTrack => Applied::TrackAdded(self.tracks.add(self.tier)?),
            Command::ToggleArm(id) => Applied::from_changed(self.tracks.toggle_arm(id)),
            Command::ToggleMute(id) => Applied::from_changed(self.tracks.toggle_mute(id)),
            Command::ToggleSolo(id) => Applied::from_changed(self.tracks.toggle_solo(id)),
            Command::ToggleVocalPreset(id) => {
                let capabilities = self.capabilities();
                Applied::from_changed(self.tracks.toggle_vocal_preset(id, capabilities))
            }
            Command::RenameTrack { id, name } => Applied::from_changed(self.tracks.rename(id, name)),
            Command::SetTier(tier) => Applied::from_changed(self.set_tier(tier)),
            Command::Transport(action) => self.transport(action),
            Command::SetMasterVolume(volume) => {
                self.master = self.master.with_volume(volume);
                Applied::Updated
            }
            Command::SetMasterPan(pan) => {
                self.master = self.master.with_pan(pan);
                Applied::Updated
            }
        };
        Ok(applied)
    }

    /// Change the tier. Returns whether it differed. Tracks are kept even if
    /// they exceed the new limit.
    pub fn set_tier(&mut self, tier: SubscriptionTier) -> bool {
        let changed = self.tier != tier;
        self.tier = tier;
        changed
    }

    fn transport(&mut self, action: TransportAction) -> Applied {
        let next = self.transport.apply(action);
        let changed = next != self.transport;
        self.transport = next;
        Applied::from_changed(changed)
    }

    pub fn tier(&self) -> SubscriptionTier {
        self.tier
    }

    /// Derived from the current tier on every call.
    pub fn capabilities(&self) -> Capabilities {
        capabilities_for(self.tier)
    }

    pub fn tracks(&self) -> &[Track] {
        self.tracks.tracks()
    }

    pub fn track_list(&self) -> &TrackList {
        &self.tracks
    }

    pub fn transport_state(&self) -> TransportState {
        self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn is_recording(&self) -> bool {
        self.transport.is_recording()
    }

    pub fn master(&self) -> MixerState {
        self.master
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SubscriptionTier::Free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_transport::TrackId;

    #[test]
    fn test_new_session_has_one_default_track() {
        let session = Session::new(SubscriptionTier::Free);
        assert_eq!(session.tracks().len(), 1);
        assert_eq!(session.tracks()[0].name, "Audio Track 1");
        assert!(!session.is_playing());
        assert!(!session.is_recording());
    }

    #[test]
    fn test_add_track_until_capacity() {
        let mut session = Session::new(SubscriptionTier::Free);
        assert_eq!(session.apply(Command::AddTrack), Ok(Applied::TrackAdded(TrackId(2))));
        assert_eq!(session.apply(Command::AddTrack), Ok(Applied::TrackAdded(TrackId(3))));
        assert_eq!(session.apply(Command::AddTrack), Ok(Applied::TrackAdded(TrackId(4))));

        let before = session.clone();
        let err = session.apply(Command::AddTrack).expect_err("limit");
        assert!(err.suggests_upgrade());
        assert_eq!(err.user_message(), "Upgrade to Premium to add more than 4 tracks.");
        assert_eq!(session, before);
    }

    #[test]
    fn test_premium_capacity_message() {
        let mut session = Session::new(SubscriptionTier::Premium);
        while session.apply(Command::AddTrack).is_ok() {}

        assert_eq!(session.tracks().len(), 10);
        let err = session.apply(Command::AddTrack).expect_err("limit");
        assert!(!err.suggests_upgrade());
        assert_eq!(err.user_message(), "You have reached the maximum of 10 tracks.");
    }

    #[test]
    fn test_capabilities_follow_tier_changes() {
        let mut session = Session::new(SubscriptionTier::Free);
        assert_eq!(session.capabilities().track_limit, 4);

        session.apply(Command::SetTier(SubscriptionTier::Premium)).expect("set tier");
        assert_eq!(session.capabilities().track_limit, 10);
        assert!(session.capabilities().vocal_preset_allowed);
    }

    #[test]
    fn test_set_same_tier_is_ignored() {
        let mut session = Session::new(SubscriptionTier::Free);
        assert_eq!(
            session.apply(Command::SetTier(SubscriptionTier::Free)),
            Ok(Applied::Ignored)
        );
    }

    #[test]
    fn test_set_tier_reports_change_and_keeps_tracks() {
        let mut session = Session::new(SubscriptionTier::Premium);
        while session.apply(Command::AddTrack).is_ok() {}

        assert!(session.set_tier(SubscriptionTier::Free));
        assert!(!session.set_tier(SubscriptionTier::Free));
        assert_eq!(session.tier(), SubscriptionTier::Free);
        assert_eq!(session.tracks().len(), 10);
        assert!(session.apply(Command::AddTrack).is_err());
    }

    #[test]
    fn test_vocal_preset_gated_by_tier() {
        let mut session = Session::new(SubscriptionTier::Free);
        assert_eq!(
            session.apply(Command::ToggleVocalPreset(TrackId(1))),
            Ok(Applied::Ignored)
        );
        assert!(!session.tracks()[0].vocal_preset);

        session.apply(Command::SetTier(SubscriptionTier::Premium)).expect("set tier");
        assert_eq!(
            session.apply(Command::ToggleVocalPreset(TrackId(1))),
            Ok(Applied::Updated)
        );
        assert!(session.tracks()[0].vocal_preset);
    }

    #[test]
    fn test_downgrade_keeps_stale_vocal_preset() {
        let mut session = Session::new(SubscriptionTier::Premium);
        session.apply(Command::ToggleVocalPreset(TrackId(1))).expect("toggle");
        session.apply(Command::SetTier(SubscriptionTier::Free)).expect("set tier");

        assert!(session.tracks()[0].vocal_preset);
        assert!(!session.capabilities().vocal_preset_allowed);
    }

    #[test]
    fn test_transport_commands() {
        let mut session = Session::default();

        session.apply(Command::Transport(TransportAction::Record)).expect("record");
        assert!(session.is_playing());
        assert!(session.is_recording());

        session.apply(Command::Transport(TransportAction::Stop)).expect("stop");
        assert!(!session.is_playing());
        assert!(!session.is_recording());

        assert_eq!(
            session.apply(Command::Transport(TransportAction::Stop)),
            Ok(Applied::Ignored)
        );
    }

    #[test]
    fn test_toggle_mute_twice_restores() {
        let mut session = Session::default();
        session.apply(Command::ToggleMute(TrackId(1))).expect("mute");
        assert!(session.tracks()[0].muted);
        session.apply(Command::ToggleMute(TrackId(1))).expect("unmute");
        assert!(!session.tracks()[0].muted);
    }

    #[test]
    fn test_unknown_track_is_ignored() {
        let mut session = Session::default();
        assert_eq!(session.apply(Command::ToggleSolo(TrackId(9))), Ok(Applied::Ignored));
    }

    #[test]
    fn test_master_mixer_is_clamped() {
        let mut session = Session::default();
        session.apply(Command::SetMasterVolume(140)).expect("volume");
        session.apply(Command::SetMasterPan(-20)).expect("pan");

        assert_eq!(session.master().volume(), 100);
        assert_eq!(session.master().pan(), -20);
    }

    #[test]
    fn test_reset_keeps_tier() {
        let mut session = Session::new(SubscriptionTier::Premium);
        session.apply(Command::AddTrack).expect("add");
        session.apply(Command::Transport(TransportAction::TogglePlay)).expect("play");

        session.reset();

        assert_eq!(session.tier(), SubscriptionTier::Premium);
        assert_eq!(session.tracks().len(), 1);
        assert!(!session.is_playing());
    }
}
