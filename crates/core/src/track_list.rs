//! Ordered track collection, testable without a session or any collaborator.

use crate::SessionError;
use studio_transport::{Capabilities, SubscriptionTier, Track, TrackId, capabilities_for};

/// The session's tracks in display order.
///
/// Ids come from a counter that only moves forward, so an id is never
/// handed out twice within one list even if removal is added later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackList {
    tracks: Vec<Track>,
    next_id: u64,
}

impl TrackList {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 1,
        }
    }

    /// A list holding the single armed track every session starts with.
    pub fn with_default_track() -> Self {
        let mut list = Self::new();
        let mut track = Track::with_default_name(list.allocate_id());
        track.armed = true;
        list.tracks.push(track);
        list
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Append a default track if the tier's limit allows it.
    ///
    /// On failure the list is left untouched.
    pub fn add(&mut self, tier: SubscriptionTier) -> Result<TrackId, SessionError> {
        let limit = capabilities_for(tier).track_limit;
        if self.tracks.len() >= limit {
            return Err(SessionError::CapacityExceeded { tier, limit });
        }

        let id = self.allocate_id();
        self.tracks.push(Track::with_default_name(id));
        Ok(id)
    }

    pub fn toggle_arm(&mut self, id: TrackId) -> bool {
        self.update(id, |t| t.armed = !t.armed)
    }

    pub fn toggle_mute(&mut self, id: TrackId) -> bool {
        self.update(id, |t| t.muted = !t.muted)
    }

    pub fn toggle_solo(&mut self, id: TrackId) -> bool {
        self.update(id, |t| t.solo = !t.solo)
    }

    /// Ignored unless `capabilities` allow the preset, regardless of what
    /// the UI shows.
    pub fn toggle_vocal_preset(&mut self, id: TrackId, capabilities: Capabilities) -> bool {
        if !capabilities.vocal_preset_allowed {
            return false;
        }
        self.update(id, |t| t.vocal_preset = !t.vocal_preset)
    }

    pub fn rename(&mut self, id: TrackId, name: String) -> bool {
        self.update(id, |t| t.name = name)
    }

    /// Apply `f` to the track with `id`. Unknown ids are not an error since
    /// they come straight from the caller.
    fn update(&mut self, id: TrackId, f: impl FnOnce(&mut Track)) -> bool {
        match self.tracks.iter_mut().find(|t| t.id == id) {
            Some(track) => {
                f(track);
                true
            }
            None => false,
        }
    }

    fn allocate_id(&mut self) -> TrackId {
        let id = TrackId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for TrackList {
    fn default() -> Self {
        Self::new()
    }
}
