//! Reconciles identity and payment events with the session and the durable
//! subscription record. All store access goes through here.

use crate::{Applied, Session, SessionError, User};
use studio_store::{KeyValueStore, clear_subscription, read_subscription, write_subscription};
use studio_transport::{Command, SubscriptionTier};
use tracing::{debug, info, warn};

pub type BoxedStore = Box<dyn KeyValueStore + Send>;

pub struct Studio {
    store: BoxedStore,
    user: Option<User>,
    session: Option<Session>,
}

impl Studio {
    pub fn new(store: BoxedStore) -> Self {
        Self {
            store,
            user: None,
            session: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Free whenever nobody is signed in.
    pub fn tier(&self) -> SubscriptionTier {
        self.session
            .as_ref()
            .map(Session::tier)
            .unwrap_or_default()
    }

    /// Fold an identity notification into the studio.
    ///
    /// A new user gets a fresh session; a repeat notification for the same
    /// user keeps the session and re-applies the persisted tier.
    pub fn identity_changed(&mut self, user: Option<User>) {
        let Some(user) = user else {
            if let Some(previous) = self.user.take() {
                info!(uid = %previous.uid, "User signed out");
            }
            self.session = None;
            return;
        };

        let tier = self.lookup_tier(&user.uid);
        let same_user = self.user.as_ref().is_some_and(|u| u.uid == user.uid);

        if let (true, Some(session)) = (same_user, self.session.as_mut()) {
            session.set_tier(tier);
        } else {
            info!(uid = %user.uid, %tier, "Starting session");
            self.session = Some(Session::new(tier));
        }
        self.user = Some(user);
    }

    /// Apply a confirmed payment: Premium in memory, then best-effort persist.
    pub fn payment_succeeded(&mut self) {
        let (Some(user), Some(session)) = (self.user.as_ref(), self.session.as_mut()) else {
            warn!("Payment confirmed with no signed-in user; ignoring");
            return;
        };

        session.set_tier(SubscriptionTier::Premium);
        info!(uid = %user.uid, "Upgraded to Premium");

        if let Err(e) = write_subscription(&mut self.store, &user.uid, SubscriptionTier::Premium) {
            warn!(uid = %user.uid, error = %e, "Failed to persist subscription");
        }
    }

    /// Erase the current user's durable record, then forget the user.
    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.as_ref() {
            if let Err(e) = clear_subscription(&mut self.store, &user.uid) {
                warn!(uid = %user.uid, error = %e, "Failed to clear subscription record");
            }
        }
        self.identity_changed(None);
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Applied, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NotSignedIn)?;
        debug!(?command, "Dispatching");
        session.apply(command)
    }

    fn lookup_tier(&self, uid: &str) -> SubscriptionTier {
        match read_subscription(&self.store, uid) {
            Ok(tier) => tier,
            Err(e) => {
                warn!(uid, error = %e, "Failed to read subscription record; assuming Free");
                SubscriptionTier::Free
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use studio_store::{MemoryStore, StoreError, subscription_key};
    use studio_transport::TrackId;

    /// Store whose contents stay reachable from the test after the studio
    /// takes ownership of it.
    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.lock().unwrap().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.lock().unwrap().set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.0.lock().unwrap().remove(key)
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("disabled".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disabled".to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disabled".to_string()))
        }
    }

    fn user(uid: &str) -> User {
        User {
            uid: uid.to_string(),
            name: None,
            email: None,
            avatar_url: None,
        }
    }

    fn studio_with(store: &SharedStore) -> Studio {
        Studio::new(Box::new(store.clone()))
    }

    #[test]
    fn test_no_user_means_no_session() {
        let mut studio = Studio::new(Box::new(MemoryStore::new()));
        assert!(studio.session().is_none());
        assert_eq!(studio.tier(), SubscriptionTier::Free);
        assert_eq!(studio.dispatch(Command::AddTrack), Err(SessionError::NotSignedIn));
    }

    #[test]
    fn test_sign_in_reads_persisted_tier() {
        let store = SharedStore::default();
        store
            .0
            .lock()
            .unwrap()
            .set(&subscription_key("u1"), "Premium")
            .unwrap();

        let mut studio = studio_with(&store);
        studio.identity_changed(Some(user("u1")));

        assert_eq!(studio.tier(), SubscriptionTier::Premium);
        assert_eq!(studio.session().expect("session").tracks().len(), 1);
    }

    #[test]
    fn test_payment_persists_then_sign_out_clears() {
        let store = SharedStore::default();
        let mut studio = studio_with(&store);
        studio.identity_changed(Some(user("u1")));
        assert_eq!(studio.tier(), SubscriptionTier::Free);

        studio.payment_succeeded();
        assert_eq!(studio.tier(), SubscriptionTier::Premium);

        let mut fresh = studio_with(&store);
        fresh.identity_changed(Some(user("u1")));
        assert_eq!(fresh.tier(), SubscriptionTier::Premium);

        studio.sign_out();
        assert!(studio.user().is_none());
        assert_eq!(studio.tier(), SubscriptionTier::Free);
        assert_eq!(store.get(&subscription_key("u1")).unwrap(), None);

        let mut fresh = studio_with(&store);
        fresh.identity_changed(Some(user("u1")));
        assert_eq!(fresh.tier(), SubscriptionTier::Free);
    }

    #[test]
    fn test_sign_out_then_other_user_gets_fresh_session() {
        let store = SharedStore::default();
        let mut studio = studio_with(&store);
        studio.identity_changed(Some(user("u1")));
        studio.payment_succeeded();
        studio.dispatch(Command::AddTrack).expect("add");
        studio.dispatch(Command::AddTrack).expect("add");

        studio.sign_out();
        studio.identity_changed(Some(user("u2")));

        assert_eq!(studio.tier(), SubscriptionTier::Free);
        let session = studio.session().expect("session");
        assert_eq!(session.tracks().len(), 1);
        assert_eq!(session.tracks()[0].id, TrackId(1));
    }

    #[test]
    fn test_identity_loss_keeps_durable_record() {
        let store = SharedStore::default();
        let mut studio = studio_with(&store);
        studio.identity_changed(Some(user("u1")));
        studio.payment_succeeded();

        studio.identity_changed(None);

        assert_eq!(studio.tier(), SubscriptionTier::Free);
        assert_eq!(
            store.get(&subscription_key("u1")).unwrap(),
            Some("Premium".to_string())
        );
    }

    #[test]
    fn test_repeat_notification_keeps_session() {
        let store = SharedStore::default();
        let mut studio = studio_with(&store);
        studio.identity_changed(Some(user("u1")));
        studio.dispatch(Command::AddTrack).expect("add");

        studio.identity_changed(Some(user("u1")));

        assert_eq!(studio.session().expect("session").tracks().len(), 2);
    }

    #[test]
    fn test_switching_user_without_sign_out_resets_session() {
        let store = SharedStore::default();
        let mut studio = studio_with(&store);
        studio.identity_changed(Some(user("u1")));
        studio.dispatch(Command::AddTrack).expect("add");

        studio.identity_changed(Some(user("u2")));

        assert_eq!(studio.user().expect("user").uid, "u2");
        assert_eq!(studio.session().expect("session").tracks().len(), 1);
    }

    #[test]
    fn test_broken_store_never_fails_the_session() {
        let mut studio = Studio::new(Box::new(BrokenStore));
        studio.identity_changed(Some(user("u1")));
        assert_eq!(studio.tier(), SubscriptionTier::Free);

        studio.payment_succeeded();
        assert_eq!(studio.tier(), SubscriptionTier::Premium);

        studio.sign_out();
        assert!(studio.user().is_none());
    }

    #[test]
    fn test_payment_without_user_is_ignored() {
        let store = SharedStore::default();
        let mut studio = studio_with(&store);
        studio.payment_succeeded();

        assert_eq!(studio.tier(), SubscriptionTier::Free);
        assert!(store.0.lock().unwrap().is_empty());
    }
}
