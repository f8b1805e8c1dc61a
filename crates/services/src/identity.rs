//! Authentication collaborator.
//!
//! The studio only needs to hear when an identity appears or disappears.
//! Providers publish through [`IdentityListeners`], which replays the current
//! identity to every new subscriber the way hosted auth SDKs do.

use crate::config::{AccountConfig, FirebaseConfig, ServiceConfig};
use crate::ServiceError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl From<&AccountConfig> for Identity {
    fn from(account: &AccountConfig) -> Self {
        Self {
            id: account.uid.clone(),
            display_name: account.display_name.clone(),
            email: account.email.clone(),
            photo_url: account.photo_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignInProvider {
    Google,
    Apple,
}

impl fmt::Display for SignInProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignInProvider::Google => f.write_str("Google"),
            SignInProvider::Apple => f.write_str("Apple"),
        }
    }
}

pub type IdentityListener = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

pub trait IdentityProvider: Send + Sync {
    /// Register `listener`. It is called with the current identity right
    /// away and again on every change until the returned handle is dropped.
    fn subscribe(&self, listener: IdentityListener) -> Subscription;

    fn sign_in(
        &self,
        provider: SignInProvider,
    ) -> impl Future<Output = Result<Identity, ServiceError>> + Send;

    fn sign_out(&self) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Unsubscribes when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[derive(Default)]
struct Registry {
    current: Option<Identity>,
    listeners: BTreeMap<u64, IdentityListener>,
    next_id: u64,
}

/// Current identity plus its listeners. Listeners are always invoked with
/// the lock released so they may call back into the provider.
#[derive(Clone, Default)]
pub struct IdentityListeners {
    inner: Arc<Mutex<Registry>>,
}

impl IdentityListeners {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Option<Identity> {
        self.lock().current.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    pub fn subscribe(&self, listener: IdentityListener) -> Subscription {
        let (id, current) = {
            let mut registry = self.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.insert(id, listener.clone());
            (id, registry.current.clone())
        };

        listener(current);

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .listeners
                    .remove(&id);
            }
        })
    }

    pub fn publish(&self, identity: Option<Identity>) {
        let listeners: Vec<IdentityListener> = {
            let mut registry = self.lock();
            registry.current = identity.clone();
            registry.listeners.values().cloned().collect()
        };

        for listener in listeners {
            listener(identity.clone());
        }
    }
}

/// In-process identity provider signing in as accounts from the config.
///
/// Disabled, like the hosted SDK it stands in for, when the Firebase
/// settings are missing or still placeholders.
pub struct LocalIdentityProvider {
    enabled: bool,
    accounts: HashMap<SignInProvider, Identity>,
    listeners: IdentityListeners,
}

impl LocalIdentityProvider {
    pub fn new(firebase: &FirebaseConfig) -> Self {
        let enabled = firebase.is_configured();
        if !enabled {
            tracing::warn!("Firebase configuration is missing; authentication is disabled");
        }
        Self {
            enabled,
            accounts: HashMap::new(),
            listeners: IdentityListeners::new(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        config
            .accounts
            .iter()
            .fold(Self::new(&config.firebase), |provider, account| {
                provider.with_account(account.provider, Identity::from(account))
            })
    }

    pub fn with_account(mut self, provider: SignInProvider, identity: Identity) -> Self {
        self.accounts.insert(provider, identity);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn subscribe(&self, listener: IdentityListener) -> Subscription {
        self.listeners.subscribe(listener)
    }

    async fn sign_in(&self, provider: SignInProvider) -> Result<Identity, ServiceError> {
        if !self.enabled {
            return Err(ServiceError::ConfigurationMissing("Firebase authentication"));
        }
        let identity = self
            .accounts
            .get(&provider)
            .cloned()
            .ok_or(ServiceError::UnknownAccount(provider))?;

        info!(uid = %identity.id, %provider, "Signed in");
        self.listeners.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        if self.listeners.current().is_some() {
            self.listeners.publish(None);
        }
        Ok(())
    }
}
