//! The durable subscription record: one key per user, holding the tier marker.

use crate::{KeyValueStore, StoreError};
use studio_transport::SubscriptionTier;

pub fn subscription_key(user_id: &str) -> String {
    format!("subscription_{user_id}")
}

/// Tier recorded for `user_id`. Absence or any non-Premium value is Free.
pub fn read_subscription(
    store: &dyn KeyValueStore,
    user_id: &str,
) -> Result<SubscriptionTier, StoreError> {
    let value = store.get(&subscription_key(user_id))?;
    Ok(SubscriptionTier::from_marker(value.as_deref()))
}

/// Record `tier` for `user_id`. Free is represented by the absence of a record.
pub fn write_subscription(
    store: &mut dyn KeyValueStore,
    user_id: &str,
    tier: SubscriptionTier,
) -> Result<(), StoreError> {
    let key = subscription_key(user_id);
    match tier {
        SubscriptionTier::Premium => store.set(&key, tier.as_str()),
        SubscriptionTier::Free => store.remove(&key),
    }
}

pub fn clear_subscription(store: &mut dyn KeyValueStore, user_id: &str) -> Result<(), StoreError> {
    tracing::debug!(user_id, "Clearing subscription record");
    store.remove(&subscription_key(user_id))
}
