use serde::{Deserialize, Serialize};
use std::fmt;

pub const FREE_TRACK_LIMIT: usize = 4;
pub const PREMIUM_TRACK_LIMIT: usize = 10;

/// One-time price of the Premium tier, in whole US dollars.
pub const PREMIUM_PRICE_USD: u64 = 15;

/// Subscription level gating feature access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
}

impl SubscriptionTier {
    /// The literal marker written to the durable record.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "Free",
            SubscriptionTier::Premium => "Premium",
        }
    }

    /// Interpret a stored marker. Only an exact `"Premium"` counts; anything
    /// else, including absence, is Free.
    pub fn from_marker(value: Option<&str>) -> Self {
        match value {
            Some("Premium") => SubscriptionTier::Premium,
            _ => SubscriptionTier::Free,
        }
    }

    pub fn is_premium(&self) -> bool {
        matches!(self, SubscriptionTier::Premium)
    }

    pub fn capabilities(self) -> Capabilities {
        capabilities_for(self)
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier-derived limits and feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub track_limit: usize,
    pub vocal_preset_allowed: bool,
    pub creative_assistant_allowed: bool,
}

pub const fn capabilities_for(tier: SubscriptionTier) -> Capabilities {
    match tier {
        SubscriptionTier::Free => Capabilities {
            track_limit: FREE_TRACK_LIMIT,
            vocal_preset_allowed: false,
            creative_assistant_allowed: false,
        },
        SubscriptionTier::Premium => Capabilities {
            track_limit: PREMIUM_TRACK_LIMIT,
            vocal_preset_allowed: true,
            creative_assistant_allowed: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_capabilities() {
        let caps = capabilities_for(SubscriptionTier::Free);
        assert_eq!(caps.track_limit, 4);
        assert!(!caps.vocal_preset_allowed);
        assert!(!caps.creative_assistant_allowed);
    }

    #[test]
    fn test_premium_capabilities() {
        let caps = capabilities_for(SubscriptionTier::Premium);
        assert_eq!(caps.track_limit, 10);
        assert!(caps.vocal_preset_allowed);
        assert!(caps.creative_assistant_allowed);
    }

    #[test]
    fn test_marker_must_match_exactly() {
        assert_eq!(SubscriptionTier::from_marker(Some("Premium")), SubscriptionTier::Premium);
        assert_eq!(SubscriptionTier::from_marker(Some("premium")), SubscriptionTier::Free);
        assert_eq!(SubscriptionTier::from_marker(Some("Premium ")), SubscriptionTier::Free);
        assert_eq!(SubscriptionTier::from_marker(Some("")), SubscriptionTier::Free);
        assert_eq!(SubscriptionTier::from_marker(None), SubscriptionTier::Free);
    }

    #[test]
    fn test_marker_matches_as_str() {
        let tier = SubscriptionTier::Premium;
        assert_eq!(SubscriptionTier::from_marker(Some(tier.as_str())), tier);
        assert_eq!(tier.to_string(), "Premium");
    }

    #[test]
    fn test_default_is_free() {
        assert_eq!(SubscriptionTier::default(), SubscriptionTier::Free);
    }
}
