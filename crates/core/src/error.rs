use studio_transport::SubscriptionTier;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Track limit of {limit} reached on the {tier} tier")]
    CapacityExceeded {
        tier: SubscriptionTier,
        limit: usize,
    },

    #[error("No user is signed in")]
    NotSignedIn,
}

impl SessionError {
    /// Prompt shown to the user when the command is rejected.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::CapacityExceeded {
                tier: SubscriptionTier::Free,
                limit,
            } => format!("Upgrade to Premium to add more than {limit} tracks."),
            SessionError::CapacityExceeded { limit, .. } => {
                format!("You have reached the maximum of {limit} tracks.")
            }
            SessionError::NotSignedIn => "Sign in to open the studio.".to_string(),
        }
    }

    /// Whether the caller should offer the upgrade flow.
    pub fn suggests_upgrade(&self) -> bool {
        matches!(
            self,
            SessionError::CapacityExceeded {
                tier: SubscriptionTier::Free,
                ..
            }
        )
    }
}
