use crate::SignInProvider;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} is not configured")]
    ConfigurationMissing(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    #[error("No user is signed in")]
    NotSignedIn,

    #[error("No {0} account is available")]
    UnknownAccount(SignInProvider),
}

impl ServiceError {
    pub fn is_configuration_missing(&self) -> bool {
        matches!(self, ServiceError::ConfigurationMissing(_))
    }
}
