//! External collaborators of the studio: authentication, payment, and the
//! creative assistant. The core depends only on the traits; the concrete
//! bindings here are chosen at the composition boundary.

pub mod config;
mod error;
pub mod idea;
pub mod identity;
pub mod payment;

pub use config::{AccountConfig, FirebaseConfig, ServiceConfig};
pub use error::ServiceError;
pub use idea::{GeminiClient, IdeaGenerator};
pub use identity::{
    Identity, IdentityListener, IdentityListeners, IdentityProvider, LocalIdentityProvider,
    SignInProvider, Subscription,
};
pub use payment::{PaymentIntent, PaymentProcessor, SimulatedStripe};
