//! The shell the view talks to: navigation, checkout, and the creative
//! assistant layered over the studio core.

mod cancel;
pub mod commands;
pub mod dto;
mod runtime;
pub mod state;

pub use dto::StudioSnapshot;
pub use runtime::{StudioRuntime, build_runtime, open_store};
pub use state::{AppState, CheckoutPhase, View};
