mod error;
pub mod session;
pub mod studio;
pub mod track_list;
mod user;

pub use error::SessionError;
pub use session::{Applied, Session};
pub use studio::{BoxedStore, Studio};
pub use track_list::TrackList;
pub use user::User;

pub use studio_store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use studio_transport::{
    Capabilities, Command, MixerState, PREMIUM_PRICE_USD, SubscriptionTier, Track, TrackId,
    TransportAction, TransportState, capabilities_for,
};
