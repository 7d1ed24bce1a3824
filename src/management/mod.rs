//! Session token management.
//!
//! [`TokenStore`] holds the current token pair, [`TokenLifecycleManager`]
//! decides when it needs refreshing and makes sure only one refresh runs at a
//! time.

mod auth;
mod store;

pub use auth::ManagerSettings;
pub use auth::TokenLifecycleManager;
pub use store::TokenStore;
