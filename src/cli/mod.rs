//! # CLI Module
//!
//! User-facing commands of the `spotgate` binary.
//!
//! - [`serve`] - runs the HTTP gateway, optionally opening the consent screen
//! - [`authorize_url`] - prints the consent URL, handy for headless hosts
//!
//! ```bash
//! spotgate serve --open
//! spotgate authorize-url
//! ```

mod authorize;
mod serve;

pub use authorize::authorize_url;
pub use serve::serve;
