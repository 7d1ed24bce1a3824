//! Spotify Gateway Library
//!
//! This library keeps a single Spotify login alive on the server side and
//! re-exposes a handful of Web API endpoints (listening stats, playback
//! control) under simplified routes. The heart of it is the token lifecycle:
//! acquiring a token pair through the OAuth2 Authorization Code flow, keeping
//! it in memory and refreshing it before it expires.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the gateway routes
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by the token core and the HTTP layer
//! - `management` - Token storage and lifecycle management
//! - `server` - Router assembly and the HTTP server loop
//! - `spotify` - Spotify accounts and Web API client implementation
//! - `telemetry` - Tracing subscriber setup
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod telemetry;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the binary-level plumbing (startup, server loop) where the exact
/// error kind no longer matters and only needs to be reported.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// This macro terminates the process with exit code 1 after printing. Only
/// use it for fatal startup errors where recovery is not possible.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
