//! Configuration module for Bookkeeper
//!
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BookkeeperPaths;
pub use settings::Settings;
