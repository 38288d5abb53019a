//! Persona Core - Profile engine and settings generation
//!
//! This crate provides concurrency-safe profile management (CRUD,
//! validation, active-profile tracking, atomic persistence) and the
//! projection of a profile plus its enabled extensions into the settings
//! document consumed by the downstream CLI.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod extension;
pub mod profile;
pub mod settings;
pub mod state;
pub mod util;

pub use extension::Extension;
pub use profile::{Manager, Profile};
pub use settings::{SettingsDocument, SettingsGenerator};
