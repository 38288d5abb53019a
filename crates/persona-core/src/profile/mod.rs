//! Profile types and operations

mod error;
mod manager;
mod store;
mod types;
mod validator;

pub use error::{ProfileError, ProfileResult};
pub use manager::{default_profiles_dir, Manager};
pub use store::ProfileStore;
pub use types::{AutoDetectRules, ExtensionRef, Profile, ServerConfig};
pub use validator::Validator;
