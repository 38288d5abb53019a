//! Profile manager
//!
//! Owns the in-memory cache of all profiles and the active-profile pointer
//! behind one reader/writer lock. Every mutating operation holds the write
//! lock for its whole duration, file I/O included, so the cache and the
//! on-disk set never diverge mid-operation. Callers always receive clones,
//! never references into the cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::warn;
use parking_lot::RwLock;

use super::error::{ProfileError, ProfileResult};
use super::store::ProfileStore;
use super::types::Profile;
use super::validator::Validator;
use crate::state::StateStore;

/// The profiles directory under the user's home, `~/.persona/profiles`.
#[must_use]
pub fn default_profiles_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".persona").join("profiles"))
}

struct Cache {
    profiles: HashMap<String, Profile>,
    active_id: String,
}

/// Handles profile CRUD, validation, inheritance bookkeeping, and
/// active-profile tracking.
pub struct Manager {
    store: ProfileStore,
    validator: Validator,
    state: StateStore,
    cache: RwLock<Cache>,
}

impl Manager {
    /// Create a manager over a profiles directory. The persistent state
    /// file lives in the directory's parent, next to (not inside) the
    /// profile set.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let state_dir = base_dir
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self {
            store: ProfileStore::new(base_dir),
            validator: Validator::new(),
            state: StateStore::new(state_dir),
            cache: RwLock::new(Cache {
                profiles: HashMap::new(),
                active_id: String::new(),
            }),
        }
    }

    /// Set up the profiles directory, bootstrap the default profile on
    /// first run, load all profiles, and restore the saved active profile.
    ///
    /// A saved active ID is accepted only if it resolves in the freshly
    /// loaded cache; a stale pointer is silently ignored. State-tracker
    /// read failures are downgraded to warnings.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the default
    /// profile cannot be written, or the directory scan fails.
    pub fn initialize(&self) -> ProfileResult<()> {
        self.store.ensure_dir()?;

        if !self.store.path_for("default").exists() {
            self.create_default_profile()?;
        }

        self.load_profiles()?;

        match self.state.active_profile() {
            Ok(saved) if !saved.is_empty() => {
                let mut cache = self.cache.write();
                if cache.profiles.contains_key(&saved) {
                    cache.active_id = saved;
                }
            }
            Ok(_) => {}
            Err(err) => warn!("failed to load saved active profile: {err}"),
        }

        Ok(())
    }

    fn create_default_profile(&self) -> ProfileResult<()> {
        let mut profile = Profile::new("default", "Default");
        profile.description = "Default profile".to_string();

        let mut cache = self.cache.write();
        self.save_locked(&mut cache, profile)
    }

    /// Rescan the profiles directory and replace the entire in-memory
    /// cache with the result. Files that fail to parse or validate are
    /// skipped with a warning, never failing the load of the rest.
    ///
    /// If no active profile is set and a `default` profile exists, it
    /// becomes active.
    ///
    /// # Errors
    /// Returns an error only if the directory itself cannot be read.
    pub fn load_profiles(&self) -> ProfileResult<()> {
        let paths = self.store.scan()?;

        let mut cache = self.cache.write();
        let mut profiles = HashMap::new();

        for path in paths {
            let profile = match self.store.load(&path) {
                Ok(profile) => profile,
                Err(err) => {
                    warn!("skipping profile file {}: {err}", path.display());
                    continue;
                }
            };
            if let Err(err) = self.validator.validate(&profile) {
                warn!("skipping invalid profile {}: {err}", path.display());
                continue;
            }
            if path.file_stem().is_some_and(|stem| stem != profile.id.as_str()) {
                warn!(
                    "skipping profile {}: ID {:?} does not match file name",
                    path.display(),
                    profile.id
                );
                continue;
            }
            profiles.insert(profile.id.clone(), profile);
        }

        cache.profiles = profiles;

        if cache.active_id.is_empty() && cache.profiles.contains_key("default") {
            cache.active_id = "default".to_string();
        }

        Ok(())
    }

    /// A copy of the profile with the given ID.
    ///
    /// # Errors
    /// Returns [`ProfileError::NotFound`] if the ID is not cached.
    pub fn get(&self, id: &str) -> ProfileResult<Profile> {
        let cache = self.cache.read();
        cache
            .profiles
            .get(id)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound { id: id.to_string() })
    }

    /// Copies of all cached profiles, sorted by ID.
    #[must_use]
    pub fn list(&self) -> Vec<Profile> {
        let cache = self.cache.read();
        let mut profiles: Vec<Profile> = cache.profiles.values().cloned().collect();
        profiles.sort_unstable_by(|a, b| a.id.cmp(&b.id));
        profiles
    }

    /// A copy of the currently active profile.
    ///
    /// # Errors
    /// Returns [`ProfileError::NoActiveProfile`] when nothing is active and
    /// [`ProfileError::NotFound`] when the active ID no longer resolves in
    /// the cache — the latter signals a consistency error and the caller
    /// must treat it as requiring re-selection.
    pub fn get_active(&self) -> ProfileResult<Profile> {
        let cache = self.cache.read();
        if cache.active_id.is_empty() {
            return Err(ProfileError::NoActiveProfile);
        }
        cache
            .profiles
            .get(&cache.active_id)
            .cloned()
            .ok_or_else(|| ProfileError::NotFound {
                id: cache.active_id.clone(),
            })
    }

    /// The ID of the currently active profile, if any.
    #[must_use]
    pub fn active_id(&self) -> Option<String> {
        let cache = self.cache.read();
        if cache.active_id.is_empty() {
            None
        } else {
            Some(cache.active_id.clone())
        }
    }

    /// Create a new profile, stamping fresh timestamps.
    ///
    /// # Errors
    /// Returns [`ProfileError::AlreadyExists`] if the ID is already cached,
    /// a validation error, or an I/O error from persistence. On any failure
    /// the cache is left unchanged.
    pub fn create(&self, mut profile: Profile) -> ProfileResult<()> {
        let mut cache = self.cache.write();

        if cache.profiles.contains_key(&profile.id) {
            return Err(ProfileError::AlreadyExists { id: profile.id });
        }

        let now = Utc::now();
        profile.created_at = now;
        profile.updated_at = now;

        self.save_locked(&mut cache, profile)
    }

    /// Validate, persist, and cache a profile, bumping `updated_at`.
    ///
    /// If a cached profile with the same ID has a non-zero `created_at`,
    /// that original creation time is preserved — callers cannot rewrite
    /// it.
    ///
    /// # Errors
    /// Returns a validation error or an I/O error from persistence. On any
    /// failure the cache is left unchanged.
    pub fn save(&self, profile: Profile) -> ProfileResult<()> {
        let mut cache = self.cache.write();
        self.save_locked(&mut cache, profile)
    }

    /// Save path shared by all mutating operations; the caller must hold
    /// the write lock.
    fn save_locked(&self, cache: &mut Cache, mut profile: Profile) -> ProfileResult<()> {
        if let Some(existing) = cache.profiles.get(&profile.id) {
            if existing.created_at != DateTime::<Utc>::default() {
                profile.created_at = existing.created_at;
            }
        }

        profile.updated_at = Utc::now();

        self.validator.validate(&profile)?;
        self.store.write(&profile)?;

        cache.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Make the profile with the given ID active.
    ///
    /// The active-ID flip, the usage-stat bump (`last_used`, `usage_count`)
    /// and its persistence all happen inside one write-lock hold. The state
    /// tracker write is best-effort: its failure is logged and never rolls
    /// back the in-memory change.
    ///
    /// # Errors
    /// Returns [`ProfileError::NotFound`] if the ID is not cached, leaving
    /// the previous active profile and all usage counters unchanged.
    pub fn set_active(&self, id: &str) -> ProfileResult<()> {
        let mut cache = self.cache.write();

        let Some(profile) = cache.profiles.get(id) else {
            return Err(ProfileError::NotFound { id: id.to_string() });
        };
        let mut profile = profile.clone();

        cache.active_id = id.to_string();

        if let Err(err) = self.state.set_active_profile(id) {
            warn!("failed to save active profile state: {err}");
        }

        profile.last_used = Some(Utc::now());
        profile.usage_count += 1;

        self.save_locked(&mut cache, profile)
    }

    /// Delete a profile, removing its file first and the cache entry only
    /// after the file removal succeeded.
    ///
    /// # Errors
    /// Returns [`ProfileError::Conflict`] for the `default` profile or the
    /// currently active profile, [`ProfileError::NotFound`] for an unknown
    /// ID, and [`ProfileError::Io`] if the file cannot be removed (in which
    /// case the cache entry is kept, so cache and disk stay in agreement).
    pub fn delete(&self, id: &str) -> ProfileResult<()> {
        let mut cache = self.cache.write();

        if id == "default" {
            return Err(ProfileError::Conflict {
                id: id.to_string(),
                reason: "default".to_string(),
            });
        }
        if id == cache.active_id {
            return Err(ProfileError::Conflict {
                id: id.to_string(),
                reason: "active".to_string(),
            });
        }
        if !cache.profiles.contains_key(id) {
            return Err(ProfileError::NotFound { id: id.to_string() });
        }

        self.store.remove(id)?;
        cache.profiles.remove(id);
        Ok(())
    }

    /// Create a new profile seeded from an existing one.
    ///
    /// Collections (`extensions`, `environment`, `mcp_servers`, `tags`) are
    /// deep-copied so the clone is independently mutable; `inherits`,
    /// `icon` and `color` carry over; usage statistics and `auto_detect`
    /// do not. Delegates to [`Manager::create`], which re-validates and
    /// re-applies the duplicate-ID check against `new_id`.
    ///
    /// # Errors
    /// Returns [`ProfileError::NotFound`] if the source is unknown, plus
    /// anything [`Manager::create`] can return.
    pub fn clone_profile(&self, source_id: &str, new_id: &str, new_name: &str) -> ProfileResult<()> {
        let source = self.get(source_id)?;

        let cloned = Profile {
            id: new_id.to_string(),
            name: new_name.to_string(),
            description: format!("Cloned from {}", source.name),
            icon: source.icon,
            color: source.color,
            extensions: source.extensions,
            environment: source.environment,
            mcp_servers: source.mcp_servers,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
            last_used: None,
            usage_count: 0,
            inherits: source.inherits,
            tags: source.tags,
            auto_detect: None,
        };

        self.create(cloned)
    }

    /// The directory holding the profile files
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.store.dir()
    }

    /// The path of the persistent state file
    #[must_use]
    pub fn state_path(&self) -> &Path {
        self.state.path()
    }
}
