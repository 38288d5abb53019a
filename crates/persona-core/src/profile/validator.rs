//! Profile business-rule validation

use std::collections::HashSet;

use super::error::{ProfileError, ProfileResult};
use super::types::Profile;

/// Validates profile configurations before they are persisted or cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Create a new profile validator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Check a profile against the field-level business rules.
    ///
    /// # Errors
    /// Returns [`ProfileError::Validation`] naming the offending field when
    /// any rule is violated.
    pub fn validate(&self, profile: &Profile) -> ProfileResult<()> {
        if profile.id.is_empty() {
            return Err(ProfileError::validation("id", "profile ID is required"));
        }
        if !profile.id.chars().all(is_id_char) {
            return Err(ProfileError::validation(
                "id",
                "invalid profile ID format (use lowercase letters, numbers, and hyphens)",
            ));
        }
        if profile.id.len() > 64 {
            return Err(ProfileError::validation(
                "id",
                "profile ID must be 64 characters or less",
            ));
        }

        if profile.name.is_empty() {
            return Err(ProfileError::validation("name", "profile name is required"));
        }
        if profile.name.chars().count() > 100 {
            return Err(ProfileError::validation(
                "name",
                "profile name must be 100 characters or less",
            ));
        }

        // Shallow circular-inheritance check: walk the list left to right
        // with a seen set seeded with the profile's own ID. This is a
        // single-pass check; it does not follow parent profiles' own
        // inherits lists, so multi-hop cycles (A inherits B, B inherits A)
        // are not detected here.
        if !profile.inherits.is_empty() {
            let mut seen: HashSet<&str> = HashSet::new();
            seen.insert(profile.id.as_str());
            for parent_id in &profile.inherits {
                if !seen.insert(parent_id.as_str()) {
                    return Err(ProfileError::validation(
                        "inherits",
                        "circular inheritance detected",
                    ));
                }
            }
        }

        if let Some(auto_detect) = &profile.auto_detect {
            for (i, pattern) in auto_detect.patterns.iter().enumerate() {
                if pattern.is_empty() {
                    return Err(ProfileError::validation(
                        format!("auto_detect.patterns[{i}]"),
                        "empty pattern not allowed",
                    ));
                }
            }
        }

        Ok(())
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}
