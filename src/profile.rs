//! Named verification profiles

use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use crate::config::VerificationConfig;
use crate::error::ConfigError;

/// Metadata about a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub name: String,
    pub description: String,
}

impl ProfileMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A validated configuration registered under a name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    metadata: ProfileMetadata,
    config: VerificationConfig,
}

impl Profile {
    pub fn new(metadata: ProfileMetadata, config: VerificationConfig) -> Self {
        Self { metadata, config }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn metadata(&self) -> &ProfileMetadata {
        &self.metadata
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }
}

/// Registry of named profiles
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, Profile>,
}

impl ProfileRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the `strict`, `standard`, `lenient` and `single_token` presets
    pub fn with_presets() -> Self {
        let presets = [
            (
                "strict",
                "15 minute window, tight name length guard, positive amount required",
                VerificationConfig::strict(),
            ),
            ("standard", "15 minute window, 80% of name tokens", VerificationConfig::standard()),
            ("lenient", "24 hour window, 70% of name tokens", VerificationConfig::lenient()),
            ("single_token", "24 hour window, one name token is enough", VerificationConfig::single_token()),
        ];

        let mut registry = Self::new();
        for (name, description, config) in presets {
            registry
                .profiles
                .insert(name.to_string(), Profile::new(ProfileMetadata::new(name, description), config));
        }
        registry
    }

    /// Register a new profile after validating its configuration
    pub fn register(&mut self, profile: Profile) -> Result<(), ConfigError> {
        if self.profiles.contains_key(profile.name()) {
            return Err(ConfigError::RegistrationFailed {
                reason: format!("profile {} already exists", profile.name()),
            });
        }

        profile.config.validate()?;

        self.profiles.insert(profile.name().to_string(), profile);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn remove(&mut self, name: &str) -> Option<Profile> {
        self.profiles.remove(name)
    }

    /// Configuration of a named profile, or `ProfileNotFound`
    pub fn resolve(&self, name: &str) -> Result<&VerificationConfig, ConfigError> {
        self.get(name)
            .map(Profile::config)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
