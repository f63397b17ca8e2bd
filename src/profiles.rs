//! Power profile library loading.

use std::collections::HashMap;
use std::path::Path;

use crate::energy::power_model::PowerProfile;

/// Name under which the built-in preset is always available.
pub const DEFAULT_PROFILE_NAME: &str = "cc2420";

/// Named collection of power profiles, keyed by the names scenarios use.
#[derive(Debug, Clone)]
pub struct ProfileLibrary {
    profiles: HashMap<String, PowerProfile>,
}

impl ProfileLibrary {
    /// Library containing only the built-in preset.
    pub fn builtin() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(DEFAULT_PROFILE_NAME.to_string(), PowerProfile::cc2420());
        Self { profiles }
    }

    /// Load additional profiles from a TOML file on top of the built-in
    /// preset. File entries may shadow the preset by reusing its name.
    ///
    /// # Arguments
    /// * `path` - Path to the profiles.toml file
    ///
    /// # Returns
    /// * `Ok(ProfileLibrary)` if the file was loaded and every profile is valid
    /// * `Err(String)` with a descriptive error message otherwise
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path).map_err(|e| format!("Failed to read profiles file: {}", e))?;
        Self::parse(&content)
    }

    /// Parse a profile library from a TOML string.
    pub fn parse(content: &str) -> Result<Self, String> {
        let loaded: HashMap<String, PowerProfile> = toml::from_str(content).map_err(|e| format!("Failed to parse profiles file: {}", e))?;

        let mut library = Self::builtin();
        for (name, profile) in loaded {
            profile.validate().map_err(|e| format!("profile '{}': {}", name, e))?;
            library.profiles.insert(name, profile);
        }
        Ok(library)
    }

    /// Resolves a scenario's profile reference; `None` means the preset.
    pub fn resolve(&self, name: Option<&str>) -> Result<&PowerProfile, String> {
        let name = name.unwrap_or(DEFAULT_PROFILE_NAME);
        self.profiles.get(name).ok_or_else(|| format!("unknown power profile '{}'", name))
    }
}
