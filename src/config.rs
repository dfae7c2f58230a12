use serde::{Deserialize, Serialize};

use crate::error::{PresenceError, Result};

/// Constants shared by the session and its configuration
pub mod constants {
    /// Asset key of the large icon shown for every update
    pub const DEFAULT_LARGE_IMAGE_KEY: &str = "tjaplayer3";

    /// Prefix put in front of the client version in the large icon tooltip
    pub const VERSION_PREFIX: &str = "Ver.";

    /// Small icon key sent when the caller does not pick one
    ///
    /// The asset does not exist on Discord's side, so the client renders
    /// no small icon at all.
    pub const NO_ICON_KEY: &str = "None";

    /// Longest image key or tooltip the native library keeps intact
    ///
    /// `discord-rpc` copies these fields into 128-byte arrays, including
    /// the trailing NUL. Anything longer is silently truncated.
    pub const MAX_IMAGE_FIELD_LEN: usize = 127;

    /// Scratch bytes one update may hold while the native call runs
    pub const DEFAULT_MAX_SCRATCH_BYTES: usize = 64 * 1024;
}

/// Session-wide settings that are not part of an individual update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Branding icon, never overridable by an update
    pub large_image_key: String,

    /// Tooltip of the branding icon
    pub large_image_text: String,

    /// Small icon key used when an update does not name one
    pub small_image_placeholder: String,

    /// Let the native library register the URL handler for the application
    pub auto_register: bool,

    /// Steam application id used for launch registration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steam_id: Option<String>,

    /// Upper bound on native string memory held during one update
    pub max_scratch_bytes: usize,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self::for_version(env!("CARGO_PKG_VERSION"))
    }
}

impl PresenceConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default branding with the tooltip showing the given client version
    pub fn for_version(version: &str) -> Self {
        Self {
            large_image_key: constants::DEFAULT_LARGE_IMAGE_KEY.to_string(),
            large_image_text: format!("{}{}", constants::VERSION_PREFIX, version),
            small_image_placeholder: constants::NO_ICON_KEY.to_string(),
            auto_register: true,
            steam_id: None,
            max_scratch_bytes: constants::DEFAULT_MAX_SCRATCH_BYTES,
        }
    }

    /// Load a config from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the branding icon key
    pub fn with_large_image_key<S: Into<String>>(mut self, key: S) -> Self {
        self.large_image_key = key.into();
        self
    }

    /// Set the branding icon tooltip
    pub fn with_large_image_text<S: Into<String>>(mut self, text: S) -> Self {
        self.large_image_text = text.into();
        self
    }

    /// Set the small icon key used when an update leaves it out
    pub fn with_small_image_placeholder<S: Into<String>>(mut self, key: S) -> Self {
        self.small_image_placeholder = key.into();
        self
    }

    /// Enable or disable URL handler registration
    pub fn with_auto_register(mut self, auto_register: bool) -> Self {
        self.auto_register = auto_register;
        self
    }

    /// Set the Steam application id
    pub fn with_steam_id<S: Into<String>>(mut self, steam_id: S) -> Self {
        self.steam_id = Some(steam_id.into());
        self
    }

    /// Set the scratch memory bound for one update
    pub fn with_max_scratch_bytes(mut self, max_scratch_bytes: usize) -> Self {
        self.max_scratch_bytes = max_scratch_bytes;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result {
        if self.large_image_key.is_empty() {
            return Err(PresenceError::InvalidConfig(
                "large_image_key must not be empty".to_string(),
            ));
        }

        for (name, value) in [
            ("large_image_key", &self.large_image_key),
            ("large_image_text", &self.large_image_text),
            ("small_image_placeholder", &self.small_image_placeholder),
        ] {
            if value.len() > constants::MAX_IMAGE_FIELD_LEN {
                return Err(PresenceError::InvalidConfig(format!(
                    "{} exceeds {} bytes",
                    name,
                    constants::MAX_IMAGE_FIELD_LEN
                )));
            }
        }

        if self.max_scratch_bytes == 0 {
            return Err(PresenceError::InvalidConfig(
                "max_scratch_bytes must be greater than 0".to_string(),
            ));
        }

        if let Some(steam_id) = &self.steam_id {
            if steam_id.is_empty() || !steam_id.bytes().all(|b| b.is_ascii_digit()) {
                return Err(PresenceError::InvalidConfig(format!(
                    "steam_id must be numeric, got {:?}",
                    steam_id
                )));
            }
        }

        Ok(())
    }
}
