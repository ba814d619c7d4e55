//! Resolver configuration from `ogmeta.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error.rs   # ConfigError, ConfigDiagnostics
//! ├── field.rs   # FieldPath
//! └── mod.rs     # OgConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! [defaults]
//! type = "article"          # og:type when no annotation sets it
//! description_limit = 200   # max characters of the computed og:description
//! images = true             # derive og:image from image attachments
//! ```

mod error;
mod field;

pub use error::{ConfigDiagnostics, ConfigError};
pub use field::FieldPath;

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::log;
use crate::og::abbreviate::{DEFAULT_LIMIT, MIN_LIMIT};

/// File looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ogmeta.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing ogmeta.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OgConfig {
    /// Computed default settings
    pub defaults: DefaultsConfig,
}

/// `[defaults]` section: how missing properties are completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Value of `og:type` when no annotation sets it.
    #[serde(rename = "type")]
    pub og_type: String,

    /// Maximum length (in characters, marker included) of `og:description`.
    pub description_limit: usize,

    /// Whether `og:image` is derived from image attachments.
    pub images: bool,
}

/// Field paths of [`DefaultsConfig`].
pub struct DefaultsFields {
    pub og_type: FieldPath,
    pub description_limit: FieldPath,
}

impl DefaultsConfig {
    pub const FIELDS: DefaultsFields = DefaultsFields {
        og_type: FieldPath::new("defaults.type"),
        description_limit: FieldPath::new("defaults.description_limit"),
    };

    /// Validate the section.
    ///
    /// # Checks
    /// - `type` is not blank
    /// - `description_limit` leaves room for at least one character and the `...` marker
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.og_type.trim().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.og_type,
                "og:type default must not be empty",
                "use \"article\" or \"website\"",
            );
        }

        if self.description_limit < MIN_LIMIT {
            diag.error_with_hint(
                Self::FIELDS.description_limit,
                format!(
                    "{} is too small, minimum is {MIN_LIMIT}",
                    self.description_limit
                ),
                format!("the default is {DEFAULT_LIMIT}"),
            );
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            og_type: "article".into(),
            description_limit: DEFAULT_LIMIT,
            images: true,
        }
    }
}

impl OgConfig {
    /// Load configuration from `path`.
    ///
    /// A missing file is only tolerated when `required` is false, in which
    /// case the built-in defaults are returned.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(path)
    }

    /// Load and validate configuration from a file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Run every section check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.defaults.validate(&mut diag);
        diag.into_result()
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }
}
