//! Configuration loading and resolution
//!
//! Settings come from up to three layers (later wins):
//!
//! 1. the global user config (`<config dir>/cript-ingest/config.yaml`)
//! 2. the local config file (`./config.yaml` or `--config <path>`)
//! 3. `CRIPT_HOST` / `CRIPT_TOKEN` environment variables
//!
//! Whatever is still missing is asked for through an [`InputProvider`]. The
//! answers are never written back to disk.

use miette::Diagnostic;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::yaml::ConfigSyntaxError;

pub const HOST_PROMPT: &str = "Host (e.g., criptapp.org)";
pub const TOKEN_PROMPT: &str = "API Token";
pub const GROUP_PROMPT: &str = "Group name";
pub const PROJECT_PROMPT: &str = "Project name";
pub const COLLECTION_PROMPT: &str = "Collection name";
pub const INVENTORY_PROMPT: &str = "Inventory name";
pub const PUBLIC_PROMPT: &str = "Do you want your data visible to the public? (y/N)";
pub const PATH_PROMPT: &str = "Path to CSV file";

/// Errors raised while loading or resolving configuration
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Missing configuration value '{0}'")]
    #[diagnostic(
        code(cript_ingest::config::missing),
        help("Add the value to config.yaml, or run without --no-prompt to be asked for it")
    )]
    MissingField(&'static str),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] ConfigSyntaxError),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

/// Settings as read from files and environment; any field may be absent
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    #[serde(deserialize_with = "deserialize_text")]
    pub host: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub token: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub group: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub project: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub collection: Option<String>,
    #[serde(deserialize_with = "deserialize_text")]
    pub inventory: Option<String>,
    #[serde(deserialize_with = "deserialize_flag")]
    pub public: Option<bool>,
    #[serde(deserialize_with = "deserialize_text")]
    pub path: Option<String>,
}

/// Accept any scalar (`inventory: 2024`, `project: 7`) as its text form
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

/// Accept `public: true`, `public: "yes"`, `public: n` and friends
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(b)) => Ok(Some(b)),
        Some(Flag::Text(s)) => match s.trim().to_lowercase().as_str() {
            "y" | "yes" | "true" => Ok(Some(true)),
            "n" | "no" | "false" | "" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "invalid value for public: '{}' (expected y/n)",
                other
            ))),
        },
    }
}

impl PartialConfig {
    /// Load every layer, with `local` as the project config file
    pub fn load(local: &Path) -> Result<Self, ConfigError> {
        let mut config = PartialConfig::default();

        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::from_file(&global_path)? {
                config.merge(global);
            }
        }

        if let Some(local_config) = Self::from_file(local)? {
            config.merge(local_config);
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read one config file; a missing file is `Ok(None)`
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_yaml(&contents, &path.display().to_string()).map(Some)
    }

    /// Parse config YAML; a blank or comment-only document is an empty config
    pub fn from_yaml(contents: &str, filename: &str) -> Result<Self, ConfigError> {
        let blank = contents.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Ok(Self::default());
        }
        serde_yml::from_str::<Option<PartialConfig>>(contents)
            .map(Option::unwrap_or_default)
            .map_err(|e| {
                ConfigError::Syntax(ConfigSyntaxError::from_serde_error(&e, contents, filename))
            })
    }

    /// Apply `CRIPT_HOST` / `CRIPT_TOKEN` from `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("CRIPT_HOST").filter(|s| !s.is_empty()) {
            self.host = Some(host);
        }
        if let Some(token) = lookup("CRIPT_TOKEN").filter(|s| !s.is_empty()) {
            self.token = Some(token);
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "cript-ingest")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: PartialConfig) {
        if other.host.is_some() {
            self.host = other.host;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.group.is_some() {
            self.group = other.group;
        }
        if other.project.is_some() {
            self.project = other.project;
        }
        if other.collection.is_some() {
            self.collection = other.collection;
        }
        if other.inventory.is_some() {
            self.inventory = other.inventory;
        }
        if other.public.is_some() {
            self.public = other.public;
        }
        if other.path.is_some() {
            self.path = other.path;
        }
    }
}

/// Fully resolved settings for one upload
#[derive(Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub token: String,
    pub group: String,
    pub project: String,
    pub collection: String,
    pub inventory: String,
    pub public: bool,
    pub path: PathBuf,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("group", &self.group)
            .field("project", &self.project)
            .field("collection", &self.collection)
            .field("inventory", &self.inventory)
            .field("public", &self.public)
            .field("path", &self.path)
            .finish()
    }
}

/// Source of answers for settings missing from every config layer
///
/// `Ok(None)` means no answer is available; resolution then fails with
/// [`ConfigError::MissingField`]. An empty string is a valid answer.
pub trait InputProvider {
    fn text(&mut self, prompt: &str) -> Result<Option<String>, ConfigError>;

    /// Masked input for secrets
    fn secret(&mut self, prompt: &str) -> Result<Option<String>, ConfigError>;
}

/// Input provider that never answers (`--no-prompt`)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputProvider for NoInput {
    fn text(&mut self, _prompt: &str) -> Result<Option<String>, ConfigError> {
        Ok(None)
    }

    fn secret(&mut self, _prompt: &str) -> Result<Option<String>, ConfigError> {
        Ok(None)
    }
}

fn ask(
    value: Option<String>,
    field: &'static str,
    prompt: &str,
    input: &mut dyn InputProvider,
) -> Result<String, ConfigError> {
    match value {
        Some(v) => Ok(v),
        None => input.text(prompt)?.ok_or(ConfigError::MissingField(field)),
    }
}

/// Fill every missing setting from `input`, one prompt per missing key
pub fn resolve(partial: PartialConfig, input: &mut dyn InputProvider) -> Result<Settings, ConfigError> {
    let host = ask(partial.host, "host", HOST_PROMPT, input)?;
    let token = match partial.token {
        Some(token) => token,
        None => input
            .secret(TOKEN_PROMPT)?
            .ok_or(ConfigError::MissingField("token"))?,
    };
    let group = ask(partial.group, "group", GROUP_PROMPT, input)?;
    let project = ask(partial.project, "project", PROJECT_PROMPT, input)?;
    let collection = ask(partial.collection, "collection", COLLECTION_PROMPT, input)?;
    let inventory = ask(partial.inventory, "inventory", INVENTORY_PROMPT, input)?;
    let public = match partial.public {
        Some(public) => public,
        None => input
            .text(PUBLIC_PROMPT)?
            .ok_or(ConfigError::MissingField("public"))?
            .eq_ignore_ascii_case("y"),
    };
    let path = match partial.path {
        Some(path) => path,
        None => input
            .text(PATH_PROMPT)?
            .ok_or(ConfigError::MissingField("path"))?
            .trim_matches('"')
            .to_string(),
    };

    Ok(Settings {
        host,
        token,
        group,
        project,
        collection,
        inventory,
        public,
        path: PathBuf::from(path),
    })
}
