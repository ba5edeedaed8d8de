//! Configuration management
//!
//! Two sources:
//!
//! - Service credentials, located through the `CLOUDTODO_CREDENTIALS`
//!   environment variable. Required; a missing or unreadable file is fatal
//!   at startup.
//! - `settings.json` in the data directory:
//!   ```json
//!   {
//!     "auth": { "verifyPassword": false },
//!     "tasks": { "concealForeignTasks": false }
//!   }
//!   ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

/// Environment variable naming the credentials file
pub const CREDENTIALS_ENV: &str = "CLOUDTODO_CREDENTIALS";

/// Environment override for `auth.verifyPassword`
pub const VERIFY_PASSWORD_ENV: &str = "CLOUDTODO_VERIFY_PASSWORD";

/// Service credentials file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub project_id: String,
    /// Database file; relative paths resolve against the credentials file
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(skip)]
    source: PathBuf,
}

impl Credentials {
    /// Load credentials named by `CLOUDTODO_CREDENTIALS`
    ///
    /// The binary loads `.env` before this runs.
    pub fn from_env() -> Result<Self> {
        let path = credentials_path(std::env::var(CREDENTIALS_ENV).ok())?;
        Self::load(&path)
    }

    /// Load a credentials file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Cannot read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut credentials: Credentials = serde_json::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Malformed credentials file {}: {}",
                path.display(),
                e
            ))
        })?;

        if credentials.project_id.trim().is_empty() {
            return Err(Error::config("Credentials file has an empty project_id"));
        }

        credentials.source = path.to_path_buf();
        Ok(credentials)
    }

    /// Database file to open for these credentials
    pub fn database_file(&self, data_dir: &Path) -> PathBuf {
        match &self.database_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self
                .source
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(path),
            None => data_dir.join(format!("{}.duckdb", self.project_id)),
        }
    }
}

fn credentials_path(value: Option<String>) -> Result<PathBuf> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(PathBuf::from(v)),
        _ => Err(Error::config(format!(
            "{} not set in environment or .env",
            CREDENTIALS_ENV
        ))),
    }
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    auth: AuthSettings,
    #[serde(default)]
    tasks: TaskSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthSettings {
    #[serde(default)]
    verify_password: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskSettings {
    #[serde(default)]
    conceal_foreign_tasks: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Application settings (simplified view of settings.json)
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Check the password on login
    pub verify_password: bool,
    /// Report other owners' tasks as missing instead of unauthorized
    pub conceal_foreign_tasks: bool,
}

impl Config {
    /// Load settings from the data directory
    ///
    /// A missing file yields defaults. `CLOUDTODO_VERIFY_PASSWORD` overrides
    /// the file's `auth.verifyPassword`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;

        let verify_password = parse_flag(std::env::var(VERIFY_PASSWORD_ENV).ok().as_deref())
            .unwrap_or(raw.auth.verify_password);

        Ok(Self {
            verify_password,
            conceal_foreign_tasks: raw.tasks.conceal_foreign_tasks,
        })
    }

    /// Save settings, preserving keys this program does not manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;
        settings.auth.verify_password = self.verify_password;
        settings.tasks.conceal_foreign_tasks = self.conceal_foreign_tasks;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join("settings.json"), content)?;
        Ok(())
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }

    let content = std::fs::read_to_string(&settings_path)?;
    serde_json::from_str(&content).map_err(|e| {
        Error::config(format!(
            "Malformed settings file {}: {}",
            settings_path.display(),
            e
        ))
    })
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}
