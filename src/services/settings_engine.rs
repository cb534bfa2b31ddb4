// mdshare Settings Engine
// Loads server settings from a JSON file, layers environment overrides on top,
// and can write the defaults back out.

use std::env;
use std::fs;
use std::path::Path;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::{ServerSettings, TitleProvider};

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ServerSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ServerSettings;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: ServerSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses `server.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("server.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            settings: ServerSettings::default(),
        }
    }

    /// Loads the file, then applies process environment overrides.
    pub fn load_with_env(&mut self) -> Result<ServerSettings, SettingsError> {
        self.load()?;
        self.apply_env_overrides(|name| env::var(name).ok())?;
        Ok(self.settings.clone())
    }

    /// Applies overrides read through `lookup`.
    ///
    /// Recognised variables: `MDSHARE_BIND_ADDR`, `MDSHARE_DATABASE`,
    /// `MDSHARE_PUBLIC_URL`, `MDSHARE_MAX_UPLOAD_BYTES`, `MDSHARE_AUTO_TITLE`,
    /// `GROQ_API_KEY` and `OPENAI_API_KEY`. A Groq key wins over an OpenAI key.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let s = &mut self.settings;

        if let Some(addr) = lookup("MDSHARE_BIND_ADDR") {
            s.bind_addr = addr;
        }
        if let Some(path) = lookup("MDSHARE_DATABASE") {
            s.database_path = Some(path);
        }
        if let Some(url) = lookup("MDSHARE_PUBLIC_URL") {
            s.public_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup("MDSHARE_MAX_UPLOAD_BYTES") {
            s.max_upload_bytes = raw.trim().parse().map_err(|_| {
                SettingsError::InvalidValue(format!("MDSHARE_MAX_UPLOAD_BYTES must be a byte count, got '{}'", raw))
            })?;
        }
        if let Some(raw) = lookup("MDSHARE_AUTO_TITLE") {
            s.title.auto_title_on_upload = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(SettingsError::InvalidValue(format!(
                        "MDSHARE_AUTO_TITLE must be a boolean, got '{}'",
                        raw
                    )))
                }
            };
        }

        if let Some(key) = lookup("GROQ_API_KEY") {
            s.title.provider = Some(TitleProvider::Groq);
            s.title.api_key = Some(key);
        } else if let Some(key) = lookup("OPENAI_API_KEY") {
            s.title.provider = Some(TitleProvider::OpenAI);
            s.title.api_key = Some(key);
        }

        Ok(())
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// If the file does not exist, returns default settings.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<ServerSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = ServerSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: ServerSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings to the JSON config file.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Resets all settings to defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = ServerSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
