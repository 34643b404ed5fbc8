use anyhow::{anyhow, Context, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Speech-engine parameters. Voice I/O itself is handled by external
/// engines; the core only carries their configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub wake_word: String,
    pub rate: u32,
    /// Playback volume, 0.0..=1.0.
    pub volume: f32,
    pub enabled: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            wake_word: "hey cog".to_string(),
            rate: 180,
            volume: 0.8,
            enabled: false,
        }
    }
}

/// Persisted user preferences, read at startup and written on change.
/// Flat record, no schema versioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub location: String,
    pub cuisines: Vec<String>,
    pub budget_min: u32,
    pub budget_max: u32,
    pub style_tags: Vec<String>,
    pub daily_step_goal: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            location: "New York, NY".to_string(),
            cuisines: vec!["italian".to_string(), "indian".to_string()],
            budget_min: 100,
            budget_max: 500,
            style_tags: vec!["casual".to_string()],
            daily_step_goal: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub use_mock: bool,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// A missing file falls back to defaults; a file that exists but does
    /// not parse is a startup error and surfaces as one.
    pub fn load() -> Result<Self> {
        let mut config = match Self::load_from_file()? {
            Some(config) => config,
            None => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };

        // Environment variables override the config file.
        if let Ok(api_key) = std::env::var("ANTHROPIC_API_KEY") {
            config.anthropic_api_key = Some(api_key);
        }
        if std::env::var("COGNET_USE_MOCK").is_ok() {
            config.use_mock = true;
        }

        Ok(config)
    }

    fn load_from_file() -> Result<Option<Self>> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return Ok(None);
        }
        let config = Self::from_file(&config_path)?;
        info!("Loaded config from: {}", config_path.display());
        Ok(Some(config))
    }

    /// Parse a config file at an explicit path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("corrupt config file {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        info!("Saved config to: {}", config_path.display());
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(".cognet"))
    }

    /// Set API key and save config.
    pub fn set_api_key(&mut self, api_key: String) -> Result<()> {
        self.anthropic_api_key = Some(api_key);
        self.save()?;
        info!("API key saved to config file");
        Ok(())
    }

    pub fn api_key(&self) -> Option<&String> {
        self.anthropic_api_key.as_ref()
    }

    pub fn is_mock_mode(&self) -> bool {
        self.use_mock
    }

    pub fn show_config_info() -> Result<()> {
        let config_path = Self::config_path()?;
        println!("Configuration file: {}", config_path.display());

        if config_path.exists() {
            let config = Self::from_file(&config_path)?;
            println!("Status: Found");
            println!(
                "API Key: {}",
                if config.anthropic_api_key.is_some() { "Set" } else { "Not set" }
            );
            println!("Mock mode: {}", config.use_mock);
            println!("Location: {}", config.preferences.location);
            println!(
                "Voice: {} (wake word \"{}\")",
                if config.voice.enabled { "enabled" } else { "disabled" },
                config.voice.wake_word
            );
        } else {
            println!("Status: Not found (using defaults)");
        }

        println!("\nTo set API key:");
        println!("  cog --set-api-key <your-key>");
        println!("\nOr set environment variable:");
        println!("  export ANTHROPIC_API_KEY=<your-key>");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_work_without_any_credential() {
        let config = Config::default();
        assert!(config.api_key().is_none());
        assert!(!config.is_mock_mode());
        assert_eq!(config.preferences.daily_step_goal, 10_000);
        assert_eq!(config.voice.rate, 180);
    }

    #[test]
    fn parses_full_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
anthropic_api_key = "sk-ant-test"
use_mock = true

[voice]
wake_word = "hey cog"
rate = 160
volume = 0.5
enabled = true

[preferences]
location = "Pune, IN"
cuisines = ["indian"]
budget_min = 50
budget_max = 300
style_tags = ["business"]
daily_step_goal = 8000
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-ant-test"));
        assert!(config.use_mock);
        assert!(config.voice.enabled);
        assert_eq!(config.voice.rate, 160);
        assert_eq!(config.preferences.location, "Pune, IN");
        assert_eq!(config.preferences.budget_max, 300);
    }

    #[test]
    fn partial_config_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "use_mock = true\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.use_mock);
        assert!(config.anthropic_api_key.is_none());
        assert_eq!(config.voice.wake_word, "hey cog");
        assert_eq!(config.preferences.location, "New York, NY");
    }

    #[test]
    fn corrupt_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is not toml = = =").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("corrupt config file"));
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut config = Config::default();
        config.preferences.location = "Bengaluru, IN".to_string();
        config.voice.enabled = true;

        let content = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&content).unwrap();
        assert_eq!(back.preferences.location, "Bengaluru, IN");
        assert!(back.voice.enabled);
    }
}
