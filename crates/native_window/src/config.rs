//! # Configuration
//!
//! Serializable settings for the window system and the windows it opens.
//! Files are read and written as TOML or RON depending on the extension.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk encoding of a settings file, chosen by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Pick the format for `path`, ignoring extension case
    pub fn from_path(path: &str) -> Result<Self, ConfigError> {
        let extension = Path::new(path).extension().and_then(|ext| ext.to_str()).unwrap_or("");
        if extension.eq_ignore_ascii_case("toml") {
            Ok(Self::Toml)
        } else if extension.eq_ignore_ascii_case("ron") {
            Ok(Self::Ron)
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    fn decode<T: for<'de> Deserialize<'de>>(self, contents: &str) -> Result<T, ConfigError> {
        match self {
            Self::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Self::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    fn encode<T: Serialize>(self, value: &T) -> Result<String, ConfigError> {
        match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| ConfigError::Serialize(e.to_string())),
            Self::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }
}

/// Settings that live in a TOML or RON file
///
/// Implementors only need serde support and a `Default`; missing fields fall
/// back to the default when the type is marked `#[serde(default)]`.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Read settings from `path`
    ///
    /// # Errors
    /// [`ConfigError::UnsupportedFormat`] for extensions other than `.toml`
    /// and `.ron`, [`ConfigError::Io`] if the file cannot be read, and
    /// [`ConfigError::Parse`] if its contents do not match `Self`.
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        let config = format.decode(&contents)?;
        log::debug!("Loaded {:?} settings from {}", format, path);
        Ok(config)
    }

    /// Write settings to `path`, replacing any existing file
    ///
    /// # Errors
    /// [`ConfigError::UnsupportedFormat`] for unknown extensions,
    /// [`ConfigError::Serialize`] if encoding fails, and [`ConfigError::Io`]
    /// if the file cannot be written.
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = ConfigFormat::from_path(path)?.encode(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Why settings could not be loaded, saved or accepted
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The settings file could not be read or written
    #[error("Settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents are not valid for the settings type
    #[error("Malformed settings: {0}")]
    Parse(String),

    /// The settings could not be encoded
    #[error("Could not encode settings: {0}")]
    Serialize(String),

    /// The path has neither a `.toml` nor a `.ron` extension
    #[error("No settings format for {0}, expected .toml or .ron")]
    UnsupportedFormat(String),

    /// Values that parse but make no sense
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which backend a [`WindowSystem`](crate::WindowSystem) drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The OS window system this build targets
    #[default]
    Native,
    /// In-memory windows, no display required
    Headless,
}

/// Parameters for one window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial title
    pub title: String,
    /// Client-area width in pixels
    pub width: u32,
    /// Client-area height in pixels
    pub height: u32,
}

impl WindowConfig {
    /// Create a window configuration
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
        }
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the client-area size
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("Native Window", 800, 600)
    }
}

/// Top-level settings for the window system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSystemConfig {
    /// Backend selection
    pub backend: BackendKind,
    /// Log filter passed to `env_logger` when `RUST_LOG` is unset
    pub log_level: String,
    /// Sleep between polls in caller loops, in milliseconds
    pub frame_interval_ms: u32,
    /// The window opened by default
    pub window: WindowConfig,
}

impl WindowSystemConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            backend: BackendKind::Native,
            log_level: "info".to_string(),
            frame_interval_ms: 16,
            window: WindowConfig::default(),
        }
    }

    /// Select the backend
    #[must_use]
    pub const fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_frame_interval(mut self, milliseconds: u32) -> Self {
        self.frame_interval_ms = milliseconds;
        self
    }

    /// Set the default window
    #[must_use]
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log level cannot be empty".to_string()));
        }
        self.window.validate()
    }
}

impl Default for WindowSystemConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for WindowSystemConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = WindowSystemConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend, BackendKind::Native);
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
    }

    #[test]
    fn test_zero_size_rejected() {
        let config = WindowSystemConfig::new().with_window(WindowConfig::default().with_size(0, 600));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: WindowSystemConfig = toml::from_str(
            r#"
            backend = "headless"

            [window]
            title = "Demo"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendKind::Headless);
        assert_eq!(config.window.title, "Demo");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.frame_interval_ms, 16);
    }

    #[test]
    fn test_ron_parse() {
        let config: WindowSystemConfig =
            ron::from_str("(backend: headless, window: (title: \"R\", width: 320, height: 200))").unwrap();
        assert_eq!(config.backend, BackendKind::Headless);
        assert_eq!(config.window, WindowConfig::new("R", 320, 200));
    }

    #[test]
    fn test_save_and_load_toml() {
        let path = std::env::temp_dir().join(format!("native_window_config_{}.toml", std::process::id()));
        let path = path.to_string_lossy().into_owned();
        let config = WindowSystemConfig::new()
            .with_backend(BackendKind::Headless)
            .with_frame_interval(5);

        config.save_to_file(&path).unwrap();
        let loaded = WindowSystemConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(ConfigFormat::from_path("a/window.toml").unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path("WINDOW.RON").unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path("window"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_save_and_load_ron() {
        let path = std::env::temp_dir().join(format!("native_window_config_{}.ron", std::process::id()));
        let path = path.to_string_lossy().into_owned();
        let config = WindowSystemConfig::new().with_window(WindowConfig::new("Saved", 640, 480));

        config.save_to_file(&path).unwrap();
        let loaded = WindowSystemConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = WindowSystemConfig::default().save_to_file("settings.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = WindowSystemConfig::load_from_file("/nonexistent/native_window.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
