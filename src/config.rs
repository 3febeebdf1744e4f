//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section is optional; missing sections and fields fall back to the
//! defaults below, which match a stock Rokoko Studio install and the usual
//! DualSense button layout (Triangle calibrates, Cross records, Circle stops).

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::controller::buttons::BUTTON_COUNT;
use crate::error::{BridgeError, Result};
use crate::service::protocol::Pose;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub bindings: BindingConfig,
    #[serde(default)]
    pub debounce: DebounceConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub automation: AutomationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Capture service (Rokoko Studio command API) configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_api_key")]
    pub api_key: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_health_check_interval_ms")]
    pub health_check_interval_ms: u64,

    #[serde(default = "default_start_recording_path")]
    pub start_recording_path: String,

    #[serde(default = "default_stop_recording_path")]
    pub stop_recording_path: String,
}

/// Controller configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    /// Explicit `/dev/input/eventN` path. Empty means auto-detect.
    #[serde(default)]
    pub device_path: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Button index bindings for each action
#[derive(Debug, Deserialize, Clone)]
pub struct BindingConfig {
    #[serde(default = "default_calibrate_button")]
    pub calibrate: u16,

    #[serde(default = "default_start_recording_button")]
    pub start_recording: u16,

    #[serde(default = "default_stop_recording_button")]
    pub stop_recording: u16,
}

/// Debounce configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebounceConfig {
    #[serde(default = "default_debounce_seconds")]
    pub seconds: f64,
}

/// Payload options sent with every calibrate command
#[derive(Debug, Deserialize, Clone)]
pub struct CalibrationConfig {
    #[serde(default = "default_countdown_delay")]
    pub countdown_delay: u32,

    #[serde(default)]
    pub skip_suit: bool,

    #[serde(default)]
    pub skip_gloves: bool,

    #[serde(default)]
    pub use_custom_pose: bool,

    #[serde(default)]
    pub pose: Pose,
}

/// Screen-automation fallback configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AutomationConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Title of the window holding the record control
    #[serde(default = "default_window_name")]
    pub window_name: String,

    /// Record control position, relative to the window origin
    #[serde(default)]
    pub click_x: i32,

    #[serde(default)]
    pub click_y: i32,

    #[serde(default = "default_key_delay_ms")]
    pub key_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rolling log files. Empty disables file logging.
    #[serde(default)]
    pub file_dir: String,
}

// Default value functions
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 14053 }
fn default_api_key() -> String { "1234".to_string() }
fn default_timeout_ms() -> u64 { 5000 }
fn default_health_check_interval_ms() -> u64 { 3000 }
fn default_start_recording_path() -> String { "start_recording".to_string() }
fn default_stop_recording_path() -> String { "stop_recording".to_string() }

fn default_poll_interval_ms() -> u64 { 10 }

fn default_calibrate_button() -> u16 { 3 }
fn default_start_recording_button() -> u16 { 0 }
fn default_stop_recording_button() -> u16 { 1 }

fn default_debounce_seconds() -> f64 { 5.0 }

/// Longest accepted debounce window, in seconds
const MAX_DEBOUNCE_SECONDS: f64 = 3600.0;

fn default_countdown_delay() -> u32 { 3 }

fn default_window_name() -> String { "Motion LIVE".to_string() }
fn default_key_delay_ms() -> u64 { 100 }

fn default_log_level() -> String { "info".to_string() }

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: default_api_key(),
            timeout_ms: default_timeout_ms(),
            health_check_interval_ms: default_health_check_interval_ms(),
            start_recording_path: default_start_recording_path(),
            stop_recording_path: default_stop_recording_path(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            device_path: String::new(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            calibrate: default_calibrate_button(),
            start_recording: default_start_recording_button(),
            stop_recording: default_stop_recording_button(),
        }
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            seconds: default_debounce_seconds(),
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            countdown_delay: default_countdown_delay(),
            skip_suit: false,
            skip_gloves: false,
            use_custom_pose: false,
            pose: Pose::default(),
        }
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            window_name: default_window_name(),
            click_x: 0,
            click_y: 0,
            key_delay_ms: default_key_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_dir: String::new(),
        }
    }
}

impl ServiceConfig {
    /// Base URL for commands, e.g. `http://127.0.0.1:14053/v1/1234`
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/v1/{}", self.host, self.port, self.api_key)
    }

    /// Per-request timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval_ms)
    }
}

impl ControllerConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl DebounceConfig {
    /// Cooldown window as a `Duration`
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs_f64(self.seconds)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rokoko_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.service.host.is_empty() {
            return Err(invalid("service host cannot be empty"));
        }

        if self.service.api_key.is_empty() {
            return Err(invalid("service api_key cannot be empty"));
        }

        if self.service.port == 0 {
            return Err(invalid("service port must be greater than 0"));
        }

        if self.service.start_recording_path.is_empty() || self.service.stop_recording_path.is_empty() {
            return Err(invalid("recording paths cannot be empty"));
        }

        // Validate timing fields
        if self.service.timeout_ms == 0 || self.service.timeout_ms > 60000 {
            return Err(invalid("timeout_ms must be between 1 and 60000"));
        }

        if self.service.health_check_interval_ms == 0 || self.service.health_check_interval_ms > 60000 {
            return Err(invalid("health_check_interval_ms must be between 1 and 60000"));
        }

        if self.controller.poll_interval_ms == 0 || self.controller.poll_interval_ms > 1000 {
            return Err(invalid("poll_interval_ms must be between 1 and 1000"));
        }

        // Validate button bindings against the button table
        for (name, index) in [
            ("calibrate", self.bindings.calibrate),
            ("start_recording", self.bindings.start_recording),
            ("stop_recording", self.bindings.stop_recording),
        ] {
            if usize::from(index) >= BUTTON_COUNT {
                return Err(invalid(format!(
                    "{} binding {} is out of bounds (must be 0-{})",
                    name,
                    index,
                    BUTTON_COUNT - 1
                )));
            }
        }

        if !(0.0..=MAX_DEBOUNCE_SECONDS).contains(&self.debounce.seconds) {
            return Err(invalid(format!(
                "debounce seconds must be between 0 and {}",
                MAX_DEBOUNCE_SECONDS
            )));
        }

        if self.calibration.countdown_delay > 60 {
            return Err(invalid("countdown_delay must be between 0 and 60"));
        }

        if self.automation.enabled && self.automation.window_name.is_empty() {
            return Err(invalid("automation window_name cannot be empty when enabled"));
        }

        if self.automation.key_delay_ms > 5000 {
            return Err(invalid("key_delay_ms must be between 0 and 5000"));
        }

        if !["trace", "debug", "info", "warn", "error"].contains(&self.logging.level.as_str()) {
            return Err(invalid("log level must be one of: trace, debug, info, warn, error"));
        }

        Ok(())
    }
}

fn invalid(message: impl std::fmt::Display) -> BridgeError {
    BridgeError::Config(toml::de::Error::custom(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[service]
api_key = "secret"

[bindings]
calibrate = 2

[debounce]
seconds = 2.5

[calibration]
pose = "tpose"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.service.api_key, "secret");
        assert_eq!(config.service.port, 14053);
        assert_eq!(config.bindings.calibrate, 2);
        assert_eq!(config.bindings.start_recording, 0);
        assert_eq!(config.debounce.cooldown(), Duration::from_millis(2500));
        assert_eq!(config.calibration.pose, Pose::TPose);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.service.base_url(), Config::default().service.base_url());
        assert_eq!(config.bindings.calibrate, default_calibrate_button());
        assert_eq!(config.calibration.pose, Pose::StraightArmsDown);
        assert!(!config.automation.enabled);
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.service.base_url(), "http://127.0.0.1:14053/v1/1234");
        assert_eq!(config.bindings.calibrate, 3);
        assert_eq!(config.debounce.seconds, 5.0);
        assert!(!config.automation.enabled);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/rokoko-bridge.toml");
        assert!(matches!(result, Err(BridgeError::Io(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_toml("[service\nport = ");
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_unknown_pose_rejected() {
        let result = Config::from_toml("[calibration]\npose = \"a-pose\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_host() {
        let mut config = Config::default();
        config.service.host = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_api_key() {
        let mut config = Config::default();
        config.service.api_key = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_port_zero() {
        let mut config = Config::default();
        config.service.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_recording_path() {
        let mut config = Config::default();
        config.service.stop_recording_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_ms_zero() {
        let mut config = Config::default();
        config.service.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_ms_too_high() {
        let mut config = Config::default();
        config.service.timeout_ms = 60001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_health_check_interval_zero() {
        let mut config = Config::default();
        config.service.health_check_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_zero() {
        let mut config = Config::default();
        config.controller.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_too_high() {
        let mut config = Config::default();
        config.controller.poll_interval_ms = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_binding_out_of_range() {
        let mut config = Config::default();
        config.bindings.stop_recording = BUTTON_COUNT as u16;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shared_binding_is_allowed() {
        let mut config = Config::default();
        config.bindings.start_recording = 3;
        config.bindings.calibrate = 3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_debounce() {
        let mut config = Config::default();
        config.debounce.seconds = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_debounce() {
        for value in [f64::NAN, f64::INFINITY] {
            let mut config = Config::default();
            config.debounce.seconds = value;
            assert!(config.validate().is_err(), "{} should be rejected", value);
        }
    }

    #[test]
    fn test_debounce_too_high() {
        let result = Config::from_toml("[debounce]\nseconds = 1e20\n");
        assert!(result.is_err(), "1e20 s cooldown should be rejected");

        let mut config = Config::default();
        config.debounce.seconds = MAX_DEBOUNCE_SECONDS;
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce.cooldown(), Duration::from_secs(3600));
    }

    #[test]
    fn test_zero_debounce_is_allowed() {
        let mut config = Config::default();
        config.debounce.seconds = 0.0;
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce.cooldown(), Duration::ZERO);
    }

    #[test]
    fn test_countdown_delay_too_high() {
        let mut config = Config::default();
        config.calibration.countdown_delay = 61;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_window_name_when_enabled() {
        let mut config = Config::default();
        config.automation.enabled = true;
        config.automation.window_name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_window_name_when_disabled() {
        let mut config = Config::default();
        config.automation.enabled = false;
        config.automation.window_name = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_key_delay_too_high() {
        let mut config = Config::default();
        config.automation.key_delay_ms = 5001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_log_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let mut config = Config::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "Log level {} should be valid", level);
        }
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_host(), "127.0.0.1");
        assert_eq!(default_port(), 14053);
        assert_eq!(default_api_key(), "1234");
        assert_eq!(default_timeout_ms(), 5000);
        assert_eq!(default_health_check_interval_ms(), 3000);
        assert_eq!(default_start_recording_path(), "start_recording");
        assert_eq!(default_stop_recording_path(), "stop_recording");
        assert_eq!(default_poll_interval_ms(), 10);
        assert_eq!(default_calibrate_button(), 3);
        assert_eq!(default_start_recording_button(), 0);
        assert_eq!(default_stop_recording_button(), 1);
        assert_eq!(default_debounce_seconds(), 5.0);
        assert_eq!(default_countdown_delay(), 3);
        assert_eq!(default_window_name(), "Motion LIVE");
        assert_eq!(default_key_delay_ms(), 100);
        assert_eq!(default_log_level(), "info");
    }
}
