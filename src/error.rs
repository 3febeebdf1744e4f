//! # Error Types
//!
//! Custom error types for Rokoko Bridge using `thiserror`.
//!
//! Only controller-level failures are fatal. Everything raised while executing
//! an action is caught by the executor and turned into a log line.

use thiserror::Error;

/// Main error type for Rokoko Bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No supported controller was found during startup
    #[error("No PlayStation controller found")]
    ControllerNotFound,

    /// The controller went away while the bridge was running (fatal)
    #[error("Controller disconnected")]
    ControllerDisconnected,

    /// Transient controller read failure
    #[error("Controller error: {0}")]
    Controller(String),

    /// Connection refused or timed out talking to the capture service
    #[error("Capture service unreachable: {0}")]
    ServiceUnreachable(String),

    /// Capture service answered with something that is not a valid response
    #[error("Capture service error: {0}")]
    Service(String),

    /// Capture service answered with a non-OK response code
    #[error("Capture service returned {code}: {description}")]
    Application {
        /// Raw `response_code` from the service
        code: i32,
        /// `description` field from the service
        description: String,
    },

    /// Expected on-screen element not found
    #[error("Screen element not found: {0}")]
    AutomationMiss(String),

    /// Screen automation tool failed
    #[error("Screen automation error: {0}")]
    Automation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Returns true if the bridge cannot keep running after this error.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BridgeError::ControllerNotFound | BridgeError::ControllerDisconnected
        )
    }
}

/// Result type alias for Rokoko Bridge
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_errors_are_fatal() {
        assert!(BridgeError::ControllerNotFound.is_fatal());
        assert!(BridgeError::ControllerDisconnected.is_fatal());
    }

    #[test]
    fn test_action_errors_are_not_fatal() {
        let errors = [
            BridgeError::Controller("read failed".to_string()),
            BridgeError::ServiceUnreachable("connection refused".to_string()),
            BridgeError::Service("bad body".to_string()),
            BridgeError::Application {
                code: 3,
                description: "busy".to_string(),
            },
            BridgeError::AutomationMiss("record button".to_string()),
            BridgeError::Automation("xdotool missing".to_string()),
        ];

        for error in &errors {
            assert!(!error.is_fatal(), "{} should not be fatal", error);
        }
    }

    #[test]
    fn test_application_error_message_includes_description() {
        let error = BridgeError::Application {
            code: 3,
            description: "Calibration already ongoing".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Capture service returned 3: Calibration already ongoing"
        );
    }
}
