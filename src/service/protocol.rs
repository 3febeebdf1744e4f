//! # Capture Service Protocol
//!
//! Request and response bodies for the Rokoko Studio command API.
//!
//! ## Commands
//!
//! | Command | Body |
//! |---------|------|
//! | `calibrate` | [`CalibrateRequest`] |
//! | `start_recording` | [`StartRecordingRequest`] |
//! | `stop_recording` | [`StopRecordingRequest`] |
//!
//! Every command answers with an [`ApiResponse`]; `response_code` 0 means OK.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CalibrationConfig;

/// Command path segment for calibration
pub const CALIBRATE_COMMAND: &str = "calibrate";

/// Calibration pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pose {
    #[serde(rename = "tpose")]
    TPose,
    #[default]
    #[serde(rename = "straight-arms-down")]
    StraightArmsDown,
    #[serde(rename = "straight-arms-forward")]
    StraightArmsForward,
}

/// Body of `POST /v1/{key}/calibrate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrateRequest {
    pub countdown_delay: u32,
    pub skip_suit: bool,
    pub skip_gloves: bool,
    pub use_custom_pose: bool,
    pub pose: Pose,
}

impl From<&CalibrationConfig> for CalibrateRequest {
    fn from(config: &CalibrationConfig) -> Self {
        Self {
            countdown_delay: config.countdown_delay,
            skip_suit: config.skip_suit,
            skip_gloves: config.skip_gloves,
            use_custom_pose: config.use_custom_pose,
            pose: config.pose,
        }
    }
}

/// Body of the start-recording command
///
/// An empty filename lets Studio pick its own take name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRecordingRequest {
    pub filename: String,
}

/// Body of the stop-recording command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRecordingRequest {
    /// Return Studio to the live view after the take is saved
    pub back_to_live: bool,
}

impl Default for StopRecordingRequest {
    fn default() -> Self {
        Self { back_to_live: true }
    }
}

/// Response body shared by all commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub description: String,
    pub response_code: i32,
}

impl ApiResponse {
    #[must_use]
    pub fn code(&self) -> ResponseCode {
        ResponseCode::from(self.response_code)
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code() == ResponseCode::Ok
    }
}

/// Application-level result codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Ok,
    NoCalibrateableActors,
    CalibrationAlreadyOngoing,
    RecordingAlreadyStarted,
    RecordingNotStarted,
    UnexpectedError,
    Unknown(i32),
}

impl From<i32> for ResponseCode {
    fn from(code: i32) -> Self {
        match code {
            0 => ResponseCode::Ok,
            1 => ResponseCode::NoCalibrateableActors,
            3 => ResponseCode::CalibrationAlreadyOngoing,
            4 => ResponseCode::RecordingAlreadyStarted,
            5 => ResponseCode::RecordingNotStarted,
            6 => ResponseCode::UnexpectedError,
            other => ResponseCode::Unknown(other),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Ok => f.write_str("OK"),
            ResponseCode::NoCalibrateableActors => f.write_str("NO_CALIBRATEABLE_ACTORS"),
            ResponseCode::CalibrationAlreadyOngoing => f.write_str("CALIBRATION_ALREADY_ONGOING"),
            ResponseCode::RecordingAlreadyStarted => f.write_str("RECORDING_ALREADY_STARTED"),
            ResponseCode::RecordingNotStarted => f.write_str("RECORDING_NOT_STARTED"),
            ResponseCode::UnexpectedError => f.write_str("UNEXPECTED_ERROR"),
            ResponseCode::Unknown(code) => write!(f, "UNKNOWN ({})", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_calibrate_request_body() {
        let request = CalibrateRequest::from(&CalibrationConfig::default());
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "countdown_delay": 3,
                "skip_suit": false,
                "skip_gloves": false,
                "use_custom_pose": false,
                "pose": "straight-arms-down",
            })
        );
    }

    #[test]
    fn test_pose_names() {
        assert_eq!(serde_json::to_value(Pose::TPose).unwrap(), json!("tpose"));
        assert_eq!(
            serde_json::to_value(Pose::StraightArmsForward).unwrap(),
            json!("straight-arms-forward")
        );
    }

    #[test]
    fn test_recording_request_bodies() {
        assert_eq!(
            serde_json::to_value(StartRecordingRequest::default()).unwrap(),
            json!({ "filename": "" })
        );
        assert_eq!(
            serde_json::to_value(StopRecordingRequest::default()).unwrap(),
            json!({ "back_to_live": true })
        );
    }

    #[test]
    fn test_parse_response() {
        let response: ApiResponse = serde_json::from_str(
            r#"{"description": "Calibration already ongoing", "response_code": 3}"#,
        )
        .unwrap();
        assert_eq!(response.code(), ResponseCode::CalibrationAlreadyOngoing);
        assert!(!response.is_ok());
    }

    #[test]
    fn test_parse_response_without_description() {
        let response: ApiResponse = serde_json::from_str(r#"{"response_code": 0}"#).unwrap();
        assert!(response.is_ok());
        assert!(response.description.is_empty());
    }

    #[test]
    fn test_response_code_mapping() {
        assert_eq!(ResponseCode::from(0), ResponseCode::Ok);
        assert_eq!(ResponseCode::from(1), ResponseCode::NoCalibrateableActors);
        assert_eq!(ResponseCode::from(3), ResponseCode::CalibrationAlreadyOngoing);
        assert_eq!(ResponseCode::from(4), ResponseCode::RecordingAlreadyStarted);
        assert_eq!(ResponseCode::from(5), ResponseCode::RecordingNotStarted);
        assert_eq!(ResponseCode::from(6), ResponseCode::UnexpectedError);
        assert_eq!(ResponseCode::from(2), ResponseCode::Unknown(2));
    }

    #[test]
    fn test_response_code_display() {
        assert_eq!(ResponseCode::CalibrationAlreadyOngoing.to_string(), "CALIBRATION_ALREADY_ONGOING");
        assert_eq!(ResponseCode::Unknown(42).to_string(), "UNKNOWN (42)");
    }
}
