//! # Capture Service Module
//!
//! Talks to the Rokoko Studio command API.
//!
//! This module handles:
//! - Request/response bodies for calibrate and recording commands
//! - Sending commands over HTTP with a bounded timeout
//! - Probing whether Studio is listening at all

use async_trait::async_trait;

use crate::error::Result;

pub mod client;
pub mod protocol;

use protocol::{ApiResponse, CalibrateRequest, StartRecordingRequest, StopRecordingRequest};

pub use client::HttpCaptureClient;

/// Trait for the capture service commands used by the executor
///
/// `Ok` means the service answered; the caller still has to check
/// [`ApiResponse::response_code`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptureService: Send + Sync {
    /// Start a calibration countdown
    async fn calibrate(&self, request: &CalibrateRequest) -> Result<ApiResponse>;

    /// Start recording a take
    async fn start_recording(&self, request: &StartRecordingRequest) -> Result<ApiResponse>;

    /// Stop the current take
    async fn stop_recording(&self, request: &StopRecordingRequest) -> Result<ApiResponse>;

    /// Returns true if the service accepts connections
    async fn is_reachable(&self) -> bool;
}
