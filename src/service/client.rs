//! HTTP client for the capture service

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

use super::protocol::{
    ApiResponse, CalibrateRequest, StartRecordingRequest, StopRecordingRequest, CALIBRATE_COMMAND,
};
use super::CaptureService;
use crate::config::ServiceConfig;
use crate::error::{BridgeError, Result};

/// How long the reachability probe waits for a TCP connect
const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Capture service client over HTTP
///
/// Every command is a `POST {base_url}/{command}` with a JSON body.
pub struct HttpCaptureClient {
    http: reqwest::Client,
    base_url: String,
    host: String,
    port: u16,
    start_recording_path: String,
    stop_recording_path: String,
}

impl std::fmt::Debug for HttpCaptureClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // base_url carries the API key
        f.debug_struct("HttpCaptureClient")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl HttpCaptureClient {
    /// Build a client from the `[service]` config section
    ///
    /// # Errors
    ///
    /// Returns `Service` if the underlying HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rokoko_bridge::config::ServiceConfig;
    /// use rokoko_bridge::service::HttpCaptureClient;
    ///
    /// let client = HttpCaptureClient::new(&ServiceConfig::default())?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| BridgeError::Service(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            host: config.host.clone(),
            port: config.port,
            start_recording_path: config.start_recording_path.clone(),
            stop_recording_path: config.stop_recording_path.clone(),
        })
    }

    async fn post<B: Serialize + Sync>(&self, command: &str, body: &B) -> Result<ApiResponse> {
        let url = format!("{}/{}", self.base_url, command);
        debug!("POST {}/{}", self.host, command);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| request_error(command, e))?;

        // Studio reports failures in the body, sometimes with a non-2xx
        // status, so the body is parsed either way.
        let status = response.status();
        let text = response.text().await.map_err(|e| request_error(command, e))?;

        serde_json::from_str(&text).map_err(|e| {
            BridgeError::Service(format!(
                "{} returned HTTP {} with an unreadable body: {}",
                command, status, e
            ))
        })
    }
}

fn request_error(command: &str, error: reqwest::Error) -> BridgeError {
    if error.is_connect() || error.is_timeout() {
        BridgeError::ServiceUnreachable(format!("{}: {}", command, error))
    } else {
        BridgeError::Service(format!("{} request failed: {}", command, error))
    }
}

#[async_trait]
impl CaptureService for HttpCaptureClient {
    async fn calibrate(&self, request: &CalibrateRequest) -> Result<ApiResponse> {
        self.post(CALIBRATE_COMMAND, request).await
    }

    async fn start_recording(&self, request: &StartRecordingRequest) -> Result<ApiResponse> {
        self.post(&self.start_recording_path, request).await
    }

    async fn stop_recording(&self, request: &StopRecordingRequest) -> Result<ApiResponse> {
        self.post(&self.stop_recording_path, request).await
    }

    async fn is_reachable(&self) -> bool {
        matches!(
            tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect((self.host.as_str(), self.port))).await,
            Ok(Ok(_))
        )
    }
}
