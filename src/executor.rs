//! # Action Executor
//!
//! Performs the side effect for one accepted action and reports the outcome.
//!
//! All failures stop here: service errors, non-OK response codes and
//! automation misses are logged and folded into [`ActionOutcome::Failure`].
//! Nothing returned by [`Executor::execute`] can stop the polling loop.

use tracing::{error, info, warn};

use crate::automation::RecordAutomation;
use crate::dispatch::ActionKind;
use crate::error::{BridgeError, Result};
use crate::service::protocol::{
    ApiResponse, CalibrateRequest, ResponseCode, StartRecordingRequest, StopRecordingRequest,
};
use crate::service::CaptureService;

/// Result of running one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Success,
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub action: ActionKind,
    pub outcome: ActionOutcome,
}

impl ActionResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome == ActionOutcome::Success
    }
}

/// Runs actions against the capture service and the optional automation.
pub struct Executor {
    service: Box<dyn CaptureService>,
    automation: Option<RecordAutomation>,
    calibration: CalibrateRequest,
    recording: bool,
}

impl Executor {
    pub fn new(
        service: Box<dyn CaptureService>,
        automation: Option<RecordAutomation>,
        calibration: CalibrateRequest,
    ) -> Self {
        Self {
            service,
            automation,
            calibration,
            recording: false,
        }
    }

    /// Whether a take is believed to be in progress
    ///
    /// Tracked from the service's answers to start/stop commands only.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    #[must_use]
    pub fn automation_enabled(&self) -> bool {
        self.automation.is_some()
    }

    /// Probe the capture service
    pub async fn service_reachable(&self) -> bool {
        self.service.is_reachable().await
    }

    /// Run `action` to completion. Never fails; see [`ActionResult`].
    pub async fn execute(&mut self, action: ActionKind) -> ActionResult {
        let mut failures = Vec::new();

        if let Err(e) = self.send(action).await {
            log_failure(action, &e);
            failures.push(e.to_string());
        }

        // The second application is driven even if the service call failed,
        // so one of the two still captures the take.
        if let Err(e) = self.automate(action).await {
            log_failure(action, &e);
            failures.push(e.to_string());
        }

        let outcome = if failures.is_empty() {
            ActionOutcome::Success
        } else {
            ActionOutcome::Failure(failures.join("; "))
        };
        ActionResult { action, outcome }
    }

    async fn send(&mut self, action: ActionKind) -> Result<()> {
        match action {
            ActionKind::Calibrate => {
                info!(
                    "Calibrating ({} s countdown, pose {:?})...",
                    self.calibration.countdown_delay, self.calibration.pose
                );
                let response = check(self.service.calibrate(&self.calibration).await?)?;
                info!("Calibration OK: {}", response.description);
            }
            ActionKind::StartRecord => {
                info!("Starting recording...");
                let response = self
                    .service
                    .start_recording(&StartRecordingRequest::default())
                    .await?;
                self.track_recording(&response, true);
                let response = check(response)?;
                info!("Recording started: {}", response.description);
            }
            ActionKind::StopRecord => {
                info!("Stopping recording...");
                let response = self
                    .service
                    .stop_recording(&StopRecordingRequest::default())
                    .await?;
                self.track_recording(&response, false);
                let response = check(response)?;
                info!("Recording stopped: {}", response.description);
            }
        }
        Ok(())
    }

    async fn automate(&self, action: ActionKind) -> Result<()> {
        let Some(automation) = &self.automation else {
            return Ok(());
        };

        match action {
            ActionKind::Calibrate => Ok(()),
            ActionKind::StartRecord => automation.start().await,
            ActionKind::StopRecord => automation.stop().await,
        }
    }

    /// OK, or an "already in that state" answer, both settle the state.
    fn track_recording(&mut self, response: &ApiResponse, starting: bool) {
        match response.code() {
            ResponseCode::Ok => self.recording = starting,
            ResponseCode::RecordingAlreadyStarted => self.recording = true,
            ResponseCode::RecordingNotStarted => self.recording = false,
            _ => {}
        }
    }
}

fn check(response: ApiResponse) -> Result<ApiResponse> {
    if response.is_ok() {
        Ok(response)
    } else {
        Err(BridgeError::Application {
            code: response.response_code,
            description: response.description,
        })
    }
}

fn log_failure(action: ActionKind, error: &BridgeError) {
    match error {
        BridgeError::Application { code, description } => {
            error!("{}: {} - {}", action, ResponseCode::from(*code), description);
        }
        BridgeError::ServiceUnreachable(reason) => {
            error!("{} failed - capture service unreachable ({})", action, reason);
        }
        BridgeError::AutomationMiss(what) => {
            warn!("{}: {} - is the recording application open?", action, what);
        }
        other => {
            error!("{} failed: {}", action, other);
        }
    }
}
