//! # Bridge Loop
//!
//! Ties input, dispatch and execution together:
//!
//! ```text
//! poll → edge → debounce → dispatch → execute → log
//! ```
//!
//! The loop runs on a single task. Actions are awaited inline, so a slow
//! service call delays the next poll instead of overlapping with it; presses
//! are human-paced, and this also caps the action rate.

use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::controller::buttons;
use crate::controller::input::{EdgeDetector, InputSource};
use crate::dispatch::Dispatcher;
use crate::error::{BridgeError, Result};
use crate::executor::{ActionResult, Executor};

/// Loop timing
#[derive(Debug, Clone, Copy)]
pub struct BridgeTiming {
    /// How often the controller is sampled
    pub poll_interval: Duration,
    /// How often the capture service is probed
    pub health_check_interval: Duration,
}

pub struct Bridge<I: InputSource> {
    input: I,
    // None until the first successful poll
    edges: Option<EdgeDetector>,
    dispatcher: Dispatcher,
    executor: Executor,
    service_reachable: Option<bool>,
}

impl<I: InputSource> Bridge<I> {
    pub fn new(input: I, dispatcher: Dispatcher, executor: Executor) -> Self {
        Self {
            input,
            edges: None,
            dispatcher,
            executor,
            service_reachable: None,
        }
    }

    #[must_use]
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// One polling tick.
    ///
    /// Returns the results of any actions run during the tick.
    ///
    /// # Errors
    ///
    /// Only fatal input errors are returned. A transient read failure skips
    /// the tick and leaves the edge state untouched.
    ///
    /// The first successful sample only records which buttons are held;
    /// nothing is dispatched for buttons already down at startup.
    pub async fn tick(&mut self, now: Instant) -> Result<Vec<ActionResult>> {
        let held = match self.input.poll() {
            Ok(held) => held,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("Skipping tick: {}", e);
                return Ok(Vec::new());
            }
        };

        let Some(edges) = self.edges.as_mut() else {
            if !held.is_empty() {
                debug!("Ignoring buttons held at startup: {:?}", held);
            }
            self.edges = Some(EdgeDetector::seeded(held));
            return Ok(Vec::new());
        };

        let events = edges.update(&held, now);
        for event in events.iter().filter(|e| e.pressed) {
            debug!(
                "Button {} ({}) pressed",
                event.button,
                buttons::name_of(event.button)
            );
        }

        let actions = self.dispatcher.dispatch(&events);
        let mut results = Vec::with_capacity(actions.len());
        for action in actions {
            info!("{} triggered", action);
            results.push(self.executor.execute(action).await);
        }
        Ok(results)
    }

    /// Probe the service and log when its reachability changes.
    pub async fn check_service(&mut self) -> bool {
        let reachable = self.executor.service_reachable().await;
        if self.service_reachable != Some(reachable) {
            if reachable {
                info!("Capture service is reachable");
            } else {
                warn!("Capture service is not reachable");
            }
            self.service_reachable = Some(reachable);
        }
        reachable
    }

    /// Run until Ctrl+C, `shutdown` resolves, or the controller is lost.
    ///
    /// # Errors
    ///
    /// Returns `ControllerDisconnected` (or another fatal input error) if the
    /// controller goes away.
    pub async fn run_until<F>(mut self, timing: BridgeTiming, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut poll = interval(timing.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut health = interval(timing.health_check_interval);
        health.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        tokio::pin!(shutdown);

        info!("Listening for button presses... (Ctrl+C to quit)");

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    self.tick(Instant::now()).await?;
                }

                _ = health.tick() => {
                    self.check_service().await;
                }

                _ = &mut ctrl_c => {
                    info!("Received Ctrl+C, shutting down...");
                    break;
                }

                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Run until Ctrl+C or the controller is lost.
    pub async fn run(self, timing: BridgeTiming) -> Result<()> {
        self.run_until(timing, std::future::pending()).await
    }
}

impl<I: InputSource> std::fmt::Debug for Bridge<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("dispatcher", &self.dispatcher)
            .field("held", &self.edges.as_ref().map(EdgeDetector::held))
            .finish_non_exhaustive()
    }
}

/// True when an error from [`Bridge::run`] means the controller went away.
pub fn is_device_loss(error: &BridgeError) -> bool {
    matches!(error, BridgeError::ControllerDisconnected)
}
