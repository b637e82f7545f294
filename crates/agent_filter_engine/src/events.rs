use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use agent_filter_core::RejectReason;
use engine_logging::{engine_info, engine_warn};

/// Advisory progress of a filter run. Not part of the functional result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    CandidatesLoaded {
        path: PathBuf,
        count: usize,
    },
    SampleClamped {
        requested: usize,
        available: usize,
    },
    Accepted {
        identity: String,
        target: String,
    },
    Rejected {
        identity: String,
        target: String,
        reason: RejectReason,
    },
    RetryingAfterTimeout {
        identity: String,
        attempt: usize,
        max_retries: usize,
    },
    Delaying {
        delay: Duration,
    },
    NoneAccepted,
    Persisted {
        path: PathBuf,
        count: usize,
    },
}

pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: FilterEvent);
}

/// Forwards events to the `log` facade through the `engine_*` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, event: FilterEvent) {
        match event {
            FilterEvent::CandidatesLoaded { path, count } => {
                engine_info!("User agents loaded: {} from {:?}", count, path);
            }
            FilterEvent::SampleClamped {
                requested,
                available,
            } => {
                engine_warn!(
                    "Requested {} user agents, but only {} available",
                    requested,
                    available
                );
            }
            FilterEvent::Accepted { identity, target } => {
                engine_info!("User-Agent '{}' is working for {}", identity, target);
            }
            FilterEvent::Rejected {
                identity,
                target,
                reason,
            } => {
                if reason.is_blocking() {
                    engine_warn!("User-Agent '{}' rejected by {}: {}", identity, target, reason);
                } else {
                    engine_info!("User-Agent '{}' rejected by {}: {}", identity, target, reason);
                }
            }
            FilterEvent::RetryingAfterTimeout {
                identity,
                attempt,
                max_retries,
            } => {
                engine_warn!(
                    "Timeout for User-Agent '{}' (attempt {}/{}), retrying",
                    identity,
                    attempt,
                    max_retries
                );
            }
            FilterEvent::Delaying { delay } => {
                engine_info!(
                    "Delaying for {:.2} seconds before the next request",
                    delay.as_secs_f64()
                );
            }
            FilterEvent::NoneAccepted => {
                engine_warn!(
                    "No successful user agents found. Consider using a proxy if not already used."
                );
            }
            FilterEvent::Persisted { path, count } => {
                engine_info!("Wrote {} user agents to {:?}", count, path);
            }
        }
    }
}

pub struct ChannelSink {
    tx: mpsc::Sender<FilterEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<FilterEvent>) -> Self {
        Self { tx }
    }
}

impl DiagnosticSink for ChannelSink {
    fn emit(&self, event: FilterEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _event: FilterEvent) {}
}
