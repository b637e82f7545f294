use std::time::Duration;

use agent_filter_core::{classify_status, Outcome, ProbeHeaders, RejectReason};

use crate::{DiagnosticSink, FilterEvent, ProbeRequest, ProxyDescriptor, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    pub timeout: Duration,
    /// Total attempts allowed when the target keeps timing out. Values below 1 act as 1.
    pub max_retries: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 3,
        }
    }
}

/// Probes one identity at a time and classifies the response.
///
/// Only timeouts are retried; every other failure resolves on first occurrence.
/// No path escapes as an error: the result is always an [`Outcome`].
pub struct Validator<T> {
    transport: T,
    settings: ProbeSettings,
}

impl<T: Transport> Validator<T> {
    pub fn new(transport: T, settings: ProbeSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    pub async fn probe(
        &self,
        identity: &str,
        target: &str,
        headers: &ProbeHeaders,
        proxy: Option<&ProxyDescriptor>,
        sink: &dyn DiagnosticSink,
    ) -> Outcome {
        let max_retries = self.settings.max_retries.max(1);
        let mut attempt = 0;

        let outcome = loop {
            attempt += 1;
            let request = ProbeRequest {
                target: target.to_string(),
                headers: headers.clone(),
                proxy: proxy.cloned(),
                timeout: self.settings.timeout,
            };

            match self.transport.send(&request).await {
                Ok(status) => break classify_status(status),
                Err(err) if err.kind.is_retryable() && attempt < max_retries => {
                    sink.emit(FilterEvent::RetryingAfterTimeout {
                        identity: identity.to_string(),
                        attempt,
                        max_retries,
                    });
                }
                Err(err) => break Outcome::Rejected(RejectReason::from(err)),
            }
        };

        match &outcome {
            Outcome::Accepted => sink.emit(FilterEvent::Accepted {
                identity: identity.to_string(),
                target: target.to_string(),
            }),
            Outcome::Rejected(reason) => sink.emit(FilterEvent::Rejected {
                identity: identity.to_string(),
                target: target.to_string(),
                reason: reason.clone(),
            }),
        }
        outcome
    }
}
