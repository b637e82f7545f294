#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use agent_filter_engine::{
    DiagnosticSink, FilterEvent, Pacer, ProbeRequest, Transport, TransportError, TransportFailure,
};

pub fn init_logging() {
    engine_logging::initialize_for_tests();
}

pub fn failure(kind: TransportFailure) -> TransportError {
    TransportError::new(kind, format!("scripted {kind}"))
}

/// Answers per User-Agent from a script, falling back to a fixed result.
pub struct ScriptedTransport {
    script: Mutex<HashMap<String, VecDeque<Result<u16, TransportError>>>>,
    fallback: Result<u16, TransportError>,
    requests: Mutex<Vec<ProbeRequest>>,
}

impl ScriptedTransport {
    pub fn always(result: Result<u16, TransportError>) -> Self {
        Self {
            script: Mutex::new(HashMap::new()),
            fallback: result,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn status(status: u16) -> Self {
        Self::always(Ok(status))
    }

    pub fn respond(self, identity: &str, results: Vec<Result<u16, TransportError>>) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert(identity.to_string(), results.into());
        self
    }

    pub fn attempts(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProbeRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn probed_identities(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| request.headers.user_agent().to_string())
            .collect()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ProbeRequest) -> Result<u16, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let identity = request.headers.user_agent();
        self.script
            .lock()
            .unwrap()
            .get_mut(identity)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[derive(Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.pauses.lock().unwrap().push(delay);
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<FilterEvent>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<FilterEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, event: FilterEvent) {
        self.events.lock().unwrap().push(event);
    }
}
