use std::path::Path;
use std::sync::Arc;

use agent_filter_core::{sample_candidates, DelayRange, FilterReport, HeaderTemplate};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::source::load_with_blank_count;
use crate::{
    write_accepted, DiagnosticSink, FilterEvent, LogSink, Pacer, ProbeSettings, ProxyDescriptor,
    ReqwestTransport, RunError, TokioPacer, Transport, TransportSettings, Validator,
};

#[derive(Debug, Clone)]
pub struct FilterSettings {
    pub target: String,
    pub proxy: Option<ProxyDescriptor>,
    pub delay_range: DelayRange,
    pub probe: ProbeSettings,
    pub headers: HeaderTemplate,
    /// Probe only a random subset of this size from the loaded pool.
    pub sample: Option<usize>,
    /// Fixes the random source for delays and sampling.
    pub seed: Option<u64>,
}

impl FilterSettings {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            proxy: None,
            delay_range: DelayRange::default(),
            probe: ProbeSettings::default(),
            headers: HeaderTemplate::browser(),
            sample: None,
            seed: None,
        }
    }
}

/// Sequentially probes candidates against one target and keeps those accepted.
///
/// Probes never overlap: each one completes (or times out) and the pacer waits a
/// randomized delay before the next one starts.
pub struct AgentFilter<T> {
    validator: Validator<T>,
    settings: FilterSettings,
    pacer: Arc<dyn Pacer>,
    sink: Arc<dyn DiagnosticSink>,
}

impl AgentFilter<ReqwestTransport> {
    pub fn with_reqwest(settings: FilterSettings, transport: TransportSettings) -> Self {
        Self::new(ReqwestTransport::new(transport), settings)
    }
}

impl<T: Transport> AgentFilter<T> {
    pub fn new(transport: T, settings: FilterSettings) -> Self {
        Self {
            validator: Validator::new(transport, settings.probe),
            settings,
            pacer: Arc::new(TokioPacer),
            sink: Arc::new(LogSink),
        }
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    /// Probes every non-blank candidate in order. Per-candidate failures are
    /// folded into the report; this never fails.
    pub async fn filter_agents<I, S>(&self, candidates: I) -> FilterReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rng = self.rng();
        let mut report = FilterReport::new();
        let mut probed_any = false;

        for candidate in candidates {
            let identity = candidate.as_ref().trim();
            if identity.is_empty() {
                report.skip_blank();
                continue;
            }

            if probed_any {
                let delay = self.settings.delay_range.sample(&mut rng);
                self.sink.emit(FilterEvent::Delaying { delay });
                self.pacer.pause(delay).await;
            }
            probed_any = true;

            let headers = self.settings.headers.for_identity(identity);
            let outcome = self
                .validator
                .probe(
                    identity,
                    &self.settings.target,
                    &headers,
                    self.settings.proxy.as_ref(),
                    self.sink.as_ref(),
                )
                .await;
            report.record(identity.to_string(), outcome);
        }

        if report.accepted.is_empty() {
            self.sink.emit(FilterEvent::NoneAccepted);
        }
        report
    }

    /// Loads candidates from `source`, filters them and, when `output` is given,
    /// overwrites it with the accepted identities.
    ///
    /// An unreadable source fails before any probe. A failed write still hands
    /// back the computed report inside [`RunError::SinkUnwritable`].
    pub async fn run(&self, source: &Path, output: Option<&Path>) -> Result<FilterReport, RunError> {
        let (pool, blank_lines) = load_with_blank_count(source)?;
        self.sink.emit(FilterEvent::CandidatesLoaded {
            path: source.to_path_buf(),
            count: pool.len(),
        });

        let candidates = match self.settings.sample {
            Some(requested) => {
                let selection = sample_candidates(&pool, requested, &mut self.rng());
                if let Some(available) = selection.clamped_to {
                    self.sink.emit(FilterEvent::SampleClamped {
                        requested,
                        available,
                    });
                }
                selection.candidates
            }
            None => pool,
        };

        let mut report = self.filter_agents(&candidates).await;
        report.skipped_blank += blank_lines;

        let Some(path) = output else {
            return Ok(report);
        };
        match write_accepted(path, report.accepted()) {
            Ok(()) => {
                self.sink.emit(FilterEvent::Persisted {
                    path: path.to_path_buf(),
                    count: report.accepted.len(),
                });
                Ok(report)
            }
            Err(source) => Err(RunError::SinkUnwritable {
                path: path.to_path_buf(),
                report,
                source,
            }),
        }
    }

    fn rng(&self) -> StdRng {
        match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
