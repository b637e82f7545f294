//! Agent filter engine: live probing, pacing and persistence around the core types.
mod events;
mod filter;
mod pacing;
mod persist;
mod proxy;
mod source;
mod transport;
mod types;
mod validator;

pub use events::{ChannelSink, DiagnosticSink, FilterEvent, LogSink, NullSink};
pub use filter::{AgentFilter, FilterSettings};
pub use pacing::{Pacer, TokioPacer};
pub use persist::{write_accepted, PersistError};
pub use proxy::{load_proxy_file, ProxyDescriptor};
pub use source::load_candidates;
pub use transport::{ProbeRequest, ReqwestTransport, Transport, TransportSettings};
pub use types::{RunError, TransportError, TransportFailure};
pub use validator::{ProbeSettings, Validator};
