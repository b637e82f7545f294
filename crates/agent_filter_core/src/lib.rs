//! Agent filter core: pure domain types for probing User-Agent identities.
mod candidates;
mod delay;
mod headers;
mod outcome;
mod report;
mod selection;

pub use candidates::{parse_candidates, render_accepted};
pub use delay::{DelayRange, DelayRangeError};
pub use headers::{HeaderTemplate, ProbeHeaders, USER_AGENT};
pub use outcome::{classify_status, Outcome, RejectReason};
pub use report::FilterReport;
pub use selection::{sample_candidates, AcceptedSet, Selection};
