use std::fmt;

/// Result of probing one identity against the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected(RejectReason),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }

    pub fn rejection(&self) -> Option<&RejectReason> {
        match self {
            Outcome::Accepted => None,
            Outcome::Rejected(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    Forbidden,
    Redirected(u16),
    ClientError(u16),
    ServerError(u16),
    Unexpected(u16),
    Timeout,
    ConnectionFailed,
    ProxyFailed,
    InvalidUrl,
    Other(String),
}

impl RejectReason {
    /// Blocked identities and transport failures are reported at warning level.
    pub fn is_blocking(&self) -> bool {
        !matches!(
            self,
            RejectReason::Redirected(_)
                | RejectReason::ClientError(_)
                | RejectReason::ServerError(_)
                | RejectReason::Unexpected(_)
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RejectReason::Forbidden => Some(403),
            RejectReason::Redirected(code)
            | RejectReason::ClientError(code)
            | RejectReason::ServerError(code)
            | RejectReason::Unexpected(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Forbidden => write!(f, "blocked with 403 forbidden"),
            RejectReason::Redirected(code) => write!(f, "redirected with status {code}"),
            RejectReason::ClientError(code) => write!(f, "client error status {code}"),
            RejectReason::ServerError(code) => write!(f, "server error status {code}"),
            RejectReason::Unexpected(code) => write!(f, "unexpected status {code}"),
            RejectReason::Timeout => write!(f, "repeated timeouts"),
            RejectReason::ConnectionFailed => write!(f, "connection failed"),
            RejectReason::ProxyFailed => write!(f, "proxy failed"),
            RejectReason::InvalidUrl => write!(f, "invalid target url"),
            RejectReason::Other(message) => write!(f, "request failed: {message}"),
        }
    }
}

/// Maps an HTTP status code to a probe outcome. Only 200 is accepted.
pub fn classify_status(status: u16) -> Outcome {
    match status {
        200 => Outcome::Accepted,
        403 => Outcome::Rejected(RejectReason::Forbidden),
        300..=399 => Outcome::Rejected(RejectReason::Redirected(status)),
        400..=499 => Outcome::Rejected(RejectReason::ClientError(status)),
        500..=599 => Outcome::Rejected(RejectReason::ServerError(status)),
        _ => Outcome::Rejected(RejectReason::Unexpected(status)),
    }
}
