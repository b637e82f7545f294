pub const USER_AGENT: &str = "User-Agent";

const BROWSER_HEADERS: [(&str, &str); 8] = [
    ("Accept", "application/json, text/javascript, */*; q=0.01"),
    ("Accept-Encoding", "gzip, deflate, br, zstd"),
    (
        "Accept-Language",
        "en-IN,en-GB;q=0.9,en-US;q=0.8,en;q=0.7,ml;q=0.6",
    ),
    ("Cache-Control", "no-cache"),
    ("Sec-Fetch-Dest", "empty"),
    ("Sec-Fetch-Mode", "cors"),
    ("Sec-Fetch-Site", "same-origin"),
    ("X-Requested-With", "XMLHttpRequest"),
];

/// Base header set shared by every probe of a run.
///
/// The template itself is never mutated per candidate; [`HeaderTemplate::for_identity`]
/// produces an independent [`ProbeHeaders`] value for each probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTemplate {
    headers: Vec<(String, String)>,
}

impl HeaderTemplate {
    pub fn browser() -> Self {
        Self {
            headers: BROWSER_HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Adds or replaces a header. Names compare case-insensitively.
    /// The User-Agent slot cannot be set here.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if name.eq_ignore_ascii_case(USER_AGENT) {
            return self;
        }
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    pub fn for_identity(&self, identity: &str) -> ProbeHeaders {
        let mut headers = Vec::with_capacity(self.headers.len() + 1);
        headers.push((USER_AGENT.to_string(), identity.to_string()));
        headers.extend(self.headers.iter().cloned());
        ProbeHeaders { headers }
    }
}

impl Default for HeaderTemplate {
    fn default() -> Self {
        Self::browser()
    }
}

/// Headers for a single probe; the User-Agent entry is always first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHeaders {
    headers: Vec<(String, String)>,
}

impl ProbeHeaders {
    pub fn user_agent(&self) -> &str {
        &self.headers[0].1
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
