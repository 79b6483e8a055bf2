//! Admission checks.
//!
//! # Responsibilities
//! - Restrict methods to GET/HEAD on surfaces that carry one
//! - Verify the shared-secret header
//! - Check the target token against the allowlist
//!
//! # Design Decisions
//! - Rules run in a fixed order; the first failing rule decides the rejection
//! - Allowlist membership is exact byte equality, no normalization
//! - Header keys compare case-sensitively unless explicitly configured otherwise
//! - Carriers that lowercase header names are matched against the lowercased key

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Methods admitted on surfaces that restrict methods.
const ADMITTED_METHODS: [&str; 2] = ["GET", "HEAD"];

/// Split a comma-separated allowlist without trimming or dropping empty entries.
pub fn split_allowed_urls(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(String::from).collect()
}

/// Set of exact `host[:port]/path` tokens that may be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    entries: HashSet<String>,
}

impl Allowlist {
    /// Parse a comma-separated list.
    ///
    /// An empty input yields an empty allowlist. Otherwise entries are taken
    /// verbatim, so `"a,"` admits both `"a"` and `""`.
    pub fn parse(raw: &str) -> Self {
        Self::from_entries(split_allowed_urls(raw))
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, target: &str) -> bool {
        self.entries.contains(target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in sorted order, for logging.
    pub fn sorted(&self) -> Vec<&str> {
        let mut entries: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        entries.sort_unstable();
        entries
    }
}

/// How the expected header's key is looked up in the request headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderKeyCase {
    /// Raw map lookup; `test-header` does not satisfy `TEST-HEADER`.
    #[default]
    Exact,
    /// ASCII case-insensitive lookup.
    Insensitive,
}

/// Shared-secret header every request must carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedHeader {
    pub name: String,
    pub value: String,
    pub key_case: HeaderKeyCase,
}

impl ExpectedHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            key_case: HeaderKeyCase::Exact,
        }
    }

    pub fn with_key_case(mut self, key_case: HeaderKeyCase) -> Self {
        self.key_case = key_case;
        self
    }

    /// The check only runs when a name is configured, regardless of the value.
    pub fn is_enabled(&self) -> bool {
        !self.name.is_empty()
    }

    /// Returns true if `headers` satisfy this expectation.
    pub fn is_satisfied_by(&self, headers: &HashMap<String, String>) -> bool {
        self.matches(headers, false)
    }

    /// Same as [`is_satisfied_by`](Self::is_satisfied_by) for headers whose
    /// names were lowercased in transit. The configured key is folded to match.
    pub fn is_satisfied_by_folded(&self, headers: &HashMap<String, String>) -> bool {
        self.matches(headers, true)
    }

    fn matches(&self, headers: &HashMap<String, String>, folded: bool) -> bool {
        if !self.is_enabled() {
            return true;
        }
        let found = match (self.key_case, folded) {
            (HeaderKeyCase::Exact, false) => headers.get(&self.name),
            (HeaderKeyCase::Exact, true) => headers.get(&self.name.to_ascii_lowercase()),
            (HeaderKeyCase::Insensitive, _) => headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(&self.name))
                .map(|(_, value)| value),
        };
        found.is_some_and(|value| *value == self.value)
    }
}

/// A request normalized by a surface adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundRequest {
    /// Set only by surfaces that restrict methods.
    pub method: Option<String>,
    /// Requested upstream token; empty when the caller supplied none.
    pub target: String,
    pub headers: HashMap<String, String>,
    /// Header names arrived lowercased (HTTP/1.1 and HTTP/2 via hyper).
    pub header_names_folded: bool,
}

impl InboundRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_folded_header_names(mut self) -> Self {
        self.header_names_folded = true;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MethodNotAllowed,
    Header,
    TargetNotAllowed,
}

impl Rejection {
    /// Short label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::MethodNotAllowed => "method_not_allowed",
            Rejection::Header => "header",
            Rejection::TargetNotAllowed => "target_not_allowed",
        }
    }
}

/// Run the admission rules in order.
pub fn check_admission(
    request: &InboundRequest,
    allowlist: &Allowlist,
    expected_header: &ExpectedHeader,
) -> Result<(), Rejection> {
    if let Some(method) = &request.method {
        if !ADMITTED_METHODS.contains(&method.as_str()) {
            return Err(Rejection::MethodNotAllowed);
        }
    }

    let header_ok = if request.header_names_folded {
        expected_header.is_satisfied_by_folded(&request.headers)
    } else {
        expected_header.is_satisfied_by(&request.headers)
    };
    if !header_ok {
        return Err(Rejection::Header);
    }

    if !allowlist.contains(&request.target) {
        return Err(Rejection::TargetNotAllowed);
    }

    Ok(())
}
