//! Host/scheme resolution for the per-request description document.
//!
//! The host advertised to documentation viewers is always the request's `Host`
//! header. The scheme defaults to the request protocol, unless a [`SchemeRule`]
//! matches: hosting platforms that terminate TLS upstream report `http` to the
//! application, so their hosts get `https` forced instead.

use std::fmt;
use std::str::FromStr;

use crate::document::ApiDocument;

/// Forces a scheme when the request protocol and host match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeRule {
    /// Substring the request host must contain.
    pub host_pattern: String,
    /// Request protocol the rule applies to.
    pub protocol_in: String,
    /// Scheme advertised when the rule matches.
    pub forced_scheme: String,
}

impl SchemeRule {
    pub fn new(
        host_pattern: impl Into<String>,
        protocol_in: impl Into<String>,
        forced_scheme: impl Into<String>,
    ) -> Self {
        Self {
            host_pattern: host_pattern.into(),
            protocol_in: protocol_in.into(),
            forced_scheme: forced_scheme.into(),
        }
    }

    /// Render.com terminates TLS at its proxy.
    pub fn onrender() -> Self {
        Self::new("onrender.com", "http", "https")
    }

    /// Whether this rule applies to the given request protocol and host.
    pub fn matches(&self, protocol: &str, host: &str) -> bool {
        protocol == self.protocol_in && host.contains(self.host_pattern.as_str())
    }
}

/// Error parsing a `pattern:protocol_in:forced` rule.
///
/// The last two `:`-separated fields are the protocol and the forced scheme;
/// everything before them is the host pattern, so `localhost:8080:http:https`
/// is a valid rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid scheme rule {0:?}: expected pattern:protocol_in:forced_scheme")]
pub struct RuleParseError(pub String);

impl FromStr for SchemeRule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Split from the right: the pattern may carry a port (`localhost:8080`).
        let mut parts: Vec<&str> = s.trim().rsplitn(3, ':').map(str::trim).collect();
        parts.reverse();
        match parts.as_slice() {
            [pattern, protocol_in, forced]
                if !pattern.is_empty() && !protocol_in.is_empty() && !forced.is_empty() =>
            {
                Ok(Self::new(*pattern, *protocol_in, *forced))
            }
            _ => Err(RuleParseError(s.to_string())),
        }
    }
}

impl fmt::Display for SchemeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.host_pattern, self.protocol_in, self.forced_scheme
        )
    }
}

/// The `(scheme, host)` pair stamped into a document snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOrigin {
    pub scheme: String,
    pub host: String,
}

impl ResolvedOrigin {
    /// Write `host` and `schemes` into a snapshot. These are the only fields changed.
    pub fn apply(&self, doc: &mut ApiDocument) {
        doc.host = self.host.clone();
        doc.schemes = vec![self.scheme.clone()];
    }
}

/// Ordered scheme override table. The first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSchemeResolver {
    rules: Vec<SchemeRule>,
}

impl Default for HostSchemeResolver {
    fn default() -> Self {
        Self {
            rules: vec![SchemeRule::onrender()],
        }
    }
}

impl HostSchemeResolver {
    /// A resolver with no overrides at all.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule after the existing ones.
    #[must_use]
    pub fn with_rule(mut self, rule: SchemeRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append several rules, keeping their order.
    #[must_use]
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = SchemeRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn rules(&self) -> &[SchemeRule] {
        &self.rules
    }

    /// Compute the advertised origin for a request.
    pub fn resolve(&self, protocol: &str, host: &str) -> ResolvedOrigin {
        let scheme = self
            .rules
            .iter()
            .find(|rule| rule.matches(protocol, host))
            .map_or(protocol, |rule| rule.forced_scheme.as_str());

        ResolvedOrigin {
            scheme: scheme.to_string(),
            host: host.to_string(),
        }
    }
}
