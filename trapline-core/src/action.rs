//! The fixed action vocabulary for rule components.
//!
//! Components travel with a plain-string action name, since the server is
//! the authority on what it accepts. This enum is the console's own copy of
//! that vocabulary: every lookup (validity, label, cardinality) is an
//! exhaustive match, so adding a name forces a decision at each site
//! instead of silently falling through a string table.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::models::NetworkProtocol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionName {
    DnsType,
    DnsData,
    HttpMethod,
    HttpTls,
    HttpPath,
    HttpHeader,
    HttpHeaders,
    HttpHeadersKeys,
    HttpHeadersValues,
    HttpHeadersRegexes,
    HttpBody,
    HttpCode,
    HttpPassthru,
    Var,
}

impl ActionName {
    /// All known action names, in display order.
    pub const ALL: [ActionName; 14] = [
        ActionName::DnsType,
        ActionName::DnsData,
        ActionName::HttpMethod,
        ActionName::HttpTls,
        ActionName::HttpPath,
        ActionName::HttpHeader,
        ActionName::HttpHeaders,
        ActionName::HttpHeadersKeys,
        ActionName::HttpHeadersValues,
        ActionName::HttpHeadersRegexes,
        ActionName::HttpBody,
        ActionName::HttpCode,
        ActionName::HttpPassthru,
        ActionName::Var,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::DnsType => "dns.type",
            ActionName::DnsData => "dns.data",
            ActionName::HttpMethod => "http.method",
            ActionName::HttpTls => "http.tls",
            ActionName::HttpPath => "http.path",
            ActionName::HttpHeader => "http.header",
            ActionName::HttpHeaders => "http.headers",
            ActionName::HttpHeadersKeys => "http.headers.keys",
            ActionName::HttpHeadersValues => "http.headers.values",
            ActionName::HttpHeadersRegexes => "http.headers.regexes",
            ActionName::HttpBody => "http.body",
            ActionName::HttpCode => "http.code",
            ActionName::HttpPassthru => "http.passthru",
            ActionName::Var => "var",
        }
    }

    /// Parse a wire name. `None` marks a name this console version does not
    /// know; callers decide whether that is a warning or an error.
    pub fn parse(s: &str) -> Option<ActionName> {
        ActionName::ALL.iter().copied().find(|a| a.as_str() == s)
    }

    /// Whether this action makes sense on the given protocol and side.
    ///
    /// This is the cross-constraint the template compiler deliberately does
    /// not enforce; the server revalidates on component creation.
    pub fn valid_for(&self, protocol: NetworkProtocol, is_predicate: bool) -> bool {
        match (self, protocol, is_predicate) {
            (ActionName::DnsType, NetworkProtocol::Dns, _) => true,
            (ActionName::DnsData, NetworkProtocol::Dns, false) => true,

            (ActionName::HttpMethod, NetworkProtocol::Http, true) => true,
            (ActionName::HttpTls, NetworkProtocol::Http, true) => true,
            (ActionName::HttpPath, NetworkProtocol::Http, true) => true,
            (ActionName::HttpHeadersKeys, NetworkProtocol::Http, true) => true,
            (ActionName::HttpHeadersValues, NetworkProtocol::Http, true) => true,
            (ActionName::HttpHeadersRegexes, NetworkProtocol::Http, true) => true,

            (ActionName::HttpHeader, NetworkProtocol::Http, _) => true,
            (ActionName::HttpBody, NetworkProtocol::Http, _) => true,

            (ActionName::HttpHeaders, NetworkProtocol::Http, false) => true,
            (ActionName::HttpCode, NetworkProtocol::Http, false) => true,
            (ActionName::HttpPassthru, NetworkProtocol::Http, false) => true,

            (ActionName::Var, _, false) => true,

            _ => false,
        }
    }

    /// Operator-facing display name. A few actions read differently as
    /// predicates, where their value is a matching expression.
    pub fn label(&self, is_predicate: bool) -> &'static str {
        match self {
            ActionName::DnsType => "DNS Type",
            ActionName::DnsData => "DNS Data",
            ActionName::HttpMethod => "HTTP Method(s)",
            ActionName::HttpTls => "HTTP TLS",
            ActionName::HttpPath => {
                if is_predicate {
                    "HTTP Path Regex"
                } else {
                    "HTTP Path"
                }
            }
            ActionName::HttpHeader => "HTTP Header",
            ActionName::HttpHeaders => "HTTP Headers",
            ActionName::HttpHeadersKeys => "HTTP Header Keys",
            ActionName::HttpHeadersValues => "HTTP Header Values",
            ActionName::HttpHeadersRegexes => "HTTP Header Regexes",
            ActionName::HttpBody => {
                if is_predicate {
                    "HTTP Body Regex"
                } else {
                    "HTTP Body"
                }
            }
            ActionName::HttpCode => "HTTP Code",
            ActionName::HttpPassthru => "HTTP Passthru",
            ActionName::Var => "Variable",
        }
    }

    /// Whether a rule may carry at most one component with this action on a
    /// given side. Headers and variables repeat; the rest do not.
    pub fn single_use(&self) -> bool {
        match self {
            ActionName::DnsType
            | ActionName::DnsData
            | ActionName::HttpMethod
            | ActionName::HttpPath
            | ActionName::HttpBody
            | ActionName::HttpCode
            | ActionName::HttpPassthru => true,
            ActionName::HttpTls
            | ActionName::HttpHeader
            | ActionName::HttpHeaders
            | ActionName::HttpHeadersKeys
            | ActionName::HttpHeadersValues
            | ActionName::HttpHeadersRegexes
            | ActionName::Var => false,
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionName::parse(s).ok_or_else(|| CoreError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for action in ActionName::ALL {
            assert_eq!(ActionName::parse(action.as_str()), Some(action));
        }
        assert_eq!(ActionName::parse("http.teapot"), None);
    }

    #[test]
    fn dns_predicates_only_match_types() {
        assert!(ActionName::DnsType.valid_for(NetworkProtocol::Dns, true));
        assert!(!ActionName::DnsData.valid_for(NetworkProtocol::Dns, true));
        assert!(ActionName::DnsData.valid_for(NetworkProtocol::Dns, false));
    }

    #[test]
    fn http_results_exclude_request_matchers() {
        assert!(ActionName::HttpCode.valid_for(NetworkProtocol::Http, false));
        assert!(!ActionName::HttpCode.valid_for(NetworkProtocol::Http, true));
        assert!(!ActionName::HttpMethod.valid_for(NetworkProtocol::Http, false));
        assert!(!ActionName::HttpCode.valid_for(NetworkProtocol::Dns, false));
    }

    #[test]
    fn body_label_depends_on_side() {
        assert_eq!(ActionName::HttpBody.label(true), "HTTP Body Regex");
        assert_eq!(ActionName::HttpBody.label(false), "HTTP Body");
    }

    #[test]
    fn headers_repeat_but_codes_do_not() {
        assert!(!ActionName::HttpHeader.single_use());
        assert!(ActionName::HttpCode.single_use());
    }
}
