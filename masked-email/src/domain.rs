// masked-email/src/domain.rs
//! Canonical origins for user-supplied domains and URLs.
//!
//! Masked emails are bound to a `forDomain` string that is compared as an
//! origin: `<scheme>://<host>`, lower-cased, with the port, path, query,
//! fragment and user-info removed. Subdomains are kept so that different
//! subdomains stay distinct.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

pub const DEFAULT_SCHEME: &str = "https";

const SCHEME_SEPARATOR: &str = "://";

/// Caller-correctable input errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("domain cannot be empty")]
    EmptyInput,

    #[error("failed to parse domain {input:?}: {source}")]
    ParseFailure {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid domain {input:?}: missing host")]
    MissingHost { input: String },

    #[error("{input:?} looks like an email address; pass a domain or URL instead")]
    AmbiguousInput { input: String },

    #[error("{input:?} is not an email address")]
    NotAnEmail { input: String },
}

/// A normalized `<scheme>://<host>` identity. Equal origins are byte-equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Origin(String);

impl Origin {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn scheme(&self) -> &str {
        self.0
            .split_once(SCHEME_SEPARATOR)
            .map_or("", |(scheme, _)| scheme)
    }

    pub fn host(&self) -> &str {
        self.0
            .split_once(SCHEME_SEPARATOR)
            .map_or(self.0.as_str(), |(_, host)| host)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Origin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Origin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_origin(s)
    }
}

/// Convert a URL or bare domain into its canonical origin.
///
/// Input without a scheme is assumed to be `https`.
pub fn normalize_origin(input: &str) -> Result<Origin, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyInput);
    }

    let candidate: Cow<'_, str> = if trimmed.contains(SCHEME_SEPARATOR) {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("{}{}{}", DEFAULT_SCHEME, SCHEME_SEPARATOR, trimmed))
    };

    let parsed = match Url::parse(&candidate) {
        Ok(parsed) => parsed,
        Err(url::ParseError::EmptyHost) => return Err(missing_host(input)),
        Err(source) => {
            return Err(DomainError::ParseFailure {
                input: input.to_string(),
                source,
            })
        }
    };

    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    let host = host.trim_end_matches('.');
    if host.is_empty() {
        return Err(missing_host(input));
    }

    let scheme = match parsed.scheme().to_ascii_lowercase() {
        s if s.is_empty() => DEFAULT_SCHEME.to_string(),
        s => s,
    };

    Ok(Origin(format!("{}{}{}", scheme, SCHEME_SEPARATOR, host)))
}

fn missing_host(input: &str) -> DomainError {
    DomainError::MissingHost {
        input: input.to_string(),
    }
}

/// Compare two domain strings as origins. When either side does not
/// normalize, fall back to a case-insensitive comparison without trailing
/// slashes.
pub fn domains_equal(a: &str, b: &str) -> bool {
    match (normalize_origin(a), normalize_origin(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => loose_form(a) == loose_form(b),
    }
}

fn loose_form(s: &str) -> String {
    s.trim().to_lowercase().trim_end_matches('/').to_string()
}

/// Bare host of a domain string, if it normalizes
pub fn host_from_origin(input: &str) -> Option<String> {
    normalize_origin(input)
        .ok()
        .map(|origin| origin.host().to_string())
}

/// True when one host is a strict subdomain of the other, in either direction
pub fn is_subdomain(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() || a == b {
        return false;
    }
    is_strictly_under(a, b) || is_strictly_under(b, a)
}

fn is_strictly_under(child: &str, parent: &str) -> bool {
    child
        .strip_suffix(parent)
        .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.'))
}

/// Heuristic, not RFC 5322: exactly one `@` and no whitespace
pub fn looks_like_email_address(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.matches('@').count() == 1 && !trimmed.chars().any(char::is_whitespace)
}

/// A domain argument as typed by the user plus its canonical origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainInput {
    /// Trimmed original text, for display and free-text search
    pub display: String,
    pub origin: Origin,
}

pub fn prepare_domain_input(input: &str) -> Result<DomainInput, DomainError> {
    let trimmed = input.trim();
    if looks_like_email_address(trimmed) {
        return Err(DomainError::AmbiguousInput {
            input: trimmed.to_string(),
        });
    }

    let origin = normalize_origin(trimmed)?;
    Ok(DomainInput {
        display: trimmed.to_string(),
        origin,
    })
}

pub fn normalize_email_input(input: &str) -> Result<String, DomainError> {
    let trimmed = input.trim();
    if !looks_like_email_address(trimmed) {
        return Err(DomainError::NotAnEmail {
            input: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("example.com", "https://example.com")]
    #[case("HTTPS://Example.COM", "https://example.com")]
    #[case("http://sub.example.com/path", "http://sub.example.com")]
    #[case(" example.com/login ", "https://example.com")]
    #[case("https://example.com:443", "https://example.com")]
    #[case("https://example.com:8443/a?b=c#d", "https://example.com")]
    #[case("https://user:pw@example.com", "https://example.com")]
    #[case("ftp://example.com", "ftp://example.com")]
    #[case("example.com.", "https://example.com")]
    #[case("example.com..", "https://example.com")]
    #[case("custom://Host.Example", "custom://host.example")]
    fn test_normalize_origin(#[case] input: &str, #[case] expected: &str) {
        let origin = normalize_origin(input).unwrap();
        assert_eq!(origin.as_str(), expected);
    }

    #[rstest]
    #[case("example.com")]
    #[case("HTTP://Sub.Example.com:8080/x")]
    #[case("custom://Host.Example.")]
    #[case("example.com..")]
    #[case("https://[::1]:8080")]
    fn test_normalize_is_idempotent(#[case] input: &str) {
        let once = normalize_origin(input).unwrap();
        let twice = normalize_origin(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_errors() {
        assert_eq!(normalize_origin("   "), Err(DomainError::EmptyInput));
        assert!(matches!(
            normalize_origin("https://"),
            Err(DomainError::MissingHost { .. })
        ));
        assert!(matches!(
            normalize_origin("file:///etc/hosts"),
            Err(DomainError::MissingHost { .. })
        ));
        assert!(matches!(
            normalize_origin("exa mple.com"),
            Err(DomainError::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_origin_parts() {
        let origin: Origin = "HTTP://Sub.Example.com/path".parse().unwrap();
        assert_eq!(origin.scheme(), "http");
        assert_eq!(origin.host(), "sub.example.com");
        assert_eq!(origin.to_string(), "http://sub.example.com");
    }

    #[test]
    fn test_domains_equal() {
        assert!(domains_equal("https://Example.com", "https://example.com/"));
        assert!(domains_equal("HTTPS://Example.COM", "https://example.com/"));
        assert!(domains_equal("https://example.com", "Example.com"));
        assert!(domains_equal("https://example.com", "https://example.com/signup"));
        assert!(domains_equal("https://example.com:443", "https://example.com/signup"));
        assert!(!domains_equal("https://one.example.com", "https://two.example.com"));
        assert!(!domains_equal("ftp://example.com", "https://example.com"));
        assert!(!domains_equal("ftp://example.com", "example.com"));
    }

    #[test]
    fn test_domains_equal_falls_back_to_literal() {
        assert!(domains_equal("Not A Domain/", "not a domain"));
        assert!(!domains_equal("Not A Domain", "https://example.com"));
        assert!(domains_equal("", ""));
    }

    #[rstest]
    #[case("a.b.com", "b.com", true)]
    #[case("b.com", "a.b.com", true)]
    #[case("x.y.b.com", "b.com", true)]
    #[case("b.com", "b.com", false)]
    #[case("ab.com", "b.com", false)]
    #[case("a.c.com", "b.com", false)]
    #[case("", "b.com", false)]
    fn test_is_subdomain(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        assert_eq!(is_subdomain(a, b), expected);
    }

    #[test]
    fn test_host_from_origin() {
        assert_eq!(
            host_from_origin("https://Login.Example.com/x"),
            Some("login.example.com".to_string())
        );
        assert_eq!(host_from_origin(""), None);
    }

    #[rstest]
    #[case("user.1234@fastmail.com", true)]
    #[case("  user@example.com  ", true)]
    #[case("example.com", false)]
    #[case("a@b@c", false)]
    #[case("user name@example.com", false)]
    fn test_looks_like_email_address(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(looks_like_email_address(input), expected);
    }

    #[test]
    fn test_prepare_domain_input() {
        let prepared = prepare_domain_input("  Example.com/login ").unwrap();
        assert_eq!(prepared.display, "Example.com/login");
        assert_eq!(prepared.origin.as_str(), "https://example.com");

        assert!(matches!(
            prepare_domain_input("user@example.com"),
            Err(DomainError::AmbiguousInput { .. })
        ));
        assert_eq!(prepare_domain_input(""), Err(DomainError::EmptyInput));
    }

    #[test]
    fn test_normalize_email_input() {
        assert_eq!(
            normalize_email_input(" user.1234@fastmail.com ").unwrap(),
            "user.1234@fastmail.com"
        );
        assert!(matches!(
            normalize_email_input("example.com"),
            Err(DomainError::NotAnEmail { .. })
        ));
    }
}
