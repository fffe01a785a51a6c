// masked-email/src/matcher.rs
//! Deciding which masked emails belong to a domain.
//!
//! Three independent predicates, strongest first: exact origin, subdomain in
//! either direction, and case-insensitive free-text search.
//! [`partition_for_listing`] combines them for the listing view.

use crate::domain::{domains_equal, host_from_origin, is_subdomain, Origin};
use crate::masked_email::MaskedEmail;
use std::collections::HashSet;

/// `forDomain` equals the target origin. Only when `forDomain` is blank is
/// the description compared instead.
pub fn matches_domain(alias: &MaskedEmail, target: &str) -> bool {
    if alias.for_domain.trim().is_empty() {
        return domains_equal(&alias.description, target);
    }
    domains_equal(&alias.for_domain, target)
}

/// The alias host is a strict subdomain of the target host, or the reverse.
pub fn matches_subdomain(alias: &MaskedEmail, target: &str) -> bool {
    let Some(target_host) = host_from_origin(target) else {
        return false;
    };
    let Some(alias_host) = host_from_origin(alias.domain_source()) else {
        return false;
    };
    is_subdomain(&alias_host, &target_host)
}

/// Any non-blank needle is a case-insensitive substring of the email,
/// description, forDomain or id.
pub fn matches_free_text(alias: &MaskedEmail, needles: &[&str]) -> bool {
    let fields = [
        alias.email.to_lowercase(),
        alias.description.to_lowercase(),
        alias.for_domain.to_lowercase(),
        alias.id.to_lowercase(),
    ];

    needles
        .iter()
        .map(|needle| needle.trim().to_lowercase())
        .filter(|needle| !needle.is_empty())
        .any(|needle| {
            fields
                .iter()
                .any(|field| !field.is_empty() && field.contains(&needle))
        })
}

/// Aliases for the listing view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    /// Exact domain matches, in input order
    pub primary: Vec<MaskedEmail>,
    /// Subdomain and search matches not already in `primary`, in input order
    pub related: Vec<MaskedEmail>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.related.is_empty()
    }
}

/// Split non-deleted aliases into exact matches and related matches.
///
/// Deduplication is by id; aliases without an id are never treated as
/// duplicates of each other.
pub fn partition_for_listing(aliases: &[MaskedEmail], target: &Origin, search: &str) -> Listing {
    let needles = [target.as_str(), search];
    let mut seen: HashSet<&str> = HashSet::new();
    let mut listing = Listing::default();

    for alias in aliases.iter().filter(|alias| !alias.is_deleted()) {
        if matches_domain(alias, target.as_str()) {
            if !alias.id.is_empty() {
                seen.insert(&alias.id);
            }
            listing.primary.push(alias.clone());
            continue;
        }

        let related = matches_subdomain(alias, target.as_str())
            || matches_free_text(alias, &needles);
        if !related {
            continue;
        }

        if !alias.id.is_empty() && !seen.insert(&alias.id) {
            continue;
        }
        listing.related.push(alias.clone());
    }

    listing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize_origin;
    use crate::masked_email::MaskedEmailState;

    fn alias(id: &str, for_domain: &str, description: &str) -> MaskedEmail {
        MaskedEmail {
            id: id.to_string(),
            email: format!("alias.{}@fastmail.com", id),
            state: MaskedEmailState::Enabled,
            for_domain: for_domain.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    fn ids(list: &[MaskedEmail]) -> Vec<&str> {
        list.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_matches_domain() {
        let target = "https://example.com";

        assert!(matches_domain(&alias("1", target, ""), target));
        assert!(!matches_domain(&alias("1", "https://other.com", ""), target));
        assert!(matches_domain(&alias("1", "", "https://example.com"), target));
        assert!(!matches_domain(&alias("1", "", "https://other.com"), target));
        assert!(matches_domain(&alias("1", "https://Example.com/signup", ""), target));
    }

    #[test]
    fn test_description_fallback_only_when_for_domain_blank() {
        let target = "https://example.com";
        assert!(!matches_domain(
            &alias("1", "https://other.com", "https://example.com"),
            target
        ));
        assert!(matches_domain(&alias("1", "   ", "example.com"), target));
    }

    #[test]
    fn test_matches_subdomain_both_directions() {
        assert!(matches_subdomain(
            &alias("1", "https://a.b.com", ""),
            "https://b.com"
        ));
        assert!(matches_subdomain(
            &alias("1", "https://b.com", ""),
            "https://a.b.com"
        ));
        assert!(matches_subdomain(
            &alias("1", "", "login.b.com"),
            "https://b.com"
        ));
    }

    #[test]
    fn test_matches_subdomain_excludes_exact_and_unrelated() {
        assert!(!matches_subdomain(&alias("1", "https://b.com", ""), "https://b.com"));
        assert!(!matches_subdomain(&alias("1", "https://ab.com", ""), "https://b.com"));
        assert!(!matches_subdomain(&alias("1", "", ""), "https://b.com"));
    }

    #[test]
    fn test_matches_free_text() {
        let record = alias("M42", "https://shop.example", "Holiday Shopping");
        assert!(matches_free_text(&record, &["SHOPPING"]));
        assert!(matches_free_text(&record, &["", "m42"]));
        assert!(matches_free_text(&record, &["alias.m42@"]));
        assert!(!matches_free_text(&record, &["", "   "]));
        assert!(!matches_free_text(&record, &["banking"]));
    }

    #[test]
    fn test_partition_for_listing() {
        let mut deleted = alias("4", "https://example.com", "");
        deleted.state = MaskedEmailState::Deleted;
        let aliases = vec![
            alias("1", "https://example.com", ""),
            alias("2", "https://other.com", "Example login"),
            alias("5", "https://sub.example.com", ""),
            deleted,
        ];
        let target = normalize_origin("https://example.com").unwrap();

        let listing = partition_for_listing(&aliases, &target, "example");
        assert_eq!(ids(&listing.primary), ["1"]);
        assert_eq!(ids(&listing.related), ["2", "5"]);
    }

    #[test]
    fn test_partition_drops_unrelated() {
        let aliases = vec![alias("1", "https://unrelated.org", "Nothing")];
        let target = normalize_origin("example.com").unwrap();
        let listing = partition_for_listing(&aliases, &target, "example.com");
        assert!(listing.is_empty());
    }

    #[test]
    fn test_partition_dedups_by_id_only() {
        let aliases = vec![
            alias("1", "https://example.com", ""),
            // same id again, would otherwise be a search hit
            alias("1", "https://other.com", "example"),
            alias("", "https://other.com", "example one"),
            alias("", "https://other.com", "example two"),
            alias("7", "https://a.example.com", ""),
            alias("7", "https://b.example.com", ""),
        ];
        let target = normalize_origin("example.com").unwrap();

        let listing = partition_for_listing(&aliases, &target, "example");
        assert_eq!(ids(&listing.primary), ["1"]);
        assert_eq!(ids(&listing.related), ["", "", "7"]);
    }

    #[test]
    fn test_partition_matches_normalized_target_text() {
        // search text is blank; the normalized origin is still a needle
        let aliases = vec![alias("9", "legacy", "see https://example.com/account")];
        let target = normalize_origin("example.com").unwrap();
        let listing = partition_for_listing(&aliases, &target, "");
        assert_eq!(ids(&listing.related), ["9"]);
    }
}
