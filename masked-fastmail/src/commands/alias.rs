// masked-fastmail/src/commands/alias.rs
use crate::output::{Formattable, Response};
use masked_email::{
    partition_for_listing, select_preferred, ClientError, DomainInput, FastmailClient,
    MaskedEmail, MaskedEmailState, Origin,
};
use serde::Serialize;
use std::fmt::Write as _;

const NO_DESCRIPTION: &str = "(no description)";
const UNKNOWN_DOMAIN: &str = "(unknown domain)";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupOutcome {
    pub origin: Origin,
    pub selected: MaskedEmail,
    pub created: bool,
    /// Every existing alias for the domain when there was more than one
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<MaskedEmail>,
    /// A description was given but the alias already existed
    pub description_ignored: bool,
}

/// Return the preferred alias for a domain, creating one if none exists
pub async fn lookup_or_create(
    client: &FastmailClient,
    input: &DomainInput,
    description: Option<&str>,
) -> Result<LookupOutcome, ClientError> {
    let aliases = client.aliases_for_domain(&input.origin).await?;

    let (selected, created) = match select_preferred(&aliases) {
        Some(alias) => (alias.clone(), false),
        None => {
            tracing::info!(origin = %input.origin, "no alias found, creating one");
            (client.create_alias(&input.origin, description).await?, true)
        }
    };

    let description_ignored =
        !created && description.is_some_and(|d| !d.trim().is_empty());
    let candidates = if aliases.len() > 1 { aliases } else { Vec::new() };

    Ok(LookupOutcome {
        origin: input.origin.clone(),
        selected,
        created,
        candidates,
        description_ignored,
    })
}

impl Formattable for LookupOutcome {
    fn to_json(&self) -> String {
        Response::ok(self).to_json_string()
    }

    fn to_human(&self) -> String {
        let mut out = String::new();
        if self.created {
            let _ = writeln!(out, "No alias found for {}, created a new one:", self.origin);
        } else if !self.candidates.is_empty() {
            let _ = writeln!(out, "Found {} aliases for {}:", self.candidates.len(), self.origin);
            for alias in &self.candidates {
                let _ = writeln!(out, "- {} (state: {})", alias.email, alias.state);
            }
            let _ = writeln!(out, "\nSelected alias:");
        }
        let _ = write!(out, "{} (state: {})", self.selected.email, self.selected.state);
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListOutcome {
    pub origin: Origin,
    pub search: String,
    pub primary: Vec<MaskedEmail>,
    pub related: Vec<MaskedEmail>,
}

/// List aliases for a domain plus related matches, without creating anything
pub async fn list_aliases(
    client: &FastmailClient,
    input: &DomainInput,
) -> Result<ListOutcome, ClientError> {
    let aliases = client.fetch_all_aliases().await?;
    let listing = partition_for_listing(&aliases, &input.origin, &input.display);

    Ok(ListOutcome {
        origin: input.origin.clone(),
        search: input.display.clone(),
        primary: listing.primary,
        related: listing.related,
    })
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder
    } else {
        trimmed
    }
}

fn write_rows(out: &mut String, aliases: &[MaskedEmail], width: usize, with_domain: bool) {
    for (idx, alias) in aliases.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "- {:<width$} (state: {})", alias.email, alias.state, width = width);
        if with_domain {
            let _ = writeln!(out, "  Domain:      {}", or_placeholder(&alias.for_domain, UNKNOWN_DOMAIN));
        }
        let _ = writeln!(out, "  Description: {}", or_placeholder(&alias.description, NO_DESCRIPTION));
    }
}

impl Formattable for ListOutcome {
    fn to_json(&self) -> String {
        Response::ok(self).to_json_string()
    }

    fn to_human(&self) -> String {
        if self.primary.is_empty() && self.related.is_empty() {
            return format!("No aliases found matching {}", self.search);
        }

        let width = self
            .primary
            .iter()
            .chain(&self.related)
            .map(|alias| alias.email.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        if self.primary.is_empty() {
            let _ = writeln!(out, "No aliases found for domain {}", self.origin);
        } else {
            let _ = writeln!(out, "Aliases for {}:", self.origin);
            write_rows(&mut out, &self.primary, width, false);
        }

        if !self.related.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "Additional matches containing {:?}:", self.search);
            write_rows(&mut out, &self.related, width, true);
        }

        out.trim_end().to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChange {
    pub email: String,
    pub for_domain: String,
    pub from: MaskedEmailState,
    pub to: MaskedEmailState,
}

pub async fn set_state(
    client: &FastmailClient,
    email: &str,
    state: MaskedEmailState,
) -> Result<StateChange, ClientError> {
    let alias = client.alias_by_email(email).await?;
    client.update_alias_state(&alias, state.clone()).await?;

    Ok(StateChange {
        email: alias.email,
        for_domain: alias.for_domain,
        from: alias.state,
        to: state,
    })
}

impl Formattable for StateChange {
    fn to_json(&self) -> String {
        Response::ok(self).to_json_string()
    }

    fn to_human(&self) -> String {
        format!(
            "Set '{}' for '{}' from '{}' to '{}'",
            self.email,
            or_placeholder(&self.for_domain, UNKNOWN_DOMAIN),
            self.from,
            self.to
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DescriptionChange {
    pub email: String,
    pub description: String,
    pub changed: bool,
}

pub async fn set_description(
    client: &FastmailClient,
    email: &str,
    description: &str,
) -> Result<DescriptionChange, ClientError> {
    let alias = client.alias_by_email(email).await?;

    let changed = alias.description != description;
    if changed {
        client.update_alias_description(&alias, description).await?;
    }

    Ok(DescriptionChange {
        email: alias.email,
        description: description.to_string(),
        changed,
    })
}

impl Formattable for DescriptionChange {
    fn to_json(&self) -> String {
        Response::ok(self).to_json_string()
    }

    fn to_human(&self) -> String {
        if self.changed {
            "Description updated.".to_string()
        } else {
            "Description already set to the requested value.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use masked_email::normalize_origin;

    fn alias(email: &str, state: MaskedEmailState, for_domain: &str, description: &str) -> MaskedEmail {
        MaskedEmail {
            id: email.to_string(),
            email: email.to_string(),
            state,
            for_domain: for_domain.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup_human_single() {
        let outcome = LookupOutcome {
            origin: normalize_origin("example.com").unwrap(),
            selected: alias("a@fm.com", MaskedEmailState::Enabled, "https://example.com", ""),
            created: false,
            candidates: Vec::new(),
            description_ignored: false,
        };
        assert_eq!(outcome.to_human(), "a@fm.com (state: enabled)");
    }

    #[test]
    fn test_lookup_human_many() {
        let a = alias("a@fm.com", MaskedEmailState::Disabled, "https://example.com", "");
        let b = alias("b@fm.com", MaskedEmailState::Enabled, "https://example.com", "");
        let outcome = LookupOutcome {
            origin: normalize_origin("example.com").unwrap(),
            selected: b.clone(),
            created: false,
            candidates: vec![a, b],
            description_ignored: false,
        };
        assert_eq!(
            outcome.to_human(),
            "Found 2 aliases for https://example.com:\n\
             - a@fm.com (state: disabled)\n\
             - b@fm.com (state: enabled)\n\
             \n\
             Selected alias:\n\
             b@fm.com (state: enabled)"
        );
    }

    #[test]
    fn test_lookup_json() {
        let outcome = LookupOutcome {
            origin: normalize_origin("example.com").unwrap(),
            selected: alias("n@fm.com", MaskedEmailState::Pending, "https://example.com", "Shop"),
            created: true,
            candidates: Vec::new(),
            description_ignored: false,
        };
        let value: serde_json::Value = serde_json::from_str(&outcome.to_json()).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["result"]["origin"], "https://example.com");
        assert_eq!(value["result"]["created"], true);
        assert_eq!(value["result"]["selected"]["state"], "pending");
        assert!(value["result"].get("candidates").is_none());
    }

    #[test]
    fn test_list_human() {
        let outcome = ListOutcome {
            origin: normalize_origin("example.com").unwrap(),
            search: "example".to_string(),
            primary: vec![alias("short@fm.com", MaskedEmailState::Enabled, "https://example.com", "")],
            related: vec![alias(
                "much.longer@fm.com",
                MaskedEmailState::Pending,
                "https://sub.example.com",
                "Sub site",
            )],
        };
        assert_eq!(
            outcome.to_human(),
            "Aliases for https://example.com:\n\
             - short@fm.com       (state: enabled)\n  \
             Description: (no description)\n\
             \n\
             Additional matches containing \"example\":\n\
             - much.longer@fm.com (state: pending)\n  \
             Domain:      https://sub.example.com\n  \
             Description: Sub site"
        );
    }

    #[test]
    fn test_list_human_empty() {
        let outcome = ListOutcome {
            origin: normalize_origin("example.com").unwrap(),
            search: "example.com".to_string(),
            primary: Vec::new(),
            related: Vec::new(),
        };
        assert_eq!(outcome.to_human(), "No aliases found matching example.com");
    }

    #[test]
    fn test_list_human_related_only() {
        let outcome = ListOutcome {
            origin: normalize_origin("example.com").unwrap(),
            search: "example".to_string(),
            primary: Vec::new(),
            related: vec![alias("r@fm.com", MaskedEmailState::Enabled, "", "example notes")],
        };
        let text = outcome.to_human();
        assert!(text.starts_with("No aliases found for domain https://example.com\n"));
        assert!(text.contains("  Domain:      (unknown domain)"));
    }

    #[test]
    fn test_state_change_human() {
        let change = StateChange {
            email: "a@fm.com".to_string(),
            for_domain: "https://example.com".to_string(),
            from: MaskedEmailState::Enabled,
            to: MaskedEmailState::Disabled,
        };
        assert_eq!(
            change.to_human(),
            "Set 'a@fm.com' for 'https://example.com' from 'enabled' to 'disabled'"
        );
    }

    #[test]
    fn test_description_change_human() {
        let change = DescriptionChange {
            email: "a@fm.com".to_string(),
            description: "Shop".to_string(),
            changed: false,
        };
        assert_eq!(change.to_human(), "Description already set to the requested value.");
    }
}
