// masked-email/src/selection.rs
use crate::masked_email::MaskedEmail;

/// Pick the alias to hand out among aliases for one domain.
///
/// Preference is enabled, pending, disabled, deleted, then unknown states;
/// ties keep the earliest alias. Unknown states are logged and ranked last.
pub fn select_preferred(aliases: &[MaskedEmail]) -> Option<&MaskedEmail> {
    for alias in aliases.iter().filter(|alias| !alias.state.is_known()) {
        tracing::warn!(email = %alias.email, state = %alias.state, "unknown alias state");
    }

    let mut aliases = aliases.iter();
    let mut selected = aliases.next()?;
    for alias in aliases {
        if alias.state.priority() < selected.state.priority() {
            selected = alias;
        }
    }
    Some(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masked_email::MaskedEmailState;

    fn alias(email: &str, state: &str) -> MaskedEmail {
        MaskedEmail {
            email: email.to_string(),
            state: MaskedEmailState::from(state.to_string()),
            ..Default::default()
        }
    }

    fn selected(aliases: &[MaskedEmail]) -> Option<&str> {
        select_preferred(aliases).map(|a| a.email.as_str())
    }

    #[test]
    fn test_empty_selects_nothing() {
        assert_eq!(select_preferred(&[]), None);
    }

    #[test]
    fn test_enabled_beats_everything() {
        let aliases = [
            alias("a", "deleted"),
            alias("b", "disabled"),
            alias("c", "pending"),
            alias("d", "enabled"),
            alias("e", "mystery"),
        ];
        assert_eq!(selected(&aliases), Some("d"));
    }

    #[test]
    fn test_pending_over_disabled() {
        let aliases = [alias("a", "disabled"), alias("b", "pending")];
        assert_eq!(selected(&aliases), Some("b"));
    }

    #[test]
    fn test_ties_keep_first() {
        let aliases = [
            alias("a", "disabled"),
            alias("b", "enabled"),
            alias("c", "enabled"),
        ];
        assert_eq!(selected(&aliases), Some("b"));
    }

    #[test]
    fn test_unknown_states_rank_last_without_failing() {
        let aliases = [alias("a", "mystery"), alias("b", "deleted")];
        assert_eq!(selected(&aliases), Some("b"));

        let aliases = [alias("a", "mystery"), alias("b", "other")];
        assert_eq!(selected(&aliases), Some("a"));
    }

    #[test]
    fn test_every_state_ordering() {
        let states = ["enabled", "pending", "disabled", "deleted", "mystery"];
        for (i, better) in states.iter().enumerate() {
            for worse in states.iter().skip(i + 1) {
                let aliases = [alias("worse", worse), alias("better", better)];
                assert_eq!(selected(&aliases), Some("better"), "{} vs {}", better, worse);
            }
        }
    }
}
