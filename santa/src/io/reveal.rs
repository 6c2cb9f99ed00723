//! Per-giver assignment notice rendered from the configured template.

use anyhow::{Context, Result, anyhow};
use minijinja::{Environment, context};

use crate::core::roster::Roster;
use crate::core::types::ParticipantId;

/// Render the notice telling `giver` who they buy a gift for.
///
/// Template variables: `giver`, `recipient`, `exchange`, `budget` (two
/// decimals) and `wishes` (the recipient's wishlist).
pub fn render_reveal(template: &str, roster: &Roster, giver: ParticipantId) -> Result<String> {
    let giver_entry = roster
        .participant(giver)
        .ok_or_else(|| anyhow!("participant {} is not in '{}'", giver, roster.name()))?;
    let recipient = roster.recipient_of(giver).ok_or_else(|| {
        anyhow!(
            "no recipient drawn for {} yet; run `santa draw` first",
            giver_entry.name
        )
    })?;

    let mut env = Environment::new();
    env.add_template("reveal", template)
        .context("parse reveal template")?;
    let rendered = env
        .get_template("reveal")?
        .render(context! {
            giver => giver_entry.name.as_str(),
            recipient => recipient.name.as_str(),
            exchange => roster.name(),
            budget => format!("{:.2}", roster.budget()),
            wishes => &recipient.wishlist,
        })
        .context("render reveal template")?;
    Ok(rendered.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pointer::Pointer;
    use crate::io::config::RevealConfig;
    use crate::test_support::roster_with;

    fn assigned_pair() -> Roster {
        let mut roster = roster_with(&[(20, "JP"), (24, "Nick")]);
        assert!(roster.set_pointer(Pointer::from_pairs([
            (ParticipantId(20), ParticipantId(24)),
            (ParticipantId(24), ParticipantId(20)),
        ])));
        roster
    }

    #[test]
    fn default_template_lists_recipient_wishes() {
        let mut roster = assigned_pair();
        roster.add_wish(ParticipantId(24), "Star Wars Lego Set");
        roster.add_wish(ParticipantId(24), "Gold earrings");
        let notice = render_reveal(&RevealConfig::default().template, &roster, ParticipantId(20))
            .expect("render");
        assert_eq!(
            notice,
            "Hi JP!\n\n\
             This year you are buying a gift for Nick in Test Exchange.\n\
             Please keep it under 20.00.\n\n\
             Nick is hoping for:\n\
             - Star Wars Lego Set\n\
             - Gold earrings"
        );
    }

    #[test]
    fn default_template_handles_empty_wishlist() {
        let roster = assigned_pair();
        let notice = render_reveal(&RevealConfig::default().template, &roster, ParticipantId(24))
            .expect("render");
        assert!(notice.starts_with("Hi Nick!"));
        assert!(notice.ends_with("JP has not added any wishes yet."));
    }

    #[test]
    fn custom_template_is_used() {
        let roster = assigned_pair();
        let notice = render_reveal("{{ giver }} -> {{ recipient }} ({{ budget }})", &roster, ParticipantId(20))
            .expect("render");
        assert_eq!(notice, "JP -> Nick (20.00)");
    }

    #[test]
    fn undrawn_pointer_is_an_error() {
        let roster = roster_with(&[(20, "JP"), (24, "Nick")]);
        let err = render_reveal("{{ giver }}", &roster, ParticipantId(20)).expect_err("undrawn");
        assert!(err.to_string().contains("no recipient drawn"));
    }

    #[test]
    fn unknown_giver_is_an_error() {
        let roster = assigned_pair();
        let err = render_reveal("{{ giver }}", &roster, ParticipantId(99)).expect_err("unknown");
        assert!(err.to_string().contains("not in 'Test Exchange'"));
    }
}
