use crate::{ActivityDescriptor, ActivityRuleTable};

pub const ROOT_PREFIX: &str = "/";
const DEFAULT_DISPLAY_NAME: &str = "Navigation";

/// Page table of the wrapped site.
pub(crate) fn default_rules() -> ActivityRuleTable {
    ActivityRuleTable::new()
        .with_rule("/#home", "🏠 Accueil", "Consulte la page d'accueil")
        .with_rule("/login", "🔐 Connexion", "Sur la page de connexion")
        .with_rule("/app/0/dashboard", "📊 Tableau de bord", "Gère son espace")
        .with_rule("/app/0/grades", "📈 Notes", "Consulte ses notes (bonne j'espère)")
        .with_rule(
            "/app/0/homeworks",
            "📚 Devoirs",
            "Planifie ses devoirs (j'espère pas beaucoup)",
        )
        .with_rule("/app/0/messaging", "✉️ Messagerie", "Consulte ses messages")
        .with_rule("/app/0/timetable", "🗓️ Emploi du temps", "Vérifie son planning")
        .with_rule("/app/0/settings", "⚙️ Paramètres", "Paramètre l'application")
        .with_rule("/app/0/account", "👤 Compte", "Gère son compte")
        .with_rule("/edp-unblock", "🔧 UEDP Unblock", "Page de l'extension")
}

/// Picks the rule whose prefix is the longest substring of `url`.
///
/// Containment is not anchored: a prefix found anywhere in the URL matches.
/// Among equal-length matches the first one in table order is kept. With no
/// match the result is a generic navigation activity on `current_context`
/// with the root prefix.
pub(crate) fn match_activity(
    url: &str,
    table: &ActivityRuleTable,
    current_context: &str,
) -> ActivityDescriptor {
    let mut best: Option<(&str, &crate::ActivityRule)> = None;

    for (prefix, rule) in table.iter() {
        let best_len = best.map_or(0, |(matched, _)| matched.len());
        if url.contains(prefix) && prefix.len() > best_len {
            best = Some((prefix, rule));
        }
    }

    match best {
        Some((prefix, rule)) => ActivityDescriptor {
            display_name: rule.display_name.clone(),
            detail_text: rule.detail_text.clone(),
            matched_prefix: prefix.to_string(),
        },
        None => default_activity(current_context),
    }
}

pub(crate) fn default_activity(current_context: &str) -> ActivityDescriptor {
    ActivityDescriptor {
        display_name: DEFAULT_DISPLAY_NAME.to_string(),
        detail_text: format!("Navigating on {current_context}"),
        matched_prefix: ROOT_PREFIX.to_string(),
    }
}
