use chrono::Utc;

use crate::{
    page_activity, presence, site_config::SiteConfig, ActivityDescriptor, ActivityRuleTable,
};

pub const EVENT_DID_NAVIGATE: &str = "did-navigate";
pub const EVENT_DID_NAVIGATE_IN_PAGE: &str = "did-navigate-in-page";
pub const EVENT_DID_FINISH_LOAD: &str = "did-finish-load";
pub const EVENT_PRESENCE_READY: &str = "presence-ready";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEventKind {
    Navigate,
    NavigateInPage,
    FinishLoad,
}

impl NavigationEventKind {
    fn log_label(self) -> &'static str {
        match self {
            Self::Navigate => "page detected",
            Self::NavigateInPage => "in-page navigation",
            Self::FinishLoad => "page loaded",
        }
    }
}

pub fn kind_from_event_name(event_name: &str) -> Option<NavigationEventKind> {
    match event_name {
        EVENT_DID_NAVIGATE => Some(NavigationEventKind::Navigate),
        EVENT_DID_NAVIGATE_IN_PAGE => Some(NavigationEventKind::NavigateInPage),
        EVENT_DID_FINISH_LOAD => Some(NavigationEventKind::FinishLoad),
        _ => None,
    }
}

/// Parses `<event-name> <url>` or a bare `<url>` (treated as a navigation).
pub fn parse_navigation_line(line: &str) -> Result<(NavigationEventKind, String), String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err("Missing navigation url.".to_string());
    }

    let Some((head, rest)) = trimmed.split_once(char::is_whitespace) else {
        if kind_from_event_name(trimmed).is_some() {
            return Err("Missing navigation url.".to_string());
        }
        return Ok((NavigationEventKind::Navigate, trimmed.to_string()));
    };

    match kind_from_event_name(head) {
        Some(kind) => Ok((kind, rest.trim().to_string())),
        None if head.contains("://") => Ok((NavigationEventKind::Navigate, trimmed.to_string())),
        None => Err(format!("Unknown navigation event '{head}'.")),
    }
}

/// Resolves the page for `url` and pushes it to the presence session.
pub(crate) fn handle_navigation<S, F>(
    kind: NavigationEventKind,
    url: &str,
    rules: &ActivityRuleTable,
    site: &SiteConfig,
    session: &presence::PresenceSession,
    sink: &S,
    log: F,
) -> ActivityDescriptor
where
    S: presence::PresenceSink + ?Sized,
    F: Fn(&str),
{
    let descriptor = page_activity::match_activity(url, rules, &site.name);
    log(&format!(
        "{}: {} ({})",
        kind.log_label(),
        descriptor.display_name,
        url
    ));

    let activity = presence::build_presence_activity(&descriptor, &site.url, Utc::now());
    session.update(sink, activity, &log);
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::{tests::RecordingSink, PresenceSession};
    use crate::{DEFAULT_SITE_NAME, DEFAULT_SITE_URL};
    use std::cell::RefCell;

    fn site() -> SiteConfig {
        SiteConfig {
            url: DEFAULT_SITE_URL.to_string(),
            name: DEFAULT_SITE_NAME.to_string(),
        }
    }

    #[test]
    fn kind_from_event_name_maps_known_events() {
        assert_eq!(
            kind_from_event_name(EVENT_DID_NAVIGATE),
            Some(NavigationEventKind::Navigate)
        );
        assert_eq!(
            kind_from_event_name(EVENT_DID_NAVIGATE_IN_PAGE),
            Some(NavigationEventKind::NavigateInPage)
        );
        assert_eq!(
            kind_from_event_name(EVENT_DID_FINISH_LOAD),
            Some(NavigationEventKind::FinishLoad)
        );
        assert_eq!(kind_from_event_name("will-navigate"), None);
    }

    #[test]
    fn parse_navigation_line_accepts_event_and_url() {
        assert_eq!(
            parse_navigation_line("did-navigate-in-page  https://ecole-directe.plus/app/0/grades "),
            Ok((
                NavigationEventKind::NavigateInPage,
                "https://ecole-directe.plus/app/0/grades".to_string()
            ))
        );
    }

    #[test]
    fn parse_navigation_line_treats_bare_url_as_navigation() {
        assert_eq!(
            parse_navigation_line("https://ecole-directe.plus/login"),
            Ok((
                NavigationEventKind::Navigate,
                "https://ecole-directe.plus/login".to_string()
            ))
        );
    }

    #[test]
    fn parse_navigation_line_rejects_blank_and_unknown_events() {
        assert!(parse_navigation_line("   ").is_err());
        let error = parse_navigation_line("reload https://x").expect_err("unknown event");
        assert!(error.contains("reload"));
    }

    #[test]
    fn parse_navigation_line_rejects_event_name_without_url() {
        for line in [EVENT_DID_NAVIGATE, EVENT_DID_NAVIGATE_IN_PAGE, " did-finish-load "] {
            assert_eq!(
                parse_navigation_line(line),
                Err("Missing navigation url.".to_string()),
                "{line:?} must not be taken as a url"
            );
        }
    }

    #[test]
    fn handle_navigation_reports_matched_page() {
        let session = PresenceSession::new();
        let sink = RecordingSink::default();
        let messages = RefCell::new(Vec::new());

        let descriptor = handle_navigation(
            NavigationEventKind::Navigate,
            "https://ecole-directe.plus/app/0/homeworks",
            &page_activity::default_rules(),
            &site(),
            &session,
            &sink,
            |message| messages.borrow_mut().push(message.to_string()),
        );

        assert_eq!(descriptor.matched_prefix, "/app/0/homeworks");
        let published = sink.published.borrow();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].state, descriptor.display_name);
        assert_eq!(
            published[0].buttons[0].url,
            "https://ecole-directe.plus/app/0/homeworks"
        );
        assert!(messages.borrow()[0].starts_with("page detected:"));
    }

    #[test]
    fn handle_navigation_falls_back_to_site_navigation() {
        let session = PresenceSession::new();
        let sink = RecordingSink::default();

        let descriptor = handle_navigation(
            NavigationEventKind::FinishLoad,
            "https://ecole-directe.plus/unknown",
            &page_activity::default_rules(),
            &site(),
            &session,
            &sink,
            |_| {},
        );

        assert_eq!(descriptor.matched_prefix, "/");
        assert_eq!(descriptor.detail_text, "Navigating on Ecole Directe Plus");
        assert_eq!(
            sink.published.borrow()[0].buttons[0].url,
            "https://ecole-directe.plus/"
        );
    }
}
