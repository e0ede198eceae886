use std::{
    env,
    io::{self, BufRead},
};

use crate::{
    app_settings, append_desktop_log, append_presence_log, append_startup_log, extension_prep,
    logging, navigation, page_activity, presence, runtime_paths, site_config::SiteConfig,
    ActivityRuleTable, DESKTOP_LOG_BASENAME, LOG_LEVEL_ENV, SETTINGS_FILE,
};

fn resolve_log_level() -> &'static str {
    env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|raw| logging::normalize_level(&raw).ok())
        .unwrap_or_else(logging::default_log_level)
}

fn prepare_bundled_extension(root_dir: Option<&std::path::PathBuf>) {
    let Some(source_dir) = runtime_paths::extension_source_dir(root_dir) else {
        append_startup_log("extension directory is unavailable; skipping extension");
        return;
    };
    append_startup_log(&format!("extension path: {}", source_dir.display()));

    match extension_prep::prepare_extension(&source_dir, &env::temp_dir(), append_startup_log) {
        Ok(prepared) => append_startup_log(&format!(
            "extension prepared: {} v{} ({})",
            prepared.name().unwrap_or_default(),
            prepared.version().unwrap_or("?"),
            prepared.dir.display()
        )),
        Err(error) => log::error!(target: "startup", "failed to prepare extension: {error}"),
    }
}

/// Handles one host line: a presence (re)connect notice or a navigation event.
fn handle_shell_line<S>(
    line: &str,
    rules: &ActivityRuleTable,
    site: &SiteConfig,
    session: &presence::PresenceSession,
    sink: &S,
) where
    S: presence::PresenceSink + ?Sized,
{
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return;
    }

    if trimmed == navigation::EVENT_PRESENCE_READY {
        append_presence_log("presence client ready");
        session.on_ready(sink, append_presence_log);
        return;
    }

    match navigation::parse_navigation_line(trimmed) {
        Ok((kind, url)) => {
            navigation::handle_navigation(
                kind,
                &url,
                rules,
                site,
                session,
                sink,
                append_desktop_log,
            );
        }
        Err(error) => log::warn!(target: "desktop", "ignoring navigation event: {error}"),
    }
}

pub(crate) fn run() {
    let root_dir = runtime_paths::default_root_dir();
    let log_dir = logging::resolve_desktop_log_dir(root_dir.clone());
    if let Err(error) = logging::init_logging(resolve_log_level(), &log_dir, DESKTOP_LOG_BASENAME)
    {
        eprintln!("failed to initialize logging: {error}");
    }

    append_startup_log("desktop shell starting");
    append_startup_log(&format!("desktop log dir: {}", log_dir.display()));

    if let Some(root) = root_dir.as_ref() {
        let settings = app_settings::load_settings(&root.join(SETTINGS_FILE), append_startup_log);
        append_startup_log(&format!("settings loaded ({} keys)", settings.len()));
    }

    let site = SiteConfig::from_env(append_startup_log);
    prepare_bundled_extension(root_dir.as_ref());

    let rules = page_activity::default_rules();
    append_startup_log(&format!(
        "loading {} with {} page activities",
        site.url,
        rules.len()
    ));

    let session = presence::PresenceSession::new();
    let sink = presence::LogPresenceSink::new(append_presence_log);
    session.on_ready(&sink, append_presence_log);

    for line in io::stdin().lock().lines() {
        match line {
            Ok(line) => handle_shell_line(&line, &rules, &site, &session, &sink),
            Err(error) => {
                log::error!(target: "desktop", "failed to read navigation event: {error}");
                break;
            }
        }
    }

    session.shutdown(&sink, append_presence_log);
    append_desktop_log("desktop shell exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::tests::RecordingSink;
    use crate::{DEFAULT_SITE_NAME, DEFAULT_SITE_URL};

    fn site() -> SiteConfig {
        SiteConfig {
            url: DEFAULT_SITE_URL.to_string(),
            name: DEFAULT_SITE_NAME.to_string(),
        }
    }

    #[test]
    fn ready_line_replays_last_navigation_to_reconnected_sink() {
        let rules = page_activity::default_rules();
        let session = presence::PresenceSession::new();
        let offline = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };

        handle_shell_line(
            "did-navigate https://ecole-directe.plus/app/0/grades",
            &rules,
            &site(),
            &session,
            &offline,
        );
        assert!(offline.published.borrow().is_empty());

        let connected = RecordingSink::default();
        handle_shell_line(navigation::EVENT_PRESENCE_READY, &rules, &site(), &session, &connected);

        let published = connected.published.borrow();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].state, "📈 Notes");
        assert_eq!(
            published[0].buttons[0].url,
            "https://ecole-directe.plus/app/0/grades"
        );
    }

    #[test]
    fn ready_line_before_any_navigation_publishes_nothing() {
        let session = presence::PresenceSession::new();
        let sink = RecordingSink::default();

        handle_shell_line(
            navigation::EVENT_PRESENCE_READY,
            &page_activity::default_rules(),
            &site(),
            &session,
            &sink,
        );

        assert!(sink.published.borrow().is_empty());
    }

    #[test]
    fn event_name_without_url_publishes_nothing() {
        let session = presence::PresenceSession::new();
        let sink = RecordingSink::default();

        handle_shell_line(
            navigation::EVENT_DID_NAVIGATE,
            &page_activity::default_rules(),
            &site(),
            &session,
            &sink,
        );

        assert!(sink.published.borrow().is_empty());
        assert_eq!(session.current_activity(), None);
    }
}
