use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    ActivityDescriptor, PRESENCE_BUTTON_LABEL, PRESENCE_LARGE_IMAGE_KEY,
    PRESENCE_LARGE_IMAGE_TEXT, PRESENCE_SMALL_IMAGE_KEY, PRESENCE_SMALL_IMAGE_TEXT,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PresenceButton {
    pub(crate) label: String,
    pub(crate) url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PresenceActivity {
    pub(crate) details: String,
    pub(crate) state: String,
    pub(crate) start_timestamp: i64,
    pub(crate) large_image_key: String,
    pub(crate) large_image_text: String,
    pub(crate) small_image_key: String,
    pub(crate) small_image_text: String,
    pub(crate) buttons: Vec<PresenceButton>,
}

/// Maps an activity onto presence fields; the button opens the matched page.
pub(crate) fn build_presence_activity(
    descriptor: &ActivityDescriptor,
    site_url: &str,
    started_at: DateTime<Utc>,
) -> PresenceActivity {
    PresenceActivity {
        details: descriptor.detail_text.clone(),
        state: descriptor.display_name.clone(),
        start_timestamp: started_at.timestamp(),
        large_image_key: PRESENCE_LARGE_IMAGE_KEY.to_string(),
        large_image_text: PRESENCE_LARGE_IMAGE_TEXT.to_string(),
        small_image_key: PRESENCE_SMALL_IMAGE_KEY.to_string(),
        small_image_text: PRESENCE_SMALL_IMAGE_TEXT.to_string(),
        buttons: vec![PresenceButton {
            label: PRESENCE_BUTTON_LABEL.to_string(),
            url: format!("{site_url}{}", descriptor.matched_prefix),
        }],
    }
}

/// Transport that publishes activities to the presence service.
pub(crate) trait PresenceSink {
    fn set_activity(&self, activity: &PresenceActivity) -> Result<(), String>;
    fn clear_activity(&self) -> Result<(), String>;
}

/// Writes payloads to the log instead of a live presence connection.
pub(crate) struct LogPresenceSink<F>
where
    F: Fn(&str),
{
    log: F,
}

impl<F> LogPresenceSink<F>
where
    F: Fn(&str),
{
    pub(crate) fn new(log: F) -> Self {
        Self { log }
    }
}

impl<F> PresenceSink for LogPresenceSink<F>
where
    F: Fn(&str),
{
    fn set_activity(&self, activity: &PresenceActivity) -> Result<(), String> {
        let payload = serde_json::to_string(activity)
            .map_err(|error| format!("Failed to serialize presence activity: {error}"))?;
        (self.log)(&format!("presence activity: {payload}"));
        Ok(())
    }

    fn clear_activity(&self) -> Result<(), String> {
        (self.log)("presence activity cleared");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct PresenceSession {
    current_activity: Mutex<Option<PresenceActivity>>,
    is_quitting: AtomicBool,
}

impl PresenceSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.is_quitting.load(Ordering::Acquire)
    }

    pub(crate) fn current_activity(&self) -> Option<PresenceActivity> {
        self.current_activity
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }

    /// Records and publishes `activity`; ignored once shutdown has started.
    pub(crate) fn update<S, F>(&self, sink: &S, activity: PresenceActivity, log: F)
    where
        S: PresenceSink + ?Sized,
        F: Fn(&str),
    {
        if self.is_quitting() {
            return;
        }

        match self.current_activity.lock() {
            Ok(mut guard) => *guard = Some(activity.clone()),
            Err(error) => log(&format!("presence activity state is poisoned: {error}")),
        }

        if let Err(error) = sink.set_activity(&activity) {
            log(&format!("failed to update presence activity: {error}"));
        }
    }

    /// Replays the last activity after the sink (re)connects.
    pub(crate) fn on_ready<S, F>(&self, sink: &S, log: F)
    where
        S: PresenceSink + ?Sized,
        F: Fn(&str),
    {
        if self.is_quitting() {
            return;
        }
        let Some(activity) = self.current_activity() else {
            return;
        };
        if let Err(error) = sink.set_activity(&activity) {
            log(&format!("failed to replay presence activity: {error}"));
        }
    }

    /// Clears the published activity once; later calls do nothing.
    pub(crate) fn shutdown<S, F>(&self, sink: &S, log: F)
    where
        S: PresenceSink + ?Sized,
        F: Fn(&str),
    {
        if self
            .is_quitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        if let Err(error) = sink.clear_activity() {
            log(&format!("failed to clear presence activity: {error}"));
            return;
        }
        log("presence stopped");
    }
}
