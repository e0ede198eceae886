mod app_constants;
mod app_runtime;
mod app_settings;
mod app_types;
mod extension_prep;
mod logging;
mod manifest_merge;
mod navigation;
mod page_activity;
mod presence;
mod runtime_paths;
mod site_config;

pub(crate) use app_constants::*;
pub(crate) use app_types::{ActivityDescriptor, ActivityRule, ActivityRuleTable, PreparedExtension};
pub(crate) use logging::{append_desktop_log, append_presence_log, append_startup_log};

fn main() {
    app_runtime::run();
}
