pub const DEFAULT_SITE_URL: &str = "https://ecole-directe.plus";
pub const DEFAULT_SITE_NAME: &str = "Ecole Directe Plus";
pub const SITE_URL_ENV: &str = "UEDP_SITE_URL";

pub const ROOT_DIR_ENV: &str = "UEDP_ROOT";
pub const EXTENSION_DIR_ENV: &str = "UEDP_EXTENSION_DIR";
pub const LOG_LEVEL_ENV: &str = "UEDP_LOG_LEVEL";
pub const DEFAULT_ROOT_DIR_NAME: &str = ".uedp";
pub const EXTENSION_DIR_NAME: &str = "extension";
pub const SETTINGS_FILE: &str = "settings.json";
pub const DESKTOP_LOG_BASENAME: &str = "uedp-desktop";

pub const COMMON_MANIFEST_FILE: &str = "manifest.common.json";
pub const PLATFORM_MANIFEST_FILE: &str = "manifest.chromium.json";
pub const MERGED_MANIFEST_FILE: &str = "manifest.json";
pub const FALLBACK_EXTENSION_NAME: &str = "EDP Extension";
pub const EXTENSION_TEMP_DIR_PREFIX: &str = "edp-ext-";

pub const PRESENCE_LARGE_IMAGE_KEY: &str = "edp_logo";
pub const PRESENCE_LARGE_IMAGE_TEXT: &str = "Unnoficial Ecole Directe Plus";
pub const PRESENCE_SMALL_IMAGE_KEY: &str = "icon";
pub const PRESENCE_SMALL_IMAGE_TEXT: &str = "En ligne";
pub const PRESENCE_BUTTON_LABEL: &str = "Ouvrir UEDP";
