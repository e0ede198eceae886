use std::env;

use url::Url;

use crate::{DEFAULT_SITE_NAME, DEFAULT_SITE_URL, SITE_URL_ENV};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SiteConfig {
    pub(crate) url: String,
    pub(crate) name: String,
}

impl SiteConfig {
    pub(crate) fn from_env<F>(log: F) -> Self
    where
        F: Fn(&str),
    {
        let raw_url = env::var(SITE_URL_ENV).unwrap_or_else(|_| DEFAULT_SITE_URL.to_string());
        let url = normalize_site_url(&raw_url, DEFAULT_SITE_URL, &log);
        Self {
            url,
            name: DEFAULT_SITE_NAME.to_string(),
        }
    }
}

/// Keeps http(s) URLs only, without trailing slashes.
pub(crate) fn normalize_site_url<F>(raw: &str, default_url: &str, log: F) -> String
where
    F: Fn(&str),
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default_url.to_string();
    }

    match Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
            parsed.as_str().trim_end_matches('/').to_string()
        }
        Ok(parsed) => {
            log(&format!(
                "unsupported site url scheme '{}' in {}; falling back to {}",
                parsed.scheme(),
                trimmed,
                default_url
            ));
            default_url.to_string()
        }
        Err(error) => {
            log(&format!(
                "invalid site url {trimmed}: {error}; falling back to {default_url}"
            ));
            default_url.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn normalize_site_url_trims_trailing_slash() {
        let url = normalize_site_url(" https://ecole-directe.plus/ ", DEFAULT_SITE_URL, |_| {});
        assert_eq!(url, "https://ecole-directe.plus");
    }

    #[test]
    fn normalize_site_url_keeps_path() {
        let url = normalize_site_url("http://localhost:5173/edp/", DEFAULT_SITE_URL, |_| {});
        assert_eq!(url, "http://localhost:5173/edp");
    }

    #[test]
    fn normalize_site_url_rejects_non_http_schemes() {
        let messages = RefCell::new(Vec::new());
        let url = normalize_site_url("file:///etc/passwd", DEFAULT_SITE_URL, |message| {
            messages.borrow_mut().push(message.to_string())
        });

        assert_eq!(url, DEFAULT_SITE_URL);
        assert_eq!(messages.borrow().len(), 1);
        assert!(messages.borrow()[0].contains("file"));
    }

    #[test]
    fn normalize_site_url_falls_back_on_garbage() {
        assert_eq!(normalize_site_url("not a url", DEFAULT_SITE_URL, |_| {}), DEFAULT_SITE_URL);
        assert_eq!(normalize_site_url("   ", DEFAULT_SITE_URL, |_| {}), DEFAULT_SITE_URL);
    }
}
