use serde_json::{Map, Value};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActivityRule {
    pub(crate) display_name: String,
    pub(crate) detail_text: String,
}

impl ActivityRule {
    pub(crate) fn new(display_name: &str, detail_text: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            detail_text: detail_text.to_string(),
        }
    }
}

/// Ordered `(prefix, rule)` pairs. Order only matters for equal-length ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ActivityRuleTable {
    entries: Vec<(String, ActivityRule)>,
}

impl ActivityRuleTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_rule(mut self, prefix: &str, display_name: &str, detail_text: &str) -> Self {
        self.entries
            .push((prefix.to_string(), ActivityRule::new(display_name, detail_text)));
        self
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &ActivityRule)> {
        self.entries
            .iter()
            .map(|(prefix, rule)| (prefix.as_str(), rule))
    }

    #[cfg(test)]
    pub(crate) fn contains_prefix(&self, prefix: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == prefix)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ActivityDescriptor {
    pub(crate) display_name: String,
    pub(crate) detail_text: String,
    pub(crate) matched_prefix: String,
}

#[derive(Debug)]
pub(crate) struct PreparedExtension {
    pub(crate) dir: PathBuf,
    pub(crate) manifest: Map<String, Value>,
}

impl PreparedExtension {
    pub(crate) fn name(&self) -> Option<&str> {
        self.manifest.get("name").and_then(Value::as_str)
    }

    pub(crate) fn version(&self) -> Option<&str> {
        self.manifest.get("version").and_then(Value::as_str)
    }
}
