use serde_json::{Map, Value};

const PERMISSIONS_FIELD: &str = "permissions";
const CONTENT_SCRIPTS_FIELD: &str = "content_scripts";
const WEB_ACCESSIBLE_RESOURCES_FIELD: &str = "web_accessible_resources";
const NAME_FIELD: &str = "name";

/// Merges the common manifest with the platform manifest.
///
/// Platform values override common ones key by key. When both sides hold an
/// array for `permissions`, `content_scripts` or `web_accessible_resources`,
/// the arrays are concatenated (common first) instead; `permissions` is also
/// deduplicated, keeping the first occurrence of each entry.
pub(crate) fn merge_manifests(
    common: &Map<String, Value>,
    platform: &Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = common.clone();
    for (key, value) in platform {
        merged.insert(key.clone(), value.clone());
    }

    if let Some(permissions) = concat_arrays(common, platform, PERMISSIONS_FIELD) {
        merged.insert(
            PERMISSIONS_FIELD.to_string(),
            Value::Array(dedup_first_seen(permissions)),
        );
    }

    for field in [CONTENT_SCRIPTS_FIELD, WEB_ACCESSIBLE_RESOURCES_FIELD] {
        if let Some(combined) = concat_arrays(common, platform, field) {
            merged.insert(field.to_string(), Value::Array(combined));
        }
    }

    merged
}

/// Sets `name` to `fallback` when it is absent or falsy.
///
/// Returns `true` when the fallback was applied.
pub(crate) fn ensure_manifest_name(manifest: &mut Map<String, Value>, fallback: &str) -> bool {
    if manifest.get(NAME_FIELD).is_some_and(is_truthy) {
        return false;
    }

    manifest.insert(NAME_FIELD.to_string(), Value::String(fallback.to_string()));
    true
}

fn concat_arrays(
    common: &Map<String, Value>,
    platform: &Map<String, Value>,
    field: &str,
) -> Option<Vec<Value>> {
    let common_items = common.get(field)?.as_array()?;
    let platform_items = platform.get(field)?.as_array()?;

    Some(
        common_items
            .iter()
            .chain(platform_items.iter())
            .cloned()
            .collect(),
    )
}

// serde_json::Value is not Hash, so membership is checked against the kept list.
fn dedup_first_seen(items: Vec<Value>) -> Vec<Value> {
    let mut kept: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !kept.contains(&item) {
            kept.push(item);
        }
    }
    kept
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
