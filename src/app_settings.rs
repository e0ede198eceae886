use std::{fs, path::Path};

use serde_json::{json, Map, Value};

pub(crate) fn default_settings() -> Map<String, Value> {
    let defaults = json!({
        "settings": "true",
        "ed-cookie": {
            "enabled": true,
            "hash": "false",
            "value": "null"
        }
    });
    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Recursively merges `source` into `target`.
///
/// Nested objects are merged key by key; every other value, arrays included,
/// replaces what `target` had.
pub(crate) fn deep_merge(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        let Value::Object(incoming) = value else {
            target.insert(key.clone(), value.clone());
            continue;
        };

        if let Some(Value::Object(existing)) = target.get_mut(key) {
            deep_merge(existing, incoming);
            continue;
        }

        let mut nested = Map::new();
        deep_merge(&mut nested, incoming);
        target.insert(key.clone(), Value::Object(nested));
    }
}

fn write_settings(path: &Path, settings: &Map<String, Value>) -> Result<(), String> {
    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir).map_err(|error| {
            format!(
                "Failed to create settings directory {}: {}",
                parent_dir.display(),
                error
            )
        })?;
    }

    let serialized = serde_json::to_string_pretty(settings)
        .map_err(|error| format!("Failed to serialize settings: {error}"))?;
    fs::write(path, serialized)
        .map_err(|error| format!("Failed to write settings {}: {}", path.display(), error))
}

/// Loads user settings layered over the built-in defaults.
///
/// A missing file is created with the defaults. An unreadable or invalid file
/// is left untouched and the defaults are used.
pub(crate) fn load_settings<F>(path: &Path, log: F) -> Map<String, Value>
where
    F: Fn(&str),
{
    let mut settings = default_settings();

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            match write_settings(path, &settings) {
                Ok(()) => log(&format!(
                    "settings file {} created with default values",
                    path.display()
                )),
                Err(error) => log(&error),
            }
            return settings;
        }
        Err(error) => {
            log(&format!(
                "failed to read settings {}: {}. using default values",
                path.display(),
                error
            ));
            return settings;
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(user_settings)) => deep_merge(&mut settings, &user_settings),
        Ok(_) => log(&format!(
            "settings {} has non-object root; using default values",
            path.display()
        )),
        Err(error) => log(&format!(
            "failed to parse settings {}: {}. using default values",
            path.display(),
            error
        )),
    }

    settings
}
