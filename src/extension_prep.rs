use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde_json::{Map, Value};

use crate::{
    manifest_merge, PreparedExtension, COMMON_MANIFEST_FILE, EXTENSION_TEMP_DIR_PREFIX,
    FALLBACK_EXTENSION_NAME, MERGED_MANIFEST_FILE, PLATFORM_MANIFEST_FILE,
};

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<(), String> {
    fs::create_dir_all(dest)
        .map_err(|error| format!("Failed to create directory {}: {}", dest.display(), error))?;

    let entries = fs::read_dir(src)
        .map_err(|error| format!("Failed to read directory {}: {}", src.display(), error))?;
    for entry in entries {
        let entry = entry
            .map_err(|error| format!("Failed to read entry in {}: {}", src.display(), error))?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        let file_type = entry.file_type().map_err(|error| {
            format!("Failed to inspect {}: {}", src_path.display(), error)
        })?;

        if file_type.is_dir() {
            copy_dir_recursive(&src_path, &dest_path)?;
        } else {
            fs::copy(&src_path, &dest_path).map_err(|error| {
                format!(
                    "Failed to copy {} to {}: {}",
                    src_path.display(),
                    dest_path.display(),
                    error
                )
            })?;
        }
    }

    Ok(())
}

fn read_manifest(path: &Path) -> Result<Map<String, Value>, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("Failed to read manifest {}: {}", path.display(), error))?;
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(format!("Manifest {} has non-object root", path.display())),
        Err(error) => Err(format!(
            "Failed to parse manifest {}: {}",
            path.display(),
            error
        )),
    }
}

fn unique_extension_dir(temp_root: &Path) -> PathBuf {
    let millis = Utc::now().timestamp_millis();
    let mut candidate = temp_root.join(format!("{EXTENSION_TEMP_DIR_PREFIX}{millis}"));
    let mut suffix = 1;
    while candidate.exists() {
        candidate = temp_root.join(format!("{EXTENSION_TEMP_DIR_PREFIX}{millis}-{suffix}"));
        suffix += 1;
    }
    candidate
}

/// Copies the extension into a fresh directory under `temp_root` and writes
/// its merged `manifest.json`.
///
/// The common manifest is optional; the platform manifest is required.
pub(crate) fn prepare_extension<F>(
    source_dir: &Path,
    temp_root: &Path,
    log: F,
) -> Result<PreparedExtension, String>
where
    F: Fn(&str),
{
    if !source_dir.is_dir() {
        return Err(format!(
            "Extension directory {} does not exist",
            source_dir.display()
        ));
    }

    let dir = unique_extension_dir(temp_root);
    copy_dir_recursive(source_dir, &dir)?;

    let common_path = dir.join(COMMON_MANIFEST_FILE);
    let platform_path = dir.join(PLATFORM_MANIFEST_FILE);

    let common = match read_manifest(&common_path) {
        Ok(manifest) => {
            log(&format!("{COMMON_MANIFEST_FILE} loaded"));
            manifest
        }
        Err(error) => {
            log(&format!("{error}; continuing without common manifest"));
            Map::new()
        }
    };
    let platform = read_manifest(&platform_path)?;
    log(&format!("{PLATFORM_MANIFEST_FILE} loaded"));

    let mut manifest = manifest_merge::merge_manifests(&common, &platform);
    if manifest_merge::ensure_manifest_name(&mut manifest, FALLBACK_EXTENSION_NAME) {
        log(&format!(
            "merged manifest has no name; using \"{FALLBACK_EXTENSION_NAME}\""
        ));
    }

    let merged_path = dir.join(MERGED_MANIFEST_FILE);
    let serialized = serde_json::to_string_pretty(&manifest)
        .map_err(|error| format!("Failed to serialize merged manifest: {error}"))?;
    fs::write(&merged_path, serialized).map_err(|error| {
        format!(
            "Failed to write merged manifest {}: {}",
            merged_path.display(),
            error
        )
    })?;
    log(&format!("{MERGED_MANIFEST_FILE} written to {}", dir.display()));

    for partial in [&common_path, &platform_path] {
        if let Err(error) = fs::remove_file(partial) {
            if error.kind() != std::io::ErrorKind::NotFound {
                log(&format!(
                    "failed to remove partial manifest {}: {}",
                    partial.display(),
                    error
                ));
            }
        }
    }

    Ok(PreparedExtension { dir, manifest })
}
