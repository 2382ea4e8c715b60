//! Resume checkpoints: where a matrix run died, so the next one can start
//! there instead of from the top.

use std::{
    fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The last failing (window-size, section, step) of an aborted run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Window-size name active at the failure.
    pub size: Option<String>,
    /// Section that failed.
    pub section: String,
    /// Nav element involved, when applicable.
    pub nav_id: Option<String>,
    /// Which step failed (navigate, require_element, smoke, ...).
    pub step: String,
    /// The failure message.
    pub message: String,
    /// Unix seconds when the checkpoint was written.
    pub timestamp: u64,
}

impl Checkpoint {
    /// Build a checkpoint stamped with the current time.
    pub fn new(
        size: Option<&str>,
        section: &str,
        nav_id: Option<&str>,
        step: &str,
        message: &str,
    ) -> Self {
        Self {
            size: size.map(str::to_string),
            section: section.to_string(),
            nav_id: nav_id.map(str::to_string),
            step: step.to_string(),
            message: message.to_string(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }
}

/// Persist a checkpoint. Never blocks a test run on persistence failure.
pub fn save(path: &Path, checkpoint: &Checkpoint) {
    match serde_json::to_string_pretty(checkpoint) {
        Ok(json) => {
            if let Err(e) = fs::write(path, json) {
                warn!("could not persist resume checkpoint: {}", e);
            }
        }
        Err(e) => warn!("could not serialize resume checkpoint: {}", e),
    }
}

/// Load a checkpoint if one exists and parses; anything else is `None`.
pub fn load(path: &Path) -> Option<Checkpoint> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Remove a stale checkpoint after a fully successful run.
pub fn clear(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("could not clear resume checkpoint: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "showtest-resume-{}-{}-{}.json",
            tag,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn roundtrip_preserves_fields() {
        let path = temp_path("roundtrip");
        let cp = Checkpoint::new(
            Some("phone"),
            "Checkboxes",
            Some("nav_checkboxes"),
            "navigate",
            "[FAIL] selected_section: expected 'Checkboxes', got 'Buttons'",
        );
        save(&path, &cp);
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.size.as_deref(), Some("phone"));
        assert_eq!(loaded.section, "Checkboxes");
        assert_eq!(loaded.step, "navigate");
        clear(&path);
        assert!(load(&path).is_none());
    }

    #[test]
    fn corrupt_checkpoint_reads_as_none() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();
        assert!(load(&path).is_none());
        clear(&path);
    }

    #[test]
    fn missing_checkpoint_reads_as_none() {
        assert!(load(&temp_path("absent")).is_none());
    }
}
