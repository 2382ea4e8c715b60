//! Race-tolerant telemetry file reader.

use std::{fs, io::ErrorKind, path::PathBuf, thread, time::Duration};

use tracing::warn;

use crate::model::TelemetrySnapshot;

/// Default bounded retry count for writer-in-progress reads.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default backoff between read retries.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Reads the telemetry JSON the app writes.
///
/// Reads are not atomic with respect to the external writer: an empty or
/// truncated document means "mid-write", so the reader retries a bounded
/// number of times and then reports "no data" rather than propagating a
/// parse error.
#[derive(Debug, Clone)]
pub struct TelemetryReader {
    /// Location of the telemetry document.
    path: PathBuf,
    /// Bounded retry count for transient read failures.
    max_retries: u32,
    /// Fixed backoff between retries.
    retry_delay: Duration,
}

impl TelemetryReader {
    /// Reader for `path` with default retry tuning.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Override retry tuning (used by fast-path tests and slow CI machines).
    pub fn with_retry(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Path this reader watches.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read the freshest snapshot. `None` means no usable data right now —
    /// missing file, persistent mid-write state, or an I/O problem (logged).
    pub fn read(&self) -> Option<TelemetrySnapshot> {
        for attempt in 0..self.max_retries {
            let content = match fs::read_to_string(&self.path) {
                Ok(c) => c,
                Err(e) if e.kind() == ErrorKind::NotFound => return None,
                Err(e) => {
                    warn!("error reading telemetry: {}", e);
                    return None;
                }
            };

            if !content.trim().is_empty() {
                match serde_json::from_str::<TelemetrySnapshot>(&content) {
                    Ok(snapshot) => return Some(snapshot),
                    // Writer mid-flight; back off and re-read.
                    Err(_) => {}
                }
            }

            if attempt + 1 < self.max_retries {
                thread::sleep(self.retry_delay);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn temp_telemetry(name: &str, content: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "showtest-{}-{}-{}.json",
            name,
            std::process::id(),
            nanos
        ));
        fs::write(&path, content).unwrap();
        path
    }

    fn fast_reader(path: PathBuf) -> TelemetryReader {
        TelemetryReader::new(path).with_retry(3, Duration::from_millis(1))
    }

    #[test]
    fn missing_file_is_no_data() {
        let reader = fast_reader(std::env::temp_dir().join("showtest-definitely-absent.json"));
        assert!(reader.read().is_none());
    }

    #[test]
    fn valid_empty_document_parses() {
        let path = temp_telemetry("empty", r#"{"elements": [], "states": {}, "events": []}"#);
        let snap = fast_reader(path.clone()).read().unwrap();
        assert!(snap.elements.is_empty());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn truncated_document_returns_none_without_panicking() {
        let path = temp_telemetry("truncated", r#"{"elements": [{"test_id": "nav_b"#);
        assert!(fast_reader(path.clone()).read().is_none());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_file_is_retried_then_none() {
        let path = temp_telemetry("blank", "");
        assert!(fast_reader(path.clone()).read().is_none());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn reread_of_unchanged_file_is_identical() {
        let path = temp_telemetry(
            "stable",
            r#"{"elements": [{"test_id": "a", "x": 1.0, "y": 2.0, "width": 30.0, "height": 40.0}]}"#,
        );
        let reader = fast_reader(path.clone());
        let first = reader.read().unwrap();
        let second = reader.read().unwrap();
        assert_eq!(first.element("a"), second.element("a"));
        let _ = fs::remove_file(path);
    }
}
