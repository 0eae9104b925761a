//! Snapshot publishing.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::snapshot::SessionSnapshot;
use crate::config::Paths;
use crate::error::AlarmError;

/// Destination for session snapshots.
#[cfg_attr(test, mockall::automock)]
pub trait CompanionSync {
    /// Publish a snapshot, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be delivered.
    fn publish(&mut self, snapshot: &SessionSnapshot) -> Result<(), AlarmError>;

    /// Remove the published snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be removed.
    fn clear(&mut self) -> Result<(), AlarmError>;
}

/// Publishes snapshots as JSON to a file.
///
/// Writes go to a sibling temp file that is renamed into place, so readers
/// never see a partial document.
#[derive(Debug, Clone)]
pub struct FileSync {
    path: PathBuf,
}

impl FileSync {
    /// Publish to the given file.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Publish to `state.json` in the data directory.
    #[must_use]
    pub fn from_paths(paths: &Paths) -> Self {
        Self::new(paths.state_file.clone())
    }

    /// The file snapshots are written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the last published snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read(&self) -> Result<Option<SessionSnapshot>, AlarmError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }
}

impl CompanionSync for FileSync {
    fn publish(&mut self, snapshot: &SessionSnapshot) -> Result<(), AlarmError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), phase = %snapshot.phase, "snapshot published");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), AlarmError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Why a snapshot is being offered for publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishReason {
    /// A countdown second elapsed.
    Tick,
    /// An interval rolled over, the session completed, paused, resumed, or
    /// stopped.
    Lifecycle,
}

/// Rate limit for tick-driven snapshot writes.
///
/// Lifecycle changes always publish; ticks publish at most once per window.
#[derive(Debug, Clone)]
pub struct SyncThrottle {
    window: Duration,
    last_published: Option<DateTime<Utc>>,
}

impl SyncThrottle {
    /// Allow a tick-driven publish every `window_seconds`.
    #[must_use]
    pub fn new(window_seconds: u32) -> Self {
        Self {
            window: Duration::seconds(i64::from(window_seconds)),
            last_published: None,
        }
    }

    /// Decide whether to publish now, recording the publish if so.
    pub fn should_publish(&mut self, reason: PublishReason, now: DateTime<Utc>) -> bool {
        let due = match (reason, self.last_published) {
            (PublishReason::Lifecycle, _) | (PublishReason::Tick, None) => true,
            (PublishReason::Tick, Some(last)) => now.signed_duration_since(last) >= self.window,
        };
        if due {
            self.last_published = Some(now);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SoundConfig;
    use crate::core::{IntervalConfig, IntervalController, ManualClock, Phase, Session};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn snapshot() -> SessionSnapshot {
        let clock = ManualClock::new(epoch());
        let config = IntervalConfig::new(30, 2);
        let mut ctrl = IntervalController::with_clock(config, clock);
        ctrl.start_session(Session::new(config, epoch()));
        SessionSnapshot::capture(&ctrl, &SoundConfig::default())
    }

    #[test]
    fn test_file_sync_publish_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let mut sync = FileSync::new(temp_dir.path().join("nested").join("state.json"));

        assert!(sync.read().unwrap().is_none());

        let published = snapshot();
        sync.publish(&published).unwrap();

        let read = sync.read().unwrap().unwrap();
        assert_eq!(read, published);
        assert_eq!(read.phase, Phase::Running);
        assert!(!sync.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_sync_clear() {
        let temp_dir = TempDir::new().unwrap();
        let mut sync = FileSync::new(temp_dir.path().join("state.json"));

        sync.clear().unwrap();
        sync.publish(&snapshot()).unwrap();
        sync.clear().unwrap();
        assert!(sync.read().unwrap().is_none());
    }

    #[test]
    fn test_file_sync_corrupt_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FileSync::new(path).read().unwrap_err();
        assert!(matches!(err, AlarmError::Parse(_)));
    }

    #[test]
    fn test_throttle_limits_ticks() {
        let mut throttle = SyncThrottle::new(15);
        let t0 = epoch();

        assert!(throttle.should_publish(PublishReason::Tick, t0));
        assert!(!throttle.should_publish(PublishReason::Tick, t0 + Duration::seconds(5)));
        assert!(!throttle.should_publish(PublishReason::Tick, t0 + Duration::seconds(14)));
        assert!(throttle.should_publish(PublishReason::Tick, t0 + Duration::seconds(15)));
    }

    #[test]
    fn test_throttle_always_passes_lifecycle() {
        let mut throttle = SyncThrottle::new(15);
        let t0 = epoch();

        assert!(throttle.should_publish(PublishReason::Tick, t0));
        assert!(throttle.should_publish(PublishReason::Lifecycle, t0 + Duration::seconds(1)));
        assert!(throttle.should_publish(PublishReason::Lifecycle, t0 + Duration::seconds(2)));
        // The window restarts from the last lifecycle publish.
        assert!(!throttle.should_publish(PublishReason::Tick, t0 + Duration::seconds(16)));
        assert!(throttle.should_publish(PublishReason::Tick, t0 + Duration::seconds(17)));
    }
}
