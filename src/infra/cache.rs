//! Persistent on-disk caching of the last-known-good rate snapshot.

use std::{
    fs,
    path::PathBuf,
    sync::OnceLock,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::domain::RateSnapshot;

const CACHE_FILENAME: &str = "rate_snapshot.json";

/// Cache TTL: 24 hours, matching the upstream's daily publication cycle.
/// An expired file is still loaded as a fallback when every fetch fails.
pub const SNAPSHOT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Rate snapshot with the timestamp it was fetched at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotCache {
    /// Unix timestamp (seconds) when this snapshot was fetched.
    pub cached_at: u64,
    pub snapshot: RateSnapshot,
}

impl SnapshotCache {
    /// Create a new cache entry with current timestamp.
    pub fn new(snapshot: RateSnapshot) -> Self {
        let cached_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            cached_at,
            snapshot,
        }
    }

    /// Check if the snapshot has expired (older than TTL).
    pub fn is_expired(&self) -> bool {
        self.age() > SNAPSHOT_CACHE_TTL
    }

    /// Get cache age as Duration.
    pub fn age(&self) -> Duration {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Duration::from_secs(now.saturating_sub(self.cached_at))
    }

    /// Human-readable age string.
    pub fn age_string(&self) -> String {
        let secs = self.age().as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else if secs < 86400 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}d", secs / 86400)
        }
    }
}

/// Get the cache file path (in app data directory).
fn cache_path() -> PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| {
        let base = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("landed-cost-estimator");

        // Ensure directory exists
        let _ = fs::create_dir_all(&base);

        base.join(CACHE_FILENAME)
    })
    .clone()
}

/// Load the snapshot cache from disk, if it exists. Expired entries are
/// returned too; the caller decides whether staleness matters.
pub fn load_snapshot_cache() -> Option<SnapshotCache> {
    let path = cache_path();

    if !path.exists() {
        println!("[rates-cache] No snapshot cache found at {}", path.display());
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str::<SnapshotCache>(&content) {
            Ok(cache) => {
                println!(
                    "[rates-cache] Loaded {} rates (age: {})",
                    cache.snapshot.len(),
                    cache.age_string()
                );
                Some(cache)
            }
            Err(e) => {
                println!("[rates-cache] Failed to parse snapshot cache: {e}");
                None
            }
        },
        Err(e) => {
            println!("[rates-cache] Failed to read snapshot cache: {e}");
            None
        }
    }
}

/// Save the snapshot cache to disk.
pub fn save_snapshot_cache(cache: &SnapshotCache) -> Result<(), std::io::Error> {
    let path = cache_path();
    let content = serde_json::to_string_pretty(cache)?;
    fs::write(&path, content)?;
    println!(
        "[rates-cache] Saved {} rates to {}",
        cache.snapshot.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entry_is_not_expired() {
        let cache = SnapshotCache::new(RateSnapshot::fallback());
        assert!(!cache.is_expired());
        assert_eq!(cache.age_string(), "0s");
    }

    #[test]
    fn old_entry_expires() {
        let mut cache = SnapshotCache::new(RateSnapshot::fallback());
        cache.cached_at -= 25 * 60 * 60;
        assert!(cache.is_expired());
        assert_eq!(cache.age_string(), "1d");
    }
}
