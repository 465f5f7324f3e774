use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::{Error, Result};

/// How long a cached response stays fresh. The table conversions are
/// regenerated daily at most, so a few hours is plenty.
pub const DEFAULT_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// File-per-entry cache of raw response bodies, keyed by a content hash of
/// the request URL. Strictly an optimization: a stale, corrupt, or missing
/// entry is just a miss.
pub struct ResponseCache {
    cache_dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(custom_dir: Option<PathBuf>) -> Result<Self> {
        Self::with_ttl(custom_dir, DEFAULT_TTL)
    }

    pub fn with_ttl(custom_dir: Option<PathBuf>, ttl: Duration) -> Result<Self> {
        let cache_dir = match custom_dir {
            Some(dir) => dir,
            None => {
                let proj_dirs =
                    ProjectDirs::from("", "", "eve-sde-blueprints").ok_or(Error::NoCacheDir)?;
                proj_dirs.cache_dir().to_path_buf()
            }
        };

        fs::create_dir_all(&cache_dir)?;

        Ok(Self { cache_dir, ttl })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let key = blake3::hash(url.as_bytes()).to_hex();
        self.cache_dir.join(format!("{key}.json"))
    }

    /// A fresh cached body for the URL, or `None` on any kind of miss.
    pub fn get(&self, url: &str) -> Option<String> {
        let path = self.entry_path(url);
        let modified = fs::metadata(&path).ok()?.modified().ok()?;
        let age = SystemTime::now().duration_since(modified).ok()?;
        if age > self.ttl {
            return None;
        }
        fs::read_to_string(&path).ok()
    }

    pub fn put(&self, url: &str, body: &str) -> io::Result<()> {
        fs::write(self.entry_path(url), body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn stores_and_returns_bodies_by_url() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(Some(dir.path().to_path_buf())).unwrap();

        assert_eq!(cache.get("http://example.com/a.json"), None);

        cache.put("http://example.com/a.json", "[1,2,3]").unwrap();
        cache.put("http://example.com/b.json", "[]").unwrap();

        assert_eq!(
            cache.get("http://example.com/a.json").as_deref(),
            Some("[1,2,3]")
        );
        assert_eq!(cache.get("http://example.com/b.json").as_deref(), Some("[]"));
    }

    #[test]
    fn distinct_urls_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(Some(dir.path().to_path_buf())).unwrap();

        assert_ne!(
            cache.entry_path("http://example.com/a.json"),
            cache.entry_path("http://example.com/b.json")
        );
    }

    #[test]
    fn expired_entries_are_misses() {
        let dir = TempDir::new().unwrap();
        let cache =
            ResponseCache::with_ttl(Some(dir.path().to_path_buf()), Duration::ZERO).unwrap();

        cache.put("http://example.com/a.json", "[]").unwrap();
        // Any measurable age exceeds a zero TTL.
        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(cache.get("http://example.com/a.json"), None);
    }

    #[test]
    fn creates_the_cache_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("cache");
        let cache = ResponseCache::new(Some(nested.clone())).unwrap();

        assert!(nested.is_dir());
        assert_eq!(cache.cache_dir(), nested.as_path());
    }
}
