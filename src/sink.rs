use crate::error::Result;
use crate::models::ProfileRecord;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Storage for processed profiles, one document per profile.
#[async_trait]
pub trait ProfileSink: Send + Sync {
    /// Stores a record, replacing any record for the same profile URL.
    async fn insert(&self, record: &ProfileRecord) -> Result<()>;
    /// Looks up the record stored for a profile URL.
    async fn find_by_url(&self, linkedin_url: &str) -> Option<ProfileRecord>;
}

/// File-based sink: one JSON document per profile under a directory.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn get_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// File name for a profile URL: its path slug, or a sanitized form of the whole URL.
    ///
    /// When sanitizing changes the slug, a hash of the raw slug is appended so
    /// that `jean.dupont` and `jean_dupont` land in different files.
    pub fn key_for(linkedin_url: &str) -> String {
        let trimmed = linkedin_url.trim().trim_end_matches('/');
        let slug = trimmed
            .split("/in/")
            .nth(1)
            .map(|rest| rest.split(['?', '#', '/']).next().unwrap_or(rest))
            .filter(|slug| !slug.is_empty())
            .unwrap_or(trimmed);

        let sanitized: String = slug
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();

        if sanitized == slug {
            sanitized
        } else {
            format!("{}-{:08x}", sanitized, fnv1a(slug.as_bytes()))
        }
    }

    fn record_key(record: &ProfileRecord) -> String {
        match &record.linkedin_url {
            Some(url) => Self::key_for(url),
            // No URL to look it up by, so the timestamp keeps same-name records apart
            None => Self::key_for(&format!(
                "unresolved-{}-{}-{}",
                record.first_name,
                record.last_name,
                record.processed_at.timestamp_millis()
            )),
        }
    }
}

/// 32-bit FNV-1a, stable across builds and platforms.
fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0x811c_9dc5, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(0x0100_0193)
    })
}

#[async_trait]
impl ProfileSink for FileSink {
    async fn insert(&self, record: &ProfileRecord) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await?;
        }

        let path = self.get_path(&Self::record_key(record));
        let tmp_path = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(record)?;

        // Atomic write: write to tmp then rename
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &path).await?;

        debug!("Stored profile record at {}", path.display());
        Ok(())
    }

    async fn find_by_url(&self, linkedin_url: &str) -> Option<ProfileRecord> {
        let path = self.get_path(&Self::key_for(linkedin_url));
        if !path.exists() {
            return None;
        }

        let content = fs::read_to_string(&path).await.ok()?;
        serde_json::from_str(&content).ok()
    }
}
