//! Data loader for discovering and parsing carestat JSONL files
//!
//! [`JsonlSource`] walks a data directory for `.jsonl` files, parses them in
//! parallel on the rayon pool, and answers item-source queries from the
//! loaded records. Files are read once, on the first query.
//!
//! # Data location
//!
//! In order of precedence:
//! 1. An explicit path (the `--data` flag)
//! 2. The `CARESTAT_DATA_PATH` environment variable
//! 3. `<platform data dir>/carestat`, e.g. `~/.local/share/carestat` on Linux
//!
//! # Examples
//!
//! ```no_run
//! use carestat_provider_json::JsonlSource;
//! use carestat_core::filters::{ItemFilter, ItemScope};
//! use carestat_core::provider::{ItemFamily, ItemQuery, ItemSource};
//! use chrono::NaiveDate;
//!
//! # async fn example() -> carestat_core::Result<()> {
//! let source = JsonlSource::discover(None)?.with_progress(true);
//! let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
//! let query = ItemQuery {
//!     family: ItemFamily::Requests,
//!     filter: ItemFilter::new(ItemScope::NotEnded, today),
//! };
//! let open_requests = source.items(&query).await?;
//! println!("{} open requests", open_requests.len());
//! # Ok(())
//! # }
//! ```

use crate::records::RawRecord;
use async_trait::async_trait;
use carestat_core::error::{CarestatError, Result};
use carestat_core::filters::ClientFilter;
use carestat_core::provider::{CoordinatorSource, ItemQuery, ItemSource, MemorySource};
use carestat_core::types::{AttendanceAllowanceClient, StaffId, TenantId, TimeBoundedItem};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tracing::{debug, info, trace};
use walkdir::WalkDir;

/// Environment variable naming the data directory
pub const DATA_PATH_ENV: &str = "CARESTAT_DATA_PATH";

/// Records parsed from one file
#[derive(Debug, Default)]
struct FileRecords {
    records: Vec<RawRecord>,
    malformed: usize,
}

/// Item source backed by a directory of JSONL files
pub struct JsonlSource {
    /// Directory searched recursively for `.jsonl` files
    root: PathBuf,
    /// Whether to show a progress bar while loading
    show_progress: bool,
    /// Records, loaded on first use
    data: OnceCell<MemorySource>,
}

impl JsonlSource {
    /// Source reading from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            show_progress: false,
            data: OnceCell::new(),
        }
    }

    /// Locate the data directory
    ///
    /// # Errors
    ///
    /// Returns [`CarestatError::NoDataDirectory`] if the resolved directory
    /// does not exist.
    pub fn discover(explicit: Option<PathBuf>) -> Result<Self> {
        let root = explicit
            .or_else(|| std::env::var_os(DATA_PATH_ENV).map(PathBuf::from))
            .or_else(|| dirs::data_dir().map(|dir| dir.join("carestat")))
            .ok_or(CarestatError::NoDataDirectory)?;

        if !root.is_dir() {
            debug!("Data directory {} does not exist", root.display());
            return Err(CarestatError::NoDataDirectory);
        }

        debug!("Using data directory {}", root.display());
        Ok(Self::new(root))
    }

    /// Enable or disable the loading progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All `.jsonl` files under the data directory, sorted by path
    pub async fn find_jsonl_files(&self) -> Result<Vec<PathBuf>> {
        let root = self.root.clone();
        let files = tokio::task::spawn_blocking(move || {
            let mut files: Vec<PathBuf> = WalkDir::new(root)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("jsonl"))
                .collect();
            files.sort();
            files
        })
        .await
        .map_err(|e| CarestatError::Io(std::io::Error::other(e.to_string())))?;

        info!("Found {} JSONL files to process", files.len());
        Ok(files)
    }

    /// The loaded records, reading the files on first call
    pub async fn load(&self) -> Result<&MemorySource> {
        self.data.get_or_try_init(|| self.load_all()).await
    }

    async fn load_all(&self) -> Result<MemorySource> {
        let files = self.find_jsonl_files().await?;

        let progress = self.show_progress.then(|| {
            let pb = ProgressBar::new(files.len() as u64);
            if let Ok(style) =
                ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {pos}/{len} files")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_message("Loading care records");
            pb
        });

        let worker_progress = progress.clone();
        let parsed = tokio::task::spawn_blocking(move || {
            files
                .par_iter()
                .map(|path| {
                    let result = parse_file(path);
                    if let Some(pb) = &worker_progress {
                        pb.inc(1);
                    }
                    result
                })
                .collect::<Result<Vec<FileRecords>>>()
        })
        .await
        .map_err(|e| CarestatError::Io(std::io::Error::other(e.to_string())))??;

        if let Some(pb) = progress {
            pb.finish_with_message("Loading complete");
        }

        let mut data = MemorySource::new();
        let mut dropped = 0usize;
        let mut malformed = 0usize;
        for file in parsed {
            malformed += file.malformed;
            for record in file.records {
                if !absorb(&mut data, record) {
                    dropped += 1;
                }
            }
        }

        if malformed + dropped > 0 {
            debug!(
                "Skipped {} malformed lines and {} records with invalid fields",
                malformed, dropped
            );
        }
        info!(
            "Loaded {} requests, {} packages, {} clients, {} coordinators",
            data.requests.len(),
            data.packages.len(),
            data.clients.len(),
            data.coordinators.len()
        );
        Ok(data)
    }
}

/// Read one file, keeping every line that parses as a record
fn parse_file(path: &Path) -> Result<FileRecords> {
    let content = std::fs::read_to_string(path)?;
    let mut parsed = FileRecords::default();

    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RawRecord>(line) {
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                trace!("Skipping line {} of {}: {}", number + 1, path.display(), e);
                parsed.malformed += 1;
            }
        }
    }

    Ok(parsed)
}

/// Convert a record and store it, `false` if it was rejected
fn absorb(data: &mut MemorySource, record: RawRecord) -> bool {
    let stored = match record {
        RawRecord::Request(raw) => raw.into_item().map(|item| data.requests.push(item)),
        RawRecord::Package(raw) => raw.into_item().map(|item| data.packages.push(item)),
        RawRecord::Client(raw) => raw.into_client().map(|client| data.clients.push(client)),
        RawRecord::Coordinator(coordinator) => {
            data.coordinators.push(coordinator);
            Some(())
        }
    };
    stored.is_some()
}

#[async_trait]
impl ItemSource for JsonlSource {
    async fn items(&self, query: &ItemQuery) -> Result<Vec<TimeBoundedItem>> {
        self.load().await?.items(query).await
    }

    async fn clients(&self, filter: &ClientFilter) -> Result<Vec<AttendanceAllowanceClient>> {
        self.load().await?.clients(filter).await
    }
}

#[async_trait]
impl CoordinatorSource for JsonlSource {
    async fn coordinator_ids(&self, tenant: Option<&TenantId>) -> Result<HashSet<StaffId>> {
        self.load().await?.coordinator_ids(tenant).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ENV_MUTEX, EnvVarGuard, write_jsonl};
    use carestat_core::filters::{ItemFilter, ItemScope};
    use carestat_core::provider::ItemFamily;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    fn query(family: ItemFamily, scope: ItemScope) -> ItemQuery {
        ItemQuery {
            family,
            filter: ItemFilter::new(scope, today()),
        }
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_jsonl(
            dir.path(),
            "north/requests.jsonl",
            &[
                r#"{"type":"request","id":"r1","startDate":"2025-01-05","weeklyHours":3.5,"services":["Shopping"],"tenant":"north"}"#,
                r#"{"type":"request","id":"r2","startDate":"2023-01-05","endDate":"2023-03-01","weeklyHours":1}"#,
                "",
                "{not json",
            ],
        );
        write_jsonl(
            dir.path(),
            "packages.jsonl",
            &[
                r#"{"type":"package","id":"p1","startDate":"2024-11-01","endDate":"2025-02-28","weeklyHours":10}"#,
                r#"{"type":"package","id":"bad","startDate":"2024-13-01"}"#,
            ],
        );
        write_jsonl(
            dir.path(),
            "people.jsonl",
            &[
                r#"{"type":"client","id":"c1","completedBy":"s1","attendanceAllowance":{"status":"Pending","requestedDate":"2025-02-01"}}"#,
                r#"{"type":"coordinator","staffId":"s1","tenant":"north"}"#,
                r#"{"type":"coordinator","staffId":"s2","tenant":"south"}"#,
            ],
        );
        write_jsonl(dir.path(), "notes.txt", &["ignored"]);
        dir
    }

    #[tokio::test]
    async fn test_find_jsonl_files() {
        let dir = fixture();
        let source = JsonlSource::new(dir.path());

        let files = source.find_jsonl_files().await.unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| f.extension().unwrap() == "jsonl"));
    }

    #[tokio::test]
    async fn test_load_skips_malformed_and_invalid_records() {
        let dir = fixture();
        let source = JsonlSource::new(dir.path());

        let data = source.load().await.unwrap();
        assert_eq!(data.requests.len(), 2);
        assert_eq!(data.packages.len(), 1);
        assert_eq!(data.clients.len(), 1);
        assert_eq!(data.coordinators.len(), 2);
    }

    #[tokio::test]
    async fn test_items_query_applies_filter() {
        let dir = fixture();
        let source = JsonlSource::new(dir.path());

        let open = source
            .items(&query(ItemFamily::Requests, ItemScope::NotEnded))
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id.as_str(), "r1");

        let packages = source
            .items(&query(ItemFamily::Packages, ItemScope::SinceYear(2024)))
            .await
            .unwrap();
        assert_eq!(packages.len(), 1);
    }

    #[tokio::test]
    async fn test_clients_and_coordinators() {
        let dir = fixture();
        let source = JsonlSource::new(dir.path());

        let clients = source.clients(&ClientFilter::new()).await.unwrap();
        assert_eq!(clients[0].completed_by, Some(StaffId::new("s1")));

        let north = source
            .coordinator_ids(Some(&TenantId::new("north")))
            .await
            .unwrap();
        assert_eq!(north, HashSet::from([StaffId::new("s1")]));
    }

    #[tokio::test]
    async fn test_progress_flag_does_not_change_results() {
        let dir = fixture();
        let source = JsonlSource::new(dir.path()).with_progress(true);
        assert_eq!(source.load().await.unwrap().requests.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_directory_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let source = JsonlSource::new(dir.path());
        let data = source.load().await.unwrap();
        assert!(data.requests.is_empty() && data.clients.is_empty());
    }

    #[tokio::test]
    async fn test_discover_prefers_explicit_path() {
        let _lock = ENV_MUTEX.lock().await;
        let env_dir = TempDir::new().unwrap();
        let explicit = TempDir::new().unwrap();
        let mut env = EnvVarGuard::new();
        env.set(DATA_PATH_ENV, env_dir.path().to_str().unwrap());

        let source = JsonlSource::discover(Some(explicit.path().to_path_buf())).unwrap();
        assert_eq!(source.root(), explicit.path());

        let source = JsonlSource::discover(None).unwrap();
        assert_eq!(source.root(), env_dir.path());
    }

    #[tokio::test]
    async fn test_discover_missing_directory() {
        let _lock = ENV_MUTEX.lock().await;
        let mut env = EnvVarGuard::new();
        env.remove(DATA_PATH_ENV);

        let result = JsonlSource::discover(Some(PathBuf::from("/nonexistent/carestat-data")));
        assert!(matches!(result, Err(CarestatError::NoDataDirectory)));
    }
}
