//! Append-only record of regions that finished onboarding.
//!
//! The log is a plain text file with one region code per line. It is read
//! once when opened and appended to after every completed region, so an
//! interrupted run resumes at the first region not yet recorded. There is no
//! locking: two processes must not share a log file.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::OnboardError;
use crate::types::AwsRegion;

/// Progress log backed by a text file.
#[derive(Debug)]
pub struct ProgressLog {
    path: PathBuf,
    completed: HashSet<String>,
    // Set when the file does not end with a newline.
    unterminated: bool,
}

impl ProgressLog {
    /// Read the log at `path`, creating an empty file if it does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, OnboardError> {
        let path = path.as_ref().to_path_buf();
        let contents = read_or_create(&path).await.map_err(|source| OnboardError::ProgressLog {
            path: path.clone(),
            source,
        })?;
        let completed: HashSet<String> = contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        debug!(path = %path.display(), entries = completed.len(), "loaded progress log");
        Ok(Self {
            path,
            completed,
            unterminated: !contents.is_empty() && !contents.ends_with('\n'),
        })
    }

    /// Whether `region` has already been recorded.
    #[must_use]
    pub fn contains(&self, region: &AwsRegion) -> bool {
        self.completed.contains(region.as_str())
    }

    /// Append `region` to the log.
    pub async fn record(&mut self, region: &AwsRegion) -> Result<(), OnboardError> {
        let line = if self.unterminated {
            format!("\n{region}")
        } else {
            region.to_string()
        };
        append_line(&self.path, &line).await.map_err(|source| OnboardError::ProgressLog {
            path: self.path.clone(),
            source,
        })?;
        self.unterminated = false;
        self.completed.insert(region.as_str().to_owned());
        Ok(())
    }

    /// Number of distinct regions recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

async fn read_or_create(path: &Path) -> io::Result<String> {
    match fs::read_to_string(path).await {
        Ok(contents) => Ok(contents),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::File::create(path).await?;
            Ok(String::new())
        }
        Err(e) => Err(e),
    }
}

async fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path).await?;
    file.write_all(format!("{line}\n").as_bytes()).await?;
    file.flush().await
}
