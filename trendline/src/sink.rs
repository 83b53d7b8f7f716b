//! Append-only CSV sinks.
//!
//! A sink writes its header only when it creates the file. Writing to an
//! existing path appends rows, so repeated runs against the same path
//! accumulate (and duplicate) rows. Use [`timestamped_path`] for fresh
//! per-run files.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use serde::Serialize;
use trendline_core::{InterestRecord, Keyword, RelatedQueryRecord, TrendError};

/// Success sink columns.
pub const INTEREST_HEADER: [&str; 3] = ["date", "keyword", "search_interest"];
/// Related-queries sink columns.
pub const RELATED_HEADER: [&str; 6] = [
    "query",
    "value",
    "keyword",
    "ranking",
    "geo",
    "query_timestamp",
];
/// Failure sink column label: the keywords are written as one unlabeled column.
pub const FAILURE_HEADER: &str = "0";

fn csv_err(e: &csv::Error) -> TrendError {
    TrendError::Csv(e.to_string())
}

/// Append-only CSV file identified by its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Sink writing to `path`. Nothing is touched until the first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open for appending; `true` when this call created the file.
    fn open(&self) -> Result<(File, bool), TrendError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // An existing but empty file still needs its header.
        let fresh = !self.path.try_exists()? || fs::metadata(&self.path)?.len() == 0;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok((file, fresh))
    }

    /// Append serializable rows, writing `header` first if the file is new.
    ///
    /// Flushes before returning. Returns the number of rows written.
    ///
    /// # Errors
    /// `Io` when the file cannot be opened, `Csv` when a row cannot be written.
    pub fn append<S, I>(&self, header: &[&str], rows: I) -> Result<usize, TrendError>
    where
        S: Serialize,
        I: IntoIterator<Item = S>,
    {
        let (file, fresh) = self.open()?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if fresh {
            writer.write_record(header).map_err(|e| csv_err(&e))?;
        }
        let mut written = 0;
        for row in rows {
            writer.serialize(row).map_err(|e| csv_err(&e))?;
            written += 1;
        }
        writer.flush()?;
        Ok(written)
    }
}

/// Success sink for interest records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterestSink(CsvSink);

impl InterestSink {
    /// Sink writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(CsvSink::new(path))
    }

    /// Target file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.0.path()
    }

    /// Append records under the `date,keyword,search_interest` header.
    ///
    /// # Errors
    /// See [`CsvSink::append`].
    pub fn append(&self, records: &[InterestRecord]) -> Result<usize, TrendError> {
        self.0.append(&INTEREST_HEADER, records)
    }
}

/// Failure sink: one keyword per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureSink(CsvSink);

impl FailureSink {
    /// Sink writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(CsvSink::new(path))
    }

    /// Target file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.0.path()
    }

    /// Append the keywords of an exhausted batch.
    ///
    /// # Errors
    /// See [`CsvSink::append`].
    pub fn append(&self, keywords: &[Keyword]) -> Result<usize, TrendError> {
        self.0
            .append(&[FAILURE_HEADER], keywords.iter().map(|k| [k.as_str()]))
    }
}

/// Sink for flattened related-query rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedSink(CsvSink);

impl RelatedSink {
    /// Sink writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(CsvSink::new(path))
    }

    /// Target file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.0.path()
    }

    /// Append flattened related-query rows.
    ///
    /// # Errors
    /// See [`CsvSink::append`].
    pub fn append(&self, records: &[RelatedQueryRecord]) -> Result<usize, TrendError> {
        self.0.append(&RELATED_HEADER, records)
    }
}

/// Read a success sink back into records.
///
/// # Errors
/// `Io` if the file cannot be opened, `Csv` on malformed rows.
pub fn read_interest_csv(path: impl AsRef<Path>) -> Result<Vec<InterestRecord>, TrendError> {
    let file = File::open(path)?;
    csv::Reader::from_reader(file)
        .deserialize()
        .map(|row| row.map_err(|e| csv_err(&e)))
        .collect()
}

/// Read the keywords recorded in a failure sink, in file order.
///
/// # Errors
/// `Io` if the file cannot be opened, `Csv` on malformed rows, `InvalidArg`
/// if a row holds an empty keyword.
pub fn read_failed_keywords(path: impl AsRef<Path>) -> Result<Vec<Keyword>, TrendError> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_err(&e))?;
        if let Some(field) = record.get(0) {
            out.push(Keyword::new(field)?);
        }
    }
    Ok(out)
}

/// `dir/stem_YYMMDD-HHMMSS.csv` stamped with the current UTC time.
#[must_use]
pub fn timestamped_path(dir: impl AsRef<Path>, stem: &str) -> PathBuf {
    let stamp = chrono::Utc::now().format("%y%m%d-%H%M%S");
    dir.as_ref().join(format!("{stem}_{stamp}.csv"))
}
