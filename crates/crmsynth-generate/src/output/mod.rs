//! Persistence-side writers for a generated [`Dataset`](crate::dataset::Dataset).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::Dataset;
use crate::errors::GenerationError;

pub mod csv;
pub mod json;

/// File format for written collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// One file produced by [`write_dataset`].
#[derive(Debug, Clone, Serialize)]
pub struct WrittenFile {
    pub collection: &'static str,
    pub path: PathBuf,
    pub records: u64,
    pub bytes: u64,
}

/// Write every collection of `dataset` into `dir`, one file per collection.
pub fn write_dataset(
    dir: &Path,
    dataset: &Dataset,
    format: OutputFormat,
) -> Result<Vec<WrittenFile>, GenerationError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for collection in dataset.collections()? {
        let path = dir.join(format!("{}.{}", collection.name, format.extension()));
        let bytes = match format {
            OutputFormat::Json => json::write_collection_json(&path, &collection.records)?,
            OutputFormat::Csv => csv::write_collection_csv(&path, &collection.records)?,
        };
        info!(
            collection = collection.name,
            records = collection.records.len(),
            bytes,
            path = %path.display(),
            "collection written"
        );
        written.push(WrittenFile {
            collection: collection.name,
            path,
            records: collection.records.len() as u64,
            bytes,
        });
    }
    Ok(written)
}

/// Byte-counting adapter shared by the writers.
pub(crate) struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
