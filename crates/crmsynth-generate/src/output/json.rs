use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::errors::GenerationError;
use crate::output::CountingWriter;
use crate::records::Record;

/// Query-result envelope wrapped around each collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<'a> {
    pub total_size: usize,
    pub done: bool,
    pub records: &'a [Record],
}

impl<'a> Envelope<'a> {
    pub fn new(records: &'a [Record]) -> Self {
        Self {
            total_size: records.len(),
            done: true,
            records,
        }
    }
}

/// Write `records` wrapped in an [`Envelope`], returning bytes written.
pub fn write_collection_json(path: &Path, records: &[Record]) -> Result<u64, GenerationError> {
    let mut writer = CountingWriter::new(BufWriter::new(File::create(path)?));
    serde_json::to_writer_pretty(&mut writer, &Envelope::new(records))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(writer.bytes_written())
}
