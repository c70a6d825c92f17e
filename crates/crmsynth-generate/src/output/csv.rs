use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde_json::Value;

use crate::errors::GenerationError;
use crate::output::CountingWriter;
use crate::records::Record;

/// Write records as CSV, header in field order of the first record.
///
/// An empty collection produces an empty file.
pub fn write_collection_csv(path: &Path, records: &[Record]) -> Result<u64, GenerationError> {
    let counting = CountingWriter::new(BufWriter::new(File::create(path)?));
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    if let Some(first) = records.first() {
        let header: Vec<&str> = first.keys().map(String::as_str).collect();
        writer.write_record(&header)?;
        for record in records {
            let row: Vec<String> = header
                .iter()
                .map(|field| record.get(*field).map(cell).unwrap_or_default())
                .collect();
            writer.write_record(&row)?;
        }
    }

    writer.flush()?;
    let counting = writer
        .into_inner()
        .map_err(|err| GenerationError::Io(err.into_error()))?;
    Ok(counting.bytes_written())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
