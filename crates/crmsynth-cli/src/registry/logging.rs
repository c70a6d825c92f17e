use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

use super::{RegistryError, RegistryResult};

/// Install a human-readable stderr layer and a JSON layer appending to the
/// run's `logs.ndjson`. `RUST_LOG` overrides the default `info` filter.
pub fn init_run_logging(path: &Path) -> RegistryResult<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let file = Arc::new(Mutex::new(file));

    let make_writer = BoxMakeWriter::new(move || SharedWriter {
        file: Arc::clone(&file),
    });

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(make_writer);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(json_layer)
        .try_init()
        .map_err(|err| RegistryError::Logging(err.to_string()))?;

    Ok(())
}

struct SharedWriter {
    file: Arc<Mutex<File>>,
}

impl SharedWriter {
    fn locked(&self) -> io::Result<MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("failed to lock log file"))
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.locked()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.locked()?.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_writers_append_to_one_file() {
        let path = std::env::temp_dir().join(format!(
            "crmsynth_log_{}.ndjson",
            uuid::Uuid::new_v4()
        ));
        let file = Arc::new(Mutex::new(File::create(&path).expect("create log")));
        let mut first = SharedWriter {
            file: Arc::clone(&file),
        };
        let mut second = SharedWriter { file };
        first.write_all(b"{\"a\":1}\n").expect("write");
        second.write_all(b"{\"b\":2}\n").expect("write");
        second.flush().expect("flush");

        let written = std::fs::read_to_string(&path).expect("read log");
        assert_eq!(written, "{\"a\":1}\n{\"b\":2}\n");
        std::fs::remove_file(path).expect("cleanup");
    }
}
