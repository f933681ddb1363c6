//! Process-wide logging setup
//!
//! Log records go to stderr and are appended to a flat log file.

use chrono::Local;
use env_logger::{Builder, Env, Target};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Default log file, relative to the working directory
pub const LOG_FILE: &str = "hr_system.log";

/// Writer that duplicates every record into stderr and a file
struct TeeWriter {
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            // a failing log file must not take stderr logging down with it
            if file.write_all(buf).is_err() {
                self.file = None;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Initialize logging with `info` as the default filter (`RUST_LOG` overrides)
pub fn init<P: AsRef<Path>>(log_file: P) {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file.as_ref())
        .ok();

    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.target(),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(TeeWriter { file })));

    // tests and embedders may have installed a logger already
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_writer_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        let file = OpenOptions::new().create(true).append(true).open(&path).unwrap();

        let mut writer = TeeWriter { file: Some(file) };
        writer.write_all(b"first line\n").unwrap();
        writer.write_all(b"second line\n").unwrap();
        writer.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first line\nsecond line\n");
    }

    #[test]
    fn test_tee_writer_without_file() {
        let mut writer = TeeWriter { file: None };
        assert_eq!(writer.write(b"stderr only\n").unwrap(), 12);
    }
}
