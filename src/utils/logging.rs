use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use chrono_tz::Asia::Tokyo;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::utils::config::LogConfig;

/// 日本時間 (Asia/Tokyo) で出力するタイムスタンプ
struct TokyoTime;

impl FormatTime for TokyoTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Utc::now().with_timezone(&Tokyo);
        write!(w, "{}", now.format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Installs the console layer and, when enabled, the rotating file layer.
///
/// The returned guard flushes the background file writer on drop and must be
/// held until the process exits.
pub fn init_logging(cfg: &LogConfig) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.default_filter.as_str()));

    let console_layer = fmt::layer()
        .with_timer(TokyoTime)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    let file_writer = if cfg.to_file {
        match SizeRotatingWriter::new(Path::new(&cfg.dir).join(&cfg.file_name), cfg.max_bytes, cfg.max_files) {
            Ok(writer) => Some(writer),
            Err(e) => {
                eprintln!("file logging disabled, cannot open {}/{}: {}", cfg.dir, cfg.file_name, e);
                None
            }
        }
    } else {
        None
    };

    match file_writer {
        Some(writer) => {
            // 書き込みはバックグラウンドスレッドで行う
            let (non_blocking, guard) = tracing_appender::non_blocking(writer);
            let file_layer = fmt::layer()
                .with_timer(TokyoTime)
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .init();
            None
        }
    }
}

/// Append-only log file that rolls over once it would grow past `max_bytes`.
///
/// `app.log` is renamed to `app.log.1`, older generations shift up by one and
/// anything beyond `max_files` generations is removed.
pub struct SizeRotatingWriter {
    path: PathBuf,
    max_bytes: u64,
    max_files: usize,
    file: File,
    written: u64,
}

impl SizeRotatingWriter {
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes: max_bytes.max(1),
            max_files: max_files.max(1),
            file,
            written,
        })
    }

    fn generation(&self, n: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", n));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let oldest = self.generation(self.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.max_files).rev() {
            let from = self.generation(n);
            if from.exists() {
                fs::rename(&from, self.generation(n + 1))?;
            }
        }
        fs::rename(&self.path, self.generation(1))?;

        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for SizeRotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_when_next_write_exceeds_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("app.log");
        let mut writer = SizeRotatingWriter::new(&path, 100, 3).unwrap();

        writer.write_all(&[b'a'; 60]).unwrap();
        writer.write_all(&[b'b'; 60]).unwrap();
        writer.flush().unwrap();

        let rotated = fs::read(dir.path().join("logs").join("app.log.1")).unwrap();
        let current = fs::read(&path).unwrap();
        assert_eq!(rotated, vec![b'a'; 60]);
        assert_eq!(current, vec![b'b'; 60]);
    }

    #[test]
    fn keeps_at_most_max_files_generations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut writer = SizeRotatingWriter::new(&path, 10, 2).unwrap();

        for chunk in [b'1', b'2', b'3', b'4'] {
            writer.write_all(&[chunk; 8]).unwrap();
        }
        writer.flush().unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![b'4'; 8]);
        assert_eq!(fs::read(dir.path().join("app.log.1")).unwrap(), vec![b'3'; 8]);
        assert_eq!(fs::read(dir.path().join("app.log.2")).unwrap(), vec![b'2'; 8]);
        assert!(!dir.path().join("app.log.3").exists());
    }

    #[test]
    fn resumes_size_accounting_for_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, [b'x'; 90]).unwrap();

        let mut writer = SizeRotatingWriter::new(&path, 100, 1).unwrap();
        writer.write_all(&[b'y'; 20]).unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read(dir.path().join("app.log.1")).unwrap().len(), 90);
        assert_eq!(fs::read(&path).unwrap(), vec![b'y'; 20]);
    }
}
