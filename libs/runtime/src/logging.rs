use crate::config::LoggingConfig;
use std::{
    io::Write,
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::Level;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};

fn parse_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

fn to_filter(level: Option<Level>) -> LevelFilter {
    match level {
        Some(l) => LevelFilter::from_level(l),
        None => LevelFilter::OFF,
    }
}

// Shared handle over the rotating file; fmt wants a MakeWriter.
#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendCount>>>);

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriterHandle;
    fn make_writer(&'a self) -> Self::Writer {
        RotWriterHandle(self.0.clone())
    }
}

struct RotWriterHandle(Arc<Mutex<FileRotate<AppendCount>>>);

impl RotWriterHandle {
    fn rotate(&self) -> std::sync::MutexGuard<'_, FileRotate<AppendCount>> {
        // A poisoned lock still holds a usable writer.
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.rotate().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.rotate().flush()
    }
}

/// Initialize logging: a console layer at `console_level` plus an optional
/// rotating file layer. Relative file paths are resolved against `base_dir`.
///
/// Safe to call more than once per process; later calls are ignored.
pub fn init_logging(config: &LoggingConfig, base_dir: &Path) {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console_filter = to_filter(parse_level(&config.console_level));
    layers.push(
        fmt::layer()
            .with_target(true)
            .with_filter(console_filter)
            .boxed(),
    );

    if let Some(file) = &config.file {
        let mut path = std::path::PathBuf::from(file);
        if path.is_relative() {
            path = base_dir.join(path);
        }
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }

        let max_bytes = config.max_size_mb.unwrap_or(100) as usize * 1024 * 1024;
        let backups = config.max_backups.unwrap_or(3);

        let rotate = FileRotate::new(
            path,
            AppendCount::new(backups),
            ContentLimit::Bytes(max_bytes),
            Compression::None,
            #[cfg(unix)]
            None,
        );

        let file_level = if config.file_level.is_empty() {
            Some(Level::DEBUG)
        } else {
            parse_level(&config.file_level)
        };

        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(RotWriter(Arc::new(Mutex::new(rotate))))
                .with_filter(to_filter(file_level))
                .boxed(),
        );
    }

    let _ = tracing_subscriber::registry().with(layers).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing() {
        assert_eq!(parse_level("info"), Some(Level::INFO));
        assert_eq!(parse_level("TRACE"), Some(Level::TRACE));
        assert_eq!(parse_level("off"), None);
        assert_eq!(parse_level("garbage"), Some(Level::INFO));
    }

    #[test]
    fn init_does_not_panic_with_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = LoggingConfig {
            console_level: "off".to_string(),
            file: Some("logs/tandem.log".to_string()),
            file_level: "debug".to_string(),
            max_size_mb: Some(1),
            max_backups: Some(1),
        };
        init_logging(&cfg, dir.path());
        tracing::info!("logging smoke test");
    }
}
