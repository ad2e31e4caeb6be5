//! Logging init: file under the XDG state dir, or stderr when unavailable.
//!
//! Operator-facing notices (progress lines, "already downloaded") go to
//! stdout via `println!`; everything structured goes through `tracing` into
//! `~/.local/state/rti/rti.log`.

use anyhow::Result;
use std::fs;
use std::io;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,rti_core=debug,rti_cli=debug";

/// Initialize logging. Prefers the state-dir log file; if that directory
/// cannot be created or opened, logs to stderr instead of failing the CLI.
pub fn init() {
    if let Err(e) = try_init_file() {
        init_stderr();
        tracing::warn!("file logging unavailable ({e:#}); logging to stderr");
    }
}

fn try_init_file() -> Result<()> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rti")?;
    let log_dir = xdg_dirs.get_state_home().join("rti");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("rti.log");

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Each log line gets its own cloned handle; if cloning ever fails the
    // line falls through to stderr rather than being dropped.
    struct FileMakeWriter(fs::File);

    enum Sink {
        File(fs::File),
        Stderr,
    }

    impl io::Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            match self {
                Sink::File(f) => f.write(buf),
                Sink::Stderr => io::stderr().lock().write(buf),
            }
        }

        fn flush(&mut self) -> io::Result<()> {
            match self {
                Sink::File(f) => f.flush(),
                Sink::Stderr => io::stderr().lock().flush(),
            }
        }
    }

    impl<'a> MakeWriter<'a> for FileMakeWriter {
        type Writer = Sink;

        fn make_writer(&'a self) -> Self::Writer {
            self.0
                .try_clone()
                .map(Sink::File)
                .unwrap_or(Sink::Stderr)
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(FileMakeWriter(file)))
        .with_ansi(false)
        .init();

    tracing::info!("rti logging initialized at {}", log_path.display());
    Ok(())
}

fn init_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
