use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "profiling")]
use pprof::{ProfilerGuard, ProfilerGuardBuilder};
#[cfg(feature = "profiling")]
use std::fs::File;

/// Where diagnostic logs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appended to; plain text or one JSON object per line.
    File { path: PathBuf, json: bool },
    /// Nothing is installed. The TUI owns the terminal.
    Discard,
}

pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "logview=debug" } else { "logview=info" }
}

pub fn init_tracing(target: LogTarget, verbose: bool) -> Result<()> {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into())
    };

    match target {
        LogTarget::Discard => {}
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter())
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
        }
        LogTarget::File { path, json } => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let writer = Mutex::new(file);
            if json {
                tracing_subscriber::registry()
                    .with(filter())
                    .with(fmt::layer().json().with_writer(writer))
                    .try_init()?;
            } else {
                tracing_subscriber::registry()
                    .with(filter())
                    .with(fmt::layer().with_ansi(false).with_writer(writer))
                    .try_init()?;
            }
        }
    }
    Ok(())
}

#[cfg(feature = "profiling")]
pub struct Profiler {
    guard: Option<ProfilerGuard<'static>>,
}

#[cfg(feature = "profiling")]
impl Profiler {
    pub fn new() -> Result<Self> {
        let guard = ProfilerGuardBuilder::default()
            .frequency(1000)
            .blocklist(&["libc", "libgcc", "pthread", "vdso"])
            .build()?;
        Ok(Self { guard: Some(guard) })
    }

    pub fn report(&mut self, path: &str) -> Result<()> {
        if let Some(guard) = self.guard.take() {
            let report = guard.report().build()?;

            let file = File::create(format!("{path}.svg"))?;
            report.flamegraph(file)?;

            tracing::info!("Profiling report saved to {}.svg", path);
        }
        Ok(())
    }
}

#[cfg(not(feature = "profiling"))]
pub struct Profiler;

#[cfg(not(feature = "profiling"))]
impl Profiler {
    pub fn new() -> Result<Self> {
        Ok(Self)
    }

    pub fn report(&mut self, _path: &str) -> Result<()> {
        tracing::warn!("built without the `profiling` feature; no report written");
        Ok(())
    }
}
