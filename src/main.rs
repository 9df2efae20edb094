use anyhow::Result;
use clap::{Parser, ValueEnum};
use logview::{
    FileSource, LogSource, ResourceId, TailUpdate, TailingPoller, ViewerOptions, WindowController,
    expand_tilde, format_statistics,
    formatters::{entry_to_json, format_entry},
    interactive_ratatui::InteractiveViewer,
    profiling::{self, LogTarget},
    viewer::SearchFilter,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(
    name = "logview",
    version,
    about = "View growing log files with multi-line entry grouping and live tailing",
    long_about = None
)]
struct Cli {
    /// Log files to view
    #[arg(required = true, num_args = 1..)]
    files: Vec<String>,

    /// Interactive viewer (scroll back, search, live tail)
    #[arg(short = 'i', long)]
    interactive: bool,

    /// Entries per chunk: shown initially and added per backward load
    #[arg(short = 'n', long, env = "LOGVIEW_CHUNK_SIZE", default_value = "500")]
    chunk_size: usize,

    /// Milliseconds between tail polls
    #[arg(long, env = "LOGVIEW_POLL_INTERVAL_MS", default_value = "1000")]
    poll_interval: u64,

    /// Keep polling and print appended entries (starts the viewer tailing)
    #[arg(short = 'f', long)]
    follow: bool,

    /// Only show entries containing this text (case-insensitive)
    #[arg(long)]
    grep: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Print continuation lines instead of a summary
    #[arg(long)]
    expand: bool,

    /// Print entry statistics after the entries
    #[arg(long)]
    stats: bool,

    /// Write diagnostic logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write diagnostic logs as JSON lines
    #[arg(long, requires = "log_file")]
    log_json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Generate profiling report (requires --features profiling)
    #[cfg(feature = "profiling")]
    #[arg(long)]
    profile: Option<String>,

    #[cfg(not(feature = "profiling"))]
    #[arg(long, hide = true)]
    profile: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    JsonL,
}

impl Cli {
    fn options(&self) -> ViewerOptions {
        ViewerOptions {
            chunk_size: self.chunk_size.max(1),
            poll_interval: Duration::from_millis(self.poll_interval),
            follow: self.follow,
            expand: self.expand,
            initial_query: self.grep.clone(),
        }
    }

    fn log_target(&self) -> LogTarget {
        match (&self.log_file, self.interactive) {
            (Some(path), _) => LogTarget::File {
                path: path.clone(),
                json: self.log_json,
            },
            (None, true) => LogTarget::Discard,
            (None, false) => LogTarget::Stderr,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    profiling::init_tracing(cli.log_target(), cli.verbose)?;

    if cli.no_color {
        colored::control::set_override(false);
    }

    #[cfg(feature = "profiling")]
    let mut profiler = if cli.profile.is_some() {
        Some(profiling::Profiler::new()?)
    } else {
        None
    };

    #[cfg(not(feature = "profiling"))]
    if cli.profile.is_some() {
        eprintln!(
            "Warning: Profiling is not enabled. Build with --features profiling to enable profiling."
        );
    }

    let options = cli.options();
    let resources: Vec<ResourceId> = cli
        .files
        .iter()
        .map(|file| ResourceId::new(expand_tilde(file)))
        .collect();
    let source: Arc<dyn LogSource> = Arc::new(FileSource::new());

    if cli.interactive {
        let mut viewer = InteractiveViewer::new(options, source);
        return viewer.run(resources);
    }

    let printer = Printer {
        format: cli.format,
        use_color: !cli.no_color,
        expand: cli.expand,
        show_stats: cli.stats,
        filter: SearchFilter::new(cli.grep.clone().unwrap_or_default()),
        show_names: resources.len() > 1,
    };

    let mut views = Vec::with_capacity(resources.len());
    let mut failures = 0;
    for resource in resources {
        let mut controller = WindowController::new(options.chunk_size);
        match source.fetch_text(&resource) {
            Ok(text) => {
                controller.load_initial(&text);
                printer.print_initial(&resource, &controller)?;
            }
            Err(e) => {
                tracing::error!(error = %e, "initial load failed");
                eprintln!("Error: {e}");
                failures += 1;
                continue;
            }
        }
        let mut poller = TailingPoller::new(options.poll_interval);
        poller.set_enabled(options.follow);
        views.push(FollowedFile {
            resource,
            controller,
            poller,
        });
    }

    #[cfg(feature = "profiling")]
    if let Some(ref mut profiler) = profiler
        && let Some(profile_path) = &cli.profile
    {
        profiler.report(profile_path)?;
        eprintln!("Profiling report saved to {profile_path}.svg");
    }

    if options.follow && !views.is_empty() {
        follow(&printer, source.as_ref(), &mut views, options.poll_interval)?;
    }

    if failures > 0 {
        anyhow::bail!("{failures} file(s) could not be read");
    }
    Ok(())
}

struct FollowedFile {
    resource: ResourceId,
    controller: WindowController,
    poller: TailingPoller,
}

/// Print-mode output settings.
struct Printer {
    format: OutputFormat,
    use_color: bool,
    expand: bool,
    show_stats: bool,
    filter: SearchFilter,
    show_names: bool,
}

impl Printer {
    fn print_initial(&self, resource: &ResourceId, controller: &WindowController) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let first_number = controller.range().map(|r| r.start + 1).unwrap_or(1);
        let window = controller.window();
        let visible = self.filter.project(window);
        let stats = controller.store().stats();

        match self.format {
            OutputFormat::Text => {
                if self.show_names {
                    writeln!(&mut handle, "==> {resource} <==")?;
                }
                if visible.is_empty() {
                    if self.filter.is_active() {
                        writeln!(&mut handle, "No entries match \"{}\".", self.filter.term())?;
                    } else {
                        writeln!(&mut handle, "No log entries.")?;
                    }
                }
                for &index in &visible {
                    let line = format_entry(
                        &window[index],
                        first_number + index,
                        self.use_color,
                        self.expand,
                    );
                    writeln!(&mut handle, "{line}")?;
                }
                if self.show_stats {
                    writeln!(&mut handle)?;
                    write!(
                        &mut handle,
                        "{}",
                        format_statistics(stats, &resource.to_string(), self.use_color)
                    )?;
                }
            }
            OutputFormat::Json => {
                let entries: Vec<_> = visible
                    .iter()
                    .map(|&index| entry_to_json(&window[index], first_number + index))
                    .collect();
                let mut output = serde_json::json!({
                    "resource": resource.to_string(),
                    "totalEntries": controller.store().len(),
                    "entries": entries,
                });
                if self.show_stats {
                    output["stats"] = serde_json::to_value(stats)?;
                }
                serde_json::to_writer_pretty(&mut handle, &output)?;
                writeln!(&mut handle)?;
            }
            OutputFormat::JsonL => {
                for &index in &visible {
                    let mut value = entry_to_json(&window[index], first_number + index);
                    if self.show_names {
                        value["resource"] = resource.to_string().into();
                    }
                    serde_json::to_writer(&mut handle, &value)?;
                    writeln!(&mut handle)?;
                }
                if self.show_stats {
                    let metadata = serde_json::json!({
                        "_stats": {
                            "resource": resource.to_string(),
                            "stats": stats,
                        }
                    });
                    serde_json::to_writer(&mut handle, &metadata)?;
                    writeln!(&mut handle)?;
                }
            }
        }
        handle.flush()?;
        Ok(())
    }

    /// Print the last `added` window entries that pass the filter.
    fn print_appended(
        &self,
        resource: &ResourceId,
        controller: &WindowController,
        added: usize,
    ) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let first_number = controller.range().map(|r| r.start + 1).unwrap_or(1);
        let window = controller.window();
        let start = window.len().saturating_sub(added);

        for (offset, entry) in window[start..].iter().enumerate() {
            if !self.filter.matches(entry) {
                continue;
            }
            let number = first_number + start + offset;
            match self.format {
                OutputFormat::Text => {
                    let line = format_entry(entry, number, self.use_color, self.expand);
                    if self.show_names {
                        writeln!(&mut handle, "[{}] {line}", resource.display_name())?;
                    } else {
                        writeln!(&mut handle, "{line}")?;
                    }
                }
                OutputFormat::Json | OutputFormat::JsonL => {
                    let mut value = entry_to_json(entry, number);
                    value["resource"] = resource.to_string().into();
                    serde_json::to_writer(&mut handle, &value)?;
                    writeln!(&mut handle)?;
                }
            }
        }
        handle.flush()?;
        Ok(())
    }
}

/// Poll every file until interrupted, printing what gets appended.
fn follow(
    printer: &Printer,
    source: &dyn LogSource,
    views: &mut [FollowedFile],
    interval: Duration,
) -> Result<()> {
    tracing::debug!(files = views.len(), ?interval, "following");
    loop {
        for view in views.iter_mut() {
            let now = Instant::now();
            if !view.poller.is_due(now) {
                continue;
            }
            view.poller.mark_dispatched(now);

            let text = match source.fetch_text(&view.resource) {
                Ok(text) => text,
                Err(e) => {
                    view.poller.on_failed(&e);
                    continue;
                }
            };
            let known = view.controller.store().raw_line_count();
            if let TailUpdate::NewLines(lines) = view.poller.on_fetched(&text, known) {
                let added = view.controller.append_tail(&lines);
                printer.print_appended(&view.resource, &view.controller, added)?;
            }
        }
        std::thread::sleep(interval.max(Duration::from_millis(10)));
    }
}
