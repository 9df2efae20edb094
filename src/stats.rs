use crate::grouping::GroupedEntry;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Other,
}

/// Error/warning classification of an entry. Structured entries are judged
/// by their level; everything else by what its main line mentions.
pub fn severity_of(entry: &GroupedEntry) -> Severity {
    match entry.level() {
        Some("ERROR" | "FATAL") => Severity::Error,
        Some("WARN" | "WARNING") => Severity::Warning,
        Some(_) => Severity::Other,
        None => {
            let lower = entry.main_line.to_lowercase();
            if lower.contains("error") {
                Severity::Error
            } else if lower.contains("warn") {
                Severity::Warning
            } else {
                Severity::Other
            }
        }
    }
}

/// Running counters over every entry ingested for the open resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub level_counts: HashMap<String, usize>,
    pub multi_line_entries: usize,
}

impl LogStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: &GroupedEntry) {
        self.total += 1;

        match severity_of(entry) {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Other => {}
        }

        if let Some(level) = entry.level() {
            *self.level_counts.entry(level.to_string()).or_insert(0) += 1;
        }

        if !entry.sub_lines.is_empty() {
            self.multi_line_entries += 1;
        }
    }

    /// Undo [`add_entry`](Self::add_entry) for an entry that is being regrouped.
    pub fn remove_entry(&mut self, entry: &GroupedEntry) {
        self.total = self.total.saturating_sub(1);

        match severity_of(entry) {
            Severity::Error => self.errors = self.errors.saturating_sub(1),
            Severity::Warning => self.warnings = self.warnings.saturating_sub(1),
            Severity::Other => {}
        }

        if let Some(level) = entry.level()
            && let Some(count) = self.level_counts.get_mut(level)
        {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.level_counts.remove(level);
            }
        }

        if !entry.sub_lines.is_empty() {
            self.multi_line_entries = self.multi_line_entries.saturating_sub(1);
        }
    }

    pub fn add_entries<'a>(&mut self, entries: impl IntoIterator<Item = &'a GroupedEntry>) {
        for entry in entries {
            self.add_entry(entry);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub fn format_statistics(stats: &LogStats, source: &str, use_color: bool) -> String {
    use colored::Colorize;

    let mut levels: Vec<_> = stats.level_counts.iter().collect();
    levels.sort_by(|(a_level, a_count), (b_level, b_count)| {
        b_count.cmp(a_count).then_with(|| a_level.cmp(b_level))
    });

    let mut output = String::new();

    if use_color {
        output.push_str(&format!("{} {}\n", "Statistics".bright_blue().bold(), source.dimmed()));
        output.push_str(&"═".repeat(60).bright_blue().to_string());
        output.push_str("\n\n");

        let rows = [
            ("Total Entries", stats.total.to_string().bright_green()),
            ("Errors", stats.errors.to_string().bright_red()),
            ("Warnings", stats.warnings.to_string().yellow()),
            ("Multi-line Entries", stats.multi_line_entries.to_string().bright_green()),
        ];
        for (label, value) in rows {
            output.push_str(&format!("{}: {}\n", label.bright_yellow(), value));
        }

        if !levels.is_empty() {
            output.push_str(&format!("\n{}\n", "Entries by Level".bright_yellow().bold()));
            output.push_str(&"─".repeat(30).bright_blue().to_string());
            output.push('\n');
            for (level, count) in levels {
                output.push_str(&format!(
                    "  {}: {}\n",
                    level.bright_cyan(),
                    count.to_string().bright_white()
                ));
            }
        }
    } else {
        output.push_str(&format!("Statistics {source}\n"));
        output.push_str(&"=".repeat(60));
        output.push_str("\n\n");
        output.push_str(&format!("Total Entries: {}\n", stats.total));
        output.push_str(&format!("Errors: {}\n", stats.errors));
        output.push_str(&format!("Warnings: {}\n", stats.warnings));
        output.push_str(&format!("Multi-line Entries: {}\n", stats.multi_line_entries));

        if !levels.is_empty() {
            output.push_str("\nEntries by Level\n");
            output.push_str(&"-".repeat(30));
            output.push('\n');
            for (level, count) in levels {
                output.push_str(&format!("  {level}: {count}\n"));
            }
        }
    }

    output
}
