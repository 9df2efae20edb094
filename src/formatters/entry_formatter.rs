use crate::grouping::GroupedEntry;
use colored::{ColoredString, Colorize};

/// Width of the entry number column in text output
const NUMBER_WIDTH: usize = 6;

/// Color a level token the way the viewer does.
pub fn level_colored(level: &str) -> ColoredString {
    match level {
        "FATAL" => level.red().bold(),
        "ERROR" => level.red(),
        "WARN" | "WARNING" => level.yellow(),
        "INFO" => level.blue(),
        "DEBUG" | "TRACE" => level.bright_black(),
        _ => level.normal(),
    }
}

fn colored_main_line(entry: &GroupedEntry) -> String {
    let (Some(level), Some(span)) = (entry.level(), entry.level_span()) else {
        return entry.main_line.clone();
    };
    let (start, end) = (span.start, span.end);
    let rest = &entry.main_line[end..];
    let rest = match level {
        "ERROR" | "FATAL" => rest.red().to_string(),
        _ => rest.to_string(),
    };
    format!(
        "{}{}{}",
        entry.main_line[..start].dimmed(),
        level_colored(level).bold(),
        rest
    )
}

/// Format one entry for terminal output, prefixed by its 1-based number in
/// the whole log. Continuation lines are printed when `expand` is set and
/// summarized otherwise.
pub fn format_entry(entry: &GroupedEntry, number: usize, use_color: bool, expand: bool) -> String {
    let indent = " ".repeat(NUMBER_WIDTH + 2);
    let mut output = if use_color {
        format!(
            "{}  {}",
            format!("{number:>width$}", width = NUMBER_WIDTH).dimmed(),
            colored_main_line(entry)
        )
    } else {
        format!("{number:>width$}  {}", entry.main_line, width = NUMBER_WIDTH)
    };

    if entry.sub_lines.is_empty() {
        return output;
    }

    if expand {
        for sub in &entry.sub_lines {
            output.push('\n');
            output.push_str(&indent);
            if use_color {
                output.push_str(&sub.dimmed().to_string());
            } else {
                output.push_str(sub);
            }
        }
    } else {
        let count = entry.sub_lines.len();
        let noun = if count == 1 { "line" } else { "lines" };
        let summary = format!("▸ {count} more {noun}");
        output.push('\n');
        output.push_str(&indent);
        if use_color {
            output.push_str(&summary.dimmed().italic().to_string());
        } else {
            output.push_str(&summary);
        }
    }
    output
}

/// JSON form of an entry with its 1-based number in the whole log.
pub fn entry_to_json(entry: &GroupedEntry, number: usize) -> serde_json::Value {
    let mut value = serde_json::to_value(entry).unwrap_or(serde_json::Value::Null);
    if let serde_json::Value::Object(map) = &mut value {
        map.insert("line".to_string(), serde_json::Value::from(number));
    }
    value
}
