//! Terminal rendering for the gallery shell.
//!
//! This module provides colored status lines, the result grid table, the
//! detail overlay box, and the loading spinner.

use comfy_table::{presets, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::gallery::{Phase, SearchState};
use crate::models::{ImageRecord, SelectedImage};

/// Get the current terminal width.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(100)
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Search => "🔍",
        Status::Image => "🖼",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Search,
    Image,
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Error => println!("{} {}", icon.red().bold(), msg),
        Status::Warning => println!("{} {}", icon.yellow().bold(), msg),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
        Status::Search => println!("{} {}", icon.yellow(), msg),
        Status::Image => println!("{} {}", icon.magenta(), msg),
    }
}

/// Welcome banner for the interactive shell.
pub fn print_banner(source_name: &str) {
    let version = env!("CARGO_PKG_VERSION");

    println!();
    println!(
        "{} {} {}",
        "🖼  Unsplash Gallery".bold().cyan(),
        format!("v{}", version).dimmed(),
        format!("({})", source_name).dimmed()
    );
    println!(
        "{}",
        "Type a search, `more` for the next page, `open <n>` to view a photo, `help` for commands."
            .dimmed()
    );
    println!();
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Build the numbered thumbnail grid.
///
/// Rows are numbered from 1 so `open <n>` matches what is shown.
pub fn results_table(results: &[ImageRecord], width: usize) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width.clamp(40, u16::MAX as usize) as u16)
        .set_header(vec!["#", "ID", "Description", "Thumbnail"]);

    let description_width = (width / 3).max(20);
    for (index, record) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&record.id),
            Cell::new(truncate_with_ellipsis(record.description(), description_width)),
            Cell::new(&record.thumbnail_url),
        ]);
    }

    table
}

/// Render the whole gallery view: error banner, grid and load-more hint.
pub fn print_gallery(state: &SearchState) {
    if state.error {
        print_error_banner();
    }

    if state.results.is_empty() {
        if state.phase() == Phase::Loaded {
            print_status(Status::Info, &format!("No photos found for \"{}\"", state.query));
        }
    } else {
        println!("{}", results_table(&state.results, terminal_width()));
    }

    if state.can_load_more() {
        print_load_more_hint(state.page, state.total_pages);
    }
}

/// Print the error banner shown while the error flag is set.
pub fn print_error_banner() {
    println!(
        "{} {}",
        status_icon(Status::Error).red().bold(),
        "Something went wrong while loading images. Search again to retry.".red()
    );
}

/// Print the load-more affordance.
pub fn print_load_more_hint(page: u32, total_pages: u32) {
    println!(
        "{} page {} of {}, type {} to load the next page",
        "»".cyan().bold(),
        page.to_string().yellow(),
        total_pages.to_string().yellow(),
        "more".green().bold()
    );
}

/// Print the current phase and pagination cursor.
pub fn print_state_summary(state: &SearchState) {
    let phase = match state.phase() {
        Phase::Idle => "idle".dimmed().to_string(),
        Phase::Loading => "loading".cyan().to_string(),
        Phase::Loaded => "loaded".green().to_string(),
        Phase::Failed => "failed".red().to_string(),
    };
    let query = if state.query.is_empty() {
        "(none)".to_string()
    } else {
        format!("\"{}\"", state.query)
    };

    println!("  Query:   {}", query.bold());
    println!("  Status:  {}", phase);
    println!("  Page:    {} of {}", state.page, state.total_pages);
    println!("  Photos:  {}", format_number(state.results.len() as u64));
}

/// Print the detail overlay for a selected photo.
pub fn print_detail_overlay(image: &SelectedImage) {
    let width = terminal_width().clamp(40, 100) - 4;
    let alt = image.alt_text.as_deref().unwrap_or("(no description)");

    println!();
    println!("┌{}┐", "─".repeat(width + 2));
    println!(
        "│ {} {}",
        status_icon(Status::Image).magenta(),
        truncate_with_ellipsis(alt, width.saturating_sub(3)).bold()
    );
    println!("├{}┤", "─".repeat(width + 2));
    println!("│  ID:        {}", image.id.dimmed());
    println!("│  Image:     {}", image.full_url.blue().underline());
    println!(
        "│  Downloads: {}",
        format_number(image.download_count).yellow()
    );
    println!(
        "│  Views:     {}",
        format_number(image.view_count).yellow()
    );
    println!("└{}┘", "─".repeat(width + 2));
    println!("{}", "Type `close` to return to the gallery.".dimmed());
}

/// Print the interactive command reference.
pub fn print_help() {
    print_section("Commands");
    let commands = [
        ("search <terms>", "start a new search (bare text works too)"),
        ("more", "load the next page of results"),
        ("open <n>", "show photo n in the detail view"),
        ("close", "close the detail view"),
        ("list", "show the current results again"),
        ("status", "show query, page and loading state"),
        ("help", "show this help"),
        ("quit", "leave the gallery"),
    ];
    for (command, description) in commands {
        println!("  {:<16} {}", command.green(), description);
    }
    println!();
}

/// Print a loading spinner with message.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        if let Ok(style) =
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
        {
            pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner that draws nothing, for non-interactive output.
    pub fn hidden() -> Self {
        Self {
            pb: indicatif::ProgressBar::hidden(),
        }
    }

    /// Set the message.
    pub fn set_message(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    /// Finish and remove the spinner line.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

/// Format a number with commas.
pub fn format_number(n: u64) -> String {
    n.to_string()
        .chars()
        .rev()
        .collect::<Vec<_>>()
        .chunks(3)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
        .chars()
        .rev()
        .collect()
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }

    let char_widths: Vec<(char, usize)> = text
        .chars()
        .map(|c| (c, unicode_width::UnicodeWidthChar::width(c).unwrap_or(1)))
        .collect();

    let total_width: usize = char_widths.iter().map(|(_, w)| *w).sum();
    if total_width <= max_width {
        return text.to_string();
    }

    let mut current_width = 0;
    let mut end_idx = 0;
    for (i, (_, w)) in char_widths.iter().enumerate() {
        if current_width + w > max_width - 3 {
            break;
        }
        current_width += w;
        end_idx = i + 1;
    }

    let truncated: String = char_widths[..end_idx].iter().map(|(c, _)| *c).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::make_image;

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Error), "✗");
        assert_eq!(status_icon(Status::Search), "🔍");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Hello", 10), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Hello", 3), "...");
        // Wide characters count double
        assert_eq!(truncate_with_ellipsis("日本語の写真", 7), "日本...");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1000000), "1,000,000");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(5_000_000_000), "5,000,000,000");
    }

    #[test]
    fn test_results_table_numbers_rows_from_one() {
        let results = vec![make_image("first"), make_image("second")];
        let rendered = results_table(&results, 120).to_string();

        assert!(rendered.contains("first"));
        assert!(rendered.contains("second"));
        assert!(rendered.contains("photo first"));
        assert!(rendered.lines().any(|line| line.contains(" 1 ") && line.contains("first")));
        assert!(rendered.lines().any(|line| line.contains(" 2 ") && line.contains("second")));
    }
}
