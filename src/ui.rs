use console::{strip_ansi_codes, Term};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

use std::default::Default;

use crate::validation::FieldError;

/// Enhanced UI utilities
pub struct UI {
    term: Term,
}

impl UI {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Helper method to conditionally apply color based on terminal support
    fn colorize<F>(&self, text: &str, color_fn: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        if self.supports_color() {
            color_fn(text)
        } else {
            text.to_string()
        }
    }

    /// Print a success message (color only if supported)
    pub fn success(&self, message: &str) {
        let output = self.colorize(message, |m| m.green().bold().to_string());
        println!("{}", output);
    }

    /// Print an error message (color only if supported)
    pub fn error(&self, message: &str) {
        let output = self.colorize(message, |m| m.red().bold().to_string());
        eprintln!("{}", output);
    }

    /// Print a warning message (color only if supported)
    pub fn warning(&self, message: &str) {
        let output = self.colorize(message, |m| m.yellow().bold().to_string());
        println!("{}", output);
    }

    /// Print an info message (color only if supported)
    pub fn info(&self, message: &str) {
        let output = self.colorize(message, |m| m.blue().bold().to_string());
        println!("{}", output);
    }

    /// Format authentication status with appropriate color (if supported)
    pub fn format_auth_status(&self, authenticated: bool, expired: bool) -> String {
        let text = if authenticated {
            "Authenticated"
        } else if expired {
            "Token expired"
        } else {
            "Not authenticated"
        };

        if self.supports_color() {
            if authenticated {
                text.green().to_string()
            } else if expired {
                text.yellow().to_string()
            } else {
                text.red().to_string()
            }
        } else {
            text.to_string()
        }
    }

    /// Completion state of a maintenance task
    pub fn format_completion(&self, completed: bool) -> String {
        let text = if completed { "Done" } else { "Open" };
        if self.supports_color() {
            if completed {
                text.green().to_string()
            } else {
                text.yellow().to_string()
            }
        } else {
            text.to_string()
        }
    }

    /// Format user field with fallback for missing data
    pub fn format_user_field(&self, value: Option<String>) -> String {
        value
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| crate::utils::MISSING.to_string())
    }

    /// One numbered row of a list: title on the first line, detail dimmed below
    pub fn list_item(&self, index: usize, title: &str, detail: &str) {
        if self.supports_color() {
            println!("{} {}", format!("{:>3}.", index).dimmed(), title.bold());
            if !detail.is_empty() {
                println!("     {}", detail.dimmed());
            }
        } else {
            println!("{:>3}. {}", index, title);
            if !detail.is_empty() {
                println!("     {}", detail);
            }
        }
    }

    /// Print form errors, one per field
    pub fn field_errors(&self, errors: &[FieldError]) {
        for error in errors {
            let line = format!("  {}: {}", error.field, error.message);
            self.error(&line);
        }
    }

    /// "Page 2 of 5 (23 items)"
    pub fn pager(&self, page: usize, total_pages: usize, total_items: usize) {
        let text = format!(
            "Page {} of {} ({} items)",
            page,
            total_pages.max(1),
            total_items
        );
        if self.supports_color() {
            println!("{}", text.dimmed());
        } else {
            println!("{}", text);
        }
    }

    /// Print a blank line for spacing
    pub fn blank_line(&self) {
        println!();
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        let term_width = self.width();
        let title_len = title.width() + 4; // 2 spaces on each side
        let line_len = if term_width > title_len {
            (term_width - title_len) / 2
        } else {
            0
        };

        let line = "═".repeat(line_len);
        let supports_color = self.supports_color();

        println!();
        if supports_color {
            println!("{} {} {}", line.cyan(), title.cyan().bold(), line.cyan());
        } else {
            println!("{} {} {}", line, title, line);
        }
        println!();
    }

    /// Create a card-style display for information
    pub fn card(&self, title: &str, content: Vec<(&str, String)>) {
        let term_width = self.width();
        let card_width = term_width
            .saturating_sub(4) // Leave more space for terminal margins
            .clamp(50, 80); // Minimum and maximum width

        let supports_color = self.supports_color();

        // Card header
        println!("╭{}╮", "─".repeat(card_width - 2));
        let title_width = title.width();
        let title_spaces = card_width.saturating_sub(title_width + 4);
        if supports_color {
            println!("│ {} {}│", title.cyan().bold(), " ".repeat(title_spaces));
        } else {
            println!("│ {} {}│", title, " ".repeat(title_spaces));
        }
        println!("├{}┤", "─".repeat(card_width - 2));

        // Card content
        for (label, value) in content {
            // Strip ANSI codes for width calculations
            let label_plain = strip_ansi_codes(label);
            let value_plain = strip_ansi_codes(&value);

            let label_width = label_plain.width();
            let value_width = value_plain.width();
            let content_width = label_width + value_width + 4; // ": " + 2 spaces padding

            let spaces = if content_width < card_width - 1 {
                card_width - content_width - 1
            } else {
                1 // At least one space
            };

            if supports_color {
                println!("│ {}: {}{}│", label.dimmed(), value, " ".repeat(spaces));
            } else {
                println!("│ {}: {}{}│", label, value, " ".repeat(spaces));
            }
        }

        // Card footer
        println!("╰{}╯", "─".repeat(card_width - 2));
        println!();
    }

    /// Get terminal width for responsive layout
    pub fn width(&self) -> usize {
        self.term.size().1 as usize
    }

    /// Check if terminal supports color
    pub fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }

    /// Print a box with content
    pub fn box_content(&self, title: &str, lines: Vec<String>) {
        let max_line_length = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        let box_width = (max_line_length + 4).max(title.width() + 4);
        let supports_color = self.supports_color();

        println!("┌{}┐", "─".repeat(box_width - 2));
        if supports_color {
            println!(
                "│ {} {}│",
                title.cyan().bold(),
                " ".repeat(box_width - title.width() - 4)
            );
        } else {
            println!("│ {} {}│", title, " ".repeat(box_width - title.width() - 4));
        }

        if !lines.is_empty() {
            println!("├{}┤", "─".repeat(box_width - 2));
            for line in lines {
                let padding = box_width - line.width() - 4;
                println!("│ {}{} │", line, " ".repeat(padding));
            }
        }

        println!("└{}┘", "─".repeat(box_width - 2));
    }
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

/// Spinner shown while a request is in flight
pub fn create_spinner(message: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed:.dim}]")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Run `future` behind a spinner that is cleared once it settles
pub async fn with_spinner<F, T>(message: &str, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let spinner = create_spinner(message);
    let output = future.await;
    spinner.finish_and_clear();
    output
}
