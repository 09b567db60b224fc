use colored::Colorize;

/// Semantic level of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Print a status message to stderr, coloured by level
pub fn set_status(text: &str, level: StatusLevel) {
    let prefix = match level {
        StatusLevel::Info => "info:".blue().bold(),
        StatusLevel::Success => "ok:".green().bold(),
        StatusLevel::Warning => "warning:".yellow().bold(),
        StatusLevel::Error => "error:".red().bold(),
    };
    eprintln!("{} {}", prefix, text);
}

/// Print an error "dialog": title, message and optional details
pub fn show_error(title: &str, message: &str, details: &str) {
    eprintln!("{} {}", "error:".red().bold(), title.bold());
    eprintln!("  {}", message);
    if !details.is_empty() {
        eprintln!();
        for line in details.lines() {
            eprintln!("  {}", line.dimmed());
        }
    }
}
