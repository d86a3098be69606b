//! Formatting functions for progress output.
//!
//! Progress is a linear log: a status line before each phase, counts after
//! discovery, one line per mirrored version.

use console::style;

use crate::domain::Version;
use crate::notice::SyncNotice;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print a version count under the preceding status line.
pub fn display_count(count: usize) {
    println!("  Total versions: {}", style(count).bold());
}

/// Display a non-fatal notice.
pub fn display_notice(notice: &SyncNotice) {
    eprintln!("{} {}", style("⚠").yellow(), notice);
}

/// Display the versions a dry run would mirror.
///
/// # Arguments
/// * `tags` - Target tag names in mirroring order
pub fn display_plan(tags: &[String]) {
    if tags.is_empty() {
        println!("\n{}", style("Nothing would be mirrored").bold());
        return;
    }

    println!("\n{}", style("Would mirror:").bold());
    for (i, tag) in tags.iter().enumerate() {
        println!("  {}. {}", i + 1, style(tag).green());
    }
}

/// Render a version list for log lines, e.g. `1.3.0, 1.4.0-RC1`.
pub fn format_versions(versions: &[Version]) -> String {
    versions
        .iter()
        .map(Version::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
