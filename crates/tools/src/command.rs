//! Picking the command out of a tools-agent response.
//!
//! Small models wrap commands in prose, comments and code fences. The first
//! line that is not blank, not a `#` comment and not a fence delimiter is
//! taken as the command.

/// Select the command line to execute, if any.
pub fn extract_command(response: &str) -> Option<&str> {
    response
        .trim()
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("```"))
}
