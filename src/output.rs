//! Terminal output for run summaries.
//!
//! Per-file events go through the tracing subscriber; this module prints the
//! human-facing parts around them: the header, the dry-run notice and the
//! closing summary table.

use crate::organizer::RunReport;
use colored::*;

/// Prints run headers and summaries with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Renders the summary table as plain text, one line per row.
    ///
    /// # Example
    ///
    /// ```
    /// use mediatidy::organizer::RunReport;
    /// use mediatidy::output::OutputFormatter;
    ///
    /// let rows = OutputFormatter::summary_rows(&RunReport::default());
    /// assert_eq!(rows.last().unwrap().trim_end(), "Total    | 0 moved, 0 renamed, 0 failed");
    /// ```
    pub fn summary_rows(report: &RunReport) -> Vec<String> {
        let width = report
            .folders
            .keys()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Folder" plus padding

        let mut rows = vec![
            format!("{:<width$} | {}", "Folder", "Files", width = width),
            "-".repeat(width + 30),
        ];
        for (folder, tally) in &report.folders {
            rows.push(format!(
                "{:<width$} | {} moved, {} renamed, {} failed",
                folder,
                tally.moved,
                tally.renamed,
                tally.failed,
                width = width
            ));
        }
        rows.push("-".repeat(width + 30));
        rows.push(format!(
            "{:<width$} | {} moved, {} renamed, {} failed",
            "Total",
            report.moved(),
            report.renamed(),
            report.failed(),
            width = width
        ));
        rows
    }

    /// Prints the summary table and a closing status line.
    pub fn summary_table(report: &RunReport) {
        Self::header(if report.dry_run {
            "DRY RUN SUMMARY"
        } else {
            "SUMMARY"
        });

        let rows = Self::summary_rows(report);
        let last = rows.len() - 1;
        for (i, row) in rows.iter().enumerate() {
            if i == 0 || i == last {
                println!("{}", row.bold());
            } else {
                println!("{}", row);
            }
        }

        for (ext, reason) in &report.skipped_rules {
            Self::warning(&format!("Skipped .{} files: {}", ext, reason));
        }

        if report.dry_run {
            Self::dry_run_notice("No files were modified.");
        } else if report.is_complete_success() {
            Self::success("Organization complete!");
        } else {
            Self::error("Some files could not be organized. Please review errors above.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organizer::FolderTally;

    #[test]
    fn test_summary_rows_list_each_folder() {
        let mut report = RunReport::default();
        report.folders.insert(
            "Vacation".to_string(),
            FolderTally {
                moved: 2,
                renamed: 1,
                failed: 0,
            },
        );
        report.folders.insert(
            "ext".to_string(),
            FolderTally {
                moved: 3,
                renamed: 0,
                failed: 1,
            },
        );

        let rows = OutputFormatter::summary_rows(&report);
        assert_eq!(rows.len(), 6);
        assert!(rows[2].starts_with("Vacation | 2 moved, 1 renamed, 0 failed"));
        assert!(rows[3].starts_with("ext      | 3 moved, 0 renamed, 1 failed"));
        assert!(rows[5].starts_with("Total    | 5 moved, 1 renamed, 1 failed"));
    }
}
