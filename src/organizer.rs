//! Runs the classifier and the safe mover over every rule of a rule set.
//!
//! Rules are processed in order and files one at a time. A failing file or a
//! rule whose folder cannot be created is reported and skipped; only an
//! unreadable target directory ends the run early.
use crate::classifier::{Classifier, OrganizeError, OrganizeResult};
use crate::destination_rule::RuleSet;
use crate::safe_mover::{MoveOutcome, SafeMover};
use crate::sink::EventSink;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-folder tally of what happened in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderTally {
    pub moved: usize,
    pub renamed: usize,
    pub failed: usize,
}

/// Summary of an organization run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Every attempted move with its outcome, in processing order.
    pub outcomes: Vec<(PathBuf, MoveOutcome)>,
    /// Counts keyed by destination folder name.
    pub folders: BTreeMap<String, FolderTally>,
    /// Rules skipped entirely, with the reason.
    pub skipped_rules: Vec<(String, String)>,
    /// True if nothing was actually moved because this was a dry run.
    pub dry_run: bool,
}

impl RunReport {
    fn record(&mut self, folder: &str, source: PathBuf, outcome: MoveOutcome) {
        let tally = self.folders.entry(folder.to_string()).or_default();
        match outcome {
            MoveOutcome::Moved(_) => tally.moved += 1,
            MoveOutcome::MovedRenamed(_) => tally.renamed += 1,
            MoveOutcome::Failed(_) => tally.failed += 1,
        }
        self.outcomes.push((source, outcome));
    }

    pub fn moved(&self) -> usize {
        self.folders.values().map(|t| t.moved).sum()
    }

    pub fn renamed(&self) -> usize {
        self.folders.values().map(|t| t.renamed).sum()
    }

    pub fn failed(&self) -> usize {
        self.folders.values().map(|t| t.failed).sum()
    }

    /// Number of files processed, whatever the outcome.
    pub fn total_processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if every file moved and no rule was skipped.
    pub fn is_complete_success(&self) -> bool {
        self.failed() == 0 && self.skipped_rules.is_empty()
    }
}

/// Organizes one target directory according to a rule set.
pub struct Organizer<'a> {
    target_dir: &'a Path,
    rules: &'a RuleSet,
    sink: &'a dyn EventSink,
    dry_run: bool,
}

impl<'a> Organizer<'a> {
    pub fn new(target_dir: &'a Path, rules: &'a RuleSet, sink: &'a dyn EventSink) -> Self {
        Self {
            target_dir,
            rules,
            sink,
            dry_run: false,
        }
    }

    /// Only report what would happen.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs every rule and returns the report.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::ReadDir` if the target directory is missing or
    /// cannot be listed. Nothing is moved in that case.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mediatidy::destination_rule::RuleSet;
    /// use mediatidy::organizer::Organizer;
    /// use mediatidy::sink::TracingSink;
    /// use std::path::Path;
    ///
    /// let rules = RuleSet::standard("ext");
    /// let report = Organizer::new(Path::new("/path/to/photos"), &rules, &TracingSink)
    ///     .run()
    ///     .expect("target directory should be readable");
    /// println!("{} moved, {} failed", report.moved() + report.renamed(), report.failed());
    /// ```
    pub fn run(&self) -> OrganizeResult<RunReport> {
        // A missing target should fail before any folder is created
        if let Err(e) = fs::read_dir(self.target_dir) {
            return Err(OrganizeError::ReadDir {
                path: self.target_dir.to_path_buf(),
                source: e,
            });
        }

        let mut classifier = Classifier::new(self.target_dir, self.sink);
        if self.dry_run {
            classifier = classifier.planning_only();
        }
        let mover = SafeMover::new(self.sink);

        let mut report = RunReport {
            dry_run: self.dry_run,
            ..RunReport::default()
        };

        for rule in self.rules.rules() {
            let classified = match classifier.classify(rule) {
                Ok(classified) => classified,
                Err(e @ OrganizeError::ReadDir { .. }) => return Err(e),
                Err(e) => {
                    self.sink
                        .error(&format!("Skipping .{} files: {}", rule.extension(), e));
                    report
                        .skipped_rules
                        .push((rule.extension().to_string(), e.to_string()));
                    continue;
                }
            };

            for unplaced in classified.unplaced {
                report.record(
                    &unplaced.folder,
                    unplaced.source,
                    MoveOutcome::Failed(unplaced.reason),
                );
            }

            for mv in classified.planned {
                let outcome = if self.dry_run {
                    mover.preview(&mv.source, &mv.destination)
                } else {
                    mover.move_file(&mv.source, &mv.destination)
                };
                report.record(&mv.folder, mv.source, outcome);
            }
        }

        Ok(report)
    }
}
