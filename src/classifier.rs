//! Classification of a flat directory listing against destination rules.
//!
//! The classifier looks only at the regular files directly inside the target
//! directory. For each rule it picks the matching files, works out the folder
//! each one belongs in, makes sure that folder exists and returns the planned
//! `(source, destination)` pairs. It never moves anything itself.

use crate::destination_rule::{DestinationRule, FOLDER_MARKER, FolderStrategy};
use crate::sink::EventSink;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop a whole rule, or the whole run, from being processed.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The target directory could not be listed.
    #[error("Error reading directory {}: {source}", .path.display())]
    ReadDir { path: PathBuf, source: io::Error },
    /// A destination folder could not be created.
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateFolder { path: PathBuf, source: io::Error },
}

/// Result type for classification and organization runs.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A regular file found directly inside the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// The raw file name.
    pub name: OsString,
    /// The directory containing the file.
    pub parent: PathBuf,
}

impl FileEntry {
    pub fn path(&self) -> PathBuf {
        self.parent.join(&self.name)
    }
}

/// One file and the path it should be moved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Name of the destination folder inside the target directory.
    pub folder: String,
}

/// A matched file that has to stay where it is, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnplacedFile {
    pub source: PathBuf,
    /// Name of the folder the file was meant for.
    pub folder: String,
    pub reason: String,
}

/// What one rule does to the current listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Files ready to be moved.
    pub planned: Vec<PlannedMove>,
    /// Files whose destination folder could not be created.
    pub unplaced: Vec<UnplacedFile>,
}

/// Plans moves for the files of one target directory.
pub struct Classifier<'a> {
    target_dir: &'a Path,
    sink: &'a dyn EventSink,
    create_folders: bool,
}

impl<'a> Classifier<'a> {
    /// Creates a classifier that creates destination folders as it plans.
    pub fn new(target_dir: &'a Path, sink: &'a dyn EventSink) -> Self {
        Self {
            target_dir,
            sink,
            create_folders: true,
        }
    }

    /// Plans without creating any folder, for dry runs.
    pub fn planning_only(mut self) -> Self {
        self.create_folders = false;
        self
    }

    /// Lists the regular files of the target directory, sorted by name.
    ///
    /// Subdirectories and symlinks are not listed, so folders created by an
    /// earlier run are never descended into.
    pub fn list_files(&self) -> OrganizeResult<Vec<FileEntry>> {
        self.scan().map(|(files, _)| files)
    }

    /// Splits the listing into regular files and symlinks, both sorted.
    fn scan(&self) -> OrganizeResult<(Vec<FileEntry>, Vec<FileEntry>)> {
        let entries = fs::read_dir(self.target_dir).map_err(|e| OrganizeError::ReadDir {
            path: self.target_dir.to_path_buf(),
            source: e,
        })?;

        let mut files = Vec::new();
        let mut symlinks = Vec::new();
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let listed = FileEntry {
                name: entry.file_name(),
                parent: self.target_dir.to_path_buf(),
            };
            if file_type.is_file() {
                files.push(listed);
            } else if file_type.is_symlink() {
                symlinks.push(listed);
            }
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        symlinks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok((files, symlinks))
    }

    /// Selects the files matching `rule` and computes their destinations.
    ///
    /// An empty result is valid. For a fixed-folder rule the folder is made
    /// up front and a failure there aborts the rule. For a prefix rule a
    /// folder that cannot be created leaves the files meant for it in
    /// place; they are returned as unplaced.
    pub fn classify(&self, rule: &DestinationRule) -> OrganizeResult<Classification> {
        let (files, symlinks) = self.scan()?;

        for link in &symlinks {
            if rule.match_name(&link.name.to_string_lossy()).is_some() {
                self.sink.warn(&format!(
                    "Skipping {}: symlinks are not moved",
                    link.path().display()
                ));
            }
        }

        if let FolderStrategy::Fixed(folder) = rule.strategy() {
            self.ensure_folder(&self.target_dir.join(folder))?;
        }

        let mut result = Classification::default();
        for file in files {
            let Some(name) = file.name.to_str() else {
                let lossy = file.name.to_string_lossy();
                if rule.match_name(&lossy).is_some() {
                    self.sink.warn(&format!(
                        "Skipping {}: file name is not valid UTF-8",
                        file.path().display()
                    ));
                }
                continue;
            };
            let Some(base) = rule.match_name(name) else {
                continue;
            };
            let Some(folder) = rule.folder_name(base) else {
                self.sink.warn(&format!(
                    "Skipping {}: no folder name before the first space",
                    file.path().display()
                ));
                continue;
            };

            let folder = match rule.strategy() {
                FolderStrategy::Fixed(_) => folder,
                FolderStrategy::Prefix => {
                    let folder = self.avoid_file_clash(folder);
                    if let Err(e) = self.ensure_folder(&self.target_dir.join(&folder)) {
                        self.sink.error(&format!("{}; leaving {} in place", e, name));
                        result.unplaced.push(UnplacedFile {
                            source: file.path(),
                            folder,
                            reason: e.to_string(),
                        });
                        continue;
                    }
                    folder
                }
            };

            result.planned.push(PlannedMove {
                source: file.path(),
                destination: self.target_dir.join(&folder).join(name),
                folder,
            });
        }
        Ok(result)
    }

    /// Appends the folder marker when a non-directory already has the name.
    fn avoid_file_clash(&self, folder: String) -> String {
        let candidate = self.target_dir.join(&folder);
        match fs::metadata(&candidate) {
            Ok(meta) if !meta.is_dir() => format!("{}{}", folder, FOLDER_MARKER),
            _ => folder,
        }
    }

    fn ensure_folder(&self, path: &Path) -> OrganizeResult<()> {
        if !self.create_folders || path.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(path).map_err(|e| OrganizeError::CreateFolder {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.sink
            .info(&format!("Created folder: {}", path.display()));
        Ok(())
    }
}
