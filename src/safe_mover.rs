/// Collision-safe file moves.
///
/// A move never replaces an existing destination. The primitive,
/// [`move_no_clobber`], reports an occupied destination as
/// [`MoveError::DestinationOccupied`]; [`SafeMover`] reacts by picking the
/// first free `name_N.ext` variant and retrying the move once against it.
use crate::sink::EventSink;
use filetime::FileTime;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result of attempting to move one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file now lives at the requested destination.
    Moved(PathBuf),
    /// The requested destination was taken; the file lives at this variant.
    MovedRenamed(PathBuf),
    /// The file was left at its original location.
    Failed(String),
}

impl MoveOutcome {
    /// Where the file ended up, if it moved.
    pub fn final_path(&self) -> Option<&Path> {
        match self {
            Self::Moved(path) | Self::MovedRenamed(path) => Some(path),
            Self::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Error kinds of the no-clobber move primitive.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Something already exists at the destination path.
    #[error("destination already exists: {}", .0.display())]
    DestinationOccupied(PathBuf),
    /// Any other failure. The source is untouched.
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Returns true if anything, including a dangling symlink, sits at `path`.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Moves `src` to `dst`, refusing to replace an existing `dst`.
///
/// The destination is created exclusively: a hard link on the same volume,
/// otherwise a `create_new` copy. The source is removed only after the
/// destination is complete, and a half-done move is rolled back, so the file
/// is always at exactly one of the two paths afterwards.
pub fn move_no_clobber(src: &Path, dst: &Path) -> Result<(), MoveError> {
    if is_occupied(dst) {
        return Err(MoveError::DestinationOccupied(dst.to_path_buf()));
    }

    match fs::hard_link(src, dst) {
        Ok(()) => finish_move(src, dst),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(MoveError::DestinationOccupied(dst.to_path_buf()))
        }
        // Cross-device or no hard-link support on this filesystem
        Err(_) => copy_no_clobber(src, dst),
    }
}

/// Copies `src` into a freshly created `dst`, then removes `src`.
///
/// The copy keeps the source's permissions and access/modification times.
fn copy_no_clobber(src: &Path, dst: &Path) -> Result<(), MoveError> {
    let io_error = |source: io::Error| MoveError::Io {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    };

    let mut reader = File::open(src).map_err(io_error)?;
    let mut writer = match OpenOptions::new().write(true).create_new(true).open(dst) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(MoveError::DestinationOccupied(dst.to_path_buf()));
        }
        Err(e) => return Err(io_error(e)),
    };

    let copied = io::copy(&mut reader, &mut writer)
        .and_then(|_| writer.sync_all())
        .and_then(|_| reader.metadata())
        .and_then(|meta| {
            filetime::set_file_handle_times(
                &writer,
                Some(FileTime::from_last_access_time(&meta)),
                Some(FileTime::from_last_modification_time(&meta)),
            )?;
            fs::set_permissions(dst, meta.permissions())
        });
    drop(writer);

    if let Err(e) = copied {
        let _ = fs::remove_file(dst);
        return Err(io_error(e));
    }
    finish_move(src, dst)
}

/// Removes the source once `dst` holds the content; undoes `dst` on failure.
fn finish_move(src: &Path, dst: &Path) -> Result<(), MoveError> {
    fs::remove_file(src).map_err(|source| {
        let _ = fs::remove_file(dst);
        MoveError::Io {
            from: src.to_path_buf(),
            to: dst.to_path_buf(),
            source,
        }
    })
}

/// First free path among `name_1.ext`, `name_2.ext`, ... next to `dst`.
///
/// Every candidate is checked against the filesystem as it is now.
///
/// # Examples
///
/// ```no_run
/// use mediatidy::safe_mover::unique_destination;
/// use std::path::Path;
///
/// // With photos/a.jpg taken, this yields photos/a_1.jpg
/// let free = unique_destination(Path::new("photos/a.jpg"));
/// ```
pub fn unique_destination(dst: &Path) -> PathBuf {
    let parent = dst.parent().unwrap_or_else(|| Path::new(""));
    let stem = dst.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
    let ext = dst.extension();

    let mut n: u64 = 1;
    loop {
        let mut name = stem.clone();
        name.push(format!("_{n}"));
        if let Some(ext) = ext {
            name.push(".");
            name.push(ext);
        }
        let candidate = parent.join(name);
        if !is_occupied(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Moves files one at a time and reports each outcome to a sink.
pub struct SafeMover<'a> {
    sink: &'a dyn EventSink,
}

impl<'a> SafeMover<'a> {
    pub fn new(sink: &'a dyn EventSink) -> Self {
        Self { sink }
    }

    /// Moves `src` to `dst` without overwriting anything.
    ///
    /// On a collision the first free numbered variant of `dst` is used and
    /// the move is retried once. Any other failure leaves `src` in place.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mediatidy::safe_mover::{MoveOutcome, SafeMover};
    /// use mediatidy::sink::TracingSink;
    /// use std::path::Path;
    ///
    /// let mover = SafeMover::new(&TracingSink);
    /// match mover.move_file(Path::new("a.png"), Path::new("ext/a.png")) {
    ///     MoveOutcome::Moved(p) | MoveOutcome::MovedRenamed(p) => println!("{}", p.display()),
    ///     MoveOutcome::Failed(reason) => eprintln!("{reason}"),
    /// }
    /// ```
    pub fn move_file(&self, src: &Path, dst: &Path) -> MoveOutcome {
        match move_no_clobber(src, dst) {
            Ok(()) => {
                self.sink
                    .info(&format!("Moved: {} → {}", display_name(src), dst.display()));
                MoveOutcome::Moved(dst.to_path_buf())
            }
            Err(MoveError::DestinationOccupied(_)) => {
                let renamed = unique_destination(dst);
                match move_no_clobber(src, &renamed) {
                    Ok(()) => {
                        self.sink.warn(&format!(
                            "File already exists. Renamed and moved to: {}",
                            renamed.display()
                        ));
                        MoveOutcome::MovedRenamed(renamed)
                    }
                    Err(e) => {
                        self.sink
                            .error(&format!("Failed to move after renaming: {}", e));
                        MoveOutcome::Failed(e.to_string())
                    }
                }
            }
            Err(e) => {
                self.sink.error(&format!(
                    "Failed to move {} → {}: {}",
                    src.display(),
                    dst.display(),
                    e
                ));
                MoveOutcome::Failed(e.to_string())
            }
        }
    }

    /// Reports where `src` would land without touching the filesystem.
    pub fn preview(&self, src: &Path, dst: &Path) -> MoveOutcome {
        if is_occupied(dst) {
            let renamed = unique_destination(dst);
            self.sink.info(&format!(
                "Would move: {} → {} (renamed, {} exists)",
                display_name(src),
                renamed.display(),
                dst.display()
            ));
            MoveOutcome::MovedRenamed(renamed)
        } else {
            self.sink
                .info(&format!("Would move: {} → {}", display_name(src), dst.display()));
            MoveOutcome::Moved(dst.to_path_buf())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Level, RecordingSink};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_move_to_free_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let src = temp_dir.path().join("a.png");
        let dst_dir = temp_dir.path().join("ext");
        fs::create_dir(&dst_dir).unwrap();
        fs::write(&src, "pixels").unwrap();

        let sink = RecordingSink::new();
        let outcome = SafeMover::new(&sink).move_file(&src, &dst_dir.join("a.png"));

        assert_eq!(outcome, MoveOutcome::Moved(dst_dir.join("a.png")));
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(dst_dir.join("a.png")).unwrap(), "pixels");
        assert_eq!(sink.messages(Level::Info).len(), 1);
        assert!(sink.messages(Level::Warn).is_empty());
    }

    #[test]
    fn test_collision_renames_and_keeps_existing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("ext")).unwrap();
        fs::write(base.join("ext/a.png"), "old").unwrap();
        fs::write(base.join("a.png"), "new").unwrap();

        let sink = RecordingSink::new();
        let outcome = SafeMover::new(&sink).move_file(&base.join("a.png"), &base.join("ext/a.png"));

        assert_eq!(outcome, MoveOutcome::MovedRenamed(base.join("ext/a_1.png")));
        assert_eq!(fs::read_to_string(base.join("ext/a.png")).unwrap(), "old");
        assert_eq!(fs::read_to_string(base.join("ext/a_1.png")).unwrap(), "new");
        assert!(!base.join("a.png").exists());
        let warnings = sink.messages(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("a_1.png"));
    }

    #[test]
    fn test_nth_collision_lands_at_suffix_n() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("dst")).unwrap();
        fs::write(base.join("dst/clip.mov"), "0").unwrap();
        fs::write(base.join("dst/clip_1.mov"), "1").unwrap();
        fs::write(base.join("dst/clip_2.mov"), "2").unwrap();
        fs::write(base.join("clip.mov"), "3").unwrap();

        let sink = RecordingSink::new();
        let outcome =
            SafeMover::new(&sink).move_file(&base.join("clip.mov"), &base.join("dst/clip.mov"));

        assert_eq!(outcome, MoveOutcome::MovedRenamed(base.join("dst/clip_3.mov")));
        assert_eq!(fs::read_to_string(base.join("dst/clip_3.mov")).unwrap(), "3");
    }

    #[test]
    fn test_unique_destination_preserves_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("archive.tar.jpg"), "").unwrap();
        fs::write(base.join(".hidden"), "").unwrap();

        assert_eq!(
            unique_destination(&base.join("archive.tar.jpg")),
            base.join("archive.tar_1.jpg")
        );
        assert_eq!(unique_destination(&base.join(".hidden")), base.join(".hidden_1"));
    }

    #[test]
    fn test_primitive_reports_occupied_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("src.jpg"), "a").unwrap();
        fs::write(base.join("dst.jpg"), "b").unwrap();

        let result = move_no_clobber(&base.join("src.jpg"), &base.join("dst.jpg"));
        assert!(matches!(result, Err(MoveError::DestinationOccupied(_))));
        assert_eq!(fs::read_to_string(base.join("src.jpg")).unwrap(), "a");
        assert_eq!(fs::read_to_string(base.join("dst.jpg")).unwrap(), "b");
    }

    #[test]
    fn test_directory_at_destination_is_a_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir_all(base.join("out/a.png")).unwrap();
        fs::write(base.join("a.png"), "x").unwrap();

        let sink = RecordingSink::new();
        let outcome = SafeMover::new(&sink).move_file(&base.join("a.png"), &base.join("out/a.png"));
        assert_eq!(outcome, MoveOutcome::MovedRenamed(base.join("out/a_1.png")));
    }

    #[test]
    fn test_copy_fallback_moves_content() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.mov"), "frames").unwrap();

        copy_no_clobber(&base.join("a.mov"), &base.join("b.mov")).unwrap();
        assert!(!base.join("a.mov").exists());
        assert_eq!(fs::read_to_string(base.join("b.mov")).unwrap(), "frames");
    }

    #[test]
    fn test_copy_fallback_keeps_modification_time() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("old.jpg"), "pixels").unwrap();
        let taken = FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(base.join("old.jpg"), taken).unwrap();

        copy_no_clobber(&base.join("old.jpg"), &base.join("copy.jpg")).unwrap();

        let meta = fs::metadata(base.join("copy.jpg")).unwrap();
        assert_eq!(
            FileTime::from_last_modification_time(&meta).unix_seconds(),
            1_000_000_000
        );
    }

    #[test]
    fn test_copy_fallback_refuses_existing_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.mov"), "new").unwrap();
        fs::write(base.join("b.mov"), "old").unwrap();

        let result = copy_no_clobber(&base.join("a.mov"), &base.join("b.mov"));
        assert!(matches!(result, Err(MoveError::DestinationOccupied(_))));
        assert_eq!(fs::read_to_string(base.join("a.mov")).unwrap(), "new");
        assert_eq!(fs::read_to_string(base.join("b.mov")).unwrap(), "old");
    }

    #[test]
    fn test_missing_source_fails_without_side_effects() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let sink = RecordingSink::new();
        let outcome = SafeMover::new(&sink).move_file(&base.join("gone.png"), &base.join("x.png"));

        assert!(outcome.is_failure());
        assert!(outcome.final_path().is_none());
        assert!(!base.join("x.png").exists());
        assert_eq!(sink.messages(Level::Error).len(), 1);
    }

    #[test]
    fn test_preview_does_not_touch_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.png"), "new").unwrap();
        fs::write(base.join("b.png"), "old").unwrap();

        let sink = RecordingSink::new();
        let mover = SafeMover::new(&sink);
        assert_eq!(
            mover.preview(&base.join("a.png"), &base.join("b.png")),
            MoveOutcome::MovedRenamed(base.join("b_1.png"))
        );
        assert_eq!(
            mover.preview(&base.join("a.png"), &base.join("c.png")),
            MoveOutcome::Moved(base.join("c.png"))
        );
        assert!(base.join("a.png").exists());
        assert!(!base.join("b_1.png").exists());
    }
}
