//! mediatidy - sorts media files into subfolders without overwriting anything
//!
//! Files directly inside a target directory are matched by extension. One
//! extension goes into a single configured folder; others are grouped into
//! folders named after the part of the file name before its first space.
//! Moves never replace existing files: a taken name gets a `_N` suffix.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod destination_rule;
pub mod logging;
pub mod organizer;
pub mod output;
pub mod safe_mover;
pub mod sink;

pub use classifier::{Classification, Classifier, FileEntry, OrganizeError, PlannedMove, UnplacedFile};
pub use config::{ConfigError, MediaConfig, Settings};
pub use destination_rule::{DestinationRule, FolderStrategy, RuleSet};
pub use organizer::{Organizer, RunReport};
pub use safe_mover::{MoveError, MoveOutcome, SafeMover};
pub use sink::{EventSink, RecordingSink, TracingSink};

pub use cli::{Args, run_cli};
