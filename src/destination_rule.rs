//! Destination rules mapping file extensions to folder-naming strategies.
//!
//! A rule matches a file by a case-insensitive extension suffix and decides
//! the name of the subfolder the file belongs in: either one fixed folder for
//! every match, or a folder named after the part of the file name before its
//! first space.
//!
//! # Examples
//!
//! ```
//! use mediatidy::destination_rule::DestinationRule;
//!
//! let rule = DestinationRule::prefix("jpg");
//! let base = rule.match_name("Vacation Photo.JPG").unwrap();
//! assert_eq!(rule.folder_name(base).as_deref(), Some("Vacation"));
//! ```

/// Appended to a prefix folder name when a plain file already holds that name.
pub const FOLDER_MARKER: &str = "_folder";

/// How a rule names the destination folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderStrategy {
    /// Every matching file goes into this one folder.
    Fixed(String),
    /// The folder is the base name up to its first space.
    Prefix,
}

/// Maps one extension (stored lowercase, without the dot) to a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRule {
    extension: String,
    strategy: FolderStrategy,
}

impl DestinationRule {
    /// Creates a rule sending every `extension` file into `folder`.
    pub fn fixed(extension: &str, folder: &str) -> Self {
        Self {
            extension: normalize_extension(extension),
            strategy: FolderStrategy::Fixed(folder.to_string()),
        }
    }

    /// Creates a rule grouping `extension` files by their name prefix.
    pub fn prefix(extension: &str) -> Self {
        Self {
            extension: normalize_extension(extension),
            strategy: FolderStrategy::Prefix,
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn strategy(&self) -> &FolderStrategy {
        &self.strategy
    }

    /// Returns the base name (file name minus `.ext`) if the name matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediatidy::destination_rule::DestinationRule;
    ///
    /// let rule = DestinationRule::fixed("png", "ext");
    /// assert_eq!(rule.match_name("a.PNG"), Some("a"));
    /// assert_eq!(rule.match_name("notes.txt"), None);
    /// assert_eq!(rule.match_name("png"), None);
    /// ```
    pub fn match_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        if self.extension.is_empty() {
            return None;
        }
        let suffix_len = self.extension.len() + 1;
        if file_name.len() < suffix_len {
            return None;
        }
        let split_at = file_name.len() - suffix_len;
        if !file_name.is_char_boundary(split_at) {
            return None;
        }
        let (base, tail) = file_name.split_at(split_at);
        let tail = tail.to_lowercase();
        if tail.starts_with('.') && tail[1..] == self.extension {
            Some(base)
        } else {
            None
        }
    }

    /// Computes the folder name for a matched base name.
    ///
    /// Returns `None` when a prefix rule would produce an empty folder name,
    /// e.g. for `" photo.jpg"` or `".jpg"`.
    pub fn folder_name(&self, base_name: &str) -> Option<String> {
        match &self.strategy {
            FolderStrategy::Fixed(folder) => Some(folder.clone()),
            FolderStrategy::Prefix => {
                let prefix = name_prefix(base_name);
                (!prefix.is_empty()).then(|| prefix.to_string())
            }
        }
    }
}

/// The part of `base_name` before the first space, or all of it.
pub fn name_prefix(base_name: &str) -> &str {
    base_name
        .split_once(' ')
        .map_or(base_name, |(head, _)| head)
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Ordered collection of rules, at most one per extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<DestinationRule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard table: `png` into `fixed_folder`, `jpg` and `mov` by prefix.
    pub fn standard(fixed_folder: &str) -> Self {
        Self::build("png", fixed_folder, &["jpg", "mov"])
    }

    /// Builds a table with one fixed rule followed by the prefix rules in order.
    pub fn build<S: AsRef<str>>(
        fixed_extension: &str,
        fixed_folder: &str,
        prefix_extensions: &[S],
    ) -> Self {
        let mut set = Self::new();
        set.add_rule(DestinationRule::fixed(fixed_extension, fixed_folder));
        for ext in prefix_extensions {
            set.add_rule(DestinationRule::prefix(ext.as_ref()));
        }
        set
    }

    /// Appends a rule. Returns false, leaving the set unchanged, if a rule for
    /// the same extension exists or the extension is empty.
    pub fn add_rule(&mut self, rule: DestinationRule) -> bool {
        if rule.extension.is_empty() || self.rules.iter().any(|r| r.extension == rule.extension)
        {
            return false;
        }
        self.rules.push(rule);
        true
    }

    pub fn rules(&self) -> &[DestinationRule] {
        &self.rules
    }
}
