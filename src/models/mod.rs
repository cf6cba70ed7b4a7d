//! Shared data models for resolved dependencies.
//!
//! A [`PackageDescriptor`] names one dependency by its import path together with
//! the [`VersionSelector`] used to fetch it. Descriptors are produced by the
//! resolver, stored in the package cache and consumed by the downloader.

use std::fmt;
use std::str::FromStr;

use crate::core::VendError;

/// Which kind of revision a selector names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VersionKind {
    /// A branch; an empty selector means the default branch, i.e. latest.
    #[default]
    Branch,
    /// A tag.
    Tag,
    /// A commit hash.
    Commit,
}

impl VersionKind {
    /// The manifest spelling of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Tag => "tag",
            Self::Commit => "commit",
        }
    }
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A version kind plus the revision string.
///
/// The default selector is `branch` with an empty value: whatever the default
/// branch currently points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VersionSelector {
    /// Revision kind.
    pub kind: VersionKind,
    /// Revision name; empty for latest.
    pub value: String,
}

impl VersionSelector {
    /// The default, latest-branch selector.
    #[must_use]
    pub fn latest() -> Self {
        Self::default()
    }

    /// Build a selector from parts.
    pub fn new(kind: VersionKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Whether this is the latest-branch selector.
    #[must_use]
    pub fn is_latest(&self) -> bool {
        self.kind == VersionKind::Branch && self.value.is_empty()
    }
}

impl FromStr for VersionSelector {
    type Err = String;

    /// Parses `<kind>:<value>`; the empty string is [`VersionSelector::latest`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::latest());
        }
        let (kind, value) = s.split_once(':').ok_or_else(|| format!("missing kind in '{s}'"))?;
        let kind = match kind {
            "branch" => VersionKind::Branch,
            "tag" => VersionKind::Tag,
            "commit" => VersionKind::Commit,
            other => return Err(format!("unknown version kind '{other}'")),
        };
        if value.is_empty() && kind != VersionKind::Branch {
            return Err(format!("{kind} selector needs a value"));
        }
        Ok(Self::new(kind, value))
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_latest() {
            f.write_str("latest")
        } else {
            write!(f, "{}:{}", self.kind, self.value)
        }
    }
}

/// Parse a selector declared for `import_path`, attributing failures to it.
pub fn parse_selector(import_path: &str, text: &str) -> Result<VersionSelector, VendError> {
    text.parse().map_err(|_| VendError::InvalidVersionSelector {
        import_path: import_path.to_string(),
        selector: text.to_string(),
    })
}

/// One resolved dependency.
///
/// Two descriptors with the same `import_path` are interchangeable for caching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageDescriptor {
    /// Canonical slash-separated import path.
    pub import_path: String,
    /// Revision used when the package has to be fetched.
    pub selector: VersionSelector,
    /// Resolved inside the project rather than from the install repository.
    pub is_local: bool,
}

impl PackageDescriptor {
    /// A descriptor pinned to `selector`.
    pub fn pinned(import_path: impl Into<String>, selector: VersionSelector) -> Self {
        Self {
            import_path: import_path.into(),
            selector,
            is_local: false,
        }
    }

    /// A descriptor with the latest-branch selector.
    pub fn latest(import_path: impl Into<String>) -> Self {
        Self::pinned(import_path, VersionSelector::latest())
    }

    /// Mark the descriptor as resolved inside the project.
    #[must_use]
    pub const fn local(mut self) -> Self {
        self.is_local = true;
        self
    }
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.import_path, self.selector)
    }
}
