//! Drag payload encoding for cross-list transfers
//!
//! A drag payload is a single string of the form `"<prefix><id>(,<id>)*"`.
//! The prefix is a short tag naming the source list kind, so a drop target can
//! tell a reorder of its own rows apart from a transfer out of another list.
//!
//! The codec does not validate its inputs: ids must be non-empty, must not
//! contain [`SEPARATOR`], and must not collide with the prefix's own characters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator placed between ids in an encoded payload
pub const SEPARATOR: char = ',';

/// Kinds of editable lists that exchange drag payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListKind {
    /// Workflow list
    Workflows,
    /// Workflow group list
    Groups,
    /// Command list inside a workflow
    Commands,
    /// Keyboard shortcut list
    KeyboardShortcuts,
    /// Application trigger list
    ApplicationTriggers,
}

impl ListKind {
    /// Returns the default payload prefix for this kind.
    #[must_use]
    pub const fn default_prefix(self) -> &'static str {
        match self {
            Self::Workflows => "WF|",
            Self::Groups => "WG|",
            Self::Commands => "WC|",
            Self::KeyboardShortcuts => "WK|",
            Self::ApplicationTriggers => "WA|",
        }
    }

    /// Returns the kebab-case name used in settings files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workflows => "workflows",
            Self::Groups => "groups",
            Self::Commands => "commands",
            Self::KeyboardShortcuts => "keyboard-shortcuts",
            Self::ApplicationTriggers => "application-triggers",
        }
    }

    /// Returns all list kinds.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Workflows,
            Self::Groups,
            Self::Commands,
            Self::KeyboardShortcuts,
            Self::ApplicationTriggers,
        ]
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| format!("unknown list kind: {s}"))
    }
}

/// Encodes ids behind a prefix: `prefix + join(ids, ",")`.
#[must_use]
pub fn encode<S: AsRef<str>>(prefix: &str, ids: &[S]) -> String {
    let mut out = String::with_capacity(
        prefix.len() + ids.iter().map(|id| id.as_ref().len() + 1).sum::<usize>(),
    );
    out.push_str(prefix);
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(id.as_ref());
    }
    out
}

/// Decodes a payload produced by [`encode`].
///
/// Returns `None` unless `payload` starts with `expected_prefix`. Empty tokens
/// are dropped; order is preserved.
#[must_use]
pub fn decode(payload: &str, expected_prefix: &str) -> Option<Vec<String>> {
    let rest = payload.strip_prefix(expected_prefix)?;
    Some(
        rest.split(SEPARATOR)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}

/// A decoded drag payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    /// Tag identifying the source list
    pub prefix: String,
    /// Dragged ids in source order
    pub ids: Vec<String>,
}

impl DragPayload {
    /// Creates a payload from a prefix and ids.
    #[must_use]
    pub fn new(prefix: impl Into<String>, ids: Vec<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ids,
        }
    }

    /// Encodes the payload into its wire string.
    #[must_use]
    pub fn encode(&self) -> String {
        encode(&self.prefix, &self.ids)
    }

    /// Decodes a wire string against one expected prefix.
    #[must_use]
    pub fn decode(payload: &str, expected_prefix: &str) -> Option<Self> {
        decode(payload, expected_prefix).map(|ids| Self::new(expected_prefix, ids))
    }

    /// Decodes a wire string against the first matching prefix in `prefixes`.
    ///
    /// Longer prefixes are tried first so that a tag which is a prefix of
    /// another tag cannot shadow it.
    #[must_use]
    pub fn decode_any<'a, I>(payload: &str, prefixes: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut candidates: Vec<&str> = prefixes.into_iter().collect();
        candidates.sort_by_key(|p| std::cmp::Reverse(p.len()));
        candidates
            .into_iter()
            .find_map(|prefix| Self::decode(payload, prefix))
    }

    /// Returns true if the payload carries no ids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl fmt::Display for DragPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
