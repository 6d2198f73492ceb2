#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! Addressing for values shown by the inspector.
//!
//! Two spellings of a location are used:
//!
//! - a **display path** such as `Counter.props.items.0.label`, built by
//!   [`build_path`], which names a field in the inspector and routes edits back
//!   to the component it belongs to;
//! - a **segment list** ([`ValuePath`]) such as `["items", "0", "label"]`, which
//!   is what the diff engine records and what [`format_path`] renders as
//!   `items[0].label`.
//!
//! Paths are never checked against a schema; they are only resolved
//! structurally when an update is applied.

use core::fmt;
use core::str::FromStr;

/// The reserved section whose keys are namespaced under a literal `context.` segment.
pub const CONTEXT_SECTION: &str = "context";

/// Which part of a component's rendered inputs a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Props passed in by the parent.
    Props,
    /// The component's own state.
    State,
    /// Values read from context providers.
    Context,
}

impl Section {
    /// The name used for this section in display paths.
    pub const fn as_str(self) -> &'static str {
        match self {
            Section::Props => "props",
            Section::State => "state",
            Section::Context => CONTEXT_SECTION,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a section name isn't one of `props`, `state` or `context`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection(pub String);

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown section `{}`", self.0)
    }
}

impl core::error::Error for UnknownSection {}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "props" => Ok(Section::Props),
            "state" => Ok(Section::State),
            CONTEXT_SECTION => Ok(Section::Context),
            other => Err(UnknownSection(other.to_string())),
        }
    }
}

/// Build the display path for a field.
///
/// - With a non-empty `parent_path` the key nests under it verbatim:
///   `component.parent.key`.
/// - In the `context` section keys are namespaced as `component.context.context.key`,
///   unless the key already starts with `context.`.
/// - Everything else is `component.section.key`.
///
/// ```
/// use fiberscope_path::build_path;
///
/// assert_eq!(build_path("Counter", "props", None, "count"), "Counter.props.count");
/// assert_eq!(build_path("Counter", "context", None, "theme"), "Counter.context.context.theme");
/// assert_eq!(build_path("Counter", "props", Some("props.style"), "color"), "Counter.props.style.color");
/// ```
pub fn build_path(component: &str, section: &str, parent_path: Option<&str>, key: &str) -> String {
    if let Some(parent) = parent_path.filter(|p| !p.is_empty()) {
        return format!("{component}.{parent}.{key}");
    }

    if section == CONTEXT_SECTION && !key.starts_with("context.") {
        return format!("{component}.{section}.context.{key}");
    }

    format!("{component}.{section}.{key}")
}

/// Returns `true` when a segment is an array index (non-empty, ASCII digits only).
pub fn is_index_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Render a list of segments as one display string.
///
/// Index segments use bracket notation, everything else dot notation, and no
/// separator is written before the first segment.
///
/// ```
/// use fiberscope_path::format_path;
///
/// assert_eq!(format_path(&["a", "0", "b"]), "a[0].b");
/// assert_eq!(format_path(&["0", "name"]), "[0].name");
/// ```
pub fn format_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        let segment = segment.as_ref();
        if is_index_segment(segment) {
            out.push('[');
            out.push_str(segment);
            out.push(']');
        } else {
            if i > 0 {
                out.push('.');
            }
            out.push_str(segment);
        }
    }
    out
}

/// Iterate the dotted prefixes of a display path: `a.b.c` yields `a`, `a.b`, `a.b.c`.
pub fn ancestor_paths(path: &str) -> AncestorPaths<'_> {
    AncestorPaths { path, pos: 0 }
}

/// Iterator returned by [`ancestor_paths`].
#[derive(Debug, Clone)]
pub struct AncestorPaths<'a> {
    path: &'a str,
    pos: usize,
}

impl<'a> Iterator for AncestorPaths<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos > self.path.len() || self.path.is_empty() {
            return None;
        }
        let end = match self.path[self.pos..].find('.') {
            Some(offset) => self.pos + offset,
            None => self.path.len(),
        };
        self.pos = end + 1;
        Some(&self.path[..end])
    }
}

/// An owned list of path segments naming a location inside a nested value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ValuePath(Vec<String>);

impl ValuePath {
    /// The empty path, naming the root value.
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Append a segment.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    /// A copy of this path with one more segment.
    pub fn with(&self, segment: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.push(segment);
        next
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The last segment, if any.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Consume the path into its segments.
    pub fn into_segments(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_path(&self.0))
    }
}

impl<S: Into<String>> FromIterator<S> for ValuePath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for ValuePath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl AsRef<[String]> for ValuePath {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}
