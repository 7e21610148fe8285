//! Markers, fragments and the splice that weaves one into the other.
//!
//! A marker is a single comment line such as
//! `// +kubebuilder:scaffold:imports` left in generated content. Fragments
//! for that marker are inserted directly above it, so the sentinel always
//! stays below everything woven in so far and later runs append after
//! earlier ones.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Text that follows the comment prefix in every sentinel.
pub const SENTINEL_PREFIX: &str = "+kubebuilder:scaffold:";

/// Comment syntax used to render a sentinel, chosen by file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommentStyle {
    /// `//`, for Go sources.
    Slash,
    /// `#`, for YAML, Makefiles, Dockerfiles and anything unrecognised.
    Hash,
}

impl CommentStyle {
    pub fn for_path(path: &str) -> Self {
        let file = path.rsplit('/').next().unwrap_or(path);
        match file.rsplit_once('.') {
            Some((_, ext)) if ext.eq_ignore_ascii_case("go") => Self::Slash,
            _ => Self::Hash,
        }
    }

    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Slash => "//",
            Self::Hash => "#",
        }
    }
}

/// A marker label valid in one specific file.
///
/// Implemented by one small enum per target file, so a label that does not
/// exist in that file cannot be named.
pub trait MarkerLabel: Copy {
    fn label(&self) -> &'static str;
}

/// A named insertion point: (file, label).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marker {
    file: String,
    label: &'static str,
    style: CommentStyle,
}

impl Marker {
    pub fn new(file: impl Into<String>, label: impl MarkerLabel) -> Self {
        let file = file.into();
        let style = CommentStyle::for_path(&file);
        Self {
            file,
            label: label.label(),
            style,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn style(&self) -> CommentStyle {
        self.style
    }

    /// The full comment line, without indentation.
    pub fn sentinel(&self) -> String {
        format!("{} {}{}", self.style.prefix(), SENTINEL_PREFIX, self.label)
    }

    /// True if `line`, ignoring surrounding whitespace, is this sentinel.
    pub fn matches_line(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed
            .strip_prefix(self.style.prefix())
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix(SENTINEL_PREFIX))
            .is_some_and(|label| label == self.label)
    }

    /// True if any line of `content` is this sentinel.
    pub fn is_present_in(&self, content: &str) -> bool {
        content.lines().any(|line| self.matches_line(line))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sentinel())
    }
}

// ── Fragments ────────────────────────────────────────────────────────────────

/// Ordered fragments per marker. Markers with no fragments are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentMap(BTreeMap<Marker, Vec<String>>);

impl FragmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append fragments for `marker`, keeping their order. An empty list is ignored.
    pub fn insert(&mut self, marker: Marker, fragments: Vec<String>) {
        if fragments.is_empty() {
            return;
        }
        self.0.entry(marker).or_default().extend(fragments);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, marker: Marker, fragments: Vec<String>) -> Self {
        self.insert(marker, fragments);
        self
    }

    pub fn get(&self, marker: &Marker) -> Option<&[String]> {
        self.0.get(marker).map(Vec::as_slice)
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Marker, &[String])> {
        self.0.iter().map(|(m, f)| (m, f.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fragments across all markers.
    pub fn fragment_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// How fragments that already appear in the file are treated.
///
/// Under both policies a single-line fragment is dropped when the file, or an
/// earlier fragment of the same splice, already holds that exact line once
/// trimmed. Repeated imports and scheme registrations therefore never pile up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FragmentPolicy {
    /// Multi-line fragments are always inserted. Re-running an identical
    /// operation duplicates them.
    #[default]
    Append,
    /// Also drop a multi-line fragment whose non-blank lines already appear
    /// as a contiguous run.
    SkipExisting,
}

/// Result of weaving fragments into content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spliced {
    pub content: String,
    /// Fragments actually inserted.
    pub inserted: usize,
}

/// First marker from `markers` whose sentinel is absent from `content`.
pub fn find_missing<'a>(
    content: &str,
    markers: impl IntoIterator<Item = &'a Marker>,
) -> Option<&'a Marker> {
    markers.into_iter().find(|m| !m.is_present_in(content))
}

/// Insert every fragment above the first line matching its marker.
///
/// Fragment lines get the sentinel's indentation and line ending. Every other
/// byte of `content` is kept as is. Fragments whose marker is absent are
/// dropped; callers check with [`find_missing`] first.
pub fn splice(content: &str, fragments: &FragmentMap, policy: FragmentPolicy) -> Spliced {
    let existing: HashSet<&str> = significant_lines(content).collect();
    let mut out = String::with_capacity(content.len() + 256);
    let mut consumed: HashSet<&Marker> = HashSet::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut inserted = 0;

    for line in content.split_inclusive('\n') {
        let hit = fragments
            .iter()
            .find(|(m, _)| !consumed.contains(m) && m.matches_line(line));

        if let Some((marker, frags)) = hit {
            consumed.insert(marker);
            let indent = &line[..line.len() - line.trim_start().len()];
            let eol = if line.ends_with("\r\n") { "\r\n" } else { "\n" };

            for fragment in frags {
                let skip = match single_line(fragment) {
                    Some(only) => existing.contains(only) || !seen.insert(only),
                    None => {
                        policy == FragmentPolicy::SkipExisting
                            && (!seen.insert(fragment.as_str())
                                || fragment_present(content, fragment))
                    }
                };
                if skip {
                    continue;
                }
                for frag_line in fragment.lines() {
                    if !frag_line.trim().is_empty() {
                        out.push_str(indent);
                        out.push_str(frag_line);
                    }
                    out.push_str(eol);
                }
                inserted += 1;
            }
        }
        out.push_str(line);
    }

    Spliced {
        content: out,
        inserted,
    }
}

/// The trimmed text of `fragment` when it has exactly one non-blank line.
fn single_line(fragment: &str) -> Option<&str> {
    let mut lines = significant_lines(fragment);
    match (lines.next(), lines.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

/// True if the non-blank trimmed lines of `fragment` appear contiguously in `content`.
pub fn fragment_present(content: &str, fragment: &str) -> bool {
    let needle: Vec<&str> = significant_lines(fragment).collect();
    if needle.is_empty() {
        return true;
    }
    let haystack: Vec<&str> = significant_lines(content).collect();
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_slice())
}

fn significant_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}
