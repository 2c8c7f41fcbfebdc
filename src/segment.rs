//! # Path Segmenter
//!
//! Turns raw request paths and registration patterns into ordered segment
//! lists, and classifies pattern tokens.
//!
//! ## Rules
//!
//! - Everything from the first `?` onward is dropped.
//! - Runs of `/` collapse, and leading/trailing separators are removed.
//! - The remainder is split on `/`.
//!
//! An empty or all-separator input yields a single empty segment (`[""]`),
//! so `/` registers and resolves through a static child keyed by `""`.
//!
//! ```rust
//! use trierouter::segment::segmentize;
//!
//! assert_eq!(segmentize("//a//b//?x=1"), vec!["a", "b"]);
//! assert_eq!(segmentize("/"), vec![""]);
//! ```

/// Split a path into its segments, stripping the query string and the
/// leading/trailing separators.
#[must_use]
pub fn segmentize(path: &str) -> Vec<&str> {
    let path = match path.find('?') {
        Some(idx) => &path[..idx],
        None => path,
    };
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return vec![""];
    }
    segments
}

/// Join segments back into a rooted path.
#[must_use]
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::with_capacity(segments.iter().map(|s| s.as_ref().len() + 1).sum());
    for segment in segments {
        out.push('/');
        out.push_str(segment.as_ref());
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Classification of one pattern token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Matched by exact text.
    Static(&'a str),
    /// `:name` matches any single segment; the name is recorded without the colon.
    Param(&'a str),
    /// `*` matches one or more segments until a more specific continuation.
    Splat,
    /// `a|b|c` routes each literal to the same child.
    Alternation(Vec<&'a str>),
}

impl<'a> Segment<'a> {
    /// Classify a pattern token by its first character.
    #[must_use]
    pub fn parse(token: &'a str) -> Self {
        if let Some(name) = token.strip_prefix(':') {
            Segment::Param(name)
        } else if token.starts_with('*') {
            Segment::Splat
        } else if token.contains('|') {
            Segment::Alternation(token.split('|').collect())
        } else {
            Segment::Static(token)
        }
    }

    /// Literal keys this segment binds in a static-children map.
    ///
    /// Empty for parameter and splat segments.
    #[must_use]
    pub fn literals(&self) -> Vec<&'a str> {
        match self {
            Segment::Static(text) => vec![*text],
            Segment::Alternation(alts) => alts.clone(),
            Segment::Param(_) | Segment::Splat => Vec::new(),
        }
    }
}
