//! Path matching logic.
//!
//! # Design Decisions
//! - A pattern ending in `/` matches its whole subtree, any other pattern
//!   matches exactly
//! - Path matching is case-sensitive
//! - No regex, prefix comparison only

use std::borrow::Cow;

/// Matches a request path against one configured pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    Exact(String),
    Subtree(String),
}

impl PathMatcher {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if pattern.ends_with('/') {
            Self::Subtree(pattern)
        } else {
            Self::Exact(pattern)
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            Self::Exact(p) | Self::Subtree(p) => p,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(p) => path == p,
            Self::Subtree(p) => path.starts_with(p.as_str()),
        }
    }

    /// True when `path` names the subtree root without its trailing slash.
    pub fn is_missing_slash(&self, path: &str) -> bool {
        match self {
            Self::Subtree(p) => p.len() > 1 && p.strip_suffix('/') == Some(path),
            Self::Exact(_) => false,
        }
    }
}

/// Canonical form of `path`: repeated slashes collapsed, `.` and `..`
/// segments (plain or percent-encoded) resolved, trailing slash kept.
pub fn clean_path(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed("/");
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        match dot_segment(segment) {
            Some(DotSegment::Current) => {}
            Some(DotSegment::Parent) => {
                segments.pop();
            }
            None => segments.push(segment),
        }
    }

    let mut cleaned = String::with_capacity(path.len());
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    if cleaned.is_empty() || (path.ends_with('/') && !segments.is_empty()) {
        cleaned.push('/');
    }

    if cleaned == path {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(cleaned)
    }
}

enum DotSegment {
    Current,
    Parent,
}

fn dot_segment(segment: &str) -> Option<DotSegment> {
    if segment.len() > 6 {
        return None;
    }
    match segment.to_ascii_lowercase().as_str() {
        "." | "%2e" => Some(DotSegment::Current),
        ".." | ".%2e" | "%2e." | "%2e%2e" => Some(DotSegment::Parent),
        _ => None,
    }
}
