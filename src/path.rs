//! Virtual paths for staged folders and files
//!
//! A [`VirtualPath`] is an ordered sequence of path segments
//! (`namespace/category/.../name.ext`) relative to a pack's `data/` directory.
//! Two paths are equal iff their segment sequences are equal, so the same
//! location is never registered twice under different spellings.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// A validated, relative, `/`-separated path inside the staged tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualPath {
    segments: Vec<String>,
}

impl VirtualPath {
    /// Build a path from individual segments.
    ///
    /// Each segment must be non-empty, must not be `.` or `..`, and must not
    /// contain a path separator.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(Error::Path {
                message: "A virtual path needs at least one segment".to_string(),
            });
        }
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self { segments })
    }

    /// Parse a `/`-separated path such as `elixirum/tags/item`.
    ///
    /// Backslashes are accepted as separators so that paths typed on Windows
    /// map onto the same segments.
    pub fn parse(path: &str) -> Result<Self> {
        Self::from_segments(path.split(['/', '\\']))
    }

    /// The segments of this path, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a constructed path; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Return a new path with `segment` appended.
    pub fn child(&self, segment: &str) -> Result<Self> {
        validate_segment(segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    /// Return a new path with every segment of `tail` appended.
    ///
    /// `tail` may itself contain separators (`"recipe/dyes/red.json"`).
    pub fn join(&self, tail: &str) -> Result<Self> {
        let tail = Self::parse(tail)?;
        let mut segments = self.segments.clone();
        segments.extend(tail.segments);
        Ok(Self { segments })
    }

    /// The containing folder, or `None` for a single-segment path.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The last segment.
    pub fn file_name(&self) -> &str {
        // Constructors reject empty segment lists.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Every ancestor of this path including itself, root to leaf.
    ///
    /// `a/b/c` yields `a`, `a/b`, `a/b/c`.
    pub fn prefixes(&self) -> impl Iterator<Item = VirtualPath> + '_ {
        (1..=self.segments.len()).map(move |end| VirtualPath {
            segments: self.segments[..end].to_vec(),
        })
    }

    /// Resolve this path below a real directory.
    pub fn to_path(&self, base: &Path) -> PathBuf {
        let mut path = base.to_path_buf();
        for segment in &self.segments {
            path.push(segment);
        }
        path
    }
}

fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::Path {
            message: "Empty path segment".to_string(),
        });
    }
    if segment == "." || segment == ".." {
        return Err(Error::Path {
            message: format!("Relative segment '{}' is not allowed", segment),
        });
    }
    if segment.contains(['/', '\\']) {
        return Err(Error::Path {
            message: format!("Segment '{}' contains a path separator", segment),
        });
    }
    Ok(())
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for VirtualPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
