//! # Pack Format Resolution
//!
//! Maps a dotted game version string (`"1.20.4"`) to the pack format
//! identifier the game expects in `pack.mcmeta`, using an ordered rule table.
//!
//! ## Parsing
//!
//! 1.  The version is split on `.`.
//! 2.  Every segment equal to the literal `"1"` is removed. This drops the
//!     leading epoch marker of `1.x.y` versions, but it also drops any *other*
//!     segment equal to `"1"` (`"1.20.1"` reads as `20` alone). The rule is
//!     kept as-is and a warning is logged whenever a non-leading segment is
//!     dropped, so the ambiguity is visible rather than silently changed.
//! 3.  If one segment remains, a minor of `"0"` is appended.
//! 4.  The first two remaining segments are read as `major` and `minor`.
//!
//! ## Lookup
//!
//! `table[major]` is either a fixed value (`any`) or an ordered list of
//! conditions on `minor`; the **first** matching condition wins. A missing
//! major, an exhausted condition list, or an unparsable version yields
//! [`Resolution::Unresolved`] instead of a guess.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use serde::Deserialize;

/// Pack format identifier understood by the game
pub type FormatId = u32;

/// A predicate on the minor version, paired with the value it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum Condition {
    /// Matches when `minor <= bound`
    #[serde(rename = "less")]
    LessEq {
        #[serde(rename = "val")]
        bound: u32,
        #[serde(rename = "ver")]
        value: FormatId,
    },
    /// Matches when `minor >= bound`
    #[serde(rename = "more")]
    MoreEq {
        #[serde(rename = "val")]
        bound: u32,
        #[serde(rename = "ver")]
        value: FormatId,
    },
    /// Matches when `minor == bound`
    #[serde(rename = "equal")]
    Equal {
        #[serde(rename = "val")]
        bound: u32,
        #[serde(rename = "ver")]
        value: FormatId,
    },
    /// Matches when `low <= minor <= high`
    #[serde(rename = "between")]
    Between {
        #[serde(rename = "val")]
        bounds: (u32, u32),
        #[serde(rename = "ver")]
        value: FormatId,
    },
}

impl Condition {
    /// Whether this condition accepts `minor`
    pub fn matches(&self, minor: u32) -> bool {
        match *self {
            Condition::LessEq { bound, .. } => minor <= bound,
            Condition::MoreEq { bound, .. } => minor >= bound,
            Condition::Equal { bound, .. } => minor == bound,
            Condition::Between {
                bounds: (low, high),
                ..
            } => low <= minor && minor <= high,
        }
    }

    /// The format selected when this condition matches
    pub fn value(&self) -> FormatId {
        match *self {
            Condition::LessEq { value, .. }
            | Condition::MoreEq { value, .. }
            | Condition::Equal { value, .. }
            | Condition::Between { value, .. } => value,
        }
    }
}

/// The rule for one major version
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawRule")]
pub enum VersionRule {
    /// Every minor maps to the same format
    Any(FormatId),
    /// Conditions are tried in declared order
    Conditions(Vec<Condition>),
}

#[derive(Deserialize)]
struct RawRule {
    #[serde(default)]
    any: bool,
    #[serde(default)]
    val: Option<FormatId>,
    #[serde(default)]
    conditions: Vec<Condition>,
}

impl TryFrom<RawRule> for VersionRule {
    type Error = String;

    fn try_from(raw: RawRule) -> std::result::Result<Self, Self::Error> {
        if raw.any {
            raw.val
                .map(VersionRule::Any)
                .ok_or_else(|| "rule with \"any\": true needs a \"val\"".to_string())
        } else {
            Ok(VersionRule::Conditions(raw.conditions))
        }
    }
}

/// Rule table keyed by major version
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: BTreeMap<u32, VersionRule>,
}

impl RuleTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from its JSON form
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Add or replace the rule for `major`
    pub fn insert(&mut self, major: u32, rule: VersionRule) -> &mut Self {
        self.rules.insert(major, rule);
        self
    }

    /// The rule for `major`, if any
    pub fn get(&self, major: u32) -> Option<&VersionRule> {
        self.rules.get(&major)
    }

    /// Number of majors covered
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Why a version could not be mapped to a format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The string did not yield an integer major and minor
    Malformed,
    /// The table has no rule for this major
    UnknownMajor(u32),
    /// The major's rule exists but no condition accepts the minor
    NoMatchingCondition { major: u32, minor: u32 },
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::Malformed => write!(f, "version is not of the form 1.MAJOR[.MINOR]"),
            UnresolvedReason::UnknownMajor(major) => {
                write!(f, "no pack format rule for major version {}", major)
            }
            UnresolvedReason::NoMatchingCondition { major, minor } => write!(
                f,
                "no pack format condition for major {} matches minor {}",
                major, minor
            ),
        }
    }
}

/// Outcome of [`resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Format(FormatId),
    Unresolved(UnresolvedReason),
}

impl Resolution {
    /// The resolved format, discarding the failure reason
    pub fn format(&self) -> Option<FormatId> {
        match self {
            Resolution::Format(id) => Some(*id),
            Resolution::Unresolved(_) => None,
        }
    }
}

/// Split a version string into `(major, minor)` following the rules in the
/// module documentation.
pub fn parse_version(version: &str) -> Option<(u32, u32)> {
    let mut kept: Vec<&str> = Vec::new();
    for (index, segment) in version.split('.').enumerate() {
        if segment == "1" {
            if index > 0 {
                warn!(
                    "Version '{}': segment {} equals \"1\" and is dropped like the leading epoch marker",
                    version, index
                );
            }
            continue;
        }
        kept.push(segment);
    }
    if kept.len() == 1 {
        kept.push("0");
    }
    if kept.len() < 2 {
        return None;
    }
    let major = kept[0].trim().parse().ok()?;
    let minor = kept[1].trim().parse().ok()?;
    Some((major, minor))
}

/// Resolve `version` to a pack format using `table`.
pub fn resolve(version: &str, table: &RuleTable) -> Resolution {
    let Some((major, minor)) = parse_version(version) else {
        return Resolution::Unresolved(UnresolvedReason::Malformed);
    };
    match table.get(major) {
        None => Resolution::Unresolved(UnresolvedReason::UnknownMajor(major)),
        Some(VersionRule::Any(value)) => Resolution::Format(*value),
        Some(VersionRule::Conditions(conditions)) => conditions
            .iter()
            .find(|condition| condition.matches(minor))
            .map(|condition| Resolution::Format(condition.value()))
            .unwrap_or(Resolution::Unresolved(
                UnresolvedReason::NoMatchingCondition { major, minor },
            )),
    }
}
