//! Default values and built-in static tables.
//!
//! This module centralizes the constants shared across builders (well-known
//! tag names, default script bodies) and the two static tables loaded once
//! per process: the pack-format rule table used by [`crate::version`] and the
//! essence blacklist seed used by [`crate::tags`]. Both tables ship in `data/`
//! and are embedded into the binary; either can be replaced from disk.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::version::RuleTable;

/// Default build manifest file name
pub const DEFAULT_MANIFEST: &str = "datapack.yaml";

/// Namespace of the Ars Elixirum mod
pub const ELIXIRUM_NAMESPACE: &str = "elixirum";

pub const HEAT_SOURCES: &str = "heat_sources";
pub const ESSENCE_BLACKLIST: &str = "essence_blacklist";
pub const ESSENCE_WHITELIST: &str = "essence_whitelist";
pub const SHELF_PLACEABLE: &str = "shelf_placeable";

/// Tag names known to every session before any `declare`
pub const DEFAULT_TAG_NAMES: [&str; 4] = [
    HEAT_SOURCES,
    ESSENCE_BLACKLIST,
    ESSENCE_WHITELIST,
    SHELF_PLACEABLE,
];

/// Body of `tick.mcfunction` when none is given
pub const DEFAULT_TICK_BODY: &str = r#"tellraw @a "Tick!""#;

/// Body of a named function when none is given
pub const DEFAULT_FUNCTION_BODY: &str =
    r#"tellraw @a {"text":"This function has no data inside", "color":"red"}"#;

const BUILTIN_PACK_FORMATS: &str = include_str!("../data/pack_formats.json");
const BUILTIN_ESSENCE_BLACKLIST: &str = include_str!("../data/essence_blacklist.json");

/// Body of `load.mcfunction` when none is given
pub fn default_load_body(pack_name: &str) -> String {
    format!(
        r#"tellraw @a {{"text":"The {} datapack has loaded correctly", "color":"green"}}"#,
        pack_name
    )
}

#[derive(Deserialize)]
struct SeedDocument {
    values: Vec<String>,
}

/// Immutable inputs shared by every session in a process
#[derive(Debug, Clone)]
pub struct StaticTables {
    pub pack_formats: RuleTable,
    pub essence_blacklist: Vec<String>,
}

impl StaticTables {
    /// The tables embedded from `data/`
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            pack_formats: parse_pack_formats("pack_formats.json", BUILTIN_PACK_FORMATS)?,
            essence_blacklist: parse_seed("essence_blacklist.json", BUILTIN_ESSENCE_BLACKLIST)?,
        })
    }

    /// Built-in tables, with either one replaced by a file when given
    pub fn from_files(pack_formats: Option<&Path>, blacklist_seed: Option<&Path>) -> Result<Self> {
        let mut tables = Self::builtin()?;
        if let Some(path) = pack_formats {
            let json = fs::read_to_string(path)?;
            tables.pack_formats = parse_pack_formats(&path.display().to_string(), &json)?;
        }
        if let Some(path) = blacklist_seed {
            let json = fs::read_to_string(path)?;
            tables.essence_blacklist = parse_seed(&path.display().to_string(), &json)?;
        }
        Ok(tables)
    }
}

fn parse_pack_formats(table: &str, json: &str) -> Result<RuleTable> {
    RuleTable::from_json(json).map_err(|e| Error::StaticData {
        table: table.to_string(),
        message: e.to_string(),
    })
}

fn parse_seed(table: &str, json: &str) -> Result<Vec<String>> {
    serde_json::from_str::<SeedDocument>(json)
        .map(|doc| doc.values)
        .map_err(|e| Error::StaticData {
            table: table.to_string(),
            message: e.to_string(),
        })
}
