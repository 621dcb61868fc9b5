//! # Build Manifest Schema and Parsing
//!
//! This module defines the data structures that represent a `datapack.yaml`
//! build manifest and the logic for parsing it. One manifest describes one
//! build session: the pack metadata, the load/tick/function scripts, and every
//! recipe, tag and elixirum document to stage.
//!
//! ## Key Components
//!
//! - **`Manifest`**: the whole file.
//! - **`RecipeOp`**: one entry of the `recipes` list. Each entry is a
//!   single-key mapping whose key selects the recipe kind, e.g.
//!   `- smelting: {output: ..., input: ..., cookingtime: 200}`.
//! - **`Script`**: `load` and `tick` accept `true` for the default body or a
//!   string holding the script itself.
//!
//! ## Example
//!
//! ```yaml
//! name: My Pack
//! description: Extra recipes
//! version: "1.21.4"
//! load: true
//! recipes:
//!   - shapeless:
//!       output: {id: minecraft:stick, count: 4}
//!       ingredients: [minecraft:bamboo, minecraft:bamboo]
//!   - remove: minecraft:bread
//! tags:
//!   - name: logs
//!     type: block
//!     values: [minecraft:oak_log]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::elixirum::{Essence, IngredientPreset};
use crate::error::{Error, Result};
use crate::recipe::{
    CookingRecipe, ShapedRecipe, ShapelessRecipe, SmithingRecipe, StonecuttingRecipe,
};
use crate::tags::IdList;
use crate::version::FormatId;

/// How the pack format is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackFormat {
    /// A literal format identifier
    Id(FormatId),
    /// A game version to resolve against the rule table
    Version(String),
}

/// A load or tick script: `true` for the default body, or the body itself
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Script {
    Enabled(bool),
    Body(String),
}

impl Script {
    /// Whether the script should be generated at all
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Script::Enabled(false))
    }

    /// A custom body, if one was given
    pub fn body(&self) -> Option<&str> {
        match self {
            Script::Body(body) => Some(body),
            Script::Enabled(_) => None,
        }
    }
}

/// A named function script
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// A recipe entry of the manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecipeOp {
    Shaped { shaped: ShapedRecipe },
    Shapeless { shapeless: ShapelessRecipe },
    Smelting { smelting: CookingRecipe },
    Blasting { blasting: CookingRecipe },
    Smoking { smoking: CookingRecipe },
    CampfireCooking { campfire_cooking: CookingRecipe },
    Stonecutting { stonecutting: StonecuttingRecipe },
    Smithing { smithing: SmithingRecipe },
    /// Hide a recipe of another pack, by output id
    Remove { remove: String },
}

impl RecipeOp {
    /// The manifest key of this entry
    pub fn kind(&self) -> &'static str {
        match self {
            RecipeOp::Shaped { .. } => "shaped",
            RecipeOp::Shapeless { .. } => "shapeless",
            RecipeOp::Smelting { .. } => "smelting",
            RecipeOp::Blasting { .. } => "blasting",
            RecipeOp::Smoking { .. } => "smoking",
            RecipeOp::CampfireCooking { .. } => "campfire_cooking",
            RecipeOp::Stonecutting { .. } => "stonecutting",
            RecipeOp::Smithing { .. } => "smithing",
            RecipeOp::Remove { .. } => "remove",
        }
    }
}

/// A tag contribution
#[derive(Debug, Clone, Deserialize)]
pub struct TagDef {
    pub name: String,
    #[serde(rename = "type")]
    pub tag_type: String,
    pub values: IdList,
    /// Target namespace; defaults to the pack's own
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub replace: bool,
}

/// Elixirum documents and tags
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ElixirumDef {
    pub essences: Vec<Essence>,
    pub ingredient_presets: Vec<IngredientPreset>,
    pub configured_elixirs: Vec<Map<String, JsonValue>>,
    pub heat_sources: Vec<String>,
    pub blacklist: Vec<String>,
    pub whitelist: Vec<String>,
    pub shelf_placeable: Vec<String>,
}

/// A parsed build manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Game version, resolved to a pack format
    #[serde(default)]
    pub version: Option<String>,
    /// Explicit pack format, instead of `version`
    #[serde(default)]
    pub pack_format: Option<FormatId>,
    /// Produce `<output>/<name>.zip` instead of a directory
    #[serde(default)]
    pub archive: bool,
    /// Output directory, relative to the manifest
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub load: Option<Script>,
    #[serde(default)]
    pub tick: Option<Script>,
    #[serde(default)]
    pub functions: Vec<FunctionDef>,
    #[serde(default)]
    pub recipes: Vec<RecipeOp>,
    #[serde(default)]
    pub tags: Vec<TagDef>,
    #[serde(default)]
    pub elixirum: Option<ElixirumDef>,
}

impl Manifest {
    /// Pick the pack format source. Exactly one of `version` and
    /// `pack_format` must be set.
    pub fn pack_format(&self) -> Result<PackFormat> {
        match (&self.pack_format, &self.version) {
            (Some(id), None) => Ok(PackFormat::Id(*id)),
            (None, Some(version)) => Ok(PackFormat::Version(version.clone())),
            (Some(_), Some(_)) => Err(Error::ConfigParse {
                message: "Both `version` and `pack_format` are set".to_string(),
                hint: Some("Keep only one of them".to_string()),
            }),
            (None, None) => Err(Error::ConfigParse {
                message: "No pack format given".to_string(),
                hint: Some("Add `version: \"1.21.4\"` or `pack_format: 61`".to_string()),
            }),
        }
    }
}

/// Parse a manifest from a YAML string
pub fn parse(yaml_content: &str) -> Result<Manifest> {
    let manifest: Manifest = serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: hint_for(&e),
    })?;
    if manifest.name.trim().is_empty() {
        return Err(Error::ConfigParse {
            message: "`name` must not be empty".to_string(),
            hint: None,
        });
    }
    Ok(manifest)
}

fn hint_for(error: &serde_yaml::Error) -> Option<String> {
    let message = error.to_string();
    if message.contains("RecipeOp") {
        Some(
            "Each recipe is a single-key mapping such as `- smelting: {...}`; \
             check the key and the required fields"
                .to_string(),
        )
    } else if message.contains("unknown field") {
        Some("Check the spelling of top-level manifest keys".to_string())
    } else {
        None
    }
}

/// Parse a manifest from a file
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
