//! Recipe document builders
//!
//! Each builder maps its inputs onto the game's recipe JSON and stages the
//! document at `<namespace>/recipe/<output path>.json`. Builders validate
//! before staging, so a rejected recipe leaves the session untouched.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use crate::category::{coerce, Category, CookingCategory, CraftingCategory};
use crate::context::BuildContext;
use crate::error::{Error, Result};
use crate::identifier::ResourceId;
use crate::path::VirtualPath;

/// Maximum number of ingredients in a shapeless recipe
pub const MAX_SHAPELESS_INGREDIENTS: usize = 9;

/// Maximum rows and columns of a shaped pattern
pub const MAX_GRID_SIZE: usize = 3;

/// An item id, optionally with a stack count (defaults to 1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemStack {
    Id(String),
    Counted {
        id: String,
        #[serde(default = "default_count")]
        count: u32,
    },
}

fn default_count() -> u32 {
    1
}

impl ItemStack {
    pub fn id(&self) -> &str {
        match self {
            ItemStack::Id(id) | ItemStack::Counted { id, .. } => id,
        }
    }

    pub fn count(&self) -> u32 {
        match self {
            ItemStack::Id(_) => 1,
            ItemStack::Counted { count, .. } => *count,
        }
    }
}

impl From<&str> for ItemStack {
    fn from(id: &str) -> Self {
        ItemStack::Id(id.to_string())
    }
}

/// Crafting table recipe with a fixed layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapedRecipe {
    pub output: ItemStack,
    /// Up to three rows of up to three characters
    pub pattern: Vec<String>,
    /// Pattern character to ingredient
    pub key: Map<String, JsonValue>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Crafting table recipe with any layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapelessRecipe {
    pub output: ItemStack,
    pub ingredients: Vec<JsonValue>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Furnace-family recipe (smelting, blasting, smoking, campfire)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookingRecipe {
    pub output: ItemStack,
    pub input: ItemStack,
    #[serde(default)]
    pub experience: f64,
    #[serde(rename = "cookingtime", alias = "cooking_time")]
    pub cooking_time: u32,
    #[serde(default)]
    pub category: Option<String>,
}

/// Stonecutter recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StonecuttingRecipe {
    pub output: ItemStack,
    pub input: ItemStack,
}

/// Smithing table recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmithingRecipe {
    pub base: ItemStack,
    pub addition: ItemStack,
    pub output: ItemStack,
}

/// The furnace-family block a cooking recipe runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookingKind {
    Smelting,
    Blasting,
    Smoking,
    CampfireCooking,
}

impl CookingKind {
    /// The recipe `type` field
    pub fn type_id(&self) -> &'static str {
        match self {
            CookingKind::Smelting => "minecraft:smelting",
            CookingKind::Blasting => "minecraft:blasting",
            CookingKind::Smoking => "minecraft:smoking",
            CookingKind::CampfireCooking => "minecraft:campfire_cooking",
        }
    }
}

/// Recipe builders bound to a session
pub struct Recipes<'a> {
    ctx: &'a mut BuildContext,
}

impl<'a> Recipes<'a> {
    pub fn new(ctx: &'a mut BuildContext) -> Self {
        Self { ctx }
    }

    fn recipe_path(&self, output: &ItemStack) -> Result<VirtualPath> {
        let id = ResourceId::parse(output.id())?;
        VirtualPath::from_segments([self.ctx.namespace(), "recipe"])?
            .join(&format!("{}.json", id.path()))
    }

    fn stage(&mut self, output: &ItemStack, document: JsonValue) -> Result<VirtualPath> {
        let path = self.recipe_path(output)?;
        self.ctx.stage_json(path.clone(), document);
        Ok(path)
    }

    /// Stage a shaped crafting recipe
    pub fn shaped(&mut self, recipe: &ShapedRecipe) -> Result<VirtualPath> {
        if recipe.pattern.is_empty() || recipe.pattern.len() > MAX_GRID_SIZE {
            return Err(Error::validation(
                "pattern",
                format!("A pattern needs between 1 and {} rows", MAX_GRID_SIZE),
            ));
        }
        if let Some(row) = recipe
            .pattern
            .iter()
            .find(|row| row.chars().count() > MAX_GRID_SIZE)
        {
            return Err(Error::validation(
                "pattern",
                format!("Row \"{}\" is wider than {} slots", row, MAX_GRID_SIZE),
            ));
        }
        let category = coerce::<CraftingCategory>(recipe.category.as_deref());
        let document = json!({
            "type": "minecraft:crafting_shaped",
            "category": category.as_str(),
            "pattern": recipe.pattern,
            "key": recipe.key,
            "result": {"id": recipe.output.id(), "count": recipe.output.count()},
        });
        self.stage(&recipe.output, document)
    }

    /// Stage a shapeless crafting recipe.
    ///
    /// More than nine ingredients is rejected.
    pub fn shapeless(&mut self, recipe: &ShapelessRecipe) -> Result<VirtualPath> {
        if recipe.ingredients.len() > MAX_SHAPELESS_INGREDIENTS {
            return Err(Error::validation(
                "ingredients",
                format!(
                    "The maximum amount of inputs is {}, got {}",
                    MAX_SHAPELESS_INGREDIENTS,
                    recipe.ingredients.len()
                ),
            ));
        }
        let category = coerce::<CraftingCategory>(recipe.category.as_deref());
        let document = json!({
            "type": "minecraft:crafting_shapeless",
            "category": category.as_str(),
            "ingredients": recipe.ingredients,
            "result": {"id": recipe.output.id(), "count": recipe.output.count()},
        });
        self.stage(&recipe.output, document)
    }

    /// Stage a furnace-family recipe of the given kind
    pub fn cooking(&mut self, kind: CookingKind, recipe: &CookingRecipe) -> Result<VirtualPath> {
        let category = coerce::<CookingCategory>(recipe.category.as_deref());
        let document = json!({
            "type": kind.type_id(),
            "category": category.as_str(),
            "ingredient": {"item": recipe.input.id()},
            "result": {"item": recipe.output.id(), "count": recipe.output.count()},
            "experience": recipe.experience,
            "cookingtime": recipe.cooking_time,
        });
        self.stage(&recipe.output, document)
    }

    pub fn smelting(&mut self, recipe: &CookingRecipe) -> Result<VirtualPath> {
        self.cooking(CookingKind::Smelting, recipe)
    }

    pub fn blasting(&mut self, recipe: &CookingRecipe) -> Result<VirtualPath> {
        self.cooking(CookingKind::Blasting, recipe)
    }

    pub fn smoking(&mut self, recipe: &CookingRecipe) -> Result<VirtualPath> {
        self.cooking(CookingKind::Smoking, recipe)
    }

    pub fn campfire_cooking(&mut self, recipe: &CookingRecipe) -> Result<VirtualPath> {
        self.cooking(CookingKind::CampfireCooking, recipe)
    }

    /// Stage a stonecutter recipe
    pub fn stonecutting(&mut self, recipe: &StonecuttingRecipe) -> Result<VirtualPath> {
        let document = json!({
            "type": "minecraft:stonecutting",
            "ingredient": recipe.input.id(),
            "result": recipe.output.id(),
            "count": recipe.output.count(),
        });
        self.stage(&recipe.output, document)
    }

    /// Stage a smithing recipe
    pub fn smithing(&mut self, recipe: &SmithingRecipe) -> Result<VirtualPath> {
        let document = json!({
            "type": "minecraft:smithing",
            "base": recipe.base.id(),
            "addition": recipe.addition.id(),
            "result": {"item": recipe.output.id(), "count": recipe.output.count()},
        });
        self.stage(&recipe.output, document)
    }
}
