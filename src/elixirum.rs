//! Elixirum mod documents
//!
//! Essences, ingredient presets and configured elixirs are plain JSON
//! documents staged under `elixirum/elixirum/<kind>/`. The four elixirum tags
//! (heat sources, essence blacklist and whitelist, shelf placeable) go through
//! the tag aggregator in the `elixirum` namespace, so every call site adds to
//! the same merged document.

use std::collections::BTreeMap;

use log::info;
use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};

use crate::category::{coerce, Category, EssenceCategory};
use crate::context::BuildContext;
use crate::defaults::{
    ELIXIRUM_NAMESPACE, ESSENCE_BLACKLIST, ESSENCE_WHITELIST, HEAT_SOURCES, SHELF_PLACEABLE,
};
use crate::error::{Error, Result};
use crate::identifier::ResourceId;
use crate::path::VirtualPath;
use crate::tags::{IdList, TagContribution};

/// An essence backed by a mob effect
#[derive(Debug, Clone, Deserialize)]
pub struct Essence {
    /// Mob effect id, e.g. `minecraft:speed`
    pub effect: String,
    pub max_amplifier: u32,
    pub max_duration: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub required_ingredients: u32,
    #[serde(default)]
    pub required_quality: u32,
}

/// Essences granted by an ingredient, all with the same weight
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientPreset {
    pub essences: IdList,
    pub ingredient: String,
    pub weight: u32,
}

/// Elixirum builders bound to a session
pub struct Elixirum<'a> {
    ctx: &'a mut BuildContext,
}

impl<'a> Elixirum<'a> {
    pub fn new(ctx: &'a mut BuildContext) -> Self {
        Self { ctx }
    }

    fn document_path(kind: &str, file_stem: &str) -> Result<VirtualPath> {
        VirtualPath::from_segments([ELIXIRUM_NAMESPACE, ELIXIRUM_NAMESPACE, kind])?
            .join(&format!("{}.json", file_stem))
    }

    /// Stage `elixirum/elixirum/essence/<effect path>.json`
    pub fn new_essence(&mut self, essence: &Essence) -> Result<VirtualPath> {
        let effect = ResourceId::parse(&essence.effect)?;
        let category = coerce::<EssenceCategory>(essence.category.as_deref());
        info!(
            "Creating essence \"{}\" (category {}, max amplifier {}, max duration {})",
            effect,
            category.as_str(),
            essence.max_amplifier,
            essence.max_duration
        );

        let path = Self::document_path("essence", effect.path())?;
        self.ctx.stage_json(
            path.clone(),
            json!({
                "category": category.as_str(),
                "max_amplifier": essence.max_amplifier,
                "max_duration": essence.max_duration,
                "mob_effect": essence.effect,
                "required_ingredients": essence.required_ingredients,
                "required_quality": essence.required_quality,
            }),
        );
        Ok(path)
    }

    /// Stage `elixirum/elixirum/ingredient_preset/<ingredient path>.json`
    pub fn new_ingredient_preset(&mut self, preset: &IngredientPreset) -> Result<VirtualPath> {
        let ingredient = ResourceId::parse(&preset.ingredient)?;
        let essences: BTreeMap<&str, u32> = preset
            .essences
            .iter()
            .map(|essence| (essence, preset.weight))
            .collect();

        let path = Self::document_path("ingredient_preset", ingredient.path())?;
        self.ctx.stage_json(
            path.clone(),
            json!({"essences": essences, "target": preset.ingredient}),
        );
        Ok(path)
    }

    /// Stage a configured elixir document as given.
    ///
    /// The file is named after the essence of the first ingredient of the
    /// first variant, without the `elixirum:` prefix.
    pub fn new_configured_elixir(&mut self, document: &Map<String, JsonValue>) -> Result<VirtualPath> {
        let essence = document
            .get("variants")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("essence"))
            .and_then(JsonValue::as_str)
            .ok_or_else(|| {
                Error::validation(
                    "variants",
                    "A configured elixir needs variants[0][0].essence",
                )
            })?;
        let stem = essence.strip_prefix("elixirum:").unwrap_or(essence);

        let path = Self::document_path("configured_elixir", stem)?;
        self.ctx
            .stage_json(path.clone(), JsonValue::Object(document.clone()));
        Ok(path)
    }

    fn contribute(&mut self, tag: &str, tag_type: &str, ids: IdList) {
        self.ctx.contribute(
            TagContribution::new(tag, tag_type, ids).in_namespace(ELIXIRUM_NAMESPACE),
        );
    }

    /// Blocks that heat a cauldron
    pub fn new_heat_source(&mut self, blocks: impl Into<IdList>) {
        self.contribute(HEAT_SOURCES, "block", blocks.into());
    }

    /// Items that never carry essences
    pub fn add_to_blacklist(&mut self, items: impl Into<IdList>) {
        self.contribute(ESSENCE_BLACKLIST, "item", items.into());
    }

    /// Items allowed to carry essences, overriding the default blacklist
    pub fn add_to_whitelist(&mut self, items: impl Into<IdList>) {
        let items = items.into();
        self.ctx.remove_from_seed(&items);
        self.contribute(ESSENCE_WHITELIST, "item", items);
    }

    /// Items that can be placed on a shelf
    pub fn make_shelf_placeable(&mut self, items: impl Into<IdList>) {
        self.contribute(SHELF_PLACEABLE, "item", items.into());
    }
}
