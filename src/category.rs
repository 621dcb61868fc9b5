//! Category labels for recipes and essences
//!
//! Each label set is a small enum with a documented default. Invalid labels
//! are never rejected: [`coerce`] logs a warning and substitutes the default,
//! because a wrong category only affects how the game groups an entry in its
//! UI and should not stop a build.

use std::fmt;

use log::{debug, warn};

/// A closed set of labels with a fallback
pub trait Category: Copy + Sized + fmt::Debug {
    /// Used when a label is missing or invalid
    const DEFAULT: Self;
    /// Human-readable name of the label set, for log messages
    const KIND: &'static str;

    /// Parse a lowercase label
    fn from_label(label: &str) -> Option<Self>;

    /// The label written into documents
    fn as_str(&self) -> &'static str;
}

/// Validate `label`, returning the matching variant or the default.
///
/// Labels are matched case-insensitively.
pub fn coerce<C: Category>(label: Option<&str>) -> C {
    let Some(label) = label else {
        debug!("No {} category given, using \"{}\"", C::KIND, C::DEFAULT.as_str());
        return C::DEFAULT;
    };
    match C::from_label(&label.trim().to_lowercase()) {
        Some(category) => category,
        None => {
            warn!(
                "Category \"{}\" is not a valid {} category, setting to {}",
                label,
                C::KIND,
                C::DEFAULT.as_str()
            );
            C::DEFAULT
        }
    }
}

/// Categories of the crafting table recipe book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftingCategory {
    Building,
    Redstone,
    Equipment,
    Misc,
}

impl Category for CraftingCategory {
    const DEFAULT: Self = CraftingCategory::Misc;
    const KIND: &'static str = "crafting";

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "building" => Some(CraftingCategory::Building),
            "redstone" => Some(CraftingCategory::Redstone),
            "equipment" => Some(CraftingCategory::Equipment),
            "misc" => Some(CraftingCategory::Misc),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            CraftingCategory::Building => "building",
            CraftingCategory::Redstone => "redstone",
            CraftingCategory::Equipment => "equipment",
            CraftingCategory::Misc => "misc",
        }
    }
}

/// Categories of the furnace-family recipe books
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookingCategory {
    Food,
    Blocks,
    Misc,
}

impl Category for CookingCategory {
    const DEFAULT: Self = CookingCategory::Misc;
    const KIND: &'static str = "cooking";

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "food" => Some(CookingCategory::Food),
            // "block" is accepted as a common misspelling of the game's label
            "blocks" | "block" => Some(CookingCategory::Blocks),
            "misc" => Some(CookingCategory::Misc),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            CookingCategory::Food => "food",
            CookingCategory::Blocks => "blocks",
            CookingCategory::Misc => "misc",
        }
    }
}

/// Essence categories understood by Ars Elixirum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EssenceCategory {
    None,
    Offensive,
    Defensive,
    Enhancing,
    Diminishing,
}

impl Category for EssenceCategory {
    const DEFAULT: Self = EssenceCategory::None;
    const KIND: &'static str = "essence";

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "none" => Some(EssenceCategory::None),
            "offensive" => Some(EssenceCategory::Offensive),
            "defensive" => Some(EssenceCategory::Defensive),
            "enhancing" => Some(EssenceCategory::Enhancing),
            "diminishing" => Some(EssenceCategory::Diminishing),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            EssenceCategory::None => "none",
            EssenceCategory::Offensive => "offensive",
            EssenceCategory::Defensive => "defensive",
            EssenceCategory::Enhancing => "enhancing",
            EssenceCategory::Diminishing => "diminishing",
        }
    }
}
