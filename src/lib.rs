//! # packsmith
//!
//! Stage the contents of a game data pack in memory, merge deferred tag
//! contributions, and flush the result to a pack directory or zip archive.
//! The `packsmith` binary drives one build session from a YAML manifest; the
//! library can also be used directly.
//!
//! ## Quick Example
//!
//! ```
//! use packsmith::context::BuildContext;
//! use packsmith::path::VirtualPath;
//! use packsmith::tags::TagContribution;
//! use serde_json::json;
//!
//! let mut ctx = BuildContext::new("mypack", Vec::new()).unwrap();
//! ctx.stage_json(
//!     VirtualPath::parse("mypack/recipe/stick.json").unwrap(),
//!     json!({"type": "minecraft:crafting_shapeless"}),
//! );
//!
//! ctx.declare_tag("logs");
//! ctx.contribute(TagContribution::new("logs", "block", "minecraft:oak_log"));
//! ctx.contribute(TagContribution::new("logs", "block", ["minecraft:birch_log"]));
//! assert_eq!(ctx.confirm_tags().unwrap(), 1);
//!
//! // Folders are registered parent-first, files in first-staged order.
//! let folders: Vec<String> = ctx.folders().iter().map(|p| p.to_string()).collect();
//! assert_eq!(folders[..2], ["mypack", "mypack/recipe"]);
//! assert_eq!(ctx.files().len(), 2);
//! ```
//!
//! ## Core Concepts
//!
//! - **Staging (`path`, `registry`, `filesystem`, `context`)**: virtual paths,
//!   the deduplicating folder registry, the last-write-wins file store and the
//!   per-session [`context::BuildContext`] that owns them.
//! - **Tags (`tags`)**: contributions recorded from many call sites and merged
//!   into one document per tag name and namespace on confirm.
//! - **Versions (`version`, `defaults`)**: rule-based mapping from a game
//!   version to a pack format, driven by static tables shipped in `data/`.
//! - **Builders (`recipe`, `elixirum`, `category`, `identifier`)**: document
//!   shapes that stage into a context.
//! - **Sessions (`datapack`, `flush`, `archive`, `config`)**: the session
//!   façade, writing to disk, zip packaging and the build manifest.
//!
//! ## Execution Flow
//!
//! 1.  **Create** a [`datapack::Datapack`]: resolve the pack format, write
//!     `pack.mcmeta`.
//! 2.  **Stage** scripts, recipes, tags and elixirum documents.
//! 3.  **Confirm** tags into staged documents.
//! 4.  **Flush** folders, then files, below `<pack>/data`.
//! 5.  **Archive** the pack directory when requested.

pub mod archive;
pub mod category;
pub mod config;
pub mod context;
pub mod datapack;
pub mod defaults;
pub mod elixirum;
pub mod error;
pub mod filesystem;
pub mod flush;
pub mod identifier;
pub mod output;
pub mod path;
pub mod recipe;
pub mod registry;
pub mod tags;
pub mod version;

#[cfg(test)]
mod registry_proptest;
