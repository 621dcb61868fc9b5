//! # Datapack Sessions
//!
//! A [`Datapack`] is one build session. Creating it resolves the pack format,
//! prepares the base directory and writes `pack.mcmeta` right away; every
//! other artifact is staged in the session's [`BuildContext`] until
//! [`Datapack::save`] confirms tags and flushes everything under
//! `<base>/data`.
//!
//! ## Layout
//!
//! ```text
//! <output>/<name>/
//! ├── pack.mcmeta
//! └── data/
//!     ├── minecraft/tags/functions/{load,tick}.json
//!     └── <namespace>/
//!         ├── functions/*.mcfunction
//!         ├── recipe/*.json
//!         └── tags/<type>/*.json
//! ```
//!
//! In archive mode the base directory lives in a temporary staging area that
//! is zipped to `<output>/<name>.zip` and deleted when the session ends,
//! whether or not the save succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_json::json;
use tempfile::TempDir;

use crate::archive;
use crate::config::{Manifest, PackFormat, RecipeOp};
use crate::context::{BuildContext, Filter};
use crate::defaults::{
    default_load_body, StaticTables, DEFAULT_FUNCTION_BODY, DEFAULT_TICK_BODY,
};
use crate::elixirum::Elixirum;
use crate::error::{Error, Result};
use crate::filesystem::to_pretty_json;
use crate::flush::{self, FlushReport};
use crate::identifier::ResourceId;
use crate::path::VirtualPath;
use crate::recipe::Recipes;
use crate::tags::Tags;
use crate::version::{resolve, FormatId, Resolution};

/// Where a session writes its output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    /// `<output>/<name>/`
    #[default]
    Directory,
    /// `<output>/<name>.zip`
    Archive,
    /// A temporary directory that is discarded; nothing reaches `<output>`
    Discard,
}

/// Inputs for a new session
#[derive(Debug, Clone)]
pub struct PackSettings {
    pub name: String,
    pub description: String,
    pub pack_format: PackFormat,
    pub output_dir: PathBuf,
    pub destination: Destination,
}

impl PackSettings {
    /// Settings described by a manifest, writing below `output_dir`
    pub fn from_manifest(manifest: &Manifest, output_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            name: manifest.name.clone(),
            description: manifest.description.clone(),
            pack_format: manifest.pack_format()?,
            output_dir,
            destination: if manifest.archive {
                Destination::Archive
            } else {
                Destination::Directory
            },
        })
    }
}

/// What a save produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub folders: usize,
    pub files: usize,
    /// Number of tag documents merged on confirm
    pub tags: usize,
    /// The pack directory, or `None` when it was a temporary staging area
    pub pack_dir: Option<PathBuf>,
    /// The archive written in archive mode
    pub archive: Option<PathBuf>,
}

/// One build session
#[derive(Debug)]
pub struct Datapack {
    name: String,
    description: String,
    pack_format: FormatId,
    output_dir: PathBuf,
    destination: Destination,
    base_path: PathBuf,
    staging: Option<TempDir>,
    ctx: BuildContext,
}

/// Namespace derived from a pack name: lowercase, whitespace removed
pub fn namespace_for(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolve a pack format source against the static rule table
pub fn resolve_pack_format(source: &PackFormat, tables: &StaticTables) -> Result<FormatId> {
    match source {
        PackFormat::Id(id) => Ok(*id),
        PackFormat::Version(version) => match resolve(version, &tables.pack_formats) {
            Resolution::Format(id) => Ok(id),
            Resolution::Unresolved(reason) => Err(Error::validation(
                "version",
                format!("No pack format for version \"{}\": {}", version, reason),
            )),
        },
    }
}

impl Datapack {
    /// Start a session: resolve the pack format, create `<base>/data` and
    /// write `pack.mcmeta`.
    pub fn new(settings: PackSettings, tables: &StaticTables) -> Result<Self> {
        let namespace = namespace_for(&settings.name);
        let ctx = BuildContext::new(&namespace, tables.essence_blacklist.clone())?;
        let pack_format = resolve_pack_format(&settings.pack_format, tables)?;

        let staging = match settings.destination {
            Destination::Directory => None,
            Destination::Archive | Destination::Discard => Some(TempDir::new()?),
        };
        let base_path = match &staging {
            Some(dir) => dir.path().join(&settings.name),
            None => settings.output_dir.join(&settings.name),
        };

        let data_path = base_path.join("data");
        fs::create_dir_all(&data_path).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", data_path.display(), e),
        })?;
        info!(
            "Creating datapack \"{}\" (namespace {}, pack format {}) at {}",
            settings.name,
            namespace,
            pack_format,
            base_path.display()
        );

        let datapack = Self {
            name: settings.name,
            description: settings.description,
            pack_format,
            output_dir: settings.output_dir,
            destination: settings.destination,
            base_path,
            staging,
            ctx,
        };
        datapack.write_mcmeta()?;
        Ok(datapack)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        self.ctx.namespace()
    }

    pub fn pack_format(&self) -> FormatId {
        self.pack_format
    }

    /// Directory holding `pack.mcmeta` and `data/`
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// The staged session state
    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// The `pack.mcmeta` document for the current filters
    pub fn mcmeta(&self) -> serde_json::Value {
        let mut document = json!({
            "pack": {"description": self.description, "pack_format": self.pack_format}
        });
        if !self.ctx.filters().is_empty() {
            document["filter"] = json!({"block": self.ctx.filters()});
        }
        document
    }

    fn write_mcmeta(&self) -> Result<()> {
        let path = self.base_path.join("pack.mcmeta");
        fs::write(&path, to_pretty_json(&self.mcmeta())?).map_err(|e| Error::Filesystem {
            message: format!("Failed to write file '{}': {}", path.display(), e),
        })?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    fn functions_folder(&self) -> Result<VirtualPath> {
        VirtualPath::from_segments([self.namespace(), "functions"])
    }

    fn def_hook(&mut self, hook: &str, body: &str) -> Result<()> {
        let tag_path = VirtualPath::from_segments(["minecraft", "tags", "functions"])?
            .child(&format!("{}.json", hook))?;
        let function = format!("{}:{}", self.namespace(), hook);
        let script_path = self.functions_folder()?.child(&format!("{}.mcfunction", hook))?;

        info!("Defining {} function {}", hook, function);
        self.ctx.stage_json(tag_path, json!({"values": [function]}));
        self.ctx.stage_text(script_path, body);
        Ok(())
    }

    /// Stage the load function and its `minecraft:load` function tag
    pub fn def_load(&mut self, body: Option<&str>) -> Result<()> {
        let body = body.map_or_else(|| default_load_body(&self.name), str::to_string);
        self.def_hook("load", &body)
    }

    /// Stage the tick function and its `minecraft:tick` function tag
    pub fn def_tick(&mut self, body: Option<&str>) -> Result<()> {
        self.def_hook("tick", body.unwrap_or(DEFAULT_TICK_BODY))
    }

    /// Stage `<namespace>/functions/<name>.mcfunction`. `name` may contain
    /// `/` to nest the function in subfolders.
    pub fn def_func(&mut self, name: &str, body: Option<&str>) -> Result<VirtualPath> {
        let path = self.functions_folder()?.join(&format!("{}.mcfunction", name))?;
        info!("Defining function {}:{}", self.namespace(), name);
        self.ctx
            .stage_text(path.clone(), body.unwrap_or(DEFAULT_FUNCTION_BODY));
        Ok(path)
    }

    /// Hide the recipe producing `id` in its own namespace and rewrite
    /// `pack.mcmeta` with the new filter.
    pub fn remove_recipe(&mut self, id: &str) -> Result<()> {
        let id = ResourceId::parse(id)?;
        info!(
            "The recipe in namespace {} of {} has been removed",
            id.namespace(),
            id.path()
        );
        self.ctx.add_filter(Filter {
            namespace: id.namespace().to_string(),
            path: format!("recipe/{}.json", id.path()),
        });
        self.write_mcmeta()
    }

    /// Recipe builders for this session
    pub fn recipes(&mut self) -> Recipes<'_> {
        Recipes::new(&mut self.ctx)
    }

    /// Elixirum builders for this session
    pub fn elixirum(&mut self) -> Elixirum<'_> {
        Elixirum::new(&mut self.ctx)
    }

    /// Generic tag helpers for this session
    pub fn tags(&mut self) -> Tags<'_> {
        Tags::new(&mut self.ctx)
    }

    /// Merge tag contributions into staged documents without saving
    pub fn confirm_tags(&mut self) -> Result<usize> {
        self.ctx.confirm_tags()
    }

    /// Stage everything a manifest describes.
    pub fn apply(&mut self, manifest: &Manifest) -> Result<()> {
        if let Some(load) = manifest.load.as_ref().filter(|s| s.is_enabled()) {
            self.def_load(load.body())?;
        }
        if let Some(tick) = manifest.tick.as_ref().filter(|s| s.is_enabled()) {
            self.def_tick(tick.body())?;
        }
        for function in &manifest.functions {
            self.def_func(&function.name, function.body.as_deref())?;
        }

        for op in &manifest.recipes {
            debug!("Applying {} recipe", op.kind());
            match op {
                RecipeOp::Shaped { shaped } => self.recipes().shaped(shaped).map(drop)?,
                RecipeOp::Shapeless { shapeless } => self.recipes().shapeless(shapeless).map(drop)?,
                RecipeOp::Smelting { smelting } => self.recipes().smelting(smelting).map(drop)?,
                RecipeOp::Blasting { blasting } => self.recipes().blasting(blasting).map(drop)?,
                RecipeOp::Smoking { smoking } => self.recipes().smoking(smoking).map(drop)?,
                RecipeOp::CampfireCooking { campfire_cooking } => {
                    self.recipes().campfire_cooking(campfire_cooking).map(drop)?
                }
                RecipeOp::Stonecutting { stonecutting } => {
                    self.recipes().stonecutting(stonecutting).map(drop)?
                }
                RecipeOp::Smithing { smithing } => self.recipes().smithing(smithing).map(drop)?,
                RecipeOp::Remove { remove } => self.remove_recipe(remove)?,
            }
        }

        for tag in &manifest.tags {
            let mut tags = self.tags();
            match (tag.replace, tag.namespace.as_deref()) {
                (true, namespace) => {
                    tags.replace_tag(namespace, &tag.name, &tag.tag_type, tag.values.clone())
                }
                (false, Some(namespace)) => {
                    tags.new_tag_in(namespace, &tag.name, &tag.tag_type, tag.values.clone())
                }
                (false, None) => tags.new_tag(&tag.name, &tag.tag_type, tag.values.clone()),
            }
        }

        if let Some(def) = &manifest.elixirum {
            let mut elixirum = self.elixirum();
            for essence in &def.essences {
                elixirum.new_essence(essence)?;
            }
            for preset in &def.ingredient_presets {
                elixirum.new_ingredient_preset(preset)?;
            }
            for document in &def.configured_elixirs {
                elixirum.new_configured_elixir(document)?;
            }
            if !def.heat_sources.is_empty() {
                elixirum.new_heat_source(def.heat_sources.clone());
            }
            if !def.blacklist.is_empty() {
                elixirum.add_to_blacklist(def.blacklist.clone());
            }
            if !def.whitelist.is_empty() {
                elixirum.add_to_whitelist(def.whitelist.clone());
            }
            if !def.shelf_placeable.is_empty() {
                elixirum.make_shelf_placeable(def.shelf_placeable.clone());
            }
        }
        Ok(())
    }

    /// Confirm tags, flush the session and, in archive mode, zip it.
    ///
    /// The staging directory is removed when the session is dropped, which
    /// happens on every return path.
    pub fn save(mut self) -> Result<SaveReport> {
        let tags = self.ctx.confirm_tags()?;
        let FlushReport { folders, files } =
            flush::execute(&self.ctx, &self.base_path.join("data"))?;
        info!("Saved {} folders and {} files", folders, files);

        let archive = match self.destination {
            Destination::Archive => {
                let archive_path = self.output_dir.join(format!("{}.zip", self.name));
                archive::create_zip(&self.base_path, &archive_path)?;
                Some(archive_path)
            }
            Destination::Directory | Destination::Discard => None,
        };
        let pack_dir = self
            .staging
            .is_none()
            .then(|| self.base_path.clone());

        Ok(SaveReport {
            folders,
            files,
            tags,
            pack_dir,
            archive,
        })
    }
}
