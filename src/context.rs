//! The per-session staging aggregate
//!
//! A [`BuildContext`] owns everything a session stages: the folder registry,
//! the file store, the tag aggregator and the removal filters destined for
//! `pack.mcmeta`. Builders (recipes, tags, elixirum documents) borrow it
//! mutably for the duration of a call instead of sharing aliased collections.
//!
//! A context is single-owner and not meant to be shared across threads.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::filesystem::FileStore;
use crate::path::VirtualPath;
use crate::registry::PathRegistry;
use crate::tags::{IdList, TagAggregator, TagContribution};

/// A `pack.mcmeta` filter entry hiding a file from lower-priority packs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub namespace: String,
    pub path: String,
}

/// Staged state of one build session
#[derive(Debug, Clone)]
pub struct BuildContext {
    namespace: String,
    folders: PathRegistry,
    files: FileStore,
    tags: TagAggregator,
    filters: Vec<Filter>,
}

impl BuildContext {
    /// Create a context for `namespace`, registering the namespace folder.
    pub fn new(namespace: &str, seed_blacklist: Vec<String>) -> Result<Self> {
        let mut folders = PathRegistry::new();
        folders.add_folder(VirtualPath::from_segments([namespace])?);
        Ok(Self {
            namespace: namespace.to_string(),
            folders,
            files: FileStore::new(),
            tags: TagAggregator::new(seed_blacklist),
            filters: Vec::new(),
        })
    }

    /// The pack's own namespace
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn folders(&self) -> &PathRegistry {
        &self.folders
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn tags(&self) -> &TagAggregator {
        &self.tags
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Register a single folder
    pub fn add_folder(&mut self, path: VirtualPath) -> bool {
        self.folders.add_folder(path)
    }

    /// Register a folder and all of its ancestors
    pub fn add_folder_chain(&mut self, path: &VirtualPath) -> usize {
        self.folders.add_folder_chain(path)
    }

    /// Stage a JSON document, registering its containing folders first.
    pub fn stage_json(&mut self, path: VirtualPath, value: JsonValue) {
        if let Some(parent) = path.parent() {
            self.folders.add_folder_chain(&parent);
        }
        self.files.put_json(path, value);
    }

    /// Stage a text file, registering its containing folders first.
    pub fn stage_text(&mut self, path: VirtualPath, text: impl Into<String>) {
        if let Some(parent) = path.parent() {
            self.folders.add_folder_chain(&parent);
        }
        self.files.put_text(path, text);
    }

    /// Declare a tag name so its contributions are written
    pub fn declare_tag(&mut self, name: &str) -> bool {
        self.tags.declare(name)
    }

    /// Queue a tag contribution for confirmation
    pub fn contribute(&mut self, contribution: TagContribution) {
        self.tags.contribute(contribution);
    }

    /// Queue ids for removal from the static blacklist seed
    pub fn remove_from_seed(&mut self, ids: &IdList) {
        self.tags.remove_from_seed(ids.iter());
    }

    /// Record a removal filter
    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Merge queued tag contributions into staged documents.
    pub fn confirm_tags(&mut self) -> Result<usize> {
        self.tags
            .confirm(&self.namespace, &mut self.folders, &mut self.files)
    }
}
