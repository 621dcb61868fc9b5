//! # Deferred Tag Aggregation
//!
//! Tag documents such as a blacklist or a set of heat-source blocks are
//! typically appended to from many independent call sites. Instead of writing
//! a tag file on every call, each call records a [`TagContribution`]; when the
//! session is saved, [`TagAggregator::confirm`] merges every contribution that
//! shares a tag name and namespace into one document and stages it.
//!
//! ## Merge rules
//!
//! 1.  Whitelisted ids that appear in the seed blacklist are removed (once
//!     each) from it, and the remaining seed is appended as a synthetic
//!     `essence_blacklist` contribution with `replace: true`. Whitelisting
//!     only ids outside the seed leaves the seed untouched and adds nothing.
//!     Whitelisted ids are also dropped from the merged `elixirum` blacklist,
//!     so a whitelist always wins over a blacklist contribution regardless of
//!     call order.
//! 2.  Tag names are visited in [`TagRegistry`] order. Contributions to a name
//!     that was never declared are dropped.
//! 3.  Within one `(name, namespace)` group, ids are concatenated in
//!     contribution order without deduplication, and `replace` is the logical
//!     OR of every contribution's flag.
//! 4.  A non-empty group is written to `<namespace>/tags/<type>/<name>.json`
//!     as `{"replace": bool, "values": [...]}`. Empty groups write nothing.
//!
//! Confirmation never mutates the recorded contributions or the seed, so
//! confirming twice stages byte-identical documents at the same paths.

use std::collections::HashSet;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::context::BuildContext;
use crate::defaults::{DEFAULT_TAG_NAMES, ELIXIRUM_NAMESPACE, ESSENCE_BLACKLIST};
use crate::error::Result;
use crate::filesystem::FileStore;
use crate::path::VirtualPath;
use crate::registry::PathRegistry;

/// One identifier or a list of identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdList {
    One(String),
    Many(Vec<String>),
}

impl IdList {
    /// Iterate the ids; a single id behaves as a one-element list
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            IdList::One(id) => std::slice::from_ref(id),
            IdList::Many(ids) => ids.as_slice(),
        };
        slice.iter().map(String::as_str)
    }

    /// Number of ids
    pub fn len(&self) -> usize {
        match self {
            IdList::One(_) => 1,
            IdList::Many(ids) => ids.len(),
        }
    }

    /// Whether the list holds no ids
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for IdList {
    fn from(id: &str) -> Self {
        IdList::One(id.to_string())
    }
}

impl From<String> for IdList {
    fn from(id: String) -> Self {
        IdList::One(id)
    }
}

impl From<Vec<String>> for IdList {
    fn from(ids: Vec<String>) -> Self {
        IdList::Many(ids)
    }
}

impl From<Vec<&str>> for IdList {
    fn from(ids: Vec<&str>) -> Self {
        IdList::Many(ids.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for IdList {
    fn from(ids: [&str; N]) -> Self {
        IdList::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}

/// A single, unmerged request to include ids in a named tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagContribution {
    pub tag_name: String,
    /// Registry the tag belongs to, e.g. `item` or `block`
    pub tag_type: String,
    pub ids: IdList,
    pub replace: bool,
    /// Namespace override; `None` means the pack's own namespace
    pub namespace: Option<String>,
}

impl TagContribution {
    /// A non-replacing contribution to the pack's own namespace
    pub fn new(tag_name: &str, tag_type: &str, ids: impl Into<IdList>) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            tag_type: tag_type.to_string(),
            ids: ids.into(),
            replace: false,
            namespace: None,
        }
    }

    /// Target `namespace` instead of the pack's own
    pub fn in_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    /// Set the replace flag
    pub fn replacing(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }
}

/// Append-only set of tag names that confirmation will consider
#[derive(Debug, Clone)]
pub struct TagRegistry {
    names: Vec<String>,
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self {
            names: DEFAULT_TAG_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl TagRegistry {
    /// A registry seeded with the default tag names
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a tag name. Returns `false` if it was already known.
    pub fn declare(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Whether `name` is known
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Known names in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// The merged result for one `(name, namespace)` group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTag {
    pub name: String,
    pub tag_type: String,
    pub namespace: String,
    pub replace: bool,
    pub values: Vec<String>,
}

impl MergedTag {
    /// `<namespace>/tags/<type>`
    pub fn folder(&self) -> Result<VirtualPath> {
        VirtualPath::from_segments([self.namespace.as_str(), "tags", self.tag_type.as_str()])
    }

    /// `<namespace>/tags/<type>/<name>.json`
    pub fn path(&self) -> Result<VirtualPath> {
        self.folder()?.child(&format!("{}.json", self.name))
    }

    /// The tag document
    pub fn document(&self) -> JsonValue {
        json!({"replace": self.replace, "values": self.values})
    }
}

/// Collects tag contributions during a session and merges them on confirm
#[derive(Debug, Clone)]
pub struct TagAggregator {
    registry: TagRegistry,
    contributions: Vec<TagContribution>,
    seed_blacklist: Vec<String>,
    whitelisted: Vec<String>,
    seed_removals: Vec<String>,
}

impl TagAggregator {
    /// Create an aggregator over the given static blacklist seed
    pub fn new(seed_blacklist: Vec<String>) -> Self {
        Self {
            registry: TagRegistry::new(),
            contributions: Vec::new(),
            seed_blacklist,
            whitelisted: Vec::new(),
            seed_removals: Vec::new(),
        }
    }

    /// The tag name registry
    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Declare a new tag name so its contributions are merged
    pub fn declare(&mut self, name: &str) -> bool {
        let added = self.registry.declare(name);
        if added {
            debug!("Declared tag \"{}\"", name);
        }
        added
    }

    /// Record a contribution
    pub fn contribute(&mut self, contribution: TagContribution) {
        info!(
            "Creating tag \"{}\" with type \"{}\" and ids {:?}",
            contribution.tag_name, contribution.tag_type, contribution.ids
        );
        self.contributions.push(contribution);
    }

    /// Whitelist ids. Those present in the seed blacklist are queued for
    /// removal from it.
    pub fn remove_from_seed<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            self.whitelisted.push(id.to_string());
            if self.seed_blacklist.iter().any(|seed| seed == id) {
                warn!("Whitelisted item \"{}\" is in the default blacklist, removing it", id);
                self.seed_removals.push(id.to_string());
            }
        }
    }

    /// Contributions recorded so far, in call order
    pub fn contributions(&self) -> &[TagContribution] {
        &self.contributions
    }

    /// Ids queued for removal from the seed blacklist
    pub fn seed_removals(&self) -> &[String] {
        &self.seed_removals
    }

    /// Every whitelisted id, whether or not it was in the seed
    pub fn whitelisted(&self) -> &[String] {
        &self.whitelisted
    }

    /// The seed blacklist with every queued removal applied once.
    pub fn remaining_seed(&self) -> Vec<String> {
        let mut remaining = self.seed_blacklist.clone();
        for id in &self.seed_removals {
            if let Some(index) = remaining.iter().position(|seed| seed == id) {
                remaining.remove(index);
            }
        }
        remaining
    }

    /// Merge every contribution into one document per `(name, namespace)`.
    ///
    /// `default_namespace` is used for contributions without an override.
    pub fn merge(&self, default_namespace: &str) -> Vec<MergedTag> {
        let synthetic = (!self.seed_removals.is_empty()).then(|| {
            TagContribution::new(ESSENCE_BLACKLIST, "item", self.remaining_seed())
                .in_namespace(ELIXIRUM_NAMESPACE)
                .replacing(true)
        });
        let all: Vec<&TagContribution> =
            self.contributions.iter().chain(synthetic.as_ref()).collect();

        for contribution in &all {
            if !self.registry.contains(&contribution.tag_name) {
                warn!(
                    "Dropping contribution to undeclared tag \"{}\"",
                    contribution.tag_name
                );
            }
        }

        let whitelisted: HashSet<&str> = self.whitelisted.iter().map(String::as_str).collect();
        let mut merged = Vec::new();

        for name in self.registry.iter() {
            let in_tag: Vec<&TagContribution> =
                all.iter().copied().filter(|c| c.tag_name == name).collect();

            let mut namespaces: Vec<&str> = Vec::new();
            for contribution in &in_tag {
                let namespace = contribution.namespace.as_deref().unwrap_or(default_namespace);
                if !namespaces.contains(&namespace) {
                    namespaces.push(namespace);
                }
            }

            for namespace in namespaces {
                let group: Vec<&TagContribution> = in_tag
                    .iter()
                    .copied()
                    .filter(|c| c.namespace.as_deref().unwrap_or(default_namespace) == namespace)
                    .collect();

                let tag_type = group[0].tag_type.clone();
                if let Some(other) = group.iter().find(|c| c.tag_type != tag_type) {
                    warn!(
                        "Tag \"{}\" in namespace {} has contributions of type \"{}\" and \"{}\", using \"{}\"",
                        name, namespace, tag_type, other.tag_type, tag_type
                    );
                }

                let mut values: Vec<String> = group
                    .iter()
                    .flat_map(|c| c.ids.iter())
                    .map(str::to_string)
                    .collect();
                if name == ESSENCE_BLACKLIST && namespace == ELIXIRUM_NAMESPACE {
                    values.retain(|id| !whitelisted.contains(id.as_str()));
                }
                if values.is_empty() {
                    continue;
                }

                merged.push(MergedTag {
                    name: name.to_string(),
                    tag_type,
                    namespace: namespace.to_string(),
                    replace: group.iter().any(|c| c.replace),
                    values,
                });
            }
        }

        merged
    }

    /// Merge all contributions and stage the resulting tag documents.
    ///
    /// Returns the number of tag files staged.
    pub fn confirm(
        &self,
        default_namespace: &str,
        folders: &mut PathRegistry,
        files: &mut FileStore,
    ) -> Result<usize> {
        if self.contributions.is_empty() && self.seed_removals.is_empty() {
            info!("No tags to confirm");
            return Ok(0);
        }
        info!("Confirming tags...");

        let merged = self.merge(default_namespace);
        for tag in &merged {
            debug!(
                "Adding tag \"{}\" in namespace {} with ids {:?} and replace {}",
                tag.name, tag.namespace, tag.values, tag.replace
            );
            folders.add_folder_chain(&tag.folder()?);
            files.put_json(tag.path()?, tag.document());
        }
        Ok(merged.len())
    }
}

/// Generic tag helpers bound to a session.
///
/// Each helper declares the tag name first, so the contribution is always
/// merged on confirm.
pub struct Tags<'a> {
    ctx: &'a mut BuildContext,
}

impl<'a> Tags<'a> {
    pub fn new(ctx: &'a mut BuildContext) -> Self {
        Self { ctx }
    }

    /// Contribute to a tag in the pack's own namespace
    pub fn new_tag(&mut self, name: &str, tag_type: &str, ids: impl Into<IdList>) {
        self.ctx.declare_tag(name);
        self.ctx.contribute(TagContribution::new(name, tag_type, ids));
    }

    /// Contribute to a tag in another namespace, e.g. `minecraft`
    pub fn new_tag_in(&mut self, namespace: &str, name: &str, tag_type: &str, ids: impl Into<IdList>) {
        self.ctx.declare_tag(name);
        self.ctx
            .contribute(TagContribution::new(name, tag_type, ids).in_namespace(namespace));
    }

    /// Contribute with `replace: true`, optionally in another namespace
    pub fn replace_tag(
        &mut self,
        namespace: Option<&str>,
        name: &str,
        tag_type: &str,
        ids: impl Into<IdList>,
    ) {
        self.ctx.declare_tag(name);
        let mut contribution = TagContribution::new(name, tag_type, ids).replacing(true);
        if let Some(namespace) = namespace {
            contribution = contribution.in_namespace(namespace);
        }
        self.ctx.contribute(contribution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Vec<String> {
        vec!["minecraft:potion".to_string(), "minecraft:milk_bucket".to_string()]
    }

    fn find<'a>(merged: &'a [MergedTag], name: &str, namespace: &str) -> Option<&'a MergedTag> {
        merged
            .iter()
            .find(|t| t.name == name && t.namespace == namespace)
    }

    #[test]
    fn test_id_list_iter() {
        let one = IdList::from("a");
        let many = IdList::from(vec!["a", "b"]);
        assert_eq!(one.iter().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(many.iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(one.len(), 1);
        assert!(IdList::Many(Vec::new()).is_empty());
    }

    #[test]
    fn test_registry_declare() {
        let mut registry = TagRegistry::new();
        assert!(registry.contains("heat_sources"));
        assert!(registry.declare("logs"));
        assert!(!registry.declare("logs"));
        assert_eq!(registry.iter().last(), Some("logs"));
    }

    #[test]
    fn test_merge_concatenates_without_dedup_and_ors_replace() {
        let mut aggregator = TagAggregator::new(Vec::new());
        aggregator.contribute(TagContribution::new("heat_sources", "block", "a:x"));
        aggregator.contribute(
            TagContribution::new("heat_sources", "block", ["a:y", "a:x"]).replacing(true),
        );
        aggregator.contribute(TagContribution::new("heat_sources", "block", "a:z"));

        let merged = aggregator.merge("pack");
        assert_eq!(merged.len(), 1);
        let tag = &merged[0];
        assert_eq!(tag.values, vec!["a:x", "a:y", "a:x", "a:z"]);
        assert!(tag.replace);
        assert_eq!(tag.namespace, "pack");
        assert_eq!(
            tag.path().unwrap().to_string(),
            "pack/tags/block/heat_sources.json"
        );
    }

    #[test]
    fn test_merge_partitions_by_namespace() {
        let mut aggregator = TagAggregator::new(Vec::new());
        aggregator.contribute(TagContribution::new("shelf_placeable", "item", "a:1"));
        aggregator.contribute(
            TagContribution::new("shelf_placeable", "item", "a:2").in_namespace("elixirum"),
        );
        aggregator.contribute(TagContribution::new("shelf_placeable", "item", "a:3"));

        let merged = aggregator.merge("pack");
        assert_eq!(merged.len(), 2);
        assert_eq!(find(&merged, "shelf_placeable", "pack").unwrap().values, vec!["a:1", "a:3"]);
        assert_eq!(find(&merged, "shelf_placeable", "elixirum").unwrap().values, vec!["a:2"]);
    }

    #[test]
    fn test_undeclared_tag_is_ignored_until_declared() {
        let mut aggregator = TagAggregator::new(Vec::new());
        aggregator.contribute(TagContribution::new("logs", "block", "minecraft:oak_log"));
        assert!(aggregator.merge("pack").is_empty());

        aggregator.declare("logs");
        let merged = aggregator.merge("pack");
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].values, vec!["minecraft:oak_log"]);
    }

    #[test]
    fn test_empty_contribution_writes_nothing() {
        let mut aggregator = TagAggregator::new(Vec::new());
        aggregator.contribute(TagContribution::new("heat_sources", "block", Vec::<String>::new()));
        assert!(aggregator.merge("pack").is_empty());
    }

    #[test]
    fn test_whitelist_overrides_seed_and_contributions() {
        for whitelist_first in [false, true] {
            let mut aggregator = TagAggregator::new(vec![
                "minecraft:potion".to_string(),
                "B".to_string(),
                "minecraft:milk_bucket".to_string(),
            ]);
            let blacklist = TagContribution::new(ESSENCE_BLACKLIST, "item", ["A", "B"])
                .in_namespace(ELIXIRUM_NAMESPACE);
            if whitelist_first {
                aggregator.remove_from_seed(["B"]);
                aggregator.contribute(blacklist);
            } else {
                aggregator.contribute(blacklist);
                aggregator.remove_from_seed(["B"]);
            }

            let merged = aggregator.merge("pack");
            let tag = find(&merged, ESSENCE_BLACKLIST, ELIXIRUM_NAMESPACE).unwrap();
            assert_eq!(tag.values, vec!["A", "minecraft:potion", "minecraft:milk_bucket"]);
            assert!(tag.replace);
        }
    }

    #[test]
    fn test_whitelisting_id_outside_seed_emits_nothing() {
        let mut aggregator = TagAggregator::new(seed());
        aggregator.remove_from_seed(["mod:not_blacklisted"]);
        assert_eq!(aggregator.remaining_seed(), seed());
        assert!(aggregator.seed_removals().is_empty());
        assert_eq!(aggregator.whitelisted(), ["mod:not_blacklisted"]);
        assert!(aggregator.merge("pack").is_empty());

        let mut folders = PathRegistry::new();
        let mut files = FileStore::new();
        assert_eq!(aggregator.confirm("pack", &mut folders, &mut files).unwrap(), 0);
        assert!(files.is_empty());
    }

    #[test]
    fn test_whitelisting_id_outside_seed_still_filters_contributions() {
        let mut aggregator = TagAggregator::new(seed());
        aggregator.contribute(
            TagContribution::new(ESSENCE_BLACKLIST, "item", ["mod:a", "mod:b"])
                .in_namespace(ELIXIRUM_NAMESPACE),
        );
        aggregator.remove_from_seed(["mod:b"]);

        let merged = aggregator.merge("pack");
        let tag = find(&merged, ESSENCE_BLACKLIST, ELIXIRUM_NAMESPACE).unwrap();
        assert_eq!(tag.values, vec!["mod:a"]);
        assert!(!tag.replace);
    }

    #[test]
    fn test_whitelist_only_filters_elixirum_blacklist() {
        let mut aggregator = TagAggregator::new(Vec::new());
        aggregator.contribute(TagContribution::new(ESSENCE_BLACKLIST, "item", ["mod:a", "mod:b"]));
        aggregator.contribute(
            TagContribution::new(ESSENCE_BLACKLIST, "item", ["mod:a", "mod:b"])
                .in_namespace(ELIXIRUM_NAMESPACE),
        );
        aggregator.remove_from_seed(["mod:b"]);

        let merged = aggregator.merge("pack");
        assert_eq!(
            find(&merged, ESSENCE_BLACKLIST, "pack").unwrap().values,
            vec!["mod:a", "mod:b"]
        );
        assert_eq!(
            find(&merged, ESSENCE_BLACKLIST, ELIXIRUM_NAMESPACE).unwrap().values,
            vec!["mod:a"]
        );
    }

    #[test]
    fn test_seed_removal_happens_once_per_request() {
        let mut aggregator = TagAggregator::new(vec![
            "x".to_string(),
            "x".to_string(),
            "y".to_string(),
        ]);
        aggregator.remove_from_seed(["x"]);
        assert_eq!(aggregator.remaining_seed(), vec!["x", "y"]);
    }

    #[test]
    fn test_confirm_stages_documents_and_folders() {
        let mut aggregator = TagAggregator::new(Vec::new());
        aggregator.contribute(TagContribution::new("heat_sources", "block", "create:blaze_burner"));

        let mut folders = PathRegistry::new();
        let mut files = FileStore::new();
        let count = aggregator.confirm("pack", &mut folders, &mut files).unwrap();

        assert_eq!(count, 1);
        let listed: Vec<String> = folders.iter().map(|p| p.to_string()).collect();
        assert_eq!(listed, vec!["pack", "pack/tags", "pack/tags/block"]);
        let path = VirtualPath::parse("pack/tags/block/heat_sources.json").unwrap();
        assert_eq!(
            files.get(&path).and_then(|c| c.as_json()),
            Some(&json!({"replace": false, "values": ["create:blaze_burner"]}))
        );
    }

    #[test]
    fn test_confirm_twice_is_idempotent() {
        let mut aggregator = TagAggregator::new(seed());
        aggregator.contribute(TagContribution::new("heat_sources", "block", "a:b"));
        aggregator.remove_from_seed(["minecraft:potion"]);

        let mut folders = PathRegistry::new();
        let mut files = FileStore::new();
        aggregator.confirm("pack", &mut folders, &mut files).unwrap();
        let first: Vec<_> = files.iter().map(|(p, c)| (p.clone(), c.clone())).collect();
        let folder_count = folders.len();

        aggregator.confirm("pack", &mut folders, &mut files).unwrap();
        let second: Vec<_> = files.iter().map(|(p, c)| (p.clone(), c.clone())).collect();

        assert_eq!(first, second);
        assert_eq!(folders.len(), folder_count);
        assert_eq!(aggregator.contributions().len(), 1);
    }

    #[test]
    fn test_confirm_with_nothing_queued() {
        let aggregator = TagAggregator::new(seed());
        let mut folders = PathRegistry::new();
        let mut files = FileStore::new();
        assert_eq!(aggregator.confirm("pack", &mut folders, &mut files).unwrap(), 0);
        assert!(files.is_empty());
        assert!(folders.is_empty());
    }

    #[test]
    fn test_tags_helper_declares_and_targets_namespaces() {
        let mut ctx = BuildContext::new("pack", Vec::new()).unwrap();
        {
            let mut tags = Tags::new(&mut ctx);
            tags.new_tag("logs", "block", ["minecraft:oak_log", "minecraft:birch_log"]);
            tags.new_tag_in("minecraft", "logs", "block", "minecraft:spruce_log");
            tags.replace_tag(None, "gems", "item", "minecraft:diamond");
        }
        assert_eq!(ctx.confirm_tags().unwrap(), 3);

        let logs = VirtualPath::parse("pack/tags/block/logs.json").unwrap();
        let vanilla = VirtualPath::parse("minecraft/tags/block/logs.json").unwrap();
        let gems = VirtualPath::parse("pack/tags/item/gems.json").unwrap();
        assert_eq!(
            ctx.files().get(&logs).and_then(|c| c.as_json()).cloned().unwrap(),
            json!({"replace": false, "values": ["minecraft:oak_log", "minecraft:birch_log"]})
        );
        assert!(ctx.files().contains(&vanilla));
        assert_eq!(
            ctx.files().get(&gems).and_then(|c| c.as_json()).cloned().unwrap()["replace"],
            json!(true)
        );
    }
}
