//! Ordered, deduplicating registry of folders to create at flush time

use std::collections::HashSet;

use crate::path::VirtualPath;

/// The set of folders a session will create, in creation order.
///
/// Iteration yields folders in first-insertion order. Because
/// [`PathRegistry::add_folder_chain`] always inserts a path's ancestors before
/// the path itself, parents are created before children without any sorting.
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    order: Vec<VirtualPath>,
    seen: HashSet<VirtualPath>,
}

impl PathRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single folder. Returns `false` if it was already present.
    pub fn add_folder(&mut self, path: VirtualPath) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.order.push(path);
        true
    }

    /// Register `path` and every one of its ancestors, root first.
    ///
    /// Returns the number of folders that were newly added.
    pub fn add_folder_chain(&mut self, path: &VirtualPath) -> usize {
        path.prefixes()
            .map(|prefix| self.add_folder(prefix))
            .filter(|added| *added)
            .count()
    }

    /// Whether `path` has been registered
    pub fn contains(&self, path: &VirtualPath) -> bool {
        self.seen.contains(path)
    }

    /// Folders in creation order
    pub fn iter(&self) -> impl Iterator<Item = &VirtualPath> {
        self.order.iter()
    }

    /// Number of registered folders
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no folder has been registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<'a> IntoIterator for &'a PathRegistry {
    type Item = &'a VirtualPath;
    type IntoIter = std::slice::Iter<'a, VirtualPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}
