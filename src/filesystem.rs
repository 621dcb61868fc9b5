//! In-memory file store for staged artifacts
//!
//! Every document a session produces is staged here before flush. The store
//! is an explicit ordered map: a `Vec` records first-insertion order and a
//! `HashMap` holds the current content. Writing to an existing path replaces
//! the content in place (last-write-wins) without moving the entry, so flush
//! order is always the order in which each path was first staged.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::path::VirtualPath;

/// Indentation used for every JSON document written to disk
const JSON_INDENT: &[u8] = b"    ";

/// The kind of a staged file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A JSON document, pretty-printed on flush
    Json,
    /// Verbatim UTF-8 text (command scripts)
    Text,
}

/// Content of a staged file
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Json(JsonValue),
    Text(String),
}

impl Content {
    /// The kind of this content
    pub fn kind(&self) -> FileKind {
        match self {
            Content::Json(_) => FileKind::Json,
            Content::Text(_) => FileKind::Text,
        }
    }

    /// The JSON payload, if this is a JSON document
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Content::Json(value) => Some(value),
            Content::Text(_) => None,
        }
    }

    /// The text payload, if this is a text file
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Json(_) => None,
            Content::Text(text) => Some(text),
        }
    }

    /// Serialize the content to the bytes written on disk.
    pub fn render(&self) -> Result<Vec<u8>> {
        match self {
            Content::Json(value) => to_pretty_json(value),
            Content::Text(text) => Ok(text.as_bytes().to_vec()),
        }
    }
}

/// Serialize a value as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Insertion-ordered, last-write-wins store of staged files
#[derive(Debug, Clone, Default)]
pub struct FileStore {
    order: Vec<VirtualPath>,
    entries: HashMap<VirtualPath, Content>,
}

impl FileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `content` at `path`, replacing any previous content.
    ///
    /// Returns the replaced content, if any. A replaced entry keeps its
    /// original position in iteration order.
    pub fn put(&mut self, path: VirtualPath, content: Content) -> Option<Content> {
        if let Some(existing) = self.entries.get_mut(&path) {
            return Some(std::mem::replace(existing, content));
        }
        self.order.push(path.clone());
        self.entries.insert(path, content);
        None
    }

    /// Stage a JSON document
    pub fn put_json(&mut self, path: VirtualPath, value: JsonValue) -> Option<Content> {
        self.put(path, Content::Json(value))
    }

    /// Stage a text file
    pub fn put_text(&mut self, path: VirtualPath, text: impl Into<String>) -> Option<Content> {
        self.put(path, Content::Text(text.into()))
    }

    /// Get the content staged at `path`
    pub fn get(&self, path: &VirtualPath) -> Option<&Content> {
        self.entries.get(path)
    }

    /// Check if a file is staged at `path`
    pub fn contains(&self, path: &VirtualPath) -> bool {
        self.entries.contains_key(path)
    }

    /// Position of `path` in flush order
    pub fn position(&self, path: &VirtualPath) -> Option<usize> {
        self.order.iter().position(|p| p == path)
    }

    /// Iterate over staged files in first-insertion order.
    ///
    /// The iterator borrows the store, so it can be recreated any number of
    /// times and always yields the same sequence.
    pub fn iter(&self) -> impl Iterator<Item = (&VirtualPath, &Content)> {
        self.order.iter().filter_map(move |path| {
            self.entries.get(path).map(|content| (path, content))
        })
    }

    /// Get the number of staged files
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if nothing is staged
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
