//! On-disk envelope and file round-trips.
//!
//! ```json
//! {
//!   "metadata": {"version": "1.0", "created": "2024-05-01T12:00:00Z", "data_structure": "AVLTree"},
//!   "data": {"type": "AVLTree", "data": ...}
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use dsviz_trees::LoadMode;

use crate::document::{LoadedTree, TreeDocument};
use crate::error::StoreError;

/// Envelope version written by [`save_to_file`] and accepted on load.
pub const FORMAT_VERSION: &str = "1.0";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: String,
    /// RFC 3339, UTC.
    pub created: String,
    /// Copy of the document's `"type"` tag.
    pub data_structure: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub metadata: Metadata,
    pub data: TreeDocument<T>,
}

impl<T> Envelope<T> {
    /// Wraps `data`, stamped with the current time.
    pub fn new(data: TreeDocument<T>) -> Result<Self, StoreError> {
        let created = OffsetDateTime::now_utc().format(&Rfc3339)?;
        Ok(Self {
            metadata: Metadata {
                version: FORMAT_VERSION.to_string(),
                created,
                data_structure: data.type_name().to_string(),
            },
            data,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    /// Two-space indented output.
    pub pretty: bool,
    /// How AVL documents are turned back into trees.
    pub load_mode: LoadMode,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            load_mode: LoadMode::Verify,
        }
    }
}

pub fn to_json_string<T: Serialize + Clone>(
    doc: &TreeDocument<T>,
    options: &StoreOptions,
) -> Result<String, StoreError> {
    let envelope = Envelope::new(doc.clone())?;
    let json = if options.pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    Ok(json)
}

/// Envelope as parsed, before the document's `"type"` is resolved.
#[derive(Deserialize)]
struct RawEnvelope {
    metadata: Metadata,
    data: RawDocument,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    codes: BTreeMap<char, String>,
}

const DOCUMENT_TYPES: &[&str] = &["BinaryTree", "BinarySearchTree", "AVLTree", "HuffmanTree"];

impl RawDocument {
    fn resolve<T: DeserializeOwned>(self) -> Result<TreeDocument<T>, serde_json::Error> {
        let doc = match self.kind.as_str() {
            "BinaryTree" => TreeDocument::BinaryTree {
                data: deep_from_value(self.data)?,
            },
            "BinarySearchTree" => TreeDocument::BinarySearchTree {
                data: deep_from_value(self.data)?,
            },
            "AVLTree" => TreeDocument::AvlTree {
                data: deep_from_value(self.data)?,
            },
            "HuffmanTree" => TreeDocument::HuffmanTree {
                data: deep_from_value(self.data)?,
                codes: self.codes,
            },
            other => {
                return Err(de::Error::unknown_variant(other, DOCUMENT_TYPES));
            }
        };
        Ok(doc)
    }
}

// Every snapshot level is one level of JSON nesting: the parser's depth limit
// is lifted and the stack grows on demand, so degenerate trees load back.
fn deep_from_str<D: DeserializeOwned>(json: &str) -> Result<D, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let parsed = D::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(parsed)
}

fn deep_from_value<D: DeserializeOwned>(value: Value) -> Result<D, serde_json::Error> {
    D::deserialize(serde_stacker::Deserializer::new(value))
}

/// Parses an envelope and returns its document.
///
/// The snapshot is read straight into its typed form without buffering, so
/// nesting depth is bounded only by memory.
pub fn from_json_str<T: DeserializeOwned>(json: &str) -> Result<TreeDocument<T>, StoreError> {
    let raw: RawEnvelope = deep_from_str(json)?;
    let metadata = raw.metadata;
    if metadata.version != FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion(metadata.version));
    }
    let doc = raw.data.resolve()?;
    if metadata.data_structure != doc.type_name() {
        warn!(
            "store: metadata says {} but document is {}",
            metadata.data_structure,
            doc.type_name()
        );
    }
    Ok(doc)
}

pub fn save_to_file<T: Serialize + Clone>(
    doc: &TreeDocument<T>,
    path: impl AsRef<Path>,
    options: &StoreOptions,
) -> Result<(), StoreError> {
    let path = path.as_ref();
    let json = to_json_string(doc, options)?;
    fs::write(path, json)?;
    debug!(
        "store: saved {} ({} nodes) to {}",
        doc.type_name(),
        doc.node_count(),
        path.display()
    );
    Ok(())
}

pub fn load_from_file<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<TreeDocument<T>, StoreError> {
    let path = path.as_ref();
    let doc = from_json_str(&fs::read_to_string(path)?)?;
    debug!("store: loaded {} from {}", doc.type_name(), path.display());
    Ok(doc)
}

/// [`load_from_file`] followed by [`TreeDocument::into_tree`].
pub fn load_tree_from_file<T>(
    path: impl AsRef<Path>,
    options: &StoreOptions,
) -> Result<LoadedTree<T>, StoreError>
where
    T: DeserializeOwned + PartialOrd + Clone,
{
    let doc: TreeDocument<T> = load_from_file(path)?;
    Ok(doc.into_tree(options.load_mode)?)
}
