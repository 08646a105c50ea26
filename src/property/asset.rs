//! Assets, archives and resource references.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Urn;

/// An opaque blob reference: inline text, a local path or a remote URI.
///
/// At most one of `text`, `path` and `uri` is expected to be set. `hash` is
/// filled in by the engine once the contents have been read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
    /// Content hash, empty when not yet computed.
    pub hash: String,
    /// Inline text contents.
    pub text: String,
    /// Local file path.
    pub path: String,
    /// Remote URI.
    pub uri: String,
}

impl Asset {
    /// An asset backed by inline text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// An asset backed by a local file.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// An asset backed by a remote URI.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Set the content hash.
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }
}

/// A member of an archive: either a single asset or a nested archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveMember {
    /// A single asset.
    Asset(Asset),
    /// A nested archive.
    Archive(Archive),
}

/// A collection of assets, given either as a map of members, a local path or
/// a remote URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    /// Content hash, empty when not yet computed.
    pub hash: String,
    /// Local path to an archive file or directory.
    pub path: String,
    /// Remote URI of an archive.
    pub uri: String,
    /// Named members of an in-memory archive.
    pub assets: BTreeMap<String, ArchiveMember>,
}

impl Archive {
    /// An archive assembled from named members.
    pub fn from_assets(assets: BTreeMap<String, ArchiveMember>) -> Self {
        Self {
            assets,
            ..Self::default()
        }
    }

    /// An archive backed by a local path.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// An archive backed by a remote URI.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }
}

/// A typed pointer to another resource.
///
/// `id` is `None` for component resources, which have no ID. An ID of `""`
/// means the ID is not yet known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    /// URN of the referenced resource.
    pub urn: Urn,
    /// ID of the referenced resource, if it is a custom resource.
    pub id: Option<String>,
    /// Version of the package that defines the resource, may be empty.
    pub package_version: String,
}

impl ResourceReference {
    /// A reference to a component resource.
    pub fn new(urn: Urn) -> Self {
        Self {
            urn,
            id: None,
            package_version: String::new(),
        }
    }

    /// Attach an ID, making this a custom resource reference.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach the defining package version.
    pub fn with_package_version(mut self, version: impl Into<String>) -> Self {
        self.package_version = version.into();
        self
    }

    /// The type token of the referenced resource.
    pub fn type_token(&self) -> &str {
        self.urn.type_token()
    }

    /// Whether the reference has an ID that is not yet known.
    pub fn has_unknown_id(&self) -> bool {
        matches!(self.id.as_deref(), Some(""))
    }
}
