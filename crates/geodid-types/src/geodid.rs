use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const DID_SCHEME: &str = "did:";

/// Hierarchical identifier for a document node.
///
/// GeoDIDs take the form `did:<method>:<specific-id>` with child nodes
/// appended as `/<path>` segments (`did:geo:abc/item1`). A bare
/// `<method>:<rest>` string is also accepted so that foreign identifier
/// schemes can reach the resolution protocol and be rejected there by
/// method rather than by syntax.
///
/// A `GeoDid` is immutable once constructed; the method prefix is validated
/// on parse and cached.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GeoDid {
    value: String,
    method_end: usize,
    method_start: usize,
}

impl GeoDid {
    /// Parse and validate an identifier.
    pub fn parse(value: impl Into<String>) -> Result<Self, TypeError> {
        let value = value.into();
        let invalid = |reason: &str| TypeError::InvalidIdentifier {
            value: value.clone(),
            reason: reason.to_string(),
        };

        if value.is_empty() {
            return Err(invalid("identifier is empty"));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(invalid("identifier contains whitespace"));
        }

        let method_start = if value.starts_with(DID_SCHEME) {
            DID_SCHEME.len()
        } else {
            0
        };
        let rest = &value[method_start..];
        let colon = rest
            .find(':')
            .ok_or_else(|| invalid("missing method prefix"))?;
        let method = &rest[..colon];
        if method.is_empty() {
            return Err(invalid("method is empty"));
        }
        if !method
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(invalid("method must be lowercase alphanumeric"));
        }
        if rest[colon + 1..].is_empty() {
            return Err(invalid("method-specific id is empty"));
        }

        Ok(Self {
            method_start,
            method_end: method_start + colon,
            value,
        })
    }

    /// The identifier method (`"geo"` for `did:geo:abc`).
    pub fn method(&self) -> &str {
        &self.value[self.method_start..self.method_end]
    }

    /// The full identifier string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Identifier of a child node at `path` beneath this one.
    pub fn child(&self, path: &str) -> Result<Self, TypeError> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Err(TypeError::InvalidIdentifier {
                value: format!("{}/", self.value),
                reason: "child path is empty".into(),
            });
        }
        Self::parse(format!("{}/{path}", self.value))
    }

    /// Concatenate a raw suffix onto the identifier.
    ///
    /// Service reference ids are built this way: `identifier + asset name`.
    pub fn join(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.value)
    }

    /// Returns `true` if this identifier has at least one child path segment.
    pub fn is_child(&self) -> bool {
        self.value[self.method_end + 1..].contains('/')
    }
}

impl fmt::Debug for GeoDid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoDid({})", self.value)
    }
}

impl fmt::Display for GeoDid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromStr for GeoDid {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for GeoDid {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<GeoDid> for String {
    fn from(id: GeoDid) -> Self {
        id.value
    }
}

/// Type discriminator carried in every document's metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoDidKind {
    /// A grouping node; may have children but no assets.
    Collection,
    /// A leaf node that may carry assets as service references.
    Item,
    /// A generic document node.
    Document,
}

impl GeoDidKind {
    /// Returns `true` if assets may be attached to documents of this kind.
    pub fn is_attachable(&self) -> bool {
        matches!(self, Self::Item)
    }

    /// The canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Item => "item",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for GeoDidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeoDidKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "collection" => Ok(Self::Collection),
            "item" => Ok(Self::Item),
            "document" => Ok(Self::Document),
            _ => Err(TypeError::UnknownKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_did_geo_method() {
        let id = GeoDid::parse("did:geo:abc123").unwrap();
        assert_eq!(id.method(), "geo");
        assert_eq!(id.as_str(), "did:geo:abc123");
        assert!(!id.is_child());
    }

    #[test]
    fn parses_bare_method_prefix() {
        let id = GeoDid::parse("foo:bar").unwrap();
        assert_eq!(id.method(), "foo");
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for bad in ["", "did:", "did::abc", "did:geo:", "nocolon", "did:Geo:x", "did:geo:a b"] {
            assert!(
                matches!(GeoDid::parse(bad), Err(TypeError::InvalidIdentifier { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn child_appends_path_segment() {
        let root = GeoDid::parse("did:geo:root").unwrap();
        let child = root.child("item1").unwrap();
        assert_eq!(child.as_str(), "did:geo:root/item1");
        assert_eq!(child.method(), "geo");
        assert!(child.is_child());
        assert!(root.child("/").is_err());
    }

    #[test]
    fn join_concatenates_without_separator() {
        let id = GeoDid::parse("did:geo:root/item1").unwrap();
        assert_eq!(id.join("photo"), "did:geo:root/item1photo");
    }

    #[test]
    fn serde_as_plain_string() {
        let id = GeoDid::parse("did:geo:xyz").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"did:geo:xyz\"");
        let back: GeoDid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<GeoDid>("\"not-an-id\"").is_err());
    }

    #[test]
    fn kind_parsing_and_attachability() {
        assert_eq!("Item".parse::<GeoDidKind>().unwrap(), GeoDidKind::Item);
        assert_eq!(
            "collection".parse::<GeoDidKind>().unwrap(),
            GeoDidKind::Collection
        );
        assert!(GeoDidKind::Item.is_attachable());
        assert!(!GeoDidKind::Collection.is_attachable());
        assert!(!GeoDidKind::Document.is_attachable());
        assert_eq!(
            "polygon".parse::<GeoDidKind>(),
            Err(TypeError::UnknownKind("polygon".into()))
        );
    }
}
