//! GeoDID document payloads.
//!
//! Documents are produced by the hierarchy collaborator and treated as
//! mostly opaque: the pinning core reads only the type discriminator in
//! `didmetadata` and mutates only the `service` list. Unknown top-level
//! fields are carried through untouched so documents built elsewhere
//! survive a pin/resolve round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::asset::ServiceReference;
use crate::error::TypeError;
use crate::geodid::{GeoDid, GeoDidKind};

/// JSON-LD context attached to freshly built documents.
pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Document metadata: type discriminator, timestamps and hierarchy pointers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DidMetadata {
    #[serde(rename = "type")]
    pub kind: GeoDidKind,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    /// Parent identifier for child documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<GeoDid>,
    /// Path of this node beneath its parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A GeoDID document as pinned to and resolved from the content store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoDidDocument {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    pub id: GeoDid,
    #[serde(rename = "didmetadata")]
    pub metadata: DidMetadata,
    #[serde(default)]
    pub service: Vec<ServiceReference>,
    /// Fields this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GeoDidDocument {
    /// A root document with no parent.
    pub fn genesis(id: GeoDid, kind: GeoDidKind, now: DateTime<Utc>) -> Self {
        Self {
            context: vec![DID_CONTEXT.to_string()],
            id,
            metadata: DidMetadata {
                kind,
                created: now,
                updated: now,
                parent: None,
                path: None,
            },
            service: Vec::new(),
            extra: Map::new(),
        }
    }

    /// A child document at `path` beneath `parent`.
    pub fn child(
        id: GeoDid,
        kind: GeoDidKind,
        parent: GeoDid,
        path: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut doc = Self::genesis(id, kind, now);
        doc.metadata.parent = Some(parent);
        doc.metadata.path = Some(path.into());
        doc
    }

    pub fn kind(&self) -> GeoDidKind {
        self.metadata.kind
    }

    /// Returns `true` if a service reference with this id is already present.
    pub fn has_service(&self, id: &str) -> bool {
        self.service.iter().any(|s| s.id == id)
    }

    /// Append service references in order and touch the `updated` stamp.
    pub fn append_services(&mut self, refs: Vec<ServiceReference>, now: DateTime<Utc>) {
        if refs.is_empty() {
            return;
        }
        self.service.extend(refs);
        self.metadata.updated = now;
    }

    /// Serialize to the canonical JSON bytes that get staged.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, TypeError> {
        serde_json::to_vec(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

/// A document together with the identifier it lives under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub geodid: GeoDid,
    pub document: GeoDidDocument,
}

impl DocumentInfo {
    pub fn new(document: GeoDidDocument) -> Self {
        Self {
            geodid: document.id.clone(),
            document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn did(s: &str) -> GeoDid {
        GeoDid::parse(s).unwrap()
    }

    #[test]
    fn json_roundtrip_preserves_document() {
        let now = Utc::now();
        let doc = GeoDidDocument::child(
            did("did:geo:root/item1"),
            GeoDidKind::Item,
            did("did:geo:root"),
            "item1",
            now,
        );
        let bytes = doc.to_json_bytes().unwrap();
        let back = GeoDidDocument::from_json_bytes(&bytes).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn wire_field_names() {
        let doc = GeoDidDocument::genesis(did("did:geo:root"), GeoDidKind::Collection, Utc::now());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["didmetadata"]["type"], "collection");
        assert_eq!(value["@context"][0], DID_CONTEXT);
        assert!(value["didmetadata"].get("parent").is_none());
        assert!(value["service"].as_array().unwrap().is_empty());
    }

    #[test]
    fn unknown_fields_survive_roundtrip() {
        let raw = serde_json::json!({
            "@context": [DID_CONTEXT],
            "id": "did:geo:root",
            "didmetadata": {
                "type": "document",
                "created": "2024-01-01T00:00:00Z",
                "updated": "2024-01-01T00:00:00Z"
            },
            "controller": "0xabc",
            "links": [{"rel": "child"}]
        });
        let doc: GeoDidDocument = serde_json::from_value(raw).unwrap();
        assert!(doc.service.is_empty());
        assert_eq!(doc.extra["controller"], "0xabc");

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["links"][0]["rel"], "child");
    }

    #[test]
    fn append_services_touches_updated() {
        let created = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let later = Utc::now();
        let mut doc = GeoDidDocument::genesis(did("did:geo:i"), GeoDidKind::Item, created);

        doc.append_services(Vec::new(), later);
        assert_eq!(doc.metadata.updated, created);

        doc.append_services(
            vec![ServiceReference {
                id: "did:geo:iphoto".into(),
                kind: "image".into(),
                service_endpoint: "b3aa".into(),
            }],
            later,
        );
        assert_eq!(doc.metadata.updated, later);
        assert!(doc.has_service("did:geo:iphoto"));
    }

    #[test]
    fn malformed_bytes_are_serialization_errors() {
        assert!(matches!(
            GeoDidDocument::from_json_bytes(b"{not json"),
            Err(TypeError::Serialization(_))
        ));
    }
}
