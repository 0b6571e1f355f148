use serde::{Deserialize, Serialize};

use crate::cid::Cid;
use crate::geodid::GeoDid;

/// A caller-supplied blob to be pinned and attached to an item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Vec<u8>,
}

impl Asset {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            data: data.into(),
        }
    }
}

/// Public pointer to a pinned asset, stored in a document's service list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceReference {
    /// `owner identifier + asset name`.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "serviceEndpoint")]
    pub service_endpoint: Cid,
}

impl ServiceReference {
    /// Reference for `asset` pinned at `cid` under `owner`.
    pub fn for_asset(owner: &GeoDid, asset: &Asset, cid: Cid) -> Self {
        Self {
            id: owner.join(&asset.name),
            kind: asset.kind.clone(),
            service_endpoint: cid,
        }
    }
}
