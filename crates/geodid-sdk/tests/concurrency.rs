//! Pins racing on the same and on different identifiers.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use geodid_sdk::{AstralClient, ClientConfig, DocumentInfo, GeoDidKind, InMemoryBackend};
use serde_json::json;

fn client() -> (Arc<AstralClient>, Arc<InMemoryBackend>) {
    let backend = Arc::new(InMemoryBackend::new());
    (
        Arc::new(AstralClient::new(backend.clone(), ClientConfig::default())),
        backend,
    )
}

/// Same identifier, different content.
fn variant(info: &DocumentInfo, n: u32) -> DocumentInfo {
    let mut info = info.clone();
    info.document.extra.insert("variant".into(), json!(n));
    info
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_pins_of_one_identifier_serialize() {
    let (client, backend) = client();
    backend.set_latency(Some(Duration::from_millis(2)));
    let base = client.create_genesis_geodid(GeoDidKind::Item).await.unwrap();
    let credential = client.connect(None).await.unwrap().credential().clone();

    let handles = (0..8).map(|n| {
        let client = Arc::clone(&client);
        let info = variant(&base, n);
        let credential = credential.clone();
        tokio::spawn(async move { client.pin_document(&info, Some(credential)).await })
    });
    let pins: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let mut revisions: Vec<u64> = pins.iter().map(|p| p.revision).collect();
    revisions.sort_unstable();
    assert_eq!(revisions, (1..=8).collect::<Vec<_>>());

    let last = pins.iter().max_by_key(|p| p.revision).unwrap();
    let record = client.lookup(&base.geodid).unwrap();
    assert_eq!(record.cid, last.cid);
    assert_eq!(record.revision, 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_identifiers_pin_independently() {
    let (client, _) = client();
    let docs: Vec<DocumentInfo> = join_all(
        (0..6).map(|_| client.create_genesis_geodid(GeoDidKind::Collection)),
    )
    .await
    .into_iter()
    .collect::<Result<_, _>>()
    .unwrap();

    let pins = join_all(docs.iter().map(|d| client.pin_document(d, None))).await;
    for (doc, pin) in docs.iter().zip(pins) {
        let pin = pin.unwrap();
        assert_eq!(pin.geodid, doc.geodid);
        assert_eq!(pin.revision, 1);
    }
    assert_eq!(client.registry().len(), docs.len());
}

#[tokio::test]
async fn identical_repin_is_idempotent() {
    let (client, backend) = client();
    let info = client.create_genesis_geodid(GeoDidKind::Item).await.unwrap();
    let first = client.pin_document(&info, None).await.unwrap();
    let second = client.pin_document(&info, None).await.unwrap();
    assert_eq!(first.cid, second.cid);
    assert!(backend.is_pinned(&first.credential, &first.cid));
    assert_eq!(client.lookup(&info.geodid).unwrap().cid, first.cid);
}

#[tokio::test]
async fn newer_pin_replaces_mapping() {
    let (client, _) = client();
    let info = client.create_genesis_geodid(GeoDidKind::Item).await.unwrap();
    let first = client.pin_document(&info, None).await.unwrap();
    let second = client.pin_document(&variant(&info, 1), None).await.unwrap();
    assert_ne!(first.cid, second.cid);

    let record = client.lookup(&info.geodid).unwrap();
    assert_eq!(record.cid, second.cid);
    assert_eq!(record.credential, first.credential);
    assert_eq!(client.registry().len(), 1);

    let loaded = client.load_document(&info.geodid, None).await.unwrap();
    assert_eq!(loaded.document.document.extra.get("variant"), Some(&json!(1)));
}
