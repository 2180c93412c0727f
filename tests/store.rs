use std::io::Read;

use chrono::{TimeZone, Utc};
use certgen::store::{CertRecord, CertStore, StoreError};
use image::{ImageBuffer, ImageEncoder, Rgb};

fn tiny_png() -> Vec<u8> {
    let img = ImageBuffer::from_pixel(4, 4, Rgb([10u8, 20, 30]));
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(img.as_raw(), 4, 4, image::ColorType::Rgb8)
        .unwrap();
    png
}

fn record(id: &str, ts: i64) -> CertRecord {
    CertRecord {
        id: id.into(),
        name: "Asha Rao".into(),
        usn: "1RV21CS001".into(),
        institution: "RV College".into(),
        event_type: "Workshop on Graph Algorithms".into(),
        event_date: "2024-03-15".into(),
        hours: 3,
        filename: format!("{id}.png"),
        created_at: Utc.timestamp_opt(ts, 0).unwrap(),
    }
}

#[test]
fn save_then_load_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let store = CertStore::open(dir.path()).unwrap();

    store.save(&record("cert-a", 1_700_000_000), &tiny_png()).unwrap();

    let loaded = store.record("cert-a").unwrap();
    assert_eq!(loaded.name, "Asha Rao");
    assert_eq!(loaded.hours, 3);
    assert_eq!(loaded.filename, "cert-a.png");

    let png = store.png("cert-a").unwrap();
    let img = image::load_from_memory(&png).expect("stored image stays decodable");
    assert_eq!(img.width(), 4);
}

#[test]
fn list_returns_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let store = CertStore::open(dir.path()).unwrap();

    store.save(&record("older", 1_700_000_000), &tiny_png()).unwrap();
    store.save(&record("newer", 1_700_000_100), &tiny_png()).unwrap();

    let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["newer".to_string(), "older".to_string()]);
}

#[test]
fn unknown_and_malformed_ids_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = CertStore::open(dir.path()).unwrap();

    assert!(matches!(store.record("missing"), Err(StoreError::NotFound(_))));
    assert!(matches!(store.png("missing"), Err(StoreError::NotFound(_))));
    // Path-shaped ids never reach the filesystem.
    assert!(matches!(
        store.record("../escape"),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn zip_bundle_contains_every_png() {
    let dir = tempfile::tempdir().unwrap();
    let store = CertStore::open(dir.path()).unwrap();

    store.save(&record("cert-a", 1_700_000_000), &tiny_png()).unwrap();
    store.save(&record("cert-b", 1_700_000_100), &tiny_png()).unwrap();

    let bytes = store.bundle_zip().unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);

    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["cert-a.png".to_string(), "cert-b.png".to_string()]);

    let mut entry = archive.by_name("cert-a.png").unwrap();
    let mut content = Vec::new();
    entry.read_to_end(&mut content).unwrap();
    assert!(image::load_from_memory(&content).is_ok());
}
