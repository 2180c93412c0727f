//! Certificate store: filesystem persistence of records and rendered PNGs.
//!
//! On-disk layout under the certs directory:
//!   {id}.json  — the certificate record
//!   {id}.png   — the rendered image
//!
//! The engine never touches this store; it only ever sees byte buffers.

use std::{
    io::{Cursor, Write as _},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("zip: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("certificate not found: {0}")]
    NotFound(String),
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CertRecord {
    pub id: String,
    pub name: String,
    pub usn: String,
    pub institution: String,
    pub event_type: String,
    pub event_date: String,
    pub hours: u32,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

pub struct CertStore {
    dir: PathBuf,
}

impl CertStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist the PNG first, then the record, so a stored record never
    /// points at a missing image.
    pub fn save(&self, record: &CertRecord, png: &[u8]) -> Result<(), StoreError> {
        let png_out = maybe_optimize(png);
        std::fs::write(self.png_path(&record.id), png_out)?;
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(self.record_path(&record.id), json)?;
        Ok(())
    }

    pub fn record(&self, id: &str) -> Result<CertRecord, StoreError> {
        check_id(id)?;
        let path = self.record_path(id);
        let text = std::fs::read_to_string(&path)
            .map_err(|e| not_found_or_io(e, id))?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn png(&self, id: &str) -> Result<Vec<u8>, StoreError> {
        check_id(id)?;
        std::fs::read(self.png_path(id)).map_err(|e| not_found_or_io(e, id))
    }

    /// All records, newest first.
    pub fn list(&self) -> Result<Vec<CertRecord>, StoreError> {
        let mut records = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let text = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<CertRecord>(&text) {
                Ok(r) => records.push(r),
                Err(e) => tracing::warn!("skipping unreadable record {}: {e}", path.display()),
            }
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Every stored PNG bundled into one ZIP archive.
    pub fn bundle_zip(&self) -> Result<Vec<u8>, StoreError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for record in self.list()? {
            let png = self.png(&record.id)?;
            writer.start_file(record.filename.clone(), options)?;
            writer.write_all(&png)?;
        }
        Ok(writer.finish()?.into_inner())
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn png_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.png"))
    }
}

/// Ids come straight from URL path parameters; only UUID-shaped input may
/// reach the filesystem.
fn check_id(id: &str) -> Result<(), StoreError> {
    let ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if ok {
        Ok(())
    } else {
        Err(StoreError::NotFound(id.to_string()))
    }
}

fn not_found_or_io(e: std::io::Error, id: &str) -> StoreError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StoreError::NotFound(id.to_string())
    } else {
        StoreError::Io(e)
    }
}

/// Lossless PNG optimization at store time. Certificates are written once
/// and served many times, so the extra CPU happens on the cold path.
/// Disable with CERT_STORE_OPTIMIZE=0.
fn maybe_optimize(png: &[u8]) -> Vec<u8> {
    let enabled = std::env::var("CERT_STORE_OPTIMIZE")
        .map(|v| !(v == "0" || v.eq_ignore_ascii_case("false")))
        .unwrap_or(true);
    if !enabled {
        return png.to_vec();
    }

    let level = std::env::var("CERT_STORE_OXIPNG_LEVEL")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(2)
        .min(6);

    let mut opts = oxipng::Options::from_preset(level);
    opts.fix_errors = true;

    match oxipng::optimize_from_memory(png, &opts) {
        Ok(out) => out,
        Err(_) => png.to_vec(),
    }
}
