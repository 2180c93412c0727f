//! Certificate composition engine.
//!
//! Stateless, single-pass rendering: the layout engine derives the page
//! geometry from a canvas configuration, the compositor draws every element
//! back-to-front onto a fresh surface and encodes it as PNG. Rendering is a
//! pure function of (request, verification payload, config, asset bytes), so
//! a certificate can be regenerated bit-identically from stored metadata.

pub mod code;
pub mod compose;
pub mod layout;
pub mod text;

use thiserror::Error;

pub use compose::{render, RenderConfig, Theme};
pub use layout::{Layout, LayoutConfig, Rect};

#[derive(Debug, Error)]
pub enum CertError {
    #[error("invalid dimensions: {0}")]
    InvalidDimension(String),
    #[error("asset: {0}")]
    AssetLoad(String),
    #[error("encoding: {0}")]
    Encoding(String),
}

/// Validated recipient/event input. Built once at the HTTP boundary;
/// the engine itself never touches raw form data.
#[derive(Clone, Debug)]
pub struct CertificateRequest {
    pub name: String,
    pub usn: String,
    pub institution: String,
    pub event_type: String,
    /// Opaque display string, never parsed.
    pub event_date: String,
    pub hours: u32,
}

/// Output of one render call. Ownership moves to the caller, which is
/// responsible for persisting or streaming the buffer.
pub struct RenderedCertificate {
    pub png: Vec<u8>,
    /// The payload actually embedded in the scannable code.
    pub verification_payload: String,
}
