//! Shared application state, built once at startup from the environment.

use std::{path::PathBuf, sync::Arc};

use crate::{
    apikey::OperatorKeys,
    assets::Assets,
    cert::{compose::hex_color, CertError, LayoutConfig, RenderConfig},
    store::{CertStore, StoreError},
};

#[derive(thiserror::Error, Debug)]
pub enum StateError {
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("assets: {0}")]
    Assets(#[from] CertError),
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CertStore>,
    pub assets: Arc<Assets>,
    pub keys: Arc<OperatorKeys>,
    pub render: RenderConfig,
    /// Public base URL verification payloads point back at.
    pub base_url: String,
}

impl AppState {
    pub fn from_env() -> Result<Self, StateError> {
        let certs_dir = std::env::var("CERTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("certs"));
        let store = CertStore::open(certs_dir)?;

        let assets = Assets::load()?;

        let keys_path = std::env::var("APIKEYS").ok();
        let keys = OperatorKeys::load(keys_path.as_deref());

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        let mut render = RenderConfig {
            layout: LayoutConfig {
                scale: scale_factor(),
                ..LayoutConfig::default()
            },
            ..RenderConfig::default()
        };
        if let Ok(accent) = std::env::var("CERT_ACCENT") {
            render.theme.accent = hex_color(&accent)?;
        }

        Ok(Self {
            store: Arc::new(store),
            assets: Arc::new(assets),
            keys: Arc::new(keys),
            render,
            base_url,
        })
    }
}

fn scale_factor() -> f32 {
    std::env::var("SCALE_FACTOR")
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(1.0)
}
