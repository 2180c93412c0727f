//! HTTP handlers. Thin: validate input, call the engine/store, map errors.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    cert::{self, CertificateRequest},
    state::AppState,
    store::{CertRecord, StoreError},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub name: String,
    pub usn: String,
    pub institution: String,
    pub event_type: String,
    pub event_date: String,
    pub hours: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub cert: CertRecord,
    pub verify_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ViewResponse {
    pub cert: CertRecord,
    pub image_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[utoipa::path(get, path = "/health", tag = "certgen", responses((status=200, body=HealthResponse)))]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok".into() })
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-API-Key")
        .or_else(|| headers.get("x-api-key"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn verify_api_key(st: &AppState, headers: &HeaderMap) -> Result<String, (StatusCode, String)> {
    let key = extract_api_key(headers).ok_or((
        StatusCode::UNAUTHORIZED,
        "API key required. Please provide X-API-Key header".to_string(),
    ))?;
    if !st.keys.validate(&key) {
        return Err((StatusCode::UNAUTHORIZED, "Invalid API key".to_string()));
    }
    Ok(st.keys.operator(&key).unwrap_or_else(|| "operator".into()))
}

fn store_status(e: StoreError) -> (StatusCode, String) {
    match e {
        StoreError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            format!("certificate not found: {id}"),
        ),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

fn validate(req: &GenerateRequest) -> Result<(), (StatusCode, String)> {
    let fields = [
        ("name", &req.name),
        ("usn", &req.usn),
        ("institution", &req.institution),
        ("event_type", &req.event_type),
        ("event_date", &req.event_date),
    ];
    for (label, value) in fields {
        if value.trim().is_empty() {
            return Err((StatusCode::BAD_REQUEST, format!("{label} is required")));
        }
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/certificates",
    tag = "certgen",
    request_body = GenerateRequest,
    params(("X-API-Key" = String, Header, description = "Operator API key")),
    responses(
        (status = 200, body = GenerateResponse),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn generate(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let operator = verify_api_key(&st, &headers)?;
    validate(&req)?;

    let id = Uuid::new_v4().to_string();
    let payload = format!("{}/view/{}", st.base_url.trim_end_matches('/'), id);

    let cert_req = CertificateRequest {
        name: req.name,
        usn: req.usn,
        institution: req.institution,
        event_type: req.event_type,
        event_date: req.event_date,
        hours: req.hours.unwrap_or(0),
    };

    let rendered = cert::render(&st.render, &cert_req, &payload, &st.assets)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let record = CertRecord {
        id: id.clone(),
        name: cert_req.name,
        usn: cert_req.usn,
        institution: cert_req.institution,
        event_type: cert_req.event_type,
        event_date: cert_req.event_date,
        hours: cert_req.hours,
        filename: format!("{id}.png"),
        created_at: Utc::now(),
    };
    st.store.save(&record, &rendered.png).map_err(store_status)?;

    info!(%id, %operator, "generated certificate");
    Ok(Json(GenerateResponse {
        cert: record,
        verify_url: rendered.verification_payload,
    }))
}

#[utoipa::path(
    get,
    path = "/certificates",
    tag = "certgen",
    params(("X-API-Key" = String, Header, description = "Operator API key")),
    responses((status = 200, body = [CertRecord]), (status = 401, description = "Unauthorized"))
)]
pub async fn list(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let _ = verify_api_key(&st, &headers)?;
    let records = st.store.list().map_err(store_status)?;
    Ok(Json(records))
}

/// Public lookup endpoint the verification payload points at.
#[utoipa::path(
    get,
    path = "/view/{id}",
    tag = "certgen",
    params(("id" = String, Path, description = "Certificate id")),
    responses((status = 200, body = ViewResponse), (status = 404, description = "Not found"))
)]
pub async fn view(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = st.store.record(&id).map_err(store_status)?;
    Ok(Json(ViewResponse {
        image_url: format!("/image/{}", record.id),
        cert: record,
    }))
}

#[utoipa::path(
    get,
    path = "/image/{id}",
    tag = "certgen",
    params(("id" = String, Path, description = "Certificate id")),
    responses(
        (status = 200, description = "Certificate PNG", content_type = "image/png"),
        (status = 404, description = "Not found")
    )
)]
pub async fn image(
    State(st): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let png = st.store.png(&id).map_err(store_status)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

#[utoipa::path(
    get,
    path = "/certificates/{id}/download",
    tag = "certgen",
    params(
        ("id" = String, Path, description = "Certificate id"),
        ("X-API-Key" = String, Header, description = "Operator API key")
    ),
    responses(
        (status = 200, description = "Certificate PNG attachment", content_type = "image/png"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    )
)]
pub async fn download(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let _ = verify_api_key(&st, &headers)?;
    let record = st.store.record(&id).map_err(store_status)?;
    let png = st.store.png(&id).map_err(store_status)?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", record.filename),
            ),
        ],
        png,
    ))
}

#[utoipa::path(
    get,
    path = "/certificates/download-all",
    tag = "certgen",
    params(("X-API-Key" = String, Header, description = "Operator API key")),
    responses(
        (status = 200, description = "ZIP of every certificate PNG", content_type = "application/zip"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn download_all(
    State(st): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let _ = verify_api_key(&st, &headers)?;
    let bytes = st.store.bundle_zip().map_err(store_status)?;
    let name = format!("all-certificates-{}.zip", Utc::now().timestamp());
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{name}\""),
            ),
        ],
        bytes,
    ))
}
