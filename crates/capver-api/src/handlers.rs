//! API Handlers
//!
//! All lookups are fail-open: unknown keys answer 200 with `known: false`.
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use capver_core::{normalize_version, CapabilityVersion, CAPVER_VERSION};
use serde::{Deserialize, Serialize};

use crate::metrics::LookupKind;
use crate::AppState;

/// `n` used when a "latest" query does not specify one
pub const DEFAULT_LATEST: isize = 10;

#[derive(Debug, Deserialize)]
pub struct LatestParams {
    pub n: Option<isize>,
    #[serde(default)]
    pub strip_v: bool,
}

impl LatestParams {
    fn n(&self) -> isize {
        self.n.unwrap_or(DEFAULT_LATEST)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionLookup {
    pub version: String,
    pub capability_version: CapabilityVersion,
    pub known: bool,
    pub supported: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapverLookup {
    pub capability_version: CapabilityVersion,
    pub version: String,
    pub known: bool,
}

pub async fn lookup_version(
    State(state): State<AppState>,
    Path(version): Path<String>,
) -> Json<VersionLookup> {
    let capability_version = state.registry.capability_version_for(&version);
    let known = !capability_version.is_unknown();
    state.metrics.record_lookup(LookupKind::Version, known);

    Json(VersionLookup {
        version: normalize_version(&version).into_owned(),
        capability_version,
        known,
        supported: state.window.is_supported(capability_version),
    })
}

pub async fn lookup_capver(
    State(state): State<AppState>,
    Path(capver): Path<u32>,
) -> Json<CapverLookup> {
    let capability_version = CapabilityVersion(capver);
    let version = state.registry.version_for(capability_version);
    let known = !version.is_empty();
    state.metrics.record_lookup(LookupKind::Capver, known);

    Json(CapverLookup {
        capability_version,
        version: version.to_string(),
        known,
    })
}

pub async fn latest_versions(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> Json<serde_json::Value> {
    let versions = state.registry.latest_versions(params.n());
    Json(serde_json::json!({ "versions": versions }))
}

pub async fn latest_major_minor(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> Json<serde_json::Value> {
    let families = state.registry.latest_major_minor(params.n(), params.strip_v);
    Json(serde_json::json!({ "families": families }))
}

pub async fn latest_capvers(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> Json<serde_json::Value> {
    let capability_versions = state.registry.latest_capability_versions(params.n());
    Json(serde_json::json!({ "capability_versions": capability_versions }))
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "version": CAPVER_VERSION,
            "entries": state.registry.len(),
        })),
    )
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
