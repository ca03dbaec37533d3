//! # API REST
//!
//! REST surface for the registry forms.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - The OpenAPI document
//! - REST-specific concerns (urlencoded submissions, JSON reports, CORS)
//!
//! Binding and validation live in `registry-core`; this crate reads reference data, hands it to
//! the forms and maps the outcome onto status codes. A submission that does not validate is
//! answered with `422 Unprocessable Entity` and the full report so the client can re-render it.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod store;

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Form as UrlEncoded, Router,
};
use registry_core::{
    clinical::choices_by_enum_name,
    config::{minimum_password_strength_from_env_value, site_name_from_env_value},
    forms::{PatientEditForm, PatientSearchForm},
    load_choices, Choice, CoreConfig, FormChoices, FormData, FormKind, FormReport, PatientRecord,
    RecordStore, RegistryError, RegistryResult, Submission, Validated,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};

pub use error::{ApiError, ApiResult};
pub use store::MemoryStore;

/// Application state for the REST API server
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub store: Arc<MemoryStore>,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, store: Arc<MemoryStore>) -> Self {
        Self { cfg, store }
    }

    fn choices(&self) -> ApiResult<FormChoices> {
        Ok(load_choices(self.store.as_ref())?)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Outcome of a successful patient save.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientSavedRes {
    pub id: i64,
    /// The client asked to record an episode next.
    pub create_episode: bool,
}

#[derive(Debug, Serialize)]
pub struct PatientMatch {
    pub id: i64,
    #[serde(flatten)]
    pub record: PatientRecord,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChoicesQuery {
    /// Prefix the blank `(Any)` choice.
    #[serde(default)]
    pub blank: bool,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        get_form,
        submit_form,
        create_patient,
        get_patient,
        update_patient,
        search_patients,
        get_choices,
    ),
    components(schemas(HealthRes, PatientSavedRes))
)]
pub struct ApiDoc;

/// Resolve the core configuration from environment values.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidConfig`] if `MINIMUM_PASSWORD_STRENGTH` is not a number in
/// `0.0..=1.0`.
pub fn config_from_env() -> RegistryResult<CoreConfig> {
    let strength =
        minimum_password_strength_from_env_value(std::env::var("MINIMUM_PASSWORD_STRENGTH").ok())?;
    let site_name = site_name_from_env_value(std::env::var("REGISTRY_SITE_NAME").ok());
    CoreConfig::new(strength, site_name)
}

/// Build the REST router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/forms/:kind", get(get_form).post(submit_form))
        .route("/patients", post(create_patient))
        .route("/patients/search", post(search_patients))
        .route("/patients/:id", get(get_patient).put(update_patient))
        .route("/choices/:name", get(get_choices))
        .route("/api-docs/openapi.json", get(openapi))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: format!("{} registry is alive", state.cfg.site_name()),
    })
}

#[utoipa::path(
    get,
    path = "/forms/{kind}",
    params(("kind" = String, Path, description = "Form slug, e.g. `followup`")),
    responses(
        (status = 200, description = "Unbound form report with choice lists"),
        (status = 404, description = "Unknown form"),
        (status = 500, description = "Internal server error")
    )
)]
/// An empty form, ready to be rendered.
#[axum::debug_handler]
async fn get_form(
    State(state): State<AppState>,
    AxumPath(kind): AxumPath<String>,
) -> ApiResult<Json<FormReport>> {
    let kind = kind.parse::<FormKind>()?;
    let choices = state.choices()?;
    Ok(Json(kind.blank(&choices, &state.cfg)))
}

#[utoipa::path(
    post,
    path = "/forms/{kind}",
    params(("kind" = String, Path, description = "Form slug, e.g. `followup`")),
    request_body(content = String, content_type = "application/x-www-form-urlencoded", description = "Raw form fields"),
    responses(
        (status = 200, description = "Valid submission report"),
        (status = 404, description = "Unknown form"),
        (status = 422, description = "Invalid submission report with per-field errors"),
        (status = 500, description = "Internal server error")
    )
)]
/// Bind and validate a submission of any form without persisting it.
#[axum::debug_handler]
async fn submit_form(
    State(state): State<AppState>,
    AxumPath(kind): AxumPath<String>,
    UrlEncoded(data): UrlEncoded<FormData>,
) -> ApiResult<Json<FormReport>> {
    let kind = kind.parse::<FormKind>()?;
    let choices = state.choices()?;
    let report = kind.process(&data, &choices, &state.cfg);
    if report.valid {
        Ok(Json(report))
    } else {
        Err(ApiError::Invalid(Box::new(report)))
    }
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body(content = String, content_type = "application/x-www-form-urlencoded", description = "Patient form fields"),
    responses(
        (status = 201, description = "Patient created", body = PatientSavedRes),
        (status = 422, description = "Invalid submission report"),
        (status = 500, description = "Internal server error")
    )
)]
/// Register a new patient. Nothing is stored unless the whole submission validates.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    UrlEncoded(data): UrlEncoded<FormData>,
) -> ApiResult<(StatusCode, Json<PatientSavedRes>)> {
    let choices = state.choices()?;
    let form = match Submission::new(PatientEditForm::new(&choices))
        .bind(&data)
        .validate()
    {
        Validated::Valid(form) => form,
        invalid => return Err(ApiError::Invalid(Box::new(invalid.report()))),
    };

    let id = state.store.create(form.to_record()?)?;
    tracing::info!(id, "registered patient");
    Ok((
        StatusCode::CREATED,
        Json(PatientSavedRes {
            id,
            create_episode: form.creates_episode_next(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Stored patient record"),
        (status = 404, description = "Patient not found")
    )
)]
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i64>,
) -> ApiResult<Json<PatientRecord>> {
    Ok(Json(state.store.get(id)?))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    request_body(content = String, content_type = "application/x-www-form-urlencoded", description = "Changed patient fields"),
    responses(
        (status = 200, description = "Patient updated", body = PatientSavedRes),
        (status = 404, description = "Patient not found"),
        (status = 422, description = "Invalid submission report"),
        (status = 500, description = "Internal server error")
    )
)]
/// Edit a patient. Fields missing from the submission keep their stored values.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i64>,
    UrlEncoded(data): UrlEncoded<FormData>,
) -> ApiResult<Json<PatientSavedRes>> {
    let existing = state.store.get(id)?;
    let choices = state.choices()?;
    let form = match Submission::new(PatientEditForm::from_record(&choices, id, &existing))
        .bind(&data)
        .validate()
    {
        Validated::Valid(form) => form,
        invalid => return Err(ApiError::Invalid(Box::new(invalid.report()))),
    };

    state.store.update(id, form.to_record()?)?;
    tracing::info!(id, "updated patient");
    Ok(Json(PatientSavedRes {
        id,
        create_episode: form.creates_episode_next(),
    }))
}

#[utoipa::path(
    post,
    path = "/patients/search",
    request_body(content = String, content_type = "application/x-www-form-urlencoded", description = "Search criteria"),
    responses(
        (status = 200, description = "Matching patients ordered by name"),
        (status = 422, description = "Invalid criteria report")
    )
)]
#[axum::debug_handler]
async fn search_patients(
    State(state): State<AppState>,
    UrlEncoded(data): UrlEncoded<FormData>,
) -> ApiResult<Json<Vec<PatientMatch>>> {
    let choices = state.choices()?;
    let criteria = match Submission::new(PatientSearchForm::new(&choices))
        .bind(&data)
        .validate()
    {
        Validated::Valid(form) => form,
        invalid => return Err(ApiError::Invalid(Box::new(invalid.report()))),
    };

    let found = state
        .store
        .search_patients(&criteria)?
        .into_iter()
        .map(|(id, record)| PatientMatch { id, record })
        .collect();
    Ok(Json(found))
}

#[utoipa::path(
    get,
    path = "/choices/{name}",
    params(
        ("name" = String, Path, description = "Clinical enumeration, e.g. `Cepod`"),
        ChoicesQuery
    ),
    responses(
        (status = 200, description = "Choice list in declaration order"),
        (status = 404, description = "Unknown enumeration")
    )
)]
#[axum::debug_handler]
async fn get_choices(
    AxumPath(name): AxumPath<String>,
    Query(query): Query<ChoicesQuery>,
) -> ApiResult<Json<Vec<Choice>>> {
    choices_by_enum_name(&name, query.blank)
        .map(Json)
        .ok_or_else(|| ApiError::Registry(RegistryError::UnknownEnum(name)))
}
