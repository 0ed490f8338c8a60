// HTTP inbound adapter: maps requests onto DataStore operations.
//
// Responsibilities
// - Parse transport shapes, call the store, map results to status codes.
// - No business rules here; every decision lives in the store.
//
// Status mapping
// - Unreadable body or restore input: 422. Unknown employee: 404.
// - Invalid date, month, label or measurement: 422. Storage failure: 500 (logged).

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::modules::attendance::core::attendance::Toggled;
use crate::modules::attendance::core::calendar::MonthKey;
use crate::modules::attendance::core::cylinder::NewCylinder;
use crate::modules::attendance::core::rule::RuleImage;
use crate::modules::attendance::store::{StoreError, backup_file_name};
use crate::shell::state::AppState;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Deserialize)]
pub struct AddEmployeeBody {
    pub name: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct AddEmployeeResponse {
    pub id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleStatusBody {
    pub status_id: String,
}

#[derive(Serialize)]
pub struct ToggleStatusResponse {
    pub added: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceBody {
    #[serde(default)]
    pub status_id: Option<String>,
}

#[derive(Deserialize)]
pub struct MonthParams {
    pub month: String,
}

#[derive(Deserialize)]
pub struct AddStatusTypeBody {
    pub label: String,
    pub color: String,
}

#[derive(Deserialize)]
pub struct CylinderParams {
    pub brand: Option<String>,
}

#[derive(Deserialize)]
pub struct AddRuleBody {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

fn unprocessable(message: impl Into<String>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

fn error_response(error: StoreError) -> Response {
    let status = match &error {
        StoreError::UnknownEmployee(_) => StatusCode::NOT_FOUND,
        StoreError::Calendar(_)
        | StoreError::BlankLabel
        | StoreError::NonFiniteMeasurement(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StoreError::Storage(_) | StoreError::CorruptDocument(_) | StoreError::Serialize(_) => {
            tracing::error!(error = %error, "store operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}

fn parse_month(raw: &str) -> Result<MonthKey, Response> {
    raw.parse::<MonthKey>()
        .map_err(|e| unprocessable(e.to_string()))
}

// --- Employees ---

pub async fn list_employees(State(state): State<AppState>) -> Response {
    let store = state.store.lock().await;
    Json(store.employees().to_vec()).into_response()
}

pub async fn add_employee(
    State(state): State<AppState>,
    body: Result<Json<AddEmployeeBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let mut store = state.store.lock().await;
    match store.add_employee(&body.name, &body.role) {
        Ok(id) => (StatusCode::CREATED, Json(AddEmployeeResponse { id })).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn remove_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    let mut store = state.store.lock().await;
    match store.remove_employee(&employee_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

// --- Attendance ---

pub async fn get_attendance(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Response {
    let store = state.store.lock().await;
    Json(store.attendance(&employee_id).clone()).into_response()
}

pub async fn toggle_attendance_status(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, String)>,
    body: Result<Json<ToggleStatusBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let mut store = state.store.lock().await;
    match store.toggle_attendance_status(&employee_id, &date, &body.status_id) {
        Ok(toggled) => Json(ToggleStatusResponse {
            added: toggled == Toggled::Added,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn mark_attendance(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, String)>,
    body: Result<Json<MarkAttendanceBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let mut store = state.store.lock().await;
    match store.mark_attendance(&employee_id, &date, body.status_id.as_deref()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn clear_attendance(
    State(state): State<AppState>,
    Path((employee_id, date)): Path<(String, String)>,
) -> Response {
    let mut store = state.store.lock().await;
    match store.clear_attendance(&employee_id, &date) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

// --- Statistics ---

pub async fn employee_stats(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    Query(params): Query<MonthParams>,
) -> Response {
    let month = match parse_month(&params.month) {
        Ok(month) => month,
        Err(response) => return response,
    };
    let store = state.store.lock().await;
    Json(store.employee_month_stats(&employee_id, &month)).into_response()
}

pub async fn collective_stats(
    State(state): State<AppState>,
    Query(params): Query<MonthParams>,
) -> Response {
    let month = match parse_month(&params.month) {
        Ok(month) => month,
        Err(response) => return response,
    };
    let store = state.store.lock().await;
    Json(store.collective_month_stats(&month)).into_response()
}

// --- Status types ---

pub async fn list_status_types(State(state): State<AppState>) -> Response {
    let store = state.store.lock().await;
    Json(store.status_types().to_vec()).into_response()
}

pub async fn add_status_type(
    State(state): State<AppState>,
    body: Result<Json<AddStatusTypeBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let mut store = state.store.lock().await;
    match store.add_status_type(&body.label, &body.color) {
        Ok(true) => StatusCode::CREATED.into_response(),
        Ok(false) => StatusCode::OK.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_status_type(
    State(state): State<AppState>,
    Path(status_id): Path<String>,
) -> Response {
    let mut store = state.store.lock().await;
    match store.delete_status_type(&status_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

// --- Cylinders ---

pub async fn list_cylinders(
    State(state): State<AppState>,
    Query(params): Query<CylinderParams>,
) -> Response {
    let store = state.store.lock().await;
    let cylinders: Vec<_> = match params.brand.as_deref() {
        Some(brand) => store.cylinders_by_brand(brand).into_iter().cloned().collect(),
        None => store.cylinders().to_vec(),
    };
    Json(cylinders).into_response()
}

pub async fn add_cylinder(
    State(state): State<AppState>,
    body: Result<Json<NewCylinder>, JsonRejection>,
) -> Response {
    let Ok(Json(cylinder)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let mut store = state.store.lock().await;
    match store.add_cylinder(cylinder) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn remove_cylinder(
    State(state): State<AppState>,
    Path(cylinder_id): Path<String>,
) -> Response {
    let mut store = state.store.lock().await;
    match store.remove_cylinder(&cylinder_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

// --- Rules ---

pub async fn list_rules(State(state): State<AppState>) -> Response {
    let store = state.store.lock().await;
    Json(store.rules().to_vec()).into_response()
}

pub async fn add_rule(
    State(state): State<AppState>,
    body: Result<Json<AddRuleBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let image = match body.image.as_deref().map(RuleImage::from_data_url).transpose() {
        Ok(image) => image,
        Err(e) => return unprocessable(e.to_string()),
    };
    let mut store = state.store.lock().await;
    match store.add_rule(&body.title, &body.description, image) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn remove_rule(State(state): State<AppState>, Path(rule_id): Path<String>) -> Response {
    let mut store = state.store.lock().await;
    match store.remove_rule(&rule_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn rule_image(State(state): State<AppState>, Path(rule_id): Path<String>) -> Response {
    let store = state.store.lock().await;
    match store.rule(&rule_id).and_then(|rule| rule.image.as_ref()) {
        Some(image) => (
            [(header::CONTENT_TYPE, image.mime_type.clone())],
            image.bytes.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// --- Backup and restore ---

pub async fn backup(State(state): State<AppState>) -> Response {
    let store = state.store.lock().await;
    match store.export_data() {
        Ok(json) => {
            let file_name = backup_file_name(Local::now().date_naive());
            (
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{file_name}\""),
                    ),
                ],
                json,
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn restore(State(state): State<AppState>, body: String) -> Response {
    let mut store = state.store.lock().await;
    match store.import_data(&body) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => unprocessable("restore input is not a readable document"),
        Err(e) => error_response(e),
    }
}
