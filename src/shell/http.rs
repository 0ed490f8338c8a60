use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::modules::attendance::adapters::inbound::http as attendance_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/employees",
            get(attendance_http::list_employees).post(attendance_http::add_employee),
        )
        .route("/employees/{id}", delete(attendance_http::remove_employee))
        .route("/employees/{id}/attendance", get(attendance_http::get_attendance))
        .route(
            "/employees/{id}/attendance/{date}",
            put(attendance_http::mark_attendance).delete(attendance_http::clear_attendance),
        )
        .route(
            "/employees/{id}/attendance/{date}/toggle",
            post(attendance_http::toggle_attendance_status),
        )
        .route("/employees/{id}/stats", get(attendance_http::employee_stats))
        .route("/stats", get(attendance_http::collective_stats))
        .route(
            "/status-types",
            get(attendance_http::list_status_types).post(attendance_http::add_status_type),
        )
        .route("/status-types/{id}", delete(attendance_http::delete_status_type))
        .route(
            "/cylinders",
            get(attendance_http::list_cylinders).post(attendance_http::add_cylinder),
        )
        .route("/cylinders/{id}", delete(attendance_http::remove_cylinder))
        .route(
            "/rules",
            get(attendance_http::list_rules).post(attendance_http::add_rule),
        )
        .route("/rules/{id}", delete(attendance_http::remove_rule))
        .route("/rules/{id}/image", get(attendance_http::rule_image))
        .route("/backup", get(attendance_http::backup))
        .route("/restore", post(attendance_http::restore))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
