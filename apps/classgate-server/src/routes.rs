//! Demo API guarded by classgate.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use classgate::{Authenticated, Gate, ResolvedProject};
use serde_json::{Value, json};

#[must_use]
pub fn router(gate: &Gate) -> Router {
    Router::new()
        .route(
            "/classes/{class_id}/students/{student_id}/projects/{project_id}",
            get(show_project)
                .route_layer(
                    gate.chain()
                        .authenticate()
                        .tenant_match()
                        .owner_or_shared()
                        .layer(),
                )
                .merge(
                    put(update_project).route_layer(
                        gate.chain()
                            .authenticate()
                            .tenant_match()
                            .owner_only()
                            .layer(),
                    ),
                ),
        )
        .route(
            "/classes/{class_id}/students",
            get(list_students).route_layer(
                gate.chain()
                    .authenticate()
                    .tenant_match()
                    .supervisor_only()
                    .layer(),
            ),
        )
        .route(
            "/classes/{class_id}/credentials",
            post(rotate_credentials).route_layer(
                gate.chain()
                    .authenticate()
                    .tenant_match()
                    .supervisor_only()
                    .unmanaged_tenant_required()
                    .layer(),
            ),
        )
        .route(
            "/admin/classes/{class_id}",
            get(class_admin).route_layer(gate.chain().authenticate().site_admin_only().layer()),
        )
        .route("/health", get(health))
}

async fn show_project(
    Authenticated(principal): Authenticated,
    ResolvedProject(project): ResolvedProject,
) -> Json<Value> {
    Json(json!({ "caller": principal.subject(), "project": project }))
}

async fn update_project(ResolvedProject(project): ResolvedProject) -> Json<Value> {
    tracing::info!(project = %project.id, "project updated");
    Json(json!({ "updated": project.id }))
}

async fn list_students(
    Authenticated(principal): Authenticated,
    Path(class_id): Path<String>,
) -> Json<Value> {
    Json(json!({ "class": class_id, "supervisor": principal.subject(), "students": [] }))
}

async fn rotate_credentials(Path(class_id): Path<String>) -> (StatusCode, Json<Value>) {
    tracing::info!(%class_id, "credentials rotation requested");
    (StatusCode::ACCEPTED, Json(json!({ "class": class_id })))
}

async fn class_admin(
    Authenticated(principal): Authenticated,
    Path(class_id): Path<String>,
) -> Json<Value> {
    Json(json!({ "class": class_id, "admin": principal.subject() }))
}

async fn health() -> &'static str {
    "ok"
}
