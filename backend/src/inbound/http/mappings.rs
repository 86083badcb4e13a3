//! Patient-doctor mapping HTTP handlers.
//!
//! ```text
//! POST   /mappings/                       Assign a doctor to an owned patient
//! GET    /mappings/                       List mappings for owned patients
//! GET    /mappings/patient/{patient_id}/  Doctors assigned to an owned patient
//! DELETE /mappings/{id}/                  Remove an assignment
//! ```
//!
//! A mapping carries no owner of its own; every check walks through the
//! patient. Referencing a foreign patient fails exactly like referencing an
//! absent one.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ApiResult, Doctor, Mapping};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Mapping creation request body.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct MappingRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
}

/// Assign a doctor to one of the requester's patients.
#[utoipa::path(
    post,
    path = "/mappings/",
    request_body = MappingRequest,
    responses(
        (status = 201, description = "Mapping created", body = Mapping),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error),
        (status = 404, description = "Patient or doctor not found", body = crate::domain::Error),
        (status = 409, description = "Doctor already assigned", body = crate::domain::Error)
    ),
    tags = ["mappings"],
    operation_id = "createMapping"
)]
#[post("/mappings/")]
pub async fn create_mapping(
    state: web::Data<HttpState>,
    requester: AuthenticatedUser,
    payload: web::Json<MappingRequest>,
) -> ApiResult<HttpResponse> {
    let mapping = state
        .mappings
        .create(requester.user_id, payload.patient_id, payload.doctor_id)
        .await?;
    Ok(HttpResponse::Created().json(mapping))
}

/// List every mapping whose patient belongs to the requester.
#[utoipa::path(
    get,
    path = "/mappings/",
    responses(
        (status = 200, description = "Mappings for owned patients", body = [Mapping]),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error)
    ),
    tags = ["mappings"],
    operation_id = "listMappings"
)]
#[get("/mappings/")]
pub async fn list_mappings(
    state: web::Data<HttpState>,
    requester: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<Mapping>>> {
    Ok(web::Json(state.mappings.list(requester.user_id).await?))
}

/// List the doctors assigned to one of the requester's patients.
#[utoipa::path(
    get,
    path = "/mappings/patient/{patient_id}/",
    params(("patient_id" = Uuid, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Doctors assigned to the patient", body = [Doctor]),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error),
        (status = 404, description = "Absent or foreign patient", body = crate::domain::Error)
    ),
    tags = ["mappings"],
    operation_id = "listDoctorsForPatient"
)]
#[get("/mappings/patient/{patient_id}/")]
pub async fn list_doctors_for_patient(
    state: web::Data<HttpState>,
    requester: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<Doctor>>> {
    let doctors = state
        .mappings
        .list_doctors_for_patient(requester.user_id, path.into_inner())
        .await?;
    Ok(web::Json(doctors))
}

/// Remove an assignment from one of the requester's patients.
#[utoipa::path(
    delete,
    path = "/mappings/{id}/",
    params(("id" = Uuid, Path, description = "Mapping id")),
    responses(
        (status = 204, description = "Mapping deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error),
        (status = 404, description = "Absent or foreign mapping", body = crate::domain::Error)
    ),
    tags = ["mappings"],
    operation_id = "deleteMapping"
)]
#[delete("/mappings/{id}/")]
pub async fn delete_mapping(
    state: web::Data<HttpState>,
    requester: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .mappings
        .delete(requester.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
