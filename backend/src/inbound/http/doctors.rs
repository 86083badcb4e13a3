//! Doctor HTTP handlers.
//!
//! ```text
//! POST   /doctors/       Create a doctor (authenticated)
//! GET    /doctors/       List all doctors (public)
//! GET    /doctors/{id}/  Fetch a doctor (public)
//! PUT    /doctors/{id}/  Partially update a doctor (authenticated)
//! DELETE /doctors/{id}/  Delete a doctor (authenticated)
//! ```
//!
//! Doctors are a shared directory: reads are public and writes require a
//! token but no ownership, because no user owns a doctor.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ApiResult, Doctor, DoctorChanges, DoctorDraft};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::doctor_error;

/// Doctor creation request body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct DoctorRequest {
    /// Full name; split on the first space into first and last name.
    pub name: String,
    pub specialization: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub experience_years: Option<i32>,
}

/// Doctor update request body; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct DoctorUpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub experience_years: Option<i32>,
}

/// Create a doctor.
#[utoipa::path(
    post,
    path = "/doctors/",
    request_body = DoctorRequest,
    responses(
        (status = 201, description = "Doctor created", body = Doctor),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error),
        (status = 409, description = "Email already in use", body = crate::domain::Error)
    ),
    tags = ["doctors"],
    operation_id = "createDoctor"
)]
#[post("/doctors/")]
pub async fn create_doctor(
    state: web::Data<HttpState>,
    _requester: AuthenticatedUser,
    payload: web::Json<DoctorRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let draft = DoctorDraft::try_new(
        &payload.name,
        &payload.specialization,
        &payload.email,
        payload.phone_number,
        payload.experience_years,
    )
    .map_err(doctor_error)?;
    let doctor = state.doctors.create(draft).await?;
    Ok(HttpResponse::Created().json(doctor))
}

/// List all doctors, ordered by name.
#[utoipa::path(
    get,
    path = "/doctors/",
    responses(
        (status = 200, description = "All doctors", body = [Doctor])
    ),
    tags = ["doctors"],
    security([]),
    operation_id = "listDoctors"
)]
#[get("/doctors/")]
pub async fn list_doctors(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Doctor>>> {
    Ok(web::Json(state.doctors.list().await?))
}

/// Fetch a single doctor.
#[utoipa::path(
    get,
    path = "/doctors/{id}/",
    params(("id" = Uuid, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "The doctor", body = Doctor),
        (status = 404, description = "No such doctor", body = crate::domain::Error)
    ),
    tags = ["doctors"],
    security([]),
    operation_id = "getDoctor"
)]
#[get("/doctors/{id}/")]
pub async fn get_doctor(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Doctor>> {
    Ok(web::Json(state.doctors.get(path.into_inner()).await?))
}

/// Partially update a doctor.
#[utoipa::path(
    put,
    path = "/doctors/{id}/",
    params(("id" = Uuid, Path, description = "Doctor id")),
    request_body = DoctorUpdateRequest,
    responses(
        (status = 200, description = "The updated doctor", body = Doctor),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error),
        (status = 404, description = "No such doctor", body = crate::domain::Error),
        (status = 409, description = "Email already in use", body = crate::domain::Error)
    ),
    tags = ["doctors"],
    operation_id = "updateDoctor"
)]
#[put("/doctors/{id}/")]
pub async fn update_doctor(
    state: web::Data<HttpState>,
    _requester: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<DoctorUpdateRequest>,
) -> ApiResult<web::Json<Doctor>> {
    let payload = payload.into_inner();
    let changes = DoctorChanges::try_new(
        payload.name.as_deref(),
        payload.specialization,
        payload.email.as_deref(),
        payload.phone_number,
        payload.experience_years,
    )
    .map_err(doctor_error)?;
    let doctor = state.doctors.update(path.into_inner(), changes).await?;
    Ok(web::Json(doctor))
}

/// Delete a doctor.
#[utoipa::path(
    delete,
    path = "/doctors/{id}/",
    params(("id" = Uuid, Path, description = "Doctor id")),
    responses(
        (status = 204, description = "Doctor deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error),
        (status = 404, description = "No such doctor", body = crate::domain::Error)
    ),
    tags = ["doctors"],
    operation_id = "deleteDoctor"
)]
#[delete("/doctors/{id}/")]
pub async fn delete_doctor(
    state: web::Data<HttpState>,
    _requester: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.doctors.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use rstest::rstest;
    use serde_json::json;

    use crate::inbound::http::state::HttpState;
    use crate::inbound::http::test_support::{bearer, test_state};

    macro_rules! doctors_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .service(create_doctor)
                    .service(list_doctors)
                    .service(get_doctor)
                    .service(update_doctor)
                    .service(delete_doctor),
            )
            .await
        };
    }

    fn doctor_body() -> serde_json::Value {
        json!({
            "name": "Jane Smith",
            "specialization": "Cardiology",
            "email": "jane@hospital.com",
            "experience_years": 12,
        })
    }

    #[rstest]
    #[actix_web::test]
    async fn reads_are_public_but_writes_need_a_token() {
        let state: HttpState = test_state();
        let auth = bearer(&state, Uuid::new_v4());
        let app = doctors_app!(state);

        let forbidden = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/doctors/")
                .set_json(doctor_body())
                .to_request(),
        )
        .await;
        assert_eq!(forbidden.status(), StatusCode::UNAUTHORIZED);

        let created = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/doctors/")
                .insert_header((header::AUTHORIZATION, auth.as_str()))
                .set_json(doctor_body())
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let doctor: serde_json::Value = test::read_body_json(created).await;
        let id = doctor["id"].as_str().expect("id");

        // Anonymous reads.
        let listed = test::call_service(
            &app,
            test::TestRequest::get().uri("/doctors/").to_request(),
        )
        .await;
        assert_eq!(listed.status(), StatusCode::OK);
        let fetched = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/doctors/{id}/"))
                .to_request(),
        )
        .await;
        assert_eq!(fetched.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_email_is_a_conflict() {
        let state: HttpState = test_state();
        let auth = bearer(&state, Uuid::new_v4());
        let app = doctors_app!(state);

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri("/doctors/")
                    .insert_header((header::AUTHORIZATION, auth.as_str()))
                    .set_json(doctor_body())
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), expected);
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn update_and_delete_behave_on_missing_ids() {
        let state: HttpState = test_state();
        let auth = bearer(&state, Uuid::new_v4());
        let app = doctors_app!(state);
        let missing = Uuid::new_v4();

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/doctors/{missing}/"))
                .insert_header((header::AUTHORIZATION, auth.as_str()))
                .set_json(json!({ "specialization": "Oncology" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/doctors/{missing}/"))
                .insert_header((header::AUTHORIZATION, auth.as_str()))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case(json!({ "name": "Jane Smith", "specialization": " ", "email": "j@h.com" }), "specialization")]
    #[case(json!({ "name": "Jane Smith", "specialization": "GP", "email": "nope" }), "email")]
    #[case(
        json!({ "name": "Jane Smith", "specialization": "GP", "email": "j@h.com",
                "experience_years": -3 }),
        "experience_years"
    )]
    #[actix_web::test]
    async fn invalid_fields_are_rejected(#[case] body: serde_json::Value, #[case] field: &str) {
        let state: HttpState = test_state();
        let auth = bearer(&state, Uuid::new_v4());
        let app = doctors_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/doctors/")
                .insert_header((header::AUTHORIZATION, auth.as_str()))
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let payload: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(payload["details"]["field"], field);
    }
}
