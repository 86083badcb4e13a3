//! Patient HTTP handlers.
//!
//! ```text
//! POST   /patients/       Create a patient owned by the requester
//! GET    /patients/       List the requester's patients
//! GET    /patients/{id}/  Fetch one of the requester's patients
//! PUT    /patients/{id}/  Partially update one of the requester's patients
//! DELETE /patients/{id}/  Delete one of the requester's patients
//! ```
//!
//! Every route requires a bearer token. A patient owned by someone else is
//! reported as absent, never as forbidden.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{ApiResult, Patient, PatientChanges, PatientDraft};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::patient_error;

/// Patient creation request body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PatientRequest {
    /// Full name; split on the first space into first and last name.
    pub name: String,
    pub age: i32,
    /// One of `male`, `female`, `other` (case-insensitive, or `M`/`F`/`O`).
    pub gender: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
}

/// Patient update request body; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct PatientUpdateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
}

/// Create a patient owned by the requester.
#[utoipa::path(
    post,
    path = "/patients/",
    request_body = PatientRequest,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error)
    ),
    tags = ["patients"],
    operation_id = "createPatient"
)]
#[post("/patients/")]
pub async fn create_patient(
    state: web::Data<HttpState>,
    requester: AuthenticatedUser,
    payload: web::Json<PatientRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let draft = PatientDraft::try_new(
        &payload.name,
        payload.age,
        &payload.gender,
        payload.address,
        payload.medical_history,
    )
    .map_err(patient_error)?;
    let patient = state.patients.create(requester.user_id, draft).await?;
    Ok(HttpResponse::Created().json(patient))
}

/// List the requester's patients, most recently created first.
#[utoipa::path(
    get,
    path = "/patients/",
    responses(
        (status = 200, description = "Patients owned by the requester", body = [Patient]),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error)
    ),
    tags = ["patients"],
    operation_id = "listPatients"
)]
#[get("/patients/")]
pub async fn list_patients(
    state: web::Data<HttpState>,
    requester: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<Patient>>> {
    Ok(web::Json(state.patients.list(requester.user_id).await?))
}

/// Fetch a single owned patient.
#[utoipa::path(
    get,
    path = "/patients/{id}/",
    params(("id" = Uuid, Path, description = "Patient id")),
    responses(
        (status = 200, description = "The patient", body = Patient),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error),
        (status = 404, description = "Absent or owned by another user", body = crate::domain::Error)
    ),
    tags = ["patients"],
    operation_id = "getPatient"
)]
#[get("/patients/{id}/")]
pub async fn get_patient(
    state: web::Data<HttpState>,
    requester: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Patient>> {
    let patient = state
        .patients
        .get(requester.user_id, path.into_inner())
        .await?;
    Ok(web::Json(patient))
}

/// Partially update an owned patient.
#[utoipa::path(
    put,
    path = "/patients/{id}/",
    params(("id" = Uuid, Path, description = "Patient id")),
    request_body = PatientUpdateRequest,
    responses(
        (status = 200, description = "The updated patient", body = Patient),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error),
        (status = 404, description = "Absent or owned by another user", body = crate::domain::Error)
    ),
    tags = ["patients"],
    operation_id = "updatePatient"
)]
#[put("/patients/{id}/")]
pub async fn update_patient(
    state: web::Data<HttpState>,
    requester: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<PatientUpdateRequest>,
) -> ApiResult<web::Json<Patient>> {
    let payload = payload.into_inner();
    let changes = PatientChanges::try_new(
        payload.name.as_deref(),
        payload.age,
        payload.gender.as_deref(),
        payload.address,
        payload.medical_history,
    )
    .map_err(patient_error)?;
    let patient = state
        .patients
        .update(requester.user_id, path.into_inner(), changes)
        .await?;
    Ok(web::Json(patient))
}

/// Delete an owned patient, along with its doctor assignments.
#[utoipa::path(
    delete,
    path = "/patients/{id}/",
    params(("id" = Uuid, Path, description = "Patient id")),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::domain::Error),
        (status = 404, description = "Absent or owned by another user", body = crate::domain::Error)
    ),
    tags = ["patients"],
    operation_id = "deletePatient"
)]
#[delete("/patients/{id}/")]
pub async fn delete_patient(
    state: web::Data<HttpState>,
    requester: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .patients
        .delete(requester.user_id, path.into_inner())
        .await?;
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

    macro_rules! patients_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .service(create_patient)
                    .service(list_patients)
                    .service(get_patient)
                    .service(update_patient)
                    .service(delete_patient),
            )
            .await
        };
    }

    fn patient_body() -> serde_json::Value {
        json!({
            "name": "John Doe",
            "age": 30,
            "gender": "male",
            "address": "12 Acacia Avenue",
        })
    }

    async fn create_for<S, B>(app: &S, auth: &str) -> serde_json::Value
    where
        S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
        B: actix_web::body::MessageBody,
    {
        let resp = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/patients/")
                .insert_header((header::AUTHORIZATION, auth))
                .set_json(patient_body())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        test::read_body_json(resp).await
    }

    #[rstest]
    #[actix_web::test]
    async fn create_splits_the_name_and_hides_the_owner() {
        let state: HttpState = test_state();
        let auth = bearer(&state, Uuid::new_v4());
        let app = patients_app!(state);

        let patient = create_for(&app, &auth).await;
        assert_eq!(patient["first_name"], "John");
        assert_eq!(patient["last_name"], "Doe");
        assert!(patient.get("owner_user_id").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn listing_is_scoped_to_the_requester() {
        let state: HttpState = test_state();
        let alice = bearer(&state, Uuid::new_v4());
        let bob = bearer(&state, Uuid::new_v4());
        let app = patients_app!(state);

        create_for(&app, &alice).await;
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/patients/")
                .insert_header((header::AUTHORIZATION, bob.as_str()))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let patients: Vec<serde_json::Value> = test::read_body_json(resp).await;
        assert!(patients.is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn foreign_patients_are_absent_not_forbidden() {
        let state: HttpState = test_state();
        let alice = bearer(&state, Uuid::new_v4());
        let bob = bearer(&state, Uuid::new_v4());
        let app = patients_app!(state);

        let patient = create_for(&app, &alice).await;
        let id = patient["id"].as_str().expect("id").to_owned();

        for req in [
            test::TestRequest::get().uri(&format!("/patients/{id}/")),
            test::TestRequest::put()
                .uri(&format!("/patients/{id}/"))
                .set_json(json!({ "age": 31 })),
            test::TestRequest::delete().uri(&format!("/patients/{id}/")),
        ] {
            let resp = test::call_service(
                &app,
                req.insert_header((header::AUTHORIZATION, bob.as_str()))
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn put_is_a_partial_update() {
        let state: HttpState = test_state();
        let auth = bearer(&state, Uuid::new_v4());
        let app = patients_app!(state);

        let patient = create_for(&app, &auth).await;
        let id = patient["id"].as_str().expect("id");

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/patients/{id}/"))
                .insert_header((header::AUTHORIZATION, auth.as_str()))
                .set_json(json!({ "age": 31 }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(updated["age"], 31);
        assert_eq!(updated["first_name"], "John");
        assert_eq!(updated["address"], "12 Acacia Avenue");
    }

    #[rstest]
    #[case(json!({ "name": "Jane Roe", "age": 0, "gender": "female" }), "age")]
    #[case(json!({ "name": "Jane Roe", "age": 131, "gender": "female" }), "age")]
    #[case(json!({ "name": "Jane Roe", "age": 30, "gender": "unknown" }), "gender")]
    #[case(json!({ "name": "   ", "age": 30, "gender": "female" }), "name")]
    #[actix_web::test]
    async fn invalid_fields_are_rejected(#[case] body: serde_json::Value, #[case] field: &str) {
        let state: HttpState = test_state();
        let auth = bearer(&state, Uuid::new_v4());
        let app = patients_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/patients/")
                .insert_header((header::AUTHORIZATION, auth.as_str()))
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let payload: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(payload["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn requests_without_a_token_are_unauthorized() {
        let state: HttpState = test_state();
        let app = patients_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/patients/").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
