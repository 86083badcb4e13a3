//! OpenAPI documentation configuration.
//!
//! Generates the OpenAPI specification served by Swagger UI in debug builds.
//! All REST paths and their request and response schemas are registered
//! here, along with the bearer-token security scheme used by the protected
//! endpoints.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /auth/login/.".to_string()))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Healthcare backend API",
        description = "Token-authenticated CRUD for patients, doctors, and \
                       patient-doctor assignments."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::patients::create_patient,
        crate::inbound::http::patients::list_patients,
        crate::inbound::http::patients::get_patient,
        crate::inbound::http::patients::update_patient,
        crate::inbound::http::patients::delete_patient,
        crate::inbound::http::doctors::create_doctor,
        crate::inbound::http::doctors::list_doctors,
        crate::inbound::http::doctors::get_doctor,
        crate::inbound::http::doctors::update_doctor,
        crate::inbound::http::doctors::delete_doctor,
        crate::inbound::http::mappings::create_mapping,
        crate::inbound::http::mappings::list_mappings,
        crate::inbound::http::mappings::list_doctors_for_patient,
        crate::inbound::http::mappings::delete_mapping,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::User,
        crate::domain::Patient,
        crate::domain::Gender,
        crate::domain::Doctor,
        crate::domain::Mapping,
        crate::inbound::http::accounts::RegisterRequest,
        crate::inbound::http::accounts::LoginRequest,
        crate::inbound::http::accounts::LoginResponse,
        crate::inbound::http::patients::PatientRequest,
        crate::inbound::http::patients::PatientUpdateRequest,
        crate::inbound::http::doctors::DoctorRequest,
        crate::inbound::http::doctors::DoctorUpdateRequest,
        crate::inbound::http::mappings::MappingRequest,
    ))
)]
pub struct ApiDoc;
