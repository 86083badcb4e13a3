//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use tracing::warn;

use healthcare_backend::domain::memory::InMemoryStore;
use healthcare_backend::domain::ports::{
    AccountRepository, DoctorRepository, MappingRepository, PatientRepository, TokenService,
};
use healthcare_backend::domain::{AccountService, DoctorService, MappingService, PatientService};
#[cfg(debug_assertions)]
use healthcare_backend::doc::ApiDoc;
use healthcare_backend::inbound::http::accounts::{login, register};
use healthcare_backend::inbound::http::doctors::{
    create_doctor, delete_doctor, get_doctor, list_doctors, update_doctor,
};
use healthcare_backend::inbound::http::health::{live, ready, HealthState};
use healthcare_backend::inbound::http::mappings::{
    create_mapping, delete_mapping, list_doctors_for_patient, list_mappings,
};
use healthcare_backend::inbound::http::patients::{
    create_patient, delete_patient, get_patient, list_patients, update_patient,
};
use healthcare_backend::inbound::http::state::HttpState;
use healthcare_backend::outbound::persistence::{
    DieselAccountRepository, DieselDoctorRepository, DieselMappingRepository,
    DieselPatientRepository,
};
use healthcare_backend::outbound::{Argon2PasswordHasher, JwtTokenService};
use healthcare_backend::Trace;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

struct RepositoryBundle {
    accounts: Arc<dyn AccountRepository>,
    patients: Arc<dyn PatientRepository>,
    doctors: Arc<dyn DoctorRepository>,
    mappings: Arc<dyn MappingRepository>,
}

/// Choose repositories based on configuration: Diesel-backed when a pool is
/// available, in-memory otherwise.
fn build_repositories(config: &ServerConfig) -> RepositoryBundle {
    match &config.db_pool {
        Some(pool) => RepositoryBundle {
            accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
            patients: Arc::new(DieselPatientRepository::new(pool.clone())),
            doctors: Arc::new(DieselDoctorRepository::new(pool.clone())),
            mappings: Arc::new(DieselMappingRepository::new(pool.clone())),
        },
        None => {
            warn!("no database pool configured; state will not survive a restart");
            let store = InMemoryStore::default();
            RepositoryBundle {
                accounts: Arc::new(store.accounts()),
                patients: Arc::new(store.patients()),
                doctors: Arc::new(store.doctors()),
                mappings: Arc::new(store.mappings()),
            }
        }
    }
}

/// Wire the domain services over the chosen repositories.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let repos = build_repositories(config);
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(&config.jwt_secret));
    HttpState {
        accounts: Arc::new(AccountService::new(
            repos.accounts,
            Arc::new(Argon2PasswordHasher::default()),
            tokens.clone(),
        )),
        patients: Arc::new(PatientService::new(repos.patients.clone())),
        doctors: Arc::new(DoctorService::new(repos.doctors.clone())),
        mappings: Arc::new(MappingService::new(
            repos.mappings,
            repos.patients,
            repos.doctors,
        )),
        tokens,
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(register)
        .service(login)
        .service(create_patient)
        .service(list_patients)
        .service(get_patient)
        .service(update_patient)
        .service(delete_patient)
        .service(create_doctor)
        .service(list_doctors)
        .service(get_doctor)
        .service(update_doctor)
        .service(delete_doctor)
        .service(create_mapping)
        .service(list_mappings)
        .service(list_doctors_for_patient)
        .service(delete_mapping)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
