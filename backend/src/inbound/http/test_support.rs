//! Shared fixtures for HTTP handler tests.

use std::sync::Arc;

use crate::domain::memory::InMemoryStore;
use crate::domain::ports::TokenService;
use crate::domain::{AccountService, DoctorService, MappingService, PatientService};
use crate::inbound::http::state::HttpState;
use crate::outbound::{Argon2PasswordHasher, JwtTokenService};

pub(crate) const TEST_SECRET: &[u8] = b"test-signing-secret";

/// Fully wired state over in-memory stores.
pub(crate) fn test_state() -> HttpState {
    let store = InMemoryStore::default();
    let patients = Arc::new(store.patients());
    let doctors = Arc::new(store.doctors());
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(TEST_SECRET));
    HttpState {
        accounts: Arc::new(AccountService::new(
            Arc::new(store.accounts()),
            Arc::new(Argon2PasswordHasher::default()),
            tokens.clone(),
        )),
        patients: Arc::new(PatientService::new(patients.clone())),
        doctors: Arc::new(DoctorService::new(doctors.clone())),
        mappings: Arc::new(MappingService::new(
            Arc::new(store.mappings()),
            patients,
            doctors,
        )),
        tokens,
    }
}

/// Authorization header value for a freshly issued access token.
pub(crate) fn bearer(state: &HttpState, user_id: uuid::Uuid) -> String {
    let pair = state.tokens.issue(user_id).expect("issue tokens");
    format!("Bearer {}", pair.access)
}
