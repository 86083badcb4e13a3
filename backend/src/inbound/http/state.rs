//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data`, so they depend
//! only on domain services and the token port and stay testable without a
//! database.

use std::sync::Arc;

use crate::domain::ports::TokenService;
use crate::domain::{AccountService, DoctorService, MappingService, PatientService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<AccountService>,
    pub patients: Arc<PatientService>,
    pub doctors: Arc<DoctorService>,
    pub mappings: Arc<MappingService>,
    pub tokens: Arc<dyn TokenService>,
}
