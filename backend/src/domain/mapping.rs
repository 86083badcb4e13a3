//! Patient-doctor mapping: a many-to-many join record.
//!
//! A mapping carries no owner of its own. Ownership is resolved transitively
//! through the referenced patient on every operation; storing the owner here
//! as well would invite inconsistency between the mapping's implied owner and
//! the patient's actual owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Assignment of one doctor to one patient.
///
/// ## Invariants
/// - `(patient_id, doctor_id)` pairs are unique; duplicate assignments are
///   rejected with a conflict.
/// - Visible and deletable only by the owner of `patient_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Mapping {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub patient_id: Uuid,
    #[schema(value_type = String)]
    pub doctor_id: Uuid,
    pub created_at: DateTime<Utc>,
}
