//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; `diesel
//! print-schema` can regenerate them from a live database.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        id -> Uuid,
        /// Normalised to lowercase before storage; uniquely indexed.
        email -> Varchar,
        password_hash -> Varchar,
        name -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Patient records, each owned by exactly one user.
    patients (id) {
        id -> Uuid,
        /// Owning user; set at creation, never reassigned.
        owner_user_id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        age -> Int4,
        /// Canonical lowercase gender: male, female, or other.
        gender -> Varchar,
        address -> Text,
        medical_history -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Doctor records; globally readable, no owner.
    doctors (id) {
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        specialization -> Varchar,
        /// Normalised to lowercase before storage; uniquely indexed.
        email -> Varchar,
        phone_number -> Varchar,
        experience_years -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Patient-doctor assignments; `(patient_id, doctor_id)` is unique.
    mappings (id) {
        id -> Uuid,
        patient_id -> Uuid,
        doctor_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(patients -> users (owner_user_id));
diesel::joinable!(mappings -> patients (patient_id));
diesel::joinable!(mappings -> doctors (doctor_id));

diesel::allow_tables_to_appear_in_same_query!(users, patients, doctors, mappings);
