//! Account HTTP handlers.
//!
//! ```text
//! POST /auth/register/  Create an account
//! POST /auth/login/     Exchange credentials for a token pair
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, EmailAddress, Error, RegisterForm, User};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::account_error;

/// Registration request body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Optional confirmation; when present and non-empty it must match
    /// `password`.
    #[serde(default)]
    pub password_confirm: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair plus the authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

/// Create a new account.
#[utoipa::path(
    post,
    path = "/auth/register/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["auth"],
    security([]),
    operation_id = "register"
)]
#[post("/auth/register/")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let form = RegisterForm::try_new(
        &payload.name,
        &payload.email,
        &payload.password,
        payload.password_confirm.as_deref(),
    )
    .map_err(account_error)?;
    let user = state.accounts.register(form).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Exchange credentials for access and refresh tokens.
#[utoipa::path(
    post,
    path = "/auth/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    security([]),
    operation_id = "login"
)]
#[post("/auth/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let payload = payload.into_inner();
    // An unparseable email cannot belong to any account.
    let email = EmailAddress::new(&payload.email)
        .map_err(|_| Error::unauthorized("invalid credentials"))?;
    let outcome = state.accounts.login(&email, &payload.password).await?;
    Ok(web::Json(LoginResponse {
        access: outcome.access,
        refresh: outcome.refresh,
        user: outcome.user,
    }))
}
