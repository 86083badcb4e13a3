//! Bearer-token authentication extractor.
//!
//! Handlers that require a logged-in user take an [`AuthenticatedUser`]
//! parameter. Extraction verifies the `Authorization: Bearer` access token
//! against the token port and yields the bound user id; any failure becomes
//! a 401 before the handler body runs.

use std::future::{ready, Ready};

use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::Error;
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// The requester proven by a valid access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let raw = header_value
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid text"))?;
    let token = raw
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))?;
    let user_id = state.tokens.verify_access(token.trim())?;
    Ok(AuthenticatedUser { user_id })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
