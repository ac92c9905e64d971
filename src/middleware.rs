use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    db::userdb::UserExt,
    error::{ErrorMessage, HttpError},
    models::usermodel::{Profile, UserRole},
    utils::token,
    AppState,
};

/// The resolved caller, injected into request extensions by `auth` and
/// passed explicitly into every handler that needs an identity.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JWTAuthMiddleware {
    pub user: Profile,
}

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    auth_value
                        .strip_prefix("Bearer ")
                        .map(|token| token.to_owned())
                })
        });

    let token = token
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let user_id = token::decode_token(token, app_state.env.jwt_secret.as_bytes())?;

    let user_id = uuid::Uuid::parse_str(&user_id)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    let user = app_state
        .db_client
        .get_profile(user_id)
        .await
        .map_err(|_| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    req.extensions_mut().insert(JWTAuthMiddleware { user });

    Ok(next.run(req).await)
}

/// Role gate used inline by handlers once `auth` has resolved the caller.
pub fn ensure_role(user: &Profile, required: UserRole) -> Result<(), HttpError> {
    if user.role != required {
        return Err(HttpError::forbidden(format!(
            "This action requires a {} account",
            required.to_str()
        )));
    }
    Ok(())
}

/// Drivers must be approved before they can bid or move jobs.
pub fn ensure_approved_driver(user: &Profile) -> Result<(), HttpError> {
    ensure_role(user, UserRole::Driver)?;
    if !user.approved {
        return Err(HttpError::forbidden("Driver account is awaiting approval"));
    }
    Ok(())
}
