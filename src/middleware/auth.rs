//! Middleware de sesión
//!
//! Verifica el token Bearer, carga el perfil activo del usuario y deja un
//! `SessionContext` en las extensions de la request.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::models::session::SessionContext;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{extract_token_from_header, verify_token};

/// Header con el que los roles multi-sucursal eligen la sucursal de trabajo
pub const BRANCH_HEADER: &str = "x-branch-id";

/// Middleware de autenticación JWT
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("authorization token required".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.config.jwt_secret)?;
    let user_id = claims.user_id()?;

    let profile = state
        .staff
        .find_active_profile(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("no active staff profile for this user".to_string()))?;

    let branch_id = if profile.role.is_cross_branch() {
        match requested_branch(request.headers())? {
            Some(branch_id) => {
                state
                    .staff
                    .find_active_branch(branch_id)
                    .await?
                    .ok_or_else(|| AppError::Unauthorized("unknown or inactive branch".to_string()))?;
                Some(branch_id)
            }
            None => profile.branch_id,
        }
    } else {
        profile.branch_id
    };

    let session = SessionContext {
        user_id,
        email: profile.email,
        role: profile.role,
        branch_id,
    };

    debug!(
        "🔐 Sesión {} ({}) sucursal {:?}",
        session.email,
        session.role.as_str(),
        session.branch_id
    );

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

fn requested_branch(headers: &HeaderMap) -> Result<Option<Uuid>, AppError> {
    let Some(value) = headers.get(BRANCH_HEADER) else {
        return Ok(None);
    };

    let raw = value
        .to_str()
        .map_err(|_| AppError::BadRequest("X-Branch-Id header is not valid text".to_string()))?
        .trim();
    if raw.is_empty() {
        return Ok(None);
    }

    Uuid::parse_str(raw)
        .map(Some)
        .map_err(|_| AppError::BadRequest("X-Branch-Id must be a UUID".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_requested_branch_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(requested_branch(&headers).unwrap(), None);

        headers.insert(BRANCH_HEADER, HeaderValue::from_static("  "));
        assert_eq!(requested_branch(&headers).unwrap(), None);

        let branch = Uuid::new_v4();
        headers.insert(BRANCH_HEADER, HeaderValue::from_str(&branch.to_string()).unwrap());
        assert_eq!(requested_branch(&headers).unwrap(), Some(branch));

        headers.insert(BRANCH_HEADER, HeaderValue::from_static("branch-1"));
        assert!(matches!(requested_branch(&headers), Err(AppError::BadRequest(_))));
    }
}
