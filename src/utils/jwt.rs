//! Utilidades JWT
//!
//! El proveedor de autenticación emite los tokens; aquí solo se verifican
//! y se extrae la identidad del usuario.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Claims del JWT emitido por el proveedor de autenticación
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,   // user_id
    pub email: String,
    pub exp: usize,    // expiration timestamp
    pub iat: usize,    // issued at timestamp
}

impl JwtClaims {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::Jwt("invalid subject in token".to_string()))
    }
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, secret: &str) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("invalid token: {}", e)))?;

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("authorization header must use the Bearer scheme".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized("token must not be empty".to_string()));
    }

    Ok(token)
}

/// Generar JWT token (herramientas internas y tests)
pub fn generate_token(
    user_id: Uuid,
    email: &str,
    secret: &str,
    expires_in_secs: i64,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(expires_in_secs);

    let claims = JwtClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))
        .map_err(|e| AppError::Jwt(format!("could not sign token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip_keeps_identity() {
        let user_id = Uuid::new_v4();
        let token = generate_token(user_id, "ayse@example.com", "secret", 3600).unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "ayse@example.com");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = generate_token(Uuid::new_v4(), "a@b.c", "secret", 3600).unwrap();
        assert!(verify_token(&token, "other").is_err());
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }
}
