use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::models::{Claims, TokenType};

/// Decodes an HS256 token and accepts it only if it is an access token.
pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, String> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())?;

    if claims.token_type != TokenType::Access {
        return Err("Refresh tokens cannot be used for API access".to_string());
    }

    Ok(claims)
}
