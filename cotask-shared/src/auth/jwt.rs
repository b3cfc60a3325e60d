/// JWT token generation and validation module
///
/// Tokens are signed using HS256 (HMAC-SHA256) and carry the user's
/// identity and role. A single token kind is issued at login/registration
/// and expires after 7 days.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: 7 days
/// - **Validation**: Signature, expiration, and issuer checks
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use cotask_shared::auth::jwt::{create_token, validate_token, Claims};
/// use cotask_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, UserRole::Member);
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use crate::models::user::UserRole;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token issuer claim value
const ISSUER: &str = "cotask";

/// Token lifetime
const TOKEN_LIFETIME_DAYS: i64 = 7;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "cotask")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
///
/// # Custom Claims
///
/// - `role`: User role (admin/member)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "cotask"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// User role (custom claim)
    pub role: UserRole,
}

impl Claims {
    /// Creates new claims with the default 7-day expiration
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self::with_expiration(user_id, role, Duration::days(TOKEN_LIFETIME_DAYS))
    }

    /// Creates claims with a custom expiration (used by tests)
    pub fn with_expiration(user_id: Uuid, role: UserRole, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            role,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
///
/// # Security
///
/// The secret should be at least 32 bytes, randomly generated, stored
/// securely (environment variable or secret manager), and rotated
/// periodically.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies:
/// - Signature is valid
/// - Token hasn't expired
/// - Issuer is "cotask"
/// - Token is not used before nbf time
///
/// # Errors
///
/// Returns an error if the signature is invalid, the token has expired,
/// or the issuer doesn't match
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
