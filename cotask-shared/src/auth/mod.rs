/// Authentication primitives for CoTask
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with 7-day expiration
/// - **Constant-time Comparison**: Password verification uses constant-time operations
///
/// # Example
///
/// ```no_run
/// use cotask_shared::auth::password::{hash_password, verify_password};
/// use cotask_shared::auth::jwt::{create_token, validate_token, Claims};
/// use cotask_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), UserRole::Member);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
