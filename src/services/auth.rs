//! Authentication service: registration, login and token issuance

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{User, UserClaims, UserRole},
    repository::Repository,
};

/// Single generic message for both unknown email and wrong password,
/// so login failures cannot be used to enumerate accounts.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user. Fails with Conflict when the email is taken.
    /// New accounts always get the USER role; admins are provisioned
    /// out-of-band.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<User> {
        if self.repository.users_email_exists(email).await? {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }

        let password_hash = self.hash_password(password)?;

        self.repository
            .users_create(name, email, &password_hash, UserRole::User)
            .await
    }

    /// Authenticate by email and password, returning the user and a signed
    /// bearer token embedding `{sub: user id, role}`.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(User, String)> {
        let user = self
            .repository
            .users_get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let claims = UserClaims::new(&user, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((user, token))
    }

    /// Lookup helper for the authentication boundary; absence is None
    pub async fn find_by_id(&self, id: uuid::Uuid) -> AppResult<Option<User>> {
        self.repository.users_find_by_id(id).await
    }

    /// Verify a password against the stored argon2 hash.
    /// Argon2 verification is constant-time over the hash output.
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2 with a fresh random salt
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use argon2::{
        password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
        Argon2,
    };

    #[test]
    fn hash_is_salted_and_verifiable() {
        let argon2 = Argon2::default();

        let hash_a = argon2
            .hash_password(b"hunter22", &SaltString::generate(&mut OsRng))
            .unwrap()
            .to_string();
        let hash_b = argon2
            .hash_password(b"hunter22", &SaltString::generate(&mut OsRng))
            .unwrap()
            .to_string();

        // Per-password random salt: same plaintext, different hashes
        assert_ne!(hash_a, hash_b);
        // And the stored value is never the plaintext
        assert_ne!(hash_a, "hunter22");

        let parsed = PasswordHash::new(&hash_a).unwrap();
        assert!(argon2.verify_password(b"hunter22", &parsed).is_ok());
        assert!(argon2.verify_password(b"wrong", &parsed).is_err());
    }
}
