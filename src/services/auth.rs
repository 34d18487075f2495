//! Authentication service backed by the logins declared in configuration

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Role, User, UserClaims},
};

#[derive(Clone)]
pub struct AuthService {
    users: Vec<User>,
    jwt_secret: String,
    jwt_expiration_hours: u64,
}

impl AuthService {
    /// Build the user provider. Plaintext passwords found in configuration
    /// are hashed once here.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let mut users = Vec::with_capacity(config.users.len());

        for entry in &config.users {
            let roles = entry
                .roles
                .iter()
                .map(|r| r.parse::<Role>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| AppError::Internal(format!("User '{}': {}", entry.login, e)))?;

            let password_hash = if entry.password.starts_with("$argon2") {
                entry.password.clone()
            } else {
                tracing::warn!(login = %entry.login, "plaintext password in configuration, hashing it at startup");
                hash_password(&entry.password)?
            };

            users.push(User {
                login: entry.login.clone(),
                password_hash,
                roles,
            });
        }

        Ok(Self {
            users,
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiration_hours: config.jwt_expiration_hours,
        })
    }

    /// Authenticate by login and password and return a JWT token
    pub fn authenticate(&self, login: &str, password: &str) -> AppResult<(String, &User)> {
        let user = self
            .users
            .iter()
            .find(|u| u.login == login)
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        if !verify_password(&user.password_hash, password)? {
            tracing::info!(login = %login, "rejected login attempt");
            return Err(AppError::Authentication("Invalid login or password".to_string()));
        }

        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.login.clone(),
            roles: user.roles.clone(),
            exp: now + (self.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        let token = claims
            .create_token(&self.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user))
    }

    /// Validate a bearer token
    pub fn verify_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    pub fn expires_in(&self) -> i64 {
        self.jwt_expiration_hours as i64 * 3600
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserEntry;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 1,
            users: vec![UserEntry {
                login: "alice".to_string(),
                password: "wonderland".to_string(),
                roles: vec!["user".to_string()],
            }],
        }
    }

    #[test]
    fn test_login_and_verify() {
        let service = AuthService::new(&config()).unwrap();

        let (token, user) = service.authenticate("alice", "wonderland").unwrap();
        assert_eq!(user.login, "alice");

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.has_role(Role::User));
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_bad_credentials() {
        let service = AuthService::new(&config()).unwrap();
        assert!(matches!(
            service.authenticate("alice", "nope"),
            Err(AppError::Authentication(_))
        ));
        assert!(matches!(
            service.authenticate("bob", "wonderland"),
            Err(AppError::Authentication(_))
        ));
    }

    #[test]
    fn test_prehashed_password() {
        let mut config = config();
        config.users[0].password = hash_password("wonderland").unwrap();
        let service = AuthService::new(&config).unwrap();
        assert!(service.authenticate("alice", "wonderland").is_ok());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let mut config = config();
        config.users[0].roles = vec!["superhero".to_string()];
        assert!(AuthService::new(&config).is_err());
    }
}
