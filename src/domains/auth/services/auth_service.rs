use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::info;

use crate::domains::auth::models::Credentials;
use crate::domains::auth::services::JwtService;
use crate::shared::database::UserStore;
use crate::shared::errors::{AuthError, LedgerError};

// 인증 서비스
// AuthService: handles registration and login, returning access tokens
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_service: JwtService) -> Self {
        Self { users, jwt_service }
    }

    // 회원가입 후 바로 로그인 (Access Token 반환)
    // Register and return an access token
    pub async fn register(&self, request: Credentials) -> Result<String, AuthError> {
        Self::validate(&request)?;

        // 1. 비밀번호 해싱
        let password_hash = Self::hash_password(&request.password)?;

        // 2. 사용자 생성 (로그인 중복은 저장소의 유니크 제약으로 판단)
        let user_id = self
            .users
            .create_user(&request.login, &password_hash)
            .await
            .map_err(|e| match e {
                LedgerError::UserAlreadyExists { login } => AuthError::LoginAlreadyExists { login },
                other => AuthError::DatabaseError(format!("Failed to create user: {}", other)),
            })?;

        info!("User {} registered as {}", request.login, user_id);

        // 3. Access Token 발급
        self.jwt_service.generate_access_token(user_id, request.login)
    }

    // 로그인 (Access Token 반환)
    // Verify credentials and return an access token
    pub async fn login(&self, request: Credentials) -> Result<String, AuthError> {
        Self::validate(&request)?;

        let user = self
            .users
            .find_user_by_login(&request.login)
            .await
            .map_err(|e| AuthError::DatabaseError(format!("Failed to fetch user: {}", e)))?
            .ok_or(AuthError::InvalidCredentials)?;

        Self::verify_password(&request.password, &user.password_hash)?;

        self.jwt_service.generate_access_token(user.id, user.login)
    }

    fn validate(request: &Credentials) -> Result<(), AuthError> {
        if request.login.trim().is_empty() || request.password.is_empty() {
            return Err(AuthError::InvalidRequest(
                "login and password must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::PasswordHashingFailed(format!("Failed to hash password: {}", e)))?
            .to_string();

        Ok(password_hash)
    }

    fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::PasswordVerificationFailed(format!("Invalid password hash: {}", e)))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(())
    }
}
