use crate::data::user_repository::UserRepository;
use crate::domain::user::{LoginUserRequest, RegisterUserRequest, UserResponse};
use crate::domain::DomainError;
use crate::infrastructure::jwt::JwtService;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::sync::Arc;

pub struct AuthService {
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            user_repo,
            jwt_service,
        }
    }

    pub async fn register(
        &self,
        req: RegisterUserRequest,
    ) -> Result<(String, UserResponse), DomainError> {
        tracing::debug!("Registering user: {}", req.username);

        if req.username.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }
        if req.password.is_empty() {
            return Err(DomainError::ValidationError(
                "Password cannot be empty".to_string(),
            ));
        }

        if self.user_repo.find_by_username(&req.username).await.is_ok() {
            tracing::warn!("Registration failed: username already exists");
            return Err(DomainError::UserAlreadyExists);
        }
        if self.user_repo.find_by_email(&req.email).await.is_ok() {
            tracing::warn!("Registration failed: email already exists");
            return Err(DomainError::UserAlreadyExists);
        }

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Password hashing failed: {}", e);
                DomainError::InternalError(format!("Password hashing failed: {}", e))
            })?
            .to_string();

        let user = self.user_repo.create(req, password_hash).await?;

        let token = self
            .jwt_service
            .generate_token(user.id, user.username.clone())?;

        tracing::info!(
            "User registered successfully: id={}, username={}",
            user.id,
            user.username
        );

        Ok((token, UserResponse::from(user)))
    }

    pub async fn login(
        &self,
        req: LoginUserRequest,
    ) -> Result<(String, UserResponse), DomainError> {
        tracing::debug!("Login attempt for: {}", req.username);

        let user = self.user_repo.find_by_username(&req.username).await?;

        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            tracing::error!("Invalid password hash format: {}", e);
            DomainError::InternalError(format!("Invalid password hash: {}", e))
        })?;

        if Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            tracing::warn!("Invalid password for user {}", user.username);
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .jwt_service
            .generate_token(user.id, user.username.clone())?;

        tracing::info!(
            "User logged in successfully: id={}, username={}",
            user.id,
            user.username
        );

        Ok((token, UserResponse::from(user)))
    }

    pub async fn profile(&self, user_id: i64) -> Result<UserResponse, DomainError> {
        let user = self.user_repo.find_by_id(user_id).await?;
        Ok(UserResponse::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryUserRepository {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn create(
            &self,
            req: RegisterUserRequest,
            password_hash: String,
        ) -> Result<User, DomainError> {
            let mut users = self.users.lock().unwrap();
            if users
                .iter()
                .any(|u| u.username == req.username || u.email == req.email)
            {
                return Err(DomainError::UserAlreadyExists);
            }
            let user = User {
                id: users.len() as i64 + 1,
                username: req.username,
                name: req.name,
                profile_picture: req.profile_picture,
                email: req.email,
                password_hash,
                created_at: Utc::now(),
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn find_by_username(&self, username: &str) -> Result<User, DomainError> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned()
                .ok_or(DomainError::UserNotFound)
        }

        async fn find_by_email(&self, email: &str) -> Result<User, DomainError> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned()
                .ok_or(DomainError::UserNotFound)
        }

        async fn find_by_id(&self, id: i64) -> Result<User, DomainError> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .ok_or(DomainError::UserNotFound)
        }
    }

    fn auth_service() -> AuthService {
        let jwt = Arc::new(JwtService::new("a-test-secret-at-least-32-chars-long!").unwrap());
        AuthService::new(Arc::new(InMemoryUserRepository::default()), jwt)
    }

    fn register_request(username: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "hunter2hunter2".to_string(),
            name: Some("Test Traveller".to_string()),
            profile_picture: None,
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let service = auth_service();

        let (token, user) = service.register(register_request("alice")).await.unwrap();
        assert!(!token.is_empty());
        assert_eq!(user.username, "alice");

        let (token, user) = service
            .login(LoginUserRequest {
                username: "alice".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await
            .unwrap();
        assert!(!token.is_empty());
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let service = auth_service();
        service.register(register_request("bob")).await.unwrap();

        let err = service.register(register_request("bob")).await.unwrap_err();
        assert!(matches!(err, DomainError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let service = auth_service();
        service.register(register_request("carol")).await.unwrap();

        let err = service
            .login(LoginUserRequest {
                username: "carol".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn profile_returns_own_record() {
        let service = auth_service();
        service.register(register_request("dave")).await.unwrap();

        let profile = service.profile(1).await.unwrap();
        assert_eq!(profile.username, "dave");
        assert_eq!(profile.email, "dave@example.com");

        let err = service.profile(99).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound));
    }
}
