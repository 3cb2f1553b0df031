use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_password, validate_password, verify_password, PasswordPolicy};
use crate::auth::{
    AuthError, AuthResponse, JwtService, LoginRequest, RegisterRequest, UserInfo, UserSession,
};
use crate::database::{StoreError, UserRepository};
use crate::models::validation::{validate_email, validate_username};
use crate::models::{CreateUser, User, UserProfile, Validate};

#[derive(Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    users: Arc<dyn UserRepository>,
    policy: PasswordPolicy,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_service: JwtService, policy: PasswordPolicy) -> Self {
        Self { jwt_service, users, policy }
    }

    /// Register a new user and sign them in
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();

        validate_username(&username)?;
        validate_email(&email)?;
        validate_password(&request.password, &self.policy)?;
        request.profile.validate()?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&request.password, &self.policy)?;

        let user = self
            .users
            .create(CreateUser {
                username,
                email,
                password_hash,
                profile: request.profile,
            })
            .await
            .map_err(|err| match err {
                StoreError::Duplicate(field) if field == "email" => AuthError::EmailAlreadyExists,
                StoreError::Duplicate(_) => AuthError::UsernameTaken,
                other => AuthError::Store(other),
            })?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        self.issue(user)
    }

    /// Exchange email and password for a token
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = request.email.trim().to_lowercase();

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        self.issue(user)
    }

    /// Resolve a bearer token to the user it was issued for.
    ///
    /// Fails if the token is malformed, expired, or names a user that no
    /// longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<UserSession, AuthError> {
        let claims = self.jwt_service.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(UserSession::from(&user))
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserInfo, AuthError> {
        let user = self.users.find_by_id(user_id).await?.ok_or(AuthError::UserNotFound)?;
        Ok(user.into())
    }

    pub async fn update_profile(&self, user_id: Uuid, profile: UserProfile) -> Result<UserInfo, AuthError> {
        profile.validate()?;

        let user = self
            .users
            .update_profile(user_id, &profile)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        info!(user_id = %user.id, "Profile updated");
        Ok(user.into())
    }

    fn issue(&self, user: User) -> Result<AuthResponse, AuthError> {
        let token = self.jwt_service.create_token(user.id, &user.email)?;

        Ok(AuthResponse {
            success: true,
            user: user.into(),
            token,
            expires_in: self.jwt_service.expires_in_seconds(),
        })
    }
}
