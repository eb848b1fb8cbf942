use crate::persistence::{SessionActiveModel, UserActiveModel, UserModel};
use crate::repository::session_repository::SessionRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::error::{ServiceError, ServiceErrorKind, map_db_error};
use chrono::{Duration, Utc};
use portal_http::{AuthUser, DEFAULT_HASH_COST, hash_password_with_cost, verify_password};
use sea_orm::{ActiveValue::Set, DatabaseConnection, IntoActiveModel};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const MAX_USERNAME_LEN: usize = 150;

#[derive(Debug, Clone, Default)]
pub(crate) struct SignupRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) confirm_password: String,
}

/// A freshly issued session.
#[derive(Debug, Clone)]
pub(crate) struct LoginSession {
    pub(crate) token: String,
    pub(crate) user: AuthUser,
}

fn auth_user(user: &UserModel) -> AuthUser {
    AuthUser {
        id: user.id,
        username: user.username.clone(),
        is_staff: user.is_staff,
    }
}

fn validate_username(username: &str) -> Result<(), ServiceError> {
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ServiceError::validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters."
        )));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(ServiceError::validation(
            "Username must not contain spaces.",
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub(crate) struct IdentityService {
    db: Arc<DatabaseConnection>,
    session_ttl: Duration,
    hash_cost: u32,
}

impl IdentityService {
    pub(crate) fn new(db: Arc<DatabaseConnection>, session_ttl: Duration) -> Self {
        Self {
            db,
            session_ttl,
            hash_cost: DEFAULT_HASH_COST,
        }
    }

    pub(crate) fn with_hash_cost(mut self, hash_cost: u32) -> Self {
        self.hash_cost = hash_cost;
        self
    }

    fn hash(&self, password: &str) -> Result<String, ServiceError> {
        hash_password_with_cost(password, self.hash_cost)
            .map_err(|error| ServiceError::internal(error.to_string()))
    }

    pub(crate) async fn signup(&self, request: SignupRequest) -> Result<UserModel, ServiceError> {
        let username = request.username.trim();
        let email = request.email.trim();
        if username.is_empty() || request.password.is_empty() || request.confirm_password.is_empty()
        {
            return Err(ServiceError::validation("All fields are required."));
        }
        validate_username(username)?;
        if request.password != request.confirm_password {
            return Err(ServiceError::validation("Passwords do not match."));
        }

        let existing = UserRepository::find_by_username(self.db.as_ref(), username)
            .await
            .map_err(map_db_error)?;
        if existing.is_some() {
            return Err(ServiceError::conflict("Username already exists."));
        }

        let password_hash = self.hash(&request.password)?;
        let user = UserRepository::insert(
            self.db.as_ref(),
            UserActiveModel {
                username: Set(username.to_string()),
                email: Set(email.to_string()),
                password_hash: Set(password_hash),
                is_staff: Set(false),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            },
        )
        .await
        .map_err(|error| {
            let mapped = map_db_error(error);
            if mapped.kind() == ServiceErrorKind::Conflict {
                ServiceError::conflict("Username already exists.")
            } else {
                mapped
            }
        })?;

        info!(user_id = user.id, username = %user.username, "User signed up");
        Ok(user)
    }

    pub(crate) async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginSession, ServiceError> {
        let invalid = || ServiceError::validation("Invalid username or password.");

        let user = UserRepository::find_by_username(self.db.as_ref(), username.trim())
            .await
            .map_err(map_db_error)?
            .ok_or_else(invalid)?;
        if !verify_password(password, &user.password_hash) {
            warn!(username = %user.username, "Rejected login with wrong password");
            return Err(invalid());
        }

        let now = Utc::now();
        let token = Uuid::new_v4().simple().to_string();
        SessionRepository::insert(
            self.db.as_ref(),
            SessionActiveModel {
                token: Set(token.clone()),
                user_id: Set(user.id),
                created_at: Set(now.into()),
                expires_at: Set((now + self.session_ttl).into()),
                ..Default::default()
            },
        )
        .await
        .map_err(map_db_error)?;

        info!(user_id = user.id, "Session established");
        Ok(LoginSession {
            token,
            user: auth_user(&user),
        })
    }

    pub(crate) async fn logout(&self, token: &str) -> Result<(), ServiceError> {
        let removed = SessionRepository::delete_by_token(self.db.as_ref(), token)
            .await
            .map_err(map_db_error)?;
        if removed > 0 {
            info!("Session destroyed");
        }
        Ok(())
    }

    /// Expired sessions are deleted on sight and resolve to nobody.
    pub(crate) async fn resolve_session(
        &self,
        token: &str,
    ) -> Result<Option<AuthUser>, ServiceError> {
        let Some(session) = SessionRepository::find_by_token(self.db.as_ref(), token)
            .await
            .map_err(map_db_error)?
        else {
            return Ok(None);
        };

        if session.expires_at <= Utc::now() {
            SessionRepository::delete_by_token(self.db.as_ref(), token)
                .await
                .map_err(map_db_error)?;
            return Ok(None);
        }

        let user = UserRepository::find_by_id(self.db.as_ref(), session.user_id)
            .await
            .map_err(map_db_error)?;
        Ok(user.as_ref().map(auth_user))
    }

    pub(crate) async fn purge_expired_sessions(&self) -> Result<u64, ServiceError> {
        SessionRepository::delete_expired(self.db.as_ref(), Utc::now().into())
            .await
            .map_err(map_db_error)
    }

    /// Creates the account as staff, or promotes an existing one. A non-empty
    /// password replaces the stored credential.
    pub(crate) async fn create_staff(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserModel, ServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServiceError::validation("Username is required."));
        }
        validate_username(username)?;

        let existing = UserRepository::find_by_username(self.db.as_ref(), username)
            .await
            .map_err(map_db_error)?;

        let user = match existing {
            Some(user) => {
                let mut active_model = user.into_active_model();
                active_model.is_staff = Set(true);
                if !password.is_empty() {
                    active_model.password_hash = Set(self.hash(password)?);
                }
                if !email.trim().is_empty() {
                    active_model.email = Set(email.trim().to_string());
                }
                UserRepository::update(self.db.as_ref(), active_model)
                    .await
                    .map_err(map_db_error)?
            }
            None => {
                if password.is_empty() {
                    return Err(ServiceError::validation(
                        "A password is required for a new account.",
                    ));
                }
                UserRepository::insert(
                    self.db.as_ref(),
                    UserActiveModel {
                        username: Set(username.to_string()),
                        email: Set(email.trim().to_string()),
                        password_hash: Set(self.hash(password)?),
                        is_staff: Set(true),
                        created_at: Set(Utc::now().into()),
                        ..Default::default()
                    },
                )
                .await
                .map_err(map_db_error)?
            }
        };

        info!(user_id = user.id, username = %user.username, "Staff account ready");
        Ok(user)
    }
}
