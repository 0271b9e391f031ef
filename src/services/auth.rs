use chrono::{Duration, NaiveDateTime};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::config::JwtConfig;
use crate::db::{CreateUser, User, UserRepository};
use crate::error::{AppError, AppResult};

#[cfg(not(test))]
const BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const BCRYPT_COST: u32 = 4;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 150;
pub const PASSWORD_MIN_LEN: usize = 8;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

pub fn hash_password(password: &str) -> AppResult<String> {
    Ok(bcrypt::hash(password, BCRYPT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    Ok(bcrypt::verify(password, hash)?)
}

/// Create a signed JWT for a user id
pub fn create_jwt(user_id: &str, jwt: &JwtConfig, now: NaiveDateTime) -> AppResult<String> {
    if jwt.secret.is_empty() {
        return Err(AppError::Config("JWT secret is empty".to_string()));
    }

    let now = now.and_utc();
    let exp = now + Duration::hours(jwt.expiration_hours);
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: exp.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt.secret.as_bytes()),
    )?;
    Ok(token)
}

/// Decode and validate a JWT. Expiry is checked against `now` rather than
/// the system time so the application clock stays authoritative.
pub fn decode_jwt(token: &str, jwt: &JwtConfig, now: NaiveDateTime) -> AppResult<Claims> {
    let mut validation = Validation::default();
    validation.validate_exp = false;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt.secret.as_bytes()),
        &validation,
    )?;

    if token_data.claims.exp as i64 <= now.and_utc().timestamp() {
        tracing::debug!("Token for {} has expired", token_data.claims.sub);
        return Err(AppError::Unauthorized);
    }
    Ok(token_data.claims)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone_number: String,
}

impl SignupRequest {
    fn validate(&self) -> AppResult<()> {
        let username = self.username.trim();
        let len = username.chars().count();
        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
            return Err(AppError::Validation(format!(
                "Username must be between {} and {} characters",
                USERNAME_MIN_LEN, USERNAME_MAX_LEN
            )));
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            return Err(AppError::Validation(
                "Username may only contain letters, digits and @/./+/-/_".to_string(),
            ));
        }
        if self.password.chars().count() < PASSWORD_MIN_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                PASSWORD_MIN_LEN
            )));
        }
        Ok(())
    }
}

pub struct AuthService;

impl AuthService {
    /// Resolve the user behind a bearer token. Suspended and deleted accounts
    /// are treated as unauthenticated.
    pub async fn get_user_from_token(
        pool: &SqlitePool,
        jwt: &JwtConfig,
        token: &str,
        now: NaiveDateTime,
    ) -> AppResult<User> {
        let claims = decode_jwt(token, jwt, now)?;
        let user = UserRepository::find_by_id(pool, &claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            tracing::debug!("Rejecting token of suspended user {}", user.id);
            return Err(AppError::Unauthorized);
        }
        Ok(user)
    }

    pub async fn signup(pool: &SqlitePool, request: SignupRequest, now: NaiveDateTime) -> AppResult<User> {
        request.validate()?;

        let user = UserRepository::create(
            pool,
            CreateUser {
                username: request.username.trim().to_string(),
                email: request.email.trim().to_string(),
                password_hash: hash_password(&request.password)?,
                phone_number: request.phone_number.trim().to_string(),
                is_staff: false,
                is_superuser: false,
            },
            now,
        )
        .await?;

        tracing::info!("New account registered: {}", user.username);
        Ok(user)
    }

    /// Check credentials and stamp `last_login`.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable (401);
    /// a correct password on a suspended account is 403.
    pub async fn login(
        pool: &SqlitePool,
        username: &str,
        password: &str,
        now: NaiveDateTime,
    ) -> AppResult<User> {
        let Some(user) = UserRepository::find_by_username(pool, username.trim()).await? else {
            tracing::warn!("Login attempt for unknown user");
            return Err(AppError::Unauthorized);
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!("Invalid password for user {}", user.id);
            return Err(AppError::Unauthorized);
        }

        if !user.is_active {
            tracing::warn!("Suspended user {} tried to log in", user.id);
            return Err(AppError::Forbidden);
        }

        UserRepository::touch_last_login(pool, &user.id, now).await?;
        Ok(User {
            last_login: Some(now),
            ..user
        })
    }
}
