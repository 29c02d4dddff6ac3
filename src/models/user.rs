use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use super::Genre;
use crate::error::{AppError, AppResult};

/// Access level carried in session credentials
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(AppError::Internal(format!("Unknown role: {}", other))),
        }
    }
}

/// A registered user as stored
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub favorite_genres: Vec<Genre>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn favorite_genre_names(&self) -> Vec<String> {
        self.favorite_genres
            .iter()
            .map(|g| g.genre_name.clone())
            .collect()
    }
}

/// Request body for registration
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub favorite_genres: Vec<Genre>,
}

impl RegisterRequest {
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [("first_name", &self.first_name), ("last_name", &self.last_name)] {
            let len = value.trim().chars().count();
            if !(2..=100).contains(&len) {
                return Err(AppError::InvalidInput(format!(
                    "{} must be between 2 and 100 characters",
                    field
                )));
            }
        }

        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !valid_email {
            return Err(AppError::InvalidInput("email is invalid".to_string()));
        }

        if self.password.chars().count() < 6 {
            return Err(AppError::InvalidInput(
                "password must be at least 6 characters".to_string(),
            ));
        }

        if self.favorite_genres.is_empty() {
            return Err(AppError::InvalidInput(
                "at least one favorite genre is required".to_string(),
            ));
        }

        Ok(())
    }

    /// Builds the stored user; registration always yields the USER role
    pub fn into_user(self, password_hash: String) -> User {
        let now = Utc::now();
        User {
            user_id: Uuid::new_v4().simple().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: normalize_email(&self.email),
            password_hash,
            role: Role::User,
            favorite_genres: self.favorite_genres,
            token: None,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: String,
}

/// Profile returned on login and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
    pub refresh_token: String,
    pub favorite_genres: Vec<Genre>,
}

impl UserResponse {
    pub fn new(user: &User, token: String, refresh_token: String) -> Self {
        Self {
            user_id: user.user_id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
            token,
            refresh_token,
            favorite_genres: user.favorite_genres.clone(),
        }
    }
}
