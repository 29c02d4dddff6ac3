//! Session credentials and password hashing.
//!
//! Tokens use the compact JWT layout (`header.payload.signature`, base64url)
//! signed with HMAC-SHA256. Access and refresh tokens use separate secrets so
//! one can never stand in for the other.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Role, User},
};

type HmacSha256 = Hmac<Sha256>;

const ISSUER: &str = "MagicStream";
const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Claims carried by both access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub user_id: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Deserialize)]
struct Header {
    alg: String,
}

/// Issues and verifies signed session tokens
#[derive(Clone)]
pub struct TokenService {
    access_secret: Vec<u8>,
    refresh_secret: Vec<u8>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        Self {
            access_secret: access_secret.as_bytes().to_vec(),
            refresh_secret: refresh_secret.as_bytes().to_vec(),
            access_ttl: Duration::hours(24),
            refresh_ttl: Duration::days(7),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.secret_key, &config.secret_refresh_key)
    }

    pub fn issue(&self, user: &User) -> AppResult<TokenPair> {
        let now = Utc::now();
        let claims = |ttl: Duration| SessionClaims {
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            user_id: user.user_id.clone(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        Ok(TokenPair {
            token: sign(&self.access_secret, &claims(self.access_ttl))?,
            refresh_token: sign(&self.refresh_secret, &claims(self.refresh_ttl))?,
        })
    }

    pub fn verify_access(&self, token: &str) -> AppResult<SessionClaims> {
        verify(&self.access_secret, token)
    }

    pub fn verify_refresh(&self, token: &str) -> AppResult<SessionClaims> {
        verify(&self.refresh_secret, token)
    }
}

fn mac(secret: &[u8], signing_input: &str) -> AppResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(format!("Invalid signing key: {}", e)))?;
    mac.update(signing_input.as_bytes());
    Ok(mac)
}

fn sign(secret: &[u8], claims: &SessionClaims) -> AppResult<String> {
    let payload = serde_json::to_vec(claims)
        .map_err(|e| AppError::Internal(format!("Failed to encode claims: {}", e)))?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(HEADER),
        URL_SAFE_NO_PAD.encode(payload)
    );
    let signature = mac(secret, &signing_input)?.finalize().into_bytes();

    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

fn verify(secret: &[u8], token: &str) -> AppResult<SessionClaims> {
    let invalid = || AppError::Unauthorized("Invalid or expired token".to_string());

    let (signing_input, signature) = token.rsplit_once('.').ok_or_else(invalid)?;
    let (header, payload) = signing_input.split_once('.').ok_or_else(invalid)?;
    if payload.contains('.') {
        return Err(invalid());
    }

    let header: Header = URL_SAFE_NO_PAD
        .decode(header)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or_else(invalid)?;
    if header.alg != "HS256" {
        return Err(invalid());
    }

    let signature = URL_SAFE_NO_PAD.decode(signature).map_err(|_| invalid())?;
    mac(secret, signing_input)?
        .verify_slice(&signature)
        .map_err(|_| invalid())?;

    let claims: SessionClaims = URL_SAFE_NO_PAD
        .decode(payload)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or_else(invalid)?;

    if claims.iss != ISSUER {
        return Err(invalid());
    }
    if claims.exp <= Utc::now().timestamp() {
        return Err(AppError::Unauthorized("Token expired".to_string()));
    }

    Ok(claims)
}

/// Hashes a password into a PHC string with Argon2id and a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
