use tracing::instrument;

use super::auth::{hash_password, verify_password, TokenService};
use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    models::{normalize_email, LoginRequest, RegisterRequest, RegisterResponse, UserResponse},
};

/// Creates a USER-role account; duplicate emails are a conflict
#[instrument(skip_all)]
pub async fn register(users: &dyn UserStore, request: RegisterRequest) -> AppResult<RegisterResponse> {
    request.validate()?;

    let email = normalize_email(&request.email);
    if users.email_exists(&email).await? {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    // Argon2 is CPU bound, keep it off the async workers
    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

    let user = request.into_user(password_hash);
    users.insert_user(&user).await?;

    tracing::info!(user_id = %user.user_id, "User registered");

    Ok(RegisterResponse {
        user_id: user.user_id,
    })
}

/// Verifies credentials and stores a freshly issued token pair
#[instrument(skip_all)]
pub async fn login(
    users: &dyn UserStore,
    tokens: &TokenService,
    request: LoginRequest,
) -> AppResult<UserResponse> {
    let rejected = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = users
        .find_by_email(&normalize_email(&request.email))
        .await?
        .ok_or_else(rejected)?;

    let password_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&request.password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?;
    if !valid {
        return Err(rejected());
    }

    let pair = tokens.issue(&user)?;
    users
        .update_tokens(&user.user_id, Some(&pair.token), Some(&pair.refresh_token))
        .await?;

    tracing::info!(user_id = %user.user_id, "User logged in");

    Ok(UserResponse::new(&user, pair.token, pair.refresh_token))
}

/// Rotates the token pair; the presented refresh token must be the stored one
#[instrument(skip_all)]
pub async fn refresh(
    users: &dyn UserStore,
    tokens: &TokenService,
    refresh_token: &str,
) -> AppResult<UserResponse> {
    let claims = tokens.verify_refresh(refresh_token)?;

    let user = users
        .find_by_id(&claims.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;

    if user.refresh_token.as_deref() != Some(refresh_token) {
        return Err(AppError::Unauthorized(
            "Refresh token has been revoked".to_string(),
        ));
    }

    let pair = tokens.issue(&user)?;
    users
        .update_tokens(&user.user_id, Some(&pair.token), Some(&pair.refresh_token))
        .await?;

    tracing::debug!(user_id = %user.user_id, "Tokens refreshed");

    Ok(UserResponse::new(&user, pair.token, pair.refresh_token))
}

pub async fn logout(users: &dyn UserStore, user_id: &str) -> AppResult<()> {
    users.update_tokens(user_id, None, None).await?;
    tracing::info!(user_id = %user_id, "User logged out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::MemoryStore, models::Genre};

    fn tokens() -> TokenService {
        TokenService::new("access-secret", "refresh-secret")
    }

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Hedy".to_string(),
            last_name: "Lamarr".to_string(),
            email: email.to_string(),
            password: "frequency-hopping".to_string(),
            favorite_genres: vec![Genre::new(3, "Romance")],
        }
    }

    fn credentials(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = MemoryStore::new();
        let registered = register(&store, registration("hedy@example.com"))
            .await
            .unwrap();

        let session = login(
            &store,
            &tokens(),
            credentials("HEDY@example.com", "frequency-hopping"),
        )
        .await
        .unwrap();
        assert_eq!(session.user_id, registered.user_id);
        assert_eq!(session.email, "hedy@example.com");

        let stored = store.find_by_id(&registered.user_id).await.unwrap().unwrap();
        assert_eq!(stored.token.as_deref(), Some(session.token.as_str()));
        assert_ne!(stored.password_hash, "frequency-hopping");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        register(&store, registration("hedy@example.com"))
            .await
            .unwrap();
        let err = register(&store, registration(" Hedy@Example.com "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_wrong_password_unauthorized() {
        let store = MemoryStore::new();
        register(&store, registration("hedy@example.com"))
            .await
            .unwrap();
        let err = login(&store, &tokens(), credentials("hedy@example.com", "wrong-one"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err = login(&store, &tokens(), credentials("nobody@example.com", "whatever"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_refresh_rotates_and_revokes_old_token() {
        let store = MemoryStore::new();
        register(&store, registration("hedy@example.com"))
            .await
            .unwrap();
        let svc = tokens();
        let session = login(&store, &svc, credentials("hedy@example.com", "frequency-hopping"))
            .await
            .unwrap();

        // iat has second resolution; make sure the rotated token differs
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        let rotated = refresh(&store, &svc, &session.refresh_token).await.unwrap();
        assert_ne!(rotated.refresh_token, session.refresh_token);

        let err = refresh(&store, &svc, &session.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_logout_clears_tokens() {
        let store = MemoryStore::new();
        let registered = register(&store, registration("hedy@example.com"))
            .await
            .unwrap();
        let svc = tokens();
        let session = login(&store, &svc, credentials("hedy@example.com", "frequency-hopping"))
            .await
            .unwrap();

        logout(&store, &registered.user_id).await.unwrap();

        let stored = store.find_by_id(&registered.user_id).await.unwrap().unwrap();
        assert!(stored.token.is_none());
        assert!(stored.refresh_token.is_none());
        assert!(refresh(&store, &svc, &session.refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_registration_rejected() {
        let store = MemoryStore::new();
        let mut request = registration("hedy@example.com");
        request.password = "123".to_string();
        let err = register(&store, request).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
