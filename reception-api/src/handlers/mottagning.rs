use crate::models::{FeedResponse, PostResponse};
use crate::startup::AppState;
use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::utils::secret::secrets_match;

/// Cookie holding the reception credential in the browser.
pub const CREDENTIAL_COOKIE: &str = "mottagning_key";

/// Header carrying the credential on feed requests.
pub const CREDENTIAL_HEADER: &str = "mottagning_key";

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct KeyResponse {
    pub mottagning_key: String,
}

/// `POST /api/mottagning-password`: trade the reception password for the
/// credential cookie. Rate limited per client IP by the router.
#[tracing::instrument(skip_all)]
pub async fn check_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<PasswordRequest>,
) -> Result<(CookieJar, Json<KeyResponse>), AppError> {
    if !secrets_match(&state.config.mottagning_key, &payload.password) {
        tracing::info!("Rejected reception password");
        return Err(AppError::Unauthorized(anyhow::anyhow!("Fel lösenord")));
    }

    let key = state.config.mottagning_key.expose_secret().clone();
    let cookie = Cookie::build((CREDENTIAL_COOKIE, key.clone()))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(state.config.cookie.max_age_days))
        .build();

    tracing::info!("Reception password accepted");
    Ok((jar.add(cookie), Json(KeyResponse { mottagning_key: key })))
}

/// `GET /api/mottagning-password`: the reception posts, for holders of the
/// credential. Undecodable posts are dropped and reported in `error`.
#[tracing::instrument(skip_all)]
pub async fn reception_feed(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<FeedResponse>, AppError> {
    let presented = headers
        .get(CREDENTIAL_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !secrets_match(&state.config.mottagning_key, presented) {
        return Err(AppError::Unauthorized(anyhow::anyhow!("Ogiltig nyckel")));
    }

    let batch = state.posts.reception_posts().await?;
    let error = (batch.skipped > 0)
        .then(|| format!("{} inlägg kunde inte läsas", batch.skipped));

    Ok(Json(FeedResponse {
        posts: batch.posts.into_iter().map(PostResponse::from).collect(),
        error,
    }))
}
