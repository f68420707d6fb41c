use crate::access::RedirectTarget;
use crate::models::PresentedCredential;
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

/// Guards the reception sub-pages. A visitor without a valid credential is
/// sent to the reception login with the requested page as `url`, so a
/// successful login continues there.
pub async fn reception_gate(
    State(state): State<AppState>,
    credential: PresentedCredential,
    request: Request<Body>,
    next: Next,
) -> Response {
    if state.gate.admits(credential.as_deref()) {
        return next.run(request).await;
    }

    let login = request
        .uri()
        .path()
        .strip_prefix("/mottagning/")
        .and_then(RedirectTarget::parse)
        .map(|target| format!("/mottagning?url={}", target.as_str()))
        .unwrap_or_else(|| "/mottagning".to_string());

    tracing::info!(path = %request.uri().path(), "Locked reception page, redirecting to login");
    Redirect::to(&login).into_response()
}
