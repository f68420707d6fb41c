use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use std::convert::Infallible;

pub const CREDENTIAL_COOKIE: &str = "mottagning_key";

/// The `mottagning_key` cookie as presented by the browser, if any.
/// Whether it is valid is for [`crate::access::AccessGate`] to decide.
#[derive(Debug, Clone, Default)]
pub struct PresentedCredential(pub Option<String>);

impl PresentedCredential {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PresentedCredential
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(PresentedCredential(
            jar.get(CREDENTIAL_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .filter(|value| !value.is_empty()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(cookie: Option<&str>) -> PresentedCredential {
        let mut builder = Request::builder().uri("/mottagning");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        PresentedCredential::from_request_parts(&mut parts, &())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn reads_the_reception_cookie() {
        let credential = extract(Some("theme=dark; mottagning_key=secret123")).await;
        assert_eq!(credential.as_deref(), Some("secret123"));
    }

    #[tokio::test]
    async fn missing_or_empty_cookie_is_none() {
        assert_eq!(extract(None).await.as_deref(), None);
        assert_eq!(extract(Some("mottagning_key=")).await.as_deref(), None);
    }
}
