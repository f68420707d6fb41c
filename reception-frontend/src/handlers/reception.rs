use crate::access::{AccessController, AccessState, RedirectTarget, Submission};
use crate::models::{FeedCard, PresentedCredential};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use service_core::middleware::rate_limit::client_ip;
use std::net::SocketAddr;

pub struct ReceptionPage {
    pub slug: &'static str,
    pub title: &'static str,
    pub intro: &'static str,
}

/// Sub-pages behind the reception login, in menu order.
pub const RECEPTION_PAGES: &[ReceptionPage] = &[
    ReceptionPage {
        slug: "schema",
        title: "Schema",
        intro: "Här hittar du schemat för mottagningens aktiviteter.",
    },
    ReceptionPage {
        slug: "bilder",
        title: "Bilder",
        intro: "Bilder från årets mottagning.",
    },
    ReceptionPage {
        slug: "info",
        title: "Info",
        intro: "Praktisk information inför och under mottagningen.",
    },
    ReceptionPage {
        slug: "kontakt",
        title: "Kontakt",
        intro: "Frågor? Hör av dig till mottagningen@cl-sektionen.se eller en mottagare.",
    },
];

fn find_page(slug: &str) -> Option<&'static ReceptionPage> {
    RECEPTION_PAGES.iter().find(|page| page.slug == slug)
}

/// Everything the reception panel needs to render one [`AccessState`].
pub struct PanelView {
    pub unlocked: bool,
    pub error: Option<String>,
    pub cards: Vec<FeedCard>,
    /// Carried through the form so a login from a deep link continues there.
    pub redirect: Option<String>,
    pub pages: &'static [ReceptionPage],
}

impl PanelView {
    pub fn new(state: &AccessState, redirect: Option<&RedirectTarget>) -> Self {
        let (unlocked, error, cards) = match state {
            AccessState::LoggedIn(posts) => (true, None, FeedCard::from_feed(posts)),
            AccessState::Error(e) => (false, Some(e.to_string()), Vec::new()),
            AccessState::LoggedOut | AccessState::Checking => (false, None, Vec::new()),
        };

        Self {
            unlocked,
            error,
            cards,
            redirect: redirect.map(|target| target.as_str().to_string()),
            pages: RECEPTION_PAGES,
        }
    }
}

#[derive(Template)]
#[template(path = "mottagning.html")]
pub struct ReceptionTemplate {
    pub panel: PanelView,
}

/// The panel alone, swapped in by HTMX after a submission.
#[derive(Template)]
#[template(path = "partials/reception_panel.html")]
pub struct ReceptionPanelTemplate {
    pub panel: PanelView,
}

#[derive(Template)]
#[template(path = "mottagning_page.html")]
pub struct ReceptionSubpageTemplate {
    pub page: &'static ReceptionPage,
    pub pages: &'static [ReceptionPage],
}

#[derive(Deserialize)]
pub struct ReceptionQuery {
    pub url: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
    #[serde(default)]
    pub url: Option<String>,
}

pub async fn reception_page(
    State(state): State<AppState>,
    credential: PresentedCredential,
    Query(query): Query<ReceptionQuery>,
) -> impl IntoResponse {
    let redirect = query.url.as_deref().and_then(RedirectTarget::parse);
    let initial = state
        .gate
        .initial_state(credential.as_deref(), &state.feed_loader)
        .await;

    ReceptionTemplate {
        panel: PanelView::new(&initial, redirect.as_ref()),
    }
}

pub async fn login_handler(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let redirect = form.url.as_deref().and_then(RedirectTarget::parse);

    let mut controller = AccessController::new(
        state.verifier.clone(),
        state.feed_loader.clone(),
        redirect,
    )
    .with_client_ip(client_ip(&headers, peer, &state.trusted_proxies));

    let outcome = controller.submit_credential(&form.password).await;
    let htmx = headers.contains_key("hx-request");

    let mut response = match outcome {
        Submission::Navigate(path) if htmx => (StatusCode::OK, [("HX-Redirect", path)]).into_response(),
        Submission::Navigate(path) => Redirect::to(&path).into_response(),
        Submission::Settled => {
            let panel = PanelView::new(controller.state(), controller.redirect());
            if htmx {
                ReceptionPanelTemplate { panel }.into_response()
            } else {
                ReceptionTemplate { panel }.into_response()
            }
        }
    };

    for cookie in controller.granted_cookies() {
        response.headers_mut().append(SET_COOKIE, cookie.clone());
    }

    response
}

/// A gated sub-page; access is enforced by the reception gate middleware.
pub async fn reception_subpage(Path(slug): Path<String>) -> Response {
    match find_page(&slug) {
        Some(page) => ReceptionSubpageTemplate {
            page,
            pages: RECEPTION_PAGES,
        }
        .into_response(),
        None => (StatusCode::NOT_FOUND, "Sidan finns inte").into_response(),
    }
}
