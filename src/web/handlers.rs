use axum::{
    extract::{Form, Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Json, Redirect, Response},
};
use tracing::{info, warn};

use crate::blog::aggregate_posts;
use crate::constants::CSV_CONTENT_TYPE;
use crate::domain::Identity;
use crate::error::{Result, SiteError};
use crate::web::models::{
    display_rows, facet_selects, LoginForm, LoginQuery, ProjectionQuery, SignupForm,
};
use crate::web::session_cookie::{
    expired_session_cookie, login_redirect, safe_next, session_cookie, session_token,
};
use crate::web::state::AppState;
use crate::web::templates::{
    render, BlogTemplate, ContactTemplate, HomeTemplate, LoginTemplate, SignupTemplate,
};

fn current_user(state: &AppState, headers: &HeaderMap) -> Option<Identity> {
    session_token(headers).and_then(|token| state.sessions.identity(&token))
}

fn username(identity: Option<Identity>) -> Option<String> {
    identity.map(|i| i.username)
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "projections-site",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Projection table with position/team filters. Requires a session.
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<ProjectionQuery>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response> {
    let Some(identity) = current_user(&state, &headers) else {
        return Ok(login_redirect(&uri).into_response());
    };

    let view = state.projections.view(&query.to_filter_spec())?;
    let template = HomeTemplate {
        user: Some(identity.username),
        columns: view.columns.clone(),
        rows: display_rows(&view),
        facets: facet_selects(&view),
        last_updated: view.last_updated.clone(),
        total_rows: view.total_rows,
    };
    Ok(render(&template)?.into_response())
}

/// The whole CSV as an attachment. Query parameters are ignored. Requires a session.
pub async fn download_csv(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response> {
    if current_user(&state, &headers).is_none() {
        return Ok(login_redirect(&uri).into_response());
    }

    let export = state.projections.export()?;
    Ok((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.bytes,
    )
        .into_response())
}

pub async fn blog(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let posts = aggregate_posts(&state.blog_dir)?;
    let template = BlogTemplate {
        user: username(current_user(&state, &headers)),
        posts,
    };
    Ok(render(&template)?.into_response())
}

pub async fn contact(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let template = ContactTemplate {
        user: username(current_user(&state, &headers)),
    };
    Ok(render(&template)?.into_response())
}

pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let template = LoginTemplate {
        user: username(current_user(&state, &headers)),
        error: None,
        notice: query
            .registered
            .map(|_| "Account created. Please log in.".to_string()),
        username: String::new(),
        next: safe_next(query.next.as_deref()),
    };
    Ok(render(&template)?.into_response())
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response> {
    let next = safe_next(form.next.as_deref());
    match state.sessions.login(&form.username, &form.password).await {
        Ok(token) => Ok((
            [(header::SET_COOKIE, session_cookie(&token))],
            Redirect::to(&next),
        )
            .into_response()),
        Err(SiteError::InvalidCredentials) => {
            let err = SiteError::InvalidCredentials;
            let template = LoginTemplate {
                user: None,
                error: Some(err.user_message()),
                notice: None,
                username: form.username,
                next,
            };
            Ok((err.status_code(), render(&template)?).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn signup_page(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let template = SignupTemplate {
        user: username(current_user(&state, &headers)),
        error: None,
        username: String::new(),
    };
    Ok(render(&template)?.into_response())
}

pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Result<Response> {
    match state.sessions.register(&form.username, &form.password).await {
        Ok(account) => {
            info!("Signup completed for {}", account.username);
            Ok(Redirect::to("/login?registered=1").into_response())
        }
        Err(e @ (SiteError::DuplicateUsername(_) | SiteError::Validation(_))) => {
            warn!("Signup rejected: {}", e);
            let template = SignupTemplate {
                user: None,
                error: Some(e.user_message()),
                username: form.username,
            };
            Ok((e.status_code(), render(&template)?).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token(&headers) {
        state.sessions.logout(&token);
    }
    (
        StatusCode::SEE_OTHER,
        [
            (header::SET_COOKIE, expired_session_cookie()),
            (header::LOCATION, "/login".to_string()),
        ],
    )
}
