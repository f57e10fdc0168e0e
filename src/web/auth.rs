use axum::{
    extract::{Form, Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::{
    api::ApiError,
    session::Session,
    web::{
        AppState,
        templates::{render_form_error, render_login_page},
    },
};

pub const SESSION_COOKIE: &str = "admin_session";

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Default, Deserialize)]
pub struct LoginQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Resolve the session referenced by the request cookie, if any.
pub async fn session_from_jar(state: &AppState, jar: &CookieJar) -> Option<(Uuid, Session)> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let id = Uuid::parse_str(cookie.value()).ok()?;
    let session = state.sessions().get(id).await?;
    Some((id, session))
}

/// An already signed-in visitor is sent straight to the dashboard; the form
/// is never rendered for them.
pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<LoginQuery>,
) -> Result<Html<String>, Redirect> {
    if session_from_jar(&state, &jar).await.is_some() {
        return Err(Redirect::to("/dashboard"));
    }

    let flash = compose_login_flash(&params);
    Ok(Html(render_login_page(&flash, "", "")))
}

pub async fn process_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), Html<String>> {
    let username = form.username.trim();

    // Presence checks only; no credential ever reaches the network when one
    // of the fields is blank.
    if username.is_empty() || form.password.is_empty() {
        let error = render_form_error("Please enter both username and password.");
        return Err(Html(render_login_page("", &error, username)));
    }

    let reply = match state.api().login(username, &form.password).await {
        Ok(reply) => reply,
        Err(ApiError::Unauthorized) => {
            let error = render_form_error("Invalid username or password.");
            return Err(Html(render_login_page("", &error, username)));
        }
        Err(ApiError::Status(status)) => {
            let error =
                render_form_error(&format!("Login failed ({status}). Check backend logs."));
            return Err(Html(render_login_page("", &error, username)));
        }
        Err(err) => {
            error!(?err, "failed to reach backend during login");
            let error =
                render_form_error("Unable to reach the student API. Is the backend running?");
            return Err(Html(render_login_page("", &error, username)));
        }
    };

    let session_id = state
        .sessions()
        .save(reply.token, reply.username, reply.role)
        .await;

    let mut cookie = Cookie::new(SESSION_COOKIE, session_id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);

    Ok((jar.add(cookie), Redirect::to("/dashboard")))
}

/// Drops the session locally; the backend is not told.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut jar = jar;

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(id) = Uuid::parse_str(cookie.value()) {
            state.sessions().clear(id).await;
        }
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.set_http_only(true);
    removal.set_same_site(SameSite::Lax);
    removal.set_max_age(cookie::time::Duration::seconds(0));
    jar = jar.remove(removal);

    (jar, Redirect::to("/login?status=logged_out"))
}

pub fn compose_login_flash(params: &LoginQuery) -> String {
    if let Some(status) = params.status.as_deref() {
        if status == "logged_out" {
            return r#"<div class="flash success">You have been logged out.</div>"#.to_string();
        }
    }

    if let Some(error) = params.error.as_deref() {
        let message = match error {
            "session_expired" => {
                "Your session expired or you're not authorized. Please login again."
            }
            _ => "Something went wrong. Please try again.",
        };
        return format!(r#"<div class="flash error">{message}</div>"#);
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_for_expired_session() {
        let params = LoginQuery {
            status: None,
            error: Some("session_expired".to_string()),
        };
        let flash = compose_login_flash(&params);
        assert!(flash.contains("Your session expired"));
        assert!(flash.contains("flash error"));
    }

    #[test]
    fn flash_for_logout() {
        let params = LoginQuery {
            status: Some("logged_out".to_string()),
            error: None,
        };
        assert!(compose_login_flash(&params).contains("logged out"));
    }

    #[test]
    fn no_flash_by_default() {
        assert!(compose_login_flash(&LoginQuery::default()).is_empty());
    }
}
