use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::error;

use crate::{
    api::{ApiError, ListQuery, SortDir, SortField, StudentPayload},
    web::{
        AppState,
        dashboard::{ModalForm, compose_flash_message, render_dashboard_page, require_session},
        pagination::parse_page,
    },
};

/// The modal form. A present id means update, an absent one means create;
/// the query-state fields ride along so the redirect restores the same view.
#[derive(Deserialize)]
pub struct StudentForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub sort_field: String,
    #[serde(default)]
    pub sort_dir: String,
}

#[derive(Deserialize)]
pub struct DeleteForm {
    pub id: i64,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub sort_field: String,
    #[serde(default)]
    pub sort_dir: String,
}

pub async fn save_student(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<StudentForm>,
) -> Result<Response, Redirect> {
    let (session_id, session) = require_session(&state, &jar).await?;

    let back = back_query(
        &form.page,
        form.size,
        &form.keyword,
        &form.sort_field,
        &form.sort_dir,
    );

    let name = form.name.trim();
    if name.is_empty() {
        return Ok(redirect_back(&back, "error=missing_name").into_response());
    }
    let email = form.email.trim();
    if email.is_empty() {
        return Ok(redirect_back(&back, "error=missing_email").into_response());
    }

    let payload = build_payload(&form);
    let id = form.id.trim().parse::<i64>().ok();

    let result = match id {
        Some(id) => {
            state
                .api()
                .update_student(&session.token, id, &payload)
                .await
        }
        None => state.api().create_student(&session.token, &payload).await,
    };

    match result {
        Ok(()) => {
            let status = if id.is_some() {
                "status=updated"
            } else {
                "status=created"
            };
            Ok(redirect_back(&back, status).into_response())
        }
        Err(ApiError::Unauthorized) => {
            state.sessions().clear(session_id).await;
            Err(Redirect::to("/login?error=session_expired"))
        }
        Err(err) => {
            // A redirect here would throw away everything the user typed, so
            // render the page again with the modal still open and populated
            // from the submission.
            error!(?err, student_id = ?id, "failed to save student");
            let modal = modal_from_form(&form);
            let flash = compose_flash_message(None, Some("save_failed"));
            let page = render_dashboard_page(
                &state,
                session_id,
                &session,
                &back,
                Some(&modal),
                &flash,
            )
            .await?;
            Ok(page.into_response())
        }
    }
}

/// The delete form's confirm() guard runs in the browser; by the time this
/// handler is reached the deletion is confirmed. The row disappears only
/// once the redirect re-fetches the list.
pub async fn delete_student(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect, Redirect> {
    let (session_id, session) = require_session(&state, &jar).await?;

    let back = back_query(
        &form.page,
        form.size,
        &form.keyword,
        &form.sort_field,
        &form.sort_dir,
    );

    match state.api().delete_student(&session.token, form.id).await {
        Ok(()) => Ok(redirect_back(&back, "status=deleted")),
        Err(ApiError::Unauthorized) => {
            state.sessions().clear(session_id).await;
            Err(Redirect::to("/login?error=session_expired"))
        }
        Err(err) => {
            error!(?err, student_id = form.id, "failed to delete student");
            Ok(redirect_back(&back, "error=delete_failed"))
        }
    }
}

/// Modal values straight from the submission, untrimmed, so the form shows
/// exactly what was typed.
fn modal_from_form(form: &StudentForm) -> ModalForm {
    ModalForm {
        id: form.id.trim().to_string(),
        name: form.name.clone(),
        email: form.email.clone(),
        department: form.department.clone(),
        gender: form.gender.clone(),
        phone: form.phone.clone(),
        date_of_birth: form.date_of_birth.clone(),
    }
}

fn build_payload(form: &StudentForm) -> StudentPayload {
    let dob = form.date_of_birth.trim();
    StudentPayload {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        department: form.department.trim().to_string(),
        gender: form.gender.clone(),
        phone: form.phone.trim().to_string(),
        date_of_birth: if dob.is_empty() {
            None
        } else {
            Some(dob.to_string())
        },
    }
}

fn back_query(
    page: &str,
    size: Option<u64>,
    keyword: &str,
    sort_field: &str,
    sort_dir: &str,
) -> ListQuery {
    ListQuery {
        page: parse_page(Some(page)),
        size: size.filter(|size| *size > 0).unwrap_or(10),
        keyword: keyword.trim().to_string(),
        sort_field: SortField::parse(Some(sort_field)),
        sort_dir: SortDir::parse(Some(sort_dir)),
    }
}

fn redirect_back(query: &ListQuery, outcome: &str) -> Redirect {
    let mut target = format!(
        "/dashboard?page={page}&size={size}&sort_field={field}&sort_dir={dir}",
        page = query.page,
        size = query.size,
        field = query.sort_field.as_str(),
        dir = query.sort_dir.as_str(),
    );
    if !query.keyword.is_empty() {
        target.push_str("&keyword=");
        target.push_str(&urlencoding::encode(&query.keyword));
    }
    target.push('&');
    target.push_str(outcome);
    Redirect::to(&target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, header};
    use axum_extra::extract::cookie::Cookie;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use crate::config::Config;
    use crate::web::SESSION_COOKIE;

    fn form() -> StudentForm {
        StudentForm {
            id: String::new(),
            name: "  Ada Lovelace ".to_string(),
            email: " ada@uni.edu ".to_string(),
            department: "Mathematics".to_string(),
            gender: "Female".to_string(),
            phone: String::new(),
            date_of_birth: String::new(),
            page: "0".to_string(),
            size: Some(10),
            keyword: String::new(),
            sort_field: "name".to_string(),
            sort_dir: "asc".to_string(),
        }
    }

    #[test]
    fn payload_trims_fields_and_nulls_empty_dob() {
        let payload = build_payload(&form());
        assert_eq!(payload.name, "Ada Lovelace");
        assert_eq!(payload.email, "ada@uni.edu");
        assert!(payload.date_of_birth.is_none());
    }

    #[test]
    fn payload_keeps_provided_dob() {
        let mut form = form();
        form.date_of_birth = "1990-05-12".to_string();
        assert_eq!(
            build_payload(&form).date_of_birth.as_deref(),
            Some("1990-05-12")
        );
    }

    #[test]
    fn modal_carries_typed_values_untrimmed() {
        let modal = modal_from_form(&form());
        assert_eq!(modal.name, "  Ada Lovelace ");
        assert_eq!(modal.email, " ada@uni.edu ");
        assert!(modal.id.is_empty());
    }

    #[test]
    fn back_query_recovers_carried_state() {
        let query = back_query("3", Some(20), " grace ", "email", "desc");
        assert_eq!(query.page, 3);
        assert_eq!(query.size, 20);
        assert_eq!(query.keyword, "grace");
        assert_eq!(query.sort_field, SortField::Email);
        assert_eq!(query.sort_dir, SortDir::Desc);
    }

    #[test]
    fn back_query_falls_back_on_garbage() {
        let query = back_query("nope", None, "", "phone", "sideways");
        assert_eq!(query.page, 0);
        assert_eq!(query.size, 10);
        assert_eq!(query.sort_field, SortField::Name);
        assert_eq!(query.sort_dir, SortDir::Asc);
    }

    // Backend double that answers every connection with the same canned
    // status line.
    async fn stub_backend(status_line: &'static str, connections: usize) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for _ in 0..connections {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let response =
                    format!("{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
                let _ = stream.write_all(response.as_bytes()).await;
            }
        });
        addr
    }

    async fn state_with_backend(addr: std::net::SocketAddr, dir: &tempfile::TempDir) -> AppState {
        AppState::with_config(Config {
            api_base_url: format!("http://{addr}"),
            session_store_path: dir.path().join("sessions.json"),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn failed_save_keeps_entered_data_on_screen() {
        // First connection fails the save, second serves the page re-render's
        // list fetch.
        let addr = stub_backend("HTTP/1.1 500 Internal Server Error", 2).await;
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backend(addr, &dir).await;

        let session_id = state
            .sessions()
            .save("jwt".into(), "admin".into(), "ROLE_ADMIN".into())
            .await;
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, session_id.to_string()));

        let mut submission = form();
        submission.date_of_birth = "1815-12-10".to_string();
        let response = save_student(State(state), jar, Form(submission))
            .await
            .expect("failed save should render the page, not redirect");

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Failed to save student"));
        assert!(html.contains("modal open"));
        assert!(html.contains(r#"value="  Ada Lovelace ""#));
        assert!(html.contains(r#"value="1815-12-10""#));
        assert!(html.contains(">Create<"));
    }

    #[tokio::test]
    async fn unauthorized_delete_clears_session_and_redirects() {
        let addr = stub_backend("HTTP/1.1 401 Unauthorized", 1).await;
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_backend(addr, &dir).await;

        let session_id = state
            .sessions()
            .save("stale-jwt".into(), "admin".into(), "ROLE_ADMIN".into())
            .await;
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, session_id.to_string()));

        let delete = DeleteForm {
            id: 7,
            page: "0".to_string(),
            size: Some(10),
            keyword: String::new(),
            sort_field: "name".to_string(),
            sort_dir: "asc".to_string(),
        };
        let result = delete_student(State(state.clone()), jar, Form(delete)).await;

        let response = result.err().expect("expected a redirect").into_response();
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login?error=session_expired"
        );
        assert!(!state.sessions().is_logged_in(session_id).await);
    }
}
