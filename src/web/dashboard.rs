use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::{
    api::{ApiError, ListQuery, SortDir, SortField, Student, StudentPage},
    session::Session,
    web::{
        AppState,
        auth::session_from_jar,
        pagination::{has_next, has_prev, page_summary, page_window, parse_page},
        templates::{escape_html, render_footer},
    },
};

#[derive(Default, Deserialize)]
pub struct DashboardQuery {
    pub page: Option<String>,
    pub size: Option<u64>,
    pub keyword: Option<String>,
    pub sort_field: Option<String>,
    pub sort_dir: Option<String>,
    pub edit: Option<i64>,
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Gate for every dashboard route: no session means a redirect to the login
/// page and nothing else runs.
pub async fn require_session(
    state: &AppState,
    jar: &CookieJar,
) -> Result<(Uuid, Session), Redirect> {
    session_from_jar(state, jar)
        .await
        .ok_or_else(|| Redirect::to("/login"))
}

/// Outcome of the table fetch; a failure still renders the page, with a
/// single error row in place of data.
enum TableView {
    Loaded(StudentPage),
    Failed,
}

/// Values shown in the modal form: a record fetched for editing, or a
/// submission handed back after a failed save so nothing the user typed is
/// lost. An empty id means create mode.
#[derive(Debug, Clone, Default)]
pub struct ModalForm {
    pub id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub gender: String,
    pub phone: String,
    pub date_of_birth: String,
}

impl ModalForm {
    pub fn from_student(student: &Student) -> Self {
        Self {
            id: student.id.to_string(),
            name: student.name.clone(),
            email: student.email.clone(),
            department: student.department.clone().unwrap_or_default(),
            gender: student.gender.clone().unwrap_or_default(),
            phone: student.phone.clone().unwrap_or_default(),
            date_of_birth: student
                .date_of_birth
                .as_deref()
                .map(date_input_value)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<DashboardQuery>,
) -> Result<Html<String>, Redirect> {
    let (session_id, session) = require_session(&state, &jar).await?;

    let query = list_query_from(&params);
    let mut flash = compose_flash_message(params.status.as_deref(), params.error.as_deref());

    // ?edit={id} opens the modal populated with the fetched record; when the
    // fetch fails the modal stays closed and only a flash is shown.
    let modal = match params.edit {
        Some(id) => match state.api().get_student(&session.token, id).await {
            Ok(student) => Some(ModalForm::from_student(&student)),
            Err(ApiError::Unauthorized) => {
                state.sessions().clear(session_id).await;
                return Err(Redirect::to("/login?error=session_expired"));
            }
            Err(err) => {
                error!(?err, student_id = id, "failed to load student for editing");
                flash.push_str(
                    r#"<div class="flash error">Failed to load student details.</div>"#,
                );
                None
            }
        },
        None => None,
    };

    render_dashboard_page(&state, session_id, &session, &query, modal.as_ref(), &flash).await
}

/// Fetch the table and render the full dashboard page. Shared by the page
/// handler and the form handlers that re-render after a failed save.
pub async fn render_dashboard_page(
    state: &AppState,
    session_id: Uuid,
    session: &Session,
    query: &ListQuery,
    modal: Option<&ModalForm>,
    flash: &str,
) -> Result<Html<String>, Redirect> {
    let table = match state.api().list_students(&session.token, query).await {
        Ok(page) => TableView::Loaded(page),
        Err(ApiError::Unauthorized) => {
            state.sessions().clear(session_id).await;
            return Err(Redirect::to("/login?error=session_expired"));
        }
        Err(err) => {
            error!(?err, "failed to load students");
            TableView::Failed
        }
    };

    Ok(Html(render_dashboard(session, query, &table, modal, flash)))
}

fn list_query_from(params: &DashboardQuery) -> ListQuery {
    ListQuery {
        page: parse_page(params.page.as_deref()),
        size: params.size.filter(|size| *size > 0).unwrap_or(10),
        keyword: params
            .keyword
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        sort_field: SortField::parse(params.sort_field.as_deref()),
        sort_dir: SortDir::parse(params.sort_dir.as_deref()),
    }
}

/// Dashboard query string for the given page, keeping keyword, sort and size.
fn query_string_for_page(query: &ListQuery, page: u64) -> String {
    let mut qs = format!(
        "page={page}&size={size}&sort_field={field}&sort_dir={dir}",
        size = query.size,
        field = query.sort_field.as_str(),
        dir = query.sort_dir.as_str(),
    );
    if !query.keyword.is_empty() {
        qs.push_str("&keyword=");
        qs.push_str(&urlencoding::encode(&query.keyword));
    }
    qs
}

/// Hidden inputs that let form posts carry the current query state back so
/// the redirect can restore the same view.
fn hidden_query_fields(query: &ListQuery) -> String {
    format!(
        r#"<input type="hidden" name="page" value="{page}">
<input type="hidden" name="size" value="{size}">
<input type="hidden" name="sort_field" value="{field}">
<input type="hidden" name="sort_dir" value="{dir}">
<input type="hidden" name="keyword" value="{keyword}">"#,
        page = query.page,
        size = query.size,
        field = query.sort_field.as_str(),
        dir = query.sort_dir.as_str(),
        keyword = escape_html(&query.keyword),
    )
}

pub fn compose_flash_message(status: Option<&str>, error: Option<&str>) -> String {
    if let Some(status) = status {
        let message = match status {
            "created" => "Student created.",
            "updated" => "Student updated.",
            "deleted" => "Student deleted.",
            _ => "",
        };
        if !message.is_empty() {
            return format!(r#"<div class="flash success">{message}</div>"#);
        }
    }

    if let Some(error) = error {
        let message = match error {
            "missing_name" => "Name is required.",
            "missing_email" => "Email is required.",
            "save_failed" => "Failed to save student. Check backend logs.",
            "delete_failed" => "Failed to delete student.",
            _ => "Something went wrong. Check the logs.",
        };
        return format!(r#"<div class="flash error">{message}</div>"#);
    }

    String::new()
}

/// Date inputs take `yyyy-MM-dd`; the backend sometimes hands back a full
/// ISO timestamp, so only the first ten characters go into the field.
fn date_input_value(raw: &str) -> &str {
    raw.get(..10).unwrap_or(raw)
}

fn render_dashboard(
    session: &Session,
    query: &ListQuery,
    table: &TableView,
    modal: Option<&ModalForm>,
    flash: &str,
) -> String {
    let username = escape_html(&session.username);
    let role = escape_html(&session.role);
    let footer = render_footer();

    let (table_rows, summary_html, pagination_html) = match table {
        TableView::Loaded(page) => {
            // The controls always derive from what the backend reported, with
            // the request's own values as the fallback.
            let page_number = page.page_number.unwrap_or(query.page);
            let page_size = page.page_size.unwrap_or(query.size);
            let total_elements = page.total_elements.unwrap_or(page.content.len() as u64);
            let total_pages = page.total_pages.unwrap_or(1);

            let effective = ListQuery {
                page: page_number,
                ..query.clone()
            };

            (
                render_rows(&page.content, &effective),
                format!(
                    r#"<p class="page-info">{}</p>"#,
                    page_summary(page_number, page_size, total_elements)
                ),
                render_pagination(&effective, page_number, total_pages),
            )
        }
        TableView::Failed => (
            r#"<tr><td colspan="7" class="table-note error-note">Failed to load students. Check backend logs.</td></tr>"#
                .to_string(),
            String::new(),
            String::new(),
        ),
    };

    let filter_bar = render_filter_bar(query);
    let modal_html = render_student_modal(query, modal);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Students — Student Admin Console</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    <style>
{styles}
    </style>
</head>
<body>
    <header>
        <div class="header-bar">
            <h1>Student Admin Console</h1>
            <div class="header-actions">
                <span>Signed in as <strong>{username}</strong> <span class="role-tag">{role}</span></span>
                <form class="logout-form" method="post" action="/logout">
                    <button type="submit" class="btn-sm btn-muted">Logout</button>
                </form>
            </div>
        </div>
    </header>
    <main>
        {flash}
        <div class="toolbar">
            {filter_bar}
            <button type="button" class="btn-primary" onclick="openStudentModal()">+ Add Student</button>
        </div>
        <table class="students-table">
            <thead>
                <tr><th>ID</th><th>Name</th><th>Email</th><th>Department</th><th>Gender</th><th>Phone</th><th class="actions-col">Actions</th></tr>
            </thead>
            <tbody>
                {table_rows}
            </tbody>
        </table>
        {summary}
        {pagination}
        {modal}
        {footer}
    </main>
    <script>
        function openStudentModal() {{
            document.getElementById('student-modal').classList.add('open');
        }}
        function closeStudentModal() {{
            document.getElementById('student-modal').classList.remove('open');
        }}
        document.getElementById('student-form').addEventListener('submit', function () {{
            var btn = document.getElementById('student-save-btn');
            btn.disabled = true;
            btn.textContent = 'Saving...';
        }});
    </script>
</body>
</html>"#,
        styles = DASHBOARD_STYLES,
        username = username,
        role = role,
        flash = flash,
        filter_bar = filter_bar,
        table_rows = table_rows,
        summary = summary_html,
        pagination = pagination_html,
        modal = modal_html,
        footer = footer,
    )
}

fn render_rows(students: &[Student], query: &ListQuery) -> String {
    if students.is_empty() {
        return r#"<tr><td colspan="7" class="table-note">No students found.</td></tr>"#.to_string();
    }

    let qs = query_string_for_page(query, query.page);
    let hidden_fields = hidden_query_fields(query);

    let mut rows = String::new();
    for student in students {
        rows.push_str(&format!(
            r#"<tr>
    <td>{id}</td>
    <td>{name}</td>
    <td>{email}</td>
    <td>{department}</td>
    <td>{gender}</td>
    <td>{phone}</td>
    <td class="actions">
        <a class="btn-sm" href="/dashboard?edit={id}&amp;{qs}">Edit</a>
        <form method="post" action="/dashboard/students/delete" class="inline-form" onsubmit="return confirm('Are you sure you want to delete this student?');">
            <input type="hidden" name="id" value="{id}">
            {hidden_fields}
            <button type="submit" class="btn-sm btn-danger">Delete</button>
        </form>
    </td>
</tr>"#,
            id = student.id,
            name = escape_html(&student.name),
            email = escape_html(&student.email),
            department = escape_html(student.department.as_deref().unwrap_or("")),
            gender = escape_html(student.gender.as_deref().unwrap_or("")),
            phone = escape_html(student.phone.as_deref().unwrap_or("")),
            qs = escape_html(&qs),
            hidden_fields = hidden_fields,
        ));
    }
    rows
}

fn render_filter_bar(query: &ListQuery) -> String {
    let clear_href = format!(
        "/dashboard?size={size}&sort_field={field}&sort_dir={dir}",
        size = query.size,
        field = query.sort_field.as_str(),
        dir = query.sort_dir.as_str(),
    );

    let sort_field_options = [
        (SortField::Id, "ID"),
        (SortField::Name, "Name"),
        (SortField::Email, "Email"),
        (SortField::Department, "Department"),
    ]
    .iter()
    .map(|(field, label)| {
        format!(
            r#"<option value="{value}"{selected}>Sort: {label}</option>"#,
            value = field.as_str(),
            selected = if *field == query.sort_field {
                " selected"
            } else {
                ""
            },
        )
    })
    .collect::<String>();

    let sort_dir_options = [(SortDir::Asc, "Ascending"), (SortDir::Desc, "Descending")]
        .iter()
        .map(|(dir, label)| {
            format!(
                r#"<option value="{value}"{selected}>{label}</option>"#,
                value = dir.as_str(),
                selected = if *dir == query.sort_dir { " selected" } else { "" },
            )
        })
        .collect::<String>();

    let size_options = [5u64, 10, 20, 50]
        .iter()
        .map(|size| {
            format!(
                r#"<option value="{size}"{selected}>{size} / page</option>"#,
                selected = if *size == query.size { " selected" } else { "" },
            )
        })
        .collect::<String>();

    // A plain GET form: submitting (including Enter in the search box or a
    // select's onchange) lands back on /dashboard with page reset to 0.
    format!(
        r#"<form method="get" action="/dashboard" class="filter-bar">
    <input type="text" name="keyword" value="{keyword}" placeholder="Search name, email or department">
    <button type="submit" class="btn-sm">Search</button>
    <a class="btn-sm btn-muted" href="{clear_href}">Clear</a>
    <select name="sort_field" onchange="this.form.submit()">{sort_field_options}</select>
    <select name="sort_dir" onchange="this.form.submit()">{sort_dir_options}</select>
    <select name="size" onchange="this.form.submit()">{size_options}</select>
</form>"#,
        keyword = escape_html(&query.keyword),
    )
}

fn render_pagination(query: &ListQuery, page_number: u64, total_pages: u64) -> String {
    let mut items = String::new();

    if has_prev(page_number) {
        items.push_str(&format!(
            r#"<a class="page-link" href="/dashboard?{qs}">&laquo;</a>"#,
            qs = escape_html(&query_string_for_page(query, page_number - 1)),
        ));
    } else {
        items.push_str(r#"<span class="page-link disabled">&laquo;</span>"#);
    }

    for page in page_window(page_number, total_pages) {
        if page == page_number {
            items.push_str(&format!(
                r#"<span class="page-link active">{label}</span>"#,
                label = page + 1,
            ));
        } else {
            items.push_str(&format!(
                r#"<a class="page-link" href="/dashboard?{qs}">{label}</a>"#,
                qs = escape_html(&query_string_for_page(query, page)),
                label = page + 1,
            ));
        }
    }

    if has_next(page_number, total_pages) {
        items.push_str(&format!(
            r#"<a class="page-link" href="/dashboard?{qs}">&raquo;</a>"#,
            qs = escape_html(&query_string_for_page(query, page_number + 1)),
        ));
    } else {
        items.push_str(r#"<span class="page-link disabled">&raquo;</span>"#);
    }

    format!(r#"<nav class="pagination">{items}</nav>"#)
}

fn render_student_modal(query: &ListQuery, form: Option<&ModalForm>) -> String {
    let open_class = if form.is_some() { " open" } else { "" };
    let values = form.cloned().unwrap_or_default();

    let (title, save_label) = if values.id.is_empty() {
        ("Add Student", "Create")
    } else {
        ("Edit Student", "Update")
    };

    let gender_options = ["", "Male", "Female", "Other"]
        .iter()
        .map(|option| {
            let label = if option.is_empty() { "—" } else { option };
            format!(
                r#"<option value="{option}"{selected}>{label}</option>"#,
                selected = if *option == values.gender { " selected" } else { "" },
            )
        })
        .collect::<String>();

    format!(
        r#"<div id="student-modal" class="modal{open_class}">
    <div class="modal-content">
        <div class="modal-header">
            <h3>{title}</h3>
        </div>
        <form method="post" action="/dashboard/students" id="student-form">
            <input type="hidden" name="id" value="{id_value}">
            {hidden_fields}
            <div class="field">
                <label for="student-name">Name</label>
                <input id="student-name" name="name" value="{name}" required>
            </div>
            <div class="field">
                <label for="student-email">Email</label>
                <input id="student-email" name="email" value="{email}" required>
            </div>
            <div class="field">
                <label for="student-department">Department</label>
                <input id="student-department" name="department" value="{department}">
            </div>
            <div class="field">
                <label for="student-gender">Gender</label>
                <select id="student-gender" name="gender">{gender_options}</select>
            </div>
            <div class="field">
                <label for="student-phone">Phone</label>
                <input id="student-phone" name="phone" value="{phone}">
            </div>
            <div class="field">
                <label for="student-dob">Date of birth</label>
                <input id="student-dob" type="date" name="date_of_birth" value="{dob}">
            </div>
            <div class="modal-actions">
                <button type="button" class="btn-sm btn-muted" onclick="closeStudentModal()">Cancel</button>
                <button type="submit" id="student-save-btn">{save_label}</button>
            </div>
        </form>
    </div>
</div>"#,
        id_value = escape_html(&values.id),
        hidden_fields = hidden_query_fields(query),
        name = escape_html(&values.name),
        email = escape_html(&values.email),
        department = escape_html(&values.department),
        phone = escape_html(&values.phone),
        dob = escape_html(date_input_value(&values.date_of_birth)),
    )
}

const DASHBOARD_STYLES: &str = r#"
        :root { color-scheme: light; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
        header { background: #ffffff; padding: 1.5rem; border-bottom: 1px solid #e2e8f0; }
        .header-bar { display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; }
        .header-bar h1 { margin: 0; font-size: 1.4rem; }
        .header-actions { display: flex; align-items: center; gap: 1rem; flex-wrap: wrap; }
        .header-actions span { color: #475569; font-size: 0.95rem; }
        .role-tag { background: #e0f2fe; color: #1d4ed8; border-radius: 999px; padding: 0.15rem 0.6rem; font-size: 0.8rem; font-weight: 600; }
        main { padding: 2rem 1.5rem; max-width: 1100px; margin: 0 auto; box-sizing: border-box; }
        .flash { padding: 1rem 1.25rem; border-radius: 10px; margin-bottom: 1.5rem; font-weight: 600; border: 1px solid transparent; }
        .flash.success { background: #ecfdf3; border-color: #bbf7d0; color: #166534; }
        .flash.error { background: #fef2f2; border-color: #fecaca; color: #b91c1c; }
        .toolbar { display: flex; justify-content: space-between; align-items: center; gap: 1rem; flex-wrap: wrap; margin-bottom: 1rem; }
        .filter-bar { display: flex; align-items: center; gap: 0.5rem; flex-wrap: wrap; }
        .filter-bar input[type="text"] { padding: 0.6rem 0.8rem; border-radius: 8px; border: 1px solid #cbd5f5; background: #ffffff; min-width: 220px; }
        .filter-bar select { padding: 0.55rem 0.7rem; border-radius: 8px; border: 1px solid #cbd5f5; background: #ffffff; }
        .btn-primary { padding: 0.65rem 1.1rem; border: none; border-radius: 8px; background: #2563eb; color: #ffffff; font-weight: 600; cursor: pointer; }
        .btn-primary:hover { background: #1d4ed8; }
        .btn-sm { display: inline-block; padding: 0.4rem 0.8rem; border-radius: 8px; border: 1px solid #cbd5f5; background: #ffffff; color: #1d4ed8; font-size: 0.88rem; font-weight: 600; cursor: pointer; text-decoration: none; }
        .btn-sm:hover { background: #e0f2fe; }
        .btn-muted { color: #475569; }
        .btn-danger { color: #b91c1c; border-color: #fecaca; }
        .btn-danger:hover { background: #fee2e2; }
        .students-table { width: 100%; border-collapse: collapse; background: #ffffff; border: 1px solid #e2e8f0; border-radius: 12px; overflow: hidden; }
        .students-table th, .students-table td { padding: 0.7rem 0.9rem; border-bottom: 1px solid #e2e8f0; text-align: left; font-size: 0.93rem; }
        .students-table th { background: #f1f5f9; font-weight: 600; }
        .actions-col, .actions { text-align: right; white-space: nowrap; }
        .inline-form { display: inline; }
        .table-note { text-align: center; padding: 2rem 1rem; color: #64748b; }
        .error-note { color: #b91c1c; }
        .page-info { margin: 1rem 0 0.5rem; color: #475569; font-size: 0.9rem; }
        .pagination { display: flex; gap: 0.35rem; flex-wrap: wrap; }
        .page-link { padding: 0.4rem 0.75rem; border-radius: 8px; border: 1px solid #e2e8f0; background: #ffffff; color: #1d4ed8; text-decoration: none; font-size: 0.9rem; }
        .page-link:hover { background: #e0f2fe; }
        .page-link.active { background: #2563eb; border-color: #2563eb; color: #ffffff; }
        .page-link.disabled { color: #94a3b8; cursor: default; }
        .modal { display: none; position: fixed; inset: 0; background: rgba(15, 23, 42, 0.45); align-items: center; justify-content: center; padding: 1.5rem; }
        .modal.open { display: flex; }
        .modal-content { background: #ffffff; border-radius: 14px; padding: 1.75rem; width: 100%; max-width: 460px; box-shadow: 0 24px 60px rgba(15, 23, 42, 0.2); box-sizing: border-box; }
        .modal-header h3 { margin: 0 0 1rem; }
        .field { margin-bottom: 0.9rem; }
        .field label { display: block; font-weight: 600; margin-bottom: 0.35rem; }
        .field input, .field select { width: 100%; padding: 0.65rem 0.8rem; border-radius: 8px; border: 1px solid #cbd5f5; background: #f8fafc; box-sizing: border-box; }
        .modal-actions { display: flex; justify-content: flex-end; gap: 0.6rem; margin-top: 1.25rem; }
        .modal-actions button[type="submit"] { padding: 0.55rem 1.1rem; border: none; border-radius: 8px; background: #2563eb; color: #ffffff; font-weight: 600; cursor: pointer; }
        .modal-actions button[type="submit"]:disabled { opacity: 0.6; cursor: not-allowed; }
        .app-footer { margin-top: 3rem; text-align: center; font-size: 0.85rem; color: #94a3b8; }
        @media (max-width: 768px) {
            main { padding: 1.5rem 1rem; }
            .students-table { font-size: 0.85rem; }
            .students-table th, .students-table td { padding: 0.5rem; }
        }
"#;
