use chrono::{Datelike, Utc};

pub fn render_login_page(flash_html: &str, error_html: &str, username: &str) -> String {
    let footer = render_footer();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Student Admin Console</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    <style>
        :root {{ color-scheme: light; }}
        body {{ font-family: "Helvetica Neue", Arial, sans-serif; display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; margin: 0; background: #f1f5f9; color: #0f172a; padding: 1.5rem; box-sizing: border-box; gap: 1.5rem; }}
        main {{ width: 100%; max-width: 440px; display: flex; flex-direction: column; align-items: center; gap: 1.5rem; }}
        .panel {{ background: #ffffff; padding: 2.5rem 2.25rem; border-radius: 18px; box-shadow: 0 20px 60px rgba(15, 23, 42, 0.08); width: 100%; border: 1px solid #e2e8f0; box-sizing: border-box; }}
        h1 {{ margin: 0 0 1rem; font-size: 1.6rem; text-align: center; }}
        p.description {{ margin: 0 0 1.5rem; color: #475569; text-align: center; font-size: 0.95rem; }}
        label {{ display: block; margin-top: 1.2rem; font-weight: 600; letter-spacing: 0.01em; color: #0f172a; }}
        input {{ width: 100%; padding: 0.85rem; margin-top: 0.65rem; border-radius: 10px; border: 1px solid #cbd5f5; background: #f8fafc; color: #0f172a; font-size: 1rem; box-sizing: border-box; }}
        input:focus {{ outline: none; border-color: #2563eb; box-shadow: 0 0 0 3px rgba(37, 99, 235, 0.15); }}
        button {{ margin-top: 2rem; width: 100%; padding: 0.95rem; border: none; border-radius: 10px; background: #2563eb; color: #ffffff; font-weight: 600; font-size: 1.05rem; cursor: pointer; transition: background 0.15s ease; }}
        button:hover {{ background: #1d4ed8; }}
        button:disabled {{ opacity: 0.6; cursor: not-allowed; }}
        .flash {{ padding: 1rem 1.25rem; border-radius: 10px; margin-bottom: 0.5rem; font-weight: 600; border: 1px solid transparent; width: 100%; box-sizing: border-box; }}
        .flash.success {{ background: #ecfdf3; border-color: #bbf7d0; color: #166534; }}
        .flash.error {{ background: #fef2f2; border-color: #fecaca; color: #b91c1c; }}
        .form-error {{ margin: 1.25rem 0 0; padding: 0.85rem 1rem; border-radius: 10px; background: #fef2f2; border: 1px solid #fecaca; color: #b91c1c; font-size: 0.95rem; }}
        .app-footer {{ margin-top: 2.5rem; text-align: center; font-size: 0.85rem; color: #64748b; }}
    </style>
</head>
<body>
    <main>
        {flash_html}
        <section class="panel">
            <h1>Student Admin Console</h1>
            <p class="description">Sign in with your administrator account.</p>
            {error_html}
            <form method="post" action="/login" id="login-form">
                <label for="username">Username</label>
                <input id="username" name="username" value="{username}" required>
                <label for="password">Password</label>
                <input id="password" type="password" name="password" required>
                <button type="submit" id="login-btn">Sign in</button>
            </form>
        </section>
        {footer}
    </main>
    <script>
        document.getElementById('login-form').addEventListener('submit', function () {{
            var btn = document.getElementById('login-btn');
            btn.disabled = true;
            btn.textContent = 'Signing in...';
        }});
    </script>
</body>
</html>"#,
        flash_html = flash_html,
        error_html = error_html,
        username = escape_html(username),
        footer = footer,
    )
}

/// Inline error box shown above the login form.
pub fn render_form_error(message: &str) -> String {
    format!(
        r#"<div class="form-error">{}</div>"#,
        escape_html(message)
    )
}

pub fn render_footer() -> String {
    let current_year = Utc::now().year();
    format!(
        r#"<footer class="app-footer">© {year} Student Records Administration — internal use only</footer>"#,
        year = current_year
    )
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
