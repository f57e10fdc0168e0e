pub mod auth;
pub mod dashboard;
pub mod pagination;
pub mod router;
pub mod state;
pub mod students;
pub mod templates;

pub use auth::SESSION_COOKIE;
pub use state::AppState;
pub use templates::{escape_html, render_footer, render_login_page};
