// HTTP surface: routing, handlers, templates and session cookies

pub mod handlers;
pub mod models;
pub mod response;
pub mod router;
pub mod session_cookie;
pub mod state;
pub mod templates;

pub use router::app_router;
pub use state::AppState;
