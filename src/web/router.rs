use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::web::handlers::{
    blog, contact, download_csv, health, home, login, login_page, logout, signup, signup_page,
};
use crate::web::state::AppState;

pub fn app_router(state: AppState) -> Router {
    let static_dir = state.static_dir.clone();
    Router::new()
        .route("/", get(home))
        .route("/download_csv", get(download_csv))
        .route("/blog", get(blog))
        .route("/contact", get(contact))
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/logout", post(logout))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
