use askama::Template;
use axum::response::Html;

use crate::blog::BlogPost;
use crate::error::Result;
use crate::web::models::FacetSelect;

pub fn render<T: Template>(template: &T) -> Result<Html<String>> {
    Ok(Html(template.render()?))
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub facets: Vec<FacetSelect>,
    pub last_updated: String,
    pub total_rows: usize,
}

#[derive(Template)]
#[template(path = "blog.html")]
pub struct BlogTemplate {
    pub user: Option<String>,
    pub posts: Vec<BlogPost>,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub user: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub user: Option<String>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub username: String,
    pub next: String,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub user: Option<String>,
    pub error: Option<String>,
    pub username: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub user: Option<String>,
    pub title: String,
    pub message: String,
}
