pub mod answer;
pub mod error;
pub mod html_state;
pub mod routes;

use axum::{extract::FromRef, Router};
use html_state::HtmlState;

pub type OpenAIClientType = async_openai::Client<async_openai::config::OpenAIConfig>;

/// Html routes
pub fn html_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    HtmlState: FromRef<S>,
{
    Router::new()
        .merge(routes::index::router())
        .merge(routes::query::router())
        .merge(routes::search::router())
        .merge(routes::documents::router())
}
