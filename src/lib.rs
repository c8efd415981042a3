use axum::extract::Extension;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod routes;
pub mod url;

use config::LoginTarget;

/// Build the router. Only `/` is served; everything else falls through to 404.
pub fn app(target: &LoginTarget) -> Router {
    Router::new().route("/", get(routes::root::root)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(Extension(target.clone())),
    )
}
