use axum::extract::Extension;
use axum::response::{IntoResponse, Redirect};
use log::debug;

use crate::config::LoginTarget;

pub async fn root(Extension(LoginTarget(target)): Extension<LoginTarget>) -> impl IntoResponse {
    debug!("Redirecting to {}", target);
    Redirect::temporary(&target)
}
