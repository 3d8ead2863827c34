use axum::http::Uri;

use crate::utils::response::APIResponse;

pub async fn global_error_handler(uri: Uri) -> APIResponse {
    APIResponse::NotFound(format!("No route for {}", uri.path()))
}
