//! JSON body and path parameter extractors that reject with the
//! standard response envelope.
//!
//! Axum's built-in `Json` and `Path` rejections render as plain text;
//! these wrappers convert them into an [`ApiError`] so a malformed body
//! or a non-numeric path segment still produces `{code, data, message}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use userhub_core::error::AppError;

use crate::error::ApiError;

/// `axum::Json` with envelope-shaped rejections.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                ApiError(AppError::validation(rejection.body_text()))
            })?;
        Ok(ApiJson(value))
    }
}

/// `axum::extract::Path` with envelope-shaped rejections.
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) = axum::extract::Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| {
                ApiError(AppError::validation(rejection.body_text()))
            })?;
        Ok(ApiPath(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::routing::{get, post};
    use serde::Deserialize;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct ItemBody {
        #[allow(dead_code)]
        name: String,
    }

    async fn create_item(ApiJson(_body): ApiJson<ItemBody>) -> StatusCode {
        StatusCode::OK
    }

    async fn get_item(ApiPath(_id): ApiPath<i64>) -> StatusCode {
        StatusCode::OK
    }

    fn test_router() -> Router {
        Router::new()
            .route("/items", post(create_item))
            .route("/items/{id}", get(get_item))
    }

    async fn body_json(body: Body) -> Value {
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_malformed_json_body_gets_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/items")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response.into_body()).await;
        assert_eq!(body["code"], 400);
        assert!(body["message"].is_string());
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_missing_content_type_gets_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/items")
            .body(Body::from(r#"{"name":"x"}"#))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response.into_body()).await;
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_non_numeric_path_param_gets_envelope() {
        let request = Request::builder()
            .uri("/items/abc")
            .body(Body::empty())
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response.into_body()).await;
        assert_eq!(body["code"], 400);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_well_formed_input_passes_through() {
        let request = Request::builder()
            .method("POST")
            .uri("/items")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"widget"}"#))
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("/items/42")
            .body(Body::empty())
            .unwrap();

        let response = test_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
