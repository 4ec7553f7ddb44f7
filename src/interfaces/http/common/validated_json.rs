//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` works like `axum::Json<T>`, but additionally runs
//! `validator::Validate::validate()` on the deserialized value and turns
//! failures into a 422 with field-level details, before any business logic
//! runs.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;

/// An extractor that deserializes JSON and validates it.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateReservationRequest {
///     #[validate(length(min = 1))]
///     station_id: String,
///     #[validate(length(max = 500))]
///     notes: Option<String>,
/// }
///
/// async fn handler(ValidatedJson(body): ValidatedJson<CreateReservationRequest>) {
///     // `body` passed validation
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

/// Rejection for `ValidatedJson` extraction failures
pub enum ValidatedJsonRejection {
    /// JSON parsing failed
    Json(JsonRejection),
    /// Field validation failed
    Invalid(validator::ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Json(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Invalid(errors) => {
                let details: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |e| {
                            match &e.message {
                                Some(msg) => format!("{}: {}", field, msg),
                                None => format!("{}: {:?}", field, e.code),
                            }
                        })
                    })
                    .collect();

                let message = if details.is_empty() {
                    "Validation failed".to_string()
                } else {
                    details.join(", ")
                };

                let body = ApiResponse::<()>::error(message);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::Invalid)?;

        Ok(ValidatedJson(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::Service;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct TestBody {
        #[validate(length(min = 1, max = 50))]
        station_id: String,
        #[validate(length(max = 10, message = "too long"))]
        notes: Option<String>,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<TestBody>) -> &'static str {
        "ok"
    }

    async fn send(body: Body, content_type: &str) -> axum::http::Response<Body> {
        let mut svc = Router::new()
            .route("/test", post(handler))
            .into_service();
        let req = Request::builder()
            .method("POST")
            .uri("/test")
            .header("content-type", content_type)
            .body(body)
            .unwrap();
        svc.call(req).await.unwrap()
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let body = serde_json::json!({"station_id": "st-1", "notes": "ok"});
        let resp = send(
            Body::from(serde_json::to_vec(&body).unwrap()),
            "application/json",
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let resp = send(Body::from("{not json"), "application/json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn failed_validation_is_422_with_field_message() {
        let body = serde_json::json!({"station_id": "", "notes": "way too long indeed"});
        let resp = send(
            Body::from(serde_json::to_vec(&body).unwrap()),
            "application/json",
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["success"], false);
        assert!(parsed["error"].as_str().unwrap().contains("notes: too long"));
    }
}
