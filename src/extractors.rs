use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;

use crate::error::{HttpErrorResponse, ModelServeError};

/// JSON body extractor that rejects with the service error shape.
///
/// `axum::Json` replies to malformed bodies with plain-text rejections; this
/// wrapper keeps the rejection's status (415/400/422) but renders the message
/// as the structured `{"detail": ...}` body the rest of the API speaks. A
/// request with an invalid body is answered here, before handler logic runs.
pub(crate) struct ApiJson<T>(pub(crate) T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ModelServeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ModelServeError {
                status: rejection.status(),
                message: HttpErrorResponse::from(rejection.body_text()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request as HttpRequest, StatusCode};

    use super::*;
    use crate::predict::IrisFeatures;

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/predict/logistic_model")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn expect_rejection(req: Request) -> ModelServeError {
        match ApiJson::<IrisFeatures>::from_request(req, &()).await {
            Ok(_) => panic!("expected the body to be rejected"),
            Err(err) => err,
        }
    }

    #[tokio::test]
    async fn accepts_a_well_formed_body() {
        let req = json_request(
            r#"{"sepal_length":5.1,"sepal_width":3.5,"petal_length":1.4,"petal_width":0.2}"#,
        );

        let ApiJson(features) = ApiJson::<IrisFeatures>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(features.sepal_length, 5.1);
    }

    #[tokio::test]
    async fn missing_field_rejects_as_unprocessable() {
        let req = json_request(r#"{"sepal_length":5.1}"#);

        let err = expect_rejection(req).await;
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn malformed_json_rejects_as_bad_request() {
        let req = json_request("{not json");

        let err = expect_rejection(req).await;
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_rejects_as_unsupported_media_type() {
        let req = HttpRequest::builder()
            .method("POST")
            .uri("/predict/logistic_model")
            .body(Body::from(
                r#"{"sepal_length":5.1,"sepal_width":3.5,"petal_length":1.4,"petal_width":0.2}"#,
            ))
            .unwrap();

        let err = expect_rejection(req).await;
        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
