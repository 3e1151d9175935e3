use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound { .. } => AppError::NotFound(e.to_string()),
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::InvalidTransition { .. } | DomainError::InsufficientStock { .. } => {
                AppError::Conflict(e.to_string())
            }
            DomainError::Cancelled => AppError::Timeout,
            DomainError::Persistence(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(detail) => {
                log::error!("request failed: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use uuid::Uuid;

    use crate::domain::order::OrderStatus;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("Order x not found".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn timeout_returns_504() {
        assert_eq!(
            AppError::Timeout.error_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn internal_error_display() {
        assert_eq!(
            AppError::Internal("msg".to_string()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let id = Uuid::new_v4();
        let app_err: AppError = DomainError::not_found("Category", id).into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, format!("Category {} not found", id)),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn domain_invalid_input_maps_to_bad_request() {
        let app_err: AppError = DomainError::InvalidInput("bad value".to_string()).into();
        assert!(matches!(app_err, AppError::BadRequest(ref m) if m == "bad value"));
    }

    #[test]
    fn domain_rule_violations_map_to_conflict() {
        let transition: AppError = DomainError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        }
        .into();
        assert_eq!(transition.status_code(), StatusCode::CONFLICT);

        let stock: AppError = DomainError::InsufficientStock {
            product_id: Uuid::new_v4(),
            requested: 3,
            available: 1,
        }
        .into();
        assert_eq!(stock.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn domain_cancelled_maps_to_timeout() {
        let app_err: AppError = DomainError::Cancelled.into();
        assert!(matches!(app_err, AppError::Timeout));
    }

    #[test]
    fn domain_persistence_maps_to_internal() {
        let app_err: AppError = DomainError::Persistence("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
