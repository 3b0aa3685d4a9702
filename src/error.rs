use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("order_items must be a non-empty list")]
    EmptyOrder,

    #[error("status must not be blank")]
    BlankStatus,

    #[error("invalid report range: {0}")]
    BadDateRange(&'static str),

    #[error("order {0} not found")]
    OrderNotFound(i32),

    // Display stays generic; the underlying error goes to the log only.
    #[error("internal error")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::EmptyOrder | AppError::BlankStatus | AppError::BadDateRange(..) => {
                StatusCode::BAD_REQUEST
            }
            AppError::OrderNotFound(..) => StatusCode::NOT_FOUND,
            AppError::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let AppError::Database(ref source) = self {
            error!("database failure: {source}");
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(
            AppError::EmptyOrder.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::BlankStatus.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::BadDateRange("start is after end")
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_order_maps_to_404() {
        assert_eq!(
            AppError::OrderNotFound(41).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn database_errors_do_not_leak_detail() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut);

        assert_eq!(err.to_string(), "internal error");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
