use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Not authorized")]
    Forbidden,

    #[error("Not authorized for this status change")]
    UnauthorizedTransition,

    #[error("Product not found")]
    ProductNotFound { product_id: Uuid },

    #[error("Insufficient stock: only {available} left")]
    InsufficientStock { product_id: Uuid, available: i32 },

    #[error("Coupon not applicable: {0}")]
    CouponNotApplicable(String),

    #[error("Seller pincode could not be resolved")]
    SellerPincodeUnknown,

    #[error("Delivery partner pincode could not be resolved")]
    PartnerPincodeUnknown,

    #[error("Pincode mismatch: seller {seller} vs partner {partner}")]
    PincodeMismatch { seller: String, partner: String },

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    invalid_product_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    available_stock: Option<i32>,
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION",
            Self::Forbidden => "FORBIDDEN",
            Self::UnauthorizedTransition => "UNAUTHORIZED_TRANSITION",
            Self::ProductNotFound { .. } => "PRODUCT_NOT_FOUND",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::CouponNotApplicable(_) => "COUPON_NOT_APPLICABLE",
            Self::SellerPincodeUnknown => "SELLER_PINCODE_UNKNOWN",
            Self::PartnerPincodeUnknown => "PARTNER_PINCODE_UNKNOWN",
            Self::PincodeMismatch { .. } => "PINCODE_MISMATCH",
            Self::DbError(_) | Self::OrmError(_) | Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden | Self::UnauthorizedTransition => StatusCode::FORBIDDEN,
            Self::Validation(_)
            | Self::ProductNotFound { .. }
            | Self::InsufficientStock { .. }
            | Self::CouponNotApplicable(_)
            | Self::SellerPincodeUnknown
            | Self::PartnerPincodeUnknown
            | Self::PincodeMismatch { .. } => StatusCode::BAD_REQUEST,
            Self::DbError(_) | Self::OrmError(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // 500s keep the detail server-side; the client only sees the generic
        // message from the variant's Display.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            match &self {
                AppError::DbError(err) => tracing::error!(error = %err, "database error"),
                AppError::OrmError(err) => tracing::error!(error = %err, "orm error"),
                AppError::Internal(err) => tracing::error!(error = %err, "internal error"),
                _ => {}
            }
        }

        let (invalid_product_id, available_stock) = match &self {
            AppError::ProductNotFound { product_id } => (Some(*product_id), None),
            AppError::InsufficientStock { product_id, available } => {
                (Some(*product_id), Some(*available))
            }
            _ => (None, None),
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error_type: self.error_type(),
                invalid_product_id,
                available_stock,
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(AppError::NotFound("Order").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::UnauthorizedTransition.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::InsufficientStock { product_id: Uuid::new_v4(), available: 2 }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::PincodeMismatch { seller: "1".into(), partner: "2".into() }.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn mismatch_message_names_both_pincodes() {
        let err = AppError::PincodeMismatch { seller: "483501".into(), partner: "483504".into() };
        let msg = err.to_string();
        assert!(msg.contains("483501"));
        assert!(msg.contains("483504"));
    }
}
