use axum::{Json, extract::State};
use kanau::processor::Processor;
use tastycart_core::entities::coupons::FindActiveCoupon;
use tastycart_core::services::PaymentError;
use tastycart_sdk::objects::storefront::{CouponApplyRequest, CouponApplyResponse};

use crate::api::error::ApiError;
use crate::api::extractors::ValidatedJson;
use crate::state::AppState;

/// `POST /api/coupon/apply`: look up an active, unexpired coupon.
///
/// Only reports the discount; the order amount is computed by the storefront.
pub async fn apply_coupon(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CouponApplyRequest>,
) -> Result<Json<CouponApplyResponse>, ApiError> {
    let code = request.coupon_code.trim().to_string();
    let Some(coupon) = state.db().process(FindActiveCoupon { code }).await? else {
        tracing::debug!("Coupon rejected");
        return Err(PaymentError::NotFound("Coupon").into());
    };

    Ok(Json(CouponApplyResponse {
        valid: true,
        discount: coupon.discount_percentage,
        coupon_id: coupon.id,
        message: "Coupon applied successfully".into(),
    }))
}
