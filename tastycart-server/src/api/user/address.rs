use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use kanau::processor::Processor;
use tastycart_core::entities::addresses::{GetAddressesByUid, UpsertAddress};
use tastycart_core::entities::users::GetUserByUid;
use tastycart_core::services::PaymentError;
use tastycart_sdk::objects::storefront::{
    AddressAction, AddressRequest, AddressResponse, AddressSubmitResponse,
};

use crate::api::error::ApiError;
use crate::api::extractors::{Caller, ValidatedJson};
use crate::state::AppState;

use super::{ensure_owner, to_address};

/// `POST /api/address`: insert or replace the caller's saved address.
///
/// Responds `201` when the address was created and `200` when it replaced
/// an existing one.
pub async fn save_address(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ValidatedJson(request): ValidatedJson<AddressRequest>,
) -> Result<(StatusCode, Json<AddressSubmitResponse>), ApiError> {
    let db = state.db();
    db.process(GetUserByUid {
        uid: caller.uid.clone(),
    })
    .await?
    .ok_or(PaymentError::NotFound("User"))?;

    let upsert = db
        .process(UpsertAddress {
            uid: caller.uid,
            first_name: request.first_name,
            last_name: request.last_name,
            house_details: request.house_details,
            area_details: request.area_details,
            landmark: request.landmark,
            city: request.city,
            state: request.state,
            pincode: request.pincode,
            phone: request.phone,
            email: request.email,
        })
        .await?;

    let (status, action, message) = if upsert.inserted {
        (
            StatusCode::CREATED,
            AddressAction::Create,
            "Address created successfully",
        )
    } else {
        (
            StatusCode::OK,
            AddressAction::Update,
            "Address updated successfully",
        )
    };
    tracing::info!(address_id = upsert.id, ?action, "Address saved");

    Ok((
        status,
        Json(AddressSubmitResponse {
            success: true,
            message: message.into(),
            action,
            address_id: upsert.id,
        }),
    ))
}

/// `GET /api/get-address/{uid}`: the caller's saved address.
pub async fn get_address(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(uid): Path<String>,
) -> Result<Json<Vec<AddressResponse>>, ApiError> {
    ensure_owner(&caller, &uid)?;

    let records = state.db().process(GetAddressesByUid { uid }).await?;
    if records.is_empty() {
        return Err(PaymentError::NotFound("Address").into());
    }
    Ok(Json(records.into_iter().map(to_address).collect()))
}
