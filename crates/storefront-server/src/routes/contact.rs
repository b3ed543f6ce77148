//! Contact form endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use storefront_commerce::contact::NewContactMessage;
use storefront_commerce::MessageId;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
    pub message_id: MessageId,
}

/// Leave a message: `POST /api/contact`
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<NewContactMessage>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ContactResponse>)> {
    let Json(input) = payload?;
    let message_id = state.contact.submit(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            success: true,
            message: "Message sent successfully",
            message_id,
        }),
    ))
}
