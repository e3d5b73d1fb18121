use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::state::session::SaveStatus;

/// Response to a guest session creation.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionCreated {
    /// Identifier the client presents on every subsequent call.
    pub session_id: Uuid,
}

/// Payload linking a guest session to a durable account.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LinkRequest {
    /// User id issued by the auth provider.
    #[validate(length(min = 1, message = "uid must not be empty"))]
    pub uid: String,
}

/// Current save indicator of a session.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveStatusResponse {
    /// Indicator value.
    pub status: SaveStatus,
}
