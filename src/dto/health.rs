use serde::Serialize;
use utoipa::ToSchema;

/// Health payload for the `/healthcheck` route.
///
/// `storage` calls out the degraded-mode cause explicitly so monitoring does
/// not have to infer it from the overall status.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Document-store reachability ("connected" or "unavailable").
    pub storage: String,
}

impl HealthResponse {
    /// Payload for a fully operational service.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            storage: "connected".to_string(),
        }
    }

    /// Payload for degraded mode, when the document store is unreachable.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            storage: "unavailable".to_string(),
        }
    }
}
