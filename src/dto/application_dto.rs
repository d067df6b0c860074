use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::application::ApplicationStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyPayload {
    pub listing_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateApplicationStatusPayload {
    pub status: ApplicationStatus,
}
