use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::repository::Record;
use crate::models::listing::Listing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    /// Every status may move to every other status, including back to
    /// `Pending` and from `Rejected` to `Approved`.
    pub fn can_transition_to(self, _next: ApplicationStatus) -> bool {
        true
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate's application against a listing. `listing` is a copy taken
/// when the application was made and is never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub candidate_id: Uuid,
    pub status: ApplicationStatus,
    pub applied_date: NaiveDate,
    pub listing: Listing,
}

impl Record for Application {
    fn id(&self) -> Uuid {
        self.id
    }
}
