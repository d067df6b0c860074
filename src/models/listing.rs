use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::repository::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Open,
    Closed,
}

/// An internship posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub sector: String,
    pub location: String,
    pub duration: String,
    pub stipend: Decimal,
    pub skills_required: Vec<String>,
    pub description: String,
    pub status: ListingStatus,
    pub posted_date: NaiveDate,
    pub deadline: NaiveDate,
    pub posted_by: Option<Uuid>,
}

impl Record for Listing {
    fn id(&self) -> Uuid {
        self.id
    }
}
