use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::listing::ListingStatus;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateListingPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub sector: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 1))]
    pub duration: String,
    pub stipend: Decimal,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub status: Option<ListingStatus>,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateListingPayload {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub company: Option<String>,
    #[validate(length(min = 1))]
    pub sector: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    pub duration: Option<String>,
    pub stipend: Option<Decimal>,
    pub skills_required: Option<Vec<String>>,
    pub description: Option<String>,
    pub status: Option<ListingStatus>,
    pub deadline: Option<NaiveDate>,
}

/// Query-string form of [`ListingFilter`]; `skills` is comma separated.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ListingListQuery {
    pub sector: Option<String>,
    pub location: Option<String>,
    pub skills: Option<String>,
    pub search: Option<String>,
    pub status: Option<ListingStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub sector: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub search: Option<String>,
    pub status: Option<ListingStatus>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<ListingListQuery> for ListingFilter {
    fn from(value: ListingListQuery) -> Self {
        let skills = value
            .skills
            .map(|raw| {
                raw.split(',')
                    .map(|skill| skill.trim().to_string())
                    .filter(|skill| !skill.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            sector: non_blank(value.sector),
            location: non_blank(value.location),
            skills,
            search: non_blank(value.search),
            status: value.status,
        }
    }
}
