use std::sync::Arc;

use uuid::Uuid;

use crate::database::repository::Repository;
use crate::dto::listing_dto::{CreateListingPayload, ListingFilter, UpdateListingPayload};
use crate::error::Result;
use crate::models::listing::Listing;
use crate::utils::time::today;

#[derive(Clone)]
pub struct ListingService {
    listings: Arc<dyn Repository<Listing>>,
}

impl ListingService {
    pub fn new(listings: Arc<dyn Repository<Listing>>) -> Self {
        Self { listings }
    }

    pub async fn create(&self, payload: CreateListingPayload, posted_by: Option<Uuid>) -> Result<Listing> {
        let listing = Listing {
            id: Uuid::new_v4(),
            title: payload.title,
            company: payload.company,
            sector: payload.sector,
            location: payload.location,
            duration: payload.duration,
            stipend: payload.stipend,
            skills_required: payload.skills_required,
            description: payload.description,
            status: payload.status.unwrap_or_default(),
            posted_date: today(),
            deadline: payload.deadline,
            posted_by,
        };
        let listing = self.listings.insert(listing).await?;
        tracing::info!(listing_id = %listing.id, title = %listing.title, "listing created");
        Ok(listing)
    }

    /// Shallow merge of the supplied fields. Concurrent updates are applied
    /// in lock order, so the last writer wins field by field.
    pub async fn update(&self, id: Uuid, payload: UpdateListingPayload) -> Result<Option<Listing>> {
        self.listings
            .update(
                id,
                Box::new(move |listing: &mut Listing| {
                    let UpdateListingPayload {
                        title,
                        company,
                        sector,
                        location,
                        duration,
                        stipend,
                        skills_required,
                        description,
                        status,
                        deadline,
                    } = payload;
                    if let Some(v) = title {
                        listing.title = v;
                    }
                    if let Some(v) = company {
                        listing.company = v;
                    }
                    if let Some(v) = sector {
                        listing.sector = v;
                    }
                    if let Some(v) = location {
                        listing.location = v;
                    }
                    if let Some(v) = duration {
                        listing.duration = v;
                    }
                    if let Some(v) = stipend {
                        listing.stipend = v;
                    }
                    if let Some(v) = skills_required {
                        listing.skills_required = v;
                    }
                    if let Some(v) = description {
                        listing.description = v;
                    }
                    if let Some(v) = status {
                        listing.status = v;
                    }
                    if let Some(v) = deadline {
                        listing.deadline = v;
                    }
                }),
            )
            .await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Listing>> {
        self.listings.get(id).await
    }

    pub async fn list(&self, filter: ListingFilter) -> Result<Vec<Listing>> {
        self.listings
            .find_all(Box::new(move |listing: &Listing| matches_filter(listing, &filter)))
            .await
    }
}

/// Every supplied criterion must hold. Sector and location compare whole
/// values ignoring ASCII case; a skill matches when it is a case-insensitive
/// substring of any required skill, and one matching skill is enough.
pub fn matches_filter(listing: &Listing, filter: &ListingFilter) -> bool {
    if let Some(sector) = &filter.sector {
        if !listing.sector.eq_ignore_ascii_case(sector) {
            return false;
        }
    }
    if let Some(location) = &filter.location {
        if !listing.location.eq_ignore_ascii_case(location) {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if listing.status != status {
            return false;
        }
    }
    if !filter.skills.is_empty() {
        let required: Vec<String> = listing
            .skills_required
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        let any_skill = filter.skills.iter().any(|skill| {
            let skill = skill.to_lowercase();
            required.iter().any(|req| req.contains(&skill))
        });
        if !any_skill {
            return false;
        }
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let hit = [&listing.title, &listing.company, &listing.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::MemoryRepository;
    use crate::models::listing::ListingStatus;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn listing(title: &str, sector: &str, location: &str, skills: &[&str]) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            title: title.into(),
            company: "TechCorp Solutions".into(),
            sector: sector.into(),
            location: location.into(),
            duration: "3 months".into(),
            stipend: Decimal::new(15000, 0),
            skills_required: skills.iter().map(|s| s.to_string()).collect(),
            description: "Work on web applications".into(),
            status: ListingStatus::Open,
            posted_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            deadline: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            posted_by: None,
        }
    }

    fn seeded() -> (ListingService, Vec<Listing>) {
        let items = vec![
            listing("Software Development Intern", "Technology", "Bangalore", &["React", "Node.js", "JavaScript"]),
            listing("Data Analytics Intern", "Analytics", "Delhi", &["Python", "SQL", "Tableau"]),
            listing("Platform Intern", "Technology", "Delhi", &["Rust", "PostgreSQL"]),
            listing("Digital Marketing Intern", "Marketing", "Mumbai", &["SEO", "Social Media"]),
        ];
        let repo = MemoryRepository::with_items("listings", items.clone());
        (ListingService::new(Arc::new(repo)), items)
    }

    #[tokio::test]
    async fn empty_filter_returns_everything_in_order() {
        let (service, items) = seeded();
        let all = service.list(ListingFilter::default()).await.unwrap();
        assert_eq!(all, items);
    }

    #[tokio::test]
    async fn sector_and_location_compose() {
        let (service, items) = seeded();
        let found = service
            .list(ListingFilter {
                sector: Some("Technology".into()),
                location: Some("Delhi".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found, vec![items[2].clone()]);
    }

    #[tokio::test]
    async fn skills_match_case_insensitive_substrings() {
        let (service, items) = seeded();
        let found = service
            .list(ListingFilter {
                skills: vec!["react".into()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found, vec![items[0].clone()]);

        // "sql" is contained in both "SQL" and "PostgreSQL"
        let found = service
            .list(ListingFilter {
                skills: vec!["sql".into(), "seo".into()],
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found, vec![items[1].clone(), items[2].clone(), items[3].clone()]);
    }

    #[tokio::test]
    async fn search_covers_title_company_and_description() {
        let (service, items) = seeded();
        let found = service
            .list(ListingFilter {
                search: Some("marketing".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found, vec![items[3].clone()]);
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let (service, items) = seeded();
        let updated = service
            .update(
                items[0].id,
                UpdateListingPayload {
                    status: Some(ListingStatus::Closed),
                    stipend: Some(Decimal::new(20000, 0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ListingStatus::Closed);
        assert_eq!(updated.stipend, Decimal::new(20000, 0));
        assert_eq!(updated.title, items[0].title);

        let open = service
            .list(ListingFilter {
                status: Some(ListingStatus::Open),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(open.len(), 3);

        let missing = service
            .update(Uuid::new_v4(), UpdateListingPayload::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
