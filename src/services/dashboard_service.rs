use uuid::Uuid;

use crate::dto::dashboard_dto::{AdminStats, CandidateStats};
use crate::dto::listing_dto::ListingFilter;
use crate::error::Result;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::listing::ListingStatus;
use crate::services::application_service::ApplicationService;
use crate::services::listing_service::ListingService;

#[derive(Clone)]
pub struct DashboardService {
    listings: ListingService,
    applications: ApplicationService,
}

impl DashboardService {
    pub fn new(listings: ListingService, applications: ApplicationService) -> Self {
        Self {
            listings,
            applications,
        }
    }

    pub async fn admin_stats(&self) -> Result<AdminStats> {
        let listings = self.listings.list(ListingFilter::default()).await?;
        let applications = self.applications.list_all().await?;
        Ok(AdminStats {
            total_listings: listings.len(),
            open_listings: listings
                .iter()
                .filter(|l| l.status == ListingStatus::Open)
                .count(),
            total_applications: applications.len(),
            pending_applications: count_status(&applications, ApplicationStatus::Pending),
        })
    }

    pub async fn candidate_stats(&self, candidate_id: Uuid) -> Result<CandidateStats> {
        let applications = self.applications.list_for_candidate(candidate_id).await?;
        Ok(CandidateStats {
            pending: count_status(&applications, ApplicationStatus::Pending),
            approved: count_status(&applications, ApplicationStatus::Approved),
            rejected: count_status(&applications, ApplicationStatus::Rejected),
            total: applications.len(),
        })
    }
}

fn count_status(applications: &[Application], status: ApplicationStatus) -> usize {
    applications.iter().filter(|a| a.status == status).count()
}
