use std::sync::Arc;

use uuid::Uuid;

use crate::database::repository::Repository;
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::identity::{Identity, Role};
use crate::models::listing::Listing;
use crate::models::notification::NotificationCategory;
use crate::services::notification_service::NotificationService;
use crate::utils::time::today;

#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn Repository<Application>>,
    listings: Arc<dyn Repository<Listing>>,
    identities: Arc<dyn Repository<Identity>>,
    notifications: NotificationService,
    reject_duplicates: bool,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn Repository<Application>>,
        listings: Arc<dyn Repository<Listing>>,
        identities: Arc<dyn Repository<Identity>>,
        notifications: NotificationService,
        reject_duplicates: bool,
    ) -> Self {
        Self {
            applications,
            listings,
            identities,
            notifications,
            reject_duplicates,
        }
    }

    pub async fn list_for_candidate(&self, candidate_id: Uuid) -> Result<Vec<Application>> {
        self.applications
            .find_all(Box::new(move |a: &Application| a.candidate_id == candidate_id))
            .await
    }

    pub async fn list_for_listing(&self, listing_id: Uuid) -> Result<Vec<Application>> {
        self.applications
            .find_all(Box::new(move |a: &Application| a.listing_id == listing_id))
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<Application>> {
        self.applications.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Application>> {
        self.applications.get(id).await
    }

    /// Creates a pending application carrying a copy of the listing as it is
    /// right now.
    pub async fn apply(&self, listing_id: Uuid, candidate_id: Uuid) -> Result<Application> {
        let listing = self
            .listings
            .get(listing_id)
            .await?
            .ok_or_else(|| Error::NotFound("Internship not found".to_string()))?;

        let candidate = self
            .identities
            .get(candidate_id)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;
        if candidate.role != Role::Candidate {
            return Err(Error::Forbidden(
                "Only candidates can apply to internships".to_string(),
            ));
        }

        let title = listing.title.clone();
        let application = Application {
            id: Uuid::new_v4(),
            listing_id,
            candidate_id,
            status: ApplicationStatus::Pending,
            applied_date: today(),
            listing,
        };

        let application = if self.reject_duplicates {
            self.applications
                .insert_unique(
                    application,
                    Box::new(move |a: &Application| {
                        a.listing_id == listing_id && a.candidate_id == candidate_id
                    }),
                )
                .await?
                .ok_or_else(|| {
                    Error::Conflict("You have already applied to this internship".to_string())
                })?
        } else {
            self.applications.insert(application).await?
        };

        tracing::info!(
            application_id = %application.id,
            %listing_id,
            %candidate_id,
            "application submitted"
        );
        self.notify(
            candidate_id,
            NotificationCategory::Application,
            format!("Your application for {} has been received", title),
        )
        .await;

        Ok(application)
    }

    /// Overwrites the status. The transition check and the write happen
    /// under one repository lock. Setting the current status again is a
    /// no-op and does not notify the candidate.
    pub async fn set_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let changed = self
            .applications
            .update_checked(
                application_id,
                Box::new(move |a: &mut Application| {
                    if !a.status.can_transition_to(status) {
                        return Err(Error::BadRequest(format!(
                            "Cannot move application from {} to {}",
                            a.status, status
                        )));
                    }
                    a.status = status;
                    Ok(())
                }),
            )
            .await?;

        let Some((previous, updated)) = changed else {
            return Ok(None);
        };

        if previous.status != status {
            tracing::info!(
                %application_id,
                from = %previous.status,
                to = %status,
                "application status changed"
            );
            self.notify(
                updated.candidate_id,
                NotificationCategory::Status,
                status_message(status, &updated.listing.title),
            )
            .await;
        }
        Ok(Some(updated))
    }

    async fn notify(&self, user_id: Uuid, category: NotificationCategory, message: String) {
        if let Err(e) = self.notifications.create(user_id, category, message).await {
            tracing::warn!(error = ?e, %user_id, "failed to record notification");
        }
    }
}

fn status_message(status: ApplicationStatus, title: &str) -> String {
    match status {
        ApplicationStatus::Approved => {
            format!("Congratulations! You have been selected for {}", title)
        }
        ApplicationStatus::Rejected => {
            format!("Your application for {} was not selected", title)
        }
        ApplicationStatus::Pending => {
            format!("Your application for {} is back under review", title)
        }
    }
}
