pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use chrono::Duration;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::database::repository::{MemoryRepository, Repository};
use crate::models::{
    application::Application, identity::Identity, listing::Listing, notification::Notification,
};
use crate::services::{
    application_service::ApplicationService,
    auth_service::{AuthService, OtpSettings},
    dashboard_service::DashboardService,
    listing_service::ListingService,
    notification_service::NotificationService,
    otp_sender::{LogOtpSender, OtpSender},
    otp_store::OtpStore,
    session_service::SessionService,
};
use crate::utils::time::{Clock, SystemClock};

/// The four collections backing the portal.
#[derive(Clone)]
pub struct Collections {
    pub identities: Arc<dyn Repository<Identity>>,
    pub listings: Arc<dyn Repository<Listing>>,
    pub applications: Arc<dyn Repository<Application>>,
    pub notifications: Arc<dyn Repository<Notification>>,
}

impl Collections {
    pub fn in_memory() -> Self {
        Self {
            identities: Arc::new(MemoryRepository::new("identities")),
            listings: Arc::new(MemoryRepository::new("listings")),
            applications: Arc::new(MemoryRepository::new("applications")),
            notifications: Arc::new(MemoryRepository::new("notifications")),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub collections: Collections,
    pub otp_store: Arc<OtpStore>,
    pub auth_service: AuthService,
    pub session_service: SessionService,
    pub listing_service: ListingService,
    pub application_service: ApplicationService,
    pub notification_service: NotificationService,
    pub dashboard_service: DashboardService,
    clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_parts(
            config,
            Collections::in_memory(),
            Arc::new(SystemClock),
            Arc::new(LogOtpSender),
        )
    }

    pub fn with_parts(
        config: &Config,
        collections: Collections,
        clock: Arc<dyn Clock>,
        otp_sender: Arc<dyn OtpSender>,
    ) -> Result<Self> {
        config.check()?;
        let otp_ttl = Duration::try_seconds(config.otp_ttl_seconds)
            .ok_or_else(|| Error::Config("OTP_TTL_SECONDS is out of range".to_string()))?;
        let session_ttl = Duration::try_minutes(config.session_ttl_minutes)
            .ok_or_else(|| Error::Config("SESSION_TTL_MINUTES is out of range".to_string()))?;

        let otp_store = Arc::new(OtpStore::new(config.otp_max_attempts));
        let auth_service = AuthService::new(
            collections.identities.clone(),
            otp_store.clone(),
            otp_sender,
            clock.clone(),
            OtpSettings {
                ttl: otp_ttl,
                length: config.otp_length,
                demo_code: config.otp_demo_code.clone(),
            },
        );
        let session_service = SessionService::new(
            collections.identities.clone(),
            clock.clone(),
            &config.jwt_secret,
            session_ttl,
        );
        let notification_service =
            NotificationService::new(collections.notifications.clone(), clock.clone());
        let listing_service = ListingService::new(collections.listings.clone());
        let application_service = ApplicationService::new(
            collections.applications.clone(),
            collections.listings.clone(),
            collections.identities.clone(),
            notification_service.clone(),
            config.reject_duplicate_applications,
        );
        let dashboard_service =
            DashboardService::new(listing_service.clone(), application_service.clone());

        Ok(Self {
            collections,
            otp_store,
            auth_service,
            session_service,
            listing_service,
            application_service,
            notification_service,
            dashboard_service,
            clock,
        })
    }

    /// Evicts expired one-time codes and sessions. Returns how many of each
    /// were dropped.
    pub async fn sweep_expired(&self) -> (usize, usize) {
        let now = self.clock.now();
        let otps = self.otp_store.sweep_expired(now).await;
        let sessions = self.session_service.sweep_expired(now).await;
        (otps, sessions)
    }
}
