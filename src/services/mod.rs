pub mod application_service;
pub mod auth_service;
pub mod dashboard_service;
pub mod listing_service;
pub mod notification_service;
pub mod otp_sender;
pub mod otp_store;
pub mod session_service;
