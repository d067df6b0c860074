pub mod application;
pub mod identity;
pub mod listing;
pub mod notification;
pub mod otp;
pub mod session;
