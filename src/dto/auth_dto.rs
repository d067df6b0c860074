use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::identity::{Identity, Role};
use crate::models::otp::LoginPhase;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub identifier: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(alias = "login_type")]
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyLoginRequest {
    #[validate(length(min = 1))]
    pub identifier: String,
    pub password: String,
    #[serde(alias = "login_type")]
    pub role: Role,
    #[validate(length(min = 1, max = 12))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CancelLoginRequest {
    #[validate(length(min = 1))]
    pub identifier: String,
    #[serde(alias = "login_type")]
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitiateLoginResponse {
    pub accepted: bool,
    pub phase: LoginPhase,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub role: Role,
    pub national_id: Option<String>,
    pub company_registration: Option<String>,
    pub company_name: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub national_id: Option<String>,
    pub company_registration: Option<String>,
    pub company_name: Option<String>,
    pub skills: Vec<String>,
    pub location: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub phase: LoginPhase,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub identity: IdentityResponse,
}

impl From<Identity> for IdentityResponse {
    fn from(value: Identity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
            national_id: value.national_id,
            company_registration: value.company_registration,
            company_name: value.company_name,
            skills: value.skills,
            location: value.location,
            phone: value.phone,
        }
    }
}
