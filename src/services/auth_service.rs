use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::database::repository::Repository;
use crate::dto::auth_dto::{LoginRequest, RegisterPayload, VerifyLoginRequest};
use crate::error::{Error, Result};
use crate::models::identity::{Identity, Role};
use crate::models::otp::{LoginPhase, OtpKey, PendingOtp};
use crate::services::otp_sender::OtpSender;
use crate::services::otp_store::{OtpCheck, OtpStore};
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::time::Clock;
use crate::utils::token::generate_otp_code;

#[derive(Debug, Clone)]
pub struct OtpSettings {
    pub ttl: Duration,
    pub length: usize,
    pub demo_code: Option<String>,
}

/// Two-phase login: credentials first, then a one-time code.
#[derive(Clone)]
pub struct AuthService {
    identities: Arc<dyn Repository<Identity>>,
    otps: Arc<OtpStore>,
    sender: Arc<dyn OtpSender>,
    clock: Arc<dyn Clock>,
    settings: OtpSettings,
}

impl AuthService {
    pub fn new(
        identities: Arc<dyn Repository<Identity>>,
        otps: Arc<OtpStore>,
        sender: Arc<dyn OtpSender>,
        clock: Arc<dyn Clock>,
        settings: OtpSettings,
    ) -> Self {
        Self {
            identities,
            otps,
            sender,
            clock,
            settings,
        }
    }

    /// Checks the identifier/password pair and, when it matches, issues a
    /// code. The returned phase never says which half of the pair was wrong.
    pub async fn initiate(&self, request: &LoginRequest) -> Result<LoginPhase> {
        let Some(identity) = self.find_by_login(&request.identifier, request.role).await? else {
            tracing::info!(role = %request.role, "login rejected");
            return Ok(LoginPhase::NoSession);
        };

        if !verify_password(&request.password, &identity.password_hash)? {
            tracing::info!(role = %request.role, "login rejected");
            return Ok(LoginPhase::NoSession);
        }

        let code = match &self.settings.demo_code {
            Some(code) => code.clone(),
            None => generate_otp_code(self.settings.length),
        };
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(self.settings.ttl)
            .ok_or_else(|| Error::Internal("One-time code expiry is out of range".to_string()))?;

        self.sender.send(&identity, &code).await?;
        self.otps
            .put(
                OtpKey::new(request.identifier.clone(), request.role),
                PendingOtp {
                    code,
                    identity,
                    expires_at,
                    failed_attempts: 0,
                },
            )
            .await;

        tracing::info!(role = %request.role, %expires_at, "one-time code pending");
        Ok(LoginPhase::AwaitingOtp)
    }

    /// Completes a login. Missing, expired, exhausted and mismatched codes
    /// all come back as `None`.
    pub async fn verify(&self, request: &VerifyLoginRequest) -> Result<Option<Identity>> {
        let key = OtpKey::new(request.identifier.clone(), request.role);
        let outcome = self.otps.check(&key, &request.code, self.clock.now()).await;

        match outcome {
            OtpCheck::Verified(identity) => {
                tracing::info!(identity_id = %identity.id, role = %identity.role, "login verified");
                Ok(Some(identity))
            }
            OtpCheck::Mismatch { attempts_left } => {
                tracing::info!(role = %request.role, attempts_left, "one-time code mismatch");
                Ok(None)
            }
            other => {
                tracing::info!(role = %request.role, outcome = ?other, "one-time code rejected");
                Ok(None)
            }
        }
    }

    /// Abandons a pending login, returning to `NoSession`.
    pub async fn cancel(&self, identifier: &str, role: Role) -> LoginPhase {
        self.otps.discard(&OtpKey::new(identifier, role)).await;
        LoginPhase::NoSession
    }

    pub async fn register(&self, payload: RegisterPayload) -> Result<Identity> {
        if payload.password != payload.confirm_password {
            return Err(Error::BadRequest("Passwords do not match".to_string()));
        }

        let (national_id, company_registration, company_name) = match payload.role {
            Role::Candidate => {
                let national_id = required(payload.national_id, "national_id")?;
                (Some(national_id), None, None)
            }
            Role::Admin => {
                let registration =
                    required(payload.company_registration, "company_registration")?;
                (None, Some(registration), payload.company_name)
            }
        };

        let skills = payload
            .skills
            .into_iter()
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect();

        let identity = Identity {
            id: Uuid::new_v4(),
            name: payload.name,
            email: payload.email.trim().to_string(),
            role: payload.role,
            national_id,
            company_registration,
            company_name,
            skills,
            location: payload.location,
            phone: payload.phone,
            password_hash: hash_password(&payload.password)?,
        };

        let email = identity.email.clone();
        let national_id = identity.national_id.clone();
        let registration = identity.company_registration.clone();
        let inserted = self
            .identities
            .insert_unique(
                identity,
                Box::new(move |existing: &Identity| {
                    existing.email.eq_ignore_ascii_case(&email)
                        || (national_id.is_some() && existing.national_id == national_id)
                        || (registration.is_some()
                            && existing.company_registration == registration)
                }),
            )
            .await?;

        match inserted {
            Some(identity) => {
                tracing::info!(identity_id = %identity.id, role = %identity.role, "identity registered");
                Ok(identity)
            }
            None => Err(Error::Conflict(
                "An account already exists with this national ID, company registration or email"
                    .to_string(),
            )),
        }
    }

    pub async fn get_identity(&self, id: Uuid) -> Result<Option<Identity>> {
        self.identities.get(id).await
    }

    async fn find_by_login(&self, identifier: &str, role: Role) -> Result<Option<Identity>> {
        let identifier = identifier.to_string();
        let mut matches = self
            .identities
            .find_all(Box::new(move |identity: &Identity| {
                identity.matches_login(&identifier, role)
            }))
            .await?;
        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.swap_remove(0))
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::BadRequest(format!("{} is required for this role", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::MemoryRepository;
    use crate::services::otp_sender::MockOtpSender;
    use crate::utils::time::MockClock;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    struct Harness {
        service: AuthService,
        otps: Arc<OtpStore>,
        clock_offset: Arc<AtomicI64>,
        last_code: Arc<Mutex<String>>,
    }

    fn harness(demo_code: Option<&str>) -> Harness {
        let start = Utc.with_ymd_and_hms(2024, 1, 20, 10, 0, 0).unwrap();
        let clock_offset = Arc::new(AtomicI64::new(0));
        let mut clock = MockClock::new();
        let offset = clock_offset.clone();
        clock
            .expect_now()
            .returning(move || start + Duration::seconds(offset.load(Ordering::SeqCst)));

        let last_code = Arc::new(Mutex::new(String::new()));
        let mut sender = MockOtpSender::new();
        let sink = last_code.clone();
        sender.expect_send().returning(move |_, code| {
            *sink.lock().unwrap() = code.to_string();
            Ok(())
        });

        let otps = Arc::new(OtpStore::new(3));
        let service = AuthService::new(
            Arc::new(MemoryRepository::new("identities")),
            otps.clone(),
            Arc::new(sender),
            Arc::new(clock),
            OtpSettings {
                ttl: Duration::minutes(5),
                length: 6,
                demo_code: demo_code.map(str::to_string),
            },
        );

        Harness {
            service,
            otps,
            clock_offset,
            last_code,
        }
    }

    fn candidate_payload() -> RegisterPayload {
        RegisterPayload {
            name: "Arjun Kumar".into(),
            email: "arjun@example.com".into(),
            role: Role::Candidate,
            national_id: Some("1234-5678-9012".into()),
            company_registration: None,
            company_name: None,
            skills: vec!["React".into(), " ".into(), "SQL".into()],
            location: "Delhi".into(),
            phone: "+91-9876543210".into(),
            password: "demo123".into(),
            confirm_password: "demo123".into(),
        }
    }

    fn login(identifier: &str, password: &str) -> LoginRequest {
        LoginRequest {
            identifier: identifier.into(),
            password: password.into(),
            role: Role::Candidate,
        }
    }

    fn verify(identifier: &str, code: &str) -> VerifyLoginRequest {
        VerifyLoginRequest {
            identifier: identifier.into(),
            password: "demo123".into(),
            role: Role::Candidate,
            code: code.into(),
        }
    }

    #[tokio::test]
    async fn full_login_with_random_code() {
        let h = harness(None);
        let registered = h.service.register(candidate_payload()).await.unwrap();
        assert_eq!(registered.skills, vec!["React".to_string(), "SQL".to_string()]);

        let phase = h.service.initiate(&login("1234-5678-9012", "demo123")).await.unwrap();
        assert_eq!(phase, LoginPhase::AwaitingOtp);

        let code = h.last_code.lock().unwrap().clone();
        assert_eq!(code.len(), 6);

        let identity = h
            .service
            .verify(&verify("1234-5678-9012", &code))
            .await
            .unwrap()
            .expect("identity");
        assert_eq!(identity.id, registered.id);
        assert!(h.otps.is_empty().await);
    }

    #[tokio::test]
    async fn wrong_identifier_password_or_code_fails() {
        let h = harness(Some("123456"));
        h.service.register(candidate_payload()).await.unwrap();

        let phase = h.service.initiate(&login("0000-0000-0000", "demo123")).await.unwrap();
        assert_eq!(phase, LoginPhase::NoSession);
        let phase = h.service.initiate(&login("1234-5678-9012", "wrong")).await.unwrap();
        assert_eq!(phase, LoginPhase::NoSession);
        assert!(h.otps.is_empty().await);

        let wrong_role = LoginRequest {
            role: Role::Admin,
            ..login("1234-5678-9012", "demo123")
        };
        assert_eq!(h.service.initiate(&wrong_role).await.unwrap(), LoginPhase::NoSession);

        h.service.initiate(&login("1234-5678-9012", "demo123")).await.unwrap();
        let rejected = h.service.verify(&verify("1234-5678-9012", "654321")).await.unwrap();
        assert!(rejected.is_none());
        let accepted = h.service.verify(&verify("1234-5678-9012", "123456")).await.unwrap();
        assert!(accepted.is_some());
    }

    #[tokio::test]
    async fn code_expires_after_ttl() {
        let h = harness(Some("123456"));
        h.service.register(candidate_payload()).await.unwrap();
        h.service.initiate(&login("1234-5678-9012", "demo123")).await.unwrap();

        h.clock_offset.store(5 * 60 + 1, Ordering::SeqCst);
        let result = h.service.verify(&verify("1234-5678-9012", "123456")).await.unwrap();
        assert!(result.is_none());
        assert!(h.otps.is_empty().await);
    }

    #[tokio::test]
    async fn code_is_valid_until_the_deadline() {
        let h = harness(Some("123456"));
        h.service.register(candidate_payload()).await.unwrap();
        h.service.initiate(&login("1234-5678-9012", "demo123")).await.unwrap();

        h.clock_offset.store(5 * 60, Ordering::SeqCst);
        let result = h.service.verify(&verify("1234-5678-9012", "123456")).await.unwrap();
        assert!(result.is_some());
    }

    #[tokio::test]
    async fn cancel_discards_pending_code() {
        let h = harness(Some("123456"));
        h.service.register(candidate_payload()).await.unwrap();
        h.service.initiate(&login("1234-5678-9012", "demo123")).await.unwrap();

        let phase = h.service.cancel("1234-5678-9012", Role::Candidate).await;
        assert_eq!(phase, LoginPhase::NoSession);
        let result = h.service.verify(&verify("1234-5678-9012", "123456")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let h = harness(None);
        h.service.register(candidate_payload()).await.unwrap();

        let same_email = RegisterPayload {
            national_id: Some("9999-9999-9999".into()),
            email: "ARJUN@example.com".into(),
            ..candidate_payload()
        };
        let err = h.service.register(same_email).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        let same_id = RegisterPayload {
            email: "other@example.com".into(),
            ..candidate_payload()
        };
        let err = h.service.register(same_id).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn registration_requires_role_identifier_and_matching_passwords() {
        let h = harness(None);
        let admin_without_registration = RegisterPayload {
            role: Role::Admin,
            national_id: None,
            ..candidate_payload()
        };
        let err = h.service.register(admin_without_registration).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));

        let mismatch = RegisterPayload {
            confirm_password: "demo124".into(),
            ..candidate_payload()
        };
        let err = h.service.register(mismatch).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn expiry_past_calendar_range_is_an_error() {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .returning(|| chrono::DateTime::<Utc>::MAX_UTC);
        let otps = Arc::new(OtpStore::new(3));
        let service = AuthService::new(
            Arc::new(MemoryRepository::new("identities")),
            otps.clone(),
            Arc::new(MockOtpSender::new()),
            Arc::new(clock),
            OtpSettings {
                ttl: Duration::minutes(5),
                length: 6,
                demo_code: None,
            },
        );
        service.register(candidate_payload()).await.unwrap();

        let err = service
            .initiate(&login("1234-5678-9012", "demo123"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
        assert!(otps.is_empty().await);
    }
}
