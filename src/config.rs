use crate::error::{Error, Result};
use crate::services::otp_sender::DELIVERY_TARGET;
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Filter used when `RUST_LOG` is unset. Keeps one-time code delivery
/// visible while the log sender is the only delivery channel.
pub fn default_log_directive() -> String {
    format!("info,tower_http=info,{}=debug", DELIVERY_TARGET)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub jwt_secret: String,
    pub session_ttl_minutes: i64,
    pub otp_ttl_seconds: i64,
    pub otp_length: usize,
    pub otp_max_attempts: u32,
    /// Fixed code handed out instead of a random one. Demo deployments only.
    pub otp_demo_code: Option<String>,
    pub sweep_interval_secs: u64,
    pub public_rps: u32,
    pub api_rps: u32,
    pub reject_duplicate_applications: bool,
    pub cors_allowed_origins: Vec<String>,
    pub log_format: LogFormat,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// One year.
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;
/// One day.
pub const MAX_OTP_TTL_SECONDS: i64 = 60 * 60 * 24;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let log_format = match get_env_or("LOG_FORMAT", "pretty".to_string())?.as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            other => {
                return Err(Error::Config(format!(
                    "Invalid value for LOG_FORMAT: {}",
                    other
                )))
            }
        };

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let config = Self {
            server_address: get_env("SERVER_ADDRESS")?,
            jwt_secret: get_env("JWT_SECRET")?,
            session_ttl_minutes: get_env_or("SESSION_TTL_MINUTES", 720)?,
            otp_ttl_seconds: get_env_or("OTP_TTL_SECONDS", 300)?,
            otp_length: get_env_or("OTP_LENGTH", 6)?,
            otp_max_attempts: get_env_or("OTP_MAX_ATTEMPTS", 5)?,
            otp_demo_code: env::var("OTP_DEMO_CODE").ok().filter(|c| !c.is_empty()),
            sweep_interval_secs: get_env_or("SWEEP_INTERVAL_SECS", 60)?,
            public_rps: get_env_or("PUBLIC_RPS", 50)?,
            api_rps: get_env_or("API_RPS", 100)?,
            reject_duplicate_applications: get_env_or("REJECT_DUPLICATE_APPLICATIONS", false)?,
            cors_allowed_origins,
            log_format,
        };
        config.check()?;
        Ok(config)
    }

    pub fn check(&self) -> Result<()> {
        if self.otp_length == 0 || self.otp_length > 12 {
            return Err(Error::Config(
                "OTP_LENGTH must be between 1 and 12".to_string(),
            ));
        }
        if let Some(code) = &self.otp_demo_code {
            if !code.chars().all(|c| c.is_ascii_digit()) {
                return Err(Error::Config(
                    "OTP_DEMO_CODE must contain digits only".to_string(),
                ));
            }
        }
        if !(1..=MAX_OTP_TTL_SECONDS).contains(&self.otp_ttl_seconds) {
            return Err(Error::Config(format!(
                "OTP_TTL_SECONDS must be between 1 and {}",
                MAX_OTP_TTL_SECONDS
            )));
        }
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&self.session_ttl_minutes) {
            return Err(Error::Config(format!(
                "SESSION_TTL_MINUTES must be between 1 and {}",
                MAX_SESSION_TTL_MINUTES
            )));
        }
        Ok(())
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
