use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub onboarding: OnboardingConfig,
    #[serde(default)]
    pub recovery: RecoveryConfig,
    #[serde(default)]
    pub services: ExternalServicesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Tenant-onboarding tunables.
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingConfig {
    /// How long a staged tenant payload survives before an abandoned
    /// signup is considered dead and the payload expires.
    #[serde(default = "default_staging_ttl")]
    pub staging_ttl_secs: u64,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self { staging_ttl_secs: default_staging_ttl() }
    }
}

/// Credential-recovery tunables.
#[derive(Debug, Clone, Deserialize)]
pub struct RecoveryConfig {
    /// Resend window after a successful reset-email dispatch.
    #[serde(default = "default_cooldown")]
    pub cooldown_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self { cooldown_secs: default_cooldown() }
    }
}

/// Base URLs of the external collaborators the core calls.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExternalServicesConfig {
    #[serde(default)]
    pub account_url: String,
    #[serde(default)]
    pub provisioning_url: String,
    #[serde(default)]
    pub recovery_url: String,
    /// Permit in-memory stand-ins for services without a configured URL.
    /// Startup fails on a missing URL unless this is set.
    #[serde(default)]
    pub allow_mocks: bool,
}

fn default_staging_ttl() -> u64 { 1800 }
fn default_cooldown() -> u64 { 60 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.services.normalize_from_env();
        self.services.validate()?;
        if self.onboarding.staging_ttl_secs == 0 {
            return Err(anyhow!("onboarding.staging_ttl_secs must be a positive number of seconds"));
        }
        if self.recovery.cooldown_secs == 0 {
            return Err(anyhow!("recovery.cooldown_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 {
                self.worker_threads = Some(4);
            }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl ExternalServicesConfig {
    /// Fill URLs from env vars when the TOML file leaves them empty.
    pub fn normalize_from_env(&mut self) {
        if self.account_url.trim().is_empty() {
            if let Ok(url) = std::env::var("ACCOUNT_SERVICE_URL") {
                self.account_url = url;
            }
        }
        if self.provisioning_url.trim().is_empty() {
            if let Ok(url) = std::env::var("PROVISIONING_SERVICE_URL") {
                self.provisioning_url = url;
            }
        }
        if self.recovery_url.trim().is_empty() {
            if let Ok(url) = std::env::var("RECOVERY_SERVICE_URL") {
                self.recovery_url = url;
            }
        }
        if !self.allow_mocks {
            if let Ok(v) = std::env::var("ALLOW_MOCK_SERVICES") {
                self.allow_mocks = v == "1" || v.eq_ignore_ascii_case("true");
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("services.account_url", &self.account_url),
            ("services.provisioning_url", &self.provisioning_url),
            ("services.recovery_url", &self.recovery_url),
        ] {
            if url.trim().is_empty() {
                continue; // checked at wiring time against allow_mocks
            }
            let lower = url.to_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(anyhow!("{name} must start with http:// or https://"));
            }
        }
        Ok(())
    }
}
