use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::bail;
use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use configs::AppConfig;
use service::clients::http::{HttpAccountClient, HttpResetDispatcher, HttpTenantProvisioner};
use service::clients::mock::{MockAccountClient, MockResetDispatcher, MockTenantProvisioner};
use service::clients::{AccountClient, ResetDispatcher, TenantProvisioner};
use service::onboarding::OnboardingCoordinator;
use service::recovery::RecoveryLimiter;
use service::staging::CacheStagingStore;

use crate::routes::{self, ServerState};

fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks.
fn load_bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    let host = if cfg.server.host.trim().is_empty() {
        env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
    } else {
        cfg.server.host.clone()
    };
    let port = if cfg.server.port == 0 {
        env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()).unwrap_or(8081)
    } else {
        cfg.server.port
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Wire the coordinator and limiter from configuration.
///
/// Every external service needs a configured base URL; an in-memory mock is
/// substituted only when `services.allow_mocks` is set, so a production
/// deployment cannot silently "succeed" with no external effect.
pub fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let accounts: Arc<dyn AccountClient> = if cfg.services.account_url.trim().is_empty() {
        if !cfg.services.allow_mocks {
            bail!("services.account_url is not configured (set services.allow_mocks to run against in-memory mocks)");
        }
        warn!("no account service configured, using in-memory mock");
        Arc::new(MockAccountClient::default())
    } else {
        Arc::new(HttpAccountClient::new(cfg.services.account_url.clone()))
    };
    let tenants: Arc<dyn TenantProvisioner> = if cfg.services.provisioning_url.trim().is_empty() {
        if !cfg.services.allow_mocks {
            bail!("services.provisioning_url is not configured (set services.allow_mocks to run against in-memory mocks)");
        }
        warn!("no provisioning service configured, using in-memory mock");
        Arc::new(MockTenantProvisioner::default())
    } else {
        Arc::new(HttpTenantProvisioner::new(cfg.services.provisioning_url.clone()))
    };
    let dispatcher: Arc<dyn ResetDispatcher> = if cfg.services.recovery_url.trim().is_empty() {
        if !cfg.services.allow_mocks {
            bail!("services.recovery_url is not configured (set services.allow_mocks to run against in-memory mocks)");
        }
        warn!("no recovery dispatch service configured, using in-memory mock");
        Arc::new(MockResetDispatcher::default())
    } else {
        Arc::new(HttpResetDispatcher::new(cfg.services.recovery_url.clone()))
    };

    let staging = CacheStagingStore::new(Duration::from_secs(cfg.onboarding.staging_ttl_secs));
    let onboarding = Arc::new(OnboardingCoordinator::new(accounts, tenants, staging));
    let recovery = Arc::new(RecoveryLimiter::new(
        dispatcher,
        Duration::from_secs(cfg.recovery.cooldown_secs),
    ));

    Ok(ServerState { onboarding, recovery })
}

/// Public entry: build the app and run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "config load failed, falling back to defaults");
            let mut cfg = AppConfig::default();
            cfg.services.normalize_from_env();
            cfg
        }
    };

    let state = build_state(&cfg)?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, staging_ttl_secs = cfg.onboarding.staging_ttl_secs,
        cooldown_secs = cfg.recovery.cooldown_secs, "starting onboarding server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_services_fail_startup() {
        let cfg = AppConfig::default();
        let err = build_state(&cfg).unwrap_err();
        assert!(err.to_string().contains("account_url"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn allow_mocks_permits_unconfigured_services() {
        let mut cfg = AppConfig::default();
        cfg.services.allow_mocks = true;
        assert!(build_state(&cfg).is_ok());
    }

    #[tokio::test]
    async fn configured_urls_do_not_need_the_mock_flag() {
        let mut cfg = AppConfig::default();
        cfg.services.account_url = "http://accounts.internal".into();
        cfg.services.provisioning_url = "http://tenants.internal".into();
        cfg.services.recovery_url = "http://mailer.internal".into();
        assert!(build_state(&cfg).is_ok());
    }
}
