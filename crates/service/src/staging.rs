//! Session-scoped staging store.
//!
//! Bridges the two halves of one onboarding transaction: the signup
//! submission writes the staged tenant payload here, the verification step
//! consumes it. Each session holds at most one payload and at most one
//! preselected plan; a write fully replaces any prior value.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use moka::future::Cache;
use uuid::Uuid;

use models::tenant::{PreselectedPlan, StagedTenantPayload};

/// Injected storage abstraction so the coordinator never touches a global.
#[async_trait]
pub trait StagingStore: Send + Sync {
    /// Overwrites any prior unconsumed payload for the session.
    async fn put_payload(&self, session: Uuid, payload: StagedTenantPayload);
    async fn payload(&self, session: Uuid) -> Option<StagedTenantPayload>;
    async fn clear_payload(&self, session: Uuid);

    async fn put_plan(&self, session: Uuid, plan: PreselectedPlan);
    /// Single consumption: the plan is gone after the first take.
    async fn take_plan(&self, session: Uuid) -> Option<PreselectedPlan>;
}

/// Production store backed by `moka` caches with a time-to-live.
///
/// The TTL bounds how long a staged payload of an abandoned signup can
/// linger; an expired payload can no longer be provisioned.
pub struct CacheStagingStore {
    payloads: Cache<Uuid, StagedTenantPayload>,
    plans: Cache<Uuid, PreselectedPlan>,
}

impl CacheStagingStore {
    pub fn new(ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            payloads: Cache::builder().time_to_live(ttl).build(),
            plans: Cache::builder().time_to_live(ttl).build(),
        })
    }
}

#[async_trait]
impl StagingStore for CacheStagingStore {
    async fn put_payload(&self, session: Uuid, payload: StagedTenantPayload) {
        self.payloads.insert(session, payload).await;
    }

    async fn payload(&self, session: Uuid) -> Option<StagedTenantPayload> {
        self.payloads.get(&session).await
    }

    async fn clear_payload(&self, session: Uuid) {
        self.payloads.invalidate(&session).await;
    }

    async fn put_plan(&self, session: Uuid, plan: PreselectedPlan) {
        self.plans.insert(session, plan).await;
    }

    async fn take_plan(&self, session: Uuid) -> Option<PreselectedPlan> {
        let plan = self.plans.get(&session).await;
        if plan.is_some() {
            self.plans.invalidate(&session).await;
        }
        plan
    }
}

/// In-memory fake without expiry, for tests and doc examples.
#[derive(Default)]
pub struct MemoryStagingStore {
    payloads: DashMap<Uuid, StagedTenantPayload>,
    plans: DashMap<Uuid, PreselectedPlan>,
}

impl MemoryStagingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl StagingStore for MemoryStagingStore {
    async fn put_payload(&self, session: Uuid, payload: StagedTenantPayload) {
        self.payloads.insert(session, payload);
    }

    async fn payload(&self, session: Uuid) -> Option<StagedTenantPayload> {
        self.payloads.get(&session).map(|p| p.clone())
    }

    async fn clear_payload(&self, session: Uuid) {
        self.payloads.remove(&session);
    }

    async fn put_plan(&self, session: Uuid, plan: PreselectedPlan) {
        self.plans.insert(session, plan);
    }

    async fn take_plan(&self, session: Uuid) -> Option<PreselectedPlan> {
        self.plans.remove(&session).map(|(_, plan)| plan)
    }
}
