//! Reusable timelock fixtures
//!
//! [`TimelockFixture`] wires a service over in-memory collaborators with three
//! named principals: `owner` (the initializer), `candidate`, and `stranger`.
//! The clock starts at [`FIXTURE_EPOCH`] and only moves when the test moves it.

use std::sync::{Arc, Once};
use warden_core::{PrincipalId, TimelockDefaults, TimelockDelay, Timestamp};
use warden_timelock::{
    MemoryStateStore, TimelockFact, TimelockResult, TimelockService, TimelockView,
};

use crate::{ControllableClock, InMemoryAuditLog};

/// Clock reading the fixture starts at.
pub const FIXTURE_EPOCH: u64 = 1_700_000_000;

/// Deterministic principal derived from a label.
pub fn principal(label: &str) -> PrincipalId {
    PrincipalId::from_label(label)
}

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per process. Honors `RUST_LOG`.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Service type the fixture builds.
pub type FixtureService = TimelockService<
    Arc<MemoryStateStore>,
    ControllableClock,
    InMemoryAuditLog<TimelockFact>,
>;

/// An initialized controller plus handles on its collaborators.
pub struct TimelockFixture {
    pub service: FixtureService,
    pub clock: ControllableClock,
    pub audit: InMemoryAuditLog<TimelockFact>,
    pub store: Arc<MemoryStateStore>,
    pub owner: PrincipalId,
    pub candidate: PrincipalId,
    pub stranger: PrincipalId,
}

impl TimelockFixture {
    /// Initialized with the built-in defaults.
    pub async fn new() -> TimelockResult<Self> {
        Self::with_defaults(TimelockDefaults::default()).await
    }

    /// Initialized with `defaults`; the genesis record is already in the log.
    pub async fn with_defaults(defaults: TimelockDefaults) -> TimelockResult<Self> {
        init_test_tracing();
        let clock = ControllableClock::at_secs(FIXTURE_EPOCH);
        let audit = InMemoryAuditLog::new();
        let store = Arc::new(MemoryStateStore::new());
        let service = TimelockService::new(Arc::clone(&store), clock.clone(), audit.clone());
        let owner = principal("owner");
        service.initialize(owner, &defaults).await?;

        Ok(Self {
            service,
            clock,
            audit,
            store,
            owner,
            candidate: principal("candidate"),
            stranger: principal("stranger"),
        })
    }

    /// Owner names `candidate` with `delay`.
    pub async fn configured(delay: TimelockDelay) -> TimelockResult<Self> {
        let fixture = Self::new().await?;
        fixture
            .service
            .set_owner_timelock(fixture.owner, fixture.candidate, delay)
            .await?;
        Ok(fixture)
    }

    /// Configured and initiated by the candidate at the current clock reading.
    pub async fn pending(delay: TimelockDelay) -> TimelockResult<Self> {
        let fixture = Self::configured(delay).await?;
        fixture.service.init_owner_unlock(fixture.candidate).await?;
        Ok(fixture)
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub async fn owner_now(&self) -> TimelockResult<PrincipalId> {
        self.service.owner().await
    }

    pub async fn view(&self) -> TimelockResult<TimelockView> {
        self.service.get_owner_timelock().await
    }
}
