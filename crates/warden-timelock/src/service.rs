//! Host binding for the controller.
//!
//! [`TimelockService`] supplies what the controller consumes but does not own:
//! the clock, durable state, and the audit log. Calls are serialized by a
//! transaction lock held from load to append, so two calls never interleave
//! on the same state.
//!
//! # Commit order
//!
//! ```text
//! lock → load → read clock (once) → controller transition → save → append facts
//! ```
//!
//! A rejected transition returns before `save`, so neither the store nor the
//! log sees it. If the append fails after a successful save, the previous
//! state is written back before `TimelockError::Audit` is returned: a call
//! either commits to both the store and the log, or to neither.

use tokio::sync::Mutex;
use tracing::{error, info, info_span, warn, Instrument};
use warden_core::{
    AuditEffects, AuditError, AuditRecord, PhysicalTimeEffects, PrincipalId, TimelockDefaults,
    TimelockDelay, WardenError,
};

use crate::{
    OperationContext, OwnershipHistory, OwnershipState, OwnershipTimelockController, StateStore,
    TimelockCommand, TimelockError, TimelockFact, TimelockResult, TimelockView,
};

/// Async façade over store, clock and audit log.
pub struct TimelockService<S, T, A> {
    store: S,
    clock: T,
    audit: A,
    transaction: Mutex<()>,
}

impl<S, T, A> TimelockService<S, T, A>
where
    S: StateStore,
    T: PhysicalTimeEffects,
    A: AuditEffects<TimelockFact>,
{
    pub fn new(store: S, clock: T, audit: A) -> Self {
        Self {
            store,
            clock,
            audit,
            transaction: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    /// Create the controller with `initializer` as owner.
    ///
    /// Fails if the store already holds state. Records the genesis
    /// `OwnershipTransferred(null, initializer)` fact; if that append fails the
    /// store is emptied again so initialization can be retried.
    pub async fn initialize(
        &self,
        initializer: PrincipalId,
        defaults: &TimelockDefaults,
    ) -> TimelockResult<TimelockView> {
        let _tx = self.transaction.lock().await;
        if self.store.load().await?.is_some() {
            return Err(WardenError::invalid("controller is already initialized").into());
        }

        let now = self.clock.physical_time().await?;
        let controller = OwnershipTimelockController::new(initializer, defaults);
        self.store.save(controller.state()).await?;
        if let Err(err) = self
            .audit
            .append_all(now, vec![TimelockFact::genesis(initializer)])
            .await
        {
            return Err(self.roll_back(None, err).await);
        }

        info!(owner = %initializer, delay = %defaults.default_delay(), "controller initialized");
        Ok(controller.get_owner_timelock())
    }

    /// Current owner.
    pub async fn owner(&self) -> TimelockResult<PrincipalId> {
        Ok(self.load().await?.owner())
    }

    /// `(candidate, delay, requested_at-or-zero)`.
    pub async fn get_owner_timelock(&self) -> TimelockResult<TimelockView> {
        Ok(self.load().await?.get_owner_timelock())
    }

    /// Full controller snapshot, for tooling that needs the ready time too.
    pub async fn snapshot(&self) -> TimelockResult<OwnershipTimelockController> {
        self.load().await
    }

    pub async fn set_owner_timelock(
        &self,
        caller: PrincipalId,
        candidate: PrincipalId,
        delay: TimelockDelay,
    ) -> TimelockResult<Vec<AuditRecord<TimelockFact>>> {
        self.execute(caller, TimelockCommand::SetOwnerTimelock { candidate, delay })
            .await
    }

    pub async fn init_owner_unlock(
        &self,
        caller: PrincipalId,
    ) -> TimelockResult<Vec<AuditRecord<TimelockFact>>> {
        self.execute(caller, TimelockCommand::InitOwnerUnlock).await
    }

    pub async fn complete_owner_unlock(
        &self,
        caller: PrincipalId,
    ) -> TimelockResult<Vec<AuditRecord<TimelockFact>>> {
        self.execute(caller, TimelockCommand::CompleteOwnerUnlock)
            .await
    }

    pub async fn cancel_owner_unlock(
        &self,
        caller: PrincipalId,
    ) -> TimelockResult<Vec<AuditRecord<TimelockFact>>> {
        self.execute(caller, TimelockCommand::CancelOwnerUnlock).await
    }

    /// Run one state-changing call as a single transaction.
    pub async fn execute(
        &self,
        caller: PrincipalId,
        command: TimelockCommand,
    ) -> TimelockResult<Vec<AuditRecord<TimelockFact>>> {
        let operation = command.operation();
        let span = info_span!("timelock", %operation, %caller);

        async move {
            let _tx = self.transaction.lock().await;
            let mut controller = self.load().await?;
            let before = controller.state().clone();
            let now = self.clock.physical_time().await?;
            let ctx = OperationContext::new(caller, now);

            let facts = match controller.execute(&ctx, command) {
                Ok(facts) => facts,
                Err(err) => {
                    warn!(code = err.code(), reason = err.reason(), %now, "call rejected");
                    return Err(err);
                }
            };

            self.store.save(controller.state()).await?;
            let records = match self.audit.append_all(now, facts).await {
                Ok(records) => records,
                Err(err) => return Err(self.roll_back(Some(&before), err).await),
            };
            for record in &records {
                info!(sequence = record.sequence, fact = %record.fact, %now, "committed");
            }
            Ok(records)
        }
        .instrument(span)
        .await
    }

    /// Ownership history replayed from the audit log.
    pub async fn history(&self) -> TimelockResult<OwnershipHistory> {
        let records = self.audit.records().await?;
        Ok(OwnershipHistory::from_records(&records))
    }

    /// Restore the store to `previous` (`None`: empty) after a failed append.
    async fn roll_back(
        &self,
        previous: Option<&OwnershipState>,
        cause: AuditError,
    ) -> TimelockError {
        let restored = match previous {
            Some(state) => self.store.save(state).await,
            None => self.store.clear().await,
        };
        match restored {
            Ok(()) => warn!(reason = %cause, "audit append failed, state rolled back"),
            Err(store_err) => error!(
                reason = %cause,
                restore_error = %store_err,
                "audit append failed and state could not be rolled back"
            ),
        }
        TimelockError::Audit(cause)
    }

    async fn load(&self) -> TimelockResult<OwnershipTimelockController> {
        let state = self
            .store
            .load()
            .await?
            .ok_or_else(|| WardenError::not_found("controller has not been initialized"))?;
        Ok(OwnershipTimelockController::from_state(state))
    }
}
