//! Ownership Timelock Controller
//!
//! Synchronous state machine for the unlock request slot:
//!
//! ```text
//!            initOwnerUnlock (candidate)
//!   ┌──────┐ ─────────────────────────► ┌─────────┐ ──┐ initOwnerUnlock
//!   │ Idle │                            │ Pending │ ◄─┘ (clock restarts)
//!   └──────┘ ◄───────────────────────── └─────────┘
//!      completeOwnerUnlock (candidate, now >= requested_at + delay)
//!      cancelOwnerUnlock (owner)
//!      setOwnerTimelock (owner)
//! ```
//!
//! Every mutating call runs through [`OwnershipTimelockController::transact`]:
//! the access guard first, then the transition on a staged copy of the state,
//! committed only if the transition returns `Ok`. A rejected call therefore
//! leaves the state untouched and yields no facts.

use warden_core::{PrincipalId, TimelockDefaults, TimelockDelay, Timestamp};
use warden_guards::{AccessGuard, Operation};

use crate::{
    OwnershipState, TimelockError, TimelockFact, TimelockResult, TimelockView, UnlockRequest,
};

/// Host-supplied facts about one call: who is calling and when.
///
/// The host reads its clock once and passes the reading in; the controller
/// never reads time itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationContext {
    pub caller: PrincipalId,
    pub now: Timestamp,
}

impl OperationContext {
    pub fn new(caller: PrincipalId, now: Timestamp) -> Self {
        Self { caller, now }
    }
}

/// A state-changing call, as data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelockCommand {
    SetOwnerTimelock {
        candidate: PrincipalId,
        delay: TimelockDelay,
    },
    InitOwnerUnlock,
    CompleteOwnerUnlock,
    CancelOwnerUnlock,
}

impl TimelockCommand {
    /// Operation this command is authorized as.
    pub fn operation(&self) -> Operation {
        match self {
            Self::SetOwnerTimelock { .. } => Operation::SetOwnerTimelock,
            Self::InitOwnerUnlock => Operation::InitOwnerUnlock,
            Self::CompleteOwnerUnlock => Operation::CompleteOwnerUnlock,
            Self::CancelOwnerUnlock => Operation::CancelOwnerUnlock,
        }
    }
}

/// Guard around the exclusive owner role.
#[derive(Debug, Clone)]
pub struct OwnershipTimelockController {
    state: OwnershipState,
    guard: AccessGuard,
}

impl OwnershipTimelockController {
    /// Create a controller owned by `initializer` with default timelock values.
    pub fn new(initializer: PrincipalId, defaults: &TimelockDefaults) -> Self {
        Self::from_state(OwnershipState::new(initializer, defaults))
    }

    /// Restore a controller from persisted state.
    pub fn from_state(state: OwnershipState) -> Self {
        Self {
            state,
            guard: AccessGuard::default(),
        }
    }

    pub fn state(&self) -> &OwnershipState {
        &self.state
    }

    /// Current owner. Unrestricted.
    pub fn owner(&self) -> PrincipalId {
        self.state.owner
    }

    /// `(candidate, delay, requested_at-or-zero)`. Unrestricted.
    pub fn get_owner_timelock(&self) -> TimelockView {
        self.state.view()
    }

    /// When the pending request, if any, becomes completable.
    pub fn pending_ready_at(&self) -> Option<Timestamp> {
        self.state
            .request
            .requested_at()
            .map(|requested_at| self.state.timelock.ready_at(requested_at))
    }

    /// Run a command.
    pub fn execute(
        &mut self,
        ctx: &OperationContext,
        command: TimelockCommand,
    ) -> TimelockResult<Vec<TimelockFact>> {
        match command {
            TimelockCommand::SetOwnerTimelock { candidate, delay } => {
                self.set_owner_timelock(ctx, candidate, delay)
            }
            TimelockCommand::InitOwnerUnlock => self.init_owner_unlock(ctx),
            TimelockCommand::CompleteOwnerUnlock => self.complete_owner_unlock(ctx),
            TimelockCommand::CancelOwnerUnlock => self.cancel_owner_unlock(ctx),
        }
    }

    /// Owner-only. Overwrites candidate and delay and forces the request slot
    /// back to idle, so a request raised under the old configuration can never
    /// complete under the new one.
    pub fn set_owner_timelock(
        &mut self,
        ctx: &OperationContext,
        candidate: PrincipalId,
        delay: TimelockDelay,
    ) -> TimelockResult<Vec<TimelockFact>> {
        self.transact(Operation::SetOwnerTimelock, ctx, |state, _| {
            state.timelock.candidate = candidate;
            state.timelock.delay = delay;
            state.request = UnlockRequest::Idle;
            Ok(vec![TimelockFact::TimelockConfigured { candidate, delay }])
        })
    }

    /// Candidate-only. Sets `requested_at = now`; calling again while pending
    /// restarts the clock.
    pub fn init_owner_unlock(&mut self, ctx: &OperationContext) -> TimelockResult<Vec<TimelockFact>> {
        self.transact(Operation::InitOwnerUnlock, ctx, |state, ctx| {
            state.request = UnlockRequest::Pending {
                requested_at: ctx.now,
            };
            Ok(vec![TimelockFact::TimelockInitiated {
                candidate: state.timelock.candidate,
            }])
        })
    }

    /// Candidate-only. Transfers ownership once the delay has elapsed.
    ///
    /// The timelock configuration is left as it was, so the new owner starts
    /// out named as their own candidate.
    pub fn complete_owner_unlock(
        &mut self,
        ctx: &OperationContext,
    ) -> TimelockResult<Vec<TimelockFact>> {
        self.transact(Operation::CompleteOwnerUnlock, ctx, |state, ctx| {
            let requested_at = state
                .request
                .requested_at()
                .ok_or(TimelockError::NotInitialized)?;

            if !state.timelock.is_ready(requested_at, ctx.now) {
                return Err(TimelockError::TooEarly {
                    ready_at: state.timelock.ready_at(requested_at),
                    now: ctx.now,
                });
            }

            let previous_owner = state.owner;
            let new_owner = state.timelock.candidate;
            state.owner = new_owner;
            state.request = UnlockRequest::Idle;
            Ok(vec![TimelockFact::OwnershipTransferred {
                previous_owner,
                new_owner,
            }])
        })
    }

    /// Owner-only. Clears the request slot; a no-op success when already idle.
    pub fn cancel_owner_unlock(
        &mut self,
        ctx: &OperationContext,
    ) -> TimelockResult<Vec<TimelockFact>> {
        self.transact(Operation::CancelOwnerUnlock, ctx, |state, _| {
            state.request = UnlockRequest::Idle;
            Ok(vec![TimelockFact::TimelockCanceled])
        })
    }

    /// Guard, stage, transition, commit.
    fn transact<F>(
        &mut self,
        operation: Operation,
        ctx: &OperationContext,
        transition: F,
    ) -> TimelockResult<Vec<TimelockFact>>
    where
        F: FnOnce(&mut OwnershipState, &OperationContext) -> TimelockResult<Vec<TimelockFact>>,
    {
        self.guard
            .evaluate(operation, ctx.caller, &self.state)
            .into_result()?;

        let mut staged = self.state.clone();
        let facts = transition(&mut staged, ctx)?;
        self.state = staged;
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::DEFAULT_TIMELOCK_DELAY;

    const T0: u64 = 1_700_000_000;

    fn a() -> PrincipalId {
        PrincipalId::from_label("account-a")
    }

    fn b() -> PrincipalId {
        PrincipalId::from_label("account-b")
    }

    fn at(caller: PrincipalId, secs: u64) -> OperationContext {
        OperationContext::new(caller, Timestamp::from_secs(secs))
    }

    fn configured(delay: TimelockDelay) -> OwnershipTimelockController {
        let mut controller = OwnershipTimelockController::new(a(), &TimelockDefaults::default());
        controller
            .set_owner_timelock(&at(a(), T0), b(), delay)
            .unwrap();
        controller
    }

    #[test]
    fn fresh_controller_defaults() {
        let controller = OwnershipTimelockController::new(a(), &TimelockDefaults::default());
        assert_eq!(controller.owner(), a());
        assert_eq!(
            controller.get_owner_timelock().into_tuple(),
            (PrincipalId::NULL, DEFAULT_TIMELOCK_DELAY, Timestamp::ZERO)
        );
        assert_eq!(controller.pending_ready_at(), None);
    }

    #[test]
    fn configure_emits_configured_fact() {
        let mut controller = OwnershipTimelockController::new(a(), &TimelockDefaults::default());
        let delay = TimelockDelay::from_days(100);
        let facts = controller
            .set_owner_timelock(&at(a(), T0), b(), delay)
            .unwrap();
        assert_eq!(
            facts,
            vec![TimelockFact::TimelockConfigured {
                candidate: b(),
                delay
            }]
        );
    }

    #[test]
    fn zero_delay_completes_immediately() {
        let mut controller = configured(TimelockDelay::from_secs(0));
        controller.init_owner_unlock(&at(b(), T0)).unwrap();
        controller.complete_owner_unlock(&at(b(), T0)).unwrap();
        assert_eq!(controller.owner(), b());
    }

    #[test]
    fn too_early_reports_ready_at() {
        let mut controller = configured(TimelockDelay::from_secs(60));
        controller.init_owner_unlock(&at(b(), T0)).unwrap();
        assert_eq!(controller.pending_ready_at(), Some(Timestamp::from_secs(T0 + 60)));

        let err = controller
            .complete_owner_unlock(&at(b(), T0 + 59))
            .unwrap_err();
        assert_eq!(
            err,
            TimelockError::TooEarly {
                ready_at: Timestamp::from_secs(T0 + 60),
                now: Timestamp::from_secs(T0 + 59),
            }
        );
    }

    #[test]
    fn boundary_second_completes() {
        let mut controller = configured(TimelockDelay::from_secs(60));
        controller.init_owner_unlock(&at(b(), T0)).unwrap();
        let config = controller.state().timelock;
        assert!(!config.is_ready(Timestamp::from_secs(T0), Timestamp::from_secs(T0 + 59)));
        assert!(config.is_ready(Timestamp::from_secs(T0), Timestamp::from_secs(T0 + 60)));

        controller.complete_owner_unlock(&at(b(), T0 + 60)).unwrap();
        assert_eq!(controller.owner(), b());
    }

    #[test]
    fn rejected_call_leaves_state_untouched() {
        let mut controller = configured(TimelockDelay::from_secs(60));
        controller.init_owner_unlock(&at(b(), T0)).unwrap();
        let before = controller.state().clone();

        assert!(controller.complete_owner_unlock(&at(b(), T0 + 1)).is_err());
        assert!(controller.cancel_owner_unlock(&at(b(), T0 + 1)).is_err());
        assert!(controller.init_owner_unlock(&at(a(), T0 + 1)).is_err());
        assert!(controller
            .set_owner_timelock(&at(b(), T0 + 1), b(), TimelockDelay::from_secs(0))
            .is_err());

        assert_eq!(controller.state(), &before);
    }

    #[test]
    fn config_survives_transfer() {
        let mut controller = configured(TimelockDelay::from_secs(10));
        controller.init_owner_unlock(&at(b(), T0)).unwrap();
        controller.complete_owner_unlock(&at(b(), T0 + 10)).unwrap();

        assert_eq!(controller.owner(), b());
        let view = controller.get_owner_timelock();
        assert_eq!(view.candidate, b());
        assert_eq!(view.delay, TimelockDelay::from_secs(10));
        assert_eq!(view.requested_at, Timestamp::ZERO);
    }

    #[test]
    fn execute_dispatches_by_command() {
        let mut controller = OwnershipTimelockController::new(a(), &TimelockDefaults::default());
        let command = TimelockCommand::SetOwnerTimelock {
            candidate: b(),
            delay: TimelockDelay::from_secs(1),
        };
        assert_eq!(command.operation(), Operation::SetOwnerTimelock);
        controller.execute(&at(a(), T0), command).unwrap();
        controller
            .execute(&at(b(), T0), TimelockCommand::InitOwnerUnlock)
            .unwrap();
        let facts = controller
            .execute(&at(b(), T0 + 1), TimelockCommand::CompleteOwnerUnlock)
            .unwrap();
        assert_eq!(
            facts,
            vec![TimelockFact::OwnershipTransferred {
                previous_owner: a(),
                new_owner: b(),
            }]
        );
    }
}
