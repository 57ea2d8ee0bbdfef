//! Property test strategies for timelock types

use proptest::prelude::*;

pub use proptest;

use warden_core::{PrincipalId, TimelockDelay, ONE_DAY_SECS};
use warden_timelock::TimelockCommand;

/// Principal from a small deterministic pool, so collisions with fixture
/// roles happen often enough to matter.
pub fn arb_principal() -> impl Strategy<Value = PrincipalId> {
    prop_oneof![
        Just(PrincipalId::from_label("owner")),
        Just(PrincipalId::from_label("candidate")),
        Just(PrincipalId::from_label("stranger")),
        Just(PrincipalId::NULL),
        (0u16..64).prop_map(|seed| PrincipalId::from_label(&format!("principal-{seed}"))),
    ]
}

/// Delay up to two years, biased towards small values and whole days.
pub fn arb_delay() -> impl Strategy<Value = TimelockDelay> {
    prop_oneof![
        (0u64..120).prop_map(TimelockDelay::from_secs),
        (0u64..730).prop_map(TimelockDelay::from_days),
        (0u64..2 * 365 * ONE_DAY_SECS).prop_map(TimelockDelay::from_secs),
    ]
}

/// Any state-changing command.
pub fn arb_command() -> impl Strategy<Value = TimelockCommand> {
    prop_oneof![
        (arb_principal(), arb_delay())
            .prop_map(|(candidate, delay)| TimelockCommand::SetOwnerTimelock { candidate, delay }),
        Just(TimelockCommand::InitOwnerUnlock),
        Just(TimelockCommand::CompleteOwnerUnlock),
        Just(TimelockCommand::CancelOwnerUnlock),
    ]
}

/// A call: who makes it, what it is, and how many seconds pass beforehand.
pub fn arb_step() -> impl Strategy<Value = (PrincipalId, TimelockCommand, u64)> {
    (arb_principal(), arb_command(), 0u64..200)
}
