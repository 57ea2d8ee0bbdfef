//! Configuration for Warden
//!
//! Configuration is plain serde data loaded from TOML. Each section type
//! provides its own defaults and validation through the traits below.

mod timelock;
mod traits;

pub use timelock::TimelockDefaults;
pub use traits::{load_toml, ConfigDefaults, ConfigValidation};
