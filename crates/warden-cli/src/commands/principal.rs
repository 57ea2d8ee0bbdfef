//! `warden new-principal`

use warden_core::PrincipalId;

/// Fresh random principal, or a deterministic one when `label` is given.
pub fn new_principal(label: Option<&str>) -> String {
    let principal = match label {
        Some(label) => PrincipalId::from_label(label),
        None => PrincipalId::new_random(),
    };
    format!("{principal}\n")
}
