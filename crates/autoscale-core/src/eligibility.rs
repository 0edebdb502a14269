//! Eligibility Filter
//!
//! Decides whether a changed object may be auto-applied under the current
//! settings. Checks short-circuit in order: master switch, apply-scale
//! toggle, per-type switch, identity scale.

use crate::object::ObjectSnapshot;
use crate::scale::is_identity_scale;
use crate::settings::FilterSettings;

/// Outcome of an eligibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// May be applied
    Eligible,
    /// Master switch is off
    MasterDisabled,
    /// Apply-scale toggle is off
    ApplyScaleDisabled,
    /// The object's type is not enabled
    TypeDisabled,
    /// Scale is already (1, 1, 1)
    AlreadyIdentity,
}

impl Eligibility {
    /// Check for [`Eligibility::Eligible`]
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

/// Classify an object against the settings
pub fn check_eligibility(object: &ObjectSnapshot, settings: &FilterSettings) -> Eligibility {
    if !settings.enabled {
        Eligibility::MasterDisabled
    } else if !settings.apply_scale {
        Eligibility::ApplyScaleDisabled
    } else if !settings.is_type_enabled(object.object_type) {
        Eligibility::TypeDisabled
    } else if is_identity_scale(object.scale) {
        Eligibility::AlreadyIdentity
    } else {
        Eligibility::Eligible
    }
}

/// Whether the object may be auto-applied
pub fn is_eligible(object: &ObjectSnapshot, settings: &FilterSettings) -> bool {
    check_eligibility(object, settings).is_eligible()
}

/// Type-only filter used to build detection candidates
pub fn candidate_filter(object: &ObjectSnapshot, settings: &FilterSettings) -> bool {
    settings.is_type_enabled(object.object_type)
}
