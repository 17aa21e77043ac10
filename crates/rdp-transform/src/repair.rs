//! Pluggable repair of normalized date values.

use chrono::NaiveDate;

/// Correction hook applied to every value during date normalization.
///
/// Implementations must be total: a date-or-missing value goes in, a
/// date-or-missing value comes out, and the hook never fails. Returning
/// `None` marks the value implausible and therefore missing.
pub trait DateRepair {
    fn repair(&self, value: Option<NaiveDate>) -> Option<NaiveDate>;
}

/// Identity repair: every value passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl DateRepair for KeepAll {
    fn repair(&self, value: Option<NaiveDate>) -> Option<NaiveDate> {
        value
    }
}

/// Treats dates before a plausibility floor as missing.
///
/// The staging default floors at the registry reference epoch, so a birth
/// date recorded as 1899-01-01 becomes missing under a 1900-01-01 floor.
#[derive(Debug, Clone, Copy)]
pub struct EpochFloor {
    floor: NaiveDate,
}

impl EpochFloor {
    pub fn new(floor: NaiveDate) -> Self {
        Self { floor }
    }
}

impl DateRepair for EpochFloor {
    fn repair(&self, value: Option<NaiveDate>) -> Option<NaiveDate> {
        value.filter(|date| *date >= self.floor)
    }
}

impl<F> DateRepair for F
where
    F: Fn(Option<NaiveDate>) -> Option<NaiveDate>,
{
    fn repair(&self, value: Option<NaiveDate>) -> Option<NaiveDate> {
        self(value)
    }
}
