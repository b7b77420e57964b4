//! Range-validated scalar wrappers for every scoring input and output.
//!
//! Construction through [`ScoreValue::of`] is the single validation point: once a value exists it
//! is known to sit inside its kind's closed interval, and arithmetic re-clamps instead of drifting
//! outside it.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Declares the closed interval a score kind lives in.
pub trait ScoreKind: Copy + fmt::Debug + Send + Sync + 'static {
    const NAME: &'static str;
    const MIN: f64;
    const MAX: f64;
}

macro_rules! unit_kind {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        unit_kind!($(#[$meta])* $name, $label, 1.0);
    };
    ($(#[$meta:meta])* $name:ident, $label:literal, $max:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {}

        impl ScoreKind for $name {
            const NAME: &'static str = $label;
            const MIN: f64 = 0.0;
            const MAX: f64 = $max;
        }
    };
}

unit_kind!(
    /// Attendance commitment step score.
    Attendance,
    "attendance"
);
unit_kind!(Mechanical, "mechanical");
unit_kind!(Preparation, "preparation");
unit_kind!(Merit, "merit");
unit_kind!(UpgradeValue, "upgrade value");
unit_kind!(
    /// Tier set incentive; may exceed parity.
    TierBonus,
    "tier bonus",
    2.0
);
unit_kind!(
    /// Role contention multiplier; may exceed parity.
    RoleMultiplier,
    "role multiplier",
    2.0
);
unit_kind!(ItemPriority, "item priority");
unit_kind!(RecencyDecay, "recency decay");
unit_kind!(FinalPriority, "final priority");

pub type AttendanceScore = ScoreValue<Attendance>;
pub type MechanicalScore = ScoreValue<Mechanical>;
pub type PreparationScore = ScoreValue<Preparation>;
pub type MeritScore = ScoreValue<Merit>;
pub type UpgradeValueScore = ScoreValue<UpgradeValue>;
pub type TierBonusScore = ScoreValue<TierBonus>;
pub type RoleMultiplierScore = ScoreValue<RoleMultiplier>;
pub type ItemPriorityIndex = ScoreValue<ItemPriority>;
pub type RecencyDecayFactor = ScoreValue<RecencyDecay>;
pub type FinalPriorityScore = ScoreValue<FinalPriority>;

/// Raw value fell outside the declared interval of its kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} score {value} outside [{min}, {max}]")]
pub struct ScoreRangeError {
    pub kind: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Immutable scalar constrained to `[K::MIN, K::MAX]`.
#[derive(Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64", bound = "K: ScoreKind")]
pub struct ScoreValue<K: ScoreKind> {
    value: f64,
    #[serde(skip)]
    kind: PhantomData<K>,
}

impl<K: ScoreKind> ScoreValue<K> {
    pub const MIN: Self = Self::raw(K::MIN);
    pub const MAX: Self = Self::raw(K::MAX);

    const fn raw(value: f64) -> Self {
        Self {
            value,
            kind: PhantomData,
        }
    }

    /// Validate `raw` against the kind's interval. NaN is always rejected.
    pub fn of(raw: f64) -> Result<Self, ScoreRangeError> {
        if (K::MIN..=K::MAX).contains(&raw) {
            Ok(Self::raw(raw))
        } else {
            Err(ScoreRangeError {
                kind: K::NAME,
                value: raw,
                min: K::MIN,
                max: K::MAX,
            })
        }
    }

    /// Clamp a computed value into range; NaN collapses to the minimum.
    pub fn clamped(raw: f64) -> Self {
        if raw.is_nan() {
            return Self::MIN;
        }
        Self::raw(raw.clamp(K::MIN, K::MAX))
    }

    pub fn value(self) -> f64 {
        self.value
    }

    pub fn is_zero(self) -> bool {
        self.value == 0.0
    }

    pub fn plus(self, other: Self) -> Self {
        Self::clamped(self.value + other.value)
    }

    pub fn times(self, factor: f64) -> Self {
        Self::clamped(self.value * factor)
    }
}

impl<K: ScoreKind> Clone for ScoreValue<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ScoreKind> Copy for ScoreValue<K> {}

impl<K: ScoreKind> PartialEq for ScoreValue<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K: ScoreKind> PartialOrd for ScoreValue<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<K: ScoreKind> fmt::Debug for ScoreValue<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", K::NAME, self.value)
    }
}

impl<K: ScoreKind> fmt::Display for ScoreValue<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.value)
    }
}

impl<K: ScoreKind> TryFrom<f64> for ScoreValue<K> {
    type Error = ScoreRangeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::of(value)
    }
}

impl<K: ScoreKind> From<ScoreValue<K>> for f64 {
    fn from(score: ScoreValue<K>) -> Self {
        score.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_kinds_accept_interval_bounds() {
        assert_eq!(MeritScore::of(0.0).expect("min").value(), 0.0);
        assert_eq!(MeritScore::of(1.0).expect("max").value(), 1.0);
        assert_eq!(MeritScore::MIN.value(), 0.0);
        assert_eq!(MeritScore::MAX.value(), 1.0);
    }

    #[test]
    fn unit_kinds_reject_out_of_range() {
        let err = AttendanceScore::of(1.01).expect_err("above max");
        assert_eq!(err.kind, "attendance");
        assert_eq!(err.max, 1.0);
        assert!(AttendanceScore::of(-0.0001).is_err());
        assert!(AttendanceScore::of(f64::NAN).is_err());
        assert!(AttendanceScore::of(f64::INFINITY).is_err());
    }

    #[test]
    fn multiplier_kinds_allow_values_above_parity() {
        assert_eq!(TierBonusScore::of(1.2).expect("bonus").value(), 1.2);
        assert_eq!(RoleMultiplierScore::of(2.0).expect("max").value(), 2.0);
        assert!(RoleMultiplierScore::of(2.0001).is_err());
    }

    #[test]
    fn arithmetic_reclamps_results() {
        let high = MeritScore::of(0.8).expect("valid");
        assert_eq!(high.plus(high), MeritScore::MAX);
        assert_eq!(high.times(-3.0), MeritScore::MIN);
        assert_eq!(high.times(0.5).value(), 0.4);
        assert_eq!(TierBonusScore::of(1.5).expect("valid").times(2.0).value(), 2.0);
    }

    #[test]
    fn clamped_collapses_nan_to_minimum() {
        assert_eq!(FinalPriorityScore::clamped(f64::NAN), FinalPriorityScore::MIN);
        assert_eq!(FinalPriorityScore::clamped(3.0), FinalPriorityScore::MAX);
    }

    #[test]
    fn serde_validates_range_on_deserialize() {
        let score: MeritScore = serde_json::from_str("0.25").expect("valid json score");
        assert_eq!(score.value(), 0.25);
        assert_eq!(serde_json::to_string(&score).expect("serializes"), "0.25");
        assert!(serde_json::from_str::<MeritScore>("1.5").is_err());
    }
}
