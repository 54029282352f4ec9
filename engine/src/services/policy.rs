//! Display policy: the user-selected toggles that transform raw hours into
//! rendered hours without mutating the underlying facts.

use serde::{Deserialize, Serialize};

/// Whether rendered hours are weighted by project probability.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityMode {
    /// Show raw booked hours.
    #[default]
    Unweighted,
    /// Scale hours by the project's percent likelihood, rounded.
    Weighted,
}

/// Which cells are visible based on project probability.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityMode {
    /// Show everything.
    #[default]
    All,
    /// Hide cells of non-firm projects (probability below 100).
    FirmOnly,
    /// Hide cells of firm projects, leaving only tentative work.
    TentativeOnly,
}

/// The pair of display toggles threaded into every view build.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayPolicy {
    pub probability_mode: ProbabilityMode,
    pub visibility_mode: VisibilityMode,
}

impl DisplayPolicy {
    pub fn new(probability_mode: ProbabilityMode, visibility_mode: VisibilityMode) -> Self {
        Self {
            probability_mode,
            visibility_mode,
        }
    }

    /// Probability-weighted display with everything visible.
    pub fn weighted() -> Self {
        Self::new(ProbabilityMode::Weighted, VisibilityMode::All)
    }
}

/// The outcome of the per-cell display transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CellDisplay {
    pub display_hours: f64,
    pub is_hidden: bool,
}

/// Transform raw hours into rendered hours for one cell.
///
/// Hidden cells display zero and contribute zero to every total, but the raw
/// `hours` they came from stays visible to the edit path.
pub fn display_hours(hours: f64, probability: u8, policy: &DisplayPolicy) -> CellDisplay {
    let firm = probability == 100;
    let hidden = match policy.visibility_mode {
        VisibilityMode::All => false,
        VisibilityMode::FirmOnly => !firm,
        VisibilityMode::TentativeOnly => firm,
    };
    if hidden {
        return CellDisplay {
            display_hours: 0.0,
            is_hidden: true,
        };
    }

    let display_hours = match policy.probability_mode {
        ProbabilityMode::Unweighted => hours,
        ProbabilityMode::Weighted => (hours * f64::from(probability) / 100.0).round(),
    };
    CellDisplay {
        display_hours,
        is_hidden: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_under_default_policy() {
        let policy = DisplayPolicy::default();
        for probability in [0, 33, 100] {
            let d = display_hours(12.5, probability, &policy);
            assert_eq!(d.display_hours, 12.5);
            assert!(!d.is_hidden);
        }
    }

    #[test]
    fn test_weighted_rounding() {
        let d = display_hours(10.0, 33, &DisplayPolicy::weighted());
        assert_eq!(d.display_hours, 3.0);
        assert!(!d.is_hidden);
    }

    #[test]
    fn test_weighted_firm_is_identity() {
        let d = display_hours(7.5, 100, &DisplayPolicy::weighted());
        assert_eq!(d.display_hours, 8.0); // rounding still applies
    }

    #[test]
    fn test_firm_only_hides_tentative() {
        let policy = DisplayPolicy::new(ProbabilityMode::Unweighted, VisibilityMode::FirmOnly);
        assert!(display_hours(8.0, 60, &policy).is_hidden);
        assert!(!display_hours(8.0, 100, &policy).is_hidden);
    }

    #[test]
    fn test_tentative_only_hides_firm() {
        let policy = DisplayPolicy::new(ProbabilityMode::Weighted, VisibilityMode::TentativeOnly);
        assert!(display_hours(8.0, 100, &policy).is_hidden);

        let d = display_hours(8.0, 60, &policy);
        assert!(!d.is_hidden);
        assert_eq!(d.display_hours, 5.0);
    }

    #[test]
    fn test_hidden_displays_zero() {
        let policy = DisplayPolicy::new(ProbabilityMode::Weighted, VisibilityMode::FirmOnly);
        let d = display_hours(40.0, 50, &policy);
        assert!(d.is_hidden);
        assert_eq!(d.display_hours, 0.0);
    }
}
