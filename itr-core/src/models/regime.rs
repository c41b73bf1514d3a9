use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A regime value that could not be parsed.
///
/// Unknown regime text is a caller contract violation, never a silent
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid regime '{0}' (expected 'old', 'new', or 'both')")]
pub struct InvalidRegime(pub String);

/// One of the two parallel statutory tax-calculation schemes.
///
/// The regimes differ in their slab tables, salary netting, rebate
/// thresholds, and the top surcharge tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxRegime {
    Old,
    New,
}

impl TaxRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    pub fn parse(s: &str) -> Result<Self, InvalidRegime> {
        match s {
            "old" => Ok(Self::Old),
            "new" => Ok(Self::New),
            other => Err(InvalidRegime(other.to_string())),
        }
    }
}

/// Which regimes a computation request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegimeSelection {
    Old,
    New,
    Both,
}

impl RegimeSelection {
    /// The concrete regimes to run, in a fixed order (old first).
    pub fn regimes(&self) -> Vec<TaxRegime> {
        match self {
            Self::Old => vec![TaxRegime::Old],
            Self::New => vec![TaxRegime::New],
            Self::Both => vec![TaxRegime::Old, TaxRegime::New],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
            Self::Both => "both",
        }
    }

    pub fn parse(s: &str) -> Result<Self, InvalidRegime> {
        match s {
            "old" => Ok(Self::Old),
            "new" => Ok(Self::New),
            "both" => Ok(Self::Both),
            other => Err(InvalidRegime(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn regime_round_trips_through_str() {
        assert_eq!(TaxRegime::parse("old"), Ok(TaxRegime::Old));
        assert_eq!(TaxRegime::parse("new"), Ok(TaxRegime::New));
        assert_eq!(TaxRegime::Old.as_str(), "old");
        assert_eq!(TaxRegime::New.as_str(), "new");
    }

    #[test]
    fn unknown_regime_is_an_error() {
        assert_eq!(
            TaxRegime::parse("flat"),
            Err(InvalidRegime("flat".to_string()))
        );
    }

    #[test]
    fn selection_both_runs_old_then_new() {
        assert_eq!(
            RegimeSelection::Both.regimes(),
            vec![TaxRegime::Old, TaxRegime::New]
        );
    }

    #[test]
    fn selection_single_runs_one_regime() {
        assert_eq!(RegimeSelection::Old.regimes(), vec![TaxRegime::Old]);
        assert_eq!(RegimeSelection::New.regimes(), vec![TaxRegime::New]);
    }

    #[test]
    fn selection_parse_rejects_unknown_text() {
        assert_eq!(
            RegimeSelection::parse("either"),
            Err(InvalidRegime("either".to_string()))
        );
    }
}
