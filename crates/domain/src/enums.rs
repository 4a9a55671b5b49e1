use crate::costs::POSITION_RENT_SOL;
use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Portfolio style chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStyle {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskStyle {
    /// All styles, in ascending risk order.
    pub const ALL: [RiskStyle; 3] = [Self::Conservative, Self::Moderate, Self::Aggressive];

    /// Bin steps this style prefers, best first.
    #[must_use]
    pub fn preferred_bin_steps(&self) -> &'static [u16] {
        match self {
            Self::Conservative => &[50],
            Self::Moderate => &[10, 15],
            Self::Aggressive => &[5],
        }
    }

    /// Whether `bin_step` is in this style's preferred set.
    #[must_use]
    pub fn prefers(&self, bin_step: u16) -> bool {
        self.preferred_bin_steps().contains(&bin_step)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for RiskStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "moderate" | "balanced" => Ok(Self::Moderate),
            "aggressive" => Ok(Self::Aggressive),
            other => Err(DomainError::UnknownStyle(other.to_string())),
        }
    }
}

/// Risk level attached to a range candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Label of a bin-range candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeLabel {
    InRange,
    Aggressive,
    Balanced,
    Conservative,
    Custom,
}

impl RangeLabel {
    /// Preset labels in generation order.
    pub const PRESETS: [RangeLabel; 4] = [
        Self::InRange,
        Self::Aggressive,
        Self::Balanced,
        Self::Conservative,
    ];

    /// Bins on each side of the active bin. `None` for custom ranges.
    #[must_use]
    pub fn half_width(&self) -> Option<u32> {
        match self {
            Self::InRange => Some(5),
            Self::Aggressive => Some(3),
            Self::Balanced => Some(10),
            Self::Conservative => Some(15),
            Self::Custom => None,
        }
    }

    /// Static cost assuming no bin array has to be created.
    #[must_use]
    pub fn base_cost_sol(&self) -> Option<Decimal> {
        match self {
            Self::InRange | Self::Aggressive => Some(POSITION_RENT_SOL),
            Self::Balanced => Some(Decimal::new(70, 3)),
            Self::Conservative => Some(Decimal::new(82, 3)),
            Self::Custom => None,
        }
    }

    #[must_use]
    pub fn risk(&self) -> RiskLevel {
        match self {
            Self::Aggressive => RiskLevel::High,
            Self::Conservative => RiskLevel::Low,
            Self::InRange | Self::Balanced | Self::Custom => RiskLevel::Medium,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InRange => "inRange",
            Self::Aggressive => "aggressive",
            Self::Balanced => "balanced",
            Self::Conservative => "conservative",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for RangeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeLabel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inrange" | "in_range" | "in-range" | "default" => Ok(Self::InRange),
            "aggressive" => Ok(Self::Aggressive),
            "balanced" => Ok(Self::Balanced),
            "conservative" => Ok(Self::Conservative),
            "custom" => Ok(Self::Custom),
            other => Err(DomainError::UnknownRangeLabel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_bin_steps() {
        assert_eq!(RiskStyle::Conservative.preferred_bin_steps(), &[50]);
        assert_eq!(RiskStyle::Moderate.preferred_bin_steps(), &[10, 15]);
        assert_eq!(RiskStyle::Aggressive.preferred_bin_steps(), &[5]);
        assert!(RiskStyle::Moderate.prefers(15));
        assert!(!RiskStyle::Moderate.prefers(50));
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("Moderate".parse::<RiskStyle>().unwrap(), RiskStyle::Moderate);
        assert_eq!(
            " aggressive ".parse::<RiskStyle>().unwrap(),
            RiskStyle::Aggressive
        );
        assert!(matches!(
            "yolo".parse::<RiskStyle>(),
            Err(DomainError::UnknownStyle(_))
        ));
    }

    #[test]
    fn test_label_names() {
        assert_eq!(RangeLabel::InRange.to_string(), "inRange");
        assert_eq!("in-range".parse::<RangeLabel>().unwrap(), RangeLabel::InRange);
        assert!("wide".parse::<RangeLabel>().is_err());
    }

    #[test]
    fn test_static_costs_are_monotonic_in_width() {
        let agg = RangeLabel::Aggressive.base_cost_sol().unwrap();
        let inr = RangeLabel::InRange.base_cost_sol().unwrap();
        let bal = RangeLabel::Balanced.base_cost_sol().unwrap();
        let con = RangeLabel::Conservative.base_cost_sol().unwrap();
        assert!(agg <= inr && inr <= bal && bal <= con);
        assert_eq!(RangeLabel::Custom.base_cost_sol(), None);
    }
}
