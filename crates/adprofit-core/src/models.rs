//! Data models for adprofit

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize, Serializer};

/// A money value that may have failed numeric coercion
///
/// `NotANumber` is distinct from zero and poisons any arithmetic it takes
/// part in, so a malformed cost can never render as a plausible figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Value(f64),
    NotANumber,
}

impl Amount {
    pub const ZERO: Amount = Amount::Value(0.0);

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::NotANumber => None,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Self::NotANumber)
    }
}

impl From<f64> for Amount {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            Self::Value(v)
        } else {
            Self::NotANumber
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        match (self, rhs) {
            (Self::Value(a), Self::Value(b)) => Amount::from(a + b),
            _ => Self::NotANumber,
        }
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        match (self, rhs) {
            (Self::Value(a), Self::Value(b)) => Amount::from(a - b),
            _ => Self::NotANumber,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v),
            Self::NotANumber => f.write_str("NaN"),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::NotANumber => serializer.serialize_str("NaN"),
        }
    }
}

/// One revenue event from the attribution feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueEvent {
    pub campaign_id: i64,
    pub estimated_revenue: f64,
}

/// One raw row from the spend export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendRecord {
    /// Free-text label, e.g. "Holiday Promo (48213)"
    pub campaign_label: String,
    /// Cost exactly as it appeared in the export
    pub cost: String,
    /// 1-based line in the source file (0 when built in memory)
    pub line: u64,
}

impl SpendRecord {
    pub fn new(campaign_label: impl Into<String>, cost: impl Into<String>) -> Self {
        Self {
            campaign_label: campaign_label.into(),
            cost: cost.into(),
            line: 0,
        }
    }
}

/// A spend row with a resolved campaign id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSpend {
    pub campaign_id: i64,
    pub campaign_name: String,
    pub spend: Amount,
}

/// Result of normalizing a single spend row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
    /// Id extracted and cost parsed
    Included { line: u64, row: NormalizedSpend },
    /// No campaign id in the label; row contributes nothing
    ExcludedNoId { line: u64, label: String },
    /// Id extracted but the cost could not be read as a number
    IncludedWithInvalidCost {
        line: u64,
        row: NormalizedSpend,
        raw_cost: String,
    },
}

impl RowOutcome {
    pub fn line(&self) -> u64 {
        match self {
            Self::Included { line, .. }
            | Self::ExcludedNoId { line, .. }
            | Self::IncludedWithInvalidCost { line, .. } => *line,
        }
    }

    /// The normalized row, if this outcome keeps one
    pub fn row(&self) -> Option<&NormalizedSpend> {
        match self {
            Self::Included { row, .. } | Self::IncludedWithInvalidCost { row, .. } => Some(row),
            Self::ExcludedNoId { .. } => None,
        }
    }

    pub fn into_row(self) -> Option<NormalizedSpend> {
        match self {
            Self::Included { row, .. } | Self::IncludedWithInvalidCost { row, .. } => Some(row),
            Self::ExcludedNoId { .. } => None,
        }
    }
}

/// One line of the profit/loss report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledRow {
    pub campaign_id: i64,
    pub campaign_name: String,
    pub spend: Amount,
    pub revenue: f64,
    pub profit_loss: Amount,
}

/// What to do with a spend row whose cost is not numeric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidCostPolicy {
    /// Keep the row and carry `Amount::NotANumber` into the report
    #[default]
    Propagate,
    /// Fail the run, naming every offending line
    Reject,
}

impl InvalidCostPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Propagate => "propagate",
            Self::Reject => "reject",
        }
    }
}

impl std::str::FromStr for InvalidCostPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "propagate" | "keep" => Ok(Self::Propagate),
            "reject" | "fail" => Ok(Self::Reject),
            _ => Err(format!("Unknown invalid cost policy: {}", s)),
        }
    }
}

impl fmt::Display for InvalidCostPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What to do when several spend rows share a campaign id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateSpendPolicy {
    /// One report row per spend row
    #[default]
    Keep,
    /// Merge rows per id, summing spend and keeping the first label
    Sum,
    /// Fail the run
    Reject,
}

impl DuplicateSpendPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Sum => "sum",
            Self::Reject => "reject",
        }
    }
}

impl std::str::FromStr for DuplicateSpendPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "sum" => Ok(Self::Sum),
            "reject" | "fail" => Ok(Self::Reject),
            _ => Err(format!("Unknown duplicate spend policy: {}", s)),
        }
    }
}

impl fmt::Display for DuplicateSpendPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_arithmetic() {
        assert_eq!(Amount::Value(80.0) - Amount::Value(40.0), Amount::Value(40.0));
        assert_eq!(Amount::Value(1.5) + Amount::Value(2.0), Amount::Value(3.5));
        assert_eq!(Amount::ZERO - Amount::NotANumber, Amount::NotANumber);
        assert_eq!(Amount::NotANumber + Amount::Value(1.0), Amount::NotANumber);
    }

    #[test]
    fn test_amount_from_non_finite() {
        assert_eq!(Amount::from(f64::NAN), Amount::NotANumber);
        assert_eq!(Amount::from(f64::INFINITY), Amount::NotANumber);
        assert_eq!(Amount::from(12.5), Amount::Value(12.5));
    }

    #[test]
    fn test_amount_display() {
        assert_eq!(Amount::Value(40.0).to_string(), "40");
        assert_eq!(Amount::Value(-12.25).to_string(), "-12.25");
        assert_eq!(Amount::NotANumber.to_string(), "NaN");
    }

    #[test]
    fn test_amount_serializes_nan_as_string() {
        let json = serde_json::to_string(&[Amount::Value(2.5), Amount::NotANumber]).unwrap();
        assert_eq!(json, r#"[2.5,"NaN"]"#);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "Reject".parse::<InvalidCostPolicy>().unwrap(),
            InvalidCostPolicy::Reject
        );
        assert_eq!(
            "sum".parse::<DuplicateSpendPolicy>().unwrap(),
            DuplicateSpendPolicy::Sum
        );
        assert!("merge".parse::<DuplicateSpendPolicy>().is_err());
    }
}
