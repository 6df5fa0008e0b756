use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const STARTING_SCORE: u32 = 100;
const EXCELLENT_MIN: u32 = 80;
const GOOD_MIN: u32 = 60;
const FAIR_MIN: u32 = 40;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Metric a rating rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingMetric {
    /// Year-one monthly cash flow after debt service
    MonthlyCashFlow,
    /// Year-one NOI / purchase price
    CapRate,
    /// Year-one NOI / annual debt service
    Dscr,
    /// Total return / holding years
    AverageAnnualReturn,
}

/// Deduct `deduction` points when `metric < below`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRule {
    pub metric: RatingMetric,
    pub below: Decimal,
    pub deduction: u32,
    pub message: String,
}

impl RatingRule {
    fn new(metric: RatingMetric, below: Decimal, deduction: u32, message: &str) -> Self {
        Self {
            metric,
            below,
            deduction,
            message: message.to_string(),
        }
    }
}

/// Inputs to the rating, taken from year one of the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingMetrics {
    pub monthly_cash_flow: Decimal,
    pub cap_rate: Decimal,
    /// `None` for all-cash purchases
    pub dscr: Option<Decimal>,
    pub average_annual_return: Decimal,
}

impl RatingMetrics {
    fn value(&self, metric: RatingMetric) -> Option<Decimal> {
        match metric {
            RatingMetric::MonthlyCashFlow => Some(self.monthly_cash_flow),
            RatingMetric::CapRate => Some(self.cap_rate),
            RatingMetric::Dscr => self.dscr,
            RatingMetric::AverageAnnualReturn => Some(self.average_annual_return),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingLabel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl RatingLabel {
    pub fn from_score(score: u32) -> Self {
        if score >= EXCELLENT_MIN {
            RatingLabel::Excellent
        } else if score >= GOOD_MIN {
            RatingLabel::Good
        } else if score >= FAIR_MIN {
            RatingLabel::Fair
        } else {
            RatingLabel::Poor
        }
    }
}

impl std::fmt::Display for RatingLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingLabel::Excellent => write!(f, "Excellent"),
            RatingLabel::Good => write!(f, "Good"),
            RatingLabel::Fair => write!(f, "Fair"),
            RatingLabel::Poor => write!(f, "Poor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRating {
    pub score: u32,
    pub label: RatingLabel,
    pub messages: Vec<String>,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Default deduction table. Within a metric, stricter thresholds come first.
pub fn default_rules() -> Vec<RatingRule> {
    use RatingMetric::*;
    vec![
        RatingRule::new(
            MonthlyCashFlow,
            Decimal::ZERO,
            30,
            "Negative monthly cash flow: the property costs more than it earns",
        ),
        RatingRule::new(
            MonthlyCashFlow,
            dec!(100),
            15,
            "Thin monthly cash flow leaves little margin for repairs or vacancies",
        ),
        RatingRule::new(
            CapRate,
            dec!(0.04),
            20,
            "Cap rate below 4%: the price is high relative to income",
        ),
        RatingRule::new(
            CapRate,
            dec!(0.06),
            10,
            "Cap rate below 6%: modest income yield for the price",
        ),
        RatingRule::new(
            Dscr,
            dec!(1.00),
            20,
            "DSCR below 1.0: rental income does not cover the mortgage",
        ),
        RatingRule::new(
            Dscr,
            dec!(1.25),
            10,
            "DSCR below 1.25: most lenders want more coverage",
        ),
        RatingRule::new(
            AverageAnnualReturn,
            dec!(0.05),
            15,
            "Average annual return below 5%: consider lower-risk alternatives",
        ),
        RatingRule::new(
            AverageAnnualReturn,
            dec!(0.08),
            5,
            "Average annual return below 8%",
        ),
    ]
}

/// Score an investment against an ordered rule table.
///
/// Starts at 100. For each metric only the first matching rule in table
/// order is applied. Metrics without a value (DSCR with no loan) are skipped.
pub fn rate_investment(metrics: &RatingMetrics, rules: &[RatingRule]) -> InvestmentRating {
    let mut score = STARTING_SCORE;
    let mut messages = Vec::new();
    let mut penalised: Vec<RatingMetric> = Vec::new();

    for rule in rules {
        if penalised.contains(&rule.metric) {
            continue;
        }
        let Some(value) = metrics.value(rule.metric) else {
            continue;
        };
        if value < rule.below {
            score = score.saturating_sub(rule.deduction);
            messages.push(rule.message.clone());
            penalised.push(rule.metric);
        }
    }

    if messages.is_empty() {
        messages.push("Cash flow, yield, coverage and returns all clear the thresholds".into());
    }

    InvestmentRating {
        score,
        label: RatingLabel::from_score(score),
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong() -> RatingMetrics {
        RatingMetrics {
            monthly_cash_flow: dec!(450),
            cap_rate: dec!(0.08),
            dscr: Some(dec!(1.6)),
            average_annual_return: dec!(0.12),
        }
    }

    #[test]
    fn test_strong_investment_scores_full_marks() {
        let r = rate_investment(&strong(), &default_rules());
        assert_eq!(r.score, 100);
        assert_eq!(r.label, RatingLabel::Excellent);
        assert_eq!(r.messages.len(), 1);
    }

    #[test]
    fn test_only_most_severe_rule_per_metric() {
        let mut m = strong();
        m.monthly_cash_flow = dec!(-200);
        let r = rate_investment(&m, &default_rules());
        // -30 only, not -30 and -15
        assert_eq!(r.score, 70);
        assert_eq!(r.label, RatingLabel::Good);
    }

    #[test]
    fn test_thin_cash_flow_smaller_deduction() {
        let mut m = strong();
        m.monthly_cash_flow = dec!(50);
        assert_eq!(rate_investment(&m, &default_rules()).score, 85);
    }

    #[test]
    fn test_missing_dscr_is_skipped() {
        let mut m = strong();
        m.dscr = None;
        assert_eq!(rate_investment(&m, &default_rules()).score, 100);
    }

    #[test]
    fn test_poor_investment() {
        let m = RatingMetrics {
            monthly_cash_flow: dec!(-500),
            cap_rate: dec!(0.02),
            dscr: Some(dec!(0.7)),
            average_annual_return: dec!(0.01),
        };
        let r = rate_investment(&m, &default_rules());
        // 100 - 30 - 20 - 20 - 15
        assert_eq!(r.score, 15);
        assert_eq!(r.label, RatingLabel::Poor);
        assert_eq!(r.messages.len(), 4);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut m = strong();
        m.cap_rate = dec!(0.06);
        assert_eq!(rate_investment(&m, &default_rules()).score, 100);
    }

    #[test]
    fn test_label_boundaries() {
        assert_eq!(RatingLabel::from_score(80), RatingLabel::Excellent);
        assert_eq!(RatingLabel::from_score(79), RatingLabel::Good);
        assert_eq!(RatingLabel::from_score(60), RatingLabel::Good);
        assert_eq!(RatingLabel::from_score(40), RatingLabel::Fair);
        assert_eq!(RatingLabel::from_score(39), RatingLabel::Poor);
    }

    #[test]
    fn test_custom_rules_and_floor() {
        let rules = vec![RatingRule::new(
            RatingMetric::CapRate,
            dec!(1),
            250,
            "always",
        )];
        let r = rate_investment(&strong(), &rules);
        assert_eq!(r.score, 0);
    }
}
