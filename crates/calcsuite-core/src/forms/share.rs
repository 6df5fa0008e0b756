use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::forms::parse::{format_percent, parse_amount, parse_count, parse_percent};
use crate::housing::rental_property::{RentalAnalysisOutput, RentalPropertyInput};
use crate::projection::projector::ExpenseLine;
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Rental form
// ---------------------------------------------------------------------------

/// The rental calculator's fields exactly as typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentalForm {
    pub purchase_price: String,
    pub use_loan: bool,
    pub down_payment_percent: String,
    pub interest_rate_percent: String,
    pub loan_term_years: String,
    pub closing_costs: String,
    pub monthly_rent: String,
    pub rent_growth_percent: String,
    pub vacancy_percent: String,
    pub annual_property_tax: String,
    pub annual_insurance: String,
    pub annual_maintenance: String,
    pub monthly_hoa: String,
    pub expense_growth_percent: String,
    pub appreciation_percent: String,
    pub holding_years: String,
    pub selling_cost_percent: String,
}

impl Default for RentalForm {
    /// Values pre-filled when the calculator first loads.
    fn default() -> Self {
        Self {
            purchase_price: "300000".into(),
            use_loan: true,
            down_payment_percent: "20".into(),
            interest_rate_percent: "7".into(),
            loan_term_years: "30".into(),
            closing_costs: "9000".into(),
            monthly_rent: "2500".into(),
            rent_growth_percent: "3".into(),
            vacancy_percent: "5".into(),
            annual_property_tax: "3600".into(),
            annual_insurance: "1500".into(),
            annual_maintenance: "3000".into(),
            monthly_hoa: "0".into(),
            expense_growth_percent: "2".into(),
            appreciation_percent: "3".into(),
            holding_years: "10".into(),
            selling_cost_percent: "6".into(),
        }
    }
}

impl RentalForm {
    /// Parse every field; blanks and garbage become zero.
    pub fn to_input(&self) -> RentalPropertyInput {
        let expense_growth = parse_percent(&self.expense_growth_percent);
        RentalPropertyInput {
            purchase_price: parse_amount(&self.purchase_price),
            use_loan: self.use_loan,
            down_payment_rate: parse_percent(&self.down_payment_percent),
            loan_rate: parse_percent(&self.interest_rate_percent),
            loan_term_years: parse_count(&self.loan_term_years),
            closing_costs: parse_amount(&self.closing_costs),
            monthly_rent: parse_amount(&self.monthly_rent),
            rent_growth: parse_percent(&self.rent_growth_percent),
            vacancy_rate: parse_percent(&self.vacancy_percent),
            expenses: vec![
                ExpenseLine::new(
                    "property_tax",
                    parse_amount(&self.annual_property_tax),
                    expense_growth,
                ),
                ExpenseLine::new("insurance", parse_amount(&self.annual_insurance), expense_growth),
                ExpenseLine::new(
                    "maintenance",
                    parse_amount(&self.annual_maintenance),
                    expense_growth,
                ),
                ExpenseLine::new(
                    "hoa",
                    parse_amount(&self.monthly_hoa) * dec!(12),
                    expense_growth,
                ),
            ],
            appreciation_rate: parse_percent(&self.appreciation_percent),
            holding_years: parse_count(&self.holding_years),
            selling_cost_rate: parse_percent(&self.selling_cost_percent),
            rating_rules: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Share link
// ---------------------------------------------------------------------------

/// Compact query parameters that reproduce a rental calculation.
///
/// `p` price, `r` monthly rent, `d` down payment %, `i` interest rate %,
/// `h` holding years. Missing keys keep the form default; present keys are
/// parsed exactly like typed input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentalShareParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<String>,
}

impl RentalShareParams {
    /// Decode `p=...&r=...`; a leading `?` is accepted.
    pub fn from_query(query: &str) -> CalcResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        serde_urlencoded::from_str(query)
            .map_err(|e| CalcError::SerializationError(format!("Invalid share link: {e}")))
    }

    pub fn to_query(&self) -> CalcResult<String> {
        serde_urlencoded::to_string(self)
            .map_err(|e| CalcError::SerializationError(e.to_string()))
    }

    /// Capture the shareable subset of a form.
    pub fn from_form(form: &RentalForm) -> Self {
        Self {
            p: Some(form.purchase_price.clone()),
            r: Some(form.monthly_rent.clone()),
            d: Some(form.down_payment_percent.clone()),
            i: Some(form.interest_rate_percent.clone()),
            h: Some(form.holding_years.clone()),
        }
    }

    /// Capture the shareable subset of an already-parsed input.
    pub fn from_input(input: &RentalPropertyInput) -> Self {
        Self {
            p: Some(input.purchase_price.normalize().to_string()),
            r: Some(input.monthly_rent.normalize().to_string()),
            d: Some(format_percent(input.down_payment_rate)),
            i: Some(format_percent(input.loan_rate)),
            h: Some(input.holding_years.to_string()),
        }
    }

    /// Overlay the link onto the default form.
    pub fn to_form(&self) -> RentalForm {
        let mut form = RentalForm::default();
        let overlay = [
            (&self.p, &mut form.purchase_price),
            (&self.r, &mut form.monthly_rent),
            (&self.d, &mut form.down_payment_percent),
            (&self.i, &mut form.interest_rate_percent),
            (&self.h, &mut form.holding_years),
        ];
        for (param, field) in overlay {
            if let Some(value) = param {
                *field = value.clone();
            }
        }
        form
    }

    pub fn to_input(&self) -> RentalPropertyInput {
        self.to_form().to_input()
    }
}

/// Full share URL for a page.
pub fn share_url(base_url: &str, params: &RentalShareParams) -> CalcResult<String> {
    let query = params.to_query()?;
    if query.is_empty() {
        return Ok(base_url.to_string());
    }
    let sep = if base_url.contains('?') { '&' } else { '?' };
    Ok(format!("{base_url}{sep}{query}"))
}

/// Plain-text summary for the share sheet or clipboard.
pub fn share_text(output: &RentalAnalysisOutput, holding_years: u32) -> String {
    let pct = |r: Decimal| format!("{:.2}%", r * Decimal::ONE_HUNDRED);
    let mut lines = vec![
        "Rental Property Analysis".to_string(),
        format!("Monthly cash flow: ${:.2}", output.monthly_cash_flow),
        format!("Cap rate: {}", pct(output.cap_rate)),
        format!("Cash-on-cash return: {}", pct(output.cash_on_cash_return)),
    ];
    if let Some(dscr) = output.dscr {
        lines.push(format!("DSCR: {dscr:.2}"));
    }
    lines.push(format!(
        "Total return over {holding_years} years: {}",
        pct(output.summary.total_return)
    ));
    lines.push(format!(
        "Rating: {} ({}/100)",
        output.rating.label, output.rating.score
    ));
    lines.join("\n")
}
