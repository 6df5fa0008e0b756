use clap::Args;
use serde_json::{json, Value};

use calcsuite_core::forms::share::{self, RentalForm, RentalShareParams};
use calcsuite_core::housing::rental_property;

/// Arguments for rental share links
///
/// With `--query`, decode an existing link and run the analysis it
/// describes. Otherwise build a link from the given form values, which are
/// entered the way the calculator shows them (percentages, not decimals).
#[derive(Args)]
pub struct ShareLinkArgs {
    /// Query string of an existing link, e.g. "?p=300000&r=2500"
    #[arg(long)]
    pub query: Option<String>,

    /// Page the link should point to
    #[arg(long, default_value = "/rental-property-calculator")]
    pub base_url: String,

    /// Purchase price
    #[arg(long)]
    pub price: Option<String>,

    /// Monthly rent
    #[arg(long)]
    pub rent: Option<String>,

    /// Down payment percent
    #[arg(long)]
    pub down: Option<String>,

    /// Interest rate percent
    #[arg(long)]
    pub interest: Option<String>,

    /// Holding period in years
    #[arg(long)]
    pub years: Option<String>,
}

pub fn run_share_link(args: ShareLinkArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = match args.query.as_deref() {
        Some(query) => RentalShareParams::from_query(query)?,
        None => {
            let mut form = RentalForm::default();
            let fields = [
                (args.price, &mut form.purchase_price),
                (args.rent, &mut form.monthly_rent),
                (args.down, &mut form.down_payment_percent),
                (args.interest, &mut form.interest_rate_percent),
                (args.years, &mut form.holding_years),
            ];
            for (flag, field) in fields {
                if let Some(value) = flag {
                    *field = value;
                }
            }
            RentalShareParams::from_form(&form)
        }
    };

    let rental_input = params.to_input();
    let analysis = rental_property::analyze_rental(&rental_input)?;
    let text = share::share_text(&analysis.result, rental_input.holding_years);

    Ok(json!({
        "result": {
            "url": share::share_url(&args.base_url, &params)?,
            "share_text": text,
            "monthly_cash_flow": analysis.result.monthly_cash_flow,
            "cap_rate": analysis.result.cap_rate,
            "rating": analysis.result.rating,
        },
        "warnings": analysis.warnings,
        "methodology": analysis.methodology,
    }))
}
