//! Calc command - stamp duty for a single purchase

use crate::cmd::{resolve_region, BuyerStatusArg};
use crate::money::{format_gbp, format_rate};
use crate::tax::{compute_duty, BandCharge, BuyerStatus, CalculationInput, CalculationResult};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalcCommand {
    /// Property price in pounds
    #[arg(short, long, allow_negative_numbers = true)]
    price: Decimal,

    /// Region: england, scotland, wales or northern-ireland (defaults to England/NI rates)
    #[arg(short, long)]
    region: Option<String>,

    /// Buyer status
    #[arg(short, long, value_enum)]
    status: BuyerStatusArg,

    /// Show the charge for each band
    #[arg(short, long)]
    breakdown: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct CalcOutput {
    price: String,
    region: String,
    rates: &'static str,
    buyer_status: BuyerStatus,
    additional_property: bool,
    duty: String,
    effective_rate_pct: String,
    breakdown: Vec<BandCharge>,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let region = resolve_region(self.region.as_deref());
        let status: BuyerStatus = self.status.into();
        let input = CalculationInput::new(self.price, region, status);
        let result = compute_duty(&input)?;

        if self.json {
            let output = CalcOutput {
                price: format!("{:.2}", input.price),
                region: region.map_or("unset".to_string(), |r| r.to_string()),
                rates: result.table,
                buyer_status: status,
                additional_property: input.additional_property,
                duty: format!("{:.2}", result.duty_owed.round_dp(2)),
                effective_rate_pct: format!(
                    "{:.2}",
                    result.effective_rate(input.price) * Decimal::ONE_HUNDRED
                ),
                breakdown: result.breakdown,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_result(&input, status, &result, self.breakdown);
        }
        Ok(())
    }
}

fn print_result(
    input: &CalculationInput,
    status: BuyerStatus,
    result: &CalculationResult,
    breakdown: bool,
) {
    println!();
    println!("STAMP DUTY ({})", result.table);
    println!();
    println!("  Price: {}", format_gbp(input.price, 0));
    println!("  Type: {}", status);
    println!("  Stamp duty to pay: {}", format_gbp(result.duty_owed, 2));
    println!(
        "  Effective rate: {:.2}%",
        result.effective_rate(input.price) * Decimal::ONE_HUNDRED
    );
    println!();

    if breakdown && !result.breakdown.is_empty() {
        let rows: Vec<BandChargeRow> = result.breakdown.iter().map(BandChargeRow::from).collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();
    }
}

#[derive(Debug, Clone, Tabled)]
struct BandChargeRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Surcharge")]
    surcharge: String,
    #[tabled(rename = "Taxable")]
    taxable: String,
    #[tabled(rename = "Duty")]
    duty: String,
}

impl From<&BandCharge> for BandChargeRow {
    fn from(charge: &BandCharge) -> Self {
        BandChargeRow {
            band: band_label(charge.lower, charge.upper),
            rate: format_rate(charge.rate),
            surcharge: format_rate(charge.surcharge),
            taxable: format_gbp(charge.taxable, 2),
            duty: format_gbp(charge.duty, 2),
        }
    }
}

pub(crate) fn band_label(lower: Decimal, upper: Option<Decimal>) -> String {
    match upper {
        Some(upper) => format!("{} - {}", format_gbp(lower, 0), format_gbp(upper, 0)),
        None => format!("{}+", format_gbp(lower, 0)),
    }
}
