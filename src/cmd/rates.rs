//! Rates command - print the rate tables

use crate::cmd::calc::band_label;
use crate::cmd::resolve_region;
use crate::money::{format_gbp, format_rate};
use crate::tax::{RegionConfig, ADDITIONAL_PAY_FROM_THRESHOLD, ALL_CONFIGS};
use clap::Args;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct RatesCommand {
    /// Only show the tables that apply to this region
    #[arg(short, long)]
    region: Option<String>,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct RatesOutput {
    additional_pay_from_threshold: String,
    tables: Vec<&'static RegionConfig>,
}

impl RatesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let tables = self.selected_tables();

        if self.json {
            let output = RatesOutput {
                additional_pay_from_threshold: format!("{:.2}", ADDITIONAL_PAY_FROM_THRESHOLD),
                tables,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!();
        for config in tables {
            println!("{} (additional property surcharge {})", config.name, format_rate(config.surcharge_rate));
            let rows: Vec<RateRow> = config
                .bands
                .iter()
                .enumerate()
                .map(|(i, band)| RateRow {
                    band: band_label(config.lower_bound(i), band.upper),
                    rate: format_rate(band.rate),
                    additional_rate: format_rate(band.rate + config.surcharge_rate),
                })
                .collect();
            let table = Table::new(rows)
                .with(Style::rounded())
                .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
            println!();
        }
        println!(
            "Additional properties below the zero-rate band pay the surcharge from {}.",
            format_gbp(ADDITIONAL_PAY_FROM_THRESHOLD, 0)
        );
        println!();
        Ok(())
    }

    fn selected_tables(&self) -> Vec<&'static RegionConfig> {
        match self.region.as_deref() {
            None => ALL_CONFIGS.to_vec(),
            Some(name) => {
                let region = resolve_region(Some(name));
                let standard = RegionConfig::for_input(region, false);
                let additional = RegionConfig::for_input(region, true);
                if std::ptr::eq(standard, additional) {
                    vec![standard]
                } else {
                    vec![standard, additional]
                }
            }
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct RateRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Additional Property")]
    additional_rate: String,
}
