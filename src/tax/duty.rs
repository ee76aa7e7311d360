use crate::tax::rates::{RegionConfig, ADDITIONAL_PAY_FROM_THRESHOLD};
use crate::tax::region::{BuyerStatus, Region};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DutyError {
    #[error("price must not be negative: {0}")]
    NegativePrice(Decimal),
    #[error("invalid rate table '{table}': {reason}")]
    InvalidTable {
        table: &'static str,
        reason: String,
    },
}

/// Inputs for a single stamp duty calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationInput {
    /// Purchase price in pounds
    pub price: Decimal,
    /// `None` when the region is unset or unrecognised
    pub region: Option<Region>,
    pub additional_property: bool,
}

impl CalculationInput {
    pub fn new(price: Decimal, region: Option<Region>, status: BuyerStatus) -> Self {
        CalculationInput {
            price,
            region,
            additional_property: status.is_additional_property(),
        }
    }
}

/// Contribution of one band to the total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandCharge {
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
    pub surcharge: Decimal,
    /// Portion of the price charged in this band
    pub taxable: Decimal,
    pub duty: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationResult {
    /// Name of the rate table used
    pub table: &'static str,
    /// Exact amount owed, unrounded
    pub duty_owed: Decimal,
    pub breakdown: Vec<BandCharge>,
}

impl CalculationResult {
    /// Duty as a fraction of the price
    pub fn effective_rate(&self, price: Decimal) -> Decimal {
        if price.is_zero() {
            Decimal::ZERO
        } else {
            self.duty_owed / price
        }
    }
}

/// Calculate the duty owed for a purchase.
///
/// Prices below the zero-rate band's upper bound pay nothing, except additional
/// properties priced from [`ADDITIONAL_PAY_FROM_THRESHOLD`] which pay the surcharge
/// on the whole price. Above it each band is charged its marginal rate plus the
/// surcharge, and the surcharge is also charged across the whole zero-rate band.
/// A price equal to a band's upper bound fully consumes that band.
pub fn compute_duty(input: &CalculationInput) -> Result<CalculationResult, DutyError> {
    if input.price.is_sign_negative() && !input.price.is_zero() {
        return Err(DutyError::NegativePrice(input.price));
    }

    let config = RegionConfig::for_input(input.region, input.additional_property);
    let surcharge = if input.additional_property {
        config.surcharge_rate
    } else {
        Decimal::ZERO
    };
    let price = input.price;
    let zero_band_upper = config.zero_band_upper();

    let mut breakdown = Vec::new();

    if price < zero_band_upper {
        if input.additional_property && price >= ADDITIONAL_PAY_FROM_THRESHOLD {
            breakdown.push(BandCharge {
                lower: Decimal::ZERO,
                upper: Some(zero_band_upper),
                rate: Decimal::ZERO,
                surcharge,
                taxable: price,
                duty: price * surcharge,
            });
        }
        return Ok(finish(config, price, breakdown));
    }

    for (index, band) in config.bands.iter().enumerate().skip(1) {
        let lower = config.lower_bound(index);
        let rate = band.rate + surcharge;
        match band.upper {
            Some(upper) if price >= upper => {
                let taxable = upper - lower;
                breakdown.push(BandCharge {
                    lower,
                    upper: band.upper,
                    rate: band.rate,
                    surcharge,
                    taxable,
                    duty: taxable * rate,
                });
            }
            _ => {
                let taxable = price - lower;
                breakdown.push(BandCharge {
                    lower,
                    upper: band.upper,
                    rate: band.rate,
                    surcharge,
                    taxable,
                    duty: taxable * rate,
                });
                break;
            }
        }
    }

    if !surcharge.is_zero() {
        breakdown.insert(
            0,
            BandCharge {
                lower: Decimal::ZERO,
                upper: Some(zero_band_upper),
                rate: Decimal::ZERO,
                surcharge,
                taxable: zero_band_upper,
                duty: zero_band_upper * surcharge,
            },
        );
    }

    Ok(finish(config, price, breakdown))
}

fn finish(config: &RegionConfig, price: Decimal, breakdown: Vec<BandCharge>) -> CalculationResult {
    let duty_owed = breakdown.iter().map(|c| c.duty).sum();
    log::debug!(
        "{}: price {} -> duty {} over {} band(s)",
        config.name,
        price,
        duty_owed,
        breakdown.len()
    );
    CalculationResult {
        table: config.name,
        duty_owed,
        breakdown,
    }
}
