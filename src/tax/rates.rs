use crate::tax::DutyError;
use crate::tax::region::Region;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Price from which an additional property inside the zero-rate band pays the surcharge.
pub const ADDITIONAL_PAY_FROM_THRESHOLD: Decimal = dec!(40000);

/// One progressive band: prices up to (not including) `upper` are charged `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateBand {
    /// `None` marks the final, unbounded band
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

impl RateBand {
    const fn to(upper: Decimal, rate: Decimal) -> Self {
        RateBand {
            upper: Some(upper),
            rate,
        }
    }

    const fn above(rate: Decimal) -> Self {
        RateBand { upper: None, rate }
    }
}

/// Rate table for a region variant
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct RegionConfig {
    pub name: &'static str,
    pub surcharge_rate: Decimal,
    pub bands: &'static [RateBand],
}

pub static ENGLAND_NI: RegionConfig = RegionConfig {
    name: "England / Northern Ireland",
    surcharge_rate: dec!(0.03),
    bands: &[
        RateBand::to(dec!(250000), dec!(0)),
        RateBand::to(dec!(925000), dec!(0.05)),
        RateBand::to(dec!(1500000), dec!(0.10)),
        RateBand::above(dec!(0.12)),
    ],
};

pub static SCOTLAND: RegionConfig = RegionConfig {
    name: "Scotland",
    surcharge_rate: dec!(0.04),
    bands: &[
        RateBand::to(dec!(145000), dec!(0)),
        RateBand::to(dec!(250000), dec!(0.02)),
        RateBand::to(dec!(325000), dec!(0.05)),
        RateBand::to(dec!(750000), dec!(0.10)),
        RateBand::above(dec!(0.12)),
    ],
};

pub static WALES: RegionConfig = RegionConfig {
    name: "Wales",
    surcharge_rate: dec!(0),
    bands: &[
        RateBand::to(dec!(250000), dec!(0)),
        RateBand::to(dec!(400000), dec!(0.05)),
        RateBand::to(dec!(750000), dec!(0.075)),
        RateBand::to(dec!(1500000), dec!(0.10)),
        RateBand::above(dec!(0.12)),
    ],
};

pub static WALES_ADDITIONAL: RegionConfig = RegionConfig {
    name: "Wales (additional property)",
    surcharge_rate: dec!(0.04),
    bands: &[
        RateBand::to(dec!(180000), dec!(0)),
        RateBand::to(dec!(250000), dec!(0.035)),
        RateBand::to(dec!(400000), dec!(0.05)),
        RateBand::to(dec!(750000), dec!(0.075)),
        RateBand::to(dec!(1500000), dec!(0.10)),
        RateBand::above(dec!(0.12)),
    ],
};

/// Every distinct table, in display order
pub static ALL_CONFIGS: [&RegionConfig; 4] = [&ENGLAND_NI, &SCOTLAND, &WALES, &WALES_ADDITIONAL];

impl RegionConfig {
    /// Select the table for a region. England and Northern Ireland share one table,
    /// an unset region falls back to it, and Wales switches tables for additional
    /// properties.
    pub fn for_input(region: Option<Region>, additional_property: bool) -> &'static RegionConfig {
        match region {
            Some(Region::England) | Some(Region::NorthernIreland) => &ENGLAND_NI,
            Some(Region::Scotland) => &SCOTLAND,
            Some(Region::Wales) if additional_property => &WALES_ADDITIONAL,
            Some(Region::Wales) => &WALES,
            None => {
                log::warn!("No region selected, using {} rates", ENGLAND_NI.name);
                &ENGLAND_NI
            }
        }
    }

    /// Upper bound of the zero-rate band
    pub fn zero_band_upper(&self) -> Decimal {
        self.bands
            .first()
            .and_then(|b| b.upper)
            .unwrap_or(Decimal::ZERO)
    }

    /// Lower bound of the band at `index` (the previous band's upper bound)
    pub fn lower_bound(&self, index: usize) -> Decimal {
        match index {
            0 => Decimal::ZERO,
            i => self.bands[i - 1].upper.unwrap_or(Decimal::ZERO),
        }
    }

    /// Check the band layout: a bounded 0% first band, strictly increasing bounds,
    /// and exactly one unbounded band at the end.
    pub fn validate(&self) -> Result<(), DutyError> {
        let invalid = |reason: &str| DutyError::InvalidTable {
            table: self.name,
            reason: reason.to_string(),
        };

        let (last, init) = self
            .bands
            .split_last()
            .ok_or_else(|| invalid("no bands"))?;
        if last.upper.is_some() {
            return Err(invalid("final band must be unbounded"));
        }
        let first = init
            .first()
            .ok_or_else(|| invalid("missing zero-rate band"))?;
        if !first.rate.is_zero() {
            return Err(invalid("first band must be zero-rated"));
        }
        if self.surcharge_rate.is_sign_negative() {
            return Err(invalid("negative surcharge"));
        }

        let mut prev = Decimal::ZERO;
        for band in init {
            let upper = band
                .upper
                .ok_or_else(|| invalid("only the final band may be unbounded"))?;
            if upper <= prev {
                return Err(invalid("band bounds must be strictly increasing"));
            }
            if band.rate.is_sign_negative() {
                return Err(invalid("negative rate"));
            }
            prev = upper;
        }
        Ok(())
    }
}
