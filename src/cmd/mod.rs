pub mod batch;
pub mod calc;
pub mod rates;
pub mod session;

use crate::tax::{BuyerStatus, Region};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BuyerStatusArg {
    /// First-time buyer
    First,
    /// Not a first-time buyer, sole property
    Sole,
    /// Additional property
    Additional,
}

impl From<BuyerStatusArg> for BuyerStatus {
    fn from(arg: BuyerStatusArg) -> Self {
        match arg {
            BuyerStatusArg::First => BuyerStatus::FirstTime,
            BuyerStatusArg::Sole => BuyerStatus::SoleProperty,
            BuyerStatusArg::Additional => BuyerStatus::Additional,
        }
    }
}

/// Resolve a region name given on the command line or in a file.
/// Unknown names are reported and treated as unset.
pub fn resolve_region(name: Option<&str>) -> Option<Region> {
    let name = name?;
    let region = Region::from_name(name);
    if region.is_none() {
        log::warn!("Unknown region '{}'", name);
    }
    region
}
