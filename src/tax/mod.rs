pub mod duty;
pub mod rates;
pub mod region;

pub use duty::{compute_duty, BandCharge, CalculationInput, CalculationResult, DutyError};
pub use rates::{RegionConfig, ADDITIONAL_PAY_FROM_THRESHOLD, ALL_CONFIGS};
pub use region::{BuyerStatus, Region};
