use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Jurisdiction the property is bought in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    #[default]
    England,
    Scotland,
    Wales,
    NorthernIreland,
}

impl Region {
    /// Lenient lookup used at input boundaries. Unrecognised names yield `None`.
    pub fn from_name(s: &str) -> Option<Region> {
        match s.trim().to_lowercase().as_str() {
            "england" => Some(Region::England),
            "scotland" => Some(Region::Scotland),
            "wales" => Some(Region::Wales),
            "northern-ireland" | "northern ireland" | "northern_ireland" | "ni" => {
                Some(Region::NorthernIreland)
            }
            _ => None,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Region::England => "England",
            Region::Scotland => "Scotland",
            Region::Wales => "Wales",
            Region::NorthernIreland => "Northern Ireland",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Deserialize an optional region, mapping unknown names to `None` instead of failing.
pub fn deserialize_region_lenient<'de, D>(deserializer: D) -> Result<Option<Region>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Region::from_name))
}

/// Buyer classification chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BuyerStatus {
    /// First-time buyer, never pays the additional property surcharge
    #[serde(alias = "first")]
    FirstTime,
    /// Not a first-time buyer, replacing their only home
    #[serde(alias = "sole")]
    SoleProperty,
    /// Buying an additional (non-primary) property
    Additional,
}

impl BuyerStatus {
    pub fn from_name(s: &str) -> Option<BuyerStatus> {
        match s.trim().to_lowercase().as_str() {
            "first" | "first-time" | "first_time" | "firsttime" => Some(BuyerStatus::FirstTime),
            "sole" | "sole-property" | "sole_property" => Some(BuyerStatus::SoleProperty),
            "additional" => Some(BuyerStatus::Additional),
            _ => None,
        }
    }

    pub fn is_additional_property(&self) -> bool {
        matches!(self, BuyerStatus::Additional)
    }

    pub fn display(&self) -> &'static str {
        match self {
            BuyerStatus::FirstTime => "First time buyer",
            BuyerStatus::SoleProperty => "Sole property",
            BuyerStatus::Additional => "Additional property",
        }
    }
}

impl std::fmt::Display for BuyerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
