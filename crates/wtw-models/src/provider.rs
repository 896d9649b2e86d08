use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::coerce::{coerce_number, non_blank_str};

/// Category of availability. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
    Flatrate,
    Free,
    Ads,
    Rent,
    Buy,
}

impl OfferType {
    /// Every offer type in display order
    pub const ALL: [OfferType; 5] = [
        OfferType::Flatrate,
        OfferType::Free,
        OfferType::Ads,
        OfferType::Rent,
        OfferType::Buy,
    ];

    /// The subset a flat source list can produce (it has no ad-supported tier)
    pub const FLAT: [OfferType; 4] = [
        OfferType::Flatrate,
        OfferType::Free,
        OfferType::Rent,
        OfferType::Buy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferType::Flatrate => "flatrate",
            OfferType::Free => "free",
            OfferType::Ads => "ads",
            OfferType::Rent => "rent",
            OfferType::Buy => "buy",
        }
    }

    /// Section heading shown above a group
    pub fn title(&self) -> &'static str {
        match self {
            OfferType::Flatrate => "Streaming",
            OfferType::Free => "Free",
            OfferType::Ads => "With Ads",
            OfferType::Rent => "Rent",
            OfferType::Buy => "Buy",
        }
    }

    /// Map a flat-source type code (`sub`, `free`, `rent`, `buy`, `purchase`, any case)
    pub fn from_source_type(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "sub" => Some(OfferType::Flatrate),
            "free" => Some(OfferType::Free),
            "rent" => Some(OfferType::Rent),
            "buy" | "purchase" => Some(OfferType::Buy),
            _ => None,
        }
    }
}

impl std::fmt::Display for OfferType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One way to watch a title on one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderOffer {
    pub name: String,
    /// Full logo URL, empty when the source has no logo
    pub logo_path: String,
    pub web_url: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderGroup {
    pub offer_type: OfferType,
    pub offers: Vec<ProviderOffer>,
}

/// Provider name used when the upstream record has none
pub const UNKNOWN_PROVIDER: &str = "Unknown";

/// An entry inside one bucket of a region-grouped response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedOffer {
    pub provider_name: String,
    pub logo_path: String,
}

/// The buckets of a single region, keyed by offer type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionOffers {
    buckets: HashMap<OfferType, Vec<GroupedOffer>>,
}

impl RegionOffers {
    pub fn bucket(&self, offer_type: OfferType) -> &[GroupedOffer] {
        self.buckets.get(&offer_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn with_bucket(mut self, offer_type: OfferType, offers: Vec<GroupedOffer>) -> Self {
        self.buckets.insert(offer_type, offers);
        self
    }

    fn from_value(raw: &Value) -> Self {
        let mut buckets = HashMap::new();
        for offer_type in OfferType::ALL {
            let Some(list) = raw.get(offer_type.as_str()).and_then(Value::as_array) else {
                continue;
            };
            let offers: Vec<GroupedOffer> = list
                .iter()
                .map(|entry| GroupedOffer {
                    provider_name: non_blank_str(entry.get("provider_name"))
                        .unwrap_or(UNKNOWN_PROVIDER)
                        .to_string(),
                    logo_path: non_blank_str(entry.get("logo_path")).unwrap_or_default().to_string(),
                })
                .collect();
            buckets.insert(offer_type, offers);
        }
        Self { buckets }
    }
}

/// Availability grouped by region code, each region holding typed buckets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedAvailability {
    regions: HashMap<String, RegionOffers>,
}

impl GroupedAvailability {
    /// Parse a `{"results": {"US": {"flatrate": [...]}}}` response.
    ///
    /// Returns `None` when `results` is missing or not an object; region codes are upper-cased.
    pub fn from_response(raw: &Value) -> Option<Self> {
        let results = raw.get("results")?.as_object()?;
        let regions = results
            .iter()
            .filter(|(_, entry)| entry.is_object())
            .map(|(code, entry)| (code.to_uppercase(), RegionOffers::from_value(entry)))
            .collect();
        Some(Self { regions })
    }

    pub fn region(&self, code: &str) -> Option<&RegionOffers> {
        self.regions.get(&code.to_uppercase())
    }

    pub fn insert_region(&mut self, code: &str, offers: RegionOffers) {
        self.regions.insert(code.to_uppercase(), offers);
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// One record of a flat source list; each carries its own region and type code
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatSource {
    pub region: String,
    pub source_type: String,
    pub name: String,
    pub web_url: String,
    pub ios_url: String,
    pub android_url: String,
    pub format: String,
    pub price: Option<f64>,
}

impl FlatSource {
    pub fn from_value(raw: &Value) -> Self {
        let text = |key: &str| non_blank_str(raw.get(key)).unwrap_or_default().to_string();
        let price = match raw.get("price") {
            None | Some(Value::Null) => None,
            Some(value) => coerce_number(value),
        };
        Self {
            region: text("region"),
            source_type: text("type"),
            name: text("name"),
            web_url: text("web_url"),
            ios_url: text("ios_url"),
            android_url: text("android_url"),
            format: text("format"),
            price,
        }
    }

    /// Parse a source array; anything other than an array is an empty list
    pub fn list_from_value(raw: &Value) -> Vec<Self> {
        raw.as_array()
            .map(|list| list.iter().filter(|v| v.is_object()).map(Self::from_value).collect())
            .unwrap_or_default()
    }

    /// First non-empty of the web, iOS and Android links
    pub fn link(&self) -> &str {
        [&self.web_url, &self.ios_url, &self.android_url]
            .into_iter()
            .find(|url| !url.is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNKNOWN_PROVIDER
        } else {
            &self.name
        }
    }
}

/// Availability as returned by one of the two upstream schemas
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderSource {
    /// Region-keyed typed buckets
    Grouped(GroupedAvailability),
    /// Individual source records
    Flat(Vec<FlatSource>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Grouped,
    Flat,
}
