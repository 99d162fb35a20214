use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Value of `requestType` that routes a request to the idea generator.
pub const REQUEST_TYPE: &str = "ecommerce-ideas";

pub const IDEA_COUNT: usize = 3;

/// Score band per supplier rank (rank 1 first).
pub const SUPPLIER_SCORE_BANDS: [RangeInclusive<u8>; 3] = [85..=99, 75..=89, 65..=79];

const GENERIC_INDUSTRY: &str = "Luxury";
const GENERIC_NICHE: &str = "Premium Products";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Market {
    NorthAmerica,
    Europe,
    Asia,
    Global,
    /// A value the form does not offer; kept verbatim.
    Other(String),
}

impl Market {
    /// `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match trimmed.to_ascii_lowercase().as_str() {
            "north-america" => Self::NorthAmerica,
            "europe" => Self::Europe,
            "asia" => Self::Asia,
            "global" => Self::Global,
            _ => Self::Other(trimmed.to_string()),
        })
    }

    pub fn code(&self) -> &str {
        match self {
            Self::NorthAmerica => "north-america",
            Self::Europe => "europe",
            Self::Asia => "asia",
            Self::Global => "global",
            Self::Other(raw) => raw,
        }
    }

    /// Human-readable name used inside generated copy.
    pub fn display_name(&self) -> &str {
        match self {
            Self::NorthAmerica => "North America",
            Self::Europe => "Europe",
            Self::Asia => "Asia",
            Self::Global => "global markets",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcommerceRequest {
    pub industries: Vec<String>,
    pub niches: Vec<String>,
    pub market: Market,
}

impl EcommerceRequest {
    /// Stand-in request used when the incoming body cannot be read at all.
    pub fn generic() -> Self {
        Self {
            industries: vec![GENERIC_INDUSTRY.to_string()],
            niches: vec![GENERIC_NICHE.to_string()],
            market: Market::Global,
        }
    }

    /// The `n`th industry, degrading to the closest earlier one.
    pub fn industry(&self, n: usize) -> &str {
        nth_or_previous(&self.industries, n).unwrap_or(GENERIC_INDUSTRY)
    }

    /// The `n`th niche, degrading to the closest earlier one.
    pub fn niche(&self, n: usize) -> &str {
        nth_or_previous(&self.niches, n).unwrap_or(GENERIC_NICHE)
    }
}

fn nth_or_previous(items: &[String], n: usize) -> Option<&str> {
    items
        .get(n)
        .or_else(|| items.last())
        .map(String::as_str)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub name: String,
    pub url: String,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcommerceIdea {
    pub name: String,
    pub niche: String,
    pub supplier_price_range: String,
    pub competitor_price_range: String,
    pub ad_spend: String,
    pub profit_margin: String,
    pub total_profit_margin: String,
    pub features: String,
    pub top_supplier1: Supplier,
    pub top_supplier2: Supplier,
    pub top_supplier3: Supplier,
}

impl EcommerceIdea {
    pub fn suppliers(&self) -> [&Supplier; 3] {
        [&self.top_supplier1, &self.top_supplier2, &self.top_supplier3]
    }
}

/// Draws a confidence score for the supplier at `rank_index` (0-based).
/// Indices past the last band use the lowest band.
pub fn draw_supplier_score<R: Rng>(rank_index: usize, rng: &mut R) -> u8 {
    let band = &SUPPLIER_SCORE_BANDS[rank_index.min(SUPPLIER_SCORE_BANDS.len() - 1)];
    rng.gen_range(band.clone())
}
