//! Orders e-commerce ideas best-first by a weighted 0-100 score.
//!
//! Profit and supplier quality come from the idea itself. Demand, competition
//! and trend are coarse industry/market heuristics, so within one request they
//! shift every idea equally and the order is decided by the first two.

use crate::domain::ecommerce::{EcommerceIdea, EcommerceRequest, Market, Supplier};

pub const PROFIT_WEIGHT: f64 = 0.35;
pub const SUPPLIER_WEIGHT: f64 = 0.25;
pub const DEMAND_WEIGHT: f64 = 0.20;
pub const COMPETITION_WEIGHT: f64 = 0.10;
pub const TREND_WEIGHT: f64 = 0.10;

const HIGH_DEMAND: &[&str] = &["technology", "fitness & wellness", "home & garden"];
const MEDIUM_DEMAND: &[&str] = &["fashion", "food and beverage", "travel & leisure"];
const HIGH_COMPETITION: &[&str] = &["fashion", "technology"];
const MEDIUM_COMPETITION: &[&str] = &["home & garden", "food and beverage"];
const TRENDING: &[&str] = &["fitness & wellness", "technology", "arts & crafts"];
const DECLINING: &[&str] = &["collectibles"];

/// Midpoint of a price range such as `"$1000 - $2000"` or `"$1,500"`.
/// The first two numbers are averaged; a single number is returned as is.
pub fn price_range_midpoint(range: &str) -> Option<f64> {
    let mut numbers = Vec::with_capacity(2);
    let mut current = String::new();
    for c in range.chars().chain(std::iter::once(' ')) {
        match c {
            '0'..='9' | '.' => current.push(c),
            ',' if !current.is_empty() => {}
            _ => {
                if let Ok(n) = current.trim_end_matches('.').parse::<f64>() {
                    numbers.push(n);
                }
                current.clear();
                if numbers.len() == 2 {
                    break;
                }
            }
        }
    }
    match numbers.as_slice() {
        [low, high] => Some((low + high) / 2.0),
        [single] => Some(*single),
        _ => None,
    }
}

/// Logistic in the margin: 0.5 at a 30% margin, about 0.88 at 50%.
pub fn profit_score(supplier_price: f64, market_price: f64) -> f64 {
    if supplier_price <= 0.0 || market_price <= 0.0 {
        return 0.0;
    }
    let margin = (market_price - supplier_price) / market_price;
    (1.0 / (1.0 + (-10.0 * (margin - 0.3)).exp())).clamp(0.0, 1.0)
}

/// Mean supplier score scaled to 0..=1.
pub fn supplier_score(suppliers: &[&Supplier]) -> f64 {
    if suppliers.is_empty() {
        return 0.0;
    }
    let total: f64 = suppliers.iter().map(|s| f64::from(s.score)).sum();
    (total / (suppliers.len() as f64 * 100.0)).clamp(0.0, 1.0)
}

fn demand_score(industry: &str, market: &Market) -> f64 {
    let base: f64 = if HIGH_DEMAND.contains(&industry) {
        0.75
    } else if MEDIUM_DEMAND.contains(&industry) {
        0.55
    } else {
        0.4
    };
    let multiplier = match market {
        Market::NorthAmerica => 1.2,
        Market::Europe => 1.1,
        Market::Asia => 1.15,
        Market::Global | Market::Other(_) => 1.0,
    };
    (base * multiplier).min(1.0)
}

/// Higher means less crowded.
fn competition_score(industry: &str) -> f64 {
    if HIGH_COMPETITION.contains(&industry) {
        0.35
    } else if MEDIUM_COMPETITION.contains(&industry) {
        0.55
    } else {
        0.75
    }
}

fn trend_score(industry: &str) -> f64 {
    if TRENDING.iter().any(|t| industry.contains(t)) {
        0.75
    } else if DECLINING.iter().any(|t| industry.contains(t)) {
        0.25
    } else {
        0.5
    }
}

/// Weighted score on a 0-100 scale. Unreadable price ranges score zero profit.
pub fn score_idea(idea: &EcommerceIdea, industry: &str, market: &Market) -> f64 {
    let industry = industry.trim().to_lowercase();
    let supplier_price = price_range_midpoint(&idea.supplier_price_range).unwrap_or(0.0);
    let market_price = price_range_midpoint(&idea.competitor_price_range).unwrap_or(0.0);

    let total = profit_score(supplier_price, market_price) * PROFIT_WEIGHT
        + supplier_score(&idea.suppliers()) * SUPPLIER_WEIGHT
        + demand_score(&industry, market) * DEMAND_WEIGHT
        + competition_score(&industry) * COMPETITION_WEIGHT
        + trend_score(&industry) * TREND_WEIGHT;
    total * 100.0
}

/// Sorts `ideas` best-first. Ties keep their incoming order.
pub fn rank_ideas(ideas: Vec<EcommerceIdea>, request: &EcommerceRequest) -> Vec<EcommerceIdea> {
    let industry = request.industry(0);
    let mut scored: Vec<(f64, EcommerceIdea)> = ideas
        .into_iter()
        .map(|idea| {
            let score = score_idea(&idea, industry, &request.market);
            tracing::debug!(name = %idea.name, score, "scored idea");
            (score, idea)
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    tracing::debug!(count = scored.len(), "ranked ideas");
    scored.into_iter().map(|(_, idea)| idea).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier(score: u8) -> Supplier {
        Supplier {
            name: "S".to_string(),
            url: "https://s.example".to_string(),
            score,
        }
    }

    fn idea(
        name: &str,
        supplier_price: &str,
        competitor_price: &str,
        scores: [u8; 3],
    ) -> EcommerceIdea {
        EcommerceIdea {
            name: name.to_string(),
            niche: "n".to_string(),
            supplier_price_range: supplier_price.to_string(),
            competitor_price_range: competitor_price.to_string(),
            ad_spend: "$50 - $100".to_string(),
            profit_margin: "$1500".to_string(),
            total_profit_margin: "$1400".to_string(),
            features: "f".to_string(),
            top_supplier1: supplier(scores[0]),
            top_supplier2: supplier(scores[1]),
            top_supplier3: supplier(scores[2]),
        }
    }

    fn request() -> EcommerceRequest {
        EcommerceRequest {
            industries: vec!["Technology".to_string()],
            niches: vec!["audio".to_string()],
            market: Market::Global,
        }
    }

    #[test]
    fn midpoint_of_common_range_formats() {
        assert_eq!(price_range_midpoint("$1000 - $2000"), Some(1500.0));
        assert_eq!(price_range_midpoint("$80-$120"), Some(100.0));
        assert_eq!(price_range_midpoint("$1,000 - $3,000"), Some(2000.0));
        assert_eq!(price_range_midpoint("$12.50 - $17.50 per unit"), Some(15.0));
        assert_eq!(price_range_midpoint("$1500"), Some(1500.0));
        assert_eq!(price_range_midpoint("around $40."), Some(40.0));
        assert_eq!(price_range_midpoint("varies"), None);
        assert_eq!(price_range_midpoint(""), None);
    }

    #[test]
    fn profit_score_is_logistic_in_margin() {
        assert!((profit_score(700.0, 1000.0) - 0.5).abs() < 1e-9);
        assert!(profit_score(1000.0, 2000.0) > 0.85);
        assert_eq!(profit_score(0.0, 100.0), 0.0);
        assert_eq!(profit_score(100.0, 0.0), 0.0);
    }

    #[test]
    fn supplier_score_averages_to_unit_range() {
        let s = [supplier(90), supplier(80), supplier(70)];
        let refs: Vec<&Supplier> = s.iter().collect();
        assert!((supplier_score(&refs) - 0.8).abs() < 1e-9);
        assert_eq!(supplier_score(&[]), 0.0);
    }

    #[test]
    fn score_stays_within_scale() {
        let best = idea("best", "$10 - $20", "$1000 - $2000", [99, 99, 99]);
        let worst = idea("worst", "n/a", "n/a", [0, 0, 0]);
        for i in [&best, &worst] {
            let s = score_idea(i, "Technology", &Market::NorthAmerica);
            assert!((0.0..=100.0).contains(&s), "{s}");
        }
    }

    #[test]
    fn ranks_best_margin_first() {
        let ideas = vec![
            idea("thin", "$900 - $1000", "$1000 - $1100", [90, 80, 70]),
            idea("fat", "$100 - $200", "$1000 - $2000", [90, 80, 70]),
            idea("middle", "$600 - $800", "$1000 - $1200", [90, 80, 70]),
        ];
        let ranked = rank_ideas(ideas, &request());
        let names: Vec<&str> = ranked.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["fat", "middle", "thin"]);
    }

    #[test]
    fn supplier_quality_breaks_equal_margins() {
        let ideas = vec![
            idea("weak", "$500 - $500", "$1000 - $1000", [65, 65, 65]),
            idea("strong", "$500 - $500", "$1000 - $1000", [99, 89, 79]),
        ];
        let ranked = rank_ideas(ideas, &request());
        assert_eq!(ranked[0].name, "strong");
    }

    #[test]
    fn equal_scores_keep_incoming_order() {
        let ideas = vec![
            idea("a", "$1", "$2", [80, 80, 80]),
            idea("b", "$1", "$2", [80, 80, 80]),
        ];
        let ranked = rank_ideas(ideas, &request());
        assert_eq!(ranked[0].name, "a");
        assert_eq!(ranked[1].name, "b");
    }
}
