use crate::domain::ecommerce::{
    draw_supplier_score, EcommerceIdea, EcommerceRequest, Market, Supplier,
};
use rand::Rng;

/// Fixed price copy per idea slot:
/// (supplier price, competitor price, ad spend, margin, margin after ads).
const PRICING: [[&str; 5]; 3] = [
    ["$1000 - $2000", "$2500 - $3500", "$50 - $100", "$1500", "$1400 - $1450"],
    ["$3000 - $4000", "$4500 - $5500", "$75 - $150", "$1500", "$1350 - $1425"],
    ["$5000 - $6000", "$6500 - $7500", "$100 - $200", "$1500", "$1300 - $1400"],
];

const SUPPLIERS: [[(&str, &str); 3]; 3] = [
    [
        ("Top Quality Suppliers Inc.", "https://example.com/supplier1"),
        ("Premium Materials Co.", "https://example.com/supplier2"),
        ("Luxury Components Ltd.", "https://example.com/supplier3"),
    ],
    [
        ("Artisan Crafters Co.", "https://example.com/supplier4"),
        ("Custom Works Manufacturing", "https://example.com/supplier5"),
        ("Bespoke Solutions Group", "https://example.com/supplier6"),
    ],
    [
        ("Luxury Manufacturing Ltd.", "https://example.com/supplier7"),
        ("Elite Components International", "https://example.com/supplier8"),
        ("Premium Sourcing Partners", "https://example.com/supplier9"),
    ],
];

/// Three template ideas built from the request. Never fails; missing
/// industries or niches degrade to earlier ones. Only supplier scores vary
/// between calls.
pub fn ecommerce_contingency<R: Rng>(
    request: &EcommerceRequest,
    rng: &mut R,
) -> Vec<EcommerceIdea> {
    let industry = request.industry(0);
    let second_industry = request.industry(1);
    let niche = request.niche(0);
    let second_niche = request.niche(1);
    let third_niche = request.niche(2);
    let market = match &request.market {
        Market::Global => "global markets",
        other => other.code(),
    };

    let copy = [
        (
            format!("Premium {niche} {industry} Collection"),
            format!("Luxury {niche} enthusiasts in {market}"),
            format!(
                "High-end {niche} focused {industry} products designed for {niche} enthusiasts. \
Targets affluent consumers looking for premium quality and exclusivity."
            ),
        ),
        (
            format!("Bespoke {industry} Solutions"),
            format!("Custom {second_niche} for discerning clients"),
            format!(
                "Customizable {industry} products with an emphasis on {second_niche}, for the segment \
that values personalization and unique offerings."
            ),
        ),
        (
            format!("Exclusive {second_industry} {third_niche}"),
            format!("Premium {niche} accessories"),
            format!(
                "High-margin {second_industry} products at the intersection of luxury and {third_niche}, \
a distinct value proposition for upscale markets."
            ),
        ),
    ];

    copy.into_iter()
        .enumerate()
        .map(|(slot, (name, niche, features))| {
            let [supplier_price, competitor_price, ad_spend, margin, total_margin] = PRICING[slot];
            let [s1, s2, s3] = suppliers(slot, rng);
            EcommerceIdea {
                name,
                niche,
                supplier_price_range: supplier_price.to_string(),
                competitor_price_range: competitor_price.to_string(),
                ad_spend: ad_spend.to_string(),
                profit_margin: margin.to_string(),
                total_profit_margin: total_margin.to_string(),
                features,
                top_supplier1: s1,
                top_supplier2: s2,
                top_supplier3: s3,
            }
        })
        .collect()
}

fn suppliers<R: Rng>(slot: usize, rng: &mut R) -> [Supplier; 3] {
    std::array::from_fn(|rank| {
        let (name, url) = SUPPLIERS[slot][rank];
        Supplier {
            name: name.to_string(),
            url: url.to_string(),
            score: draw_supplier_score(rank, rng),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ecommerce::{IDEA_COUNT, SUPPLIER_SCORE_BANDS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(industries: &[&str], niches: &[&str], market: Market) -> EcommerceRequest {
        EcommerceRequest {
            industries: industries.iter().map(|s| s.to_string()).collect(),
            niches: niches.iter().map(|s| s.to_string()).collect(),
            market,
        }
    }

    #[test]
    fn single_industry_and_niche() {
        let req = request(&["Fashion"], &["eco-friendly bags"], Market::Europe);
        let mut rng = StdRng::seed_from_u64(42);
        let ideas = ecommerce_contingency(&req, &mut rng);

        assert_eq!(ideas.len(), IDEA_COUNT);
        assert!(ideas[0].name.contains("eco-friendly bags"));
        assert!(ideas[0].name.contains("Fashion"));
        assert_eq!(ideas[0].niche, "Luxury eco-friendly bags enthusiasts in europe");
        assert_eq!(ideas[1].name, "Bespoke Fashion Solutions");
        assert_eq!(ideas[2].name, "Exclusive Fashion eco-friendly bags");
    }

    #[test]
    fn uses_later_industries_and_niches_when_present() {
        let req = request(
            &["Fashion", "Home Decor"],
            &["bags", "candles", "rugs"],
            Market::Global,
        );
        let mut rng = StdRng::seed_from_u64(1);
        let ideas = ecommerce_contingency(&req, &mut rng);

        assert_eq!(ideas[0].niche, "Luxury bags enthusiasts in global markets");
        assert_eq!(ideas[1].niche, "Custom candles for discerning clients");
        assert_eq!(ideas[2].name, "Exclusive Home Decor rugs");
        assert_eq!(ideas[2].niche, "Premium bags accessories");
    }

    #[test]
    fn niche_copy_uses_market_code() {
        let mut rng = StdRng::seed_from_u64(5);
        let na = request(&["Pets"], &["beds"], Market::NorthAmerica);
        let ideas = ecommerce_contingency(&na, &mut rng);
        assert_eq!(ideas[0].niche, "Luxury beds enthusiasts in north-america");

        let other = request(&["Pets"], &["beds"], Market::Other("latam".to_string()));
        let ideas = ecommerce_contingency(&other, &mut rng);
        assert_eq!(ideas[0].niche, "Luxury beds enthusiasts in latam");
    }

    #[test]
    fn every_supplier_score_is_in_its_band() {
        let req = request(&["Fitness"], &["home gyms"], Market::Asia);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            for idea in ecommerce_contingency(&req, &mut rng) {
                for (supplier, band) in idea.suppliers().iter().zip(SUPPLIER_SCORE_BANDS.iter()) {
                    assert!(band.contains(&supplier.score));
                }
            }
        }
    }

    #[test]
    fn copy_is_stable_apart_from_scores() {
        let req = request(&["Pets"], &["orthopedic beds"], Market::NorthAmerica);
        let strip = |ideas: Vec<EcommerceIdea>| -> Vec<(String, String, String)> {
            ideas
                .into_iter()
                .map(|i| (i.name, i.niche, i.features))
                .collect()
        };
        let a = strip(ecommerce_contingency(&req, &mut StdRng::seed_from_u64(1)));
        let b = strip(ecommerce_contingency(&req, &mut StdRng::seed_from_u64(2)));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_request_still_yields_three_ideas() {
        let req = request(&[], &[], Market::Global);
        let ideas = ecommerce_contingency(&req, &mut StdRng::seed_from_u64(3));
        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[0].name, "Premium Premium Products Luxury Collection");
    }
}
