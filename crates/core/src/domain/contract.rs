//! Shapes the completion model is asked to produce, and their conversion into
//! the response types.

use crate::domain::audit::TimeAuditReport;
use crate::domain::ecommerce::{draw_supplier_score, EcommerceIdea, EcommerceRequest, Supplier};
use crate::domain::lenient;
use anyhow::{ensure, Context};
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_SUPPLIERS: [(&str, &str); 3] = [
    ("Premium Supplier Inc.", "https://alibaba.com"),
    ("Quality Manufacturer Co.", "https://globalsources.com"),
    ("Reliable Trading Ltd.", "https://made-in-china.com"),
];

/// Decodes the audit object. Section counts are trusted as given; a missing
/// or mistyped section is an error.
pub fn decode_time_audit(value: Value) -> anyhow::Result<TimeAuditReport> {
    serde_json::from_value::<TimeAuditReport>(value)
        .context("model output does not match the time audit report schema")
}

pub fn decode_ideas(value: Value) -> anyhow::Result<Vec<LlmEcommerceIdea>> {
    let Value::Array(items) = value else {
        anyhow::bail!("model output is not a JSON array of ideas");
    };
    ensure!(!items.is_empty(), "model output contains no ideas");

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            ensure!(item.is_object(), "idea {i} is not a JSON object");
            serde_json::from_value::<LlmEcommerceIdea>(item)
                .with_context(|| format!("failed to decode idea {i}"))
        })
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmEcommerceIdea {
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub niche: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub supplier_price_range: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub competitor_price_range: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub ad_spend: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub profit_margin: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub total_profit_margin: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub features: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional_object")]
    pub top_supplier1: Option<LlmSupplier>,
    #[serde(default, deserialize_with = "lenient::optional_object")]
    pub top_supplier2: Option<LlmSupplier>,
    #[serde(default, deserialize_with = "lenient::optional_object")]
    pub top_supplier3: Option<LlmSupplier>,

    // Flat variant some completions use instead of nested objects.
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub supplier1name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub supplier1url: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub supplier2name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub supplier2url: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub supplier3name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub supplier3url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmSupplier {
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub url: Option<String>,
}

impl LlmEcommerceIdea {
    /// Fills gaps with stock copy and attaches freshly drawn supplier scores.
    /// Any score the model supplied is ignored.
    pub fn annotate<R: Rng>(self, request: &EcommerceRequest, rng: &mut R) -> EcommerceIdea {
        let industry = request.industry(0);
        let niche = request.niche(0);

        let nested = [self.top_supplier1, self.top_supplier2, self.top_supplier3];
        let flat = [
            (self.supplier1name, self.supplier1url),
            (self.supplier2name, self.supplier2url),
            (self.supplier3name, self.supplier3url),
        ];
        let [s1, s2, s3] = build_suppliers(nested, flat, rng);

        EcommerceIdea {
            name: self
                .name
                .unwrap_or_else(|| format!("Premium {niche} Product")),
            niche: self
                .niche
                .unwrap_or_else(|| format!("{industry} enthusiasts")),
            supplier_price_range: self
                .supplier_price_range
                .unwrap_or_else(|| "$1000 - $2000".to_string()),
            competitor_price_range: self
                .competitor_price_range
                .unwrap_or_else(|| "$2500 - $3500".to_string()),
            ad_spend: self.ad_spend.unwrap_or_else(|| "$50 - $100".to_string()),
            profit_margin: self.profit_margin.unwrap_or_else(|| "$1500".to_string()),
            total_profit_margin: self
                .total_profit_margin
                .unwrap_or_else(|| "$1400 - $1450".to_string()),
            features: self
                .features
                .unwrap_or_else(|| format!("High-quality product for {industry} enthusiasts.")),
            top_supplier1: s1,
            top_supplier2: s2,
            top_supplier3: s3,
        }
    }
}

/// The supplier annotator for the model path.
pub fn annotate_ideas<R: Rng>(
    ideas: Vec<LlmEcommerceIdea>,
    request: &EcommerceRequest,
    rng: &mut R,
) -> Vec<EcommerceIdea> {
    ideas
        .into_iter()
        .map(|idea| idea.annotate(request, rng))
        .collect()
}

fn build_suppliers<R: Rng>(
    nested: [Option<LlmSupplier>; 3],
    flat: [(Option<String>, Option<String>); 3],
    rng: &mut R,
) -> [Supplier; 3] {
    let mut sources = nested.into_iter().zip(flat);
    std::array::from_fn(|rank| {
        let (nested, (flat_name, flat_url)) = sources.next().unwrap_or_default();
        let nested = nested.unwrap_or_default();
        let (default_name, default_url) = DEFAULT_SUPPLIERS[rank];
        Supplier {
            name: nested
                .name
                .or(flat_name)
                .unwrap_or_else(|| default_name.to_string()),
            url: nested
                .url
                .or(flat_url)
                .unwrap_or_else(|| default_url.to_string()),
            score: draw_supplier_score(rank, rng),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ecommerce::{Market, SUPPLIER_SCORE_BANDS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn request() -> EcommerceRequest {
        EcommerceRequest {
            industries: vec!["Fashion".to_string()],
            niches: vec!["eco-friendly bags".to_string()],
            market: Market::Europe,
        }
    }

    #[test]
    fn decode_time_audit_requires_all_sections() {
        let ok = json!({
            "actionSteps": [{"title": "a", "description": "b"}],
            "solutions": ["s"],
            "quickWins": ["q"],
            "simpleWays": ["w"]
        });
        let report = decode_time_audit(ok).unwrap();
        assert_eq!(report.action_steps.len(), 1);

        let missing = json!({"actionSteps": [], "solutions": []});
        assert!(decode_time_audit(missing).is_err());
    }

    #[test]
    fn decode_ideas_rejects_non_arrays_and_non_objects() {
        assert!(decode_ideas(json!({"name": "x"})).is_err());
        assert!(decode_ideas(json!([])).is_err());
        assert!(decode_ideas(json!([{"name": "x"}, "oops"])).is_err());
    }

    #[test]
    fn annotate_prefers_nested_then_flat_then_default_suppliers() {
        let ideas = decode_ideas(json!([{
            "name": "Cork Tote",
            "profitMargin": 1200,
            "topSupplier1": {"name": "Nested Co", "url": "https://nested.example", "score": 3},
            "supplier1name": "Flat One",
            "supplier2name": "Flat Two",
            "supplier2url": "https://flat.example"
        }]))
        .unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let out = annotate_ideas(ideas, &request(), &mut rng);
        assert_eq!(out.len(), 1);
        let idea = &out[0];

        assert_eq!(idea.name, "Cork Tote");
        assert_eq!(idea.profit_margin, "1200");
        assert_eq!(idea.niche, "Fashion enthusiasts");
        assert_eq!(idea.top_supplier1.name, "Nested Co");
        assert_eq!(idea.top_supplier2.name, "Flat Two");
        assert_eq!(idea.top_supplier2.url, "https://flat.example");
        assert_eq!(idea.top_supplier3.name, "Reliable Trading Ltd.");
        assert_eq!(idea.top_supplier3.url, "https://made-in-china.com");

        for (supplier, band) in idea.suppliers().iter().zip(SUPPLIER_SCORE_BANDS.iter()) {
            assert!(band.contains(&supplier.score), "score {} outside {band:?}", supplier.score);
        }
    }

    #[test]
    fn annotate_fills_missing_fields_from_request() {
        let mut rng = StdRng::seed_from_u64(2);
        let idea = LlmEcommerceIdea::default().annotate(&request(), &mut rng);
        assert_eq!(idea.name, "Premium eco-friendly bags Product");
        assert_eq!(idea.features, "High-quality product for Fashion enthusiasts.");
        assert_eq!(idea.supplier_price_range, "$1000 - $2000");
    }
}
