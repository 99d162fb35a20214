use bloomzy_core::dispatch::ReportRequest;
use bloomzy_core::domain::ecommerce::SUPPLIER_SCORE_BANDS;
use bloomzy_core::llm::grok::GrokClient;
use bloomzy_core::report::{ReportResponse, ReportService};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn service_answering(template: ResponseTemplate) -> (MockServer, ReportService) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(template)
        .mount(&server)
        .await;

    let timeout = Some(Duration::from_secs(5));
    let client = GrokClient::with_config("xai-test", server.uri(), "grok-1", timeout).unwrap();
    (server, ReportService::new(Arc::new(client)))
}

fn completion(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"choices": [{"text": text}]}))
}

#[tokio::test]
async fn ecommerce_fallback_on_upstream_error() {
    let (_server, service) = service_answering(ResponseTemplate::new(500)).await;
    let request = ReportRequest::from_body(json!({
        "requestType": "ecommerce-ideas",
        "industries": ["Fashion"],
        "niches": ["eco-friendly bags"],
        "market": "europe"
    }))
    .unwrap();

    let out = service.generate(&request).await;
    assert!(out.is_degraded());

    let body = serde_json::to_value(&out.report).unwrap();
    let ideas = body.as_array().unwrap();
    assert_eq!(ideas.len(), 3);

    let name = ideas[0]["name"].as_str().unwrap();
    assert!(name.contains("eco-friendly bags") && name.contains("Fashion"));
    for idea in ideas {
        let score = idea["topSupplier1"]["score"].as_u64().unwrap() as u8;
        assert!(SUPPLIER_SCORE_BANDS[0].contains(&score));
    }
}

#[tokio::test]
async fn time_audit_fallback_on_upstream_error() {
    let (_server, service) = service_answering(ResponseTemplate::new(502)).await;
    let request = ReportRequest::from_body(json!({
        "formData": {
            "top_priorities": ["Meetings"],
            "time_wasters": [],
            "personal_habits": [],
            "environmental_factors": []
        }
    }))
    .unwrap();

    let out = service.generate(&request).await;
    assert!(out.is_degraded());
    let ReportResponse::TimeAudit(report) = out.report else {
        panic!("expected a time audit report");
    };
    assert_eq!(report.action_steps[0].title, "Optimize Meeting Time");
    assert_eq!(report.solutions.len(), 5);
    assert_eq!(report.quick_wins.len(), 4);
    assert_eq!(report.simple_ways.len(), 4);
}

#[tokio::test]
async fn missing_choices_still_yields_full_report() {
    let empty = ResponseTemplate::new(200).set_body_json(json!({"object": "text_completion"}));
    let (_server, service) = service_answering(empty).await;

    let out = service
        .generate(&ReportRequest::from_body(json!({"formData": {}})).unwrap())
        .await;
    assert!(out.is_degraded());
    let body = serde_json::to_value(&out.report).unwrap();
    assert_eq!(body["actionSteps"].as_array().unwrap().len(), 3);
    assert_eq!(body["solutions"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn prose_wrapped_audit_json_is_used() {
    let text = "Sure! Here is the report you asked for.\n\n{\"actionSteps\": [\
{\"title\": \"Guard Mornings\", \"description\": \"No meetings before 11.\"}], \
\"solutions\": [\"a\", \"b\"], \"quickWins\": [\"c\"], \"simpleWays\": [\"d\"]}\n\nLet me know!";
    let (_server, service) = service_answering(completion(text)).await;

    let request =
        ReportRequest::from_body(json!({"formData": {"top_priorities": ["Emails"]}})).unwrap();
    let out = service.generate(&request).await;
    assert!(!out.is_degraded());
    let ReportResponse::TimeAudit(report) = out.report else {
        panic!("expected a time audit report");
    };
    assert_eq!(report.action_steps[0].title, "Guard Mornings");
    // Counts from the model are trusted as-is.
    assert_eq!(report.solutions, vec!["a", "b"]);
}

#[tokio::test]
async fn model_ideas_get_banded_scores() {
    let text = "```json\n[\
{\"name\": \"Cork Tote\", \"niche\": \"Vegan commuters\", \
\"topSupplier1\": {\"name\": \"A\", \"url\": \"https://a.example\", \"score\": 12}, \
\"topSupplier2\": {\"name\": \"B\", \"url\": \"https://b.example\"}, \
\"topSupplier3\": {\"name\": \"C\", \"url\": \"https://c.example\"}}\
]\n```";
    let (_server, service) = service_answering(completion(text)).await;
    let request = ReportRequest::from_body(json!({
        "requestType": "ecommerce-ideas",
        "industries": ["Fashion"],
        "niches": ["bags"],
        "market": "global"
    }))
    .unwrap();

    let out = service.generate(&request).await;
    assert!(!out.is_degraded());
    let ReportResponse::Ecommerce(ideas) = out.report else {
        panic!("expected ideas");
    };
    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0].niche, "Vegan commuters");
    for (supplier, band) in ideas[0].suppliers().iter().zip(SUPPLIER_SCORE_BANDS.iter()) {
        assert!(band.contains(&supplier.score));
    }
}

#[tokio::test]
async fn broken_outer_payload_falls_back_even_with_valid_inner_json() {
    let text = "[{\"name\": \"Cork Tote\", \"variants\": [{\"color\": \"red\"}]},]";
    let (_server, service) = service_answering(completion(text)).await;
    let request = ReportRequest::from_body(json!({
        "requestType": "ecommerce-ideas",
        "industries": ["Fashion"],
        "niches": ["bags"],
        "market": "global"
    }))
    .unwrap();

    let out = service.generate(&request).await;
    assert!(out.is_degraded());
    let msg = format!("{:#}", out.fallback.as_ref().unwrap());
    assert!(msg.contains("no usable JSON"), "{msg}");
    let ReportResponse::Ecommerce(ideas) = out.report else {
        panic!("expected ideas");
    };
    assert_eq!(ideas.len(), 3);
}
