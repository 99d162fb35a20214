use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use bloomzy_core::dispatch::ReportRequest;
use bloomzy_core::llm::grok::GrokClient;
use bloomzy_core::report::{Generated, ReportResponse, ReportService};

/// `model` or `contingency`. The body shape is the same either way.
const REPORT_SOURCE: HeaderName = HeaderName::from_static("x-report-source");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = bloomzy_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let reports = match GrokClient::from_settings(&settings) {
        Ok(client) => {
            tracing::info!(model = client.model(), "completion client ready");
            ReportService::new(Arc::new(client))
        }
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(
                error = %e,
                "completion client unavailable; serving contingency reports only"
            );
            ReportService::offline()
        }
    };

    let app = router(AppState { reports });

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Clone)]
struct AppState {
    reports: ReportService,
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
        .expose_headers([REPORT_SOURCE]);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/generate-time-audit-report", post(generate_report))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn generate_report(State(state): State<AppState>, body: Bytes) -> Response {
    let span = tracing::info_span!(
        "report",
        request_id = %Uuid::new_v4(),
        kind = tracing::field::Empty
    );
    handle_report(&state.reports, body).instrument(span).await
}

async fn handle_report(reports: &ReportService, body: Bytes) -> Response {
    tracing::debug!(body = %String::from_utf8_lossy(&body), "report request received");

    let value = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "request body is not JSON; answering with generic ideas");
            return report_response(ReportService::unreadable_body(err));
        }
    };

    let request = match ReportRequest::from_body(value) {
        Ok(request) => request,
        Err(err) => {
            tracing::info!(error = %err, "rejected report request");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response();
        }
    };
    tracing::Span::current().record("kind", request.kind().as_str());

    let out = reports.generate(&request).await;
    if let Some(err) = &out.fallback {
        if reports.has_llm() {
            sentry_anyhow::capture_anyhow(err);
        }
    }
    tracing::info!(source = out.source(), "report generated");
    report_response(out)
}

fn report_response(out: Generated<ReportResponse>) -> Response {
    (
        StatusCode::OK,
        [(REPORT_SOURCE, out.source())],
        Json(out.report),
    )
        .into_response()
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &bloomzy_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState {
            reports: ReportService::offline(),
        })
    }

    fn post_json(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/generate-time-audit-report")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn json_body(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn empty_ecommerce_request_is_a_400() {
        let body = json!({
            "requestType": "ecommerce-ideas",
            "industries": [],
            "niches": [],
            "market": ""
        });
        let res = app().oneshot(post_json(body.to_string())).await.unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(res).await,
            json!({ "error": "Missing required fields" })
        );
    }

    #[tokio::test]
    async fn preflight_allows_any_origin() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/generate-time-audit-report")
            .header(header::ORIGIN, "https://app.bloomzy.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,apikey")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let allowed = res.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(allowed.contains("apikey"), "{allowed}");
        assert!(allowed.contains("x-client-info"), "{allowed}");
    }

    #[tokio::test]
    async fn offline_ecommerce_is_flagged_as_contingency() {
        let body = json!({
            "requestType": "ecommerce-ideas",
            "industries": ["Fashion"],
            "niches": ["eco-friendly bags"],
            "market": "europe"
        });
        let res = app().oneshot(post_json(body.to_string())).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[&REPORT_SOURCE], "contingency");
        let ideas = json_body(res).await;
        let ideas = ideas.as_array().unwrap();
        assert_eq!(ideas.len(), 3);
        assert!(ideas[0]["name"].as_str().unwrap().contains("Fashion"));
    }

    #[tokio::test]
    async fn invalid_json_gets_generic_ideas() {
        let res = app().oneshot(post_json("{not json")).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let ideas = json_body(res).await;
        assert_eq!(ideas.as_array().unwrap().len(), 3);
        assert_eq!(
            ideas[0]["name"],
            "Premium Premium Products Luxury Collection"
        );
    }

    #[tokio::test]
    async fn time_audit_answers_with_full_report() {
        let body = json!({
            "formData": {
                "top_priorities": ["Meetings"],
                "time_wasters": [],
                "personal_habits": [],
                "environmental_factors": []
            }
        });
        let res = app().oneshot(post_json(body.to_string())).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let report = json_body(res).await;
        assert_eq!(report["actionSteps"][0]["title"], "Optimize Meeting Time");
        assert_eq!(report["actionSteps"].as_array().unwrap().len(), 3);
        assert_eq!(report["solutions"].as_array().unwrap().len(), 5);
        assert_eq!(report["quickWins"].as_array().unwrap().len(), 4);
        assert_eq!(report["simpleWays"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let req = Request::builder()
            .uri("/healthz")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
