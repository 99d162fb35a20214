use anyhow::Context;
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bloomzy_core::config::Settings;
use bloomzy_core::dispatch::ReportRequest;
use bloomzy_core::llm::grok::GrokClient;
use bloomzy_core::report::{Generated, ReportResponse, ReportService};

#[derive(Debug, Parser)]
#[command(name = "bloomzy_cli")]
struct Args {
    /// Request body as JSON, the same shape the HTTP endpoint accepts. `-` reads stdin.
    #[arg(long, default_value = "-")]
    input: PathBuf,

    /// Skip the completion API and print the contingency report.
    #[arg(long)]
    offline: bool,

    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let raw = read_input(&args.input)?;
    let out = match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(body) => generate(body, &args, &settings).await?,
        Err(err) => {
            tracing::warn!(error = %err, "input is not JSON; printing generic ideas");
            ReportService::unreadable_body(err)
        }
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&out.report)?
    } else {
        serde_json::to_string(&out.report)?
    };
    println!("{rendered}");
    tracing::info!(source = out.source(), "done");

    Ok(())
}

async fn generate(
    body: serde_json::Value,
    args: &Args,
    settings: &Settings,
) -> anyhow::Result<Generated<ReportResponse>> {
    let request = match ReportRequest::from_body(body) {
        Ok(request) => request,
        Err(err) => {
            let out = serde_json::json!({ "error": err.to_string() });
            println!("{out}");
            anyhow::bail!("request rejected: {err}");
        }
    };

    let service = if args.offline {
        ReportService::offline()
    } else {
        ReportService::new(Arc::new(GrokClient::from_settings(settings)?))
    };

    tracing::info!(
        kind = request.kind().as_str(),
        offline = args.offline,
        "generating report"
    );
    let out = service.generate(&request).await;
    if let Some(err) = &out.fallback {
        if service.has_llm() {
            sentry_anyhow::capture_anyhow(err);
            tracing::error!(
                error = %format!("{err:#}"),
                "completion failed; printed contingency report"
            );
        }
    }
    Ok(out)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
