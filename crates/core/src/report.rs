//! The report pipeline: prompt, one completion call, extraction, decoding,
//! and the contingency fallback when any of those fail. Idea sets are
//! ranked best-first on both paths.

use crate::contingency::audit::time_audit_contingency;
use crate::contingency::ecommerce::ecommerce_contingency;
use crate::dispatch::ReportRequest;
use crate::domain::audit::{AuditSubmission, TimeAuditReport};
use crate::domain::contract;
use crate::domain::ecommerce::{EcommerceIdea, EcommerceRequest};
use crate::llm::json::{extract_payload, PayloadKind};
use crate::llm::{GenerationParams, LlmClient};
use crate::prompt;
use crate::ranking;
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;

/// A report plus where it came from. `fallback` holds the failure that sent
/// the request down the contingency path.
#[derive(Debug)]
pub struct Generated<T> {
    pub report: T,
    pub fallback: Option<anyhow::Error>,
}

impl<T> Generated<T> {
    fn model(report: T) -> Self {
        Self {
            report,
            fallback: None,
        }
    }

    fn contingency(report: T, err: anyhow::Error) -> Self {
        Self {
            report,
            fallback: Some(err),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn source(&self) -> &'static str {
        if self.is_degraded() {
            "contingency"
        } else {
            "model"
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Generated<U> {
        Generated {
            report: f(self.report),
            fallback: self.fallback,
        }
    }
}

/// Response body: an object for the audit, a bare array for ideas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportResponse {
    TimeAudit(TimeAuditReport),
    Ecommerce(Vec<EcommerceIdea>),
}

#[derive(Clone)]
pub struct ReportService {
    llm: Option<Arc<dyn LlmClient>>,
}

impl ReportService {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm: Some(llm) }
    }

    /// Every request is answered from the contingency generators.
    pub fn offline() -> Self {
        Self { llm: None }
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    pub async fn generate(&self, request: &ReportRequest) -> Generated<ReportResponse> {
        match request {
            ReportRequest::TimeAudit(submission) => self
                .time_audit(submission)
                .await
                .map(ReportResponse::TimeAudit),
            ReportRequest::Ecommerce(req) => self
                .ecommerce_ideas(req)
                .await
                .map(ReportResponse::Ecommerce),
        }
    }

    pub async fn time_audit(&self, submission: &AuditSubmission) -> Generated<TimeAuditReport> {
        match self.try_time_audit(submission).await {
            Ok(report) => Generated::model(report),
            Err(err) => {
                self.log_fallback("time-audit", &err);
                Generated::contingency(time_audit_contingency(submission), err)
            }
        }
    }

    pub async fn ecommerce_ideas(
        &self,
        request: &EcommerceRequest,
    ) -> Generated<Vec<EcommerceIdea>> {
        let out = match self.try_ecommerce_ideas(request).await {
            Ok(ideas) => Generated::model(ideas),
            Err(err) => {
                self.log_fallback("ecommerce-ideas", &err);
                let ideas = ecommerce_contingency(request, &mut rand::thread_rng());
                Generated::contingency(ideas, err)
            }
        };
        out.map(|ideas| ranking::rank_ideas(ideas, request))
    }

    /// Answer for a body that is not JSON at all: the generic idea set, without
    /// a model call.
    pub fn unreadable_body(err: serde_json::Error) -> Generated<ReportResponse> {
        let request = EcommerceRequest::generic();
        let ideas = ecommerce_contingency(&request, &mut rand::thread_rng());
        Generated::contingency(
            ReportResponse::Ecommerce(ranking::rank_ideas(ideas, &request)),
            anyhow::Error::new(err).context("request body is not JSON"),
        )
    }

    async fn try_time_audit(
        &self,
        submission: &AuditSubmission,
    ) -> anyhow::Result<TimeAuditReport> {
        let llm = self.llm()?;
        let prompt = prompt::time_audit_prompt(submission);
        let text = llm.complete(&prompt, GenerationParams::TIME_AUDIT).await?;
        let payload = extract_payload(&text, PayloadKind::Object)
            .context("time audit completion has no usable JSON")?;
        contract::decode_time_audit(payload)
    }

    async fn try_ecommerce_ideas(
        &self,
        request: &EcommerceRequest,
    ) -> anyhow::Result<Vec<EcommerceIdea>> {
        let llm = self.llm()?;
        let prompt = prompt::ecommerce_prompt(request);
        let text = llm.complete(&prompt, GenerationParams::ECOMMERCE).await?;
        let payload = extract_payload(&text, PayloadKind::ArrayOfObjects)
            .context("e-commerce completion has no usable JSON")?;
        let ideas = contract::decode_ideas(payload)?;
        tracing::debug!(count = ideas.len(), "decoded e-commerce ideas");
        Ok(contract::annotate_ideas(ideas, request, &mut rand::thread_rng()))
    }

    fn llm(&self) -> anyhow::Result<&dyn LlmClient> {
        self.llm
            .as_deref()
            .context("no completion client configured")
    }

    fn log_fallback(&self, kind: &'static str, err: &anyhow::Error) {
        let detail = format!("{err:#}");
        if self.llm.is_some() {
            tracing::warn!(kind, error = %detail, "generation failed; using contingency report");
        } else {
            tracing::debug!(kind, "offline; using contingency report");
        }
    }
}
