//! Routes an incoming JSON body to one of the two report pipelines.

use crate::domain::audit::AuditSubmission;
use crate::domain::ecommerce::{EcommerceRequest, Market, REQUEST_TYPE};
use crate::domain::lenient;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingRequiredFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    TimeAudit,
    Ecommerce,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimeAudit => "time-audit",
            Self::Ecommerce => "ecommerce-ideas",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRequest {
    TimeAudit(AuditSubmission),
    Ecommerce(EcommerceRequest),
}

impl ReportRequest {
    /// Fields are read from `formData` when it is an object, otherwise from
    /// the body itself. Only the e-commerce path validates; an audit body of
    /// any shape is accepted.
    pub fn from_body(body: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut top) = body else {
            return Ok(Self::TimeAudit(AuditSubmission::from_value(body)));
        };
        let form = match top.remove("formData") {
            Some(Value::Object(form)) => form,
            _ => top.clone(),
        };

        let is_ecommerce = [&form, &top]
            .iter()
            .any(|m| m.get("requestType").and_then(Value::as_str) == Some(REQUEST_TYPE));

        if is_ecommerce {
            ecommerce_request(&form, &top).map(Self::Ecommerce)
        } else {
            Ok(Self::TimeAudit(AuditSubmission::from_value(Value::Object(form))))
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            Self::TimeAudit(_) => ReportKind::TimeAudit,
            Self::Ecommerce(_) => ReportKind::Ecommerce,
        }
    }
}

fn ecommerce_request(
    form: &Map<String, Value>,
    top: &Map<String, Value>,
) -> Result<EcommerceRequest, ValidationError> {
    let field = |name: &str| form.get(name).or_else(|| top.get(name)).cloned();

    let industries = field("industries")
        .and_then(|v| lenient::string_list(v).ok())
        .unwrap_or_default();
    let niches = field("niches")
        .and_then(|v| lenient::string_list(v).ok())
        .unwrap_or_default();
    let market = field("market")
        .and_then(|v| lenient::optional_text(v).ok().flatten())
        .and_then(|raw| Market::parse(&raw));

    match market {
        Some(market) if !industries.is_empty() && !niches.is_empty() => Ok(EcommerceRequest {
            industries,
            niches,
            market,
        }),
        _ => Err(ValidationError::MissingRequiredFields),
    }
}
