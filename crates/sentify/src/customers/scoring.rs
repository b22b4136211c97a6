//! Client for the external churn-scoring service.
//!
//! The gateway is consumed as a black box: a health probe with a bounded
//! timeout decides availability, `/predict` turns a feature vector into a
//! score and label, and every failure degrades to the local risk classifier
//! over whatever score the operator supplied. The add-flow never blocks on
//! the gateway and never fails because of it.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::domain::{Customer, RiskLevel};
use super::schema::{
    CONTRACT_ONE_YEAR, CONTRACT_TWO_YEAR, INTERNET_FIBER_OPTIC, INTERNET_NO_SERVICE,
    PAYMENT_CREDIT_CARD, PAYMENT_ELECTRONIC_CHECK, PAYMENT_MAILED_CHECK,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("scoring gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("scoring gateway returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("feature schema unavailable: {0}")]
    Schema(#[from] std::io::Error),
    #[error("feature schema is not a JSON array of column names: {0}")]
    SchemaFormat(#[from] serde_json::Error),
}

/// Wire response of `POST /predict`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreResponse {
    pub risk_score: f64,
    pub risk_level: String,
}

impl ScoreResponse {
    fn into_assessment(self) -> RiskAssessment {
        let level = RiskLevel::parse(&self.risk_level)
            .unwrap_or_else(|| RiskLevel::from_score(self.risk_score));
        RiskAssessment {
            score: self.risk_score,
            level,
        }
    }
}

/// Resolved score and label for a customer being added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub score: f64,
    pub level: RiskLevel,
}

impl RiskAssessment {
    /// Local fallback: classify the operator-supplied score.
    pub fn fallback(score: f64) -> Self {
        Self {
            score,
            level: RiskLevel::from_score(score),
        }
    }
}

/// Externally supplied manifest naming the payload keys `/predict` expects,
/// in the human-readable one-hot spellings.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let raw = tokio::fs::read(path.as_ref()).await?;
        let columns: Vec<String> = serde_json::from_slice(&raw)?;
        Ok(Self { columns })
    }

    /// Build the feature vector for one customer. Every manifest column gets
    /// a value; names this service does not model map to 0.
    pub fn payload_for(&self, customer: &Customer) -> BTreeMap<String, f64> {
        self.columns
            .iter()
            .map(|column| (column.clone(), feature_value(customer, column)))
            .collect()
    }
}

fn flag(value: bool) -> f64 {
    f64::from(u8::from(value))
}

fn feature_value(customer: &Customer, column: &str) -> f64 {
    match column {
        "gender" => flag(customer.gender == "1"),
        "SeniorCitizen" => f64::from(customer.senior_citizen),
        "Partner" => f64::from(customer.partner),
        "Dependents" => f64::from(customer.dependents),
        "tenure" => f64::from(customer.tenure),
        "PhoneService" => f64::from(customer.phone_service),
        "MultipleLines" => f64::from(customer.multiple_lines),
        "OnlineSecurity" => f64::from(customer.online_security),
        "OnlineBackup" => f64::from(customer.online_backup),
        "DeviceProtection" => f64::from(customer.device_protection),
        "TechSupport" => f64::from(customer.tech_support),
        "StreamingTV" => f64::from(customer.streaming_tv),
        "StreamingMovies" => f64::from(customer.streaming_movies),
        "PaperlessBilling" => f64::from(customer.paperless_billing),
        "MonthlyCharges" => customer.monthly_charges,
        "TotalCharges" => customer.total_charges,
        "Churn" => f64::from(customer.churn),
        "num_complaints" => f64::from(customer.num_complaints),
        _ if column == INTERNET_FIBER_OPTIC.display => flag(customer.internet_fiber_optic),
        _ if column == INTERNET_NO_SERVICE.display => flag(customer.internet_no_service),
        _ if column == CONTRACT_ONE_YEAR.display => flag(customer.contract_one_year),
        _ if column == CONTRACT_TWO_YEAR.display => flag(customer.contract_two_year),
        _ if column == PAYMENT_CREDIT_CARD.display => flag(customer.payment_credit_card),
        _ if column == PAYMENT_ELECTRONIC_CHECK.display => flag(customer.payment_electronic_check),
        _ if column == PAYMENT_MAILED_CHECK.display => flag(customer.payment_mailed_check),
        _ => {
            tracing::debug!(column, "unmapped feature column defaults to 0");
            0.0
        }
    }
}

/// HTTP client for the scoring gateway.
pub struct ScoringClient {
    base_url: String,
    health_timeout: Duration,
    http: reqwest::Client,
}

impl ScoringClient {
    pub fn new(base_url: impl Into<String>, health_timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            health_timeout,
            http,
        })
    }

    /// Probe `GET /health`. Resolves to unavailable after the bounded timeout
    /// rather than hanging.
    pub async fn health(&self) -> bool {
        let request = self
            .http
            .get(format!("{}/health", self.base_url))
            .timeout(self.health_timeout)
            .send();
        match request.await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::warn!(%err, "scoring gateway health check failed");
                false
            }
        }
    }

    /// `POST /predict` with the manifest-driven feature vector.
    pub async fn predict(
        &self,
        features: &BTreeMap<String, f64>,
    ) -> Result<ScoreResponse, GatewayError> {
        let response = self
            .http
            .post(format!("{}/predict", self.base_url))
            .json(&serde_json::json!({ "features": features }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status()));
        }

        Ok(response.json::<ScoreResponse>().await?)
    }

    /// Full add-flow resolution: gateway when healthy, classifier fallback on
    /// any failure, with `manual_score` as the operator-supplied input.
    pub async fn assess(
        &self,
        features: &BTreeMap<String, f64>,
        manual_score: f64,
    ) -> RiskAssessment {
        if !self.health().await {
            tracing::info!("scoring gateway unavailable, using classifier fallback");
            return RiskAssessment::fallback(manual_score);
        }

        match self.predict(features).await {
            Ok(response) => response.into_assessment(),
            Err(err) => {
                tracing::warn!(%err, "scoring gateway prediction failed, using classifier fallback");
                RiskAssessment::fallback(manual_score)
            }
        }
    }
}
