use serde::{Deserialize, Serialize};

/// Score at or above which a customer is considered high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 60.0;
/// Score at or above which a customer is considered moderate risk.
pub const MODERATE_RISK_THRESHOLD: f64 = 40.0;

/// Three-valued classification derived from a churn-risk score.
///
/// The thresholds live here and nowhere else: classification and badge
/// coloring both go through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Classify a score. Total for any input, including out-of-range values.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if score >= MODERATE_RISK_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }

    /// Badge color used by the display tier.
    pub fn color(self) -> &'static str {
        match self {
            Self::High => "#EF4444",
            Self::Moderate => "#F59E0B",
            Self::Low => "#22C55E",
        }
    }

    /// Accept persisted or gateway-supplied labels in any casing.
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "moderate" => Some(Self::Moderate),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Canonical in-memory customer record.
///
/// Serialized field names match the dataset's canonical headers so API
/// responses keep the shape of the underlying rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "customerID")]
    pub customer_id: String,
    pub name: String,
    pub surname: String,
    pub phone: String,
    /// String-coded categorical: "0" is female, "1" is male.
    pub gender: String,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: u8,
    #[serde(rename = "Partner")]
    pub partner: u8,
    #[serde(rename = "Dependents")]
    pub dependents: u8,
    /// Months with the company.
    pub tenure: u32,
    #[serde(rename = "PhoneService")]
    pub phone_service: u8,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: u8,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: u8,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: u8,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: u8,
    #[serde(rename = "TechSupport")]
    pub tech_support: u8,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: u8,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: u8,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: u8,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,
    #[serde(rename = "TotalCharges")]
    pub total_charges: f64,
    #[serde(rename = "InternetService_Fiber_optic")]
    pub internet_fiber_optic: bool,
    #[serde(rename = "InternetService_No")]
    pub internet_no_service: bool,
    #[serde(rename = "Contract_One_year")]
    pub contract_one_year: bool,
    #[serde(rename = "Contract_Two_year")]
    pub contract_two_year: bool,
    #[serde(rename = "PaymentMethod_Credit_card_automatic")]
    pub payment_credit_card: bool,
    #[serde(rename = "PaymentMethod_Electronic_check")]
    pub payment_electronic_check: bool,
    #[serde(rename = "PaymentMethod_Mailed_check")]
    pub payment_mailed_check: bool,
    #[serde(rename = "Churn")]
    pub churn: u8,
    pub num_complaints: u32,
    pub churn_risk_score: f64,
    pub risk_level: RiskLevel,
    /// Days since the customer was last contacted.
    pub last_contacted: u32,
    /// Raw complaint text as persisted; see [`decode_complaints`].
    pub complaints: String,
}

impl Customer {
    pub fn contract_label(&self) -> &'static str {
        if self.contract_two_year {
            "Two Year"
        } else if self.contract_one_year {
            "One Year"
        } else {
            "Month-to-Month"
        }
    }

    pub fn internet_service_label(&self) -> &'static str {
        if self.internet_fiber_optic {
            "Fiber Optic"
        } else if self.internet_no_service {
            "No Internet Service"
        } else {
            "DSL"
        }
    }

    pub fn payment_method_label(&self) -> &'static str {
        if self.payment_credit_card {
            "Credit Card (Automatic)"
        } else if self.payment_electronic_check {
            "Electronic Check"
        } else if self.payment_mailed_check {
            "Mailed Check"
        } else {
            "Bank Transfer (Automatic)"
        }
    }

    pub fn decoded_complaints(&self) -> Vec<String> {
        decode_complaints(&self.complaints)
    }
}

/// Decode the persisted complaint text into individual complaint strings.
///
/// Supported forms: the empty markers `""` and `"[]"`, a bracketed sequence
/// of single-quoted comma-separated entries, and plain text (one complaint,
/// verbatim). Malformed bracket or quote structure falls back to treating the
/// whole text as a single complaint rather than failing.
pub fn decode_complaints(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return Vec::new();
    }

    if let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        if inner.trim().is_empty() {
            return Vec::new();
        }
        if inner.contains('\'') {
            return inner
                .split("', '")
                .map(|entry| entry.trim().trim_matches('\'').to_string())
                .collect();
        }
        // Unquoted bracketed content only parses when it is valid JSON with
        // double quotes; anything else is kept verbatim.
        if let Ok(entries) = serde_json::from_str::<Vec<String>>(trimmed) {
            return entries;
        }
        return vec![trimmed.to_string()];
    }

    vec![trimmed.to_string()]
}
