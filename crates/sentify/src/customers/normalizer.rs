use super::domain::{Customer, RiskLevel};
use super::schema::{
    OneHotColumn, CONTRACT_ONE_YEAR, CONTRACT_TWO_YEAR, INTERNET_FIBER_OPTIC, INTERNET_NO_SERVICE,
    PAYMENT_CREDIT_CARD, PAYMENT_ELECTRONIC_CHECK, PAYMENT_MAILED_CHECK,
};
use csv::StringRecord;

/// Header-keyed view over one raw dataset row.
pub(crate) struct RowView<'a> {
    headers: &'a StringRecord,
    record: &'a StringRecord,
}

impl<'a> RowView<'a> {
    pub(crate) fn new(headers: &'a StringRecord, record: &'a StringRecord) -> Self {
        Self { headers, record }
    }

    fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.headers.iter().position(|header| header == column)?;
        self.record.get(index)
    }

    /// One-hot flags are true only for the exact string "True", checked under
    /// both header spellings.
    fn flag(&self, column: OneHotColumn) -> bool {
        self.get(column.canonical) == Some("True") || self.get(column.display) == Some("True")
    }
}

/// Convert one raw row into a canonical [`Customer`].
///
/// Returns `None` when `name` or `surname` is absent or empty; every other
/// malformed field is coerced to its zero default rather than rejected
/// (permissive parsing, matching the historical dataset's looseness).
pub(crate) fn normalize(row: &RowView<'_>) -> Option<Customer> {
    let name = non_empty(row.get("name"))?;
    let surname = non_empty(row.get("surname"))?;

    let churn_risk_score = coerce_number(row.get("churn_risk_score"));
    let risk_level = row
        .get("risk_level")
        .and_then(RiskLevel::parse)
        .unwrap_or_else(|| RiskLevel::from_score(churn_risk_score));

    Some(Customer {
        customer_id: row.get("customerID").unwrap_or_default().to_string(),
        name,
        surname,
        phone: row.get("phone").unwrap_or_default().to_string(),
        gender: row.get("gender").unwrap_or_default().to_string(),
        senior_citizen: coerce_bit(row.get("SeniorCitizen")),
        partner: coerce_bit(row.get("Partner")),
        dependents: coerce_bit(row.get("Dependents")),
        tenure: coerce_count(row.get("tenure")),
        phone_service: coerce_bit(row.get("PhoneService")),
        multiple_lines: coerce_bit(row.get("MultipleLines")),
        online_security: coerce_bit(row.get("OnlineSecurity")),
        online_backup: coerce_bit(row.get("OnlineBackup")),
        device_protection: coerce_bit(row.get("DeviceProtection")),
        tech_support: coerce_bit(row.get("TechSupport")),
        streaming_tv: coerce_bit(row.get("StreamingTV")),
        streaming_movies: coerce_bit(row.get("StreamingMovies")),
        paperless_billing: coerce_bit(row.get("PaperlessBilling")),
        monthly_charges: coerce_number(row.get("MonthlyCharges")),
        total_charges: coerce_number(row.get("TotalCharges")),
        internet_fiber_optic: row.flag(INTERNET_FIBER_OPTIC),
        internet_no_service: row.flag(INTERNET_NO_SERVICE),
        contract_one_year: row.flag(CONTRACT_ONE_YEAR),
        contract_two_year: row.flag(CONTRACT_TWO_YEAR),
        payment_credit_card: row.flag(PAYMENT_CREDIT_CARD),
        payment_electronic_check: row.flag(PAYMENT_ELECTRONIC_CHECK),
        payment_mailed_check: row.flag(PAYMENT_MAILED_CHECK),
        churn: coerce_bit(row.get("Churn")),
        num_complaints: coerce_count(row.get("num_complaints")),
        churn_risk_score,
        risk_level,
        last_contacted: coerce_count(row.get("last_contacted")),
        complaints: row.get("complaints").unwrap_or_default().to_string(),
    })
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Permissive numeric coercion: parse failures and missing values become 0.
fn coerce_number(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn coerce_count(raw: Option<&str>) -> u32 {
    coerce_number(raw) as u32
}

fn coerce_bit(raw: Option<&str>) -> u8 {
    u8::from(coerce_number(raw) != 0.0)
}
