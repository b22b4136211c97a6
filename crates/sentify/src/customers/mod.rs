//! Customer dataset ingestion and churn-risk domain.
//!
//! The pipeline runs loader -> normalizer (per row) -> sorted collection ->
//! query engine, with the appender as the only write path. Appending and
//! reloading are two awaited steps, never a fire-and-forget refresh.

mod dataset;
mod domain;
mod normalizer;
mod query;
mod schema;
pub mod scoring;

pub use dataset::{parse_customers, CustomerDataset, DatasetError, ValidationError};
pub use domain::{
    decode_complaints, Customer, RiskLevel, HIGH_RISK_THRESHOLD, MODERATE_RISK_THRESHOLD,
};
pub use query::filter;
pub use scoring::{FeatureSchema, GatewayError, RiskAssessment, ScoringClient};

#[cfg(test)]
pub(crate) mod testing {
    use super::domain::{Customer, RiskLevel};

    pub(crate) fn sample_customer() -> Customer {
        Customer {
            customer_id: "1001-ABCD".to_string(),
            name: "Ana".to_string(),
            surname: "Lee".to_string(),
            phone: "555-1111".to_string(),
            gender: "0".to_string(),
            senior_citizen: 0,
            partner: 1,
            dependents: 0,
            tenure: 10,
            phone_service: 1,
            multiple_lines: 0,
            online_security: 1,
            online_backup: 0,
            device_protection: 0,
            tech_support: 1,
            streaming_tv: 0,
            streaming_movies: 0,
            paperless_billing: 1,
            monthly_charges: 50.0,
            total_charges: 500.0,
            internet_fiber_optic: true,
            internet_no_service: false,
            contract_one_year: true,
            contract_two_year: false,
            payment_credit_card: false,
            payment_electronic_check: true,
            payment_mailed_check: false,
            churn: 0,
            num_complaints: 2,
            churn_risk_score: 55.5,
            risk_level: RiskLevel::Moderate,
            last_contacted: 12,
            complaints: "['Billing Issues', 'Poor Customer Support']".to_string(),
        }
    }
}
