use crate::infra::{AppState, DashboardState};
use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use sentify::customers::{filter, Customer, FeatureSchema, RiskAssessment, RiskLevel};
use sentify::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub(crate) fn dashboard_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/customers",
            get(list_customers).post(add_customer),
        )
        .route("/api/v1/customers/:customer_id", get(customer_detail))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    pub(crate) query: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomerListResponse {
    pub(crate) total: usize,
    pub(crate) matched: usize,
    pub(crate) customers: Vec<Customer>,
}

/// Risk-sorted customer list, optionally narrowed by a free-text query.
pub(crate) async fn list_customers(
    Extension(state): Extension<DashboardState>,
    Query(params): Query<ListParams>,
) -> Result<Json<CustomerListResponse>, AppError> {
    let customers = state.dataset.load().await?;
    let matched: Vec<Customer> = filter(&customers, params.query.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(CustomerListResponse {
        total: customers.len(),
        matched: matched.len(),
        customers: matched,
    }))
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomerDetailResponse {
    #[serde(flatten)]
    pub(crate) customer: Customer,
    pub(crate) decoded_complaints: Vec<String>,
    pub(crate) contract: &'static str,
    pub(crate) internet_service: &'static str,
    pub(crate) payment_method: &'static str,
    pub(crate) risk_color: &'static str,
}

fn detail_view(customers: Vec<Customer>, customer_id: &str) -> Option<CustomerDetailResponse> {
    // Duplicate IDs are possible in the dataset; the first (highest-risk)
    // match wins, mirroring the list ordering.
    let customer = customers
        .into_iter()
        .find(|customer| customer.customer_id == customer_id)?;

    Some(CustomerDetailResponse {
        decoded_complaints: customer.decoded_complaints(),
        contract: customer.contract_label(),
        internet_service: customer.internet_service_label(),
        payment_method: customer.payment_method_label(),
        risk_color: customer.risk_level.color(),
        customer,
    })
}

pub(crate) async fn customer_detail(
    Extension(state): Extension<DashboardState>,
    Path(customer_id): Path<String>,
) -> Response {
    let customers = match state.dataset.load().await {
        Ok(customers) => customers,
        Err(err) => return AppError::from(err).into_response(),
    };

    match detail_view(customers, &customer_id) {
        Some(view) => (StatusCode::OK, Json(view)).into_response(),
        None => {
            let payload = json!({ "error": format!("no customer with id {customer_id}") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

/// Add-flow request body. `customerID`, `name`, `surname`, `phone`, `gender`,
/// `tenure`, and `MonthlyCharges` are required; everything else defaults to
/// zero/false/empty.
#[derive(Debug, Deserialize)]
pub(crate) struct AddCustomerRequest {
    #[serde(rename = "customerID")]
    pub(crate) customer_id: String,
    pub(crate) name: String,
    pub(crate) surname: String,
    pub(crate) phone: String,
    pub(crate) gender: String,
    pub(crate) tenure: u32,
    #[serde(rename = "MonthlyCharges")]
    pub(crate) monthly_charges: f64,
    #[serde(default, rename = "SeniorCitizen")]
    pub(crate) senior_citizen: u8,
    #[serde(default, rename = "Partner")]
    pub(crate) partner: u8,
    #[serde(default, rename = "Dependents")]
    pub(crate) dependents: u8,
    #[serde(default, rename = "PhoneService")]
    pub(crate) phone_service: u8,
    #[serde(default, rename = "MultipleLines")]
    pub(crate) multiple_lines: u8,
    #[serde(default, rename = "OnlineSecurity")]
    pub(crate) online_security: u8,
    #[serde(default, rename = "OnlineBackup")]
    pub(crate) online_backup: u8,
    #[serde(default, rename = "DeviceProtection")]
    pub(crate) device_protection: u8,
    #[serde(default, rename = "TechSupport")]
    pub(crate) tech_support: u8,
    #[serde(default, rename = "StreamingTV")]
    pub(crate) streaming_tv: u8,
    #[serde(default, rename = "StreamingMovies")]
    pub(crate) streaming_movies: u8,
    #[serde(default, rename = "PaperlessBilling")]
    pub(crate) paperless_billing: u8,
    #[serde(default, rename = "InternetService_Fiber_optic")]
    pub(crate) internet_fiber_optic: bool,
    #[serde(default, rename = "InternetService_No")]
    pub(crate) internet_no_service: bool,
    #[serde(default, rename = "Contract_One_year")]
    pub(crate) contract_one_year: bool,
    #[serde(default, rename = "Contract_Two_year")]
    pub(crate) contract_two_year: bool,
    #[serde(default, rename = "PaymentMethod_Credit_card_automatic")]
    pub(crate) payment_credit_card: bool,
    #[serde(default, rename = "PaymentMethod_Electronic_check")]
    pub(crate) payment_electronic_check: bool,
    #[serde(default, rename = "PaymentMethod_Mailed_check")]
    pub(crate) payment_mailed_check: bool,
    #[serde(default, rename = "Churn")]
    pub(crate) churn: u8,
    #[serde(default)]
    pub(crate) num_complaints: u32,
    /// Operator-supplied score, used directly when the gateway is down.
    #[serde(default)]
    pub(crate) churn_risk_score: f64,
    #[serde(default)]
    pub(crate) last_contacted: u32,
    #[serde(default = "default_complaints")]
    pub(crate) complaints: String,
}

fn default_complaints() -> String {
    "[]".to_string()
}

impl AddCustomerRequest {
    /// Build the canonical record. `TotalCharges` is recomputed from the
    /// submitted tenure and monthly amount; risk fields start from the
    /// operator-supplied score and are overwritten by the assessment.
    fn into_customer(self) -> Customer {
        let total_charges = self.monthly_charges * f64::from(self.tenure);
        Customer {
            customer_id: self.customer_id,
            name: self.name,
            surname: self.surname,
            phone: self.phone,
            gender: self.gender,
            senior_citizen: self.senior_citizen,
            partner: self.partner,
            dependents: self.dependents,
            tenure: self.tenure,
            phone_service: self.phone_service,
            multiple_lines: self.multiple_lines,
            online_security: self.online_security,
            online_backup: self.online_backup,
            device_protection: self.device_protection,
            tech_support: self.tech_support,
            streaming_tv: self.streaming_tv,
            streaming_movies: self.streaming_movies,
            paperless_billing: self.paperless_billing,
            monthly_charges: self.monthly_charges,
            total_charges,
            internet_fiber_optic: self.internet_fiber_optic,
            internet_no_service: self.internet_no_service,
            contract_one_year: self.contract_one_year,
            contract_two_year: self.contract_two_year,
            payment_credit_card: self.payment_credit_card,
            payment_electronic_check: self.payment_electronic_check,
            payment_mailed_check: self.payment_mailed_check,
            churn: self.churn,
            num_complaints: self.num_complaints,
            churn_risk_score: self.churn_risk_score,
            risk_level: RiskLevel::from_score(self.churn_risk_score),
            last_contacted: self.last_contacted,
            complaints: self.complaints,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddCustomerResponse {
    pub(crate) customer: Customer,
    /// Collection size after the awaited reload.
    pub(crate) total: usize,
}

/// Add-flow: resolve the risk assessment (gateway or classifier fallback),
/// append the row, then reload so the response reflects the persisted state.
pub(crate) async fn add_customer(
    Extension(state): Extension<DashboardState>,
    Json(request): Json<AddCustomerRequest>,
) -> Result<(StatusCode, Json<AddCustomerResponse>), AppError> {
    let manual_score = request.churn_risk_score;
    let mut customer = request.into_customer();

    let assessment = match FeatureSchema::from_path(state.schema_path.as_ref()).await {
        Ok(schema) => {
            state
                .scoring
                .assess(&schema.payload_for(&customer), manual_score)
                .await
        }
        Err(err) => {
            tracing::warn!(%err, "feature schema unavailable, using classifier fallback");
            RiskAssessment::fallback(manual_score)
        }
    };
    customer.churn_risk_score = assessment.score;
    customer.risk_level = assessment.level;

    let customers = state.dataset.add(&customer).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddCustomerResponse {
            total: customers.len(),
            customer,
        }),
    ))
}
