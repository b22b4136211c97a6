use std::cmp::Ordering;
use std::io::Read;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use super::domain::Customer;
use super::normalizer::{normalize, RowView};
use super::schema::CANONICAL_HEADER;

/// Raised by the add-flow when a required field is missing.
#[derive(Debug, thiserror::Error)]
#[error("{field} is required")]
pub struct ValidationError {
    pub field: &'static str,
}

/// Failures surfaced by the dataset loader and appender.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("customer dataset unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
    #[error("malformed customer dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Handle on the persisted comma-delimited customer dataset.
///
/// Loading is idempotent with respect to the source file; appending is the
/// only mutation and never rewrites existing rows.
#[derive(Debug, Clone)]
pub struct CustomerDataset {
    path: PathBuf,
}

impl CustomerDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, normalize, filter, and sort the full dataset.
    pub async fn load(&self) -> Result<Vec<Customer>, DatasetError> {
        let raw = tokio::fs::read(&self.path).await?;
        parse_customers(raw.as_slice())
    }

    /// Serialize one customer under the canonical header and durably append
    /// it, creating the dataset with a header row when it does not yet exist.
    pub async fn append(&self, customer: &Customer) -> Result<(), DatasetError> {
        validate(customer)?;
        let row = encode_row(customer)?;

        let existing = match tokio::fs::read(&self.path).await {
            Ok(bytes) => Some(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => return Err(err.into()),
        };

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        match existing.as_deref() {
            None | Some([]) => {
                file.write_all(header_line().as_bytes()).await?;
            }
            Some(bytes) if !bytes.ends_with(b"\n") => {
                file.write_all(b"\n").await?;
            }
            Some(_) => {}
        }

        file.write_all(row.as_bytes()).await?;
        file.sync_all().await?;
        Ok(())
    }

    /// Add-flow pipeline: append, then reload. The reload only starts once
    /// the append has been flushed to disk, so it always observes the new row.
    pub async fn add(&self, customer: &Customer) -> Result<Vec<Customer>, DatasetError> {
        self.append(customer).await?;
        self.load().await
    }
}

/// Parse customers out of raw CSV content.
///
/// Header-driven and tolerant: unknown columns are ignored, ragged rows are
/// accepted, and rows the normalizer rejects are dropped. The result is
/// sorted by `churn_risk_score` descending with `last_contacted` ascending as
/// the tie-break, so the highest-risk, least-recently-contacted customers
/// come first.
pub fn parse_customers<R: Read>(reader: R) -> Result<Vec<Customer>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut customers = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if let Some(customer) = normalize(&RowView::new(&headers, &record)) {
            customers.push(customer);
        }
    }

    sort_by_risk(&mut customers);
    Ok(customers)
}

fn sort_by_risk(customers: &mut [Customer]) {
    // Scores are finite by construction, so the partial ordering never
    // actually falls back to Equal. sort_by is stable.
    customers.sort_by(|a, b| {
        b.churn_risk_score
            .partial_cmp(&a.churn_risk_score)
            .unwrap_or(Ordering::Equal)
            .then(a.last_contacted.cmp(&b.last_contacted))
    });
}

fn validate(customer: &Customer) -> Result<(), ValidationError> {
    for (field, value) in [
        ("name", &customer.name),
        ("surname", &customer.surname),
        ("phone", &customer.phone),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError { field });
        }
    }
    Ok(())
}

fn header_line() -> String {
    // Sanitized header names never contain delimiters, so a plain join is a
    // valid CSV record.
    let mut line = CANONICAL_HEADER.join(",");
    line.push('\n');
    line
}

fn encode_row(customer: &Customer) -> Result<String, DatasetError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(row_fields(customer))?;
    let bytes = writer
        .into_inner()
        .map_err(|err| DatasetError::Unavailable(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Field values in [`CANONICAL_HEADER`] order. One-hot booleans serialize as
/// `True`/`False`, the literal the normalizer reads back.
fn row_fields(customer: &Customer) -> Vec<String> {
    vec![
        customer.customer_id.clone(),
        customer.name.clone(),
        customer.surname.clone(),
        customer.phone.clone(),
        customer.gender.clone(),
        customer.senior_citizen.to_string(),
        customer.partner.to_string(),
        customer.dependents.to_string(),
        customer.tenure.to_string(),
        customer.phone_service.to_string(),
        customer.multiple_lines.to_string(),
        customer.online_security.to_string(),
        customer.online_backup.to_string(),
        customer.device_protection.to_string(),
        customer.tech_support.to_string(),
        customer.streaming_tv.to_string(),
        customer.streaming_movies.to_string(),
        customer.paperless_billing.to_string(),
        format_number(customer.monthly_charges),
        format_number(customer.total_charges),
        format_flag(customer.internet_fiber_optic),
        format_flag(customer.internet_no_service),
        format_flag(customer.contract_one_year),
        format_flag(customer.contract_two_year),
        format_flag(customer.payment_credit_card),
        format_flag(customer.payment_electronic_check),
        format_flag(customer.payment_mailed_check),
        customer.churn.to_string(),
        customer.num_complaints.to_string(),
        format_number(customer.churn_risk_score),
        customer.risk_level.label().to_string(),
        customer.last_contacted.to_string(),
        customer.complaints.clone(),
    ]
}

fn format_flag(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

/// Plain decimal text: whole amounts drop the fractional part.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customers::testing::sample_customer;

    #[test]
    fn row_fields_match_the_canonical_header_width() {
        assert_eq!(row_fields(&sample_customer()).len(), CANONICAL_HEADER.len());
    }

    #[test]
    fn one_hot_fields_serialize_as_the_readable_literal() {
        let fields = row_fields(&sample_customer());
        // InternetService_Fiber_optic is the first one-hot column.
        assert_eq!(fields[20], "True");
        assert_eq!(fields[21], "False");
    }

    #[test]
    fn numbers_serialize_as_plain_decimal_text() {
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(55.5), "55.5");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn encoded_rows_quote_embedded_delimiters() {
        let row = encode_row(&sample_customer()).expect("row encodes");
        assert!(row.ends_with('\n'));
        assert!(row.contains("\"['Billing Issues', 'Poor Customer Support']\""));
    }

    #[test]
    fn validate_requires_name_surname_and_phone() {
        let mut customer = sample_customer();
        customer.phone = "  ".to_string();
        let error = validate(&customer).expect_err("phone is required");
        assert_eq!(error.field, "phone");
    }

    #[test]
    fn parse_sorts_by_score_desc_then_last_contacted_asc() {
        let csv = "customerID,name,surname,phone,churn_risk_score,last_contacted\n\
a,Ana,Lee,1,70,9\n\
b,Bo,Ray,2,90,4\n\
c,Cy,Fox,3,70,2\n";
        let customers = parse_customers(csv.as_bytes()).expect("parses");
        let ids: Vec<_> = customers
            .iter()
            .map(|customer| customer.customer_id.as_str())
            .collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn parse_drops_rows_the_normalizer_rejects() {
        let csv = "customerID,name,surname\n1,Ana,Lee\n2,,Lee\n3,Bo,\n4,Cy,Fox\n";
        let customers = parse_customers(csv.as_bytes()).expect("parses");
        assert_eq!(customers.len(), 2);
    }

    #[test]
    fn parse_ignores_unknown_columns() {
        let csv = "name,surname,favorite_color\nAna,Lee,teal\n";
        let customers = parse_customers(csv.as_bytes()).expect("parses");
        assert_eq!(customers.len(), 1);
    }
}
