use sentify::customers::{parse_customers, Customer, CustomerDataset, DatasetError, RiskLevel};
use std::path::PathBuf;

fn temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sentify-dataset-{}-{}.csv", tag, std::process::id()))
}

fn ana() -> Customer {
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
        online_security: 0,
        online_backup: 1,
        device_protection: 0,
        tech_support: 0,
        streaming_tv: 1,
        streaming_movies: 0,
        paperless_billing: 1,
        monthly_charges: 50.0,
        total_charges: 500.0,
        internet_fiber_optic: true,
        internet_no_service: false,
        contract_one_year: false,
        contract_two_year: true,
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

#[test]
fn both_header_spellings_produce_identical_customers() {
    let readable = "customerID,name,surname,phone,churn_risk_score,\
InternetService_Fiber optic,Contract_Two year,PaymentMethod_Credit card (automatic)\n\
1001-ABCD,Ana,Lee,555-1111,72,True,True,True\n";
    let sanitized = "customerID,name,surname,phone,churn_risk_score,\
InternetService_Fiber_optic,Contract_Two_year,PaymentMethod_Credit_card_automatic\n\
1001-ABCD,Ana,Lee,555-1111,72,True,True,True\n";

    let from_readable = parse_customers(readable.as_bytes()).expect("readable header parses");
    let from_sanitized = parse_customers(sanitized.as_bytes()).expect("sanitized header parses");

    assert_eq!(from_readable, from_sanitized);
    assert!(from_readable[0].internet_fiber_optic);
    assert!(from_readable[0].contract_two_year);
    assert!(from_readable[0].payment_credit_card);
}

#[test]
fn loader_excludes_exactly_the_incomplete_rows() {
    let csv = "customerID,name,surname\n\
1,Ana,Lee\n\
2,,Ray\n\
3,Bo,\n\
4,Cy,Fox\n\
5,Di,Sun\n";
    let customers = parse_customers(csv.as_bytes()).expect("parses");
    assert_eq!(customers.len(), 3);
}

#[test]
fn ordering_is_risk_desc_with_last_contacted_asc_tiebreak() {
    let csv = "customerID,name,surname,churn_risk_score,last_contacted\n\
a,Ana,Lee,50,30\n\
b,Bo,Ray,90,5\n\
c,Cy,Fox,50,2\n\
d,Di,Sun,90,5\n\
e,Ed,Kim,10,0\n";
    let customers = parse_customers(csv.as_bytes()).expect("parses");

    for pair in customers.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        assert!(
            first.churn_risk_score > second.churn_risk_score
                || (first.churn_risk_score == second.churn_risk_score
                    && first.last_contacted <= second.last_contacted),
            "out of order: {} before {}",
            first.customer_id,
            second.customer_id
        );
    }

    // Equal score and equal tie-break keep input order (stable sort).
    assert_eq!(customers[0].customer_id, "b");
    assert_eq!(customers[1].customer_id, "d");
}

#[test]
fn reparsing_unchanged_input_is_idempotent() {
    let csv = "customerID,name,surname,churn_risk_score\na,Ana,Lee,70\nb,Bo,Ray,20\n";
    let first = parse_customers(csv.as_bytes()).expect("parses");
    let second = parse_customers(csv.as_bytes()).expect("parses");
    assert_eq!(first, second);
}

#[tokio::test]
async fn append_creates_the_dataset_with_a_header() {
    let path = temp_path("create");
    std::fs::remove_file(&path).ok();

    let dataset = CustomerDataset::new(&path);
    dataset.append(&ana()).await.expect("append creates file");

    let content = std::fs::read_to_string(&path).expect("file exists");
    let mut lines = content.lines();
    let header = lines.next().expect("header line");
    assert!(header.starts_with("customerID,name,surname,phone,gender"));
    assert!(header.ends_with("churn_risk_score,risk_level,last_contacted,complaints"));
    assert_eq!(lines.count(), 1);

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn append_then_load_round_trips_the_record() {
    let path = temp_path("roundtrip");
    std::fs::remove_file(&path).ok();

    let dataset = CustomerDataset::new(&path);
    let original = ana();
    let loaded = dataset.add(&original).await.expect("add succeeds");

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], original);

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn repeated_adds_append_without_deduplication() {
    let path = temp_path("duplicates");
    std::fs::remove_file(&path).ok();

    let dataset = CustomerDataset::new(&path);
    dataset.append(&ana()).await.expect("first append");
    let loaded = dataset.add(&ana()).await.expect("second append");

    // Same customerID twice: append-only storage keeps both rows.
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].customer_id, loaded[1].customer_id);

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn add_flow_reload_observes_the_new_row_among_existing_ones() {
    let path = temp_path("addflow");
    std::fs::write(
        &path,
        "customerID,name,surname,phone,churn_risk_score,last_contacted\n\
9001-AAAA,Maya,Ortiz,555-9001,82,3\n",
    )
    .expect("seed dataset");

    let dataset = CustomerDataset::new(&path);
    let mut newcomer = ana();
    newcomer.churn_risk_score = 75.0;
    newcomer.risk_level = RiskLevel::from_score(75.0);

    let loaded = dataset.add(&newcomer).await.expect("add succeeds");
    assert_eq!(loaded.len(), 2);

    let added = loaded
        .iter()
        .find(|customer| customer.customer_id == "1001-ABCD")
        .expect("new row present after reload");
    assert_eq!(added.total_charges, 500.0);
    assert_eq!(added.risk_level, RiskLevel::High);

    std::fs::remove_file(path).ok();
}

#[tokio::test]
async fn append_rejects_records_without_required_fields() {
    let path = temp_path("invalid");
    std::fs::remove_file(&path).ok();

    let dataset = CustomerDataset::new(&path);
    let mut nameless = ana();
    nameless.name = String::new();

    let error = dataset
        .append(&nameless)
        .await
        .expect_err("blank name rejected");
    assert!(matches!(error, DatasetError::Validation(_)));
    assert!(!path.exists());
}

#[tokio::test]
async fn loading_a_missing_dataset_reports_unavailable() {
    let dataset = CustomerDataset::new(temp_path("missing-never-created"));
    let error = dataset.load().await.expect_err("missing file");
    assert!(matches!(error, DatasetError::Unavailable(_)));
}
