use clap::Args;
use sentify::config::AppConfig;
use sentify::customers::{filter, CustomerDataset};
use sentify::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    /// Dataset CSV to load (defaults to the configured path)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Free-text filter over id, name, surname, and phone
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Maximum number of rows to print
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

/// CLI rendition of the list view: highest-risk, least-recently-contacted
/// customers first.
pub(crate) async fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let data_path = args.data.unwrap_or(config.dataset.data_path);

    let dataset = CustomerDataset::new(data_path);
    let customers = dataset.load().await?;

    let query = args.query.unwrap_or_default();
    let matched = filter(&customers, &query);
    let limit = args.limit.unwrap_or(matched.len());

    println!(
        "Customer dashboard: {} of {} customers",
        matched.len(),
        customers.len()
    );
    if !query.trim().is_empty() {
        println!("Filter: {query}");
    }

    if matched.is_empty() {
        println!("\nNo customers matched.");
        return Ok(());
    }

    println!();
    for (rank, customer) in matched.iter().take(limit).enumerate() {
        println!(
            "{:>4}. {:<12} {} {} | {} | risk {:>5.1} ({}) | last contacted {} days ago",
            rank + 1,
            customer.customer_id,
            customer.name,
            customer.surname,
            customer.phone,
            customer.churn_risk_score,
            customer.risk_level.label(),
            customer.last_contacted
        );
    }

    if matched.len() > limit {
        println!("... {} more not shown", matched.len() - limit);
    }

    Ok(())
}
