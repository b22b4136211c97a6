use super::domain::Customer;

/// Free-text search over the loaded collection.
///
/// Matches `customerID`, `name`, `surname`, and `phone` as case-insensitive
/// substrings. An empty or whitespace-only query selects everything. The
/// input is never mutated and its ordering is preserved.
pub fn filter<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    let query = query.trim();
    if query.is_empty() {
        return customers.iter().collect();
    }

    let needle = query.to_lowercase();
    customers
        .iter()
        .filter(|customer| matches(customer, &needle))
        .collect()
}

fn matches(customer: &Customer, needle: &str) -> bool {
    [
        &customer.customer_id,
        &customer.name,
        &customer.surname,
        &customer.phone,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(needle))
}
