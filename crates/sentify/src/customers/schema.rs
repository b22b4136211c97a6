//! Column layout of the persisted customer dataset.
//!
//! Historical exports carry the one-hot columns under human-readable
//! spellings (embedded spaces and parentheses); rows appended by this service
//! use the sanitized underscore spellings. Both spellings are declared here
//! once and consulted by the normalizer, the appender, and the scoring
//! payload builder so the three can never drift apart.

/// A one-hot boolean column known under two header spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OneHotColumn {
    /// Sanitized spelling, used when serializing appended rows.
    pub(crate) canonical: &'static str,
    /// Human-readable spelling found in historical exports and expected by
    /// the scoring gateway's feature schema.
    pub(crate) display: &'static str,
}

pub(crate) const INTERNET_FIBER_OPTIC: OneHotColumn = OneHotColumn {
    canonical: "InternetService_Fiber_optic",
    display: "InternetService_Fiber optic",
};

pub(crate) const INTERNET_NO_SERVICE: OneHotColumn = OneHotColumn {
    canonical: "InternetService_No",
    display: "InternetService_No",
};

pub(crate) const CONTRACT_ONE_YEAR: OneHotColumn = OneHotColumn {
    canonical: "Contract_One_year",
    display: "Contract_One year",
};

pub(crate) const CONTRACT_TWO_YEAR: OneHotColumn = OneHotColumn {
    canonical: "Contract_Two_year",
    display: "Contract_Two year",
};

pub(crate) const PAYMENT_CREDIT_CARD: OneHotColumn = OneHotColumn {
    canonical: "PaymentMethod_Credit_card_automatic",
    display: "PaymentMethod_Credit card (automatic)",
};

pub(crate) const PAYMENT_ELECTRONIC_CHECK: OneHotColumn = OneHotColumn {
    canonical: "PaymentMethod_Electronic_check",
    display: "PaymentMethod_Electronic check",
};

pub(crate) const PAYMENT_MAILED_CHECK: OneHotColumn = OneHotColumn {
    canonical: "PaymentMethod_Mailed_check",
    display: "PaymentMethod_Mailed check",
};

/// Header written when the dataset file is created, and the field order used
/// for every appended row.
pub(crate) const CANONICAL_HEADER: [&str; 33] = [
    "customerID",
    "name",
    "surname",
    "phone",
    "gender",
    "SeniorCitizen",
    "Partner",
    "Dependents",
    "tenure",
    "PhoneService",
    "MultipleLines",
    "OnlineSecurity",
    "OnlineBackup",
    "DeviceProtection",
    "TechSupport",
    "StreamingTV",
    "StreamingMovies",
    "PaperlessBilling",
    "MonthlyCharges",
    "TotalCharges",
    INTERNET_FIBER_OPTIC.canonical,
    INTERNET_NO_SERVICE.canonical,
    CONTRACT_ONE_YEAR.canonical,
    CONTRACT_TWO_YEAR.canonical,
    PAYMENT_CREDIT_CARD.canonical,
    PAYMENT_ELECTRONIC_CHECK.canonical,
    PAYMENT_MAILED_CHECK.canonical,
    "Churn",
    "num_complaints",
    "churn_risk_score",
    "risk_level",
    "last_contacted",
    "complaints",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn canonical_header_has_no_duplicates() {
        let unique: HashSet<_> = CANONICAL_HEADER.iter().collect();
        assert_eq!(unique.len(), CANONICAL_HEADER.len());
    }

    #[test]
    fn one_hot_columns_are_listed_in_the_header() {
        for column in [
            INTERNET_FIBER_OPTIC,
            INTERNET_NO_SERVICE,
            CONTRACT_ONE_YEAR,
            CONTRACT_TWO_YEAR,
            PAYMENT_CREDIT_CARD,
            PAYMENT_ELECTRONIC_CHECK,
            PAYMENT_MAILED_CHECK,
        ] {
            assert!(CANONICAL_HEADER.contains(&column.canonical));
        }
    }
}
