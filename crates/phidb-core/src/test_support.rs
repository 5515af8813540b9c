//! Shared fixtures for in-crate tests.

use crate::{
    phi::{PhiOperator, parse_phi},
    source::Relation,
    value::Value,
};

pub(crate) const SALES_COLUMNS: [&str; 5] = ["cust", "prod", "state", "month", "quant"];

/// Small sales relation: three customers across three states.
pub(crate) fn sales_relation() -> Relation {
    let rows = [
        ("Dan", "Apple", "NY", 1, 10),
        ("Dan", "Pear", "NJ", 2, 20),
        ("Amy", "Apple", "NY", 1, 30),
        ("Dan", "Apple", "NY", 3, 40),
        ("Amy", "Pear", "CT", 2, 5),
        ("Sam", "Apple", "NJ", 1, 7),
        ("Amy", "Apple", "NJ", 3, 15),
    ];

    relation(
        &SALES_COLUMNS,
        rows.into_iter()
            .map(|(cust, prod, state, month, quant)| {
                vec![
                    Value::from(cust),
                    Value::from(prod),
                    Value::from(state),
                    Value::Int(month),
                    Value::Int(quant),
                ]
            })
            .collect(),
    )
}

/// Build a relation from column names and row values.
pub(crate) fn relation(columns: &[&str], rows: Vec<Vec<Value>>) -> Relation {
    Relation::from_rows(columns.iter().copied(), rows)
        .expect("fixture relation should be well formed")
}

/// Parse a fixture specification.
pub(crate) fn phi(text: &str) -> PhiOperator {
    parse_phi(text).expect("fixture specification should parse")
}
