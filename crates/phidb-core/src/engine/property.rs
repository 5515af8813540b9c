use crate::{
    engine::Engine,
    phi::parse_phi,
    response::ResultSet,
    source::Relation,
    value::Value,
};
use proptest::prelude::*;
use std::collections::HashMap;

const STATES: [&str; 4] = ["NY", "NJ", "CT", "CA"];

fn arb_rows() -> impl Strategy<Value = Vec<(usize, i64)>> {
    prop::collection::vec((0..STATES.len(), -50_i64..50), 0..24)
}

fn relation(rows: &[(usize, i64)]) -> Relation {
    Relation::from_rows(
        ["state", "quant"],
        rows.iter()
            .map(|&(state, quant)| vec![Value::from(STATES[state]), Value::Int(quant)]),
    )
    .expect("generated relation should be well formed")
}

fn run(text: &str, rows: &[(usize, i64)]) -> ResultSet {
    let phi = parse_phi(text).expect("generated spec should parse");

    Engine::default()
        .execute(&phi, &mut relation(rows))
        .expect("generated run should succeed")
}

// Conventional group-by in first-sighting order: (state, sum, count).
fn group_by(rows: &[(usize, i64)]) -> Vec<(String, i64, i64)> {
    let mut order = Vec::new();
    let mut totals: HashMap<usize, (i64, i64)> = HashMap::new();
    for &(state, quant) in rows {
        let entry = totals.entry(state).or_insert_with(|| {
            order.push(state);
            (0, 0)
        });
        entry.0 += quant;
        entry.1 += 1;
    }

    order
        .into_iter()
        .map(|state| {
            let (sum, count) = totals[&state];
            (STATES[state].to_string(), sum, count)
        })
        .collect()
}

const GROUP_BY_SPEC: &str = "S: state, sum_1_quant, count_1_quant, avg_1_quant, max_1_quant, min_1_quant
n: 1
V: state
F-VECT: sum_1_quant, count_1_quant, avg_1_quant, max_1_quant, min_1_quant
PRED-LIST: 1.state = state
";

proptest! {
    #[test]
    fn grouping_equality_matches_conventional_group_by(rows in arb_rows()) {
        let result = run(GROUP_BY_SPEC, &rows);
        let expected = group_by(&rows);

        prop_assert_eq!(result.len(), expected.len());
        for (row, (state, sum, count)) in result.rows().iter().zip(expected) {
            prop_assert_eq!(&row[0], &Value::Text(state));
            prop_assert_eq!(&row[1], &Value::Int(sum));
            prop_assert_eq!(&row[2], &Value::Int(count));
        }
    }

    #[test]
    fn average_equals_sum_over_count(rows in arb_rows()) {
        let result = run(GROUP_BY_SPEC, &rows);

        for row in result.rows() {
            let (Some(sum), Some(count), Some(avg)) = (row[1].as_f64(), row[2].as_f64(), row[3].as_f64()) else {
                return Err(TestCaseError::fail("aggregates should be numeric"));
            };
            prop_assert!(count > 0.0);
            prop_assert!((avg - sum / count).abs() < 1e-9);
        }
    }

    #[test]
    fn extrema_bound_every_qualifying_value(rows in arb_rows()) {
        let result = run(GROUP_BY_SPEC, &rows);

        for row in result.rows() {
            let Value::Text(state) = &row[0] else {
                return Err(TestCaseError::fail("state should be text"));
            };
            let quants: Vec<i64> = rows
                .iter()
                .filter(|(s, _)| STATES[*s] == state.as_str())
                .map(|&(_, q)| q)
                .collect();

            prop_assert_eq!(&row[4], &Value::Int(quants.iter().copied().max().unwrap_or_default()));
            prop_assert_eq!(&row[5], &Value::Int(quants.iter().copied().min().unwrap_or_default()));
        }
    }

    #[test]
    fn having_only_removes_rows(rows in arb_rows(), threshold in -100_i64..100) {
        let unfiltered = run(GROUP_BY_SPEC, &rows);
        let filtered = run(
            &format!("{GROUP_BY_SPEC}HAVING: sum_1_quant > {threshold}\n"),
            &rows,
        );

        let expected: Vec<&Vec<Value>> = unfiltered
            .rows()
            .iter()
            .filter(|row| matches!(row[1], Value::Int(sum) if sum > threshold))
            .collect();
        let actual: Vec<&Vec<Value>> = filtered.rows().iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn reruns_produce_identical_results(rows in arb_rows()) {
        prop_assert_eq!(run(GROUP_BY_SPEC, &rows), run(GROUP_BY_SPEC, &rows));
    }
}
