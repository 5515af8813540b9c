use super::*;

fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(ToString::to_string).collect()
}

#[test]
fn text_is_left_aligned_and_numbers_right_aligned() {
    let table = render_table(
        &strings(&["cust", "avg_1_quant"]),
        &[
            strings(&["Dan", "25.0"]),
            strings(&["Amy", "30.0"]),
            strings(&["Sam", "12.5"]),
        ],
    );

    assert_eq!(
        table,
        "\
+--------+---------------+
| cust   |   avg_1_quant |
|--------+---------------|
| Dan    |          25.0 |
| Amy    |          30.0 |
| Sam    |          12.5 |
+--------+---------------+
"
    );
}

#[test]
fn null_cells_do_not_decide_column_alignment() {
    let table = render_table(
        &strings(&["state", "max_1_quant"]),
        &[strings(&["NY", "NULL"]), strings(&["NJ", "7"])],
    );

    assert_eq!(
        table,
        "\
+---------+---------------+
| state   |   max_1_quant |
|---------+---------------|
| NY      |          NULL |
| NJ      |             7 |
+---------+---------------+
"
    );
}

#[test]
fn numbers_line_up_on_the_decimal_point() {
    let table = render_table(
        &strings(&["x"]),
        &[strings(&["1.5"]), strings(&["10"]), strings(&["0.25"])],
    );

    assert_eq!(
        table,
        "\
+-------+
|     x |
|-------|
|  1.5  |
| 10    |
|  0.25 |
+-------+
"
    );
}

#[test]
fn infinities_and_nan_are_text() {
    let table = render_table(
        &strings(&["value"]),
        &[strings(&["-inf"]), strings(&["NaN"]), strings(&["3"])],
    );

    assert_eq!(
        table,
        "\
+---------+
| value   |
|---------|
| -inf    |
| NaN     |
| 3       |
+---------+
"
    );
}

#[test]
fn number_shapes_follow_value_rendering() {
    for cell in ["0", "-7", "2.5", "-0.125", "1e20", "1.5e-7"] {
        assert!(is_number(cell), "{cell} should be numeric");
    }
    for cell in ["inf", "-inf", "NaN", "", "-", "1.", ".5", "+1", "1e", "12 apples"] {
        assert!(!is_number(cell), "{cell} should be text");
    }
}

#[test]
fn empty_result_keeps_header_and_borders() {
    let table = render_table(&strings(&["k", "x"]), &[]);

    assert_eq!(
        table,
        "\
+-----+-----+
| k   | x   |
|-----+-----|
+-----+-----+
"
    );
}

#[test]
fn wide_cells_widen_their_column() {
    let table = render_table(&strings(&["k"]), &[strings(&["customer"])]);

    assert!(table.starts_with("+----------+\n| k        |\n"));
    assert!(table.contains("| customer |\n"));
}

#[test]
fn sink_writes_the_rendered_table() {
    let mut sink = PsqlTableSink::new(Vec::new());

    sink.write_result(&strings(&["n"]), &[strings(&["1"])])
        .expect("vec writer should accept the table");

    let written = String::from_utf8(sink.into_inner()).expect("table should be utf-8");
    assert_eq!(written, render_table(&strings(&["n"]), &[strings(&["1"])]));
    assert!(written.contains("|   n |\n"));
}
