use crate::phi::{AggregateFn, AggregateKind, GroupingVar, PhiOperator, SpecError, parse_phi};

const CLASSIC_SPEC: &str = "
S: cust, avg_1_quant, avg_2_quant, avg_3_quant
n: 3
V: cust
F-VECT: avg_1_quant, avg_2_quant, avg_3_quant, count_1_quant
PRED-LIST: 1.cust=cust and 1.state='NY'; 2.cust=cust and 2.state='NJ'; 3.cust=cust and 3.state='CT'
HAVING: avg_1_quant > avg_2_quant
";

fn gv(number: u32) -> GroupingVar {
    GroupingVar::new(number).expect("grouping variable should be non-zero")
}

#[test]
fn parses_the_classic_emf_specification() {
    let phi = parse_phi(CLASSIC_SPEC).expect("spec should parse");

    assert_eq!(
        phi.select(),
        ["cust", "avg_1_quant", "avg_2_quant", "avg_3_quant"]
    );
    assert_eq!(phi.grouping_var_count(), 3);
    assert_eq!(phi.grouping_attrs(), ["cust"]);
    assert_eq!(phi.aggregates().len(), 4);
    assert_eq!(phi.aggregates()[3].kind(), AggregateKind::Count);
    assert_eq!(phi.aggregates()[3].gv(), gv(1));
    assert_eq!(
        phi.predicate(gv(2)),
        Some("2.cust=cust and 2.state='NJ'")
    );
    assert_eq!(phi.having(), Some("avg_1_quant > avg_2_quant"));
}

#[test]
fn from_str_matches_parse_phi() {
    let parsed: PhiOperator = CLASSIC_SPEC.parse().expect("spec should parse");

    assert_eq!(parsed, parse_phi(CLASSIC_SPEC).expect("spec should parse"));
}

#[test]
fn having_none_means_no_filter() {
    let phi = parse_phi("S: state\nn: 1\nV: state\nHAVING: none\n").expect("spec should parse");

    assert_eq!(phi.having(), None);
    assert!(phi.aggregates().is_empty());
}

#[test]
fn missing_predicates_are_always_true() {
    let phi = parse_phi("S: a\nn: 3\nV: a\nPRED-LIST: 1.a = a;;\n").expect("spec should parse");

    assert_eq!(phi.predicate(gv(1)), Some("1.a = a"));
    assert_eq!(phi.predicate(gv(2)), None);
    assert_eq!(phi.predicate(gv(3)), None);
}

#[test]
fn semicolons_inside_quotes_do_not_split_predicates() {
    let phi = parse_phi("S: a\nn: 2\nV: a\nPRED-LIST: 1.note = 'x;y'; 2.a = a\n")
        .expect("spec should parse");

    assert_eq!(phi.predicate(gv(1)), Some("1.note = 'x;y'"));
    assert_eq!(phi.predicate(gv(2)), Some("2.a = a"));
}

#[test]
fn unknown_keys_comments_and_blank_lines_are_ignored() {
    let spec = "# report\n\nS: a\nn: 1\nV: a\nTITLE: ignored\n";

    assert!(parse_phi(spec).is_ok());
}

#[test]
fn keys_match_case_insensitively() {
    let phi = parse_phi("s: a\nN: 2\nv: a\nf-vect: sum_2_q\n").expect("spec should parse");

    assert_eq!(phi.grouping_var_count(), 2);
    assert_eq!(phi.aggregates()[0].name(), "sum_2_q");
}

#[test]
fn aggregate_attribute_may_contain_underscores() {
    let aggregate = AggregateFn::parse("max_2_unit_price", 2).expect("descriptor should parse");

    assert_eq!(aggregate.kind(), AggregateKind::Max);
    assert_eq!(aggregate.attribute(), "unit_price");
    assert_eq!(aggregate.name(), "max_2_unit_price");
}

#[test]
fn aggregate_name_keeps_its_declared_spelling() {
    let aggregate = AggregateFn::parse("SUM_1_quant", 1).expect("descriptor should parse");

    assert_eq!(aggregate.kind(), AggregateKind::Sum);
    assert_eq!(aggregate.gv(), gv(1));
    assert_eq!(aggregate.name(), "SUM_1_quant");
}

#[test]
fn grouping_variable_must_be_plain_digits() {
    for (text, number) in [("sum_+1_q", "+1"), ("sum_01_q", "01"), ("sum_1x_q", "1x")] {
        assert_eq!(
            AggregateFn::parse(text, 2),
            Err(SpecError::GroupingVarOutOfRange {
                text: text.to_string(),
                gv: number.to_string(),
                n: 2,
            }),
            "descriptor {text}"
        );
    }
}

#[test]
fn rejects_non_integer_grouping_variable_count() {
    let err = parse_phi("S: a\nn: two\nV: a\n").expect_err("bad n should fail");
    assert_eq!(err, SpecError::InvalidGroupingVarCount("two".to_string()));

    let err = parse_phi("S: a\nn: 0\nV: a\n").expect_err("zero n should fail");
    assert_eq!(err, SpecError::InvalidGroupingVarCount("0".to_string()));
}

#[test]
fn rejects_out_of_range_grouping_variable() {
    let err = parse_phi("S: a\nn: 2\nV: a\nF-VECT: sum_3_q\n").expect_err("gv 3 should fail");

    assert_eq!(
        err,
        SpecError::GroupingVarOutOfRange {
            text: "sum_3_q".to_string(),
            gv: "3".to_string(),
            n: 2,
        }
    );

    let err = AggregateFn::parse("sum_0_q", 2).expect_err("gv 0 should fail");
    assert!(matches!(err, SpecError::GroupingVarOutOfRange { .. }));
}

#[test]
fn rejects_unknown_aggregate_kind() {
    let err = AggregateFn::parse("median_1_q", 1).expect_err("median should fail");

    assert_eq!(
        err,
        SpecError::UnknownAggregateKind {
            text: "median_1_q".to_string(),
            kind: "median".to_string(),
        }
    );
}

#[test]
fn rejects_malformed_descriptors() {
    for text in ["sum", "sum_1", "sum__q", "_1_q", "sum_1_"] {
        assert_eq!(
            AggregateFn::parse(text, 1),
            Err(SpecError::MalformedAggregate(text.to_string())),
            "descriptor {text}"
        );
    }
}

#[test]
fn rejects_too_many_predicates() {
    let err = parse_phi("S: a\nn: 1\nV: a\nPRED-LIST: 1.a=a; 2.a=a\n")
        .expect_err("two predicates for n=1 should fail");

    assert_eq!(
        err,
        SpecError::PredicateCountMismatch {
            expected: 1,
            found: 2
        }
    );
}

#[test]
fn rejects_structural_mistakes() {
    assert_eq!(
        parse_phi("S: a\nn 1\nV: a\n"),
        Err(SpecError::MalformedLine {
            line: 2,
            text: "n 1".to_string()
        })
    );
    assert_eq!(
        parse_phi("S: a\nn: 1\nV: a\nS: b\n"),
        Err(SpecError::DuplicateKey { key: "S", line: 4 })
    );
    assert_eq!(
        parse_phi("S: a\nn: 1\n"),
        Err(SpecError::MissingKey("V"))
    );
    assert_eq!(
        parse_phi("S: a,,b\nn: 1\nV: a\n"),
        Err(SpecError::EmptyItem {
            key: "S",
            position: 2
        })
    );
    assert_eq!(
        parse_phi("S: a\nn: 1\nV: a, a\n"),
        Err(SpecError::DuplicateGroupingAttr("a".to_string()))
    );
    assert_eq!(
        parse_phi("S: a\nn: 1\nV: a\nF-VECT: sum_1_q, sum_1_q\n"),
        Err(SpecError::DuplicateAggregate("sum_1_q".to_string()))
    );
}

#[test]
fn rejects_names_shared_by_attributes_and_aggregates() {
    let err = PhiOperator::new(
        vec!["sum_1_q".to_string()],
        1,
        vec!["sum_1_q".to_string()],
        vec![AggregateFn::new(AggregateKind::Sum, gv(1), "q")],
        Vec::new(),
        None,
    )
    .expect_err("ambiguous name should fail");

    assert_eq!(err, SpecError::AmbiguousName("sum_1_q".to_string()));
}
