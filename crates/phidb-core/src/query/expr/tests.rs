use crate::{
    query::expr::{CompareOp, Expr, ParseError},
    value::{ArithOp, Value},
};

fn column(gv: u32, name: &str) -> Expr {
    Expr::Column {
        gv,
        name: name.to_string(),
    }
}

fn name(name: &str) -> Expr {
    Expr::Name(name.to_string())
}

fn compare(op: CompareOp, left: Expr, right: Expr) -> Expr {
    Expr::Compare {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[test]
fn qualified_reference_equality_with_single_equals() {
    let expr = Expr::parse("1.state=state").expect("predicate should parse");

    assert_eq!(expr, compare(CompareOp::Eq, column(1, "state"), name("state")));
}

#[test]
fn conjunction_of_comparisons_with_quoted_literal() {
    let expr = Expr::parse("1.cust = cust AND 1.state = 'NY'").expect("predicate should parse");

    assert_eq!(
        expr,
        Expr::And(vec![
            compare(CompareOp::Eq, column(1, "cust"), name("cust")),
            compare(
                CompareOp::Eq,
                column(1, "state"),
                Expr::Literal(Value::from("NY"))
            ),
        ])
    );
}

#[test]
fn and_binds_tighter_than_or() {
    let expr = Expr::parse("a = 1 or b = 2 and c = 3").expect("predicate should parse");

    let Expr::Or(children) = expr else {
        panic!("top level should be OR");
    };
    assert_eq!(children.len(), 2);
    assert!(matches!(children[1], Expr::And(_)));
}

#[test]
fn not_applies_to_the_following_comparison() {
    let expr = Expr::parse("not 1.quant > 10").expect("predicate should parse");

    assert_eq!(
        expr,
        Expr::Not(Box::new(compare(
            CompareOp::Gt,
            column(1, "quant"),
            Expr::Literal(Value::Int(10))
        )))
    );
}

#[test]
fn inequality_spellings_are_equivalent() {
    let a = Expr::parse("1.x <> 3").expect("<> should parse");
    let b = Expr::parse("1.x != 3").expect("!= should parse");

    assert_eq!(a, b);
    assert_eq!(
        Expr::parse("1.x == 3").expect("== should parse"),
        Expr::parse("1.x = 3").expect("= should parse")
    );
}

#[test]
fn arithmetic_precedence_and_unary_minus() {
    let expr = Expr::parse("avg_1_x - avg_2_x * -2").expect("expression should parse");

    assert_eq!(
        expr,
        Expr::Arith {
            op: ArithOp::Sub,
            left: Box::new(name("avg_1_x")),
            right: Box::new(Expr::Arith {
                op: ArithOp::Mul,
                left: Box::new(name("avg_2_x")),
                right: Box::new(Expr::Neg(Box::new(Expr::Literal(Value::Int(2))))),
            }),
        }
    );
}

#[test]
fn float_literals_are_not_qualified_references() {
    assert_eq!(
        Expr::parse("1.5").expect("float should parse"),
        Expr::Literal(Value::Float(1.5))
    );
    assert_eq!(
        Expr::parse("12.month").expect("reference should parse"),
        column(12, "month")
    );
}

#[test]
fn doubled_quotes_escape_inside_strings() {
    assert_eq!(
        Expr::parse("'O''Brien'").expect("string should parse"),
        Expr::Literal(Value::from("O'Brien"))
    );
}

#[test]
fn parentheses_group_boolean_terms() {
    let expr = Expr::parse("(a = 1 or a = 2) and b = 3").expect("predicate should parse");

    let Expr::And(children) = expr else {
        panic!("top level should be AND");
    };
    assert!(matches!(children[0], Expr::Or(_)));
}

#[test]
fn reports_syntax_errors_with_offsets() {
    assert_eq!(Expr::parse("   "), Err(ParseError::Empty));
    assert_eq!(
        Expr::parse("1.x = 'NY"),
        Err(ParseError::UnterminatedString { position: 6 })
    );
    assert_eq!(
        Expr::parse("1.x # 2"),
        Err(ParseError::UnexpectedChar {
            ch: '#',
            position: 4
        })
    );
    assert_eq!(
        Expr::parse("1.x = "),
        Err(ParseError::UnexpectedEnd {
            expected: "a value, reference or '('"
        })
    );
    assert!(matches!(
        Expr::parse("a < b < c"),
        Err(ParseError::UnexpectedToken {
            expected: "end of expression",
            position: 6,
            ..
        })
    ));
    assert!(matches!(
        Expr::parse("(a = 1"),
        Err(ParseError::UnexpectedEnd { expected: "')'" })
    ));
}

#[test]
fn rejects_out_of_range_integers() {
    assert!(matches!(
        Expr::parse("99999999999999999999"),
        Err(ParseError::InvalidNumber { position: 0, .. })
    ));
}

#[test]
fn nesting_beyond_the_limit_is_rejected() {
    let too_deep = ParseError::TooDeep { limit: 256 };
    let parens = format!("{}1.quant > 0{}", "(".repeat(300), ")".repeat(300));
    let negations = format!("{}1", "- ".repeat(300));
    let nots = format!("{}a = 1", "not ".repeat(300));
    let sum = format!("1{}", " + 1".repeat(300));
    let product = format!("2{}", " * 2".repeat(300));

    for text in [&parens, &negations, &nots, &sum, &product] {
        assert_eq!(Expr::parse(text), Err(too_deep.clone()), "{text}");
    }
}

#[test]
fn nesting_within_the_limit_parses() {
    let parens = format!("{}1.quant > 0{}", "(".repeat(100), ")".repeat(100));
    let sum = format!("1{}", " + 1".repeat(100));

    assert_eq!(
        Expr::parse(&parens).expect("nested predicate should parse"),
        compare(CompareOp::Gt, column(1, "quant"), Expr::Literal(Value::Int(0)))
    );
    assert!(Expr::parse(&sum).is_ok());
}

#[test]
fn siblings_do_not_add_up_to_the_limit() {
    let term = format!("{}a = 1{}", "(".repeat(200), ")".repeat(200));
    let many = vec![term; 4].join(" and ");

    assert!(Expr::parse(&many).is_ok());
}
