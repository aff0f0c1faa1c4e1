//! Property: parsed expressions agree with native checked integer arithmetic,
//! and assignment sequences behave like sequential updates.

use fvm_eval::{exec_all, parse_expr, parse_stmts, EvalError, Evaluation, Value};
use proptest::prelude::*;

fn env(x: i64, y: i64) -> Evaluation {
    let mut eval = Evaluation::new();
    eval.insert("x".to_string(), Value::Int(x));
    eval.insert("y".to_string(), Value::Int(y));
    eval
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn arithmetic_matches_native(x in -10_000i64..10_000, y in -10_000i64..10_000) {
        let eval = env(x, y);
        let expr = parse_expr("x * 3 + y - (x - y) * 2").unwrap();
        prop_assert_eq!(expr.eval(&eval), Ok(Value::Int(x * 3 + y - (x - y) * 2)));

        let div = parse_expr("x / y").unwrap().eval(&eval);
        if y == 0 {
            prop_assert_eq!(div, Err(EvalError::DivisionByZero));
        } else {
            prop_assert_eq!(div, Ok(Value::Int(x / y)));
        }
    }

    #[test]
    fn comparisons_match_native(x in -100i64..100, y in -100i64..100) {
        let eval = env(x, y);
        let check = |src: &str, expected: bool| {
            parse_expr(src).unwrap().eval_bool(&eval) == Ok(expected)
        };
        prop_assert!(check("x < y", x < y));
        prop_assert!(check("x <= y && !(x > y)", x <= y));
        prop_assert!(check("x == y || x != y", true));
        prop_assert!(check("x >= y", x >= y));
    }

    #[test]
    fn assignments_are_sequential(x in -1_000i64..1_000, y in -1_000i64..1_000) {
        // Swap through a temporary
        let stmts = parse_stmts("t := x; x := y; y := t").unwrap();
        let out = exec_all(&stmts, &env(x, y)).unwrap();
        prop_assert_eq!(out.get("x"), Some(&Value::Int(y)));
        prop_assert_eq!(out.get("y"), Some(&Value::Int(x)));
        prop_assert_eq!(out.get("t"), Some(&Value::Int(x)));
    }
}
