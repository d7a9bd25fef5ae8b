//! Integration tests for mhs-eval crate.
//!
//! Programs are evaluated through the public `run` entry point, with the
//! prelude loaded unless a test says otherwise.

use mhs_eval::{Interpreter, InterpreterConfig, InterpreterError, Value, run, run_to_string};

fn int(source: &str) -> i64 {
    match run(source) {
        Ok(value) => value
            .as_int()
            .unwrap_or_else(|| panic!("{source:?} is not an integer: {value:?}")),
        Err(err) => panic!("{source:?} failed: {err}"),
    }
}

fn boolean(source: &str) -> bool {
    run(source).unwrap().as_bool().unwrap()
}

fn shown(source: &str) -> String {
    run_to_string(source).unwrap_or_else(|e| panic!("{source:?} failed: {e}"))
}

// ============================================================================
// Literals and Arithmetic
// ============================================================================

#[test]
fn test_integer_literal() {
    assert_eq!(int("42"), 42);
    assert_eq!(int("0"), 0);
    assert_eq!(int("-7"), -7);
    assert_eq!(int("9223372036854775807"), i64::MAX);
}

#[test]
fn test_string_literal() {
    let value = run("\"hello\"").unwrap();
    assert_eq!(value.as_str(), Some("hello"));
}

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(int("1 + 2 * 3"), 7);
    assert_eq!(int("(1 + 2) * 3"), 9);
    assert_eq!(int("10 - 3 - 2"), 5);
    assert_eq!(int("2 * (-3) + 1"), -5);
    assert_eq!(int("-2 * 3"), -6);
}

#[test]
fn test_division_variants() {
    assert_eq!(int("7 / 2"), 3);
    assert_eq!(int("(-7) / 2"), -3);
    assert_eq!(int("(-7) `div` 2"), -4);
    assert_eq!(int("(-7) `mod` 2"), 1);
    assert_eq!(int("(-7) % 2"), -1);
    assert_eq!(int("-7 `div` 2"), -3);
}

#[test]
fn test_negate() {
    assert_eq!(int("negate 5"), -5);
    assert_eq!(int("let x = 3 in - x"), -3);
}

// ============================================================================
// Comparison and Booleans
// ============================================================================

#[test]
fn test_comparisons() {
    assert!(boolean("1 < 2"));
    assert!(!boolean("2 <= 1"));
    assert!(boolean("\"abc\" < \"abd\""));
    assert!(boolean("3 /= 4"));
    assert!(boolean("3 != 4"));
}

#[test]
fn test_structural_equality() {
    assert!(boolean("[1, 2, 3] == [1, 2, 3]"));
    assert!(!boolean("[1, 2] == [1, 2, 3]"));
    assert!(boolean("(1, \"a\") == (1, \"a\")"));
    assert!(boolean("Just 1 /= Nothing"));
}

#[test]
fn test_boolean_operators_short_circuit() {
    assert!(!boolean("False && error \"unreachable\""));
    assert!(boolean("True || error \"unreachable\""));
    assert!(boolean("not False"));
}

#[test]
fn test_if_then_else() {
    assert_eq!(int("if 1 < 2 then 10 else 20"), 10);
    assert_eq!(int("if 1 > 2 then 10 else 20"), 20);
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_curried_lambda() {
    assert_eq!(int("(\\a -> \\b -> a + b) 3 4"), 7);
    assert_eq!(int("(\\a b -> a - b) 10 4"), 6);
}

#[test]
fn test_partial_application_is_a_function() {
    let value = run("(\\a -> \\b -> a + b) 3").unwrap();
    assert!(value.is_function());
    assert!(matches!(value, Value::Closure(_)));
}

#[test]
fn test_partial_primitive() {
    assert!(run("(+) 1").unwrap().is_function());
    assert_eq!(int("let inc = (+) 1 in inc 41"), 42);
}

#[test]
fn test_sections() {
    assert_eq!(int("(+ 1) 2"), 3);
    assert_eq!(int("(10 -) 4"), 6);
    assert_eq!(int("(`div` 2) 9"), 4);
}

#[test]
fn test_closures_capture_environment() {
    assert_eq!(int("let a = 10; f x = x + a in let a = 100 in f 1"), 11);
}

#[test]
fn test_higher_order() {
    assert_eq!(int("let twice f x = f (f x) in twice (\\x -> x * 3) 2"), 18);
}

#[test]
fn test_operator_definition() {
    assert_eq!(int("x <+> y = x * 10 + y; main = 1 <+> 2 <+> 3;"), 123);
}

#[test]
fn test_backquoted_user_function() {
    assert_eq!(int("plus a b = a + b; main = 1 `plus` 2;"), 3);
}

// ============================================================================
// Let and Shadowing
// ============================================================================

#[test]
fn test_let_shadowing() {
    assert_eq!(int("let x = 1 in let x = 2 in x"), 2);
    assert_eq!(int("let x = 1 in (let x = 2 in x) + x"), 3);
}

#[test]
fn test_lambda_shadows_let() {
    assert_eq!(int("let x = 1 in (\\x -> x) 5"), 5);
}

#[test]
fn test_mutual_recursion() {
    let source = "
        isEven n = if n == 0 then True else isOdd (n - 1);
        isOdd n = if n == 0 then False else isEven (n - 1);
        main = if isEven 10 then 1 else 0;
    ";
    assert_eq!(int(source), 1);
}

#[test]
fn test_recursive_let() {
    assert_eq!(
        int("let fact n = if n == 0 then 1 else n * fact (n - 1) in fact 10"),
        3628800
    );
}

// ============================================================================
// Case and Patterns
// ============================================================================

#[test]
fn test_first_match_wins() {
    assert_eq!(int("case 1 of { 1 -> 10; 1 -> 20; _ -> 30 }"), 10);
    assert_eq!(int("case 5 of { x -> x; 5 -> 0 }"), 5);
}

#[test]
fn test_constructor_patterns() {
    assert_eq!(int("case Just 4 of { Nothing -> 0; Just n -> n * 2 }"), 8);
    assert_eq!(int("case [1, 2, 3] of { (a:b:_) -> a + b; _ -> 0 }"), 3);
    assert_eq!(int("case (1, (2, 3)) of { (a, (b, c)) -> a + b + c }"), 6);
}

#[test]
fn test_string_patterns() {
    assert_eq!(int("case \"b\" of { \"a\" -> 1; \"b\" -> 2; _ -> 3 }"), 2);
}

#[test]
fn test_negative_literal_pattern() {
    assert_eq!(int("case -1 of { -1 -> 1; _ -> 0 }"), 1);
}

#[test]
fn test_multi_clause_definitions() {
    let source = "
        fib 0 = 0;
        fib 1 = 1;
        fib n = fib (n - 1) + fib (n - 2);
        main = fib 15;
    ";
    assert_eq!(int(source), 610);
}

#[test]
fn test_multi_argument_patterns() {
    let source = "
        zip2 (x:xs) (y:ys) = (x, y) : zip2 xs ys;
        zip2 _ _ = [];
        main = length (zip2 [1, 2, 3] [4, 5]);
    ";
    assert_eq!(int(source), 2);
}

// ============================================================================
// Constructors
// ============================================================================

#[test]
fn test_constructors_are_open() {
    assert_eq!(shown("Leaf"), "Leaf");
    assert_eq!(shown("Node Leaf 1 Leaf"), "Node Leaf 1 Leaf");
}

#[test]
fn test_constructor_value_accepts_more_fields() {
    assert_eq!(shown("let mk = Pair 1 in mk 2"), "Pair 1 2");
    assert_eq!(shown("map Just [1, 2]"), "Cons (Just 1) (Cons (Just 2) Nil)");
}

#[test]
fn test_cons_operator_as_function() {
    assert_eq!(shown("foldr (:) [] [1, 2]"), "Cons 1 (Cons 2 Nil)");
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_primitives() {
    assert_eq!(run("\"ab\" <> \"cd\"").unwrap().as_str(), Some("abcd"));
    assert_eq!(run("show 42").unwrap().as_str(), Some("42"));
    assert_eq!(run("show \"x\"").unwrap().as_str(), Some("\"x\""));
    assert_eq!(run("show [1]").unwrap().as_str(), Some("Cons 1 Nil"));
    assert_eq!(int("strLength \"héllo\""), 5);
}

// ============================================================================
// Entry Point and Configuration
// ============================================================================

#[test]
fn test_module_evaluates_main() {
    assert_eq!(int("double x = x * 2; main = double 21;"), 42);
}

#[test]
fn test_custom_entry() {
    let config = InterpreterConfig::default().with_entry("start");
    let interpreter = Interpreter::new(config).unwrap();
    assert_eq!(interpreter.run("start = 7; main = 1;").unwrap().as_int(), Some(7));
}

#[test]
fn test_missing_main() {
    let err = run("f x = x;").unwrap_err();
    assert!(matches!(err, InterpreterError::UnboundVariable { ref name, .. } if name == "main"));
}

#[test]
fn test_without_prelude_only_primitives() {
    let interpreter = Interpreter::new(InterpreterConfig::default().with_prelude(false)).unwrap();
    assert_eq!(interpreter.run("head (tail [1, 2])").unwrap().as_int(), Some(2));
    assert!(matches!(
        interpreter.run("map"),
        Err(InterpreterError::UnboundVariable { .. })
    ));
}

#[test]
fn test_tail_recursion_runs_in_constant_stack() {
    let source = "
        count n acc = if n == 0 then acc else case acc + 1 of { a -> count (n - 1) a };
        main = count 1000000 0;
    ";
    assert_eq!(int(source), 1_000_000);
}

#[test]
fn test_deep_non_tail_recursion() {
    let source = "
        sumTo n = if n == 0 then 0 else n + sumTo (n - 1);
        main = sumTo 100000;
    ";
    assert_eq!(int(source), 5_000_050_000);
}
