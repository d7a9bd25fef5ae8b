//! Whole programs from files, and interactive sessions.

use std::fs;
use std::io::Write;

use mhs_diagnostic::render_to_string;
use mhs_eval::{EvalStats, Interpreter, InterpreterConfig, LineResult};
use pretty_assertions::assert_eq;
use tempfile::{NamedTempFile, TempDir};

const QUEENS: &str = r#"
-- Count the solutions to the n-queens problem.

safe q qs = all (\(d, c) -> q /= c && abs (q - c) /= d) (zip [1..] qs);

abs n = if n < 0 then negate n else n;

place 0 n = [[]];
place k n = concatMap (\qs -> map (\q -> q : qs) (filter (\q -> safe q qs) [1..n]))
                      (place (k - 1) n);

main = length (place 6 6);
"#;

fn interpreter() -> Interpreter {
    Interpreter::new(InterpreterConfig::default()).unwrap()
}

fn defined(result: LineResult) -> Vec<String> {
    match result {
        LineResult::Defined(names) => names.iter().map(|n| n.to_string()).collect(),
        LineResult::Value(value) => panic!("expected definitions, got {value:?}"),
    }
}

fn line(interpreter: &mut Interpreter, source: &str) -> String {
    match interpreter.eval_line(source) {
        Ok(LineResult::Value(value)) => interpreter.render(&value).unwrap(),
        Ok(LineResult::Defined(names)) => panic!("expected a value, defined {names:?}"),
        Err(err) => panic!("{source:?} failed: {err}"),
    }
}

// ============================================================================
// Programs From Files
// ============================================================================

#[test]
fn test_program_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{QUEENS}").unwrap();

    let source = fs::read_to_string(file.path()).unwrap();
    let interpreter = interpreter();
    let value = interpreter.run(&source).unwrap();
    assert_eq!(interpreter.render(&value).unwrap(), "4");
}

#[test]
fn test_program_file_with_user_operators() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ops.mhs");
    fs::write(
        &path,
        "infixr 5 +++;\n\
         xs +++ ys = foldr (:) ys xs;\n\
         main = [1] +++ [2] +++ [3];\n",
    )
    .unwrap();

    let source = fs::read_to_string(&path).unwrap();
    let interpreter = interpreter();
    let value = interpreter.run(&source).unwrap();
    assert_eq!(interpreter.render(&value).unwrap(), "Cons 1 (Cons 2 (Cons 3 Nil))");
}

#[test]
fn test_failing_file_renders_a_diagnostic() {
    let source = "main = go 3;\ngo n = if n == 0 then error \"bottom\" else go (n - 1);\n";
    let err = interpreter().run(source).unwrap_err();
    let report = render_to_string(source, "fail.mhs", &err.to_diagnostic());
    assert!(report.contains("bottom"), "{report}");
    assert!(report.contains("fail.mhs"), "{report}");
}

#[test]
fn test_trace_and_stats_after_run() {
    let interpreter = interpreter();
    let value = interpreter
        .run("main = trace \"start\" (sum (map (* 2) [1..10]));")
        .unwrap();
    assert_eq!(value.as_int(), Some(110));
    assert_eq!(interpreter.evaluator().take_trace_log(), vec!["start".to_string()]);
    assert!(interpreter.trace_log().is_empty());

    let stats = interpreter.stats();
    assert!(stats.thunks_forced > 0);
    assert!(stats.to_string().contains("thunks forced:"));
    assert_ne!(stats, EvalStats::default());
}

// ============================================================================
// Sessions
// ============================================================================

#[test]
fn test_session_accumulates_definitions() {
    let mut interpreter = interpreter();
    assert_eq!(defined(interpreter.eval_line("square x = x * x;").unwrap()), vec!["square"]);
    assert_eq!(
        defined(interpreter.eval_line("a = 3; b = square a;").unwrap()),
        vec!["a", "b"]
    );
    assert_eq!(line(&mut interpreter, "a + b"), "12");

    let names: Vec<&str> = interpreter.session_names().iter().map(|n| &**n).collect();
    assert_eq!(names, vec!["square", "a", "b"]);
}

#[test]
fn test_redefinition_shadows() {
    let mut interpreter = interpreter();
    interpreter.eval_line("x = 1;").unwrap();
    interpreter.eval_line("y = x + 1;").unwrap();
    interpreter.eval_line("x = 10;").unwrap();

    assert_eq!(line(&mut interpreter, "x"), "10");
    // Earlier definitions keep the binding they were defined against.
    assert_eq!(line(&mut interpreter, "y"), "2");
    assert_eq!(interpreter.session_names().len(), 2);
}

#[test]
fn test_session_fixities_persist() {
    let mut interpreter = interpreter();
    interpreter.eval_line("infixr 5 +++; a +++ b = a <> b;").unwrap();
    assert_eq!(line(&mut interpreter, "\"a\" +++ \"b\" +++ \"c\""), "\"abc\"");
}

#[test]
fn test_errors_leave_the_session_usable() {
    let mut interpreter = interpreter();
    interpreter.eval_line("n = 5;").unwrap();
    assert!(interpreter.eval_line("n +").is_err());
    assert!(interpreter.eval_line("n `div` 0").is_err());
    assert!(interpreter.eval_line("missing").is_err());
    assert_eq!(line(&mut interpreter, "n * 2"), "10");
}

#[test]
fn test_loading_a_file_into_a_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lib.mhs");
    fs::write(&path, "twice f x = f (f x);\ninc = (+ 1);\n").unwrap();

    let mut interpreter = interpreter();
    let source = fs::read_to_string(&path).unwrap();
    assert_eq!(defined(interpreter.eval_line(&source).unwrap()), vec!["twice", "inc"]);
    assert_eq!(line(&mut interpreter, "twice inc 0"), "2");
}

#[test]
fn test_visible_names_include_builtins_and_prelude() {
    let mut interpreter = interpreter();
    interpreter.eval_line("mine = 1;").unwrap();
    let visible: Vec<String> = interpreter.visible_names().iter().map(|n| n.to_string()).collect();
    for name in ["+", "seq", "map", "foldr", "mine"] {
        assert!(visible.iter().any(|v| v == name), "{name} not visible");
    }
}
