use eval::EvalError;
use pretty_assertions::assert_eq;
use rpal::Error;

/// Runs `source` and returns what it printed followed by the rendering of its final value.
fn run(source: &str) -> Result<(String, Option<String>), Error> {
    let mut out = Vec::new();
    let value = rpal::run_source("test.rpal", source, &mut out)?;
    Result::Ok((String::from_utf8(out).unwrap(), value))
}

fn printed(source: &str) -> String {
    match run(source) {
        Result::Ok((out, _)) => out,
        Result::Err(err) => panic!("{}", err),
    }
}

#[test]
fn test_factorial() {
    let source = "
        // the classic
        let rec Fact n = n eq 0 -> 1 | n * Fact (n - 1)
        in Print (Fact 5)
    ";
    assert_eq!(printed(source), "120");
}

#[test]
fn test_sum_of_tuple() {
    let source = "
        let Sum A = Psum (A, Order A)
            where rec Psum (T, N) = N eq 0 -> 0 | Psum (T, N - 1) + T N
        in Print (Sum (1, 2, 3, 4, 5))
    ";
    assert_eq!(printed(source), "15");
}

#[test]
fn test_string_reverse() {
    let source = "
        let rec Rev S = S eq '' -> '' | Conc (Rev (Stern S)) (Stem S)
        in Print (Rev 'hello')
    ";
    assert_eq!(printed(source), "olleh");
}

#[test]
fn test_build_list_with_aug() {
    let source = "
        let rec Upto n = n eq 0 -> nil | (Upto (n - 1) aug n)
        in Print (Upto 4, Null (Upto 0), Istuple (Upto 2))
    ";
    assert_eq!(printed(source), "((1, 2, 3, 4), true, true)");
}

#[test]
fn test_print_escapes_and_order() {
    let source = "
        let a = Print 'first\\n' in
        let b = Print 'second\\tthird' in
        dummy
    ";
    assert_eq!(printed(source), "first\nsecond\tthird");
}

#[test]
fn test_simultaneous_and_within() {
    let source = "
        let x = 3 and y = 4
        in let z = x * y within w = z + 1
        in Print (x, y, w)
    ";
    assert_eq!(printed(source), "(3, 4, 13)");
}

#[test]
fn test_infix_application() {
    let source = "
        let Max x y = x gr y -> x | y
        in Print (1 @Max 7 @Max 3)
    ";
    assert_eq!(printed(source), "7");
}

#[test]
fn test_higher_order() {
    let source = "
        let Compose f g x = f (g x)
        and Twice f = fn x. f (f x)
        and Inc n = n + 1
        in Print (Compose Inc (Twice Inc) 0, Twice (Twice Inc) 0)
    ";
    assert_eq!(printed(source), "(3, 4)");
}

#[test]
fn test_shadowing_does_not_leak() {
    let source = "
        let x = 'outer' in
        let f x = Conc x '!' in
        Print (f 'inner', x)
    ";
    assert_eq!(printed(source), "(inner!, outer)");
}

#[test]
fn test_final_value_is_returned() {
    let (out, value) = run("let x = 2 in x ** 10").unwrap();
    assert_eq!(out, "");
    assert_eq!(value, Option::Some(String::from("1024")));
}

#[test]
fn test_type_error_reports_line() {
    let source = "let x = 1\nin\nx eq 'one'";
    match run(source) {
        Result::Err(Error::Eval(err)) => {
            assert_eq!(err.line(), Option::Some(3));
            assert_eq!(
                err.to_string(),
                "line 3: Cannot compare dissimilar types; was given \"1\", \"one\""
            );
        }
        other => panic!("expected a type error, got {:?}", other),
    }
}

#[test]
fn test_undeclared_identifier() {
    match run("Print y") {
        Result::Err(Error::Eval(EvalError::UndeclaredIdentifier { name, line })) => {
            assert_eq!(name, "y");
            assert_eq!(line, 1);
        }
        other => panic!("expected an undeclared identifier, got {:?}", other),
    }
}

#[test]
fn test_output_before_failure_is_kept() {
    let mut out = Vec::new();
    let result = rpal::run_source("test.rpal", "let a = Print 'ok' in 1 / 0", &mut out);
    assert_eq!(String::from_utf8(out).unwrap(), "ok");
    match result {
        Result::Err(Error::Eval(EvalError::DivisionByZero { line: 1 })) => {}
        other => panic!("expected division by zero, got {:?}", other),
    }
}

#[test]
fn test_syntax_error() {
    match run("let x = in x") {
        Result::Err(Error::Syntax(err)) => assert!(err.message.starts_with("Unexpected 'in'")),
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn test_lexical_error() {
    match run("let x = 'abc in x") {
        Result::Err(Error::Syntax(_)) => {}
        other => panic!("expected a lexical error, got {:?}", other),
    }
}
