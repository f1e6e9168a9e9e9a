use blueprint::{Interpreter, MAX_CALL_DEPTH, RuntimeError, STACK_SIZE, Value};

fn eval(code: &str) -> Result<Value, RuntimeError> {
    Interpreter::new()?.run(code)
}

fn expect_eval(code: &str) -> String {
    match eval(code) {
        Ok(value) => value.to_string(),
        Err(err) => panic!("evaluating {code:?} failed: {err}"),
    }
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn handles_basic_arithmetic() {
    assert_eq!(expect_eval("(+ 1 2 3)"), "6");
    assert_eq!(expect_eval("(- 6 2 3)"), "1");
    assert_eq!(expect_eval("(* 2 2 3)"), "12");
    assert_eq!(expect_eval("(/ 12 2 3)"), "2");
}

#[test]
fn single_argument_primitive_call() {
    assert_eq!(expect_eval("(- 5)"), "5");
    assert_eq!(expect_eval("(* 7)"), "7");
}

#[test]
fn can_join_strings() {
    assert_eq!(eval("(+ \"foo\" \"bar\")"), Ok(Value::from("foobar")));
}

#[test]
fn has_a_modulo_operator() {
    assert_eq!(expect_eval("(% 12 5)"), "2");
    assert_eq!(expect_eval("(% 12 6)"), "0");
}

#[test]
fn handles_quotes() {
    assert_eq!(expect_eval("(quote (1 2 3))"), "(1 2 3)");
}

#[test]
fn handles_syntactic_sugar_for_quotes() {
    assert_eq!(eval("'a"), Ok(Value::id("a")));
    assert_eq!(expect_eval("'(1 2 3)"), "(1 2 3)");
}

#[test]
fn handles_conditionals() {
    assert_eq!(expect_eval("(cond ((== 1 2) 3) (else 4))"), "4");
    assert_eq!(expect_eval("(cond ((== 1 1) 3) (else 4))"), "3");
}

#[test]
fn handles_cons() {
    assert_eq!(expect_eval("(cons 1 (quote ()))"), "(1)");
    assert_eq!(expect_eval("(cons 1 (quote (2 3)))"), "(1 2 3)");
    assert_eq!(expect_eval("(cons (quote (1 2)) (quote (3 4)))"), "((1 2) 3 4)");
}

#[test]
fn handles_first() {
    assert_eq!(expect_eval("(first (quote (1 2 3)))"), "1");
    assert_eq!(
        eval("(first (quote ()))"),
        Err(RuntimeError::EmptySequenceAccess("first", "()".into()))
    );
}

#[test]
fn handles_rest() {
    assert_eq!(expect_eval("(rest (quote (1)))"), "()");
    assert_eq!(expect_eval("(rest (quote (1 2 3 4)))"), "(2 3 4)");
    assert_eq!(
        eval("(rest (quote ()))"),
        Err(RuntimeError::EmptySequenceAccess("rest", "()".into()))
    );
}

#[test]
fn handles_list() {
    assert_eq!(expect_eval("(list 1 2 3)"), "(1 2 3)");
    assert_eq!(expect_eval("(define a 3) (list 1 2 a)"), "(1 2 3)");
}

#[test]
fn can_set_a_variable_in_a_let_expression() {
    assert_eq!(expect_eval("(let ((a 1)) (set! a 2) a)"), "2");
}

#[test]
fn can_set_a_variable_in_a_nested_let_expression() {
    assert_eq!(
        expect_eval("(let ((a 1)) (let ((b 2)) (set! a 2)) a)"),
        "2"
    );
}

#[test]
fn set_on_an_unbound_variable_fails() {
    assert_eq!(
        eval("(set! a 2)"),
        Err(RuntimeError::UnboundAssignment("a".into()))
    );
}

#[test]
fn unbound_identifiers_fail() {
    assert_eq!(
        eval("(+ 1 b)"),
        Err(RuntimeError::UnboundIdentifier("b".into()))
    );
}

#[test]
fn can_define_a_variable() {
    assert_eq!(expect_eval("(define a 2) a"), "2");
}

#[test]
fn can_define_a_function() {
    assert_eq!(expect_eval("(define (square x) (* x x)) (square 3)"), "9");
}

#[test]
fn handles_recursion() {
    assert_eq!(
        expect_eval(
            "(define (fact n) (cond ((== n 0) 1) (else (* n (fact (- n 1))))))
             (fact 6)"
        ),
        "720"
    );
}

#[test]
fn supports_user_defined_macros() {
    assert_eq!(
        expect_eval(
            "(defmacro (my-let bindings body)
               (cons (list (quote lambda)
                           (map (lambda (binding) (first binding))
                                bindings)
                           body)
                     (map (lambda (x) (first (rest x))) bindings)))
             (my-let ((a 2) (b 3)) (+ a b))"
        ),
        "5"
    );
}

#[test]
fn supports_defining_anaphoric_macros() {
    assert_eq!(
        expect_eval(
            "(defmacro (aif condition consequent alternative)
               (list (quote let) (list (list (quote it) condition))
                     (list (quote if) (quote it) consequent alternative)))
             (define (square x) (* x x))
             (aif (+ 1 2 3 4)
                  (square it)
                  0)"
        ),
        "100"
    );
}

#[test]
fn macro_templates_see_the_calling_scope() {
    assert_eq!(
        expect_eval(
            "(define (twice expr) (list (quote +) expr expr))
             (defmacro (double x) (twice x))
             (let ((n 4)) (double n))"
        ),
        "8"
    );
}

#[test]
fn can_slurp_the_contents_of_a_file_into_a_string() {
    let code = format!("(slurp-file \"{}\")", fixture("content.txt"));

    assert_eq!(eval(&code), Ok(Value::from("here's some content!")));
}

#[test]
fn slurping_a_missing_file_fails() {
    assert!(matches!(
        eval("(slurp-file \"does/not/exist.txt\")"),
        Err(RuntimeError::Io(..))
    ));
}

#[test]
fn can_read_asts_from_strings() {
    assert_eq!(expect_eval("(read \"(+ 1 2 3)\")"), "((+ 1 2 3))");
}

#[test]
fn can_apply_a_function_to_a_list() {
    assert_eq!(expect_eval("(apply '+ '(1 2))"), "3");
    assert_eq!(expect_eval("(apply (lambda (a b) (- a b)) '(5 2))"), "3");
}

#[test]
fn can_eval_lists() {
    assert_eq!(expect_eval("(eval '(+ 1 2))"), "3");
}

#[test]
fn expands_quasiquoted_literals() {
    assert_eq!(expect_eval("`4"), "4");
}

#[test]
fn evaluates_and_inserts_unquoted_expressions() {
    assert_eq!(expect_eval("`(,(+ 1 2) 3)"), "(3 3)");
}

#[test]
fn handles_an_unquote_right_after_a_quasiquote() {
    assert_eq!(expect_eval("`,(+ 1 2)"), "3");
}

#[test]
fn splices_unquoted_lists() {
    assert_eq!(expect_eval("`(1 ,@(list 2 3) 4)"), "(1 2 3 4)");
    assert_eq!(expect_eval("`(a (b ,(+ 1 1)))"), "(a (b 2))");
}

#[test]
fn a_repl_session_keeps_its_definitions() {
    let interpreter = Interpreter::new().unwrap();

    interpreter.run("(define (square x) (* x x))").unwrap();
    assert!(interpreter.run("(square)").is_err());
    assert_eq!(interpreter.run("(square 5)"), Ok(Value::Int(25)));
}

#[test]
fn deep_recursion_fails_without_killing_the_interpreter() {
    let session = std::thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(|| {
            let interpreter = Interpreter::new().unwrap();

            interpreter
                .run("(define (count n) (if (== n 0) 0 (+ 1 (count (- n 1)))))")
                .unwrap();
            assert_eq!(interpreter.run("(count 2000)"), Ok(Value::Int(2000)));

            assert_eq!(
                interpreter.run("(define (f) (f)) (f)"),
                Err(RuntimeError::RecursionLimit(MAX_CALL_DEPTH))
            );
            assert_eq!(interpreter.run("(count 3)"), Ok(Value::Int(3)));
        })
        .unwrap();

    session.join().unwrap();
}
