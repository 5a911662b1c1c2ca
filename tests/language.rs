use cleat::{Environment, interpreter::lexer::tokenize};

fn load(source: &str) -> Environment {
    let mut env = Environment::new();

    if let Err(e) = env.load("test", source) {
        panic!("Script failed: {e}\nScript:\n{source}");
    }

    env
}

fn assert_success(source: &str) {
    load(source);
}

fn assert_failure(source: &str) -> String {
    let mut env = Environment::new();

    match env.load("test", source) {
        Ok(()) => panic!("Script succeeded but was expected to fail:\n{source}"),
        Err(e) => e.to_string(),
    }
}

fn int_variable(env: &Environment, name: &str) -> i32 {
    env.get_variable(name)
       .unwrap_or_else(|| panic!("no variable named '{name}'"))
       .get::<i32>()
}

#[test]
fn declarations_and_arithmetic() {
    let env = load("int a = 2; int b = 3; int sum = a + b;");
    assert_eq!(int_variable(&env, "sum"), 5);

    let env = load("int a = 8; int b = 5; int diff = a - b;");
    assert_eq!(int_variable(&env, "diff"), 3);

    let env = load("int a = 7; int b = 9; int product = a * b;");
    assert_eq!(int_variable(&env, "product"), 63);

    let env = load("int a = 10; int b = 2; int quotient = a / b;");
    assert_eq!(int_variable(&env, "quotient"), 5);
}

#[test]
fn flat_precedence_is_left_associative() {
    // there is no precedence table: `a + b * 2` groups as `(a + b) * 2`
    let env = load("int a = 2; int b = 3; int c = a + b * 2;");
    assert_eq!(int_variable(&env, "c"), 10);

    // parentheses regroup as usual
    let env = load("int a = 2; int b = 3; int c = a + (b * 2);");
    assert_eq!(int_variable(&env, "c"), 8);
}

#[test]
fn numeric_literal_suffixes() {
    let env = load("float x = 2.5f; double y = 1.25; int n = 42; uint32_t u = 7u; int h = 0x10;");

    assert_eq!(env.get_variable("x").unwrap().get::<f32>(), 2.5);
    assert_eq!(env.get_variable("y").unwrap().get::<f64>(), 1.25);
    assert_eq!(env.get_variable("n").unwrap().get::<i32>(), 42);
    assert_eq!(env.get_variable("u").unwrap().get::<u32>(), 7);
    assert_eq!(env.get_variable("h").unwrap().get::<i32>(), 16);
}

#[test]
fn booleans_and_logic() {
    let env = load("bool t = true; bool f = false; bool n = !false;");
    assert!(env.get_variable("t").unwrap().get::<bool>());
    assert!(!env.get_variable("f").unwrap().get::<bool>());
    assert!(env.get_variable("n").unwrap().get::<bool>());

    let env = load("bool both = (1 < 2) && (3 < 4); bool either = (1 > 2) || (3 < 4);");
    assert!(env.get_variable("both").unwrap().get::<bool>());
    assert!(env.get_variable("either").unwrap().get::<bool>());
}

#[test]
fn unary_negation() {
    let env = load("int n = -5; float x = -2.5f;");
    assert_eq!(int_variable(&env, "n"), -5);
    assert_eq!(env.get_variable("x").unwrap().get::<f32>(), -2.5);
}

#[test]
fn conditional_expression() {
    let env = load("int a = 7; int big = a > 5 ? 1 : 0; int small = a < 5 ? 1 : 0;");
    assert_eq!(int_variable(&env, "big"), 1);
    assert_eq!(int_variable(&env, "small"), 0);
}

#[test]
fn while_loop_counts_up() {
    let env = load("int i = 0; while (i < 3) { i = i + 1; }");
    assert_eq!(int_variable(&env, "i"), 3);
}

#[test]
fn for_loop_with_break() {
    let source = r"
        int last = 0;
        for (int i = 0; i < 5; i = i + 1)
        {
            if (i == 3)
            {
                last = i;
                break;
            }
        }
    ";
    let env = load(source);

    assert_eq!(int_variable(&env, "last"), 3);
    // the loop variable lived in the loop's scope
    assert!(env.get_variable("i").is_none());
}

#[test]
fn for_loop_with_continue() {
    let source = r"
        int even_sum = 0;
        for (int i = 0; i < 6; i = i + 1)
        {
            if (i == 1) continue;
            if (i == 3) continue;
            if (i == 5) continue;
            even_sum = even_sum + i;
        }
    ";
    let env = load(source);

    assert_eq!(int_variable(&env, "even_sum"), 6);
}

#[test]
fn increment_and_decrement() {
    let env = load("int i = 5; i++; i++; int j = 9; j--;");
    assert_eq!(int_variable(&env, "i"), 7);
    assert_eq!(int_variable(&env, "j"), 8);
}

#[test]
fn compound_assignment_parses_but_does_not_execute() {
    // compound operators parse; only plain `=` stores in this revision
    let env = load("int x = 1; x += 5;");
    assert_eq!(int_variable(&env, "x"), 1);
}

#[test]
fn scopes_release_their_variables() {
    let env = load("{ int inner = 1; } int outer = 2;");
    assert!(env.get_variable("inner").is_none());
    assert_eq!(int_variable(&env, "outer"), 2);
}

#[test]
fn shadowing_in_inner_scopes_is_allowed() {
    assert_success("int x = 1; { int x = 2; }");
}

#[test]
fn script_functions() {
    let source = r"
        int add(int a, int b)
        {
            return a + b;
        }

        int r = add(2, 3);
    ";
    let env = load(source);

    assert_eq!(int_variable(&env, "r"), 5);
}

#[test]
fn script_function_recursion() {
    let source = r"
        int fact(int n)
        {
            if (n < 2)
            {
                return 1;
            }

            int rest = fact(n - 1);
            return n * rest;
        }

        int f = fact(5);
    ";
    let env = load(source);

    assert_eq!(int_variable(&env, "f"), 120);
}

#[test]
fn reference_parameters_write_back() {
    let source = r"
        void bump(int& v)
        {
            v = v + 1;
        }

        int n = 7;
        bump(n);
    ";
    let env = load(source);

    assert_eq!(int_variable(&env, "n"), 8);
}

#[test]
fn value_parameters_do_not_escape() {
    let source = r"
        void absorb(int v)
        {
            v = 100;
        }

        int n = 7;
        absorb(n);
    ";
    let env = load(source);

    assert_eq!(int_variable(&env, "n"), 7);
}

#[test]
fn void_function_declarations() {
    let source = r"
        int total = 0;

        void accumulate(int amount)
        {
            total = total + amount;
        }

        accumulate(3);
        accumulate(4);
    ";
    let env = load(source);

    assert_eq!(int_variable(&env, "total"), 7);
}

#[test]
fn comments_and_directives_are_elided() {
    let source = r"
        // leading comment
        #include <not_actually_processed.h>
        int a = 1; /* trailing
                      block comment */
        int b = 2;
    ";
    let env = load(source);

    assert_eq!(int_variable(&env, "a"), 1);
    assert_eq!(int_variable(&env, "b"), 2);
}

#[test]
fn string_literals_load() {
    assert_success(r#"const char* greeting = "hello";"#);
}

#[test]
fn token_streams_concatenate() {
    let first = "int a = 1;";
    let second = "int b = 2;";
    let combined = format!("{first}\n{second}");

    let first_tokens = tokenize(first).unwrap();
    let second_tokens = tokenize(second).unwrap();
    let combined_tokens = tokenize(&combined).unwrap();

    assert_eq!(combined_tokens.len(), first_tokens.len() + second_tokens.len());

    for (token, expected) in combined_tokens.iter().zip(&first_tokens) {
        assert_eq!(token.kind, expected.kind);
        assert_eq!(token.line, expected.line);
    }

    let first_lines = first.lines().count();

    for (token, expected) in combined_tokens[first_tokens.len()..].iter().zip(&second_tokens) {
        assert_eq!(token.kind, expected.kind);
        assert_eq!(token.line, expected.line + first_lines);
    }
}

#[test]
fn block_local_copies_reach_outer_variables() {
    let env = load("int y = 0; { int x = 42; y = x; }");
    assert_eq!(int_variable(&env, "y"), 42);
}

#[test]
fn assignment_is_equivalent_to_declaration_then_copy() {
    let direct = load("int x = 0; x = 6 * 7;");
    let staged = load("int x = 0; int tmp = 6 * 7; x = tmp;");

    assert_eq!(int_variable(&direct, "x"), int_variable(&staged, "x"));
}

#[test]
fn reloading_a_program_reproduces_its_effects() {
    let source = "int a = 2; int b = 3; int c = a + b * 2;";
    let mut env = Environment::new();

    env.load("round_trip", source).unwrap();
    assert_eq!(int_variable(&env, "c"), 10);

    env.load("round_trip", source).unwrap();
    assert_eq!(int_variable(&env, "c"), 10);
}

#[test]
fn deterministic_across_environments() {
    let source = "int acc = 1; for (int i = 1; i < 6; i = i + 1) { acc = acc * i; }";

    let first = load(source);
    let second = load(source);

    assert_eq!(int_variable(&first, "acc"), int_variable(&second, "acc"));
}

#[test]
fn integer_division_by_zero_is_reported_with_its_line() {
    let message = assert_failure("int a = 1;\nint b = a / 0;");
    assert!(message.starts_with("[Runtime Error] Line 2: division by zero"),
            "unexpected message: {message}");
}

#[test]
fn float_division_by_near_zero_is_reported_with_its_line() {
    let message = assert_failure("float x = 1.0f;\nfloat y = x / 0.0f;");
    assert!(message.starts_with("[Runtime Error] Line 2: division by zero"),
            "unexpected message: {message}");
}

#[test]
fn null_pointer_access_names_the_pointer() {
    let message = assert_failure("int* p = nullptr;\nint q = p->value;");
    assert!(message.starts_with("[Runtime Error] Line 2: null pointer access ('p')"),
            "unexpected message: {message}");
}

#[test]
fn increment_on_a_float_is_a_compile_error() {
    let message = assert_failure("float x = 1.0f;\nx++;");
    assert!(message.starts_with("[Compile Error] Line 2: 'x' must be an integer value"),
            "unexpected message: {message}");
}

#[test]
fn redefinition_at_the_same_scope_is_a_compile_error() {
    let message = assert_failure("int x = 1; int x = 2;");
    assert!(message.contains("variable redefinition ('x')"),
            "unexpected message: {message}");
}

#[test]
fn undefined_variables_are_compile_errors() {
    let message = assert_failure("int y = z + 1;");
    assert!(message.contains("undefined variable ('z')"),
            "unexpected message: {message}");
}

#[test]
fn failed_loads_keep_the_message_readable() {
    let mut env = Environment::new();
    assert!(env.load("bad", "int x = 1 / 0;").is_err());

    let message = env.error_message().unwrap();
    assert!(message.starts_with("[Runtime Error] Line 1:"));

    // a successful load clears the message
    env.load("good", "int x = 1;").unwrap();
    assert!(env.error_message().is_none());
}

#[test]
fn address_of_and_pointer_member_access() {
    let env = load("int target = 11; int* p = &target;");
    assert!(env.get_variable("p").is_some());
}

#[test]
fn break_requires_a_semicolon() {
    let message = assert_failure("while (true) { break }");
    assert!(message.contains("unexpected symbol after 'break'"),
            "unexpected message: {message}");
}

#[test]
fn pointer_variables_observe_writes_through_the_pointee() {
    let source = r"
        int target = 1;
        target = 41;
        target++;
    ";
    let env = load(source);

    assert_eq!(int_variable(&env, "target"), 42);
}
