//! Integration tests for end-to-end compilation.
//!
//! These tests drive the public pipeline from source text through
//! tokenization, parsing, lowering and IR generation.

use minic::{
    ast::{ast::PrimitiveType, printer::PrettyPrint, statements::Stmt},
    compile_source,
    errors::errors::{Error, Stage},
    CompileOptions,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn compile(source: &str) -> Result<minic::Output, Error> {
    init_logger();
    compile_source(source, &CompileOptions::default())
}

#[test]
fn test_compile_simple_program() {
    let output = compile("int a; a = 42;").unwrap();

    assert_eq!(output.root.global_assignments.len(), 1);
    assert!(output.text.contains("store i32 42, i32* @a"));
    assert!(output.text.contains("define i32 @main()"));
}

#[test]
fn test_compile_functions_and_control_flow() {
    let source = r#"
        extern void print(str);
        int counter;

        int sum(int n) {
            int total;
            total = 0;
            while (n > 0) {
                total = total + n;
                n = n - 1;
            }
            return total;
        }

        int main() {
            counter = sum(10);
            if (counter == 55)
                print("ok\n");
            else
                print("bad\n");
            return 0;
        }
    "#;
    let output = compile(source).unwrap();

    assert_eq!(output.root.function_definitions.len(), 2);
    assert!(output.text.contains("declare void @print(i8*)"));
    assert!(output.text.contains("define i32 @sum(i32 %arg.n)"));
    assert!(output.text.contains("call i32 @sum(i32 10)"));
    assert!(output.text.contains("c\"ok\\0A\\00\""));
    assert!(output.text.contains("%t.0 = call i32 @minic.main()"));
}

#[test]
fn test_recognition_failures() {
    let lexing = compile("int a; a = 1 $ 2;").unwrap_err();
    assert_eq!(lexing.get_error_name(), "UnrecognisedToken");
    assert_eq!(lexing.stage(), Stage::Recognition);

    let parsing = compile("int a; a = ;").unwrap_err();
    assert_eq!(parsing.stage(), Stage::Recognition);

    let number = compile("int a; a = 99999999999;").unwrap_err();
    assert_eq!(number.get_error_name(), "NumberParseError");
}

#[test]
fn test_string_escapes_reach_the_output() {
    let output = compile(r#"extern void print(str); void f() { print("\x41\x7F\t"); }"#).unwrap();
    assert!(output.text.contains("[4 x i8] c\"A\\7F\\09\\00\""), "{}", output.text);

    let error = compile(r#"extern void print(str); void f() { print("\xFF"); }"#).unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.stage(), Stage::Recognition);
}

#[test]
fn test_lowering_failures() {
    let cases = [
        ("a = 1;", "UndefinedIdentifier"),
        ("int a; int a;", "AlreadyDeclared"),
        ("void f() { while (true) int i; }", "DeclarationInLoop"),
        ("int a; a = true;", "TypeMismatch"),
        ("int f(int n) { return n; } int a; a = f();", "ArityMismatch"),
        ("float x; x = -1.0;", "UnsupportedUnaryOperand"),
        ("str s; s = \"a\" * \"b\";", "UnsupportedBinaryOperand"),
        ("long l;", "UnsupportedType"),
    ];

    for (source, name) in cases {
        let error = compile(source).unwrap_err();
        assert_eq!(error.get_error_name(), name, "{}", source);
        assert_eq!(error.stage(), Stage::Lowering);
    }
}

#[test]
fn test_checked_ast_is_printable() {
    let output = compile("int a; a = 1 + 2; void f() { if (a) a = 3; }").unwrap();
    let printed = output.root.pretty();

    assert!(printed.contains("BExpr. ADD"));
    assert!(printed.contains("|   "));
}

#[test]
fn test_scoping_end_to_end() {
    let source = "int a; void f(int a) { { float a; a = 1.5; } a = 2; } float g() { return 1.0; }";
    let output = compile(source).unwrap();

    match &output.root.function_definitions[0].body.statements[0] {
        Stmt::Block(block) => match &block.statements[1] {
            Stmt::Assign(assignment) => assert_eq!(assignment.target.ty, PrimitiveType::Float),
            other => panic!("unexpected {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
    assert!(output.text.contains("store float 0x3FF8000000000000, float* %a.addr.1"));
    assert!(output.text.contains("store i32 2, i32* %a.addr.0"));
}

#[test]
fn test_output_is_deterministic() {
    let source = "str s; s = \"x\"; bool b; b = 1 < 2; int main() { return 1; }";

    assert_eq!(compile(source).unwrap().text, compile(source).unwrap().text);
}

#[cfg(feature = "llvm")]
#[test]
fn test_llvm_backend_verifies() {
    init_logger();
    let options = CompileOptions {
        backend: minic::Backend::Llvm,
        ..CompileOptions::default()
    };
    let source = "int f(int n) { if (n < 2) return n; return f(n - 1) + f(n - 2); } int main() { return f(10); }";
    let output = compile_source(source, &options).unwrap();

    assert!(output.text.contains("@minic.main"));
}
