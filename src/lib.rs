#![allow(clippy::module_inception)]

use std::{rc::Rc, time::Instant};

use log::info;

use crate::{
    ast::ast::Root,
    compiler::{backend, compiler::gen_root},
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    lowering::lowering::lower,
    parser::parser::parse,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod lowering;
pub mod macros;
pub mod parser;
pub mod scope;

extern crate regex;

#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Which backend renders the generated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Text,
    #[cfg(feature = "llvm")]
    Llvm,
}

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Names the output module and its entry in diagnostics.
    pub unit_name: String,
    pub backend: Backend,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            unit_name: String::from("stdin"),
            backend: Backend::default(),
        }
    }
}

/// A successfully compiled unit.
#[derive(Debug, Clone)]
pub struct Output {
    pub root: Root,
    pub text: String,
}

/// Runs the whole pipeline over `source`, stopping at the first error.
pub fn compile_source(source: &str, options: &CompileOptions) -> Result<Output, Error> {
    let start = Instant::now();
    let file = Rc::new(options.unit_name.clone());

    let tokens = tokenize(source.to_string(), Some(options.unit_name.clone()))?;
    info!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let tree = parse(tokens, file)?;
    info!("Parsed in {:?}", parse_start.elapsed());

    let lower_start = Instant::now();
    let root = lower(&tree, &options.unit_name)?;
    info!("Lowered in {:?}", lower_start.elapsed());

    let emit_start = Instant::now();
    let module = gen_root(&root);
    let text = match options.backend {
        Backend::Text => backend::text::render(&module),
        #[cfg(feature = "llvm")]
        Backend::Llvm => backend::llvm::render(&module)?,
    };
    info!("Emitted in {:?}", emit_start.elapsed());
    info!("Total time: {:?}", start.elapsed());

    Ok(Output { root, text })
}

/// Finds the line holding byte offset `position`.
///
/// Returns the 1-based line number, the line's text and the offset within
/// the line, or `None` past the end of `source`. The end of input itself
/// belongs to the last line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    let mut start = 0;
    let mut last = (1, "", 0);

    for (index, line) in source.split_inclusive('\n').enumerate() {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((index + 1, line.to_string(), pos - start));
        }

        last = (index + 1, line, start);
        start = end;
    }

    if pos == source.len() {
        let (line_number, line, line_start) = last;
        return Some((line_number, line.to_string(), pos - line_start));
    }

    None
}

/// Formats `error` as a caret diagnostic against `source`.
pub fn format_error(error: &Error, source: &str, file: &str) -> String {
    /*
        Error: TypeMismatch (Expected type `int`, received `bool`)
        -> main.c
           |
         3 | a = b;
           | ----^
    */

    let mut out = if let ErrorTip::None = error.get_tip() {
        format!("Error: {}\n", error.get_error_name())
    } else {
        format!("Error: {} ({})\n", error.get_error_name(), error.get_tip())
    };
    out.push_str(&format!("-> {}\n", file));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, error.get_position().0)
    else {
        out.push_str(&format!("   {}\n", error));
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

pub fn display_error(error: &Error, source: &str, file: &str) {
    eprint!("{}", format_error(error, source, file));
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use crate::{errors::errors::ErrorImpl, CompileOptions, Position};

    use super::{compile_source, format_error, get_line_at_position};

    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nint a;\n\n    Testing { }\n";

        let (line_number, line, line_pos) = get_line_at_position(source, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = get_line_at_position(source, 34).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "    Testing { }\n");
        assert_eq!(line_pos, 12);

        assert!(get_line_at_position(source, 400).is_none());
    }

    #[test]
    fn test_end_of_input_is_on_last_line() {
        let (line_number, line, line_pos) = get_line_at_position("int a;\nint f() {", 16).unwrap();
        assert_eq!(line_number, 2);
        assert_eq!(line, "int f() {");
        assert_eq!(line_pos, 9);

        assert_eq!(get_line_at_position("", 0), Some((1, String::new(), 0)));
    }

    #[test]
    fn test_format_error_at_end_of_input() {
        let source = "int f() {";
        let error = compile_source(source, &CompileOptions::default()).unwrap_err();
        let message = format_error(&error, source, "main.c");

        assert_eq!(error.get_position().0, 9);
        assert!(message.ends_with("1 | int f() {\n  | ---------^\n"), "{}", message);
    }

    #[test]
    fn test_format_error_points_at_offset() {
        let source = "int a;\nbool b;\na = b;\n";
        let error = compile_source(source, &CompileOptions::default()).unwrap_err();
        let message = format_error(&error, source, "main.c");

        assert_eq!(
            message,
            "Error: TypeMismatch (Expected type `int`, received `bool`)\n\
             -> main.c\n  |\n3 | a = b;\n  | ----^\n"
        );
    }

    #[test]
    fn test_format_error_past_end() {
        let error = crate::errors::errors::Error::new(
            ErrorImpl::UnknownConstruct {
                construct: "x".to_string(),
            },
            Position(99, std::rc::Rc::new("main.c".to_string())),
        );
        let message = format_error(&error, "", "main.c");

        assert!(message.starts_with("Error: UnknownConstruct\n-> main.c\n"));
    }

    #[test]
    fn test_compile_source_names_the_unit() {
        let options = CompileOptions {
            unit_name: "prog".to_string(),
            ..CompileOptions::default()
        };
        let output = compile_source("int a;", &options).unwrap();

        assert_eq!(output.root.unit_name, "prog");
        assert!(output.text.starts_with("; ModuleID = 'prog'\n"));
    }
}
