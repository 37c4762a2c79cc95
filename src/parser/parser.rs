//! Parser implementation for building the MiniC parse tree.
//!
//! Expressions use a Pratt parser with NUD/LED handlers looked up by token
//! kind; lines and statements are parsed by dedicated functions keyed on the
//! upcoming tokens.
//!
//! In recovering mode a failed statement or line is replaced by an `Error`
//! node and the parser resynchronises at the next `;` or `}`.

use std::{collections::HashMap, rc::Rc};

use log::debug;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    lookups::{create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup},
    stmt::parse_line,
    tree::{ErrorNode, Start},
};

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The list of tokens to parse, always terminated by EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Whether syntax errors become `Error` nodes instead of aborting
    recovering: bool,
    /// Errors recorded while recovering
    diagnostics: Vec<Error>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span {
                    start: end.clone(),
                    end,
                },
            });
        }

        Parser {
            tokens,
            pos: 0,
            file,
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            recovering: false,
            diagnostics: vec![],
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Looks `offset` tokens ahead, stopping at EOF.
    pub fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.peek(offset).kind
    }

    /// Advances to the next token and returns the previous token. EOF is
    /// never consumed.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos;
        if self.tokens[index].kind != TokenKind::EOF {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// The token before the current one; used to close spans.
    pub fn previous_token(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            return Err(error.unwrap_or_else(|| self.unexpected()));
        }

        Ok(self.advance().clone())
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// An UnexpectedToken error for the current token.
    pub fn unexpected(&self) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    }

    /// An UnexpectedTokenDetailed error for the current token.
    pub fn unexpected_detailed(&self, message: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: message.to_string(),
            },
            token.span.start.clone(),
        )
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    pub fn is_recovering(&self) -> bool {
        self.recovering
    }

    /// Returns the current position in the source file.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        Span {
            start,
            end: self.previous_token().span.end.clone(),
        }
    }

    /// Records `error` and skips to the next `;` (consumed) or `}`.
    ///
    /// A `}` is consumed only at top level, where no block is waiting for it.
    /// Returns the skipped tokens, starting at the token index `start`.
    pub fn recover(&mut self, error: Error, start: usize, top_level: bool) -> ErrorNode {
        debug!("recovering from {}", error);
        self.diagnostics.push(error);

        loop {
            match self.current_token_kind() {
                TokenKind::EOF => break,
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                TokenKind::CloseCurly => {
                    if top_level || self.pos == start {
                        self.advance();
                    }
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }

        let tokens = self.tokens[start..self.pos].to_vec();
        let span = match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => Span {
                start: first.span.start.clone(),
                end: last.span.end.clone(),
            },
            _ => self.current_token().span.clone(),
        };

        ErrorNode { tokens, span }
    }

    /// Index of the current token, for `recover`.
    pub fn mark(&self) -> usize {
        self.pos
    }
}

fn parse_lines(parser: &mut Parser) -> Result<Start, Error> {
    let start = Position(0, Rc::clone(&parser.file));
    let mut lines = vec![];

    while parser.has_tokens() {
        lines.push(parse_line(parser)?);
    }

    Ok(Start {
        lines,
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}

/// Parses a stream of tokens into a parse tree, failing on the first
/// syntax error.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Start, Error> {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);

    parse_lines(&mut parser)
}

/// Parses a stream of tokens into a parse tree, replacing every broken
/// statement or line with an `Error` node.
///
/// Returns the tree together with every syntax error encountered, in source
/// order.
pub fn parse_recovering(tokens: Vec<Token>, file: Rc<String>) -> (Start, Vec<Error>) {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);
    parser.recovering = true;

    let start = match parse_lines(&mut parser) {
        Ok(start) => start,
        // Lines recover individually, so this only triggers on internal
        // failures outside any line.
        Err(error) => {
            parser.diagnostics.push(error);
            Start {
                lines: vec![],
                span: parser.current_token().span.clone(),
            }
        }
    };

    (start, parser.diagnostics)
}
