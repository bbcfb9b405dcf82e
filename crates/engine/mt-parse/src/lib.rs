//! Definition parsing: the `defmacten_dec` / `defmacten_proc` meta-syntax
//!
//! The parser scans the whole host source under the meta vocabulary,
//! extracting declarative templates and procedural profiles. Local parse
//! errors are recorded as line-tagged diagnostics and recovery continues
//! (panic mode suppresses cascades until the next top-level declaration);
//! any recorded error fails the parse as a whole.

use mt_lexer::Lexer;
use mt_macro::{MacroTemplate, ParameterPattern, ProceduralProfile, ProfileRule};
use mt_stream::TokenStream;
use mt_token::{MetaToken, SourceToken, Token};
use std::fmt;

/// A position-tagged parse diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// 1-based source line.
    pub line: usize,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ (line:{}) {} ]", self.line, self.message)
    }
}

/// Definition parsing failed; every collected diagnostic is attached.
#[derive(Debug)]
pub struct ParseFailure {
    /// The collected diagnostics, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl std::error::Error for ParseFailure {}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "definition parsing failed with {} diagnostic(s)",
            self.diagnostics.len()
        )?;
        for diagnostic in &self.diagnostics {
            write!(f, "\n{diagnostic}")?;
        }
        Ok(())
    }
}

/// Everything extracted from one source's definitions.
#[derive(Debug, Default)]
pub struct Definitions {
    /// Declarative templates, in declaration order.
    pub templates: Vec<MacroTemplate>,
    /// Procedural profiles, in declaration order.
    pub profiles: Vec<ProceduralProfile>,
}

/// Parses every macro definition in `source`.
///
/// # Errors
///
/// Returns every diagnostic recorded while scanning if any definition is
/// malformed.
pub fn parse(source: &str) -> Result<Definitions, ParseFailure> {
    DefinitionParser::new(source).run()
}

struct DefinitionParser {
    lexer: Lexer<MetaToken>,
    current: Token<MetaToken>,
    previous: Token<MetaToken>,
    panic: bool,
    has_error: bool,
    in_definition: bool,
    diagnostics: Vec<Diagnostic>,
    definitions: Definitions,
}

impl DefinitionParser {
    fn new(source: &str) -> Self {
        Self {
            lexer: Lexer::new(source),
            current: Token::default(),
            previous: Token::default(),
            panic: false,
            has_error: false,
            in_definition: false,
            diagnostics: Vec::new(),
            definitions: Definitions::default(),
        }
    }

    fn run(mut self) -> Result<Definitions, ParseFailure> {
        self.advance();
        while !self.matched(MetaToken::EndOfFile) {
            self.declaration();
        }

        if self.has_error {
            Err(ParseFailure {
                diagnostics: self.diagnostics,
            })
        } else {
            Ok(self.definitions)
        }
    }

    fn declaration(&mut self) {
        self.panic = false;
        if self.matched(MetaToken::DeclarativeDefinition) {
            self.in_definition = true;
            self.declarative_definition();
            self.in_definition = false;
        } else if self.matched(MetaToken::ProceduralDefinition) {
            self.in_definition = true;
            self.procedural_definition();
            self.in_definition = false;
        } else {
            self.advance();
        }
    }

    /// `Name '{' ( '(' Signature ')' '=' '>' '{' Body '}' )+ '}'`
    fn declarative_definition(&mut self) {
        let name = self.consume_identifier("Expected macro name.");
        self.consume(MetaToken::LBrace, "Expected macro body, missing '{'.");

        let mut branches = Vec::new();
        while !self.matched(MetaToken::RBrace) {
            if self.check(MetaToken::EndOfFile) {
                self.report(self.current.line, "Expected '}', macro definition not closed.");
                break;
            }
            while self.matched(MetaToken::Tab) {}
            if self.check(MetaToken::RBrace) {
                continue;
            }
            if !self.check(MetaToken::LParen) {
                self.report(self.current.line, "Expected '(' to open a parameter signature.");
                self.advance();
                continue;
            }

            // The signature and body are captured raw and re-lexed; interior
            // text survives verbatim.
            let signature = self
                .lexer
                .capture_balanced(MetaToken::LParen, MetaToken::RParen);
            let signature_stream = TokenStream::<MetaToken>::lex(&signature.lexeme);
            let parameter = ParameterPattern::from_signature(signature_stream.view());
            self.advance();
            self.consume(MetaToken::RParen, "Expected arguments, missing ')'.");

            self.consume(MetaToken::Equal, "Expected '='.");
            self.consume(MetaToken::GreaterThan, "Expected '>'.");

            if self.check(MetaToken::LBrace) {
                self.lexer.skip_ignorable();
                let body = self
                    .lexer
                    .capture_balanced(MetaToken::LBrace, MetaToken::RBrace);
                branches.push((parameter, normalize_body(&body.lexeme)));
                self.advance();
                self.advance();
            }
        }

        self.definitions
            .templates
            .push(MacroTemplate::new(name, branches));
    }

    /// `Name '{' ( Rule '{' Alt '}' ( '|' '{' Alt '}' )* )+ '}'`
    fn procedural_definition(&mut self) {
        let name = self.consume_identifier("Expected macro name.");
        let mut profile = ProceduralProfile::new(name);
        self.consume(MetaToken::LBrace, "Expected macro body, missing '{'.");

        while !self.matched(MetaToken::EndOfFile) && !self.matched(MetaToken::RBrace) {
            let label = self.consume_identifier("Expected rule label of type identifier.");
            let mut rule = ProfileRule::default();

            loop {
                self.consume(MetaToken::LBrace, "Expected '{' after rule label name.");

                let mut depth = 1i32;
                let mut entry = Vec::new();
                while !self.check(MetaToken::EndOfFile) {
                    match self.current.kind {
                        MetaToken::RBrace => depth -= 1,
                        MetaToken::LBrace => depth += 1,
                        _ => {}
                    }
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                    entry.push(self.previous.lexeme.clone());
                    if self.previous.lexeme == label {
                        rule.recursive = true;
                    }
                }
                rule.alternatives.push(entry);

                if !self.matched(MetaToken::Pipe) {
                    break;
                }
            }

            profile.add_rule(label, rule);
        }

        self.definitions.profiles.push(profile);
    }

    fn advance(&mut self) {
        self.previous = std::mem::take(&mut self.current);
        loop {
            self.current = self.lexer.scan_token();
            if self.current.kind != MetaToken::Error {
                break;
            }
            // Outside definitions the text is uninterpreted host source;
            // only the meta-syntax itself gets lexical diagnostics.
            if self.in_definition {
                let line = self.current.line;
                let message = self.current.lexeme.clone();
                self.report(line, &message);
            }
        }
    }

    fn check(&self, kind: MetaToken) -> bool {
        self.current.kind == kind
    }

    fn matched(&mut self, kind: MetaToken) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn consume(&mut self, kind: MetaToken, message: &str) {
        if self.check(kind) {
            self.advance();
            return;
        }
        self.report(self.current.line, message);
    }

    fn consume_identifier(&mut self, message: &str) -> String {
        self.consume(MetaToken::Identifier, message);
        self.previous.lexeme.clone()
    }

    fn report(&mut self, line: usize, message: &str) {
        self.has_error = true;
        if self.panic {
            return;
        }
        self.panic = true;
        self.diagnostics.push(Diagnostic {
            line,
            message: message.to_owned(),
        });
    }
}

/// Normalizes a raw branch body: after every newline up to two tab/space
/// tokens are dropped (the definition's own indentation), and one trailing
/// newline is trimmed.
fn normalize_body(raw: &str) -> String {
    let stream = TokenStream::<SourceToken>::lex(raw);
    let mut view = stream.view();
    let mut result = TokenStream::<SourceToken>::new();

    while !view.is_at_end() {
        let token = view.pop();
        let newline = token.is(SourceToken::Newline);
        result.push(token);
        if newline {
            let _ = view.consume(&[SourceToken::Tab, SourceToken::Space]);
            let _ = view.consume(&[SourceToken::Tab, SourceToken::Space]);
        }
    }

    if result.peek_back(1).is(SourceToken::Newline) {
        result.pop_back();
    }

    result.construct()
}
