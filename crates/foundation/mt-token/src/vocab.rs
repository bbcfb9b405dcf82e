//! The two vocabularies used by the engine

use crate::vocabulary;

vocabulary! {
    /// Meta vocabulary: recognizes the macro-definition syntax.
    ///
    /// Space, newline and carriage return are discarded at lex time (Tab is a
    /// first-class symbol), and `//` line comments are skipped, so definition
    /// parsing sees structure only. The symbol set is deliberately wider than
    /// the definition grammar needs: procedural rule alternatives may spell
    /// out arbitrary punctuation.
    pub enum MetaToken {
        ignore: [' ', '\n', '\r'],
        line_comments: true,
        symbols: {
            Tab => '\t',
            Dollar => '$',
            Exclamation => '!',
            Comma => ',',
            Pipe => '|',
            LParen => '(',
            RParen => ')',
            LBrace => '{',
            RBrace => '}',
            LSquare => '[',
            RSquare => ']',
            Equal => '=',
            GreaterThan => '>',
            LessThan => '<',
            Underscore => '_',
            Semicolon => ';',
            Colon => ':',
            Dot => '.',
            Hash => '#',
            Plus => '+',
            Minus => '-',
            Star => '*',
            Slash => '/',
            Backslash => '\\',
            Percent => '%',
            Caret => '^',
            Ampersand => '&',
            Question => '?',
            At => '@',
            Tilde => '~',
            Backtick => '`',
            DoubleQuote => '"',
            Quote => '\'',
        },
        keywords: {
            DeclarativeDefinition => "defmacten_dec",
            ProceduralDefinition => "defmacten_proc",
        },
    }
}

vocabulary! {
    /// Source (host) vocabulary: a superset of the meta vocabulary used for
    /// everything outside definitions.
    ///
    /// Nothing is discarded: every whitespace character is its own token and
    /// comments pass through as ordinary symbols, so concatenating lexemes
    /// reconstructs the input byte for byte. The symbol set is lax on purpose;
    /// the engine is host-language-agnostic.
    pub enum SourceToken {
        ignore: [],
        line_comments: false,
        symbols: {
            Space => ' ',
            Tab => '\t',
            Newline => '\n',
            CarriageReturn => '\r',
            Dollar => '$',
            Exclamation => '!',
            Comma => ',',
            Pipe => '|',
            LParen => '(',
            RParen => ')',
            LBrace => '{',
            RBrace => '}',
            LSquare => '[',
            RSquare => ']',
            Equal => '=',
            GreaterThan => '>',
            LessThan => '<',
            Underscore => '_',
            Semicolon => ';',
            Colon => ':',
            Dot => '.',
            Hash => '#',
            Plus => '+',
            Minus => '-',
            Star => '*',
            Slash => '/',
            Backslash => '\\',
            Percent => '%',
            Caret => '^',
            Ampersand => '&',
            Question => '?',
            At => '@',
            Tilde => '~',
            Backtick => '`',
            DoubleQuote => '"',
            Quote => '\'',
        },
        keywords: {
            DeclarativeDefinition => "defmacten_dec",
            ProceduralDefinition => "defmacten_proc",
        },
    }
}
