//
// lexer.rs
// The RIDL Compiler
//

//! The lexer turns IDL source text into a stream of typed tokens.
//! It is a hand-rolled byte cursor rather than a table- or
//! regex-driven scanner, because the grammar needs a handful of
//! behaviors that are awkward to express declaratively: C-style
//! numeric literals with bases, exponents and type suffixes;
//! directive (`//!`) and documentation (`///`) comments that are
//! tokens while ordinary comments are not; preprocessor lines with
//! backslash continuation; and string/character literals honoring
//! C escape sequences.

use std::collections::{ BTreeMap, VecDeque };
use std::rc::Rc;
use error::{ Error, Result };


/// Shared handle to a single token. Tokens are passed between the
/// token-stack machine and the parser without copying their lexemes.
pub type RcToken = Rc<Token>;

/// A double-ended sequence of tokens; the unit of work of the
/// token-stack machine.
pub type TokenList = VecDeque<RcToken>;

/// Describes the type of a single token or lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    /// A byte the scanner could not classify.
    Unknown,
    /// A compiler directive comment: `//! …`.
    Directive,
    /// A documentation comment: `/// …`.
    Documentation,
    /// A string literal, delimiters included.
    Quote,
    /// A character literal, delimiters included.
    Char,
    /// An integer or floating-point literal.
    Number,
    /// An identifier or keyword.
    Identifier,
    /// An operator with no dedicated kind of its own (currently `?`).
    Operator,
    /// `(` or `)`.
    Brace,
    /// `{` or `}`.
    CurlyBrace,
    /// `[` or `]`.
    SquareBrace,
    /// `<` or `>`.
    AngleBrace,
    /// `;`
    SemiColon,
    /// `::`
    ScopeOperator,
    /// `,`
    CommaOperator,
    /// `:`
    ColonOperator,
    /// `=`
    EqualsOperator,
}

/// A lexeme along with its kind and the 1-based source line it
/// started on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// The kind of the recognized lexeme.
    pub kind: TokenKind,
    /// The text of the lexeme. Directive and documentation tokens
    /// carry the remainder of their line without the marker; quote
    /// and char tokens keep their delimiters and raw escapes.
    pub lexeme: String,
    /// 1-based line the lexeme started on.
    pub line: usize,
}

impl Token {
    /// Whether this token belongs to the brace family,
    /// either polarity.
    pub fn is_brace(&self) -> bool {
        match self.kind {
            TokenKind::Brace
            | TokenKind::CurlyBrace
            | TokenKind::SquareBrace
            | TokenKind::AngleBrace => true,
            _ => false,
        }
    }

    /// Whether this token opens a brace region.
    pub fn is_open_brace(&self) -> bool {
        match self.kind {
            TokenKind::Brace       => self.lexeme == "(",
            TokenKind::CurlyBrace  => self.lexeme == "{",
            TokenKind::SquareBrace => self.lexeme == "[",
            TokenKind::AngleBrace  => self.lexeme == "<",
            _ => false,
        }
    }

    /// Whether this token closes a brace region.
    pub fn is_close_brace(&self) -> bool {
        match self.kind {
            TokenKind::Brace       => self.lexeme == ")",
            TokenKind::CurlyBrace  => self.lexeme == "}",
            TokenKind::SquareBrace => self.lexeme == "]",
            TokenKind::AngleBrace  => self.lexeme == ">",
            _ => false,
        }
    }
}


/// Scans a complete source string into a token list.
///
/// # Arguments
///
/// * `source`: the IDL source text.
/// * `start_line`: the line number of the first line, normally 1.
///   Directive bodies are re-scanned with the directive's own line
///   so that errors inside them point at the right place.
///
/// # Return value
///
/// * `Ok(TokenList)` with the tokens in source order.
/// * `Err(Error::Syntax)` on an unterminated string or character
///   literal.
pub fn tokenize(source: &str, start_line: usize) -> Result<TokenList> {
    let mut scanner = Scanner::new(source, start_line);
    let mut tokens = TokenList::new();

    while let Some(token) = scanner.next_token()? {
        tokens.push_back(Rc::new(token));
    }

    Ok(tokens)
}

/// Replaces every `Identifier` token whose lexeme is an alias key
/// with the fresh tokenization of the alias value, lexed at the
/// original token's line. A single pass: replacement output is not
/// scanned for further aliases.
pub fn replace_aliases(tokens: &mut TokenList, aliases: &BTreeMap<String, String>) -> Result<()> {
    let mut index = 0;

    while index < tokens.len() {
        let replacement = {
            let token = &tokens[index];
            if token.kind == TokenKind::Identifier {
                aliases.get(&token.lexeme).map(|value| (value.clone(), token.line))
            } else {
                None
            }
        };

        match replacement {
            Some((value, line)) => {
                let fresh = tokenize(&value, line)?;
                let count = fresh.len();

                tokens.remove(index);
                for (offset, token) in fresh.into_iter().enumerate() {
                    tokens.insert(index + offset, token);
                }

                index += count;
            },
            None => index += 1,
        }
    }

    Ok(())
}


// Every lexeme in this grammar is ASCII; anything else
// surfaces as an Unknown token.
#[derive(Debug)]
struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    start_of_line: bool,
}

const OPERATORS: &'static [&'static str] = &[
    "{", "}", "(", ")", "[", "]", ";", "<", ">", "::", "=", ":", ",", "?",
];

fn is_identifier_start(byte: u8) -> bool {
    (byte >= b'a' && byte <= b'z') || (byte >= b'A' && byte <= b'Z') || byte == b'_'
}

fn is_identifier_continue(byte: u8) -> bool {
    is_identifier_start(byte) || (byte >= b'0' && byte <= b'9')
}

fn is_digit(byte: u8) -> bool {
    byte >= b'0' && byte <= b'9'
}

fn is_hex_digit(byte: u8) -> bool {
    is_digit(byte) || (byte >= b'a' && byte <= b'f') || (byte >= b'A' && byte <= b'F')
}

fn is_octal_digit(byte: u8) -> bool {
    byte >= b'0' && byte <= b'7'
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str, start_line: usize) -> Scanner<'a> {
        Scanner {
            src: source.as_bytes(),
            pos: 0,
            line: start_line,
            start_of_line: true,
        }
    }

    // Cursor primitives. Reading past the end yields 0, which
    // matches no lexeme class and so terminates every scan loop.

    fn at(&self, offset: usize) -> u8 {
        match self.src.get(self.pos + offset) {
            Some(&byte) => byte,
            None => 0,
        }
    }

    fn cur(&self) -> u8 {
        self.at(0)
    }

    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn slice(&self, from: usize, to: usize) -> String {
        String::from_utf8_lossy(&self.src[from..to]).into_owned()
    }

    fn at_eol(&self) -> bool {
        match self.cur() {
            b'\n' | b'\r' => true,
            _ => false,
        }
    }

    // Consumes one line break (`\r\n` counts as one) and bumps
    // the line counter.
    fn skip_eol(&mut self) -> bool {
        match self.cur() {
            b'\r' => {
                self.pos += if self.at(1) == b'\n' { 2 } else { 1 };
                self.line += 1;
                true
            },
            b'\n' => {
                self.pos += 1;
                self.line += 1;
                true
            },
            _ => false,
        }
    }

    fn skip_whitespace_except_eol(&mut self) -> bool {
        let mut skipped = false;

        loop {
            match self.cur() {
                b' ' | b'\t' | 0x0b | 0x0c => {
                    self.pos += 1;
                    skipped = true;
                },
                _ => return skipped,
            }
        }
    }

    fn skip_to_eol(&mut self) {
        while !self.eof() && !self.at_eol() {
            self.pos += 1;
        }
    }

    // A `#` line, honoring trailing-backslash continuation onto
    // the next physical line.
    fn skip_preprocessor(&mut self) {
        loop {
            let line_start = self.pos;
            self.skip_to_eol();

            let mut lookback = self.pos;
            let mut continued = false;

            while lookback > line_start {
                lookback -= 1;
                match self.src[lookback] {
                    b' ' | b'\t' | 0x0b | 0x0c => continue,
                    b'\\' => continued = true,
                    _ => {},
                }
                break;
            }

            if !self.skip_eol() {
                return; // end of input
            }
            if !continued {
                return;
            }
        }
    }

    // `/* … */`; returns whether a comment was skipped and leaves
    // the line counter correct across embedded newlines.
    fn skip_c_comment(&mut self) -> bool {
        if self.cur() != b'/' || self.at(1) != b'*' {
            return false;
        }

        self.pos += 2;

        while !self.eof() {
            if self.cur() == b'*' && self.at(1) == b'/' {
                self.pos += 2;
                return true;
            }
            if !self.skip_eol() {
                self.pos += 1;
            }
        }

        true // unterminated comment swallows the rest of the input
    }

    // `//! …` and `/// …`; the lexeme is the remainder of the line
    // after the marker, the terminating newline is consumed but not
    // part of the lexeme.
    fn scan_directive_or_doc(&mut self) -> Option<Token> {
        if self.cur() != b'/' || self.at(1) != b'/' {
            return None;
        }

        let kind = match self.at(2) {
            b'!' => TokenKind::Directive,
            b'/' => TokenKind::Documentation,
            _ => return None,
        };

        let line = self.line;
        self.pos += 3;

        let start = self.pos;
        self.skip_to_eol();
        let lexeme = self.slice(start, self.pos);
        self.skip_eol();

        Some(Token { kind, lexeme, line })
    }

    fn skip_line_comment(&mut self) -> bool {
        if self.cur() != b'/' || self.at(1) != b'/' {
            return false;
        }

        self.skip_to_eol();
        self.skip_eol();
        true
    }

    // Consumes the body of a C escape sequence; the leading `\`
    // has already been consumed.
    fn skip_escape_body(&mut self) {
        match self.cur() {
            b'x' | b'X' => {
                self.pos += 1;
                while is_hex_digit(self.cur()) {
                    self.pos += 1;
                }
            },
            byte if is_octal_digit(byte) => {
                let mut digits = 0;
                while is_octal_digit(self.cur()) && digits < 3 {
                    self.pos += 1;
                    digits += 1;
                }
            },
            0 => {},
            _ => self.pos += 1,
        }
    }

    fn scan_quote(&mut self) -> Result<Option<Token>> {
        if self.cur() != b'"' {
            return Ok(None);
        }

        let line = self.line; // strings may span lines; report the opening quote
        let start = self.pos;
        self.pos += 1;

        loop {
            match self.cur() {
                0 => syntax_error!(line, "unterminated string literal"),
                b'"' => {
                    self.pos += 1;
                    break;
                },
                b'\\' => {
                    self.pos += 1;
                    self.skip_escape_body();
                },
                _ => {
                    if !self.skip_eol() {
                        self.pos += 1;
                    }
                },
            }
        }

        let lexeme = self.slice(start, self.pos);
        Ok(Some(Token { kind: TokenKind::Quote, lexeme, line }))
    }

    fn scan_char(&mut self) -> Result<Option<Token>> {
        if self.cur() != b'\'' {
            return Ok(None);
        }

        let line = self.line;
        let start = self.pos;
        self.pos += 1;

        if self.cur() == b'\\' {
            self.pos += 1;
            self.skip_escape_body();
        } else if self.eof() {
            syntax_error!(line, "unterminated character literal");
        } else {
            self.pos += 1;
        }

        if self.cur() != b'\'' {
            syntax_error!(line, "unterminated character literal");
        }
        self.pos += 1;

        let lexeme = self.slice(start, self.pos);
        Ok(Some(Token { kind: TokenKind::Char, lexeme, line }))
    }

    fn scan_number(&mut self) -> Option<Token> {
        let save = self.pos;

        let negative = self.cur() == b'-';
        if negative {
            self.pos += 1;
            self.skip_whitespace_except_eol();
        }

        if !is_digit(self.cur()) {
            self.pos = save;
            return None;
        }

        let start = self.pos;
        let mut base = 10;

        if self.cur() == b'0' {
            match self.at(1) {
                b'x' | b'X' => {
                    base = 16;
                    self.pos += 2;
                },
                b'b' | b'B' => {
                    base = 2;
                    self.pos += 2;
                },
                b'.' => {},
                byte if is_octal_digit(byte) => {
                    base = 8;
                    self.pos += 1;
                },
                _ => {},
            }
        }

        loop {
            match self.cur() {
                b'.' if base == 10 => self.pos += 1,
                b'0' | b'1' => self.pos += 1,
                byte if is_octal_digit(byte) && base >= 8 => self.pos += 1,
                byte if is_digit(byte) && base >= 10 => self.pos += 1,
                byte if is_hex_digit(byte) && base == 16 => self.pos += 1,
                _ => break,
            }
        }

        // exponent, base 10 only; a bare `e` is not consumed
        if base == 10 && (self.cur() == b'e' || self.cur() == b'E') {
            let exponent_start = self.pos;
            self.pos += 1;

            if self.cur() == b'+' || self.cur() == b'-' {
                self.pos += 1;
            }

            let mut found_digit = false;
            while is_digit(self.cur()) {
                found_digit = true;
                self.pos += 1;
            }

            if !found_digit {
                self.pos = exponent_start;
            }
        }

        // type suffix; an invalid combination rewinds the whole suffix
        let suffix_start = self.pos;
        let mut unsigned = false;
        let mut float = false;
        let mut total_longs = 0;
        let mut last_was_long = false;

        loop {
            match self.cur() {
                b'u' | b'U' => {
                    if unsigned || float {
                        self.pos = suffix_start;
                        break;
                    }
                    unsigned = true;
                    last_was_long = false;
                    self.pos += 1;
                },
                b'l' | b'L' => {
                    if float || (total_longs > 0 && !last_was_long) || total_longs >= 2 {
                        self.pos = suffix_start;
                        break;
                    }
                    total_longs += 1;
                    last_was_long = true;
                    self.pos += 1;
                },
                b'f' | b'F' => {
                    if base != 10 || unsigned || float || total_longs > 1 {
                        self.pos = suffix_start;
                        break;
                    }
                    float = true;
                    last_was_long = false;
                    self.pos += 1;
                },
                _ => break,
            }
        }

        let mut lexeme = self.slice(start, self.pos);
        if negative {
            lexeme.insert(0, '-');
        }

        Some(Token { kind: TokenKind::Number, lexeme, line: self.line })
    }

    fn scan_identifier(&mut self) -> Option<Token> {
        if !is_identifier_start(self.cur()) {
            return None;
        }

        let start = self.pos;
        while is_identifier_continue(self.cur()) {
            self.pos += 1;
        }

        let lexeme = self.slice(start, self.pos);
        Some(Token { kind: TokenKind::Identifier, lexeme, line: self.line })
    }

    // Maximal munch over the operator alphabet; every accepted
    // prefix must itself be a complete operator (this is what lets
    // `::` win over two `:`s).
    fn scan_operator(&mut self) -> Option<Token> {
        let start = self.pos;
        let mut length = 0;

        while !self.eof() {
            let candidate = &self.src[start..self.pos + 1];
            if !OPERATORS.iter().any(|op| op.as_bytes() == candidate) {
                break;
            }
            length += 1;
            self.pos += 1;
        }

        if length == 0 {
            return None;
        }

        let lexeme = self.slice(start, start + length);
        let kind = match &lexeme[..] {
            ";"        => TokenKind::SemiColon,
            "(" | ")"  => TokenKind::Brace,
            "{" | "}"  => TokenKind::CurlyBrace,
            "[" | "]"  => TokenKind::SquareBrace,
            "<" | ">"  => TokenKind::AngleBrace,
            "::"       => TokenKind::ScopeOperator,
            ","        => TokenKind::CommaOperator,
            ":"        => TokenKind::ColonOperator,
            "="        => TokenKind::EqualsOperator,
            _          => TokenKind::Operator,
        };

        Some(Token { kind, lexeme, line: self.line })
    }

    fn scan_unknown(&mut self) -> Option<Token> {
        if self.eof() {
            return None;
        }

        let lexeme = self.slice(self.pos, self.pos + 1);
        self.pos += 1;
        Some(Token { kind: TokenKind::Unknown, lexeme, line: self.line })
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        while !self.eof() {
            let active_line = self.line;

            if self.skip_whitespace_except_eol() {
                continue;
            }
            if self.skip_eol() {
                self.start_of_line = true;
                continue;
            }

            if self.start_of_line && self.cur() == b'#' {
                self.skip_preprocessor();
                self.start_of_line = true;
                continue;
            }

            if self.skip_c_comment() {
                if active_line != self.line {
                    self.start_of_line = true;
                }
                continue;
            }

            if let Some(token) = self.scan_directive_or_doc() {
                self.start_of_line = true;
                return Ok(Some(token));
            }

            if self.skip_line_comment() {
                self.start_of_line = true;
                continue;
            }

            if let Some(token) = self.scan_quote()? {
                self.start_of_line = false;
                return Ok(Some(token));
            }

            if let Some(token) = self.scan_char()? {
                self.start_of_line = false;
                return Ok(Some(token));
            }

            if let Some(token) = self.scan_number() {
                self.start_of_line = false;
                return Ok(Some(token));
            }

            if let Some(token) = self.scan_identifier() {
                self.start_of_line = false;
                return Ok(Some(token));
            }

            if let Some(token) = self.scan_operator() {
                self.start_of_line = false;
                return Ok(Some(token));
            }

            if let Some(token) = self.scan_unknown() {
                self.start_of_line = false;
                return Ok(Some(token));
            }
        }

        Ok(None)
    }
}
