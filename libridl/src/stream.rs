//
// stream.rs
// The RIDL Compiler
//

//! The token-stack machine: a LIFO of token streams of which the
//! top is the active one. Every production that consumes a balanced
//! region first extracts it, pushes it as a new stream, recurses
//! with exactly the needed tokens visible, and pops on exit. This
//! is what makes the parser re-entrant over macro-expanded aliases,
//! attribute bodies, template parameter lists, and brace-delimited
//! regions without copying the outer stream.
//!
//! Each frame remembers the most recently seen token so that an
//! unexpected end-of-input can always be reported at the line of
//! the last successfully consumed token.

use lexer::{ RcToken, TokenKind, TokenList };
use error::{ Error, Result };


/// A stack of token streams plus "last seen token" bookkeeping
/// for error line reporting.
#[derive(Debug, Default)]
pub struct TokenStack {
    frames: Vec<TokenList>,
    last_seen: Vec<Option<RcToken>>,
    last_token: Option<RcToken>,
}

impl TokenStack {
    /// Creates an empty stack. No operation other than `push()`
    /// is meaningful on an empty stack.
    pub fn new() -> TokenStack {
        TokenStack::default()
    }

    /// Pushes a stream and makes it the active one.
    pub fn push(&mut self, tokens: TokenList) {
        self.last_seen.push(tokens.front().cloned());
        self.frames.push(tokens);
    }

    /// Discards the active stream and restores the previous
    /// frame's "last seen" token. Popping an empty stack is a
    /// programmer error.
    pub fn pop(&mut self) -> TokenList {
        let frame = self.frames.pop().expect("token stack underflow");
        let _ = self.last_seen.pop().expect("token stack underflow");

        if let Some(&Some(ref token)) = self.last_seen.last() {
            self.last_token = Some(token.clone());
        }

        frame
    }

    /// Whether the active stream has at least one token left.
    pub fn has_more(&self) -> bool {
        match self.frames.last() {
            Some(frame) => !frame.is_empty(),
            None => false,
        }
    }

    /// The line of the most recently consumed token, for error
    /// reporting. Defaults to 1 before anything was consumed.
    pub fn last_line(&self) -> usize {
        match self.last_token {
            Some(ref token) => token.line,
            None => 1,
        }
    }

    /// Returns the front of the active stream without consuming it.
    /// An exhausted stream is an end-of-input error mentioning
    /// `what` (the production that needed the token).
    pub fn peek(&self, what: &str) -> Result<RcToken> {
        if let Some(frame) = self.frames.last() {
            if let Some(token) = frame.front() {
                return Ok(token.clone());
            }
        }

        Err(self.end_of_input(what))
    }

    /// Consumes and returns the front of the active stream.
    /// An exhausted stream is an end-of-input error mentioning `what`.
    pub fn extract(&mut self, what: &str) -> Result<RcToken> {
        let extracted = match self.frames.last_mut() {
            Some(frame) => frame.pop_front(),
            None => None,
        };

        match extracted {
            Some(token) => {
                self.remember(&token);
                Ok(token)
            },
            None => Err(self.end_of_input(what)),
        }
    }

    /// Pushes a token back onto the front of the active stream.
    pub fn put_back(&mut self, token: RcToken) {
        let frame = self.frames.last_mut().expect("must have an active stream of tokens");
        frame.push_front(token.clone());
        self.remember(&token);
    }

    /// Pushes a whole list back onto the front of the active
    /// stream, preserving its order.
    pub fn put_back_many(&mut self, tokens: TokenList) {
        {
            let frame = self.frames.last_mut().expect("must have an active stream of tokens");
            for token in tokens.into_iter().rev() {
                frame.push_front(token);
            }
        }

        let front = match self.frames.last() {
            Some(frame) => frame.front().cloned(),
            None => None,
        };
        if let Some(token) = front {
            self.remember(&token);
        }
    }

    /// The next token must open a brace region; consumes tokens,
    /// maintaining a depth counter per brace kind, until all four
    /// counters return to zero. A close without a matching open is
    /// a brace mismatch error. Returns `false` (consuming nothing)
    /// when the next token does not open a region.
    ///
    /// When `include_outer` is false, the outermost open/close pair
    /// is stripped from `out`.
    pub fn extract_to_closing_brace(
        &mut self,
        what: &str,
        out: &mut TokenList,
        include_outer: bool,
    ) -> Result<bool> {
        {
            let first = self.peek(what)?;
            if !first.is_open_brace() {
                return Ok(false);
            }
        }

        let mut braces = 0usize;
        let mut curlies = 0usize;
        let mut squares = 0usize;
        let mut angles = 0usize;

        loop {
            let token = self.extract(what)?;

            if token.is_open_brace() {
                match token.kind {
                    TokenKind::Brace       => braces += 1,
                    TokenKind::CurlyBrace  => curlies += 1,
                    TokenKind::SquareBrace => squares += 1,
                    TokenKind::AngleBrace  => angles += 1,
                    _ => {},
                }
            } else if token.is_close_brace() {
                let count = match token.kind {
                    TokenKind::Brace       => &mut braces,
                    TokenKind::CurlyBrace  => &mut curlies,
                    TokenKind::SquareBrace => &mut squares,
                    TokenKind::AngleBrace  => &mut angles,
                    _ => unreachable!("close brace of a non-brace kind"),
                };
                if *count == 0 {
                    syntax_error!(self.last_line(), "{} brace mismatch", what);
                }
                *count -= 1;
            }

            out.push_back(token);

            if braces == 0 && curlies == 0 && squares == 0 && angles == 0 {
                break;
            }
        }

        if !include_outer && out.len() > 1 {
            out.pop_front();
            out.pop_back();
        }

        Ok(true)
    }

    /// Consumes tokens until one of the requested kind is seen at
    /// the current brace depth. The found token is never appended
    /// to `out`; `include_found` decides whether it is swallowed or
    /// put back. With `process_brackets`, balanced brace regions
    /// are copied verbatim into `out` so that their commas and
    /// terminators do not act as delimiters, and a close brace at
    /// depth zero is put back and ends the scan.
    pub fn extract_to_token_kind(
        &mut self,
        what: &str,
        kind: TokenKind,
        out: &mut TokenList,
        include_found: bool,
        process_brackets: bool,
    ) -> Result<bool> {
        while self.has_more() {
            let token = self.extract(what)?;

            if token.kind == kind {
                if !include_found {
                    self.put_back(token);
                }
                break;
            }

            if process_brackets && token.is_brace() {
                self.put_back(token.clone());
                if token.is_close_brace() {
                    return Ok(true);
                }

                self.extract_to_closing_brace(what, out, true)?;
                continue;
            }

            out.push_back(token);
        }

        Ok(true)
    }

    /// Consumes tokens up to and including the next top-level
    /// comma (or the end of the active stream, whichever comes
    /// first); the comma itself is swallowed.
    pub fn extract_to_comma(&mut self, what: &str, out: &mut TokenList) -> Result<bool> {
        self.extract_to_token_kind(what, TokenKind::CommaOperator, out, true, true)
    }

    fn remember(&mut self, token: &RcToken) {
        self.last_token = Some(token.clone());
        if let Some(slot) = self.last_seen.last_mut() {
            *slot = Some(token.clone());
        }
    }

    fn end_of_input(&self, what: &str) -> Error {
        Error::Syntax {
            message: format!("{} unexpectedly reached end of input", what),
            line: self.last_line(),
        }
    }
}
