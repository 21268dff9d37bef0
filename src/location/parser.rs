//! Recursive-descent parser for feature-table location expressions.
//!
//! ```text
//! location    := range | complement | join
//! range       := ['<'] INT ['..' ['>'] INT]
//! complement  := 'complement(' location ')'
//! join        := 'join(' location (',' location)* ')'
//! ```

use crate::error::Error;

use super::{Location, Span};

/// Parse a location expression such as `join(467..1347,1442..1921)`.
///
/// Nested joins are flattened. A complement inside a join is rejected.
pub fn parse_location(text: &str) -> Result<Location, Error> {
    let mut parser = LocationParser::new(text);
    let location = parser.location()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing text"));
    }
    Ok(location)
}

struct LocationParser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> LocationParser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consume `token` if the input continues with it.
    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), Error> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{token}'")))
        }
    }

    fn location(&mut self) -> Result<Location, Error> {
        self.skip_whitespace();
        if self.eat("complement(") {
            let inner = self.location()?;
            self.expect(")")?;
            return Ok(Location::Complement(Box::new(inner)));
        }
        if self.eat("join(") {
            return self.join();
        }
        if self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            let name_len = self
                .rest()
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'.')
                .count();
            let name = &self.rest()[..name_len];
            return Err(self.error(&format!("unsupported operator or reference '{name}'")));
        }
        self.range().map(Location::Simple)
    }

    fn join(&mut self) -> Result<Location, Error> {
        let mut parts = Vec::new();
        loop {
            self.skip_whitespace();
            let part_pos = self.pos;
            match self.location()? {
                Location::Simple(span) => parts.push(span),
                Location::Joined(inner) => parts.extend(inner),
                Location::Complement(_) => {
                    return Err(
                        self.error_at(part_pos, "complement inside join is not supported")
                    );
                }
            }
            if self.eat(",") {
                continue;
            }
            self.expect(")")?;
            return Ok(Location::Joined(parts));
        }
    }

    fn range(&mut self) -> Result<Span, Error> {
        self.skip_whitespace();
        let range_pos = self.pos;
        self.eat("<");
        let start = self.coordinate()?;
        let end = if self.eat("..") {
            self.eat(">");
            self.coordinate()?
        } else {
            start
        };

        if start == 0 {
            return Err(self.error_at(range_pos, "coordinates are 1-based"));
        }
        if start > end {
            return Err(self.error_at(range_pos, "start exceeds end"));
        }
        Ok(Span::new(start, end))
    }

    fn coordinate(&mut self) -> Result<usize, Error> {
        self.skip_whitespace();
        let digits = self.rest().bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(self.error("expected a coordinate"));
        }
        let value = self.rest()[..digits]
            .parse::<usize>()
            .map_err(|e| self.error(&format!("invalid coordinate: {e}")))?;
        self.pos += digits;
        Ok(value)
    }

    fn error(&self, reason: &str) -> Error {
        self.error_at(self.pos, reason)
    }

    fn error_at(&self, pos: usize, reason: &str) -> Error {
        let near = if pos >= self.text.len() {
            "<end of input>".to_string()
        } else {
            self.text[pos..].to_string()
        };
        Error::Location {
            expression: self.text.to_string(),
            near,
            reason: reason.to_string(),
        }
    }
}
