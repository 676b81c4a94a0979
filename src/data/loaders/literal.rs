// literal.rs - Decoder for the list/tuple literals printed by batch transcripts

use std::iter::Peekable;
use std::str::Chars;

/// A decoded literal value. Only data is accepted, nothing is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
    Sequence(Vec<Literal>),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value, integers widened
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Int(i) => Some(*i as f64),
            Literal::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Non-negative integer value; integral floats are accepted
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Literal::Int(i) if *i >= 0 => Some(*i as u64),
            Literal::Float(f) if *f >= 0.0 && f.fract() == 0.0 => Some(*f as u64),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Literal]> {
        match self {
            Literal::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

/// Parse a single literal. Trailing text other than whitespace is an error.
pub fn parse_literal(text: &str) -> Result<Literal, String> {
    let mut parser = LiteralParser {
        chars: text.chars().peekable(),
    };
    let value = parser.value()?;
    parser.skip_whitespace();
    if let Some(c) = parser.chars.peek() {
        return Err(format!("Unexpected '{}' after literal in '{}'", c, text.trim()));
    }
    Ok(value)
}

/// Parse a literal that must be a list or tuple
pub fn parse_sequence(text: &str) -> Result<Vec<Literal>, String> {
    match parse_literal(text)? {
        Literal::Sequence(items) => Ok(items),
        other => Err(format!("Expected a list or tuple, found {:?}", other)),
    }
}

struct LiteralParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl LiteralParser<'_> {
    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn value(&mut self) -> Result<Literal, String> {
        self.skip_whitespace();
        match self.chars.peek().copied() {
            Some('[') => self.sequence('[', ']'),
            Some('(') => self.sequence('(', ')'),
            Some(q @ ('\'' | '"')) => self.string(q),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.keyword(),
            Some(c) => Err(format!("Unexpected character '{}'", c)),
            None => Err("Unexpected end of literal".to_string()),
        }
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Literal, String> {
        self.chars.next();
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.chars.peek() == Some(&close) {
                self.chars.next();
                return Ok(Literal::Sequence(items));
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.chars.next() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(Literal::Sequence(items)),
                Some(c) => return Err(format!("Expected ',' or '{}' but found '{}'", close, c)),
                None => return Err(format!("Unterminated literal, missing '{}' for '{}'", close, open)),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<Literal, String> {
        self.chars.next();
        let mut out = String::new();
        while let Some(c) = self.chars.next() {
            match c {
                '\\' => {
                    let escaped = self.chars.next().ok_or("Unterminated escape in string")?;
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other,
                    });
                }
                c if c == quote => return Ok(Literal::Str(out)),
                c => out.push(c),
            }
        }
        Err(format!("Unterminated string starting with {}", quote))
    }

    fn number(&mut self) -> Result<Literal, String> {
        let mut token = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_') {
                token.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        let cleaned = token.replace('_', "");
        if let Ok(i) = cleaned.parse::<i64>() {
            return Ok(Literal::Int(i));
        }
        cleaned
            .parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| format!("Invalid number '{}'", token))
    }

    fn keyword(&mut self) -> Result<Literal, String> {
        let mut word = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                word.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        match word.as_str() {
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "None" => Ok(Literal::None),
            "nan" => Ok(Literal::Float(f64::NAN)),
            "inf" => Ok(Literal::Float(f64::INFINITY)),
            _ => Err(format!("Unsupported name '{}' in literal", word)),
        }
    }
}
