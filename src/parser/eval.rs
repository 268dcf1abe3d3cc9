//! Restricted literal evaluator for parameter default expressions.
//!
//! Accepts numbers, strings, template strings without interpolation,
//! `true`/`false`/`null`/`undefined`/`NaN`/`Infinity`, unary `+`/`-` on
//! numbers, arrays and objects of those, parentheses, and identifiers that
//! name a bound parameter (which evaluate to `undefined`). Calls, member
//! access, operators and free identifiers are rejected with an [`EvalError`].

use crate::model::Literal;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("unexpected character {0:?} at offset {1}")]
    UnexpectedChar(char, usize),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unsupported expression: {0}")]
    Unsupported(&'static str),

    #[error("unbound identifier: {0}")]
    UnboundIdentifier(String),

    #[error("invalid number literal: {0}")]
    InvalidNumber(String),

    #[error("trailing input after expression: {0:?}")]
    TrailingInput(String),

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Names pre-bound to `undefined` for one evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    bound: &'a [String],
}

impl<'a> Scope<'a> {
    pub fn new(bound: &'a [String]) -> Self {
        Scope { bound }
    }

    fn resolve(&self, ident: &str) -> Option<Literal> {
        self.bound
            .iter()
            .any(|name| name == ident)
            .then_some(Literal::Undefined)
    }
}

/// Evaluate a single expression in a fresh evaluator.
pub fn evaluate(expr: &str, scope: Scope<'_>) -> Result<Literal, EvalError> {
    let mut ev = Evaluator {
        src: expr,
        pos: 0,
        depth: 0,
        scope,
    };
    let value = ev.expression()?;
    ev.skip_ws();
    match ev.peek() {
        None => Ok(value),
        Some(c) => Err(ev.unsupported_after_value(c)),
    }
}

const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "new", "function", "async", "await", "class", "typeof", "void", "delete", "this", "yield",
    "super", "import",
];

/// Nesting limit for brackets, braces, parentheses and unary signs.
const MAX_DEPTH: usize = 64;

struct Evaluator<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    scope: Scope<'a>,
}

impl<'a> Evaluator<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Run one nested production, failing once `MAX_DEPTH` is reached.
    fn nested<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> Result<T, EvalError>,
    ) -> Result<T, EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    fn expect(&mut self, want: char) -> Result<(), EvalError> {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(EvalError::UnexpectedChar(c, self.pos - c.len_utf8())),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    /// Classify whatever follows a complete value.
    fn unsupported_after_value(&self, c: char) -> EvalError {
        match c {
            '.' => EvalError::Unsupported("member access"),
            '(' => EvalError::Unsupported("call"),
            '[' => EvalError::Unsupported("index access"),
            '?' => EvalError::Unsupported("conditional"),
            '=' if self.rest().starts_with("=>") => EvalError::Unsupported("arrow function"),
            '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '<' | '>' | '=' | '!' => {
                EvalError::Unsupported("operator")
            }
            _ => EvalError::TrailingInput(self.rest().to_string()),
        }
    }

    fn expression(&mut self) -> Result<Literal, EvalError> {
        self.skip_ws();
        let value = self.unary()?;
        self.skip_ws();
        match self.peek() {
            Some(c @ ('.' | '(' | '[' | '?')) => Err(self.unsupported_after_value(c)),
            _ => Ok(value),
        }
    }

    fn unary(&mut self) -> Result<Literal, EvalError> {
        self.skip_ws();
        match self.peek() {
            Some(sign @ ('-' | '+')) => {
                self.bump();
                match self.nested(Self::unary)? {
                    Literal::Number(n) if sign == '-' => Ok(Literal::Number(-n)),
                    Literal::Number(n) => Ok(Literal::Number(n)),
                    _ => Err(EvalError::Unsupported("unary operator on non-number")),
                }
            }
            Some('!') | Some('~') => Err(EvalError::Unsupported("operator")),
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Literal, EvalError> {
        self.skip_ws();
        let c = self.peek().ok_or(EvalError::UnexpectedEnd)?;
        match c {
            '0'..='9' => self.number().map(Literal::Number),
            '.' if self.peek_nth(1).is_some_and(|d| d.is_ascii_digit()) => {
                self.number().map(Literal::Number)
            }
            '\'' | '"' => self.string(c).map(Literal::String),
            '`' => self.template(),
            '[' => self.nested(Self::array),
            '{' => self.nested(Self::object),
            '(' => self.nested(|ev| {
                ev.bump();
                let value = ev.expression()?;
                ev.expect(')')?;
                Ok(value)
            }),
            c if is_ident_start(c) => {
                let ident = self.identifier();
                self.resolve_identifier(ident)
            }
            other => Err(EvalError::UnexpectedChar(other, self.pos)),
        }
    }

    fn resolve_identifier(&self, ident: &str) -> Result<Literal, EvalError> {
        match ident {
            "true" => Ok(Literal::Bool(true)),
            "false" => Ok(Literal::Bool(false)),
            "null" => Ok(Literal::Null),
            "undefined" => Ok(Literal::Undefined),
            "NaN" => Ok(Literal::Number(f64::NAN)),
            "Infinity" => Ok(Literal::Number(f64::INFINITY)),
            kw if UNSUPPORTED_KEYWORDS.contains(&kw) => Err(EvalError::Unsupported("keyword")),
            name => self
                .scope
                .resolve(name)
                .ok_or_else(|| EvalError::UnboundIdentifier(name.to_string())),
        }
    }

    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_ident_part(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }

    fn number(&mut self) -> Result<f64, EvalError> {
        let start = self.pos;
        let radix = match (self.peek(), self.peek_nth(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        if let Some(radix) = radix {
            self.pos += 2;
            while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
                self.pos += 1;
            }
            let digits: String = self.src[start + 2..self.pos].replace('_', "");
            return u64::from_str_radix(&digits, radix)
                .map(|n| n as f64)
                .map_err(|_| EvalError::InvalidNumber(self.src[start..self.pos].to_string()));
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.pos += 1;
        }
        if self.peek() == Some('.') {
            self.pos += 1;
            while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if self.peek() == Some('n') {
            return Err(EvalError::Unsupported("bigint"));
        }
        let raw = &self.src[start..self.pos];
        raw.replace('_', "")
            .parse::<f64>()
            .map_err(|_| EvalError::InvalidNumber(raw.to_string()))
    }

    fn string(&mut self, quote: char) -> Result<String, EvalError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(EvalError::UnterminatedString),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => self.escape(&mut out)?,
                Some('\n') if quote != '`' => return Err(EvalError::UnterminatedString),
                Some(c) => out.push(c),
            }
        }
    }

    fn template(&mut self) -> Result<Literal, EvalError> {
        let body_start = self.pos + 1;
        let value = self.string('`')?;
        if self.src[body_start..self.pos].contains("${") {
            return Err(EvalError::Unsupported("template interpolation"));
        }
        Ok(Literal::String(value))
    }

    fn escape(&mut self, out: &mut String) -> Result<(), EvalError> {
        let c = self.bump().ok_or(EvalError::UnterminatedString)?;
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // line continuation
            '\n' => {}
            'x' => {
                let code = self.hex_digits(2)?;
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'u' => {
                let code = if self.peek() == Some('{') {
                    self.bump();
                    let start = self.pos;
                    while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                        self.pos += 1;
                    }
                    let digits = &self.src[start..self.pos];
                    self.expect('}')?;
                    u32::from_str_radix(digits, 16)
                        .map_err(|_| EvalError::InvalidNumber(digits.to_string()))?
                } else {
                    self.hex_digits(4)?
                };
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32, EvalError> {
        let start = self.pos;
        for _ in 0..count {
            match self.bump() {
                Some(c) if c.is_ascii_hexdigit() => {}
                Some(c) => return Err(EvalError::UnexpectedChar(c, self.pos - c.len_utf8())),
                None => return Err(EvalError::UnterminatedString),
            }
        }
        let digits = &self.src[start..self.pos];
        u32::from_str_radix(digits, 16).map_err(|_| EvalError::InvalidNumber(digits.to_string()))
    }

    fn array(&mut self) -> Result<Literal, EvalError> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Err(EvalError::UnexpectedEnd),
                Some(']') => {
                    self.bump();
                    return Ok(Literal::Array(items));
                }
                // hole
                Some(',') => {
                    self.bump();
                    items.push(Literal::Undefined);
                    continue;
                }
                Some('.') if self.rest().starts_with("...") => {
                    return Err(EvalError::Unsupported("spread"));
                }
                Some(_) => items.push(self.expression()?),
            }
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(']') => return Ok(Literal::Array(items)),
                Some(c) => return Err(EvalError::UnexpectedChar(c, self.pos - c.len_utf8())),
                None => return Err(EvalError::UnexpectedEnd),
            }
        }
    }

    fn object(&mut self) -> Result<Literal, EvalError> {
        self.bump();
        let mut entries = Vec::new();
        loop {
            self.skip_ws();
            let c = self.peek().ok_or(EvalError::UnexpectedEnd)?;
            let key = match c {
                '}' => {
                    self.bump();
                    return Ok(Literal::Object(entries));
                }
                '\'' | '"' => self.string(c)?,
                '[' => return Err(EvalError::Unsupported("computed key")),
                '.' if self.rest().starts_with("...") => {
                    return Err(EvalError::Unsupported("spread"));
                }
                '0'..='9' => format_number_key(self.number()?),
                c if is_ident_start(c) => self.identifier().to_string(),
                other => return Err(EvalError::UnexpectedChar(other, self.pos)),
            };

            self.skip_ws();
            match self.peek() {
                Some(':') => {
                    self.bump();
                    let value = self.expression()?;
                    entries.push((key, value));
                }
                // shorthand `{ a }`
                Some(',') | Some('}') => {
                    let value = self.resolve_identifier(&key)?;
                    entries.push((key, value));
                }
                Some('(') => return Err(EvalError::Unsupported("method")),
                Some(c) => return Err(EvalError::UnexpectedChar(c, self.pos)),
                None => return Err(EvalError::UnexpectedEnd),
            }

            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(Literal::Object(entries)),
                Some(c) => return Err(EvalError::UnexpectedChar(c, self.pos - c.len_utf8())),
                None => return Err(EvalError::UnexpectedEnd),
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

fn is_ident_part(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphanumeric()
}

fn format_number_key(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> Result<Literal, EvalError> {
        evaluate(expr, Scope::default())
    }

    #[test]
    fn scalars() {
        assert_eq!(eval("5"), Ok(Literal::Number(5.0)));
        assert_eq!(eval("-1.5e2"), Ok(Literal::Number(-150.0)));
        assert_eq!(eval("0x1F"), Ok(Literal::Number(31.0)));
        assert_eq!(eval(".5"), Ok(Literal::Number(0.5)));
        assert_eq!(eval("1_000"), Ok(Literal::Number(1000.0)));
        assert_eq!(eval("'auto'"), Ok(Literal::String("auto".into())));
        assert_eq!(eval(r#""a\"b\n""#), Ok(Literal::String("a\"b\n".into())));
        assert_eq!(eval("`plain`"), Ok(Literal::String("plain".into())));
        assert_eq!(eval("true"), Ok(Literal::Bool(true)));
        assert_eq!(eval("null"), Ok(Literal::Null));
        assert_eq!(eval("undefined"), Ok(Literal::Undefined));
        assert_eq!(eval(" ( 7 ) "), Ok(Literal::Number(7.0)));
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(eval(r"'A\u{1F600}\x21'"), Ok(Literal::String("A😀!".into())));
    }

    #[test]
    fn containers() {
        assert_eq!(eval("[]"), Ok(Literal::Array(vec![])));
        assert_eq!(
            eval("[1, 'two', [null],]"),
            Ok(Literal::Array(vec![
                Literal::Number(1.0),
                Literal::String("two".into()),
                Literal::Array(vec![Literal::Null]),
            ]))
        );
        assert_eq!(
            eval("{ a: 1, 'b': false, 3: [] }"),
            Ok(Literal::Object(vec![
                ("a".into(), Literal::Number(1.0)),
                ("b".into(), Literal::Bool(false)),
                ("3".into(), Literal::Array(vec![])),
            ]))
        );
    }

    #[test]
    fn bound_names_are_undefined() {
        let names = vec!["a".to_string(), "b".to_string()];
        assert_eq!(evaluate("a", Scope::new(&names)), Ok(Literal::Undefined));
        assert_eq!(
            evaluate("{ b }", Scope::new(&names)),
            Ok(Literal::Object(vec![("b".into(), Literal::Undefined)]))
        );
    }

    #[test]
    fn free_identifiers_fail() {
        assert_eq!(eval("foo"), Err(EvalError::UnboundIdentifier("foo".into())));
    }

    #[test]
    fn rejects_non_literals() {
        assert_eq!(
            eval("window.location.href"),
            Err(EvalError::UnboundIdentifier("window".into()))
        );
        let names = vec!["a".to_string()];
        assert_eq!(
            evaluate("a.length", Scope::new(&names)),
            Err(EvalError::Unsupported("member access"))
        );
        assert_eq!(
            evaluate("a()", Scope::new(&names)),
            Err(EvalError::Unsupported("call"))
        );
        assert_eq!(eval("1 + 2"), Err(EvalError::Unsupported("operator")));
        assert_eq!(eval("new Date()"), Err(EvalError::Unsupported("keyword")));
        assert_eq!(eval("`x${y}`"), Err(EvalError::Unsupported("template interpolation")));
        assert_eq!(eval("10n"), Err(EvalError::Unsupported("bigint")));
        assert_eq!(eval("-'a'"), Err(EvalError::Unsupported("unary operator on non-number")));
    }

    #[test]
    fn nesting_is_bounded() {
        let nested = format!("{}1{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(eval(&nested).is_ok());

        let deep = format!("{}1", "[".repeat(10_000));
        assert_eq!(eval(&deep), Err(EvalError::TooDeep(MAX_DEPTH)));
        assert_eq!(eval(&"{a:".repeat(10_000)), Err(EvalError::TooDeep(MAX_DEPTH)));
        assert_eq!(eval(&format!("{}1", "(".repeat(10_000))), Err(EvalError::TooDeep(MAX_DEPTH)));
        assert_eq!(eval(&format!("{}1", "-".repeat(200_000))), Err(EvalError::TooDeep(MAX_DEPTH)));
    }

    #[test]
    fn malformed_input() {
        assert_eq!(eval("'open"), Err(EvalError::UnterminatedString));
        assert_eq!(eval("[1, 2"), Err(EvalError::UnexpectedEnd));
        assert_eq!(eval(""), Err(EvalError::UnexpectedEnd));
        assert!(matches!(eval("{ a 1 }"), Err(EvalError::UnexpectedChar('1', _))));
    }
}
