//! Reader and writer for the Python-style literal text used by the MS²PIP
//! modification definitions field.
//!
//! The accepted language is the data subset of Python literals: lists, tuples,
//! dicts with string keys, strings (single or double quoted, implicit
//! concatenation of adjacent strings), integers, floats, `True`, `False` and
//! `None`. The JSON spellings `true`, `false` and `null` are accepted as well so
//! that definitions copied straight out of a JSON configuration file parse.
//! Values are produced as [`serde_json::Value`], tuples becoming arrays.
//! Integers may use the `0x`, `0o` and `0b` prefixes; decimal integers with
//! leading zeros are rejected. Brackets nest at most [`MAX_DEPTH`] levels.
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Deepest bracket nesting accepted by [`parse_literal`].
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line}, column {column})")]
pub struct LiteralError {
    pub message: String,
    /// Byte offset into the parsed text
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Parse exactly one literal from `text`, surrounding whitespace and `#`
/// comments allowed.
pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser::new(text);
    parser.skip_trivia();
    let value = parser.value()?;
    parser.skip_trivia();
    if parser.pos < text.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

/// Render a value in the same literal syntax, one record per line for lists
/// of records.
pub fn to_literal(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            let one_per_line = items.iter().any(Value::is_object);
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(if one_per_line { ",\n " } else { ", " });
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_string(key, out);
                out.push_str(": ");
                write_value(item, out);
            }
            out.push('}');
        }
    }
}

fn write_string(s: &str, out: &mut String) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> LiteralError {
        let before = &self.src[..offset.min(self.src.len())];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map_or(0, |l| l.chars().count())
            + 1;
        LiteralError {
            message: message.into(),
            offset,
            line,
            column,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        match self.peek() {
            None => Err(self.error("expected a value, found end of input")),
            Some('[') => self.list(),
            Some('(') => self.parenthesized(),
            Some('{') => self.dict(),
            Some('\'') | Some('"') => self.strings().map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.keyword(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
        }
    }

    /// Comma separated values up to `close`, trailing comma allowed. Returns
    /// the items and whether at least one comma was seen.
    fn sequence(&mut self, close: char) -> Result<(Vec<Value>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_trivia();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, saw_comma));
            }
            items.push(self.value()?);
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    saw_comma = true;
                }
                Some(c) if c == close => {}
                Some(c) => {
                    return Err(self.error(format!("expected ',' or '{close}', found '{c}'")));
                }
                None => {
                    return Err(self.error(format!("unclosed bracket, expected '{close}'")));
                }
            }
        }
    }

    /// Consume an opening bracket, one level deeper.
    fn open(&mut self, bracket: char) -> Result<(), LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!(
                "nesting too deep, at most {MAX_DEPTH} levels are allowed"
            )));
        }
        self.expect(bracket)?;
        self.depth += 1;
        Ok(())
    }

    fn list(&mut self) -> Result<Value, LiteralError> {
        self.open('[')?;
        let (items, _) = self.sequence(']')?;
        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn parenthesized(&mut self) -> Result<Value, LiteralError> {
        self.open('(')?;
        let (mut items, saw_comma) = self.sequence(')')?;
        self.depth -= 1;
        // `(x)` is a grouped value, `(x,)` and `()` are tuples
        if items.len() == 1 && !saw_comma {
            return Ok(items.remove(0));
        }
        Ok(Value::Array(items))
    }

    fn dict(&mut self) -> Result<Value, LiteralError> {
        self.open('{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some('}') {
                self.bump();
                self.depth -= 1;
                return Ok(Value::Object(map));
            }
            let key_start = self.pos;
            let key = match self.value()? {
                Value::String(s) => s,
                _ => return Err(self.error_at(key_start, "dictionary keys must be strings")),
            };
            self.skip_trivia();
            match self.peek() {
                Some(':') => {
                    self.bump();
                }
                Some(',') | Some('}') => {
                    return Err(self.error_at(key_start, "sets are not supported"));
                }
                _ => return Err(self.error("expected ':' after dictionary key")),
            }
            self.skip_trivia();
            let value = self.value()?;
            map.insert(key, value);
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{c}'"))),
                None => return Err(self.error("unclosed bracket, expected '}'")),
            }
        }
    }

    /// One or more adjacent string literals, concatenated.
    fn strings(&mut self) -> Result<String, LiteralError> {
        let mut out = self.string()?;
        loop {
            let checkpoint = self.pos;
            self.skip_trivia();
            match self.peek() {
                Some('\'') | Some('"') => out.push_str(&self.string()?),
                _ => {
                    self.pos = checkpoint;
                    return Ok(out);
                }
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let quote = self.bump().ok_or_else(|| self.error("expected a string"))?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(self.error_at(start, "unterminated string literal"));
                }
                Some(c) if c == quote => return Ok(out),
                Some('\\') => self.escape(&mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let at = self.pos;
        match self.bump() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some('x') => out.push(self.hex_escape(2, at)?),
            Some('u') => out.push(self.hex_escape(4, at)?),
            Some('U') => out.push(self.hex_escape(8, at)?),
            // Unknown escapes are kept verbatim
            Some(c) => {
                out.push('\\');
                out.push(c);
            }
            None => return Err(self.error("unterminated string literal")),
        }
        Ok(())
    }

    fn hex_escape(&mut self, digits: usize, at: usize) -> Result<char, LiteralError> {
        let end = self.pos + digits;
        let hex = self
            .src
            .get(self.pos..end)
            .filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| self.error_at(at, "truncated escape sequence"))?;
        let code = u32::from_str_radix(hex, 16)
            .map_err(|_| self.error_at(at, "invalid escape sequence"))?;
        self.pos = end;
        char::from_u32(code).ok_or_else(|| self.error_at(at, "invalid unicode code point"))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let mut negative = false;
        while let Some(sign @ ('-' | '+')) = self.peek() {
            negative ^= sign == '-';
            self.bump();
            self.skip_trivia();
        }
        if let Some(radix) = self.radix_prefix() {
            return self.radix_integer(start, radix, negative);
        }
        let digits_start = self.pos;
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if let Some('-' | '+') = self.peek() {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }
        let raw: String = self.src[digits_start..self.pos]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        if raw.is_empty() || raw == "." {
            return Err(self.error_at(start, "expected a number"));
        }
        if let Some(c) = self.peek().filter(|c| c.is_alphanumeric()) {
            return Err(self.error(format!("invalid character '{c}' in number")));
        }
        if !is_float && raw.starts_with('0') && raw.bytes().any(|b| b != b'0') {
            return Err(self.error_at(
                digits_start,
                "leading zeros in decimal integers are not permitted",
            ));
        }
        let text = if negative { format!("-{raw}") } else { raw };

        if !is_float {
            return self.integer(start, &text, 10);
        }
        let f = text
            .parse::<f64>()
            .map_err(|_| self.error_at(start, format!("invalid number: {text}")))?;
        Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| self.error_at(start, format!("non-finite number: {text}")))
    }

    /// Consume a `0x`, `0o` or `0b` prefix and return its radix.
    fn radix_prefix(&mut self) -> Option<u32> {
        let mut chars = self.rest().chars();
        if chars.next() != Some('0') {
            return None;
        }
        let radix = match chars.next()? {
            'x' | 'X' => 16,
            'o' | 'O' => 8,
            'b' | 'B' => 2,
            _ => return None,
        };
        self.pos += 2;
        Some(radix)
    }

    fn radix_integer(&mut self, start: usize, radix: u32, negative: bool) -> Result<Value, LiteralError> {
        let digits_start = self.pos;
        while let Some(c) = self.peek().filter(|c| c.is_alphanumeric() || *c == '_') {
            if c != '_' && !c.is_digit(radix) {
                return Err(self.error(format!("invalid character '{c}' in number")));
            }
            self.bump();
        }
        let digits: String = self.src[digits_start..self.pos]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        if digits.is_empty() {
            return Err(self.error_at(start, "expected digits after the radix prefix"));
        }
        let text = if negative { format!("-{digits}") } else { digits };
        self.integer(start, &text, radix)
    }

    fn integer(&self, start: usize, text: &str, radix: u32) -> Result<Value, LiteralError> {
        if let Ok(i) = i64::from_str_radix(text, radix) {
            return Ok(Value::Number(i.into()));
        }
        if let Ok(u) = u64::from_str_radix(text, radix) {
            return Ok(Value::Number(u.into()));
        }
        Err(self.error_at(start, format!("integer out of range: {text}")))
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            other => Err(self.error_at(start, format!("unknown name '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_modification_records() {
        let text = "[{'name': 'Oxidation', 'unimod_accession': 35, 'mass_shift': 15.994915, 'amino_acid': 'M'},\n \
                    {'name': 'Acetyl', 'unimod_accession': 1, 'mass_shift': 42.010565, 'amino_acid': None, 'n_term': True}]";
        let value = parse_literal(text).unwrap();
        assert_eq!(
            value,
            json!([
                {"name": "Oxidation", "unimod_accession": 35, "mass_shift": 15.994915, "amino_acid": "M"},
                {"name": "Acetyl", "unimod_accession": 1, "mass_shift": 42.010565, "amino_acid": null, "n_term": true}
            ])
        );
    }

    #[test]
    fn accepts_json_spelling() {
        let value = parse_literal(r#"[{"n_term": true, "amino_acid": null, "x": false}]"#).unwrap();
        assert_eq!(value, json!([{"n_term": true, "amino_acid": null, "x": false}]));
    }

    #[test]
    fn tuples_and_grouping() {
        assert_eq!(parse_literal("()").unwrap(), json!([]));
        assert_eq!(parse_literal("(1,)").unwrap(), json!([1]));
        assert_eq!(parse_literal("(1)").unwrap(), json!(1));
        assert_eq!(parse_literal("(1, 'a', None)").unwrap(), json!([1, "a", null]));
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_literal("-17.026549").unwrap(), json!(-17.026549));
        assert_eq!(parse_literal("- 5").unwrap(), json!(-5));
        assert_eq!(parse_literal("1e-3").unwrap(), json!(0.001));
        assert_eq!(parse_literal("1_000").unwrap(), json!(1000));
        assert_eq!(parse_literal(".5").unwrap(), json!(0.5));
        assert!(parse_literal("12abc").is_err());
        assert!(parse_literal("99999999999999999999999").is_err());
        assert_eq!(parse_literal("0").unwrap(), json!(0));
        assert_eq!(parse_literal("007.5").unwrap(), json!(7.5));
        assert!(parse_literal("007").is_err());
    }

    #[test]
    fn prefixed_integers() {
        assert_eq!(parse_literal("0x10").unwrap(), json!(16));
        assert_eq!(parse_literal("0o17").unwrap(), json!(15));
        assert_eq!(parse_literal("-0b1_01").unwrap(), json!(-5));
        assert_eq!(parse_literal("0XfF").unwrap(), json!(255));
        assert!(parse_literal("0x").is_err());
        assert!(parse_literal("0b12").is_err());
        assert!(parse_literal("0o8").is_err());
    }

    #[test]
    fn nesting_depth_is_limited() {
        let nested = |depth: usize| format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        assert!(parse_literal(&nested(MAX_DEPTH)).is_ok());

        let err = parse_literal(&nested(MAX_DEPTH + 1)).unwrap_err();
        assert!(err.message.contains("nesting too deep"), "{err}");
        assert_eq!(err.offset, MAX_DEPTH);

        for depth in [3_000, 200_000] {
            assert!(parse_literal(&nested(depth)).is_err());
        }
        let dicts = format!("{}1{}", "{'a': ".repeat(10_000), "}".repeat(10_000));
        assert!(parse_literal(&dicts).is_err());
        let tuples = format!("{}{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(parse_literal(&tuples).is_err());
    }

    #[test]
    fn depth_is_released_after_each_value() {
        let wide = format!("[{}]", vec!["[[1]]"; 1_000].join(", "));
        assert_eq!(parse_literal(&wide).unwrap().as_array().unwrap().len(), 1_000);
    }

    #[test]
    fn strings_escapes_and_concatenation() {
        assert_eq!(parse_literal(r#"'it\'s'"#).unwrap(), json!("it's"));
        assert_eq!(parse_literal(r#""a\tb\x41é""#).unwrap(), json!("a\tbAé"));
        assert_eq!(parse_literal("('Gln->' 'pyro-Glu')").unwrap(), json!("Gln->pyro-Glu"));
        assert!(parse_literal("'unterminated").is_err());
    }

    #[test]
    fn trailing_commas_and_comments() {
        let text = "[\n  {'a': 1,},  # first\n  {'b': 2},\n]";
        assert_eq!(parse_literal(text).unwrap(), json!([{"a": 1}, {"b": 2}]));
    }

    #[test]
    fn unbalanced_brackets_fail() {
        let err = parse_literal("[{'name': 'Oxidation'}").unwrap_err();
        assert!(err.message.contains("unclosed"), "{err}");
        assert!(parse_literal("[{'name': 'Oxidation'}]]").is_err());
        assert!(parse_literal("{'a': [1, 2}").is_err());
    }

    #[test]
    fn rejects_non_data_syntax() {
        assert!(parse_literal("").is_err());
        assert!(parse_literal("[1, 2] + [3]").is_err());
        assert!(parse_literal("{1: 'a'}").is_err());
        assert!(parse_literal("{'a', 'b'}").is_err());
        assert!(parse_literal("__import__('os')").is_err());
        assert!(parse_literal("1e999").is_err());
    }

    #[test]
    fn error_position_points_at_line_and_column() {
        let err = parse_literal("[\n  {'a': 1},\n  {'b' 2}\n]").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 8);
    }

    #[test]
    fn rendered_literal_reads_back() {
        let value = json!([
            {"name": "Gln->pyro-Glu", "mass_shift": -17.026549, "amino_acid": "Q", "n_term": true},
            {"name": "it's", "amino_acid": null}
        ]);
        let text = to_literal(&value);
        assert!(text.starts_with("[{'name': 'Gln->pyro-Glu'"));
        assert!(text.contains("\n "));
        assert!(text.contains("True"));
        assert!(text.contains("\"it's\""));
        assert_eq!(parse_literal(&text).unwrap(), value);
    }
}
