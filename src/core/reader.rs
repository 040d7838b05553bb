//! Purpose: Pull-style cursor over a fully buffered JSON token stream.
//! Exports: `JsonReader`.
//! Role: Input boundary for every decoder; tokenizes once via serde_json.
//! Invariants: Tokens appear in document order; duplicate keys are kept as written.
//! Invariants: A consumed token is never observed again (single pass, no rewind).
//! Notes: Scalar accessors (`read_string`, `read_i32`, ...) live in `core::primitive`.
use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Number;

use crate::core::error::{Error, ErrorKind};
use crate::core::token::{Token, TokenKind};

#[derive(Debug, Clone)]
pub struct JsonReader {
    tokens: Vec<Token>,
    pos: usize,
}

impl JsonReader {
    pub fn from_str(input: &str) -> Result<Self, Error> {
        let mut de = serde_json::Deserializer::from_str(input);
        Self::tokenize(&mut de)
    }

    pub fn from_slice(input: &[u8]) -> Result<Self, Error> {
        let mut de = serde_json::Deserializer::from_slice(input);
        Self::tokenize(&mut de)
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn tokenize<'de, R>(de: &mut serde_json::Deserializer<R>) -> Result<Self, Error>
    where
        R: serde_json::de::Read<'de>,
    {
        let mut tokens = Vec::new();
        TokenSink {
            tokens: &mut tokens,
        }
        .deserialize(&mut *de)
        .map_err(structural)?;
        de.end().map_err(structural)?;
        Ok(Self::from_tokens(tokens))
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(Token::kind)
    }

    /// True when positioned on `{`, i.e. before the first property of an object.
    pub fn at_object_start(&self) -> bool {
        self.peek_kind() == Some(TokenKind::StartObject)
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Index of the next token; useful in diagnostics.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn next_token(&mut self) -> Result<Token, Error> {
        let slot = self.tokens.get_mut(self.pos).ok_or_else(|| {
            Error::new(ErrorKind::Structural).with_message("unexpected end of JSON input")
        })?;
        let token = std::mem::replace(slot, Token::Null);
        self.pos += 1;
        Ok(token)
    }

    pub fn expect_start_object(&mut self) -> Result<(), Error> {
        self.expect(TokenKind::StartObject, "object")
    }

    pub fn expect_start_array(&mut self) -> Result<(), Error> {
        self.expect(TokenKind::StartArray, "array")
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), Error> {
        match self.peek_kind() {
            Some(found) if found == kind => {
                self.pos += 1;
                Ok(())
            }
            Some(found) if found.is_scalar() || found.is_container_start() => Err(Error::new(
                ErrorKind::MalformedValue,
            )
            .with_message(format!("found {}", found.describe()))
            .with_expected(expected)),
            Some(found) => Err(Error::new(ErrorKind::Structural)
                .with_message(format!("found {} where a value was required", found.describe()))
                .with_expected(expected)),
            None => Err(Error::new(ErrorKind::Structural)
                .with_message("unexpected end of JSON input")
                .with_expected(expected)),
        }
    }

    /// Returns the next property name, or `None` once the closing `}` is consumed.
    pub fn read_property_name(&mut self) -> Result<Option<String>, Error> {
        match self.next_token()? {
            Token::PropertyName(name) => Ok(Some(name)),
            Token::EndObject => Ok(None),
            other => Err(Error::new(ErrorKind::Structural).with_message(format!(
                "found {} where a property name was required",
                other.kind().describe()
            ))),
        }
    }

    /// Consumes exactly one value of arbitrary nesting depth.
    pub fn skip_value(&mut self) -> Result<(), Error> {
        let mut depth = 0usize;
        loop {
            match self.next_token()? {
                Token::StartObject | Token::StartArray => depth += 1,
                Token::EndObject | Token::EndArray if depth > 0 => depth -= 1,
                Token::PropertyName(_) if depth > 0 => continue,
                Token::String(_) | Token::Number(_) | Token::Bool(_) | Token::Null => {}
                other => {
                    return Err(Error::new(ErrorKind::Structural).with_message(format!(
                        "found {} where a value was required",
                        other.kind().describe()
                    )));
                }
            }
            if depth == 0 {
                return Ok(());
            }
        }
    }
}

impl TokenKind {
    fn is_container_start(self) -> bool {
        matches!(self, TokenKind::StartObject | TokenKind::StartArray)
    }
}

fn structural(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::Structural)
        .with_message(format!(
            "invalid JSON at line {} column {}",
            err.line(),
            err.column()
        ))
        .with_source(err)
}

struct TokenSink<'t> {
    tokens: &'t mut Vec<Token>,
}

impl<'de> DeserializeSeed<'de> for TokenSink<'_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for TokenSink<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.tokens.push(Token::Bool(v));
        Ok(())
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.tokens.push(Token::Number(Number::from(v)));
        Ok(())
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.tokens.push(Token::Number(Number::from(v)));
        Ok(())
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let number = Number::from_f64(v).ok_or_else(|| E::custom("non-finite number"))?;
        self.tokens.push(Token::Number(number));
        Ok(())
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.tokens.push(Token::String(v.to_owned()));
        Ok(())
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.tokens.push(Token::String(v));
        Ok(())
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.tokens.push(Token::Null);
        Ok(())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.visit_unit()
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let tokens = self.tokens;
        tokens.push(Token::StartArray);
        while seq
            .next_element_seed(TokenSink {
                tokens: &mut *tokens,
            })?
            .is_some()
        {}
        tokens.push(Token::EndArray);
        Ok(())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let tokens = self.tokens;
        tokens.push(Token::StartObject);
        while let Some(key) = map.next_key::<String>()? {
            tokens.push(Token::PropertyName(key));
            map.next_value_seed(TokenSink {
                tokens: &mut *tokens,
            })?;
        }
        tokens.push(Token::EndObject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::JsonReader;
    use crate::core::error::ErrorKind;
    use crate::core::token::{Token, TokenKind};

    #[test]
    fn tokens_follow_document_order() {
        let mut reader = JsonReader::from_str(r#"{"b":1,"a":[true,null],"b":"x"}"#).expect("parse");
        assert!(reader.at_object_start());
        reader.expect_start_object().expect("object");
        assert_eq!(reader.read_property_name().expect("name").as_deref(), Some("b"));
        assert_eq!(reader.next_token().expect("value").kind(), TokenKind::Number);
        assert_eq!(reader.read_property_name().expect("name").as_deref(), Some("a"));
        assert_eq!(reader.next_token().expect("array"), Token::StartArray);
        assert_eq!(reader.next_token().expect("bool"), Token::Bool(true));
        assert_eq!(reader.next_token().expect("null"), Token::Null);
        assert_eq!(reader.next_token().expect("end"), Token::EndArray);
        assert_eq!(reader.read_property_name().expect("name").as_deref(), Some("b"));
        assert_eq!(
            reader.next_token().expect("value"),
            Token::String("x".to_string())
        );
        assert_eq!(reader.read_property_name().expect("end"), None);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn skip_value_consumes_nested_containers() {
        let mut reader =
            JsonReader::from_str(r#"{"deep":{"a":[1,{"b":[[]]}],"c":{}},"next":7}"#).expect("parse");
        reader.expect_start_object().expect("object");
        assert_eq!(reader.read_property_name().expect("name").as_deref(), Some("deep"));
        reader.skip_value().expect("skip");
        assert_eq!(reader.read_property_name().expect("name").as_deref(), Some("next"));
        reader.skip_value().expect("skip scalar");
        assert_eq!(reader.read_property_name().expect("end"), None);
    }

    #[test]
    fn malformed_input_is_structural() {
        for input in [r#"{"a":}"#, r#"{"a":1"#, "[1,2] trailing", ""] {
            let err = JsonReader::from_str(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Structural, "input: {input:?}");
        }
        let err = JsonReader::from_slice(&[0xff, b'{', b'}']).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn truncated_token_stream_is_structural() {
        let mut reader = JsonReader::from_tokens(vec![Token::StartObject, Token::PropertyName("a".into())]);
        reader.expect_start_object().expect("object");
        reader.read_property_name().expect("name");
        let err = reader.skip_value().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn shape_mismatch_is_malformed_value() {
        let mut reader = JsonReader::from_str(r#""not an object""#).expect("parse");
        let err = reader.expect_start_object().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedValue);
        assert_eq!(err.expected(), Some("object"));
    }
}
