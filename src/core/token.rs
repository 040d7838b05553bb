// Token vocabulary exchanged between the JSON reader and the codecs.
use serde_json::Number;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    PropertyName(String),
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    PropertyName,
    String,
    Number,
    Bool,
    Null,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::StartObject => TokenKind::StartObject,
            Token::EndObject => TokenKind::EndObject,
            Token::StartArray => TokenKind::StartArray,
            Token::EndArray => TokenKind::EndArray,
            Token::PropertyName(_) => TokenKind::PropertyName,
            Token::String(_) => TokenKind::String,
            Token::Number(_) => TokenKind::Number,
            Token::Bool(_) => TokenKind::Bool,
            Token::Null => TokenKind::Null,
        }
    }
}

impl TokenKind {
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TokenKind::String | TokenKind::Number | TokenKind::Bool | TokenKind::Null
        )
    }

    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::StartObject => "start of object",
            TokenKind::EndObject => "end of object",
            TokenKind::StartArray => "start of array",
            TokenKind::EndArray => "end of array",
            TokenKind::PropertyName => "property name",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Bool => "boolean",
            TokenKind::Null => "null",
        }
    }
}
