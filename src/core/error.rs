// Error taxonomy shared by the token stream, the codecs, and the CLI.
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    NotFound,
    Io,
    MalformedValue,
    UnexpectedDiscriminatorPosition,
    UnknownDiscriminator,
    Structural,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    property: Option<String>,
    expected: Option<&'static str>,
    discriminator: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            property: None,
            expected: None,
            discriminator: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    pub fn expected(&self) -> Option<&'static str> {
        self.expected
    }

    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Attaches `property` unless an inner decoder already named one.
    pub fn with_property_if_absent(self, property: &str) -> Self {
        if self.property.is_some() {
            return self;
        }
        self.with_property(property)
    }

    pub fn with_expected(mut self, expected: &'static str) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn with_discriminator(mut self, tag: impl Into<String>) -> Self {
        self.discriminator = Some(tag.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(property) = &self.property {
            write!(f, " (property: {property})")?;
        }
        if let Some(expected) = self.expected {
            write!(f, " (expected: {expected})")?;
        }
        if let Some(tag) = &self.discriminator {
            write!(f, " (discriminator: {tag})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::NotFound => 3,
        ErrorKind::Io => 4,
        ErrorKind::MalformedValue => 5,
        ErrorKind::UnexpectedDiscriminatorPosition => 6,
        ErrorKind::UnknownDiscriminator => 7,
        ErrorKind::Structural => 8,
    }
}
