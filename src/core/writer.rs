//! Purpose: Buffered compact JSON writer used by every encoder.
//! Exports: `JsonWriter`.
//! Role: Output boundary; tracks object/array nesting so encoders cannot emit invalid JSON.
//! Invariants: Property order on the wire equals call order.
//! Invariants: Misuse (value without a name, unbalanced end) is an `Internal` error, not a panic.
use crate::core::error::{Error, ErrorKind};

#[derive(Debug)]
enum Scope {
    Object { items: usize, awaiting_value: bool },
    Array { items: usize },
}

#[derive(Debug, Default)]
pub struct JsonWriter {
    out: String,
    scopes: Vec<Scope>,
    root_written: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Text written so far, possibly incomplete.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> Result<String, Error> {
        if !self.scopes.is_empty() {
            return Err(misuse("document has unclosed objects or arrays"));
        }
        if !self.root_written {
            return Err(misuse("document is empty"));
        }
        Ok(self.out)
    }

    pub fn start_object(&mut self) -> Result<(), Error> {
        self.before_value()?;
        self.out.push('{');
        self.scopes.push(Scope::Object {
            items: 0,
            awaiting_value: false,
        });
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<(), Error> {
        match self.scopes.pop() {
            Some(Scope::Object {
                awaiting_value: false,
                ..
            }) => {
                self.out.push('}');
                Ok(())
            }
            Some(Scope::Object { .. }) => Err(misuse("object closed after a dangling property name")),
            Some(Scope::Array { .. }) => Err(misuse("end_object called inside an array")),
            None => Err(misuse("end_object called with no open object")),
        }
    }

    pub fn start_array(&mut self) -> Result<(), Error> {
        self.before_value()?;
        self.out.push('[');
        self.scopes.push(Scope::Array { items: 0 });
        Ok(())
    }

    pub fn end_array(&mut self) -> Result<(), Error> {
        match self.scopes.pop() {
            Some(Scope::Array { .. }) => {
                self.out.push(']');
                Ok(())
            }
            Some(Scope::Object { .. }) => Err(misuse("end_array called inside an object")),
            None => Err(misuse("end_array called with no open array")),
        }
    }

    pub fn write_property_name(&mut self, name: &str) -> Result<(), Error> {
        match self.scopes.last_mut() {
            Some(Scope::Object {
                items,
                awaiting_value,
            }) => {
                if *awaiting_value {
                    return Err(misuse("property name written twice without a value"));
                }
                if *items > 0 {
                    self.out.push(',');
                }
                *items += 1;
                *awaiting_value = true;
            }
            _ => return Err(misuse("property name written outside an object")),
        }
        push_escaped(&mut self.out, name)?;
        self.out.push(':');
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<(), Error> {
        self.before_value()?;
        push_escaped(&mut self.out, value)
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        self.before_value()?;
        self.out.push_str(if value { "true" } else { "false" });
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), Error> {
        self.write_i64(i64::from(value))
    }

    pub fn write_i64(&mut self, value: i64) -> Result<(), Error> {
        self.before_value()?;
        self.out.push_str(&value.to_string());
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), Error> {
        if !value.is_finite() {
            return Err(Error::new(ErrorKind::MalformedValue)
                .with_message(format!("{value} has no JSON representation"))
                .with_expected("double"));
        }
        self.before_value()?;
        let text = serde_json::to_string(&value).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("double formatting failed")
                .with_source(err)
        })?;
        self.out.push_str(&text);
        Ok(())
    }

    pub fn write_null(&mut self) -> Result<(), Error> {
        self.before_value()?;
        self.out.push_str("null");
        Ok(())
    }

    fn before_value(&mut self) -> Result<(), Error> {
        match self.scopes.last_mut() {
            None => {
                if self.root_written {
                    return Err(misuse("more than one root value"));
                }
                self.root_written = true;
            }
            Some(Scope::Array { items }) => {
                if *items > 0 {
                    self.out.push(',');
                }
                *items += 1;
            }
            Some(Scope::Object { awaiting_value, .. }) => {
                if !*awaiting_value {
                    return Err(misuse("value written inside an object without a property name"));
                }
                *awaiting_value = false;
            }
        }
        Ok(())
    }
}

fn push_escaped(out: &mut String, text: &str) -> Result<(), Error> {
    let encoded = serde_json::to_string(text).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("string escaping failed")
            .with_source(err)
    })?;
    out.push_str(&encoded);
    Ok(())
}

fn misuse(message: &str) -> Error {
    Error::new(ErrorKind::Internal).with_message(message)
}
