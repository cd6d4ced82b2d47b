//! Book schema validation
//!
//! Presence and JSON type are checked on the raw payload first, then the
//! value rules declared on the models (non-empty, URI, ranges) run through
//! `validator`. Every violation is collected so a client can fix all of
//! them in one round trip. Nothing here touches storage.

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::models::book::{Book, BookFields};

/// Schema fields, in the order violations are reported
pub const BOOK_FIELDS: [&str; 8] = [
    "isbn",
    "amazon_url",
    "author",
    "language",
    "pages",
    "publisher",
    "title",
    "year",
];

/// Rule a field failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    /// Field is missing
    Required,
    /// Field has the wrong JSON type (null included)
    Type,
    /// Field has the right type but an unacceptable value
    Format,
    /// Field is not part of the schema and the policy forbids extras
    Unrecognized,
}

/// A single schema rule failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    /// Field path, empty for the payload itself
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

impl Violation {
    pub fn required(field: &str) -> Self {
        Self {
            field: field.to_string(),
            rule: Rule::Required,
            message: format!("{} is required", field),
        }
    }

    pub fn wrong_type(field: &str, expected: &str) -> Self {
        Self {
            field: field.to_string(),
            rule: Rule::Type,
            message: format!("{} must be {}", field, expected),
        }
    }

    pub fn format(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            rule: Rule::Format,
            message: message.into(),
        }
    }

    pub fn unrecognized(field: &str) -> Self {
        Self {
            field: field.to_string(),
            rule: Rule::Unrecognized,
            message: format!("{} is not a recognized field", field),
        }
    }
}

/// How the embedding application treats fields outside the schema
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub reject_unknown_fields: bool,
}

/// Validate a create payload into a complete book record.
pub fn validate_book(payload: &Value, policy: &ValidationPolicy) -> Result<Book, Vec<Violation>> {
    let mut reader = PayloadReader::new(payload, policy)?;

    let book = Book {
        isbn: reader.text("isbn"),
        amazon_url: reader.text("amazon_url"),
        author: reader.text("author"),
        language: reader.text("language"),
        pages: reader.integer("pages"),
        publisher: reader.text("publisher"),
        title: reader.text("title"),
        year: reader.integer("year"),
    };

    reader.finish(book.validate())?;
    Ok(book)
}

/// Validate a full-replacement payload for the book at `isbn`.
///
/// The path ISBN is authoritative: the body may omit `isbn`, but when it
/// carries one it has to be the same string.
pub fn validate_replacement(
    isbn: &str,
    payload: &Value,
    policy: &ValidationPolicy,
) -> Result<BookFields, Vec<Violation>> {
    let mut reader = PayloadReader::new(payload, policy)?;
    let object = reader.object;

    match object.get("isbn") {
        None => {}
        Some(Value::String(body_isbn)) if body_isbn == isbn => {}
        Some(Value::String(_)) => reader.push(Violation::format(
            "isbn",
            "isbn must match the isbn in the request path",
        )),
        Some(_) => reader.push(Violation::wrong_type("isbn", "a string")),
    }

    let fields = BookFields {
        amazon_url: reader.text("amazon_url"),
        author: reader.text("author"),
        language: reader.text("language"),
        pages: reader.integer("pages"),
        publisher: reader.text("publisher"),
        title: reader.text("title"),
        year: reader.integer("year"),
    };

    reader.finish(fields.validate())?;
    Ok(fields)
}

/// Walks a JSON object field by field, recording violations instead of
/// stopping at the first one. Bad fields read as a default value that is
/// never persisted.
struct PayloadReader<'a> {
    object: &'a Map<String, Value>,
    policy: &'a ValidationPolicy,
    violations: Vec<Violation>,
}

impl<'a> PayloadReader<'a> {
    fn new(payload: &'a Value, policy: &'a ValidationPolicy) -> Result<Self, Vec<Violation>> {
        let object = payload.as_object().ok_or_else(|| {
            vec![Violation {
                field: String::new(),
                rule: Rule::Type,
                message: "payload must be a JSON object".to_string(),
            }]
        })?;

        Ok(Self {
            object,
            policy,
            violations: Vec::new(),
        })
    }

    fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    fn text(&mut self, field: &str) -> String {
        match self.object.get(field) {
            None => {
                self.push(Violation::required(field));
                String::new()
            }
            Some(Value::String(value)) => value.clone(),
            Some(_) => {
                self.push(Violation::wrong_type(field, "a string"));
                String::new()
            }
        }
    }

    fn integer(&mut self, field: &str) -> i32 {
        let Some(value) = self.object.get(field) else {
            self.push(Violation::required(field));
            return 0;
        };

        if let Some(number) = value.as_i64() {
            if let Ok(number) = i32::try_from(number) {
                return number;
            }
        } else if !value.is_u64() {
            self.push(Violation::wrong_type(field, "an integer"));
            return 0;
        }

        self.push(Violation::format(field, format!("{} is out of range", field)));
        0
    }

    fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Merge value-rule failures and unknown fields, then settle the outcome.
    fn finish(mut self, rules: Result<(), ValidationErrors>) -> Result<(), Vec<Violation>> {
        if let Err(errors) = rules {
            for (field, errors) in errors.field_errors() {
                let field: &str = field.as_ref();
                // A missing or mistyped field was read as a placeholder
                if self.has_violation(field) {
                    continue;
                }
                for error in errors.iter() {
                    let message = match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("{} failed the {} rule", field, error.code),
                    };
                    self.push(Violation::format(field, message));
                }
            }
        }

        if self.policy.reject_unknown_fields {
            let unknown: Vec<Violation> = self
                .object
                .keys()
                .filter(|key| !BOOK_FIELDS.contains(&key.as_str()))
                .map(|key| Violation::unrecognized(key))
                .collect();
            self.violations.extend(unknown);
        }

        if self.violations.is_empty() {
            return Ok(());
        }

        self.violations.sort_by(|a, b| {
            field_rank(&a.field)
                .cmp(&field_rank(&b.field))
                .then_with(|| a.field.cmp(&b.field))
        });
        Err(self.violations)
    }
}

fn field_rank(field: &str) -> usize {
    BOOK_FIELDS
        .iter()
        .position(|known| *known == field)
        .unwrap_or(BOOK_FIELDS.len())
}
