//! Record schemas: the two lead kinds and the rules that admit a payload.
//!
//! Validation maps an inbound JSON object field by field from an explicit
//! allow-list. Unknown fields are ignored and never reach the stored document.
//! Every failing field is reported, not only the first.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use validator::ValidateEmail as _;

use crate::store::Document;

// ─── Record kind ─────────────────────────────────────────────────────────────

/// The kinds of record this service accepts. Each maps to its own collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
  ContactLead,
  PlanInquiry,
}

impl RecordKind {
  pub fn name(self) -> &'static str {
    match self {
      Self::ContactLead => "ContactLead",
      Self::PlanInquiry => "PlanInquiry",
    }
  }

  /// The collection name: the kind name lower-cased.
  pub fn collection(self) -> &'static str {
    match self {
      Self::ContactLead => "contactlead",
      Self::PlanInquiry => "planinquiry",
    }
  }

  /// Check `payload` against this kind's schema without building a record.
  pub fn validate(self, payload: &Document) -> Result<(), ValidationError> {
    match self {
      Self::ContactLead => ContactLead::validate(payload).map(drop),
      Self::PlanInquiry => PlanInquiry::validate(payload).map(drop),
    }
  }
}

impl fmt::Display for RecordKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.collection())
  }
}

// ─── Validation errors ───────────────────────────────────────────────────────

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
  #[error("field required")]
  Missing,
  #[error("value must be a string")]
  NotText,
  #[error("value must not be empty")]
  Empty,
  #[error("value is not a valid email address")]
  InvalidEmail,
}

/// A payload that failed its schema, with every offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
  pub kind:   RecordKind,
  pub fields: Vec<(&'static str, FieldError)>,
}

impl ValidationError {
  pub fn field(&self, name: &str) -> Option<&FieldError> {
    self.fields.iter().find(|(f, _)| *f == name).map(|(_, e)| e)
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "invalid {} payload: ", self.kind)?;
    for (i, (field, err)) in self.fields.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{field}: {err}")?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationError {}

// ─── Email ───────────────────────────────────────────────────────────────────

/// A syntactically valid email address. The domain part is lower-cased.
///
/// Beyond the syntax check, the domain must be a dotted name: single-label
/// hosts (`localhost`) and address literals (`[127.0.0.1]`) are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
  pub fn parse(raw: &str) -> Result<Self, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err(FieldError::Empty);
    }
    let Some((local, domain)) = trimmed.rsplit_once('@') else {
      return Err(FieldError::InvalidEmail);
    };
    let domain = domain.to_ascii_lowercase();
    let candidate = format!("{local}@{domain}");
    if !candidate.validate_email() || domain.starts_with('[') || !domain.contains('.') {
      return Err(FieldError::InvalidEmail);
    }
    Ok(Self(candidate))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str { &self.0 }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl TryFrom<String> for Email {
  type Error = FieldError;

  fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(&value) }
}

impl From<Email> for String {
  fn from(email: Email) -> Self { email.0 }
}

// ─── Field reader ────────────────────────────────────────────────────────────

/// Reads allow-listed fields out of a payload, accumulating failures.
struct Fields<'a> {
  payload: &'a Document,
  errors:  Vec<(&'static str, FieldError)>,
}

impl<'a> Fields<'a> {
  fn new(payload: &'a Document) -> Self {
    Self {
      payload,
      errors: Vec::new(),
    }
  }

  /// `Ok(None)` for absent or `null`; `Err` for any non-string value.
  fn text(&mut self, name: &'static str) -> Result<Option<&'a str>, ()> {
    match self.payload.get(name) {
      None | Some(Value::Null) => Ok(None),
      Some(Value::String(s)) => Ok(Some(s.as_str())),
      Some(_) => {
        self.errors.push((name, FieldError::NotText));
        Err(())
      }
    }
  }

  fn optional_text(&mut self, name: &'static str) -> Option<String> {
    self.text(name).ok().flatten().map(str::to_owned)
  }

  fn required_text(&mut self, name: &'static str) -> Option<String> {
    match self.text(name) {
      Ok(Some(s)) if !s.is_empty() => Some(s.to_owned()),
      Ok(Some(_)) => {
        self.errors.push((name, FieldError::Empty));
        None
      }
      Ok(None) => {
        self.errors.push((name, FieldError::Missing));
        None
      }
      Err(()) => None,
    }
  }

  fn required_email(&mut self, name: &'static str) -> Option<Email> {
    match self.text(name) {
      Ok(Some(s)) => Email::parse(s)
        .map_err(|e| self.errors.push((name, e)))
        .ok(),
      Ok(None) => {
        self.errors.push((name, FieldError::Missing));
        None
      }
      Err(()) => None,
    }
  }

  fn into_error(self, kind: RecordKind) -> ValidationError {
    ValidationError {
      kind,
      fields: self.errors,
    }
  }

  fn finish(self, kind: RecordKind) -> Result<(), ValidationError> {
    if self.errors.is_empty() {
      Ok(())
    } else {
      Err(self.into_error(kind))
    }
  }
}

// ─── Record trait ────────────────────────────────────────────────────────────

/// A storable record kind: how to admit a payload and how to store it.
pub trait Record: Sized + Send + Sync {
  const KIND: RecordKind;

  /// Build a typed record from a loosely-shaped payload.
  fn validate(payload: &Document) -> Result<Self, ValidationError>;

  /// The canonical stored shape. Omitted optional fields appear as `null`.
  fn to_document(&self) -> Document;
}

// ─── Contact lead ────────────────────────────────────────────────────────────

/// A website contact request kept for sales follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactLead {
  pub name:     String,
  pub email:    Email,
  pub company:  Option<String>,
  /// Target hashrate, free-form (e.g. `"500 TH/s"`).
  pub hashrate: Option<String>,
  pub message:  Option<String>,
}

impl Record for ContactLead {
  const KIND: RecordKind = RecordKind::ContactLead;

  fn validate(payload: &Document) -> Result<Self, ValidationError> {
    let mut f = Fields::new(payload);
    let name = f.required_text("name");
    let email = f.required_email("email");
    let company = f.optional_text("company");
    let hashrate = f.optional_text("hashrate");
    let message = f.optional_text("message");

    let (Some(name), Some(email)) = (name, email) else {
      return Err(f.into_error(Self::KIND));
    };
    f.finish(Self::KIND)?;

    Ok(Self {
      name,
      email,
      company,
      hashrate,
      message,
    })
  }

  fn to_document(&self) -> Document {
    let mut doc = Document::new();
    doc.insert("name".into(), self.name.clone().into());
    doc.insert("email".into(), self.email.as_str().into());
    doc.insert("company".into(), self.company.clone().into());
    doc.insert("hashrate".into(), self.hashrate.clone().into());
    doc.insert("message".into(), self.message.clone().into());
    doc
  }
}

// ─── Plan inquiry ────────────────────────────────────────────────────────────

/// Interest in a specific hosting plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanInquiry {
  pub plan:  String,
  pub email: Email,
  pub notes: Option<String>,
}

impl Record for PlanInquiry {
  const KIND: RecordKind = RecordKind::PlanInquiry;

  fn validate(payload: &Document) -> Result<Self, ValidationError> {
    let mut f = Fields::new(payload);
    let plan = f.required_text("plan");
    let email = f.required_email("email");
    let notes = f.optional_text("notes");

    let (Some(plan), Some(email)) = (plan, email) else {
      return Err(f.into_error(Self::KIND));
    };
    f.finish(Self::KIND)?;

    Ok(Self { plan, email, notes })
  }

  fn to_document(&self) -> Document {
    let mut doc = Document::new();
    doc.insert("plan".into(), self.plan.clone().into());
    doc.insert("email".into(), self.email.as_str().into());
    doc.insert("notes".into(), self.notes.clone().into());
    doc
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn payload(v: Value) -> Document {
    match v {
      Value::Object(m) => m,
      other => panic!("not an object: {other}"),
    }
  }

  #[test]
  fn collection_is_lowercased_name() {
    for kind in [RecordKind::ContactLead, RecordKind::PlanInquiry] {
      assert_eq!(kind.collection(), kind.name().to_lowercase());
    }
  }

  #[test]
  fn contact_lead_with_optional_fields_omitted() {
    let lead = ContactLead::validate(&payload(json!({
      "name": "Jane Doe",
      "email": "jane@example.com",
      "hashrate": "500 TH/s",
    })))
    .unwrap();

    assert_eq!(lead.name, "Jane Doe");
    assert_eq!(lead.email.as_str(), "jane@example.com");
    assert_eq!(lead.hashrate.as_deref(), Some("500 TH/s"));
    assert!(lead.company.is_none());

    let doc = lead.to_document();
    assert_eq!(doc["company"], Value::Null);
    assert_eq!(doc["message"], Value::Null);
    assert_eq!(doc.len(), 5);
  }

  #[test]
  fn malformed_email_is_rejected() {
    let err = ContactLead::validate(&payload(json!({
      "name": "Jane",
      "email": "bad-email",
    })))
    .unwrap_err();

    assert_eq!(err.kind, RecordKind::ContactLead);
    assert_eq!(err.field("email"), Some(&FieldError::InvalidEmail));
    assert!(err.to_string().contains("email: value is not a valid email address"));
  }

  #[test]
  fn every_failing_field_is_reported() {
    let err = ContactLead::validate(&payload(json!({ "company": 42 }))).unwrap_err();
    assert_eq!(err.field("name"), Some(&FieldError::Missing));
    assert_eq!(err.field("email"), Some(&FieldError::Missing));
    assert_eq!(err.field("company"), Some(&FieldError::NotText));
    assert_eq!(err.fields.len(), 3);
  }

  #[test]
  fn empty_name_and_null_email_are_rejected() {
    let err = ContactLead::validate(&payload(json!({
      "name": "",
      "email": null,
    })))
    .unwrap_err();
    assert_eq!(err.field("name"), Some(&FieldError::Empty));
    assert_eq!(err.field("email"), Some(&FieldError::Missing));
  }

  #[test]
  fn whitespace_name_counts_as_non_empty() {
    let lead = ContactLead::validate(&payload(json!({
      "name": "  ",
      "email": "jane@example.com",
    })))
    .unwrap();
    assert_eq!(lead.name, "  ");
  }

  #[test]
  fn bad_optional_field_fails_otherwise_valid_payload() {
    let err = PlanInquiry::validate(&payload(json!({
      "plan": "Enterprise",
      "email": "ops@corp.com",
      "notes": ["need", "2MW"],
    })))
    .unwrap_err();
    assert_eq!(err.fields, vec![("notes", FieldError::NotText)]);
  }

  #[test]
  fn unknown_fields_are_dropped() {
    let inquiry = PlanInquiry::validate(&payload(json!({
      "plan": "Enterprise",
      "email": "ops@corp.com",
      "notes": "need 2MW",
      "is_admin": true,
    })))
    .unwrap();

    let doc = inquiry.to_document();
    assert!(!doc.contains_key("is_admin"));
    assert_eq!(doc["notes"], "need 2MW");
  }

  #[test]
  fn email_is_trimmed_and_domain_lowercased() {
    let email = Email::parse("  Ops@CORP.com ").unwrap();
    assert_eq!(email.as_str(), "Ops@corp.com");
    assert_eq!(Email::parse(""), Err(FieldError::Empty));
    assert_eq!(Email::parse("not-an-email"), Err(FieldError::InvalidEmail));
    assert_eq!(Email::parse("a@"), Err(FieldError::InvalidEmail));
    assert_eq!(Email::parse("jane@localhost"), Err(FieldError::InvalidEmail));
    assert_eq!(Email::parse("jane@example"), Err(FieldError::InvalidEmail));
    assert_eq!(Email::parse("a@[127.0.0.1]"), Err(FieldError::InvalidEmail));
    assert!(Email::parse("jane@mail.example.co.uk").is_ok());
  }

  #[test]
  fn email_deserialization_validates() {
    assert!(serde_json::from_value::<Email>(json!("x@y.io")).is_ok());
    assert!(serde_json::from_value::<Email>(json!("nope")).is_err());
  }
}
