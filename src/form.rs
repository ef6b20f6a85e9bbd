//! Form views and field validation.
//!
//! A view is an ordered list of field definitions. Validation is pure: it maps
//! every field of the view to an optional error message. Whether an error is
//! shown is a separate display concern tracked by [`FormState`].
use crate::error::WorkflowError;
use crate::model::RequestElement;
use chrono::NaiveDate;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

pub const REQUIRED_ERROR: &str = "this field is required";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Number,
    Date,
    Email,
    Url,
    Choice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub data_ref: String,
    #[serde(default, rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl View {
    /// Copy of the view with every field marked read-only.
    pub fn readonly(&self) -> View {
        let fields = self
            .fields
            .iter()
            .cloned()
            .map(|mut field| {
                field.read_only = true;
                field
            })
            .collect();
        View {
            name: self.name.clone(),
            fields,
        }
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|field| field.required)
    }
}

/// Named views loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct ViewSet {
    views: BTreeMap<String, View>,
}

impl ViewSet {
    pub fn new(definitions: &BTreeMap<String, Vec<FieldDef>>) -> Self {
        let views = definitions
            .iter()
            .map(|(name, fields)| {
                (
                    name.clone(),
                    View {
                        name: name.clone(),
                        fields: fields.clone(),
                    },
                )
            })
            .collect();
        Self { views }
    }

    pub fn get(&self, name: &str) -> Result<&View, WorkflowError> {
        self.views
            .get(name)
            .ok_or_else(|| WorkflowError::UnknownView(name.to_string()))
    }

    pub fn get_readonly(&self, name: &str) -> Result<View, WorkflowError> {
        Ok(self.get(name)?.readonly())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }
}

/// Per-field error messages in view order; `None` means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub fields: IndexMap<String, Option<String>>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(Option::is_none)
    }

    pub fn error_count(&self) -> usize {
        self.fields.values().filter(|error| error.is_some()).count()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|error| error.as_deref())
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter_map(|(field, error)| error.as_deref().map(|error| (field.as_str(), error)))
    }
}

/// Check one raw value against its field definition.
pub fn validate_field(field: &FieldDef, raw: Option<&str>) -> Option<String> {
    let value = match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value,
        None if field.required => return Some(REQUIRED_ERROR.to_string()),
        None => return None,
    };
    match field.field_type {
        FieldType::Text | FieldType::Textarea => None,
        FieldType::Number => value
            .parse::<f64>()
            .is_err()
            .then(|| "must be a number".to_string()),
        FieldType::Date => (!is_date(value)).then(|| "must be a date (YYYY-MM-DD)".to_string()),
        FieldType::Email => {
            (!email_pattern().is_match(value)).then(|| "must be an email address".to_string())
        }
        FieldType::Url => (!url_pattern().is_match(value)).then(|| "must be a URL".to_string()),
        FieldType::Choice => {
            if field.options.is_empty() || field.options.iter().any(|option| option == value) {
                None
            } else {
                Some(format!("must be one of: {}", field.options.join(", ")))
            }
        }
    }
}

/// Validate every field the view declares, in order. Record fields the view
/// does not mention are ignored.
pub fn validate_group(view: &View, record: &RequestElement) -> Validation {
    let fields = view
        .fields
        .iter()
        .map(|field| {
            let raw = record.get(&field.data_ref).map(ToString::to_string);
            (
                field.data_ref.clone(),
                validate_field(field, raw.as_deref()),
            )
        })
        .collect();
    Validation { fields }
}

fn is_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || NaiveDate::parse_from_str(value, "%m/%d/%Y").is_ok()
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"))
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url regex"))
}

/// Which fields the user has interacted with.
///
/// Errors for untouched fields stay hidden until the user edits them or a
/// submit attempt touches every required field.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    touched: BTreeSet<String>,
}

impl FormState {
    pub fn touch(&mut self, field: &str) {
        self.touched.insert(field.to_string());
    }

    pub fn touch_all_required(&mut self, view: &View) {
        for field in view.required_fields() {
            self.touched.insert(field.data_ref.clone());
        }
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    pub fn reset(&mut self) {
        self.touched.clear();
    }

    /// Errors for touched fields only.
    pub fn visible_errors<'a>(&self, validation: &'a Validation) -> Vec<(&'a str, &'a str)> {
        validation
            .errors()
            .filter(|(field, _)| self.is_touched(field))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn def(data_ref: &str, field_type: FieldType, required: bool) -> FieldDef {
        FieldDef {
            data_ref: data_ref.to_string(),
            field_type,
            required,
            label: data_ref.to_string(),
            options: Vec::new(),
            read_only: false,
        }
    }

    fn music_view() -> View {
        View {
            name: "Music".to_string(),
            fields: vec![
                def("Title", FieldType::Text, true),
                def("composer", FieldType::Text, false),
                def("duration", FieldType::Number, false),
                def("released", FieldType::Date, false),
                def("contact", FieldType::Email, false),
            ],
        }
    }

    #[test]
    fn required_field_without_value_is_an_error() {
        let field = def("Title", FieldType::Text, true);
        assert_eq!(validate_field(&field, None).as_deref(), Some(REQUIRED_ERROR));
        assert_eq!(
            validate_field(&field, Some("  ")).as_deref(),
            Some(REQUIRED_ERROR)
        );
        assert_eq!(validate_field(&field, Some("Song A")), None);
    }

    #[test]
    fn typed_fields_reject_malformed_values() {
        assert!(validate_field(&def("n", FieldType::Number, false), Some("ten")).is_some());
        assert!(validate_field(&def("n", FieldType::Number, false), Some("10.5")).is_none());
        assert!(validate_field(&def("d", FieldType::Date, false), Some("2024-13-01")).is_some());
        assert!(validate_field(&def("d", FieldType::Date, false), Some("03/14/2024")).is_none());
        assert!(validate_field(&def("e", FieldType::Email, false), Some("nobody")).is_some());
        assert!(validate_field(&def("u", FieldType::Url, false), Some("https://x.org/a")).is_none());
        assert!(validate_field(&def("u", FieldType::Url, false), Some("x.org")).is_some());
    }

    #[test]
    fn choice_fields_accept_only_listed_options() {
        let mut field = def("type", FieldType::Choice, true);
        field.options = vec!["Music".to_string(), "Book".to_string()];
        assert!(validate_field(&field, Some("Book")).is_none());
        assert!(validate_field(&field, Some("Film")).is_some());
    }

    #[test]
    fn group_validation_covers_view_fields_in_order_only() {
        let record = RequestElement::with_id(10)
            .field("duration", "abc")
            .field("unrelated", "ignored");
        let validation = validate_group(&music_view(), &record);
        let keys: Vec<&str> = validation.fields.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["Title", "composer", "duration", "released", "contact"]
        );
        assert_eq!(validation.error("Title"), Some(REQUIRED_ERROR));
        assert!(validation.error("duration").is_some());
        assert!(validation.error("composer").is_none());
        assert_eq!(validation.error_count(), 2);
        assert!(!validation.is_valid());
    }

    #[test]
    fn numeric_record_values_validate_as_numbers() {
        let record = RequestElement::with_id(10)
            .field("Title", "Song A")
            .field("duration", 215u32);
        assert!(validate_group(&music_view(), &record).is_valid());
    }

    #[test]
    fn touch_all_required_reveals_only_required_errors() {
        let view = music_view();
        let record = RequestElement::with_id(10).field("contact", "nope");
        let validation = validate_group(&view, &record);
        let mut state = FormState::default();
        assert!(state.visible_errors(&validation).is_empty());
        state.touch_all_required(&view);
        let visible = state.visible_errors(&validation);
        assert_eq!(visible, vec![("Title", REQUIRED_ERROR)]);
        assert_eq!(validate_group(&view, &record), validation);
    }

    #[test]
    fn readonly_view_marks_every_field() {
        let view = music_view().readonly();
        assert!(view.fields.iter().all(|field| field.read_only));
    }
}
