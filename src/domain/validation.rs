//! Validation rules for address attributes.
//!
//! Rules are data, not code: [`validation_rules`] assembles the full rule set
//! from the static field rules plus one `boolean` rule per configured flag,
//! and [`ValidationRules::validate`] checks a raw attribute map against it.
//! Every failing rule is reported, not just the first one.
//!
//! # Examples
//!
//! ```
//! use addresses::domain::validation::validation_rules;
//!
//! let flags = vec!["primary".to_string()];
//! let rules = validation_rules(&flags);
//!
//! assert_eq!(rules.get("line_1").unwrap().to_string(), "required|string|min:2|max:60");
//! assert_eq!(rules.get("is_primary").unwrap().to_string(), "boolean");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// A single validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Value must be present and non-blank.
    Required,
    /// Value must be a string.
    String,
    /// Minimum length in characters.
    Min(usize),
    /// Maximum length in characters.
    Max(usize),
    /// Letters, digits, dashes and underscores only.
    AlphaDash,
    /// Integral number, or a string that parses as one.
    Integer,
    /// `true`, `false`, `0`, `1`, `"0"` or `"1"`.
    Boolean,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "required"),
            Rule::String => write!(f, "string"),
            Rule::Min(n) => write!(f, "min:{n}"),
            Rule::Max(n) => write!(f, "max:{n}"),
            Rule::AlphaDash => write!(f, "alpha_dash"),
            Rule::Integer => write!(f, "integer"),
            Rule::Boolean => write!(f, "boolean"),
        }
    }
}

impl Rule {
    /// Check a present, non-empty value. Returns the failure message.
    fn check(self, field: &str, value: &Value) -> Option<String> {
        let passed = match self {
            Rule::Required => !is_blank(value),
            Rule::String => value.is_string(),
            Rule::Min(n) => text_of(value).is_some_and(|s| s.chars().count() >= n),
            Rule::Max(n) => text_of(value).is_some_and(|s| s.chars().count() <= n),
            Rule::AlphaDash => text_of(value).is_some_and(|s| {
                s.chars()
                    .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
            }),
            Rule::Integer => match value {
                Value::Number(n) => n.is_i64() || n.is_u64(),
                Value::String(s) => s.trim().parse::<i64>().is_ok(),
                _ => false,
            },
            Rule::Boolean => match value {
                Value::Bool(_) => true,
                Value::Number(n) => matches!(n.as_i64(), Some(0 | 1)),
                Value::String(s) => matches!(s.as_str(), "0" | "1"),
                _ => false,
            },
        };

        if passed {
            return None;
        }

        Some(match self {
            Rule::Required => format!("The {field} field is required."),
            Rule::String => format!("The {field} must be a string."),
            Rule::Min(n) => format!("The {field} must be at least {n} characters."),
            Rule::Max(n) => format!("The {field} may not be greater than {n} characters."),
            Rule::AlphaDash => {
                format!("The {field} may only contain letters, numbers, dashes and underscores.")
            }
            Rule::Integer => format!("The {field} must be an integer."),
            Rule::Boolean => format!("The {field} field must be true or false."),
        })
    }
}

/// Textual form used for length and character-class rules.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// Absent values skip every rule except `required`.
fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// The ordered rules for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules(Vec<Rule>);

impl FieldRules {
    pub fn new(rules: impl Into<Vec<Rule>>) -> Self {
        Self(rules.into())
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, rule: Rule) -> bool {
        self.0.contains(&rule)
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.contains(Rule::Required)
    }
}

impl fmt::Display for FieldRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}

/// Complete rule set, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationRules {
    fields: BTreeMap<String, FieldRules>,
}

impl ValidationRules {
    pub fn insert(&mut self, field: impl Into<String>, rules: FieldRules) {
        self.fields.insert(field.into(), rules);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Rule expressions as a plain map, e.g. `"city" -> "required|string|min:3|max:60"`.
    #[must_use]
    pub fn expressions(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|(field, rules)| (field.clone(), rules.to_string()))
            .collect()
    }

    /// Check an attribute map against every rule.
    ///
    /// # Errors
    ///
    /// Returns every violated rule, grouped by field.
    pub fn validate(&self, attrs: &Map<String, Value>) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for (field, rules) in &self.fields {
            let value = attrs.get(field);
            let absent = is_absent(value);

            for &rule in rules.rules() {
                let failure = match (rule, value) {
                    (Rule::Required, None) => Rule::Required.check(field, &Value::Null),
                    (Rule::Required, Some(v)) => rule.check(field, v),
                    (_, Some(v)) if !absent => rule.check(field, v),
                    _ => None,
                };
                if let Some(message) = failure {
                    errors.add(field, rule, message);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Build the address rule set for the configured flag names.
#[must_use]
pub fn validation_rules(flags: &[String]) -> ValidationRules {
    use Rule::{AlphaDash, Boolean, Integer, Max, Min, Required, String};

    let mut rules = ValidationRules::default();
    rules.insert("line_1", FieldRules::new([Required, String, Min(2), Max(60)]));
    rules.insert("line_2", FieldRules::new([String, Min(2), Max(60)]));
    rules.insert("line_3", FieldRules::new([String, Min(2), Max(60)]));
    rules.insert("city", FieldRules::new([Required, String, Min(3), Max(60)]));
    rules.insert("state", FieldRules::new([String, Min(3), Max(60)]));
    rules.insert("post_code", FieldRules::new([Required, Min(4), Max(20), AlphaDash]));
    rules.insert("country_id", FieldRules::new([Required, Integer]));

    for flag in flags {
        rules.insert(format!("is_{flag}"), FieldRules::new([Boolean]));
    }

    rules
}

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: Rule,
    pub message: String,
}

/// Validation failures grouped by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<Violation>>,
}

impl ValidationErrors {
    fn add(&mut self, field: &str, rule: Rule, message: String) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(Violation { rule, message });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Violations for one field; empty when the field passed.
    #[must_use]
    pub fn get(&self, field: &str) -> &[Violation] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// Whether `field` violated `rule`.
    #[must_use]
    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.get(field).iter().any(|v| v.rule == rule)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violations in self.fields.values() {
            for violation in violations {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(&violation.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
