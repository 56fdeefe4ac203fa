#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Starter-code templates attached to exercise steps.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{
    constants::{CODE_TEMPLATE_FIELD, CODE_TEMPLATES_FIELD},
    error::{FilterError, FilterResult},
    parsers::parser,
};

/// Where a step's template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// One template for every language.
    Flat(String),
    /// Templates keyed by language tag.
    PerLanguage(BTreeMap<String, String>),
    /// Both forms were provided; the flat template wins.
    Both {
        /// The single template.
        flat:         String,
        /// The per-language templates.
        per_language: BTreeMap<String, String>,
    },
}

impl TemplateSource {
    /// Returns the template to use for a submission in `lang`.
    pub fn resolve(&self, lang: &str) -> FilterResult<&str> {
        match self {
            TemplateSource::Flat(flat) | TemplateSource::Both { flat, .. } => Ok(flat),
            TemplateSource::PerLanguage(templates) => {
                templates
                    .get(lang)
                    .map(String::as_str)
                    .ok_or_else(|| FilterError::MissingTemplate {
                        lang: lang.to_string(),
                    })
            }
        }
    }

    /// Reads the template fields of a step row.
    ///
    /// `code_template` is used when it is a non-empty string. Otherwise
    /// `code_templates` must be an object mapping languages to templates, or
    /// a string holding one as JSON or as a Python dict literal.
    pub fn from_step(step: &Map<String, Value>) -> FilterResult<Self> {
        let flat = match step.get(CODE_TEMPLATE_FIELD) {
            Some(Value::String(code)) if !code.is_empty() => Some(code.clone()),
            _ => None,
        };

        let per_language = match step.get(CODE_TEMPLATES_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) if raw.trim().is_empty() => None,
            Some(Value::String(raw)) => Some(parse_encoded_templates(raw)?),
            Some(value) => Some(parse_templates(value)?),
        };

        match (flat, per_language) {
            (Some(flat), Some(per_language)) => Ok(TemplateSource::Both { flat, per_language }),
            (Some(flat), None) => Ok(TemplateSource::Flat(flat)),
            (None, Some(per_language)) => Ok(TemplateSource::PerLanguage(per_language)),
            (None, None) => Ok(TemplateSource::PerLanguage(BTreeMap::new())),
        }
    }
}

/// Parses a `code_templates` string, trying JSON before the Python literal
/// form that dataframe exports write.
fn parse_encoded_templates(raw: &str) -> FilterResult<BTreeMap<String, String>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => parse_templates(&value),
        Err(json_err) => parser::string_dict(raw).map_err(|literal_err| {
            FilterError::MalformedTemplates(format!(
                "neither JSON ({json_err}) nor a dict literal ({literal_err})"
            ))
        }),
    }
}

/// Converts a `{"lang": "template"}` object into a map.
fn parse_templates(value: &Value) -> FilterResult<BTreeMap<String, String>> {
    let object = value.as_object().ok_or_else(|| {
        FilterError::MalformedTemplates(format!("expected an object, found `{value}`"))
    })?;

    object
        .iter()
        .map(|(lang, template)| match template {
            Value::String(code) => Ok((lang.clone(), code.clone())),
            other => Err(FilterError::MalformedTemplates(format!(
                "template for `{lang}` is not a string: `{other}`"
            ))),
        })
        .collect()
}
