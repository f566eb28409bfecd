use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Screen kinds a survey can present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum QuestionType {
    /// Pick exactly one option.
    SelectionGroup,
    /// Pick several options, bounded by `maxMultiSelect`.
    MultipleSelectionGroup,
    /// Free text.
    TextInput,
    /// Whole numbers.
    NumericInput,
    /// Content only; never produces an answer.
    Info,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SelectionGroup => "SelectionGroup",
            QuestionType::MultipleSelectionGroup => "MultipleSelectionGroup",
            QuestionType::TextInput => "TextInput",
            QuestionType::NumericInput => "NumericInput",
            QuestionType::Info => "Info",
        }
    }

    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            QuestionType::SelectionGroup | QuestionType::MultipleSelectionGroup
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display content of a question. Structured content is opaque to the
/// controller and forwarded to the host untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum QuestionText {
    Plain(String),
    Structured(Map<String, Value>),
}

impl Default for QuestionText {
    fn default() -> Self {
        QuestionText::Plain(String::new())
    }
}

impl QuestionText {
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            QuestionText::Plain(text) => Some(text),
            QuestionText::Structured(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            QuestionText::Plain(text) => Value::String(text.clone()),
            QuestionText::Structured(map) => Value::Object(map.clone()),
        }
    }
}

impl fmt::Display for QuestionText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionText::Plain(text) => f.write_str(text),
            QuestionText::Structured(map) => match map.get("text").and_then(Value::as_str) {
                Some(text) => f.write_str(text),
                None => write!(f, "{}", Value::Object(map.clone())),
            },
        }
    }
}

impl From<&str> for QuestionText {
    fn from(value: &str) -> Self {
        QuestionText::Plain(value.to_string())
    }
}

impl From<String> for QuestionText {
    fn from(value: String) -> Self {
        QuestionText::Plain(value)
    }
}

/// A selectable option. `value` identifies the option within its question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub option_text: String,
    pub value: Value,
}

impl QuestionOption {
    pub fn new(option_text: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            option_text: option_text.into(),
            value: value.into(),
        }
    }
}

/// Type-specific settings for selection questions.
///
/// Values stay as raw JSON until the question is first shown; type checks
/// happen in [`crate::validate::selection_settings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSettings {
    #[serde(
        default,
        deserialize_with = "explicit_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub allow_deselect: Option<Value>,
    #[serde(
        default,
        deserialize_with = "explicit_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_selection: Option<Value>,
    #[serde(
        default,
        deserialize_with = "explicit_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_advance: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_multi_select: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_multi_select: Option<Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)` so it is checked like any
/// other wrongly typed setting; only an absent key is `None`.
fn explicit_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// One survey screen as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_type: QuestionType,
    #[serde(default)]
    pub question_text: QuestionText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_settings: Option<QuestionSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl Question {
    pub fn new(question_type: QuestionType, question_text: impl Into<QuestionText>) -> Self {
        Self {
            question_type,
            question_text: question_text.into(),
            question_id: None,
            options: Vec::new(),
            question_settings: None,
            placeholder_text: None,
            default_value: None,
        }
    }

    pub fn with_id(mut self, question_id: impl Into<String>) -> Self {
        self.question_id = Some(question_id.into());
        self
    }

    pub fn with_options(mut self, options: Vec<QuestionOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_settings(mut self, settings: QuestionSettings) -> Self {
        self.question_settings = Some(settings);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder_text = Some(placeholder.into());
        self
    }

    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Options at the given indexes, in option order.
    pub fn options_at(&self, indexes: &[usize]) -> Vec<QuestionOption> {
        self.options
            .iter()
            .enumerate()
            .filter(|(index, _)| indexes.contains(index))
            .map(|(_, option)| option.clone())
            .collect()
    }
}
