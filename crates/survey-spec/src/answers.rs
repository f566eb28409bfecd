use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec::question::QuestionOption;

/// Value recorded for a question. Serialized without tags so a single
/// selection is the option object, a multi selection an array of options,
/// and a cleared single selection `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Single selection that was deselected.
    Cleared,
    Integer(i64),
    /// Free text; the empty string is a valid, stored value.
    Text(String),
    Selected(QuestionOption),
    MultiSelected(Vec<QuestionOption>),
}

impl AnswerValue {
    /// Whether the value counts as an answer for advancing. Zero counts,
    /// the empty string and a cleared selection do not.
    pub fn is_present(&self) -> bool {
        match self {
            AnswerValue::Cleared => false,
            AnswerValue::Text(text) => !text.is_empty(),
            AnswerValue::Integer(_) | AnswerValue::Selected(_) | AnswerValue::MultiSelected(_) => {
                true
            }
        }
    }

    /// Number of options held by a multi selection.
    pub fn selected_count(&self) -> Option<usize> {
        match self {
            AnswerValue::MultiSelected(options) => Some(options.len()),
            _ => None,
        }
    }

    pub fn to_display(&self) -> String {
        match self {
            AnswerValue::Cleared => String::new(),
            AnswerValue::Integer(value) => value.to_string(),
            AnswerValue::Text(text) => text.clone(),
            AnswerValue::Selected(option) => option.option_text.clone(),
            AnswerValue::MultiSelected(options) => options
                .iter()
                .map(|option| option.option_text.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Answer record handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    pub value: AnswerValue,
}

impl Answer {
    pub fn new(question_id: Option<String>, value: AnswerValue) -> Self {
        Self { question_id, value }
    }
}

/// Answers keyed by question index. A missing key means the question was
/// never answered; there is no placeholder value for "unset".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerBook {
    slots: BTreeMap<usize, Answer>,
}

impl AnswerBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&Answer> {
        self.slots.get(&index)
    }

    /// Replaces the answer at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, answer: Answer) -> Option<Answer> {
        self.slots.insert(index, answer)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.slots.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Answer)> {
        self.slots.iter().map(|(index, answer)| (*index, answer))
    }

    /// Answers in question order with unset slots dropped.
    pub fn collect(&self) -> Vec<Answer> {
        self.slots.values().cloned().collect()
    }
}

/// Finished answers together with the survey they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_id: Option<String>,
    pub answers: Vec<Answer>,
}

impl AnswerSet {
    pub fn new(survey_id: Option<String>, answers: Vec<Answer>) -> Self {
        Self { survey_id, answers }
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        serde_cbor::to_vec(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
