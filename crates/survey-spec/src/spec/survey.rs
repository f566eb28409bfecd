use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec::question::Question;

/// Opaque styling values forwarded to the host layout. `null` and absent
/// values both deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPresentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_style: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_group_container_style: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_button_container_style: Option<Value>,
}

/// Top-level survey document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Advance as soon as a selection completes, for every question.
    #[serde(default)]
    pub auto_advance: bool,
    #[serde(default)]
    pub presentation: SurveyPresentation,
    pub questions: Vec<Question>,
}

impl SurveySpec {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            id: None,
            title: None,
            auto_advance: false,
            presentation: SurveyPresentation::default(),
            questions,
        }
    }

    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
