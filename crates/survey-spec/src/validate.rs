use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::answers::Answer;
use crate::spec::question::{Question, QuestionSettings, QuestionType};
use crate::spec::survey::SurveySpec;

/// Survey configuration mistakes. These are programmer errors in the survey
/// document and abort rendering of the affected question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("survey has no questions")]
    EmptySurvey,
    #[error("question index {index} is out of range for a survey of {len} questions")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("allowDeselect was not passed in as a boolean for question {index}")]
    AllowDeselectNotBoolean { index: usize },
    #[error("autoAdvance was not passed in as a boolean for question {index}")]
    AutoAdvanceNotBoolean { index: usize },
    #[error("cannot set auto advance and a default selection for question {index}")]
    AutoAdvanceWithDefault { index: usize },
    #[error("default selection not specified as an index for question {index}")]
    DefaultSelectionNotIndex { index: usize },
    #[error("default selection not specified as an array for multiple selection question {index}")]
    DefaultSelectionNotArray { index: usize },
    #[error("default selection {selection} is out of range for question {index} ({options} options)")]
    DefaultSelectionOutOfRange {
        index: usize,
        selection: usize,
        options: usize,
    },
    #[error("maxMultiSelect is required for multiple selection question {index}")]
    MissingMaxMultiSelect { index: usize },
    #[error("{setting} is not a valid count for question {index}")]
    InvalidCount { index: usize, setting: &'static str },
    #[error("question {index} has no options to select from")]
    MissingOptions { index: usize },
    #[error("question {index} is a {kind} question, not a selection group")]
    NotSelection { index: usize, kind: QuestionType },
    #[error(
        "multiple selection validation was asked to validate a {kind} question at index {index}"
    )]
    NotMultipleSelection { index: usize, kind: QuestionType },
}

/// How many options a selection question accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Single,
    /// At most `max` options; advancing needs at least `min`.
    Multiple { max: usize, min: usize },
}

impl SelectionMode {
    pub fn max_multi_select(&self) -> usize {
        match self {
            SelectionMode::Single => 1,
            SelectionMode::Multiple { max, .. } => *max,
        }
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, SelectionMode::Multiple { .. })
    }
}

/// Checked settings of a selection question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSettings {
    pub mode: SelectionMode,
    pub allow_deselect: bool,
    /// Option indexes selected before the user interacts.
    pub default_selection: Vec<usize>,
    /// Auto-advance configured on the question itself.
    pub auto_advance: bool,
}

impl SelectionSettings {
    pub fn has_default(&self) -> bool {
        !self.default_selection.is_empty()
    }
}

/// Problem found while checking a whole survey document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<String>,
    pub message: String,
}

/// Result of [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

/// Checks every selection question of the survey up front, collecting all
/// configuration errors instead of stopping at the first.
pub fn validate(spec: &SurveySpec) -> ValidationReport {
    let mut errors = Vec::new();
    if spec.is_empty() {
        errors.push(ValidationIssue {
            index: 0,
            question_id: None,
            message: ConfigError::EmptySurvey.to_string(),
        });
    }

    for (index, question) in spec.questions.iter().enumerate() {
        if !question.question_type.is_selection() {
            continue;
        }
        if let Err(error) = selection_settings(question, index, spec.auto_advance) {
            errors.push(ValidationIssue {
                index,
                question_id: question.question_id.clone(),
                message: error.to_string(),
            });
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Resolves whether a selection question takes one option or several.
/// A multiple selection question limited to one option behaves as single select.
pub fn selection_mode(question: &Question, index: usize) -> Result<SelectionMode, ConfigError> {
    match question.question_type {
        QuestionType::SelectionGroup => Ok(SelectionMode::Single),
        QuestionType::MultipleSelectionGroup => {
            let settings = question
                .question_settings
                .as_ref()
                .ok_or(ConfigError::MissingMaxMultiSelect { index })?;
            let max = settings
                .max_multi_select
                .as_ref()
                .map(|value| read_count(value, index, "maxMultiSelect"))
                .transpose()?
                .filter(|max| *max > 0)
                .ok_or(ConfigError::MissingMaxMultiSelect { index })?;
            if max == 1 {
                return Ok(SelectionMode::Single);
            }
            let min = min_multi_select(settings, index)?.unwrap_or(max);
            Ok(SelectionMode::Multiple { max, min })
        }
        kind => Err(ConfigError::NotSelection { index, kind }),
    }
}

/// Cross-validates the settings of a selection question.
///
/// `survey_auto_advance` is the survey-wide flag; a default selection is
/// rejected when either it or the question's own flag is set.
pub fn selection_settings(
    question: &Question,
    index: usize,
    survey_auto_advance: bool,
) -> Result<SelectionSettings, ConfigError> {
    let mode = selection_mode(question, index)?;
    if question.options.is_empty() {
        return Err(ConfigError::MissingOptions { index });
    }

    let Some(settings) = question.question_settings.as_ref() else {
        return Ok(SelectionSettings {
            mode,
            allow_deselect: true,
            default_selection: Vec::new(),
            auto_advance: false,
        });
    };

    if let Some(value) = &settings.allow_deselect
        && !value.is_boolean()
    {
        return Err(ConfigError::AllowDeselectNotBoolean { index });
    }
    let question_auto_advance = settings.auto_advance.as_ref().is_some_and(is_truthy);
    if settings.default_selection.is_some() && (survey_auto_advance || question_auto_advance) {
        return Err(ConfigError::AutoAdvanceWithDefault { index });
    }
    if let Some(value) = &settings.auto_advance
        && !value.is_boolean()
    {
        return Err(ConfigError::AutoAdvanceNotBoolean { index });
    }

    let default_selection = match &settings.default_selection {
        None => Vec::new(),
        Some(value) => read_default_selection(value, mode, index, question.options.len())?,
    };

    Ok(SelectionSettings {
        mode,
        allow_deselect: settings
            .allow_deselect
            .as_ref()
            .and_then(Value::as_bool)
            .unwrap_or(true),
        default_selection,
        auto_advance: question_auto_advance,
    })
}

/// Multi-select completion rule: an answer exists and holds at least
/// `minMultiSelect` options (which defaults to `maxMultiSelect`).
pub fn validate_multiple_selection(
    question: &Question,
    index: usize,
    answer: Option<&Answer>,
) -> Result<bool, ConfigError> {
    if question.question_type != QuestionType::MultipleSelectionGroup {
        return Err(ConfigError::NotMultipleSelection {
            index,
            kind: question.question_type,
        });
    }

    let settings = question.question_settings.clone().unwrap_or_default();
    let max = settings
        .max_multi_select
        .as_ref()
        .map(|value| read_count(value, index, "maxMultiSelect"))
        .transpose()?
        .filter(|max| *max > 0)
        .unwrap_or(1);
    let min = min_multi_select(&settings, index)?.unwrap_or(max);

    Ok(answer
        .and_then(|answer| answer.value.selected_count())
        .is_some_and(|count| count >= min))
}

/// Whether the next/finish action is available for the question.
pub fn advance_enabled(
    question: &Question,
    index: usize,
    answer: Option<&Answer>,
) -> Result<bool, ConfigError> {
    let answered = answer.is_some_and(|answer| answer.value.is_present());
    match question.question_type {
        QuestionType::Info => Ok(true),
        QuestionType::MultipleSelectionGroup => {
            if selection_mode(question, index)?.is_multiple() {
                validate_multiple_selection(question, index, answer)
            } else {
                Ok(answered)
            }
        }
        _ => Ok(answered),
    }
}

fn min_multi_select(settings: &QuestionSettings, index: usize) -> Result<Option<usize>, ConfigError> {
    Ok(settings
        .min_multi_select
        .as_ref()
        .map(|value| read_count(value, index, "minMultiSelect"))
        .transpose()?
        .filter(|min| *min > 0))
}

/// Single selection (including a multiple selection group limited to one
/// option) takes a bare index, multiple selection an array of indexes.
/// Entries beyond the selection limit are dropped.
fn read_default_selection(
    value: &Value,
    mode: SelectionMode,
    index: usize,
    options: usize,
) -> Result<Vec<usize>, ConfigError> {
    let mut selection = match mode {
        SelectionMode::Single => vec![
            read_index(value).ok_or(ConfigError::DefaultSelectionNotIndex { index })?,
        ],
        SelectionMode::Multiple { .. } => value
            .as_array()
            .ok_or(ConfigError::DefaultSelectionNotArray { index })?
            .iter()
            .map(|item| read_index(item).ok_or(ConfigError::DefaultSelectionNotArray { index }))
            .collect::<Result<Vec<_>, _>>()?,
    };

    if let Some(selection) = selection.iter().copied().find(|selection| *selection >= options) {
        return Err(ConfigError::DefaultSelectionOutOfRange {
            index,
            selection,
            options,
        });
    }
    selection.truncate(mode.max_multi_select());
    Ok(selection)
}

fn read_index(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|index| usize::try_from(index).ok())
}

/// Counts may be given as numbers or numeric strings.
fn read_count(value: &Value, index: usize, setting: &'static str) -> Result<usize, ConfigError> {
    let count = match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    count
        .and_then(|count| usize::try_from(count).ok())
        .ok_or(ConfigError::InvalidCount { index, setting })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
