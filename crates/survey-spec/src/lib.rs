#![allow(missing_docs)]

pub mod answers;
pub mod input;
pub mod schema;
pub mod spec;
pub mod validate;

pub use answers::{Answer, AnswerBook, AnswerSet, AnswerValue};
pub use input::{NumericInput, classify_numeric, numeric_default, parse_integer, text_default};
pub use schema::generate as survey_schema;
pub use spec::{
    Question, QuestionOption, QuestionSettings, QuestionText, QuestionType, SurveyPresentation,
    SurveySpec,
};
pub use validate::{
    ConfigError, SelectionMode, SelectionSettings, ValidationIssue, ValidationReport,
    advance_enabled, selection_mode, selection_settings, validate, validate_multiple_selection,
};
