use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use survey_spec::{ConfigError, SurveySpec, survey_schema, validate};

pub mod controller;
pub mod host;
pub mod render;
pub mod screen;
pub mod selection;

pub use controller::{Advance, DeferredUpdate, SimpleSurvey};
pub use host::{CallbackHost, NoopHost, SurveyHost};
pub use render::{render_json_ui, render_text};
pub use screen::{NavAction, Navigation, Screen, ScreenBody, ScreenOption, SurveyView};
pub use selection::{SelectionEvent, SelectionHandler};

const DEFAULT_SURVEY: &str = include_str!("../../survey-spec/tests/fixtures/three_question.json");

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to parse survey config: {0}")]
    ConfigParse(#[source] serde_json::Error),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
}

/// Host-side configuration: the survey document plus overrides.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ComponentConfig {
    /// Survey document as a JSON string; the bundled sample survey is used when absent.
    #[serde(default)]
    pub survey_json: Option<String>,
    /// Overrides the document's survey-wide auto-advance flag.
    #[serde(default)]
    pub auto_advance: Option<bool>,
}

/// Loads the survey described by `config_json`. A blank config yields the
/// bundled sample survey.
pub fn load_survey(config_json: &str) -> Result<SurveySpec, SurveyError> {
    let config = if config_json.trim().is_empty() {
        ComponentConfig::default()
    } else {
        serde_json::from_str(config_json).map_err(SurveyError::ConfigParse)?
    };

    let survey_json = config.survey_json.as_deref().unwrap_or(DEFAULT_SURVEY);
    let mut spec: SurveySpec =
        serde_json::from_str(survey_json).map_err(SurveyError::ConfigParse)?;
    if let Some(auto_advance) = config.auto_advance {
        spec.auto_advance = auto_advance;
    }
    Ok(spec)
}

fn respond(result: Result<Value, SurveyError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({"error": format!("json encode: {}", error)}).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

/// The loaded survey document as JSON.
pub fn describe(config_json: &str) -> String {
    respond(load_survey(config_json).and_then(|spec| {
        serde_json::to_value(spec).map_err(SurveyError::JsonEncode)
    }))
}

/// Settings report for every question of the survey, as JSON.
pub fn validate_survey(config_json: &str) -> String {
    respond(load_survey(config_json).and_then(|spec| {
        serde_json::to_value(validate(&spec)).map_err(SurveyError::JsonEncode)
    }))
}

/// JSON schema of the survey document.
pub fn schema() -> String {
    respond(Ok(survey_schema()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn describe_returns_bundled_survey() {
        let payload = describe("");
        let spec: Value = serde_json::from_str(&payload).expect("valid json");
        assert_eq!(spec["id"], "onboarding");
        assert_eq!(spec["questions"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn config_overrides_auto_advance() {
        let config = json!({ "auto_advance": true }).to_string();
        let spec = load_survey(&config).expect("load");
        assert!(spec.auto_advance);
    }

    #[test]
    fn bad_config_reports_error() {
        let payload = describe("{ not json");
        let parsed: Value = serde_json::from_str(&payload).expect("json");
        assert!(
            parsed["error"]
                .as_str()
                .unwrap_or_default()
                .starts_with("failed to parse survey config")
        );
    }

    #[test]
    fn validate_survey_flags_conflicting_settings() {
        let survey = json!({
            "autoAdvance": true,
            "questions": [
                {
                    "questionType": "SelectionGroup",
                    "questionText": "Pick",
                    "questionId": "pick",
                    "options": [{ "optionText": "A", "value": "a" }],
                    "questionSettings": { "defaultSelection": 0 }
                }
            ]
        });
        let config = json!({ "survey_json": survey.to_string() }).to_string();
        let report: Value = serde_json::from_str(&validate_survey(&config)).expect("json");
        assert_eq!(report["valid"], false);
        assert_eq!(report["errors"][0]["question_id"], "pick");
    }

    #[test]
    fn validate_survey_accepts_bundled_survey() {
        let report: Value = serde_json::from_str(&validate_survey("")).expect("json");
        assert_eq!(report["valid"], true);
    }

    #[test]
    fn schema_is_json() {
        let schema: Value = serde_json::from_str(&schema()).expect("json");
        assert!(schema.get("properties").is_some());
    }
}
