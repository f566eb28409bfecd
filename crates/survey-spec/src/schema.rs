use schemars::schema_for;
use serde_json::Value;

use crate::spec::survey::SurveySpec;

/// JSON schema describing the survey document accepted by [`SurveySpec`].
pub fn generate() -> Value {
    schema_for!(SurveySpec).to_value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_question_types() {
        let schema = generate().to_string();
        assert!(schema.contains("MultipleSelectionGroup"));
        assert!(schema.contains("questionSettings"));
    }
}
