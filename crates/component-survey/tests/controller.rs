use serde_json::json;

use component_survey::{
    Advance, CallbackHost, SelectionEvent, SimpleSurvey, SurveyError, SurveyHost, load_survey,
};
use survey_spec::{
    Answer, AnswerValue, ConfigError, Question, QuestionOption, QuestionSettings, QuestionType,
    SurveySpec,
};

#[derive(Debug, Default)]
struct Recorder {
    submitted: Vec<Answer>,
    finished: Vec<Vec<Answer>>,
}

impl SurveyHost for Recorder {
    fn on_answer_submitted(&mut self, answer: &Answer) {
        self.submitted.push(answer.clone());
    }

    fn on_survey_finished(&mut self, answers: &[Answer]) {
        self.finished.push(answers.to_vec());
    }
}

fn option(text: &str) -> QuestionOption {
    QuestionOption::new(text, text.to_lowercase())
}

fn three_question() -> SimpleSurvey<Recorder> {
    let spec = load_survey("").expect("bundled survey");
    SimpleSurvey::new(spec, Recorder::default()).expect("survey")
}

fn single(id: &str, settings: Option<QuestionSettings>) -> Question {
    let question = Question::new(QuestionType::SelectionGroup, "Pick one")
        .with_id(id)
        .with_options(vec![option("A"), option("B")]);
    match settings {
        Some(settings) => question.with_settings(settings),
        None => question,
    }
}

#[test]
fn three_question_survey_finishes_with_filtered_answers() {
    let mut survey = three_question();

    let info = survey.render().expect("render info");
    assert!(info.navigation.advance_enabled);
    assert!(!info.navigation.previous_enabled);
    assert_eq!(survey.next().expect("next"), Advance::Moved { to: 1 });

    survey.render().expect("render single");
    assert_eq!(
        survey.press_option(0).expect("press"),
        SelectionEvent::Selected { index: 0 }
    );
    assert_eq!(survey.next().expect("next"), Advance::Moved { to: 2 });

    let multi = survey.render().expect("render multi");
    assert!(!multi.navigation.advance_enabled);
    survey.press_option(0).expect("press X");
    assert!(!survey.can_advance().expect("check"));
    survey.press_option(1).expect("press Y");
    assert!(survey.can_advance().expect("check"));

    assert_eq!(survey.finish().expect("finish"), Advance::Finished);
    assert_eq!(survey.current_question_index(), 2);

    let host = survey.into_host();
    assert_eq!(host.submitted.len(), 2);
    assert_eq!(host.finished.len(), 1);
    let finished = serde_json::to_value(&host.finished[0]).expect("json");
    assert_eq!(
        finished,
        json!([
            { "questionId": "Q2", "value": { "optionText": "A", "value": "a" } },
            {
                "questionId": "Q3",
                "value": [
                    { "optionText": "X", "value": "x" },
                    { "optionText": "Y", "value": "y" }
                ]
            }
        ])
    );
}

#[test]
fn previous_keeps_prior_answer_editable() {
    let mut survey = three_question();
    survey.next().expect("leave info");
    survey.render().expect("render");
    survey.press_option(1).expect("press B");
    survey.next().expect("next");
    survey.previous();

    assert_eq!(survey.current_question_index(), 1);
    let screen = survey.render().expect("render again");
    assert!(screen.navigation.advance_enabled);
    match screen.body {
        component_survey::ScreenBody::Selection { options, .. } => {
            assert!(options[1].selected);
            assert!(!options[0].selected);
        }
        other => panic!("unexpected body {:?}", other),
    }

    survey.press_option(0).expect("press A");
    let answer = survey.current_answer().expect("answer");
    assert_eq!(answer.value, AnswerValue::Selected(option("A")));
}

#[test]
fn previous_on_first_question_is_ignored() {
    let mut survey = three_question();
    survey.previous();
    assert_eq!(survey.current_question_index(), 0);
}

#[test]
fn next_is_blocked_until_answered() {
    let mut survey = three_question();
    survey.next().expect("leave info");
    assert_eq!(survey.next().expect("next"), Advance::Blocked);
    assert_eq!(survey.current_question_index(), 1);
    assert!(survey.host().submitted.is_empty());
}

#[test]
fn deselecting_single_choice_clears_value() {
    let spec = SurveySpec::new(vec![single("pick", None)]);
    let mut survey = SimpleSurvey::new(spec, Recorder::default()).expect("survey");
    survey.press_option(0).expect("select");
    assert_eq!(
        survey.press_option(0).expect("deselect"),
        SelectionEvent::Deselected { index: 0 }
    );
    assert_eq!(
        survey.current_answer().map(|answer| &answer.value),
        Some(&AnswerValue::Cleared)
    );
    assert_eq!(survey.finish().expect("finish"), Advance::Blocked);
}

#[test]
fn numeric_input_accepts_integers_and_empty_string() {
    let spec = SurveySpec::new(vec![
        Question::new(QuestionType::NumericInput, "How many?").with_id("count"),
    ]);
    let mut survey = SimpleSurvey::without_host(spec).expect("survey");

    assert!(survey.set_numeric("12"));
    assert_eq!(
        survey.current_answer().map(|answer| &answer.value),
        Some(&AnswerValue::Integer(12))
    );

    assert!(!survey.set_numeric("abc"));
    assert_eq!(
        survey.current_answer().map(|answer| &answer.value),
        Some(&AnswerValue::Integer(12))
    );

    assert!(survey.set_numeric(""));
    assert_eq!(
        survey.current_answer().map(|answer| &answer.value),
        Some(&AnswerValue::Text(String::new()))
    );
    assert!(!survey.can_advance().expect("check"));

    assert!(survey.set_numeric("0"));
    assert!(survey.can_advance().expect("check"));
}

#[test]
fn text_input_is_stored_verbatim() {
    let spec = SurveySpec::new(vec![Question::new(QuestionType::TextInput, "Name?")]);
    let mut survey = SimpleSurvey::without_host(spec).expect("survey");
    assert!(!survey.set_numeric("4"));
    assert!(survey.set_text("  Ada "));
    assert_eq!(
        survey.current_answer().map(|answer| answer.value.to_display()),
        Some("  Ada ".to_string())
    );
}

#[test]
fn auto_advance_with_default_selection_fails_before_rendering() {
    let settings = QuestionSettings {
        auto_advance: Some(json!(true)),
        default_selection: Some(json!(0)),
        ..Default::default()
    };
    let spec = SurveySpec::new(vec![single("pick", Some(settings))]);
    let mut survey = SimpleSurvey::without_host(spec).expect("survey");
    let error = survey.render().expect_err("configuration error");
    assert!(matches!(
        error,
        SurveyError::Config(ConfigError::AutoAdvanceWithDefault { index: 0 })
    ));
}

#[test]
fn default_selection_applies_after_flush() {
    let settings = QuestionSettings {
        default_selection: Some(json!(1)),
        ..Default::default()
    };
    let spec = SurveySpec::new(vec![single("pick", Some(settings))]);
    let mut survey = SimpleSurvey::without_host(spec).expect("survey");

    let screen = survey.render().expect("render");
    assert!(!screen.navigation.advance_enabled);
    assert!(survey.current_answer().is_none());
    assert_eq!(survey.pending_updates().len(), 1);

    assert_eq!(survey.flush_deferred(), 1);
    assert_eq!(
        survey.current_answer().map(|answer| &answer.value),
        Some(&AnswerValue::Selected(option("B")))
    );
    assert!(survey.render().expect("render").navigation.advance_enabled);
}

#[test]
fn multi_default_selection_collects_options_in_order() {
    let settings = QuestionSettings {
        max_multi_select: Some(json!(3)),
        min_multi_select: Some(json!(1)),
        default_selection: Some(json!([2, 0])),
        ..Default::default()
    };
    let question = Question::new(QuestionType::MultipleSelectionGroup, "Pick")
        .with_options(vec![option("X"), option("Y"), option("Z")])
        .with_settings(settings);
    let mut survey = SimpleSurvey::without_host(SurveySpec::new(vec![question])).expect("survey");
    survey.render().expect("render");
    survey.flush_deferred();
    assert_eq!(
        survey.current_answer().map(|answer| &answer.value),
        Some(&AnswerValue::MultiSelected(vec![option("X"), option("Z")]))
    );
}

#[test]
fn stale_default_is_dropped_after_navigation() {
    let spec = SurveySpec::new(vec![
        Question::new(QuestionType::TextInput, "Nickname?")
            .with_id("nick")
            .with_default_value("buddy"),
        Question::new(QuestionType::Info, "Thanks"),
    ]);
    let mut survey = SimpleSurvey::without_host(spec).expect("survey");
    survey.render().expect("render");
    survey.set_text("Ada");
    survey.next().expect("next");

    assert_eq!(survey.flush_deferred(), 0);
    survey.previous();
    assert_eq!(
        survey.current_answer().map(|answer| answer.value.to_display()),
        Some("Ada".to_string())
    );
}

#[test]
fn default_selection_is_requeued_after_leaving_before_flush() {
    let settings = QuestionSettings {
        default_selection: Some(json!(1)),
        ..Default::default()
    };
    let spec = SurveySpec::new(vec![
        Question::new(QuestionType::Info, "Welcome"),
        single("pick", Some(settings)),
    ]);
    let mut survey = SimpleSurvey::without_host(spec).expect("survey");
    survey.next().expect("leave info");
    survey.render().expect("render");
    survey.previous();
    assert_eq!(survey.flush_deferred(), 0);

    survey.next().expect("back to selection");
    let screen = survey.render().expect("render");
    assert!(!screen.navigation.advance_enabled);
    assert_eq!(survey.flush_deferred(), 1);
    assert_eq!(
        survey.current_answer().map(|answer| &answer.value),
        Some(&AnswerValue::Selected(option("B")))
    );
    assert!(survey.render().expect("render").navigation.advance_enabled);
    assert!(survey.pending_updates().is_empty());
}

#[test]
fn single_option_multi_select_renders_index_default() {
    let settings = QuestionSettings {
        max_multi_select: Some(json!(1)),
        default_selection: Some(json!(0)),
        ..Default::default()
    };
    let question = Question::new(QuestionType::MultipleSelectionGroup, "Pick")
        .with_options(vec![option("X"), option("Y")])
        .with_settings(settings);
    let mut survey = SimpleSurvey::without_host(SurveySpec::new(vec![question])).expect("survey");
    survey.render().expect("index default renders");
    assert_eq!(survey.flush_deferred(), 1);
    assert_eq!(
        survey.current_answer().map(|answer| &answer.value),
        Some(&AnswerValue::Selected(option("X")))
    );
}

#[test]
fn info_question_never_holds_an_answer() {
    let mut survey = three_question();
    assert!(!survey.update_answer(AnswerValue::Text("note".into())));
    assert!(survey.current_answer().is_none());
    assert!(survey.answers().is_empty());
}

#[test]
fn numeric_default_is_parsed() {
    let spec = SurveySpec::new(vec![
        Question::new(QuestionType::NumericInput, "Age?").with_default_value("30"),
    ]);
    let mut survey = SimpleSurvey::without_host(spec).expect("survey");
    survey.render().expect("render");
    survey.render().expect("second render does not queue twice");
    assert_eq!(survey.pending_updates().len(), 1);
    survey.flush_deferred();
    assert_eq!(
        survey.current_answer().map(|answer| &answer.value),
        Some(&AnswerValue::Integer(30))
    );
}

#[test]
fn auto_advance_moves_on_selection() {
    let spec = SurveySpec::new(vec![single("first", None), single("second", None)])
        .with_auto_advance(true);
    let mut survey = SimpleSurvey::new(spec, Recorder::default()).expect("survey");
    survey.press_option(1).expect("press");
    assert_eq!(survey.current_question_index(), 1);

    survey.press_option(0).expect("press");
    let host = survey.host();
    assert_eq!(host.submitted.len(), 2);
    assert_eq!(host.finished.len(), 1);
    assert_eq!(host.finished[0][1].question_id.as_deref(), Some("second"));
}

#[test]
fn multi_auto_advance_waits_for_minimum() {
    let settings = QuestionSettings {
        max_multi_select: Some(json!(2)),
        auto_advance: Some(json!(true)),
        ..Default::default()
    };
    let question = Question::new(QuestionType::MultipleSelectionGroup, "Pick two")
        .with_options(vec![option("X"), option("Y"), option("Z")])
        .with_settings(settings);
    let spec = SurveySpec::new(vec![question, Question::new(QuestionType::Info, "Done")]);
    let mut survey = SimpleSurvey::without_host(spec).expect("survey");

    survey.press_option(0).expect("press");
    assert_eq!(survey.current_question_index(), 0);
    survey.press_option(2).expect("press");
    assert_eq!(survey.current_question_index(), 1);
}

#[test]
fn multi_select_ignores_presses_past_maximum() {
    let settings = QuestionSettings {
        max_multi_select: Some(json!(2)),
        allow_deselect: Some(json!(false)),
        ..Default::default()
    };
    let question = Question::new(QuestionType::MultipleSelectionGroup, "Pick two")
        .with_options(vec![option("X"), option("Y"), option("Z")])
        .with_settings(settings);
    let mut survey = SimpleSurvey::without_host(SurveySpec::new(vec![question])).expect("survey");
    survey.press_option(0).expect("press");
    survey.press_option(1).expect("press");
    assert_eq!(survey.press_option(2).expect("press"), SelectionEvent::Ignored);
    assert_eq!(survey.press_option(0).expect("press"), SelectionEvent::Ignored);
    assert_eq!(
        survey
            .current_answer()
            .and_then(|answer| answer.value.selected_count()),
        Some(2)
    );
}

#[test]
fn callback_host_receives_answers() {
    let mut finished = Vec::new();
    {
        let host = CallbackHost::new().with_survey_finished(|answers: &[Answer]| {
            finished.extend_from_slice(answers);
        });
        let spec = SurveySpec::new(vec![
            Question::new(QuestionType::Info, "Hi"),
            Question::new(QuestionType::NumericInput, "Age?").with_id("age"),
        ]);
        let mut survey = SimpleSurvey::new(spec, host).expect("survey");
        survey.next().expect("next");
        survey.set_numeric("41");
        assert_eq!(survey.finish().expect("finish"), Advance::Finished);
    }
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].value, AnswerValue::Integer(41));
}

#[test]
fn empty_survey_is_rejected() {
    let error = SimpleSurvey::without_host(SurveySpec::new(vec![])).expect_err("empty");
    assert!(matches!(error, SurveyError::Config(ConfigError::EmptySurvey)));
}
