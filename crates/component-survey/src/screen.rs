use serde_json::Value;
use survey_spec::{QuestionText, QuestionType, SurveyPresentation};

/// Option row of a selection screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenOption {
    pub index: usize,
    pub option_text: String,
    pub value: Value,
    pub selected: bool,
}

/// Type-specific part of a screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenBody {
    Selection {
        multiple: bool,
        max_multi_select: usize,
        options: Vec<ScreenOption>,
    },
    TextInput {
        value: Option<String>,
        placeholder: Option<String>,
        /// Whether the host should offer the auto-advance trigger.
        auto_advance: bool,
    },
    NumericInput {
        /// Empty when the question has no answer yet.
        value: String,
        placeholder: Option<String>,
        auto_advance: bool,
    },
    Info,
}

/// Label of the forward navigation button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Next,
    Finish,
}

impl NavAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavAction::Next => "next",
            NavAction::Finish => "finish",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub previous_enabled: bool,
    pub action: NavAction,
    pub advance_enabled: bool,
}

/// Everything a host needs to draw the current question.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub index: usize,
    pub total: usize,
    pub question_id: Option<String>,
    pub question_type: QuestionType,
    pub question_text: QuestionText,
    pub body: ScreenBody,
    pub navigation: Navigation,
    pub presentation: SurveyPresentation,
}

/// Render slots supplied by the host. Every slot defaults to drawing
/// nothing; the `has_*` queries decide which navigation buttons exist.
pub trait SurveyView {
    fn question_text(&mut self, _text: &QuestionText) {}

    fn selector(&mut self, _option: &ScreenOption, _multiple: bool) {}

    fn text_input(&mut self, _value: Option<&str>, _placeholder: Option<&str>, _auto_advance: bool) {
    }

    fn numeric_input(&mut self, _value: &str, _placeholder: Option<&str>, _auto_advance: bool) {}

    fn info(&mut self, _text: &QuestionText) {}

    fn previous(&mut self, _enabled: bool) {}

    fn next(&mut self, _enabled: bool) {}

    fn finished(&mut self, _enabled: bool) {}

    fn has_previous(&self) -> bool {
        true
    }

    fn has_next(&self) -> bool {
        true
    }

    fn has_finished(&self) -> bool {
        true
    }
}

impl Screen {
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }

    /// Walks the screen through the host's render slots.
    pub fn render_into<V: SurveyView + ?Sized>(&self, view: &mut V) {
        match &self.body {
            ScreenBody::Info => view.info(&self.question_text),
            ScreenBody::Selection {
                multiple, options, ..
            } => {
                view.question_text(&self.question_text);
                for option in options {
                    view.selector(option, *multiple);
                }
            }
            ScreenBody::TextInput {
                value,
                placeholder,
                auto_advance,
            } => {
                view.question_text(&self.question_text);
                view.text_input(value.as_deref(), placeholder.as_deref(), *auto_advance);
            }
            ScreenBody::NumericInput {
                value,
                placeholder,
                auto_advance,
            } => {
                view.question_text(&self.question_text);
                view.numeric_input(value, placeholder.as_deref(), *auto_advance);
            }
        }
        self.render_navigation(view);
    }

    fn render_navigation<V: SurveyView + ?Sized>(&self, view: &mut V) {
        let nav = &self.navigation;
        if view.has_previous() {
            view.previous(nav.previous_enabled);
        }
        match nav.action {
            NavAction::Finish if view.has_finished() => view.finished(nav.advance_enabled),
            NavAction::Next if view.has_next() => view.next(nav.advance_enabled),
            _ => {}
        }
    }
}
