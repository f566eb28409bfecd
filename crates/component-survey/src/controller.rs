use std::collections::BTreeMap;

use survey_spec::{
    Answer, AnswerBook, AnswerValue, ConfigError, NumericInput, Question, QuestionType,
    SelectionSettings, SurveySpec, advance_enabled, classify_numeric, numeric_default,
    selection_settings, text_default,
};
use tracing::{debug, trace};

use crate::SurveyError;
use crate::host::{NoopHost, SurveyHost};
use crate::screen::{NavAction, Navigation, Screen, ScreenBody, ScreenOption, SurveyView};
use crate::selection::{SelectionEvent, SelectionHandler};

/// Result of a next/finish request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved forward to the given question index.
    Moved { to: usize },
    /// Left the last question; the host has been handed the answers.
    Finished,
    /// The current question is not complete yet.
    Blocked,
}

/// Answer write queued while rendering, applied by [`SimpleSurvey::flush_deferred`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredUpdate {
    pub index: usize,
    pub value: AnswerValue,
}

#[derive(Debug, Clone)]
struct SelectionState {
    settings: SelectionSettings,
    handler: SelectionHandler,
}

/// Survey controller: walks the question list one screen at a time and
/// keeps the answers given so far.
///
/// All mutation happens through `&mut self`. Defaults discovered while
/// rendering are queued and applied by [`SimpleSurvey::flush_deferred`],
/// which the host calls once the render pass is over.
#[derive(Debug)]
pub struct SimpleSurvey<H: SurveyHost = NoopHost> {
    spec: SurveySpec,
    host: H,
    current_question_index: usize,
    answers: AnswerBook,
    selections: BTreeMap<usize, SelectionState>,
    pending: Vec<DeferredUpdate>,
}

impl SimpleSurvey<NoopHost> {
    pub fn without_host(spec: SurveySpec) -> Result<Self, SurveyError> {
        Self::new(spec, NoopHost)
    }
}

impl<H: SurveyHost> SimpleSurvey<H> {
    pub fn new(spec: SurveySpec, host: H) -> Result<Self, SurveyError> {
        if spec.is_empty() {
            return Err(ConfigError::EmptySurvey.into());
        }
        Ok(Self {
            spec,
            host,
            current_question_index: 0,
            answers: AnswerBook::new(),
            selections: BTreeMap::new(),
            pending: Vec::new(),
        })
    }

    pub fn spec(&self) -> &SurveySpec {
        &self.spec
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn current_question(&self) -> &Question {
        &self.spec.questions[self.current_question_index]
    }

    pub fn is_last(&self) -> bool {
        self.current_question_index + 1 == self.spec.len()
    }

    pub fn answers(&self) -> &AnswerBook {
        &self.answers
    }

    pub fn current_answer(&self) -> Option<&Answer> {
        self.answers.get(self.current_question_index)
    }

    /// Answers in question order, unset slots removed.
    pub fn collected_answers(&self) -> Vec<Answer> {
        self.answers.collect()
    }

    pub fn pending_updates(&self) -> &[DeferredUpdate] {
        &self.pending
    }

    /// Whether the next/finish action is currently available.
    pub fn can_advance(&self) -> Result<bool, SurveyError> {
        Ok(advance_enabled(
            self.current_question(),
            self.current_question_index,
            self.current_answer(),
        )?)
    }

    /// Builds the screen for the current question.
    ///
    /// The first render of a selection question checks its settings and
    /// creates its selection handler; configured defaults are queued as
    /// deferred updates rather than written immediately.
    pub fn render(&mut self) -> Result<Screen, SurveyError> {
        let index = self.current_question_index;
        let question = self.current_question().clone();
        let body = match question.question_type {
            QuestionType::SelectionGroup | QuestionType::MultipleSelectionGroup => {
                self.selection_body(index, &question)?
            }
            QuestionType::TextInput => self.text_body(index, &question),
            QuestionType::NumericInput => self.numeric_body(index, &question),
            QuestionType::Info => ScreenBody::Info,
        };

        let navigation = Navigation {
            previous_enabled: index != 0,
            action: if self.is_last() {
                NavAction::Finish
            } else {
                NavAction::Next
            },
            advance_enabled: self.can_advance()?,
        };

        Ok(Screen {
            index,
            total: self.spec.len(),
            question_id: question.question_id.clone(),
            question_type: question.question_type,
            question_text: question.question_text.clone(),
            body,
            navigation,
            presentation: self.spec.presentation.clone(),
        })
    }

    /// Renders the current question through the host's render slots.
    pub fn render_into<V: SurveyView + ?Sized>(&mut self, view: &mut V) -> Result<Screen, SurveyError> {
        let screen = self.render()?;
        screen.render_into(view);
        Ok(screen)
    }

    /// Applies queued default answers. Updates for a question the user has
    /// already left, or that got answered in the meantime, are dropped.
    /// Returns how many were applied.
    pub fn flush_deferred(&mut self) -> usize {
        let mut applied = 0;
        for update in std::mem::take(&mut self.pending) {
            if update.index != self.current_question_index {
                debug!(
                    index = update.index,
                    current = self.current_question_index,
                    "dropping default for a question that is no longer shown"
                );
                continue;
            }
            if self.answers.contains(update.index) {
                trace!(index = update.index, "question already answered; default skipped");
                continue;
            }
            if self.update_answer(update.value) {
                applied += 1;
            }
        }
        applied
    }

    /// Replaces the answer of the current question. Info questions never
    /// hold an answer; the write is ignored and `false` returned.
    pub fn update_answer(&mut self, value: AnswerValue) -> bool {
        let index = self.current_question_index;
        let question = self.current_question();
        if question.question_type == QuestionType::Info {
            trace!(index, "answer for an info question ignored");
            return false;
        }
        let question_id = question.question_id.clone();
        debug!(index, question_id = ?question_id, "answer updated");
        self.answers.set(index, Answer::new(question_id, value));
        true
    }

    /// Relays a press on option `option_index` of the current selection
    /// question into the answers, auto-advancing when configured.
    pub fn press_option(&mut self, option_index: usize) -> Result<SelectionEvent, SurveyError> {
        let index = self.current_question_index;
        let question = self.current_question().clone();
        if !question.question_type.is_selection() {
            trace!(index, "option press on a non-selection question ignored");
            return Ok(SelectionEvent::Ignored);
        }

        let survey_auto_advance = self.spec.auto_advance;
        let state = self.selection_state(index, &question)?;
        let event = state.handler.press(option_index);
        let selected = state.handler.selected_indexes();
        let multiple = state.settings.mode.is_multiple();
        let auto_advance = state.settings.auto_advance || survey_auto_advance;

        match event {
            SelectionEvent::Ignored => {
                trace!(index, option_index, "option press ignored");
            }
            SelectionEvent::Selected { index: chosen } => {
                let value = if multiple {
                    AnswerValue::MultiSelected(question.options_at(&selected))
                } else {
                    AnswerValue::Selected(question.options[chosen].clone())
                };
                self.update_answer(value);
                if auto_advance {
                    self.auto_advance()?;
                }
            }
            SelectionEvent::Deselected { .. } => {
                let value = if multiple {
                    AnswerValue::MultiSelected(question.options_at(&selected))
                } else {
                    AnswerValue::Cleared
                };
                self.update_answer(value);
            }
        }
        Ok(event)
    }

    /// Sets the answer of the current text question; any string is kept as is.
    pub fn set_text(&mut self, value: impl Into<String>) -> bool {
        if self.current_question().question_type != QuestionType::TextInput {
            trace!(
                index = self.current_question_index,
                "text input on a non-text question ignored"
            );
            return false;
        }
        self.update_answer(AnswerValue::Text(value.into()))
    }

    /// Sets the answer of the current numeric question. The leading integer
    /// of `raw` is stored; an empty string is stored as is; anything else
    /// leaves the answer untouched.
    pub fn set_numeric(&mut self, raw: &str) -> bool {
        if self.current_question().question_type != QuestionType::NumericInput {
            trace!(
                index = self.current_question_index,
                "numeric input on a non-numeric question ignored"
            );
            return false;
        }
        match classify_numeric(raw) {
            NumericInput::Integer(value) => self.update_answer(AnswerValue::Integer(value)),
            NumericInput::Empty => self.update_answer(AnswerValue::Text(String::new())),
            NumericInput::Rejected => {
                trace!(index = self.current_question_index, raw, "numeric input rejected");
                false
            }
        }
    }

    /// Moves back one question. Does nothing on the first question.
    pub fn previous(&mut self) {
        if self.current_question_index == 0 {
            debug!("previous requested on the first question; ignored");
            return;
        }
        self.current_question_index -= 1;
        debug!(index = self.current_question_index, "moved back");
    }

    pub fn next(&mut self) -> Result<Advance, SurveyError> {
        self.advance()
    }

    pub fn finish(&mut self) -> Result<Advance, SurveyError> {
        self.advance()
    }

    /// Shared next/finish action.
    ///
    /// Submits the current answer if there is one, then either moves to the
    /// following question or, on the last question, hands every collected
    /// answer to the host. The index stays on the last question afterwards.
    pub fn advance(&mut self) -> Result<Advance, SurveyError> {
        if !self.can_advance()? {
            trace!(index = self.current_question_index, "advance blocked");
            return Ok(Advance::Blocked);
        }

        if let Some(answer) = self.current_answer().cloned() {
            self.host.on_answer_submitted(&answer);
        }

        if self.is_last() {
            let answers = self.collected_answers();
            debug!(answers = answers.len(), "survey finished");
            self.host.on_survey_finished(&answers);
            return Ok(Advance::Finished);
        }

        self.current_question_index += 1;
        debug!(index = self.current_question_index, "moved forward");
        Ok(Advance::Moved {
            to: self.current_question_index,
        })
    }

    /// Advance triggered by a completed selection. Multi-select only moves
    /// on once the minimum number of options is chosen.
    fn auto_advance(&mut self) -> Result<Advance, SurveyError> {
        let outcome = self.advance()?;
        debug!(?outcome, "auto advance");
        Ok(outcome)
    }

    fn selection_state(
        &mut self,
        index: usize,
        question: &Question,
    ) -> Result<&mut SelectionState, SurveyError> {
        if !self.selections.contains_key(&index) {
            let settings = selection_settings(question, index, self.spec.auto_advance)?;
            let handler = SelectionHandler::from_settings(&settings, question.options.len());
            debug!(index, "selection handler created");
            self.selections
                .insert(index, SelectionState { settings, handler });
        }
        let len = self.spec.len();
        self.selections
            .get_mut(&index)
            .ok_or_else(|| ConfigError::IndexOutOfRange { index, len }.into())
    }

    fn selection_body(&mut self, index: usize, question: &Question) -> Result<ScreenBody, SurveyError> {
        let answered = self.answers.contains(index);
        let state = self.selection_state(index, question)?;
        // Queued until the slot holds an answer; a dropped default comes back
        // as long as the handler still shows it.
        let default = (!answered
            && state.settings.has_default()
            && state.handler.holds_exactly(&state.settings.default_selection))
        .then(|| {
            if state.settings.mode.is_multiple() {
                AnswerValue::MultiSelected(question.options_at(&state.settings.default_selection))
            } else {
                AnswerValue::Selected(question.options[state.settings.default_selection[0]].clone())
            }
        });
        let options = question
            .options
            .iter()
            .enumerate()
            .map(|(position, option)| ScreenOption {
                index: position,
                option_text: option.option_text.clone(),
                value: option.value.clone(),
                selected: state.handler.is_selected(position),
            })
            .collect();
        let body = ScreenBody::Selection {
            multiple: state.settings.mode.is_multiple(),
            max_multi_select: state.settings.mode.max_multi_select(),
            options,
        };
        if let Some(value) = default {
            self.schedule(index, value);
        }
        Ok(body)
    }

    fn text_body(&mut self, index: usize, question: &Question) -> ScreenBody {
        if !self.answers.contains(index)
            && let Some(default) = question.default_value.as_ref().and_then(text_default)
        {
            self.schedule(index, AnswerValue::Text(default));
        }
        ScreenBody::TextInput {
            value: self.answers.get(index).map(|answer| answer.value.to_display()),
            placeholder: question.placeholder_text.clone(),
            auto_advance: self.spec.auto_advance,
        }
    }

    fn numeric_body(&mut self, index: usize, question: &Question) -> ScreenBody {
        if !self.answers.contains(index)
            && let Some(default) = question.default_value.as_ref().and_then(numeric_default)
        {
            self.schedule(index, AnswerValue::Integer(default));
        }
        ScreenBody::NumericInput {
            value: self
                .answers
                .get(index)
                .map(|answer| answer.value.to_display())
                .unwrap_or_default(),
            placeholder: question.placeholder_text.clone(),
            auto_advance: self.spec.auto_advance,
        }
    }

    fn schedule(&mut self, index: usize, value: AnswerValue) {
        if self.pending.iter().any(|update| update.index == index) {
            return;
        }
        trace!(index, "default answer deferred");
        self.pending.push(DeferredUpdate { index, value });
    }
}
