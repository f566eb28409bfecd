use survey_spec::Answer;

/// Callbacks the controller fires into the host application.
pub trait SurveyHost {
    /// Fired on forward navigation when the question being left has an answer.
    fn on_answer_submitted(&mut self, _answer: &Answer) {}

    /// Fired when leaving the last question, with unset slots removed.
    fn on_survey_finished(&mut self, _answers: &[Answer]) {}
}

/// Host that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl SurveyHost for NoopHost {}

impl<H: SurveyHost + ?Sized> SurveyHost for &mut H {
    fn on_answer_submitted(&mut self, answer: &Answer) {
        (**self).on_answer_submitted(answer);
    }

    fn on_survey_finished(&mut self, answers: &[Answer]) {
        (**self).on_survey_finished(answers);
    }
}

type AnswerCallback<'a> = Box<dyn FnMut(&Answer) + 'a>;
type FinishedCallback<'a> = Box<dyn FnMut(&[Answer]) + 'a>;

/// Host assembled from closures; either callback may be left out.
#[derive(Default)]
pub struct CallbackHost<'a> {
    answer_submitted: Option<AnswerCallback<'a>>,
    survey_finished: Option<FinishedCallback<'a>>,
}

impl<'a> CallbackHost<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer_submitted(mut self, callback: impl FnMut(&Answer) + 'a) -> Self {
        self.answer_submitted = Some(Box::new(callback));
        self
    }

    pub fn with_survey_finished(mut self, callback: impl FnMut(&[Answer]) + 'a) -> Self {
        self.survey_finished = Some(Box::new(callback));
        self
    }
}

impl SurveyHost for CallbackHost<'_> {
    fn on_answer_submitted(&mut self, answer: &Answer) {
        if let Some(callback) = self.answer_submitted.as_mut() {
            callback(answer);
        }
    }

    fn on_survey_finished(&mut self, answers: &[Answer]) {
        if let Some(callback) = self.survey_finished.as_mut() {
            callback(answers);
        }
    }
}
