pub mod question;
pub mod survey;

pub use question::{Question, QuestionOption, QuestionSettings, QuestionText, QuestionType};
pub use survey::{SurveyPresentation, SurveySpec};
