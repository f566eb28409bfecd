use std::fmt::Write;

use component_survey::{Screen, ScreenBody, ScreenOption, SurveyView};
use survey_spec::{AnswerSet, QuestionText};

/// Controls which bits of state the wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: question prompts only.
    Clean,
    /// Verbose output: question ids, types, input hints and error details.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Terminal rendition of the controller's view slots. Lines are buffered
/// so a screen is printed in one go.
#[derive(Default)]
pub struct TerminalView {
    lines: Vec<String>,
    controls: Vec<String>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the buffered screen and resets the view for the next one.
    pub fn take(&mut self) -> Vec<String> {
        let mut lines = std::mem::take(&mut self.lines);
        let controls = std::mem::take(&mut self.controls);
        if !controls.is_empty() {
            lines.push(format!("Controls: {}", controls.join("  ")));
        }
        lines
    }

    fn control(&mut self, label: &str, enabled: bool) {
        if enabled {
            self.controls.push(format!("/{}", label));
        } else {
            self.controls.push(format!("/{} (answer required)", label));
        }
    }

    fn input(&mut self, value: Option<&str>, placeholder: Option<&str>, auto_advance: bool) {
        let line = match (value, placeholder) {
            (Some(value), _) => format!("  Current value: {}", value),
            (None, Some(placeholder)) => format!("  ({})", placeholder),
            (None, None) => "  (type your answer)".to_string(),
        };
        self.lines.push(line);
        if auto_advance {
            self.lines.push("  Submitting moves on automatically.".to_string());
        }
    }
}

impl SurveyView for TerminalView {
    fn question_text(&mut self, text: &QuestionText) {
        self.lines.push(text.to_string());
    }

    fn selector(&mut self, option: &ScreenOption, multiple: bool) {
        let marker = match (multiple, option.selected) {
            (true, true) => "[x]",
            (true, false) => "[ ]",
            (false, true) => "(*)",
            (false, false) => "( )",
        };
        self.lines.push(format!(
            "  {} {}. {}",
            marker,
            option.index + 1,
            option.option_text
        ));
    }

    fn text_input(&mut self, value: Option<&str>, placeholder: Option<&str>, auto_advance: bool) {
        self.input(value, placeholder, auto_advance);
    }

    fn numeric_input(&mut self, value: &str, placeholder: Option<&str>, auto_advance: bool) {
        let value = (!value.is_empty()).then_some(value);
        self.input(value, placeholder, auto_advance);
    }

    fn info(&mut self, text: &QuestionText) {
        self.lines.push(text.to_string());
    }

    fn previous(&mut self, enabled: bool) {
        if enabled {
            self.controls.push("/back".to_string());
        }
    }

    fn next(&mut self, enabled: bool) {
        self.control("next", enabled);
    }

    fn finished(&mut self, enabled: bool) {
        self.control("finish", enabled);
    }
}

/// Prints prompts, feedback and the final answer set.
pub struct WizardPresenter {
    verbosity: Verbosity,
    header_printed: bool,
    show_answers_json: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity, show_answers_json: bool) -> Self {
        Self {
            verbosity,
            header_printed: false,
            show_answers_json,
        }
    }

    pub fn show_header(&mut self, title: Option<&str>, total: usize) {
        if self.header_printed {
            return;
        }
        if let Some(title) = title {
            println!("Survey: {}", title);
        }
        if self.verbosity.is_verbose() {
            println!("Questions: {}", total);
        }
        self.header_printed = true;
    }

    pub fn show_progress(&self, screen: &Screen) {
        let mut line = format!("{}/{}", screen.index + 1, screen.total);
        if self.verbosity.is_verbose() {
            line.push_str(&format!(" [{}]", screen.question_type));
            if let Some(id) = &screen.question_id {
                line.push_str(&format!(" ({})", id));
            }
            if let Some(hint) = input_hint(&screen.body) {
                line.push(' ');
                line.push_str(&hint);
            }
        }
        println!("{}", line);
    }

    pub fn show_lines(&self, lines: &[String]) {
        for line in lines {
            println!("{}", line);
        }
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if self.verbosity.is_verbose()
            && let Some(debug) = &error.debug_message
        {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_blocked(&self) {
        eprintln!("An answer is required before moving on.");
    }

    pub fn show_ignored(&self, option: usize) {
        eprintln!("Option {} cannot be changed right now.", option + 1);
    }

    pub fn show_completion(&self, answer_set: &AnswerSet) {
        println!("Done ✅");
        match answer_set.to_cbor() {
            Ok(bytes) => {
                println!("Answers (CBOR hex): {}", encode_hex(&bytes));
            }
            Err(err) => {
                eprintln!("Failed to serialize answers to CBOR: {}", err);
            }
        }
        if self.show_answers_json {
            match answer_set.to_json_pretty() {
                Ok(pretty) => println!("{}", pretty),
                Err(err) => {
                    eprintln!("Failed to serialize answers to JSON: {}", err);
                }
            }
        }
    }
}

fn input_hint(body: &ScreenBody) -> Option<String> {
    match body {
        ScreenBody::Selection {
            multiple: true,
            max_multi_select,
            ..
        } => Some(format!("(option numbers, up to {})", max_multi_select)),
        ScreenBody::Selection { .. } => Some("(option number)".to_string()),
        ScreenBody::NumericInput { .. } => Some("(whole number)".to_string()),
        ScreenBody::TextInput { .. } => Some("(free text)".to_string()),
        ScreenBody::Info => None,
    }
}

/// One line of user input, interpreted against the current screen.
#[derive(Debug, PartialEq, Eq)]
pub enum WizardInput {
    Back,
    Advance,
    Exit,
    /// Zero-based option index.
    Toggle(usize),
    Value(String),
}

/// Error produced when parsing answers from the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

/// Interprets a raw input line. Commands start with `/`; a blank line moves
/// forward; anything else is an option number or a value for the input.
pub fn parse_input(body: &ScreenBody, raw: &str) -> Result<WizardInput, AnswerParseError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("/exit") {
        return Ok(WizardInput::Exit);
    }
    match trimmed {
        "" | "/next" | "/finish" => return Ok(WizardInput::Advance),
        "/back" => return Ok(WizardInput::Back),
        _ => {}
    }

    match body {
        ScreenBody::Selection { options, .. } => {
            let number: usize = trimmed.parse().map_err(|_| {
                AnswerParseError::new(
                    "enter an option number",
                    Some(format!("1..={}", options.len())),
                )
            })?;
            if number == 0 || number > options.len() {
                return Err(AnswerParseError::new(
                    format!("option {} does not exist", number),
                    Some(format!("1..={}", options.len())),
                ));
            }
            Ok(WizardInput::Toggle(number - 1))
        }
        ScreenBody::TextInput { .. } | ScreenBody::NumericInput { .. } => {
            // Keep inner spacing; only the line terminator is dropped.
            Ok(WizardInput::Value(
                raw.trim_end_matches(['\n', '\r']).to_string(),
            ))
        }
        ScreenBody::Info => Err(AnswerParseError::new(
            "press enter to continue",
            Some("blank line, /next or /back".to_string()),
        )),
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut encoded, "{:02x}", byte).expect("writing to string cannot fail");
    }
    encoded
}
