mod wizard;

use clap::{Parser, Subcommand, ValueEnum};
use component_survey::{
    Advance, ScreenBody, SelectionEvent, SimpleSurvey, SurveyHost, load_survey, render_json_ui,
    render_text, schema, validate_survey,
};
use serde_json::Value;
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use survey_spec::{Answer, AnswerSet};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wizard::{
    AnswerParseError, TerminalView, Verbosity, WizardInput, WizardPresenter, parse_input,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const LOG_ENV: &str = "SIMPLE_SURVEY_LOG";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Text-based survey runner",
    long_about = "Runs survey documents question by question and checks their question settings"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    /// Prompt-style output drawn through the view slots.
    Prompt,
    /// Plain text summary of each screen.
    Text,
    /// Structured JSON for every screen.
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a survey interactively.
    Run {
        /// Survey document; the bundled sample survey is used when omitted.
        #[arg(long, value_name = "SURVEY")]
        survey: Option<PathBuf>,
        /// Move on as soon as a selection completes the question.
        #[arg(long)]
        auto_advance: bool,
        /// Show verbose output (question ids, input hints, debug logs).
        #[arg(long, alias = "debug")]
        verbose: bool,
        /// Also print the answers as JSON once finished.
        #[arg(long)]
        answers_json: bool,
        /// Write the collected answers as JSON to this file.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Render output mode for each screen.
        #[arg(long, value_enum, default_value_t = RenderMode::Prompt)]
        format: RenderMode,
    },
    /// Check the question settings of a survey document.
    Validate {
        #[arg(long, value_name = "SURVEY")]
        survey: PathBuf,
    },
    /// Print the JSON schema of survey documents.
    Schema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let verbose = matches!(cli.command, Command::Run { verbose: true, .. });
    init_tracing(verbose);

    match cli.command {
        Command::Run {
            survey,
            auto_advance,
            verbose,
            answers_json,
            out,
            format,
        } => {
            let options = RunOptions {
                auto_advance,
                verbosity: Verbosity::from_verbose(verbose),
                answers_json,
                out,
                format,
            };
            run_survey(survey, options, &mut io::stdin().lock())
        }
        Command::Validate { survey } => run_validate(survey),
        Command::Schema => run_schema(),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

struct RunOptions {
    auto_advance: bool,
    verbosity: Verbosity,
    answers_json: bool,
    out: Option<PathBuf>,
    format: RenderMode,
}

/// Keeps the callbacks the controller fires so the shell knows when to stop.
#[derive(Default)]
struct CliHost {
    submitted: usize,
    finished: Option<Vec<Answer>>,
}

impl SurveyHost for CliHost {
    fn on_answer_submitted(&mut self, answer: &Answer) {
        self.submitted += 1;
        debug!(question_id = ?answer.question_id, "answer submitted");
    }

    fn on_survey_finished(&mut self, answers: &[Answer]) {
        info!(answers = answers.len(), "survey finished");
        self.finished = Some(answers.to_vec());
    }
}

fn survey_config(path: Option<&PathBuf>, auto_advance: bool) -> CliResult<String> {
    let mut config = serde_json::Map::new();
    if let Some(path) = path {
        config.insert("survey_json".into(), Value::String(fs::read_to_string(path)?));
    }
    if auto_advance {
        config.insert("auto_advance".into(), Value::Bool(true));
    }
    Ok(Value::Object(config).to_string())
}

fn run_survey(
    survey_path: Option<PathBuf>,
    options: RunOptions,
    input: &mut impl BufRead,
) -> CliResult<()> {
    let config_json = survey_config(survey_path.as_ref(), options.auto_advance)?;
    let spec = load_survey(&config_json)?;
    let survey_id = spec.id.clone();
    let title = spec.title.clone();
    let total = spec.len();

    let mut survey = SimpleSurvey::new(spec, CliHost::default())?;
    let mut presenter = WizardPresenter::new(options.verbosity, options.answers_json);
    let mut view = TerminalView::new();
    presenter.show_header(title.as_deref(), total);

    while survey.host().finished.is_none() {
        // Defaults land after the first render; draw again once they apply.
        let mut screen = match options.format {
            RenderMode::Prompt => survey.render_into(&mut view)?,
            _ => survey.render()?,
        };
        if survey.flush_deferred() > 0 {
            view.take();
            screen = match options.format {
                RenderMode::Prompt => survey.render_into(&mut view)?,
                _ => survey.render()?,
            };
        }

        presenter.show_progress(&screen);
        match options.format {
            RenderMode::Prompt => presenter.show_lines(&view.take()),
            RenderMode::Text => println!("{}", render_text(&screen)),
            RenderMode::Json => {
                println!("{}", serde_json::to_string_pretty(&render_json_ui(&screen))?)
            }
        }

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err("survey aborted: input closed".into());
        }

        let command = match parse_input(&screen.body, &line) {
            Ok(command) => command,
            Err(err) => {
                presenter.show_parse_error(&err);
                continue;
            }
        };

        match command {
            WizardInput::Exit => return Err("survey aborted by user".into()),
            WizardInput::Back => survey.previous(),
            WizardInput::Advance => {
                if survey.advance()? == Advance::Blocked {
                    presenter.show_blocked();
                }
            }
            WizardInput::Toggle(option) => {
                if survey.press_option(option)? == SelectionEvent::Ignored {
                    presenter.show_ignored(option);
                }
            }
            WizardInput::Value(value) => {
                let auto_advance = submit_value(&mut survey, &screen.body, &value, &presenter);
                if auto_advance && survey.advance()? == Advance::Blocked {
                    presenter.show_blocked();
                }
            }
        }
    }

    let host = survey.into_host();
    let answers = host.finished.unwrap_or_default();
    debug!(submitted = host.submitted, "answers submitted during the run");
    let answer_set = AnswerSet::new(survey_id, answers);
    presenter.show_completion(&answer_set);

    if let Some(path) = options.out {
        fs::write(&path, answer_set.to_json_pretty()?)?;
        println!("Answers written to {}", path.display());
    }
    Ok(())
}

/// Stores a typed value; returns whether the input asks to move on right away.
fn submit_value(
    survey: &mut SimpleSurvey<CliHost>,
    body: &ScreenBody,
    value: &str,
    presenter: &WizardPresenter,
) -> bool {
    match body {
        ScreenBody::TextInput { auto_advance, .. } => survey.set_text(value) && *auto_advance,
        ScreenBody::NumericInput { auto_advance, .. } => {
            if survey.set_numeric(value) {
                *auto_advance
            } else {
                presenter.show_parse_error(&AnswerParseError::new(
                    format!("'{}' is not a whole number", value.trim()),
                    Some("digits with an optional sign".to_string()),
                ));
                false
            }
        }
        _ => false,
    }
}

fn run_validate(survey_path: PathBuf) -> CliResult<()> {
    let config_json = survey_config(Some(&survey_path), false)?;
    let report: Value = serde_json::from_str(&validate_survey(&config_json))?;
    if let Some(error) = report.get("error").and_then(Value::as_str) {
        return Err(error.to_string().into());
    }

    let valid = report["valid"].as_bool().unwrap_or(false);
    println!(
        "Validation result: {}",
        if valid { "valid" } else { "invalid" }
    );
    describe_validation(&report);

    if valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(report: &Value) {
    let Some(errors) = report["errors"].as_array().filter(|errors| !errors.is_empty()) else {
        return;
    };
    println!("Errors:");
    for error in errors {
        let label = error["question_id"]
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| format!("#{}", error["index"]));
        println!(
            "  {} - {}",
            label,
            error["message"].as_str().unwrap_or_default()
        );
    }
}

fn run_schema() -> CliResult<()> {
    let schema: Value = serde_json::from_str(&schema())?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
