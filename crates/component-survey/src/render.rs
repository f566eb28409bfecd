use serde_json::{Map, Value, json};

use crate::screen::{Screen, ScreenBody};

/// Render the screen as a structured JSON-friendly value.
pub fn render_json_ui(screen: &Screen) -> Value {
    let mut body = Map::new();
    match &screen.body {
        ScreenBody::Selection {
            multiple,
            max_multi_select,
            options,
        } => {
            body.insert("kind".into(), Value::String("selection".into()));
            body.insert("multiple".into(), Value::Bool(*multiple));
            body.insert("max_multi_select".into(), json!(max_multi_select));
            body.insert(
                "options".into(),
                Value::Array(
                    options
                        .iter()
                        .map(|option| {
                            json!({
                                "index": option.index,
                                "option_text": option.option_text,
                                "value": option.value,
                                "selected": option.selected,
                            })
                        })
                        .collect(),
                ),
            );
        }
        ScreenBody::TextInput {
            value,
            placeholder,
            auto_advance,
        } => {
            body.insert("kind".into(), Value::String("text".into()));
            if let Some(value) = value {
                body.insert("value".into(), Value::String(value.clone()));
            }
            if let Some(placeholder) = placeholder {
                body.insert("placeholder".into(), Value::String(placeholder.clone()));
            }
            body.insert("auto_advance".into(), Value::Bool(*auto_advance));
        }
        ScreenBody::NumericInput {
            value,
            placeholder,
            auto_advance,
        } => {
            body.insert("kind".into(), Value::String("numeric".into()));
            body.insert("value".into(), Value::String(value.clone()));
            if let Some(placeholder) = placeholder {
                body.insert("placeholder".into(), Value::String(placeholder.clone()));
            }
            body.insert("auto_advance".into(), Value::Bool(*auto_advance));
        }
        ScreenBody::Info => {
            body.insert("kind".into(), Value::String("info".into()));
        }
    }

    let presentation = serde_json::to_value(&screen.presentation).unwrap_or(Value::Null);

    json!({
        "index": screen.index,
        "total": screen.total,
        "question_id": screen.question_id,
        "type": screen.question_type.as_str(),
        "question_text": screen.question_text.to_value(),
        "body": Value::Object(body),
        "navigation": {
            "previous_enabled": screen.navigation.previous_enabled,
            "action": screen.navigation.action.as_str(),
            "advance_enabled": screen.navigation.advance_enabled,
        },
        "presentation": presentation,
    })
}

/// Render the screen as human-friendly text.
pub fn render_text(screen: &Screen) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Question {}/{}: {}",
        screen.index + 1,
        screen.total,
        screen.question_text
    ));

    match &screen.body {
        ScreenBody::Selection {
            multiple,
            max_multi_select,
            options,
        } => {
            if *multiple {
                lines.push(format!("  (choose up to {})", max_multi_select));
            }
            for option in options {
                let marker = match (*multiple, option.selected) {
                    (true, true) => "[x]",
                    (true, false) => "[ ]",
                    (false, true) => "(*)",
                    (false, false) => "( )",
                };
                lines.push(format!(
                    "  {} {}. {}",
                    marker,
                    option.index + 1,
                    option.option_text
                ));
            }
        }
        ScreenBody::TextInput {
            value, placeholder, ..
        } => {
            lines.push(input_line(value.as_deref(), placeholder.as_deref()));
        }
        ScreenBody::NumericInput {
            value, placeholder, ..
        } => {
            let value = (!value.is_empty()).then_some(value.as_str());
            lines.push(input_line(value, placeholder.as_deref()));
        }
        ScreenBody::Info => {}
    }

    let nav = &screen.navigation;
    let mut controls = Vec::new();
    if nav.previous_enabled {
        controls.push("/back".to_string());
    }
    let forward = if nav.advance_enabled {
        format!("/{}", nav.action.as_str())
    } else {
        format!("/{} (answer required)", nav.action.as_str())
    };
    controls.push(forward);
    lines.push(format!("Controls: {}", controls.join("  ")));

    lines.join("\n")
}

fn input_line(value: Option<&str>, placeholder: Option<&str>) -> String {
    match (value, placeholder) {
        (Some(value), _) => format!("  Current value: {}", value),
        (None, Some(placeholder)) => format!("  ({})", placeholder),
        (None, None) => "  (no answer yet)".to_string(),
    }
}
