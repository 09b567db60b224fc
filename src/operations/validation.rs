use filterdeck_core::ItemKey;
use std::path::PathBuf;

/// Validation error with field and message
#[derive(Debug, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// One editing command, as typed on the command line or in a script
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Toggle { group: String, index: usize },
    ToggleKey { group: String, key: ItemKey },
    SelectAll { group: String },
    ToggleGroup { group: String, label: String },
    Clear { group: String },
    Search { group: String, query: String },
    View { group: String, limit: Option<usize> },
    Scroll { group: String, top: f64, viewport: f64, content: f64 },
    Jump { group: String, key: String },
    Commit { group: Option<String> },
    Discard,
    Show { group: Option<String> },
    Validate,
    Save { path: Option<PathBuf> },
    Revert,
}

/// Split a line on whitespace, keeping double-quoted runs together
pub fn tokenize(line: &str) -> Result<Vec<String>, ValidationError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return Err(ValidationError::new("line", "Unterminated quote"));
    }
    if !current.is_empty() || quoted {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Parse one command line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ValidationError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens = tokenize(trimmed)?;
    let (verb, args) = match tokens.split_first() {
        Some((verb, args)) => (verb.as_str(), args),
        None => return Ok(None),
    };

    let command = match verb {
        "toggle" => {
            let [group, index] = exact::<2>(verb, args)?;
            Command::Toggle {
                group,
                index: parse_number("index", &index)?,
            }
        }
        "toggle-key" => match args {
            [group, label] => Command::ToggleKey {
                group: group.clone(),
                key: ItemKey::new(label.clone()),
            },
            [group, label, tag] => Command::ToggleKey {
                group: group.clone(),
                key: ItemKey::in_group(tag.clone(), label.clone()),
            },
            _ => return Err(usage(verb, "<group> <label> [tag]")),
        },
        "select-all" => {
            let [group] = exact::<1>(verb, args)?;
            Command::SelectAll { group }
        }
        "toggle-group" => {
            let [group, label] = exact::<2>(verb, args)?;
            Command::ToggleGroup { group, label }
        }
        "clear" => {
            let [group] = exact::<1>(verb, args)?;
            Command::Clear { group }
        }
        "search" => {
            let (group, rest) = args
                .split_first()
                .ok_or_else(|| usage(verb, "<group> [text...]"))?;
            Command::Search {
                group: group.clone(),
                query: rest.join(" "),
            }
        }
        "view" => match args {
            [group] => Command::View {
                group: group.clone(),
                limit: None,
            },
            [group, limit] => Command::View {
                group: group.clone(),
                limit: Some(parse_number("limit", limit)?),
            },
            _ => return Err(usage(verb, "<group> [limit]")),
        },
        "scroll" => {
            let [group, top, viewport, content] = exact::<4>(verb, args)?;
            Command::Scroll {
                group,
                top: parse_pixels("top", &top)?,
                viewport: parse_pixels("viewport", &viewport)?,
                content: parse_pixels("content", &content)?,
            }
        }
        "jump" => {
            let [group, key] = exact::<2>(verb, args)?;
            Command::Jump { group, key }
        }
        "commit" => Command::Commit {
            group: optional(verb, args, "[group]")?,
        },
        "discard" => {
            exact::<0>(verb, args)?;
            Command::Discard
        }
        "show" => Command::Show {
            group: optional(verb, args, "[group]")?,
        },
        "validate" => {
            exact::<0>(verb, args)?;
            Command::Validate
        }
        "save" => Command::Save {
            path: optional(verb, args, "[path]")?.map(PathBuf::from),
        },
        "revert" => {
            exact::<0>(verb, args)?;
            Command::Revert
        }
        other => {
            return Err(ValidationError::new("command", format!("Unknown command '{}'", other)));
        }
    };

    Ok(Some(command))
}

fn usage(verb: &str, args: &str) -> ValidationError {
    ValidationError::new(verb, format!("Usage: {} {}", verb, args).trim_end().to_string())
}

fn exact<const N: usize>(verb: &str, args: &[String]) -> Result<[String; N], ValidationError> {
    <[String; N]>::try_from(args.to_vec()).map_err(|_| {
        ValidationError::new(verb, format!("Expected {} argument(s), got {}", N, args.len()))
    })
}

fn optional(verb: &str, args: &[String], expected: &str) -> Result<Option<String>, ValidationError> {
    match args {
        [] => Ok(None),
        [value] => Ok(Some(value.clone())),
        _ => Err(usage(verb, expected)),
    }
}

fn parse_number(field: &str, value: &str) -> Result<usize, ValidationError> {
    value
        .parse()
        .map_err(|_| ValidationError::new(field, format!("'{}' is not a non-negative integer", value)))
}

fn parse_pixels(field: &str, value: &str) -> Result<f64, ValidationError> {
    match value.parse::<f64>() {
        Ok(pixels) if pixels.is_finite() && pixels >= 0.0 => Ok(pixels),
        _ => Err(ValidationError::new(field, format!("'{}' is not a pixel offset", value))),
    }
}
