//! Line command parser
//!
//! One command per line, words separated by whitespace. Scalar text is the
//! rest of the line so that `scalar -1 / 2` reads the same as `scalar -1/2`.

use matrixplay::{Keep, MatrixSlot, MultiplyOrder, PlayError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start(String),
    Key(char),
    Select { slot: MatrixSlot, index: usize },
    Scalar(String),
    Cancel,
    Set { slot: MatrixSlot, row: usize, col: usize, text: String },
    Resize { slot: MatrixSlot, rows: usize, columns: usize },
    Transpose,
    Inverse,
    Rref,
    Det,
    Power(String),
    Multiply(MultiplyOrder),
    Keep(Keep),
    Undo,
    Redo,
    Goto(usize),
    Clear,
    Latex,
    Show,
    State,
    Ops,
    Help(String),
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, PlayError> {
    let mut words = line.split_whitespace();
    let verb = match words.next() {
        Some(verb) => verb.to_lowercase(),
        None => return Err(PlayError::parse_error("empty command")),
    };
    let args: Vec<&str> = words.collect();

    let command = match verb.as_str() {
        "start" => Command::Start(word(&args, 0, "operation name")?.to_string()),
        "key" => Command::Key(key(word(&args, 0, "key")?)?),
        "select" => Command::Select {
            slot: slot(word(&args, 0, "matrix")?)?,
            index: index(word(&args, 1, "index")?)?,
        },
        "scalar" => Command::Scalar(rest(&args, 0, "scalar")?),
        "cancel" | "escape" => Command::Cancel,
        "set" => Command::Set {
            slot: slot(word(&args, 0, "matrix")?)?,
            row: index(word(&args, 1, "row")?)?,
            col: index(word(&args, 2, "column")?)?,
            text: rest(&args, 3, "value")?,
        },
        "resize" => Command::Resize {
            slot: slot(word(&args, 0, "matrix")?)?,
            rows: index(word(&args, 1, "rows")?)?,
            columns: index(word(&args, 2, "columns")?)?,
        },
        "transpose" => Command::Transpose,
        "inverse" => Command::Inverse,
        "rref" => Command::Rref,
        "det" | "determinant" => Command::Det,
        "power" => Command::Power(rest(&args, 0, "exponent")?),
        "multiply" => Command::Multiply(match word(&args, 0, "by|other")? {
            "by" => MultiplyOrder::MainFirst,
            "other" => MultiplyOrder::MultiplyingFirst,
            other => return Err(unexpected("by|other", other)),
        }),
        "keep" => Command::Keep(match word(&args, 0, "multiplied|multiplying|result")? {
            "multiplied" => Keep::Multiplied,
            "multiplying" => Keep::Multiplying,
            "result" => Keep::Result,
            other => return Err(unexpected("multiplied|multiplying|result", other)),
        }),
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "goto" => Command::Goto(index(word(&args, 0, "entry index")?)?),
        "clear" => Command::Clear,
        "latex" => Command::Latex,
        "show" => Command::Show,
        "state" => Command::State,
        "ops" => Command::Ops,
        "help" => Command::Help(word(&args, 0, "operation name")?.to_string()),
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(PlayError::parse_error(format!("unknown command '{}'", other))
                .with_suggestion("Commands: start, key, select, scalar, cancel, set, resize, transpose, inverse, rref, det, power, multiply, keep, undo, redo, goto, clear, latex, show, state, ops, help, quit"));
        }
    };
    Ok(command)
}

fn word<'a>(args: &[&'a str], position: usize, what: &str) -> Result<&'a str, PlayError> {
    args.get(position)
        .copied()
        .ok_or_else(|| PlayError::parse_error(format!("missing {}", what)))
}

fn rest(args: &[&str], from: usize, what: &str) -> Result<String, PlayError> {
    if args.len() <= from {
        return Err(PlayError::parse_error(format!("missing {}", what)));
    }
    Ok(args[from..].join(""))
}

fn index(text: &str) -> Result<usize, PlayError> {
    text.parse::<usize>()
        .map_err(|_| unexpected("a non-negative integer", text))
}

fn slot(text: &str) -> Result<MatrixSlot, PlayError> {
    text.parse()
}

fn key(text: &str) -> Result<char, PlayError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(unexpected("a single character", text)),
    }
}

fn unexpected(expected: &str, got: &str) -> PlayError {
    PlayError::parse_error(format!("expected {}, got '{}'", expected, got))
}
