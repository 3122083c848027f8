//! Matrix Playground driver
//!
//! Reads one command per line on stdin and answers each with one JSON
//! line on stdout:
//!
//! - `{"ok":true, ...}` with the events and any requested values
//! - `{"ok":false,"error":{"code":...,"message":...}}` on failure
//!
//! Logs go to stderr. Set `RUST_LOG` or `MATRIXPLAY_LOG` to change the
//! filter (default `info`).

mod command;
mod config;

use command::{parse_command, Command};
use config::CliConfig;
use matrixplay::{Event, MatrixSlot, PlayError, Playground, Renderer};
use serde_json::{json, Value as JsonValue};
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Marker kept for each selection so a cancel can report what to unhighlight
type Marker = String;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("MATRIXPLAY_LOG"))
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// What the loop should do after a command
enum Flow {
    Continue,
    Quit,
}

fn main() {
    init_logging();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    let pretty = config.pretty;
    let mut playground: Playground<Marker> = Playground::new(config.playground);
    let renderer = Renderer::new();

    info!(version = VERSION, pretty, "matrixplay ready, reading commands from stdin");

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                debug!("end of input");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                let (response, flow) = respond(&mut playground, line);

                let mut stdout = io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", response).and_then(|_| stdout.flush()) {
                    error!(error = %e, "failed to write response");
                    break;
                }
                drop(stdout);

                if pretty {
                    eprint!("{}", renderer.render(&playground));
                }
                if let Flow::Quit = flow {
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        }
    }

    info!("matrixplay shutting down");
}

/// Parse and run one line, producing the JSON response
fn respond(playground: &mut Playground<Marker>, line: &str) -> (JsonValue, Flow) {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(e) => return (failure(&e), Flow::Continue),
    };

    let flow = if command == Command::Quit { Flow::Quit } else { Flow::Continue };

    match handle(playground, command) {
        Ok(JsonValue::Object(mut body)) => {
            body.insert("ok".to_string(), JsonValue::Bool(true));
            (JsonValue::Object(body), flow)
        }
        Ok(other) => (json!({ "ok": true, "value": other }), flow),
        Err(e) => {
            debug!(command = line, code = %e.code, "command failed");
            (failure(&e), flow)
        }
    }
}

fn failure(err: &PlayError) -> JsonValue {
    json!({ "ok": false, "error": err })
}

fn events(list: Vec<Event>) -> Result<JsonValue, PlayError> {
    Ok(json!({ "events": list }))
}

fn to_json<T: serde::Serialize>(value: T) -> Result<JsonValue, PlayError> {
    serde_json::to_value(value).map_err(|e| PlayError::parse_error(e.to_string()))
}

fn handle(playground: &mut Playground<Marker>, command: Command) -> Result<JsonValue, PlayError> {
    match command {
        Command::Start(name) => events(playground.start_by_name(&name)?),
        Command::Key(key) => events(playground.start_by_shortcut(key)?),
        Command::Select { slot, index } => {
            events(playground.select(slot, index, format!("{}:{}", slot, index))?)
        }
        Command::Scalar(text) => events(playground.provide_scalar(&text)?),
        Command::Cancel => {
            let (markers, list) = playground.cancel()?;
            Ok(json!({ "events": list, "rolled_back": markers }))
        }
        Command::Set { slot, row, col, text } => events(playground.edit_cell(slot, row, col, &text)?),
        Command::Resize { slot, rows, columns } => events(playground.resize(slot, rows, columns)?),
        Command::Transpose => events(playground.transpose()?),
        Command::Inverse => events(playground.inverse()?),
        Command::Rref => events(playground.rref()?),
        Command::Det => {
            let det = playground.determinant()?;
            Ok(json!({ "determinant": det }))
        }
        Command::Power(text) => events(playground.raise_to_power(&text)?),
        Command::Multiply(order) => events(playground.enter_multiplication(order)?),
        Command::Keep(keep) => events(playground.exit_multiplication(keep)?),
        Command::Undo => {
            let list = playground.undo()?;
            Ok(json!({ "moved": !list.is_empty(), "events": list }))
        }
        Command::Redo => {
            let list = playground.redo()?;
            Ok(json!({ "moved": !list.is_empty(), "events": list }))
        }
        Command::Goto(index) => events(playground.backstep_to(index)?),
        Command::Clear => events(playground.clear_history()?),
        Command::Latex => Ok(json!({ "latex": playground.export_latex() })),
        Command::Show => Ok(json!({
            "main": playground.main(),
            "multiplying": playground.matrix(MatrixSlot::Multiplying).filter(|_| playground.is_multiplication_mode()),
            "result": playground.result(),
            "instruction": playground.instruction(),
        })),
        Command::State => Ok(json!({ "state": to_json(playground.snapshot())? })),
        Command::Ops => Ok(json!({ "operations": playground.registry().list() })),
        Command::Help(name) => Ok(json!({ "operation": playground.registry().help(&name)? })),
        Command::Quit => Ok(json!({})),
    }
}
