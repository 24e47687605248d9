//! Terminal chat against Amazon Bedrock.
//!
//! Each input line is a prompt. `/clear` resets the conversation and
//! `/export <text>` prints the text as an editor insertion. Log verbosity
//! follows `LANTERN_LOG` (default `warn`), written to stderr.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use lantern::{
    BoxFuture, ChatConfig, ChatError, EditorSink, UiSignal, build_gateway_from_env,
    parse_command, session_builder, spawn_session_with,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "LANTERN_LOG";

#[derive(Debug)]
struct StdoutEditor;

impl EditorSink for StdoutEditor {
    fn insert<'a>(&'a self, text: String) -> BoxFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "[editor] {text}")
                .and_then(|()| stdout.flush())
                .map_err(|err| ChatError::editor(err.to_string()))
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render(signal: UiSignal) {
    let mut stdout = std::io::stdout().lock();
    let written = match signal {
        UiSignal::ResponseStarted => Ok(()),
        UiSignal::Fragment(text) => write!(stdout, "{text}"),
        UiSignal::ResponseEnded => writeln!(stdout),
        UiSignal::Error(message) => {
            eprintln!("\nerror: {message}");
            Ok(())
        }
        UiSignal::CommandRejected { command, message } => {
            eprintln!("\n{command} rejected: {message}");
            Ok(())
        }
    };

    if written.and_then(|()| stdout.flush()).is_err() {
        tracing::debug!(phase = "repl", event = "stdout_closed", "dropped output");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match ChatConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {}", err.message);
            return ExitCode::FAILURE;
        }
    };

    let gateway = match build_gateway_from_env(&config) {
        Ok(gateway) => gateway,
        Err(err) => {
            eprintln!("could not start: {}", lantern::sanitize_for_display(&err.message, 300));
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        phase = "repl",
        event = "started",
        model_id = %config.model_id,
        region = %config.region,
        "lantern repl ready"
    );

    let mut handle = spawn_session_with(|relay| {
        session_builder(gateway, &config, relay)
            .editor(Arc::new(StdoutEditor))
            .build()
    });
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Some(command) = parse_command(&line) {
                        if !handle.send(command) {
                            break;
                        }
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(phase = "repl", event = "stdin_error", error = %err);
                    break;
                }
            },
            signal = handle.signals.recv() => match signal {
                Some(signal) => render(signal),
                None => break,
            },
        }
    }

    match handle.close().await {
        Ok((_session, pending)) => {
            pending.into_iter().for_each(render);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(phase = "repl", event = "session_panicked", error = %err);
            ExitCode::FAILURE
        }
    }
}
