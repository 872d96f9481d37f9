use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sahaya_client::{ChatSession, HttpChatTransport, SubmitOutcome, DEFAULT_ENDPOINT};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sahaya-chat", version, about = "Chat with a sahaya endpoint from the terminal")]
struct Args {
    /// Origin of the sahaya server.
    #[arg(long, env = "SAHAYA_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Seconds to wait for each answer.
    #[arg(long, env = "SAHAYA_CLIENT_TIMEOUT_SECS", default_value_t = 120)]
    timeout_secs: u64,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    let transport = HttpChatTransport::new(&args.endpoint)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let session = ChatSession::new(transport);
    let mut editor = DefaultEditor::new().context("failed to open terminal")?;

    let mut rendered = render(&session, 0);
    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("failed to read input"),
        };

        match runtime.block_on(session.submit(&line)) {
            SubmitOutcome::Ignored | SubmitOutcome::Busy => continue,
            SubmitOutcome::Answered | SubmitOutcome::Failed => {
                let _ = editor.add_history_entry(line.as_str());
            }
        }
        rendered = render(&session, rendered);
    }
    Ok(())
}

/// Prints messages appended since `from` and returns the new high-water mark.
fn render(session: &ChatSession, from: usize) -> usize {
    let messages = session.messages();
    for message in messages.iter().skip(from) {
        println!("{message}");
    }
    messages.len()
}
