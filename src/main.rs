use std::io::{self, Write};

use color_eyre::eyre::{eyre, Result, WrapErr};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

use gptchat::cli::{
    parse_args, parse_line, print_history, version_line, ChatArgs, CliCommand, Renderer,
    ReplCommand, USAGE,
};
use gptchat::config::{ChatConfig, ENV_ACCESS_TOKEN};
use gptchat::error::ChatError;
use gptchat::models::Message;
use gptchat::session::{ChatSession, SessionEvent};

#[tokio::main]
async fn main() -> Result<()> {
    let args = match parse_args(std::env::args()) {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            print!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Invalid(reason) => {
            eprintln!("error: {}\n\n{}", reason, USAGE);
            std::process::exit(2);
        }
        CliCommand::Chat(args) => args,
    };

    color_eyre::install()?;
    init_tracing();

    let mut session = build_session(&args)?;
    let mut events = session.subscribe();

    match args.prompt {
        Some(prompt) => {
            send(&mut session, &mut events, &prompt).await?;
        }
        None => repl(&mut session, &mut events).await?,
    }

    Ok(())
}

/// Logs go to stderr so they never mix with the reply on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_session(args: &ChatArgs) -> Result<ChatSession> {
    let mut config = ChatConfig::from_env().wrap_err("invalid environment")?;

    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(proxy) = &args.proxy {
        config.proxy = Some(proxy.clone());
    }
    if let Some(org) = &args.organization {
        config.organization = Some(org.clone());
    }
    if config.token.is_none() {
        return Err(eyre!("{} is not set", ENV_ACCESS_TOKEN));
    }

    tracing::debug!(?config, "Starting session");
    Ok(ChatSession::from_config(config)?)
}

async fn repl(session: &mut ChatSession, events: &mut UnboundedReceiver<SessionEvent>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Exit => break,
            ReplCommand::Clear => {
                session.clear_history();
                session.set_conversation_id(None);
                println!("(history cleared)");
            }
            ReplCommand::History => print_history(&mut io::stdout(), session.history())?,
            ReplCommand::Unknown(cmd) => eprintln!("unknown command: {}", cmd),
            ReplCommand::Prompt(prompt) => {
                if let Err(err) = send(session, events, &prompt).await {
                    report(&err);
                }
            }
        }
    }

    Ok(())
}

/// Send one prompt, printing the reply as it streams in.
async fn send(
    session: &mut ChatSession,
    events: &mut UnboundedReceiver<SessionEvent>,
    prompt: &str,
) -> Result<Message, ChatError> {
    let mut renderer = Renderer::new();
    let mut stdout = io::stdout();

    let result = {
        let reply = session.send_message(prompt);
        tokio::pin!(reply);

        loop {
            tokio::select! {
                biased;
                Some(event) = events.recv() => show(&mut renderer, &mut stdout, event),
                result = &mut reply => break result,
            }
        }
    };

    while let Ok(event) = events.try_recv() {
        show(&mut renderer, &mut stdout, event);
    }

    match &result {
        Ok(reply) => {
            if let Err(e) = renderer.finish(&mut stdout, &reply.text) {
                tracing::warn!(error = %e, "Failed to write reply");
            }
        }
        Err(_) => {
            let _ = renderer.abort(&mut stdout);
        }
    }
    result
}

fn show<W: Write>(renderer: &mut Renderer, out: &mut W, event: SessionEvent) {
    match event {
        SessionEvent::Prompt(_) => {}
        SessionEvent::Progress(message) => {
            if let Err(e) = renderer.progress(out, &message.text) {
                tracing::warn!(error = %e, "Failed to write reply");
            }
        }
        SessionEvent::ApiError(err) => eprintln!("\n{}", err),
    }
}

fn report(err: &ChatError) {
    let category = err.category();
    eprintln!("error: {}", err);
    eprintln!("hint: {}", category.hint());
}
