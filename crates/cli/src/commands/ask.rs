//! `dsatutor ask`: Single question or interactive tutoring in the terminal.
//!
//! Interactive mode keeps one in-memory session for the whole run, so the
//! tutor sees the same recent context as in the browser.

use dsatutor_agent::{ReplySource, TutorAgent, TutorReply};
use dsatutor_core::session::{Exchange, SessionId, SessionStore};
use dsatutor_memory::InMemorySessionStore;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let provider = dsatutor_providers::build_from_config(&config);
    let tutor = TutorAgent::from_config(&config, provider);

    if !tutor.has_model_client() {
        eprintln!();
        eprintln!("  ⚠️  No API key configured; replies will use the offline fallback.");
        eprintln!("     Set DSATUTOR_API_KEY or GROQ_API_KEY, or add api_key to");
        eprintln!("     {}", dsatutor_config::AppConfig::config_dir().join("config.toml").display());
        eprintln!();
    }

    let store = InMemorySessionStore::new();
    let session = SessionId::new();

    if let Some(msg) = message {
        let reply = turn(&tutor, &store, &session, msg.trim()).await?;
        println!("{}", reply.text);
        return Ok(());
    }

    println!();
    println!("  🎓 DSA Tutor — Interactive Mode");
    println!();
    println!("  Candidates: {}", display_candidates(&tutor));
    println!("  Type your question and press Enter.");
    println!("  '/clear' starts over, 'exit' quits.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => {}
            "exit" | "quit" => break,
            "/clear" => {
                store.clear(&session).await?;
                println!("  (conversation cleared)\n");
            }
            _ => {
                let reply = turn(&tutor, &store, &session, input).await?;
                println!();
                for line in reply.text.lines() {
                    println!("  {line}");
                }
                println!();
            }
        }
        prompt()?;
    }

    println!();
    println!("  Happy practicing! 👋");
    println!();

    Ok(())
}

/// One question: read history, ask the tutor, record the exchange.
async fn turn(
    tutor: &TutorAgent,
    store: &InMemorySessionStore,
    session: &SessionId,
    message: &str,
) -> Result<TutorReply, Box<dyn std::error::Error>> {
    if message.is_empty() {
        return Err("Empty message".into());
    }

    let history = store.get_or_create(session).await?;
    eprint!("  Thinking...");
    let reply = tutor.handle(message, &history.exchanges).await;
    eprint!("\r              \r");

    if reply.source == ReplySource::Fallback {
        eprintln!("  (offline reply: no model answered)");
    }

    store
        .append(session, Exchange::new(message, reply.text.clone()))
        .await?;
    Ok(reply)
}

fn display_candidates(tutor: &TutorAgent) -> String {
    if tutor.candidates().is_empty() {
        "none (offline)".into()
    } else {
        tutor.candidates().join(", ")
    }
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}
