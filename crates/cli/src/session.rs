//! One-shot and interactive sessions.
//!
//! All printing goes through [`terminal::TerminalObserver`]; the loop's
//! return value is only used for error reporting, so replies are never
//! printed twice.

use crate::terminal::{StdinConfirm, TerminalObserver};
use ori_agent::{AgentLoop, ExecutionGate, SYSTEM_PROMPT};
use ori_config::AppConfig;
use ori_core::message::{Conversation, Message};
use ori_providers::OpenRouterClient;
use ori_tools::HostShell;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

const HELP: &str = "\
  Commands:
    help        Show this help
    exit, quit  Leave the session

  Anything else is sent to the model. When a reply contains an exec,
  edit, or writefile directive, you are asked before it runs; only
  'y' (or 'Y') confirms. Results are fed back to the model automatically.";

/// Answer a single prompt and exit.
pub async fn one_shot(config: &AppConfig, prompt: &str) -> Result<(), Box<dyn std::error::Error>> {
    let agent = build_agent(config);
    let mut conversation = new_conversation(config);
    conversation.push(Message::user(prompt));

    agent
        .process(&mut conversation)
        .await
        .map_err(|e| format!("Request failed: {e}"))?;
    Ok(())
}

/// Read-eval loop until `exit`, `quit`, or end of input.
pub async fn interactive(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║          Ori — Interactive Session           ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:         {}", config.model);
    println!(
        "  Confirmation:  {}",
        if config.agent.auto_confirm {
            "off (auto-confirm)"
        } else {
            "on"
        }
    );
    println!();
    println!("  Type 'help' for commands, 'exit' to quit.");
    println!();

    let agent = build_agent(config);
    let mut conversation = new_conversation(config);

    let stdin = std::io::stdin();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        match input {
            "" => continue,
            "exit" | "quit" => break,
            "help" => {
                println!("{HELP}");
                println!();
            }
            _ => {
                conversation.push(Message::user(input));
                println!();
                if let Err(e) = agent.process(&mut conversation).await {
                    eprintln!("  [Error] {e}");
                }
                println!();
            }
        }
    }

    println!();
    println!("  Goodbye!");
    Ok(())
}

/// Wire the client, shell, gate, and loop from the resolved config.
fn build_agent(config: &AppConfig) -> AgentLoop {
    let client = OpenRouterClient::new(config.api_key.as_deref().unwrap_or_default())
        .with_base_url(&config.base_url)
        .with_model(&config.model)
        .with_temperature(config.temperature)
        .with_max_tokens(Some(config.max_tokens));

    let timeout = match config.agent.command_timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };
    let shell = HostShell::new().with_timeout(timeout);

    let gate = ExecutionGate::new(Arc::new(shell), Arc::new(StdinConfirm))
        .with_auto_confirm(config.agent.auto_confirm);

    AgentLoop::new(Arc::new(client), gate)
        .with_observer(Arc::new(TerminalObserver))
        .with_max_directive_turns(config.agent.max_directive_turns)
}

/// Start a conversation seeded with the system prompt (or its override).
fn new_conversation(config: &AppConfig) -> Conversation {
    let prompt = config
        .system_prompt_override
        .as_deref()
        .unwrap_or(SYSTEM_PROMPT);
    Conversation::with_system(prompt)
}
