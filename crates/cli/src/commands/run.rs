//! `agentrelay`: run one challenge through the agent team.

use agentrelay_agent::{truncate_chars, TurnLoop};
use agentrelay_config::{ConfigError, RelayConfig};
use agentrelay_core::agent::AgentKind;
use agentrelay_core::event::{EventSink, RunEvent};
use agentrelay_providers::OllamaProvider;
use agentrelay_telemetry::{FanoutSink, JsonlEventLog, TracingSink};
use agentrelay_tools::ShellTool;
use std::io::{IsTerminal, Read};
use std::path::Path;
use std::sync::Arc;

/// Used when no challenge is passed on the command line or stdin.
pub const DEFAULT_CHALLENGE: &str = concat!(
    "Build a complete Text-to-Speech web application:\n",
    "1. Backend: Flask on port 5000 with POST /api/tts that accepts ",
    "{\"text\": \"...\", \"voice\": \"...\"} and returns a WAV file using espeak-ng\n",
    "2. Frontend: /var/www/html/index.html with dark theme, text input, voice selector, ",
    "Generate button, audio player, download button, history of generated files\n",
    "3. Configure Apache to proxy /api/* to Flask on port 5000\n",
    "4. Start everything and test with curl\n",
);

const RULE: &str = "==================================================";

pub async fn run(
    config_path: &Path,
    challenge: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match RelayConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            if matches!(e, ConfigError::NotFound(_)) {
                eprintln!("   Run `agentrelay init` to create it.");
            }
            std::process::exit(1);
        }
    };

    tracing::debug!(path = %config_path.display(), url = %config.ollama.url, "Loaded config");
    let challenge = choose_challenge(challenge, read_piped_stdin)?;

    let provider = Arc::new(OllamaProvider::new(
        config.ollama.url.clone(),
        config.ollama.request_timeout(),
    )?);
    let shell = Arc::new(ShellTool::new(config.orchestrator.shell_timeout()));
    let log = Arc::new(JsonlEventLog::in_dir(&config.orchestrator.log_dir));
    let events = Arc::new(FanoutSink::new().with(log.clone()).with(Arc::new(TracingSink)));

    print_banner(&config, &challenge, log.path());

    events.emit(RunEvent::Start {
        challenge: challenge.clone(),
        config: toml::to_string(&config)?,
    });

    let turn_loop = TurnLoop::from_config(&config, provider, shell, events);
    let outcome = turn_loop.run(&challenge).await;

    println!("\n{RULE}");
    println!(
        "🏁 Orchestration finished: {} after {} turn(s). Log: {}",
        outcome.stop_reason,
        outcome.turns,
        log.path().display()
    );
    println!("{RULE}\n");

    Ok(())
}

/// `--challenge`, else piped stdin, else the built-in challenge.
///
/// Blank input from either source counts as absent. Stdin is only read
/// when the flag is missing or blank.
fn choose_challenge<F>(flag: Option<String>, piped: F) -> std::io::Result<String>
where
    F: FnOnce() -> std::io::Result<Option<String>>,
{
    if let Some(challenge) = flag.filter(|c| !c.trim().is_empty()) {
        return Ok(challenge);
    }

    if let Some(text) = piped()?.filter(|t| !t.trim().is_empty()) {
        return Ok(text);
    }

    println!("Using the default challenge. Pass --challenge for a custom one.");
    Ok(DEFAULT_CHALLENGE.to_string())
}

/// Everything on stdin, or `None` when stdin is a terminal.
fn read_piped_stdin() -> std::io::Result<Option<String>> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(Some(buffer))
}

fn print_banner(config: &RelayConfig, challenge: &str, log_path: &Path) {
    println!("\n{RULE}");
    println!("🤖 agentrelay: multi-agent orchestrator");
    println!("{RULE}");
    println!();
    for (label, kind) in [
        ("Main agent", AgentKind::Main),
        ("Tools", AgentKind::Tools),
        ("Code", AgentKind::Code),
        ("Text", AgentKind::Text),
    ] {
        let agent = config.agents.resolve(kind);
        let note = if config.agents.is_configured(kind) { "" } else { " (default)" };
        println!("{label}: {}{note}", agent.model);
    }
    println!("\nChallenge: {}...", truncate_chars(challenge, 100));
    println!("Log: {}\n", log_path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piped(text: &str) -> impl FnOnce() -> std::io::Result<Option<String>> {
        let text = text.to_string();
        move || Ok(Some(text))
    }

    fn terminal() -> std::io::Result<Option<String>> {
        Ok(None)
    }

    #[test]
    fn flag_wins_over_stdin() {
        let challenge = choose_challenge(Some("Build a CLI".into()), piped("from stdin")).unwrap();
        assert_eq!(challenge, "Build a CLI");
    }

    #[test]
    fn flag_skips_reading_stdin() {
        let challenge = choose_challenge(Some("Build a CLI".into()), || {
            panic!("stdin must not be read when the flag is set")
        })
        .unwrap();
        assert_eq!(challenge, "Build a CLI");
    }

    #[test]
    fn piped_stdin_used_without_flag() {
        let challenge = choose_challenge(None, piped("Build a game\n")).unwrap();
        assert_eq!(challenge, "Build a game\n");
    }

    #[test]
    fn blank_flag_falls_through_to_stdin() {
        let challenge = choose_challenge(Some("   ".into()), piped("Build a game")).unwrap();
        assert_eq!(challenge, "Build a game");

        let challenge = choose_challenge(Some(String::new()), piped("Build a game")).unwrap();
        assert_eq!(challenge, "Build a game");
    }

    #[test]
    fn blank_flag_and_blank_stdin_use_default() {
        let challenge = choose_challenge(Some(" \t".into()), piped("\n\n")).unwrap();
        assert_eq!(challenge, DEFAULT_CHALLENGE);
    }

    #[test]
    fn terminal_without_flag_uses_default() {
        assert_eq!(choose_challenge(None, terminal).unwrap(), DEFAULT_CHALLENGE);
    }

    #[test]
    fn stdin_read_errors_propagate() {
        let err = choose_challenge(None, || {
            Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "not utf-8"))
        })
        .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
