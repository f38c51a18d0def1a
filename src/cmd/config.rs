use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use clap::{Args, Subcommand};

use crate::cmd::console::Console;
use crate::config::{GITHUB_TOKEN_VAR, LLM_API_KEY_VAR, Secrets, StoredConfig};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run<R: BufRead, W: Write>(
    command: ConfigCommand,
    path: &Path,
    console: &mut Console<R, W>,
) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(path, console),
        ConfigCommand::Show => run_show(path, &Secrets::from_env(), console),
    }
}

fn run_init<R: BufRead, W: Write>(path: &Path, console: &mut Console<R, W>) -> AppResult<()> {
    let mut cfg = StoredConfig::load(path)?;

    console.say("Configuring relnotes.")?;
    console.say("Press Enter to keep the current value, '-' to clear it.")?;
    console.say(&format!(
        "Tokens are read from {GITHUB_TOKEN_VAR} and {LLM_API_KEY_VAR}, never from this file."
    ))?;
    console.say("")?;

    apply_prompt(console, "Model identifier", &mut cfg.model_engine)?;
    apply_prompt(console, "Output directory", &mut cfg.output_dir)?;
    apply_prompt(console, "Release marker", &mut cfg.release_marker)?;
    apply_prompt(console, "Hosting API base URL", &mut cfg.github_api_base)?;
    apply_prompt(console, "LLM API base URL", &mut cfg.llm_api_base)?;
    apply_parsed_prompt(console, "Concurrent diff fetches", &mut cfg.diff_concurrency)?;
    apply_parsed_prompt(
        console,
        "Hosting request timeout (seconds)",
        &mut cfg.request_timeout_secs,
    )?;
    apply_parsed_prompt(console, "LLM request timeout (seconds)", &mut cfg.llm_timeout_secs)?;

    cfg.save(path)?;
    console.say(&format!("\nConfiguration saved to {}", path.display()))
}

fn run_show<R: BufRead, W: Write>(
    path: &Path,
    secrets: &Secrets,
    console: &mut Console<R, W>,
) -> AppResult<()> {
    let cfg = StoredConfig::load(path)?;

    console.say(&format!("Configuration file: {}", path.display()))?;
    console.say(&format!("Model: {}", display_value(&cfg.model_engine)))?;
    console.say(&format!("Output directory: {}", display_value(&cfg.output_dir)))?;
    console.say(&format!("Release marker: {}", display_value(&cfg.release_marker)))?;
    console.say(&format!(
        "Hosting API base URL: {}",
        display_value(&cfg.github_api_base)
    ))?;
    console.say(&format!("LLM API base URL: {}", display_value(&cfg.llm_api_base)))?;
    console.say(&format!(
        "Concurrent diff fetches: {}",
        display_value(&cfg.diff_concurrency)
    ))?;
    console.say(&format!(
        "Hosting request timeout: {}",
        display_value(&cfg.request_timeout_secs)
    ))?;
    console.say(&format!(
        "LLM request timeout: {}",
        display_value(&cfg.llm_timeout_secs)
    ))?;
    console.say(&format!(
        "{GITHUB_TOKEN_VAR}: {}",
        mask_secret(&secrets.github_token)
    ))?;
    console.say(&format!(
        "{LLM_API_KEY_VAR}: {}",
        mask_secret(&secrets.llm_api_key)
    ))
}

fn apply_prompt<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    field: &str,
    target: &mut Option<String>,
) -> AppResult<()> {
    match prompt(console, field, target.as_deref())? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn apply_parsed_prompt<R, W, T>(
    console: &mut Console<R, W>,
    field: &str,
    target: &mut Option<T>,
) -> AppResult<()>
where
    R: BufRead,
    W: Write,
    T: FromStr + ToString,
{
    loop {
        let current = target.as_ref().map(ToString::to_string);
        match prompt(console, field, current.as_deref())? {
            PromptAction::Keep => return Ok(()),
            PromptAction::Clear => {
                *target = None;
                return Ok(());
            }
            PromptAction::Set(value) => match value.parse() {
                Ok(parsed) => {
                    *target = Some(parsed);
                    return Ok(());
                }
                Err(_) => console.say(&format!("'{value}' is not a valid number."))?,
            },
        }
    }
}

fn prompt<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    field: &str,
    current: Option<&str>,
) -> AppResult<PromptAction> {
    let question = match current {
        Some(value) => format!("{field} [{value}] (Enter to keep, '-' to clear): "),
        None => format!("{field} (Enter to skip): "),
    };

    let Some(answer) = console.ask(&question)? else {
        return Ok(PromptAction::Keep);
    };
    if answer.is_empty() {
        Ok(PromptAction::Keep)
    } else if answer == "-" {
        Ok(PromptAction::Clear)
    } else {
        Ok(PromptAction::Set(answer))
    }
}

fn display_value<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(ToString::to_string)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    let chars: Vec<char> = value.as_deref().unwrap_or_default().chars().collect();
    match value {
        Some(_) if chars.len() > 6 => {
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

enum PromptAction {
    Keep,
    Clear,
    Set(String),
}
