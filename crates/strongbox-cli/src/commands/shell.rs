//! Interactive session with the auto-lock timer running.
//!
//! The vault is unlocked once at startup. Every command resets the
//! inactivity countdown; when it expires the session key is dropped and
//! vault commands require `unlock` before they run again.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use secrecy::SecretString;
use strongbox_core::crypto::{AuthHash, Salt};
use strongbox_core::storage::{JsonFileStore, VaultIdentity};
use strongbox_core::{AutoLockTimer, RecordVault, VaultSession};
use tokio::runtime::Runtime;

use crate::app::{open_vault, AppContext, OpenVault};
use crate::cli::{ShellCommand, ShellLine};
use crate::errors::CliError;

use super::{audit, generate, records, Mode};

const PROMPT: &str = "strongbox> ";

enum Flow {
    Continue,
    Exit,
}

struct Shell {
    runtime: Runtime,
    vault: RecordVault<JsonFileStore>,
    identity: VaultIdentity,
    timer: AutoLockTimer,
    mode: Mode,
}

pub fn shell(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    let runtime = Runtime::new()?;
    let OpenVault { vault, identity } = open_vault(ctx)?;
    let timer = AutoLockTimer::for_session(
        vault.session(),
        runtime.handle().clone(),
        ctx.config().security.auto_lock(),
    );
    timer.arm();

    let mut shell = Shell {
        runtime,
        vault,
        identity,
        timer,
        mode: Mode::from_context(ctx),
    };
    if !ctx.quiet() {
        println!("Vault unlocked. Type `help` for commands, `exit` to leave.");
    }
    let result = shell.run();

    shell.timer.disarm();
    shell.vault.session().logout();
    result
}

impl Shell {
    fn run(&mut self) -> anyhow::Result<()> {
        loop {
            if self.mode.interactive {
                print!("{}", PROMPT);
                std::io::stdout().flush()?;
            }
            let mut line = String::new();
            if std::io::stdin().read_line(&mut line)? == 0 {
                return Ok(());
            }
            let words = match split_words(&line) {
                Ok(words) if words.is_empty() => continue,
                Ok(words) => words,
                Err(message) => {
                    eprintln!("Error: {}", message);
                    continue;
                }
            };
            let parsed = match ShellLine::try_parse_from(words) {
                Ok(parsed) => parsed,
                Err(err) => {
                    err.print()?;
                    continue;
                }
            };

            match self.execute(parsed.command) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(err) => eprintln!("Error: {}", err),
            }
        }
    }

    fn execute(&mut self, command: ShellCommand) -> anyhow::Result<Flow> {
        let needs_vault = !matches!(
            command,
            ShellCommand::Lock
                | ShellCommand::Unlock
                | ShellCommand::Autolock { .. }
                | ShellCommand::Generate(_)
                | ShellCommand::Exit
        );
        if needs_vault && !self.vault.session().is_unlocked() {
            println!("Vault is locked.");
            self.unlock()?;
        }
        self.timer.record_activity();

        let mode = self.mode;
        match command {
            ShellCommand::Add(args) => records::add(&mut self.vault, &args, mode)?,
            ShellCommand::List(args) => records::list(&self.vault, &args, mode)?,
            ShellCommand::Show(args) => records::show(&self.vault, &args)?,
            ShellCommand::Edit(args) => records::edit(&mut self.vault, &args, mode)?,
            ShellCommand::Favorite(args) => records::favorite(&mut self.vault, &args, mode)?,
            ShellCommand::Delete(args) => records::delete(&mut self.vault, &args, mode)?,
            ShellCommand::Audit(args) => audit::audit(&self.vault, &args, mode)?,
            ShellCommand::Generate(args) => generate::generate(&args)?,
            ShellCommand::Lock => {
                self.timer.lock_now();
                println!("Vault locked.");
            }
            ShellCommand::Unlock => {
                if self.vault.session().is_unlocked() {
                    println!("Vault is already unlocked.");
                } else {
                    self.unlock()?;
                }
            }
            ShellCommand::Autolock { value } => self.autolock(value.as_deref())?,
            ShellCommand::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    /// Prompt once and derive the key on the blocking pool.
    fn unlock(&mut self) -> anyhow::Result<()> {
        let password = prompt_password(self.mode.interactive)?;
        let salt = Salt::from_base64(&self.identity.salt)
            .map_err(|e| CliError::auth_failed(e.unlock_failure_message()))?;
        let auth_hash = AuthHash::from_base64(&self.identity.auth_hash)
            .map_err(|e| CliError::auth_failed(e.unlock_failure_message()))?;
        let session: &VaultSession = self.vault.session();
        let unlocked = self
            .runtime
            .block_on(session.unlock_async(password, salt, auth_hash))
            .map_err(|e| CliError::auth_failed(e.unlock_failure_message()))?;
        if !unlocked {
            return Err(CliError::auth_failed("Invalid master password").into());
        }
        self.timer.arm();
        println!("Vault unlocked.");
        Ok(())
    }

    fn autolock(&self, value: Option<&str>) -> anyhow::Result<()> {
        match value {
            None => {
                if !self.timer.is_enabled() {
                    println!("Auto-lock: off");
                } else {
                    match self.timer.remaining() {
                        Some(left) => println!("Auto-lock: on, locks in {}s", left.as_secs()),
                        None => println!("Auto-lock: on, not running"),
                    }
                }
            }
            Some("off") => {
                self.timer.set_enabled(false);
                println!("Auto-lock disabled.");
            }
            Some(seconds) => {
                let seconds: u64 = seconds
                    .parse()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| {
                        CliError::invalid_input(format!(
                            "Invalid timeout: {} (use a number of seconds or \"off\")",
                            seconds
                        ))
                    })?;
                self.timer.set_timeout(Duration::from_secs(seconds));
                self.timer.set_enabled(true);
                println!("Auto-lock after {}s of inactivity.", seconds);
            }
        }
        Ok(())
    }
}

fn prompt_password(interactive: bool) -> anyhow::Result<SecretString> {
    if !interactive {
        return Err(CliError::vault_locked().into());
    }
    dialoguer::Password::new()
        .with_prompt("Master password")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read master password: {}", e))
}

/// Split a command line into words, honoring single and double quotes.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quote.is_some() {
        return Err("Unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        assert_eq!(
            split_words("add \"Work Mail\" --username 'a b'\n").unwrap(),
            vec!["add", "Work Mail", "--username", "a b"]
        );
        assert_eq!(split_words("   \n").unwrap(), Vec::<String>::new());
        assert_eq!(split_words("edit x --url \"\"").unwrap(), vec!["edit", "x", "--url", ""]);
        assert!(split_words("show \"oops").is_err());
    }
}
