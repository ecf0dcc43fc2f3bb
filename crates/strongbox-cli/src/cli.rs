use clap::{Args, Parser, Subcommand};

use strongbox_core::VERSION;

/// Strongbox - a zero-knowledge, CLI-first password vault
#[derive(Parser)]
#[command(name = "strongbox")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault file
    #[arg(short, long, global = true, env = "STRONGBOX_PATH")]
    pub vault: Option<String>,

    /// Account email identifying the vault
    #[arg(short, long, global = true, env = "STRONGBOX_EMAIL")]
    pub email: Option<String>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_input: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new vault identity
    Init(InitArgs),

    /// Add a record
    Add(AddArgs),

    /// List records
    List(ListArgs),

    /// Show a record
    Show(ShowArgs),

    /// Change a record's secret fields
    Edit(EditArgs),

    /// Mark or unmark a record as favorite
    Favorite(FavoriteArgs),

    /// Delete a record
    Delete(DeleteArgs),

    /// Analyze password health
    Audit(AuditArgs),

    /// Generate a random password
    Generate(GenerateArgs),

    /// Interactive session with auto-lock
    Shell,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the vault file will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `add` command
#[derive(Args, Clone)]
pub struct AddArgs {
    /// Display name
    #[arg(value_name = "NAME")]
    pub name: String,

    #[arg(short, long)]
    pub username: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Category (login, secure_note, api_key, other)
    #[arg(short, long, default_value = "login")]
    pub category: String,

    /// Mark as favorite
    #[arg(long)]
    pub favorite: bool,

    /// Read the password from the first line of stdin
    #[arg(long, conflicts_with = "generate")]
    pub password_stdin: bool,

    /// Generate a password instead of prompting
    #[arg(short, long)]
    pub generate: bool,

    /// Length of a generated password
    #[arg(long, default_value_t = 20, requires = "generate")]
    pub length: usize,
}

/// Arguments for the `list` command
#[derive(Args, Clone)]
pub struct ListArgs {
    /// Only records whose name contains this text
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Filter by category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only favorites
    #[arg(long)]
    pub favorites: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command
#[derive(Args, Clone)]
pub struct ShowArgs {
    /// Record ID (full UUID or prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Print the password instead of masking it
    #[arg(long)]
    pub reveal: bool,

    /// Output as JSON (always includes the password)
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `edit` command
#[derive(Args, Clone)]
pub struct EditArgs {
    /// Record ID (full UUID or prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub username: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// New category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Read a new password from the first line of stdin
    #[arg(long, conflicts_with = "generate")]
    pub password_stdin: bool,

    /// Replace the password with a generated one
    #[arg(short, long)]
    pub generate: bool,

    /// Length of a generated password
    #[arg(long, default_value_t = 20, requires = "generate")]
    pub length: usize,
}

/// Arguments for the `favorite` command
#[derive(Args, Clone)]
pub struct FavoriteArgs {
    /// Record ID (full UUID or prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Remove the favorite mark
    #[arg(long)]
    pub off: bool,
}

/// Arguments for the `delete` command
#[derive(Args, Clone)]
pub struct DeleteArgs {
    /// Record ID (full UUID or prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `audit` command
#[derive(Args, Clone)]
pub struct AuditArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `generate` command
#[derive(Args, Clone)]
pub struct GenerateArgs {
    #[arg(short, long, default_value_t = 20)]
    pub length: usize,

    #[arg(long)]
    pub no_lowercase: bool,

    #[arg(long)]
    pub no_uppercase: bool,

    #[arg(long)]
    pub no_digits: bool,

    #[arg(long)]
    pub no_symbols: bool,

    /// Leave out look-alike characters (I, l, 1, O, 0, ...)
    #[arg(long)]
    pub exclude_ambiguous: bool,

    /// Also print the strength rating
    #[arg(long)]
    pub rate: bool,
}

/// Commands accepted inside `strongbox shell`.
#[derive(Parser)]
#[command(name = "shell", no_binary_name = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand)]
pub enum ShellCommand {
    Add(AddArgs),
    List(ListArgs),
    Show(ShowArgs),
    Edit(EditArgs),
    Favorite(FavoriteArgs),
    Delete(DeleteArgs),
    Audit(AuditArgs),
    Generate(GenerateArgs),
    /// Lock the vault now
    Lock,
    /// Unlock a locked vault
    Unlock,
    /// Show or change the auto-lock timeout ("off" disables it)
    Autolock {
        #[arg(value_name = "SECONDS|off")]
        value: Option<String>,
    },
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
        ShellLine::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "strongbox",
            "add",
            "GitHub",
            "--username",
            "me",
            "--generate",
            "--length",
            "32",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.name, "GitHub");
                assert_eq!(args.username.as_deref(), Some("me"));
                assert!(args.generate);
                assert_eq!(args.length, 32);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_shell_line() {
        let line = ShellLine::try_parse_from(["show", "abc", "--reveal"]).unwrap();
        assert!(matches!(line.command, ShellCommand::Show(ShowArgs { reveal: true, .. })));

        let line = ShellLine::try_parse_from(["autolock", "off"]).unwrap();
        assert!(matches!(line.command, ShellCommand::Autolock { value: Some(_) }));
    }
}
