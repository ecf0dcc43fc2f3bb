//! Command handlers.
//!
//! Record handlers take an already-unlocked [`strongbox_core::RecordVault`]
//! so the one-shot commands and the interactive shell share them.

pub mod audit;
pub mod generate;
pub mod init;
pub mod records;
pub mod shell;

use crate::app::{open_vault, AppContext};
use crate::cli::Commands;

/// How a handler may talk to the user.
#[derive(Debug, Clone, Copy)]
pub struct Mode {
    pub quiet: bool,
    pub interactive: bool,
}

impl Mode {
    pub fn from_context(ctx: &AppContext<'_>) -> Self {
        Self {
            quiet: ctx.quiet(),
            interactive: ctx.interactive(),
        }
    }
}

/// Dispatch a top-level command.
pub fn run(ctx: &AppContext<'_>, command: &Commands) -> anyhow::Result<()> {
    let mode = Mode::from_context(ctx);
    match command {
        Commands::Init(args) => init::init(ctx, args),
        Commands::Generate(args) => generate::generate(args),
        Commands::Shell => shell::shell(ctx),
        Commands::Add(args) => records::add(&mut open_vault(ctx)?.vault, args, mode),
        Commands::List(args) => records::list(&open_vault(ctx)?.vault, args, mode),
        Commands::Show(args) => records::show(&open_vault(ctx)?.vault, args),
        Commands::Edit(args) => records::edit(&mut open_vault(ctx)?.vault, args, mode),
        Commands::Favorite(args) => records::favorite(&mut open_vault(ctx)?.vault, args, mode),
        Commands::Delete(args) => records::delete(&mut open_vault(ctx)?.vault, args, mode),
        Commands::Audit(args) => audit::audit(&open_vault(ctx)?.vault, args, mode),
    }
}
