use strongbox_core::analyzer::{classify_password, password_score};
use strongbox_core::generator::{generate_password, GeneratorOptions};

use crate::cli::GenerateArgs;
use crate::errors::CliError;

pub fn options(args: &GenerateArgs) -> GeneratorOptions {
    GeneratorOptions {
        length: args.length,
        lowercase: !args.no_lowercase,
        uppercase: !args.no_uppercase,
        digits: !args.no_digits,
        symbols: !args.no_symbols,
        exclude_ambiguous: args.exclude_ambiguous,
    }
}

/// Print a generated password on stdout; the rating goes to stderr.
pub fn generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let password = generate_password(&options(args))
        .map_err(|e| CliError::invalid_input(e.to_string()))?;
    println!("{}", password);
    if args.rate {
        eprintln!(
            "Strength: {} (score {})",
            classify_password(&password).as_str(),
            password_score(&password)
        );
    }
    Ok(())
}
