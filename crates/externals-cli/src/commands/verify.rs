//! `externals verify`: validate a code's trailing check character.

use serde::Serialize;
use tracing::instrument;

use externals_adapters::LuhnCheckDigit;
use externals_core::application::ports::CheckDigitCalculator;

use crate::{
    cli::{OutputFormat, VerifyArgs},
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct Verdict<'a> {
    code: &'a str,
    valid: bool,
}

#[instrument(skip_all)]
pub fn execute(args: VerifyArgs, output: OutputManager) -> CliResult<()> {
    let code = normalize(&args.code);
    let valid = LuhnCheckDigit::for_unique_values()?.verify(&code)?;

    if output.format() == OutputFormat::Json {
        output.json(&Verdict { code: &code, valid })?;
    } else if valid {
        output.success(&format!("{code} is valid"))?;
    }

    if valid {
        Ok(())
    } else {
        Err(CliError::InvalidCode { code })
    }
}

/// Codes are printed in upper case; accept what users type back.
fn normalize(input: &str) -> String {
    input.trim().to_uppercase()
}
