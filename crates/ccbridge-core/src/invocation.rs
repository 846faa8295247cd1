//! Argument construction for the wrapped executable.
//!
//! Layout of a built vector:
//!
//! ```text
//! <program> [--model <name>] --print [--output-format <fmt>] [<prompt>]
//! ```
//!
//! The prompt is passed verbatim. Quoting is never needed because the vector
//! is handed to the process spawner element by element, not through a shell.

use crate::types::{ArgumentVector, InvocationSpec, OutputFormat};

/// Flag selecting the model.
pub const MODEL_FLAG: &str = "--model";

/// Flag for non-interactive (print) execution.
pub const PRINT_FLAG: &str = "--print";

/// Flag selecting the output format.
pub const OUTPUT_FORMAT_FLAG: &str = "--output-format";

/// Flag used by the liveness check.
pub const HELP_FLAG: &str = "--help";

/// Build the argument vector for one invocation of `program`.
pub fn build_arguments(program: &str, spec: &InvocationSpec) -> ArgumentVector {
    let mut args = vec![program.to_string()];

    if let Some(model) = spec.model.as_deref().filter(|m| !m.is_empty()) {
        args.push(MODEL_FLAG.to_string());
        args.push(model.to_string());
    }

    args.push(PRINT_FLAG.to_string());

    if spec.output_format != OutputFormat::Text {
        args.push(OUTPUT_FORMAT_FLAG.to_string());
        args.push(spec.output_format.as_str().to_string());
    }

    if let Some(prompt) = spec.prompt.as_deref().filter(|p| !p.is_empty()) {
        args.push(prompt.to_string());
    }

    ArgumentVector::new(args)
}

/// Build the fixed liveness-check vector: `<program> --help`.
pub fn help_arguments(program: &str) -> ArgumentVector {
    ArgumentVector::new(vec![program.to_string(), HELP_FLAG.to_string()])
}
