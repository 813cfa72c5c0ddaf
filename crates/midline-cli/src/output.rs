//! Output formatting utilities for the CLI.

use nalgebra::{Point3, Vector3};
use serde::Serialize;

use crate::OutputFormat;

/// Print a serializable report as pretty JSON; text mode is left to the caller.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }

    if format == OutputFormat::Json {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!("Failed to serialize output: {}", e),
        }
    }
}

/// Print a success message.
pub fn success(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format == OutputFormat::Json {
        return;
    }
    use colored::Colorize;
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an info message.
pub fn info(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format == OutputFormat::Json {
        return;
    }
    println!("{}", msg);
}

/// Print a warning message to stderr.
pub fn warning(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format == OutputFormat::Json {
        return;
    }
    use colored::Colorize;
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

/// Plain coordinate array for JSON output.
pub fn point(p: &Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}

/// Plain component array for JSON output.
pub fn vector(v: &Vector3<f64>) -> [f64; 3] {
    [v.x, v.y, v.z]
}

/// `(x, y, z)` with three decimals.
pub fn fmt_point(p: &Point3<f64>) -> String {
    format!("({:.3}, {:.3}, {:.3})", p.x, p.y, p.z)
}
