use std::path::PathBuf;

use clap::Parser;

use crate::tools::Tool;

/// Submit a document conversion job and follow it until it finishes.
#[derive(Debug, Parser)]
#[command(name = "documorph", version)]
pub struct Args {
    /// Conversion tool to run.
    #[arg(value_enum)]
    pub tool: Tool,

    /// Files to upload. Tools with a second upload slot take it last.
    pub files: Vec<PathBuf>,

    /// Server root URL.
    #[arg(long, env = "DOCUMORPH_SERVER", default_value = "http://127.0.0.1:5000")]
    pub server: String,

    /// Extra or overriding form field.
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Save the finished artifact into this directory.
    #[arg(long, value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    /// Do not draw the progress bar.
    #[arg(long, short)]
    pub quiet: bool,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long, short)]
    pub verbose: bool,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
