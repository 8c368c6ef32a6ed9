//! docstitch CLI — small document utilities.
//!
//! Stitches a tree of Markdown files into one document and renders HTML
//! to PDF through `wkhtmltopdf`.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
