use std::io::{self, Read, Write};

use clap::Parser;

use tidemark::renderer::HtmlRenderer;
use tidemark::{Options, parse_document_bytes};

/// Convert CommonMark to HTML
#[derive(Parser)]
#[command(name = "tidemark", version, about)]
struct Cli {
    /// Files to process; stdin when none are given
    files: Vec<std::path::PathBuf>,

    /// Omit raw HTML and empty out unsafe link destinations
    #[arg(long)]
    safe: bool,

    /// Use typographic quotes, dashes, and ellipses
    #[arg(long)]
    smart: bool,

    /// Attach data-sourcepos attributes to block elements
    #[arg(long)]
    sourcepos: bool,

    /// Render soft breaks as <br />
    #[arg(long)]
    hardbreaks: bool,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let options = Options {
        smart: cli.smart,
        safe: cli.safe,
        sourcepos: cli.sourcepos,
        hardbreaks: cli.hardbreaks,
    };

    let mut input = Vec::new();
    if cli.files.is_empty() {
        io::stdin().read_to_end(&mut input)?;
    } else {
        for path in &cli.files {
            input.extend(std::fs::read(path)?);
        }
    }

    let tree = parse_document_bytes(&input, options);
    let html = HtmlRenderer::with_options(options).render(&tree);
    io::stdout().write_all(html.as_bytes())?;
    Ok(())
}
