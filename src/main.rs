use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use wp_lang_tools::completion::{build_catalog_for_tag, CompletionRequest, CompletionSource};
use wp_lang_tools::editor::Highlighter;
use wp_lang_tools::format::format_source;
use wp_lang_tools::language::{EditorLanguage, Language, Locale};
use wp_lang_tools::lexer::{Token, TokenCategory};
use wp_lang_tools::logging::init_logger;
use wp_lang_tools::metrics::metrics;

#[derive(Parser)]
#[command(name = "wp-lang-tools", version, about = "Highlighting and completion for WPL and OML")]
struct Cli {
    /// Disable ANSI colors in log output
    #[arg(long)]
    no_color: bool,

    /// Log level (otherwise RUST_LOG, default "info")
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token stream of a file
    Tokenize {
        file: PathBuf,
        /// wpl, oml, json or plain
        #[arg(short, long, default_value = "wpl")]
        language: EditorLanguage,
        /// Emit JSON instead of one token per line
        #[arg(long)]
        json: bool,
        /// Include unstyled tokens
        #[arg(long)]
        all: bool,
    },
    /// Print the completion result for a cursor position as JSON
    Complete {
        file: PathBuf,
        /// Cursor position as a char offset
        #[arg(long)]
        offset: usize,
        /// Force a result even with no identifier before the cursor
        #[arg(long)]
        explicit: bool,
        #[arg(short, long, default_value = "wpl")]
        language: Language,
        #[arg(long, default_value = "zh-CN")]
        locale: String,
    },
    /// Print a WPL or OML file reformatted
    Format {
        file: PathBuf,
        #[arg(short, long, default_value = "wpl")]
        language: Language,
    },
    /// Print a completion catalog as JSON
    Catalog {
        #[arg(short, long, default_value = "wpl")]
        language: Language,
        #[arg(long, default_value = "zh-CN")]
        locale: String,
    },
}

#[derive(Serialize)]
struct TokenView<'a> {
    start: usize,
    end: usize,
    category: TokenCategory,
    text: &'a str,
}

fn tokenize(file: &Path, language: EditorLanguage, json: bool, all: bool) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let tokens: Vec<Token> = Highlighter::for_language(language)
        .tokenize(&text)
        .into_iter()
        .filter(|token| all || token.category.is_styled())
        .collect();

    if json {
        let views: Vec<TokenView> = tokens
            .iter()
            .map(|token| TokenView {
                start: token.start,
                end: token.end,
                category: token.category,
                text: token.text(&text),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
    } else {
        for token in &tokens {
            println!("{}..{}\t{}\t{:?}", token.start, token.end, token.category, token.text(&text));
        }
    }
    Ok(())
}

fn complete(file: &Path, offset: usize, explicit: bool, language: Language, locale: &str) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let Some((byte, _)) = text.char_indices().chain([(text.len(), ' ')]).nth(offset) else {
        bail!("offset {} is past the end of {}", offset, file.display());
    };

    let source = CompletionSource::new(language, Locale::resolve(locale));
    let request = CompletionRequest::new(&text[..byte], explicit);
    match source.respond(&request) {
        Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
        None => println!("null"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.no_color, cli.log_level.as_deref()).context("failed to initialize logging")?;
    debug!("wp-lang-tools {}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Command::Tokenize { file, language, json, all } => tokenize(file, *language, *json, *all)?,
        Command::Complete { file, offset, explicit, language, locale } => {
            complete(file, *offset, *explicit, *language, locale)?
        }
        Command::Format { file, language } => {
            let text = fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
            print!("{}", format_source(*language, &text));
        }
        Command::Catalog { language, locale } => {
            let catalog = build_catalog_for_tag(*language, locale);
            info!("{} catalog for {}: {} items", language, catalog.locale(), catalog.len());
            println!("{}", serde_json::to_string_pretty(&catalog.items()[..])?);
        }
    }

    debug!("metrics: {:?}", metrics().snapshot());
    Ok(())
}
