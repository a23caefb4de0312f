use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use bookfinder::{
    parse_selection, BookSearch, Config, ResultSet, SearchOutcome, SearchResult, Session, Topic,
};
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bookfinder")]
#[command(about = "Search the web for PDF copies of books and download the ones you pick")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for one or more books and review the matches
    Search {
        /// Book names, comma-separated
        books: String,

        /// Category label recorded with the request
        #[arg(short = 't', long = "topic", value_enum, default_value_t = Topic::Science)]
        topic: Topic,

        /// Entries to download from every result list: "all", "none", or e.g. "1,3-4"
        #[arg(short = 's', long = "select")]
        select: Option<String>,

        /// Save every result of each list to <book>/<book>_results.txt
        #[arg(long = "save")]
        save: bool,

        /// Never prompt, even when stdin is a terminal
        #[arg(long = "no-prompt")]
        no_prompt: bool,

        /// Print result lists as JSON instead of text
        #[arg(long = "json")]
        json: bool,

        /// Folder that receives one directory per book
        #[arg(short = 'o', long = "outDir")]
        out_dir: Option<PathBuf>,

        /// HTML search endpoint
        #[arg(long = "endpoint")]
        endpoint: Option<String>,

        /// Request timeout in seconds (0 disables)
        #[arg(long = "timeout", value_parser = parse_timeout)]
        timeout: Option<f64>,

        /// TOML config file
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
    },
    /// List the accepted topic values
    Topics,
}

fn parse_timeout(s: &str) -> Result<f64, String> {
    let value = s.parse::<f64>().map_err(|_| "Not a number.")?;
    if !value.is_finite() {
        return Err("Must be a finite number.".to_string());
    }
    if value < 0.0 {
        return Err("Must be zero or positive number.".to_string());
    }
    Ok(value)
}

/// What the user asked to happen to each result list.
struct Actions {
    select: Option<String>,
    save: bool,
    interactive: bool,
}

#[derive(Serialize)]
struct JsonBook<'a> {
    book_name: &'a str,
    topic: Topic,
    results: &'a [SearchResult],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

type Prompt = Lines<BufReader<Stdin>>;

async fn run_search(session: &Session, topic: Topic, books: &str, actions: Actions) -> Result<()> {
    let searches = session.search_books(topic, books).await;
    if searches.is_empty() {
        println!("{}", "No book names given.".yellow());
        return Ok(());
    }

    let mut prompt = actions
        .interactive
        .then(|| BufReader::new(tokio::io::stdin()).lines());

    for BookSearch { request, outcome } in searches {
        let mut set = match outcome {
            SearchOutcome::Found(set) => set,
            SearchOutcome::NoResults => {
                println!("No books found for '{}'.", request.book_name);
                continue;
            }
            SearchOutcome::Failed(e) => {
                println!("{}", format!("Search failed: {}", e).red());
                println!("No books found for '{}'.", request.book_name);
                continue;
            }
        };

        print_checklist(&set);

        if let Some(prompt) = prompt.as_mut() {
            review_interactively(session, &mut set, prompt).await?;
            continue;
        }

        if let Some(spec) = actions.select.as_deref() {
            match set.apply_selection(spec) {
                Ok(()) => download_selected(session, &set).await,
                Err(e) => println!("{}", format!("{}: {}", set.title(), e).red()),
            }
        }
        if actions.save {
            save_results(session, &set).await;
        }
    }

    Ok(())
}

fn print_checklist(set: &ResultSet) {
    println!();
    println!("{}", set.title().bold());
    for (i, result) in set.results().iter().enumerate() {
        let mark = if set.is_checked(i) { "[x]" } else { "[ ]" };
        println!("  {} {:>2}. {}", mark, i + 1, result.title);
    }
}

async fn review_interactively(session: &Session, set: &mut ResultSet, prompt: &mut Prompt) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    loop {
        stdout
            .write_all(b"Toggle (e.g. 1,3-4), [a]ll, [n]one, [d]ownload selected, [s]ave results, [q] next: ")
            .await?;
        stdout.flush().await?;

        let Some(line) = prompt.next_line().await.context("Failed to read from stdin")? else {
            return Ok(());
        };

        match line.trim().to_ascii_lowercase().as_str() {
            "q" => return Ok(()),
            "" => {}
            "a" => set.check_all(),
            "n" => set.clear(),
            "d" => download_selected(session, set).await,
            "s" => save_results(session, set).await,
            other => match parse_selection(other, set.len()) {
                Ok(indices) => indices.into_iter().for_each(|i| set.toggle(i)),
                Err(e) => {
                    println!("{}", e.to_string().red());
                    continue;
                }
            },
        }

        print_checklist(set);
    }
}

async fn download_selected(session: &Session, set: &ResultSet) {
    let report = session.download_selected(set).await;
    for (title, e) in report.failures() {
        println!("{}", format!("Failed to download {}: {}", title, e).red());
    }
    for path in report.saved() {
        println!("  {}", path.display().to_string().blue());
    }
    println!("{}", "Selected books downloaded!".green());
}

async fn save_results(session: &Session, set: &ResultSet) {
    match session.save_results(set).await {
        Ok(path) => println!("{}", format!("Results saved to {}", path.display()).green()),
        Err(e) => println!("{}", format!("Error: {}", e).red()),
    }
}

async fn print_json(session: &Session, topic: Topic, books: &str) -> Result<()> {
    let searches = session.search_books(topic, books).await;
    let books: Vec<JsonBook> = searches
        .iter()
        .map(|search| JsonBook {
            book_name: &search.request.book_name,
            topic: search.request.topic,
            results: search
                .outcome
                .result_set()
                .map(ResultSet::results)
                .unwrap_or_default(),
            error: match &search.outcome {
                SearchOutcome::Failed(e) => Some(e.to_string()),
                _ => None,
            },
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&books)?);
    Ok(())
}

fn build_config(
    config: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    endpoint: Option<String>,
    timeout: Option<f64>,
) -> Result<Config> {
    let mut config = Config::load_or_default(config.as_deref())?;
    if let Some(out_dir) = out_dir {
        config.output_dir = out_dir;
    }
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }
    if timeout.is_some() {
        config.timeout_secs = timeout;
    }
    config.validate()?;
    Ok(config)
}

#[allow(clippy::too_many_arguments)]
async fn search_command(
    config: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    endpoint: Option<String>,
    timeout: Option<f64>,
    topic: Topic,
    books: &str,
    json: bool,
    actions: Actions,
) -> Result<()> {
    let config = build_config(config, out_dir, endpoint, timeout)?;
    let session = Session::new(config)?;
    if json {
        return print_json(&session, topic, books).await;
    }
    run_search(&session, topic, books, actions).await
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bookfinder=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args = Args::parse();

    let result = match args.command {
        Commands::Search {
            books,
            topic,
            select,
            save,
            no_prompt,
            json,
            out_dir,
            endpoint,
            timeout,
            config,
        } => {
            let actions = Actions {
                interactive: !no_prompt
                    && select.is_none()
                    && !save
                    && std::io::stdin().is_terminal(),
                select,
                save,
            };
            search_command(config, out_dir, endpoint, timeout, topic, &books, json, actions).await
        }
        Commands::Topics => {
            for topic in Topic::ALL {
                println!("{}", topic);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {}", e).red());
        process::exit(1);
    }
}
