use anyhow::{Context, Result};
use clap::Parser;
use searchsnip::config::{DEFAULT_API_URL, SearchConfig, SearchType};
use searchsnip::http::MAX_RETRIES;
use searchsnip::runtime::{RealRuntime, Runtime};
use searchsnip::search::{SearchClient, SearchOverrides, SnippetResult};
use serde_json::Value;
use std::time::Duration;

/// searchsnip - web search snippets from the command line
///
/// Sends the query to a Serper-compatible search API and prints the most
/// useful text snippets plus a source link.
///
/// The API key is read from the SERPER_API_KEY environment variable.
///
/// Examples:
///   searchsnip what is the price of a dell xps laptop
///   searchsnip --type news -k 5 rust 2024 edition
#[derive(Parser, Debug)]
#[command(author, version = env!("SEARCHSNIP_VERSION"), about)]
struct Cli {
    /// Search query; multiple words are joined with spaces
    #[arg(value_name = "QUERY", required = true)]
    query: Vec<String>,

    /// Result category: search, news, places, or images
    #[arg(long = "type", short = 't', value_name = "TYPE", default_value = "search")]
    search_type: SearchType,

    /// Number of results to request and read
    #[arg(long = "num", short = 'k', value_name = "N", default_value_t = 1)]
    num: usize,

    /// Region code
    #[arg(long, env = "SEARCHSNIP_GL", default_value = "us")]
    gl: String,

    /// Language code
    #[arg(long, env = "SEARCHSNIP_HL", default_value = "en")]
    hl: String,

    /// Time-range filter (e.g. qdr:d for the past day)
    #[arg(long)]
    tbs: Option<String>,

    /// Search API base URL
    #[arg(long = "api-url", env = "SEARCHSNIP_API_URL", value_name = "URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Give up after this many failed attempts
    #[arg(long = "max-attempts", value_name = "N", default_value_t = MAX_RETRIES)]
    max_attempts: usize,

    /// Do not verify TLS certificates (unsafe)
    #[arg(long)]
    insecure: bool,

    /// Extra request parameter; VALUE is parsed as JSON, falling back to a string
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, Value)>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn parse_param(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{}'", s));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
    Ok((key.to_string(), value))
}

fn render(result: &SnippetResult, json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(result).context("Failed to serialize result")?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    for snippet in &result.snippets {
        out.push_str(snippet);
        out.push('\n');
    }
    if let Some(link) = &result.link {
        out.push_str(&format!("Link: {}\n", link));
    }
    Ok(out)
}

async fn run<R: Runtime + 'static>(cli: Cli, runtime: R) -> Result<()> {
    let config = SearchConfig::from_env(&runtime)
        .search_type(cli.search_type)
        .k(cli.num)
        .gl(cli.gl)
        .hl(cli.hl)
        .tbs(cli.tbs)
        .api_url(cli.api_url)
        .timeout(Duration::from_secs(cli.timeout))
        .accept_invalid_certs(cli.insecure)
        .max_attempts(cli.max_attempts)
        .build();

    let client = SearchClient::with_runtime(config, runtime)?;
    let overrides = SearchOverrides {
        extra: cli.params.into_iter().collect(),
        ..SearchOverrides::default()
    };

    let query = cli.query.join(" ");
    let result = client
        .run_with(&query, &overrides)
        .await
        .with_context(|| format!("Search for {:?} failed", query))?;

    print!("{}", render(&result, cli.json)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    run(cli, RealRuntime).await
}
