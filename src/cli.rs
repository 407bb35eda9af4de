//! Command-line interface definitions for article_scrape.
//!
//! Every option that tunes retrieval can also come from the environment.
//! Flags override the optional YAML config file, which overrides defaults.

use article_scrape::config::Overrides;
use clap::Parser;

/// Default number of inputs processed at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Extract structured article content from medRxiv, PMC and ScienceDaily.
///
/// Prints one JSON envelope per input on stdout.
///
/// # Examples
///
/// ```sh
/// # One preprint and one bare PMC id
/// article_scrape https://www.medrxiv.org/content/10.1101/2021.01.01.000001 PMC4924471
///
/// # Through a rendering proxy, keeping a copy of every envelope
/// RENDER_PROXY_API_KEY=... article_scrape --render-proxy true -j ./out PMC4924471
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Article URLs or bare identifiers (e.g. PMC4924471)
    #[arg(required_unless_present = "list_sources")]
    pub inputs: Vec<String>,

    /// Also write each envelope under this directory
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// User-Agent header sent with every request
    #[arg(long, env = "SCRAPER_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "SCRAPER_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Route requests through the rendering proxy
    #[arg(long, env = "RENDER_PROXY_ENABLED")]
    pub render_proxy: Option<bool>,

    /// Rendering proxy endpoint
    #[arg(long, env = "RENDER_PROXY_ENDPOINT")]
    pub render_proxy_endpoint: Option<String>,

    /// Rendering proxy API key
    #[arg(long, env = "RENDER_PROXY_API_KEY", hide_env_values = true)]
    pub render_proxy_api_key: Option<String>,

    /// Number of inputs processed concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, value_parser = clap::value_parser!(usize))]
    pub concurrency: usize,

    /// Print the supported sources and exit
    #[arg(long)]
    pub list_sources: bool,

    /// Pretty-print JSON on stdout
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// Config values given on the command line or in the environment.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            user_agent: self.user_agent.clone(),
            timeout_secs: self.timeout_secs,
            render_proxy_enabled: self.render_proxy,
            render_proxy_endpoint: self.render_proxy_endpoint.clone(),
            render_proxy_api_key: self.render_proxy_api_key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "article_scrape",
            "--json-output-dir",
            "./json",
            "https://www.medrxiv.org/content/10.1101/2021.01.01.000001",
            "PMC4924471",
        ]);

        assert_eq!(cli.json_output_dir.as_deref(), Some("./json"));
        assert_eq!(cli.inputs.len(), 2);
        assert_eq!(cli.concurrency, DEFAULT_CONCURRENCY);
        assert!(!cli.pretty);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["article_scrape", "-j", "/tmp/json", "-c", "cfg.yaml", "PMC1"]);

        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/json"));
        assert_eq!(cli.config.as_deref(), Some("cfg.yaml"));
    }

    #[test]
    fn test_list_sources_needs_no_inputs() {
        let cli = Cli::try_parse_from(["article_scrape", "--list-sources"]).unwrap();
        assert!(cli.list_sources);
        assert!(cli.inputs.is_empty());
    }

    #[test]
    fn test_inputs_required_otherwise() {
        assert!(Cli::try_parse_from(["article_scrape"]).is_err());
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = Cli::parse_from([
            "article_scrape",
            "--timeout-secs",
            "5",
            "--render-proxy",
            "true",
            "--render-proxy-api-key",
            "k",
            "PMC1",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.timeout_secs, Some(5));
        assert_eq!(overrides.render_proxy_enabled, Some(true));
        assert_eq!(overrides.render_proxy_api_key.as_deref(), Some("k"));
    }
}
