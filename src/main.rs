#![recursion_limit = "256"]

mod cli;
mod application;
mod domain;
mod data;
mod ml;
mod infra;

use anyhow::Result;
use cli::Cli;
use clap::Parser;

/// Default filter: info and above for this crate's own targets
const DEFAULT_LOG_DIRECTIVE: &str = concat!(env!("CARGO_CRATE_NAME"), "=info");

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(DEFAULT_LOG_DIRECTIVE.parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_matches_event_targets() {
        let target = DEFAULT_LOG_DIRECTIVE.trim_end_matches("=info");
        assert_eq!(target, "urdu_plag");
        assert_eq!(module_path!().split("::").next(), Some(target));
        assert!(DEFAULT_LOG_DIRECTIVE.parse::<tracing_subscriber::filter::Directive>().is_ok());
    }
}
