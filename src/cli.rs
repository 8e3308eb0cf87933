use std::path::PathBuf;

use clap::Parser;

/// Terminal back-office for REST content collections
#[derive(Debug, Parser)]
#[command(name = "deskboard", version, about)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, env = "DESKBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the content API, e.g. `http://localhost:5000/api`
    #[arg(long)]
    pub base_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long)]
    pub token: Option<String>,

    /// Browse seeded in-memory collections instead of a live API
    #[arg(long)]
    pub demo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "deskboard",
            "--base-url",
            "http://api.test/v1",
            "--token",
            "secret",
            "--demo",
        ]);
        assert_eq!(cli.base_url.as_deref(), Some("http://api.test/v1"));
        assert_eq!(cli.token.as_deref(), Some("secret"));
        assert!(cli.demo);
    }

    #[test]
    fn test_command_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
