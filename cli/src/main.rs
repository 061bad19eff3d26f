mod commands;
mod config;
mod logging;
mod output;
mod render;

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Render, validate and exercise page-hooks configurations from the command line"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Render a TOML page configuration into the `<script>` element embedded in a page.
    Render {
        /// TOML file describing the page bindings.
        config: PathBuf,

        /// Write the snippet to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Emit only the JSON document, without the surrounding `<script>` element.
        #[arg(long)]
        json: bool,
    },

    /// Validate a TOML page configuration and list the bindings it would register.
    Check {
        config: PathBuf,
    },

    /// Upload files the way the paste and drop bindings do.
    Upload {
        /// URL of the page the files are attached to; must carry the session token.
        #[arg(long, env = "PAGE_HOOKS_PAGE_URL")]
        page_url: Url,

        /// Read upload settings from this TOML page configuration.
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Ask the server to open a link externally, the way intercepted anchor clicks do.
    OpenLink {
        /// Origin of the note server.
        #[arg(long, env = "PAGE_HOOKS_BASE_URL")]
        base_url: Url,

        /// Read the open-external-link endpoint from this TOML page configuration.
        #[arg(long)]
        config: Option<PathBuf>,

        destination: String,
    },
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        CliCommand::Render {
            config,
            output,
            json,
        } => commands::render(&config, output.as_deref(), json),
        CliCommand::Check { config } => commands::check(&config),
        CliCommand::Upload {
            page_url,
            config,
            files,
        } => commands::upload(page_url, config.as_deref(), &files).await,
        CliCommand::OpenLink {
            base_url,
            config,
            destination,
        } => commands::open_link(&base_url, config.as_deref(), &destination).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn upload_requires_files() {
        let err = Cli::try_parse_from(["page-hooks", "upload", "--page-url", "http://x/"])
            .expect_err("files are required");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_render_flags() {
        let cli = Cli::try_parse_from(["page-hooks", "render", "page.toml", "-o", "out.html"])
            .expect("parse");
        let CliCommand::Render {
            config,
            output,
            json,
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!(config, PathBuf::from("page.toml"));
        assert_eq!(output, Some(PathBuf::from("out.html")));
        assert!(!json);
    }
}
