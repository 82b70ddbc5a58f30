//! headstamp - provenance headers injected at commit time.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use headstamp::cli::{self, Cli, Commands};
use headstamp::config::Config;
use headstamp::git::GitCli;
use headstamp::orchestrator::{EXIT_FAILED, EXIT_PASS_THROUGH};
use headstamp::Error;

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "headstamp failed");
            eprintln!("headstamp: {}", e);
            EXIT_FAILED
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32, Error> {
    let cwd = std::env::current_dir()?;
    // Outside a repository only `stamp` can still run; a missing git binary is fatal.
    let repo = match GitCli::discover(&cwd) {
        Ok(git) => Some(git),
        Err(Error::NotARepository(_)) => None,
        Err(e) => return Err(e),
    };
    let root = repo
        .as_ref()
        .map(|git| git.root().to_path_buf())
        .unwrap_or_else(|| cwd.clone());
    let config = Config::load(&root)?;

    init_logging(&config.log_level);

    match cli.command {
        Commands::CommitMsg { message_file } => cli::commit_msg::run(&root, &config, &message_file),
        Commands::Install => {
            let git = repo.ok_or_else(|| Error::NotARepository(cwd.clone()))?;
            cli::hooks::install_hook(&git.hooks_dir()?)?;
            println!("commit-msg hook installed.");
            Ok(EXIT_PASS_THROUGH)
        }
        Commands::Uninstall => {
            let git = repo.ok_or_else(|| Error::NotARepository(cwd.clone()))?;
            if cli::hooks::uninstall_hook(&git.hooks_dir()?)? {
                println!("commit-msg hook removed.");
            } else {
                println!("No headstamp hook found.");
            }
            Ok(EXIT_PASS_THROUGH)
        }
        Commands::Stamp { files, message } => {
            cli::stamp::run(&cwd, &config, &files, &message)?;
            Ok(EXIT_PASS_THROUGH)
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("headstamp={level}")));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
