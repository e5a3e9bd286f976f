//! quillpost - publish blog posts into a git-hosted site without touching git.

mod cli;
mod config;
mod content;
mod host;
mod logger;
mod publish;
mod settings;
mod utils;

use clap::{ColorChoice, Parser};
use cli::{AuthorCommand, Cli, Commands, Context, Outcome};
use logger::OutcomeLine;
use publish::Report;

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let result = run(&cli);
    let warned = matches!(result, Ok(Outcome::Warning(_)));
    let report = Report::from_result(&result.map_err(|err| format!("{err:#}")));

    let line = OutcomeLine::new();
    if !report.ok {
        line.error(&report.status, "");
        std::process::exit(1);
    } else if warned {
        line.warning(&report.status);
    } else {
        line.success(&report.status);
    }
}

fn run(cli: &Cli) -> anyhow::Result<Outcome> {
    if !matches!(cli.command, Commands::Check) {
        utils::git::ensure_git_available()?;
    }
    let mut ctx = Context::load(cli)?;

    match &cli.command {
        Commands::Check => cli::check_credentials(&mut ctx),
        Commands::Fork { fresh } => cli::prepare_fork(&ctx, *fresh),
        Commands::Author { action } => match action {
            AuthorCommand::New { name } => cli::new_author(&ctx, name),
            AuthorCommand::List => cli::list_authors(&ctx),
        },
        Commands::Article { title, author } => cli::new_article(&mut ctx, title, author.as_deref()),
        Commands::Branch { name } => cli::switch_branch(&ctx, name),
        Commands::Commit { message, paths } => cli::commit_changes(&ctx, message.as_deref(), paths),
        Commands::Push => cli::push_branch(&ctx),
    }
}
