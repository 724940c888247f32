use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;
use twindiff::cli::{Cli, Commands, FilterAction};
use twindiff::{AppContext, commands, output};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "Error:".red().bold());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.quiet {
        output::set_verbosity(output::Verbosity::Quiet);
    } else if cli.verbose {
        output::set_verbosity(output::Verbosity::Verbose);
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("twindiff=debug")),
            )
            .with_writer(io::stderr)
            .init();
    }

    match cli.command {
        Commands::Files { a, b, mode } => {
            let mut ctx = AppContext::new()?;
            commands::compare::execute_files(&mut ctx, &a, &b, mode)?;
        }
        Commands::Text { a, b, mode } => {
            let ctx = AppContext::new()?;
            commands::compare::execute_text(&ctx, &a, &b, mode)?;
        }
        Commands::Config {
            key,
            value,
            unset,
            list,
        } => {
            let mut ctx = AppContext::new()?;
            commands::config::execute(&mut ctx, key.as_deref(), value, unset, list)?;
        }
        Commands::Filter { action } => {
            let mut ctx = AppContext::new()?;
            match action {
                FilterAction::Add { filter } => commands::filter::add(&mut ctx, &filter)?,
                FilterAction::List => commands::filter::list(&ctx)?,
            }
        }
        Commands::Completion { shell } => {
            print_completions(shell, &mut Cli::command());
        }
    }

    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
