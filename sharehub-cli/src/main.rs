use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use sharehub_notify::{PipelineError, RegistrationStore, build_digest, run_weekly};

mod config;
mod context;
mod hub_cmd;
mod schedule;
mod server;
mod state;

use context::AppContext;
use hub_cmd::{HabitCommand, ListCommand, TaskCommand};

#[derive(Parser, Debug)]
#[command(
    name = "sharehub",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SHAREHUB_BUILD_SHA"), ")"),
    about = "Shared hub weekly digest and push delivery"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build or send the weekly digest
    Digest {
        #[command(subcommand)]
        command: DigestCommand,
    },

    /// Run the weekly digest on the configured cron schedule
    Schedule,

    /// Serve /preview and /test-send over HTTP
    Serve {
        /// Bind address (default from config.server.addr)
        #[arg(long)]
        addr: Option<String>,
    },

    /// Register a device token for push delivery
    Register { recipient: String, token: String },

    /// Remove a recipient's push registration
    Unregister { recipient: String },

    /// Shared tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Shared lists
    List {
        #[command(subcommand)]
        command: ListCommand,
    },

    /// Habits
    Habit {
        #[command(subcommand)]
        command: HabitCommand,
    },

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DigestCommand {
    /// Print this week's digest without sending it
    Preview,

    /// Build and push the digest to every registered device now
    Send {
        /// Log instead of pushing
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.sharehub/config.toml
    Init,
    /// Print the effective config
    Show,
}

fn load_context() -> Result<Arc<AppContext>> {
    Ok(Arc::new(AppContext::new(config::load_config()?)?))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Digest { command } => {
            let ctx = load_context()?;
            match command {
                DigestCommand::Preview => {
                    match build_digest(&ctx.store, ctx.today(), &ctx.render_options()) {
                        Ok(digest) => println!("{}\n\n{}", digest.title, digest.body),
                        Err(PipelineError::NotFound) => bail!(
                            "No shared hub at {}. Add something first: sharehub task add \"...\"",
                            ctx.store.hub_path().display()
                        ),
                        Err(e) => return Err(e.into()),
                    }
                }
                DigestCommand::Send { dry_run } => {
                    let transport = ctx.transport(dry_run)?;
                    let report = run_weekly(
                        &ctx.store,
                        transport.as_ref(),
                        ctx.today(),
                        &ctx.render_options(),
                    )
                    .await?;
                    println!("{}", report.digest.title);
                    println!("{}", report.tally.summary());
                }
            }
        }

        Command::Schedule => schedule::run(load_context()?).await?,

        Command::Serve { addr } => {
            let ctx = load_context()?;
            let addr = addr.unwrap_or_else(|| ctx.config.server.addr.clone());
            server::serve(ctx, &addr).await?;
        }

        Command::Register { recipient, token } => {
            load_context()?.store.register(&recipient, &token)?;
            println!("Registered {recipient}");
        }

        Command::Unregister { recipient } => {
            if load_context()?.store.remove_registration(&recipient)? {
                println!("Removed {recipient}");
            } else {
                println!("No registration for {recipient}");
            }
        }

        Command::Task { command } => hub_cmd::run_task(&*load_context()?, command)?,
        Command::List { command } => hub_cmd::run_list(&*load_context()?, command)?,
        Command::Habit { command } => hub_cmd::run_habit(&*load_context()?, command)?,
    }

    Ok(())
}
