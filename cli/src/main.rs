use clap::{Parser, Subcommand};
use std::io::Write;

use fusebox_cli::{ShellContext, commands, demo, logging, readline};
use fusebox_core::{FuseboxConfig, FuseboxConfigExt};

#[derive(Parser)]
#[command(version, about = "poll-driven timed callbacks")]
struct Args {
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Arm the sample fuses and poll until all have fired
    Demo {
        /// Override the configured poll interval
        #[arg(short, long)]
        tick_ms: Option<u64>,
    },
    /// Interactive shell over a single container
    Shell,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    logging::init();
    let args = Args::parse();
    let mut config = FuseboxConfig::load();

    match args.mode.unwrap_or(Mode::Demo { tick_ms: None }) {
        Mode::Demo { tick_ms } => {
            if let Some(tick_ms) = tick_ms {
                config.driver.tick_interval_ms = tick_ms;
            }
            demo::run(&config).await.map_err(|e| e.to_string())
        }
        Mode::Shell => shell(config),
    }
}

fn shell(config: FuseboxConfig) -> Result<(), String> {
    let mut ctx = ShellContext::new(config).map_err(|e| e.to_string())?;

    loop {
        let line = readline()?;
        let line = line.trim();
        commands::poll_pending(&mut ctx);
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut ctx) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    ctx.fuses.close();
    Ok(())
}

#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Add {
        #[arg(short, long)]
        secs: u64,
        #[arg(short, long)]
        message: String,
        #[arg(short, long)]
        label: Option<String>,
    },
    Remove {
        index: usize,
    },
    Poll {
        index: usize,
    },
    PollAll,
    Reset {
        index: usize,
    },
    ResetAll,
    List,
    Clear,
    Config,
    Exit,
}

fn respond(line: &str, ctx: &mut ShellContext) -> Result<bool, String> {
    let args = shlex::split(line).ok_or("error: Invalid quoting")?;
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    let outcome = match &cli.command {
        Some(Commands::Add {
            secs,
            message,
            label,
        }) => commands::add(ctx, *secs, message, label.as_deref()),
        Some(Commands::Remove { index }) => commands::remove(ctx, *index),
        Some(Commands::Poll { index }) => commands::poll(ctx, *index),
        Some(Commands::Reset { index }) => commands::reset(ctx, *index),
        Some(Commands::PollAll) => {
            commands::poll_all(ctx);
            Ok(())
        }
        Some(Commands::ResetAll) => {
            commands::reset_all(ctx);
            Ok(())
        }
        Some(Commands::List) => {
            commands::list(ctx);
            Ok(())
        }
        Some(Commands::Clear) => {
            commands::clear(ctx);
            Ok(())
        }
        Some(Commands::Config) => {
            commands::show_config(ctx);
            Ok(())
        }
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => Ok(()),
    };
    outcome.map_err(|e| e.to_string())?;
    Ok(false)
}
