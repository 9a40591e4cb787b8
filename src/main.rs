use std::{fs::OpenOptions, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Result};
use auction_escrow::{
    bid::{process_bid, BidArgs},
    cancel::{process_cancel, CancelArgs},
    cli::{Cli, Commands},
    close::{process_close, CloseArgs},
    constants::{COMPLETE_EMOJI, ERROR_EMOJI},
    exhibit::{process_exhibit, ExhibitArgs},
    show::{process_show, ShowArgs},
};
use clap::Parser;
use console::style;
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{self, filter::LevelFilter, prelude::*, EnvFilter};

fn setup_logging(level: Option<EnvFilter>) -> Result<()> {
    // Log in current directory for now.
    let log_path = PathBuf::from("auction-escrow.log");

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Prioritize user-provided level, otherwise read from RUST_LOG env var, fall back to "info".
    let env_filter = if let Some(filter) = level {
        filter
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let formatting_layer = BunyanFormattingLayer::new("auction-escrow".into(), file);
    let level_filter = LevelFilter::from_str(&env_filter.to_string())?;

    let subscriber = tracing_subscriber::registry()
        .with(formatting_layer.with_filter(level_filter))
        .with(JsonStorageLayer);

    set_global_default(subscriber)
        .map_err(|err| anyhow!("Failed to set global default subscriber: {}", err))?;

    Ok(())
}

#[tokio::main(worker_threads = 4)]
async fn main() {
    match run().await {
        Ok(()) => {
            println!(
                "\n{}{}",
                COMPLETE_EMOJI,
                style("Command successful.").green().bold().dim()
            );
        }
        Err(err) => {
            println!(
                "\n{}{} {}",
                ERROR_EMOJI,
                style("Error running command (re-run needed):").red(),
                err,
            );
            // finished the program with an error code to the OS
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<()> {
    solana_logger::setup_with_default("solana=off");

    let cli = Cli::parse();

    if let Some(user_filter) = cli.log_level {
        let filter = EnvFilter::from_str(&user_filter).map_err(|_| {
            anyhow!(
                "Invalid log level: {:?}.\n Valid levels are: trace, debug, info, warn, error.",
                user_filter
            )
        })?;
        setup_logging(Some(filter))?;
    } else {
        setup_logging(None)?;
    }

    tracing::info!("Starting auction-escrow {}", env!("CARGO_PKG_VERSION"));

    let rpc_url = cli.rpc_url;
    let keys_dir = cli.keys_dir;
    let program_id = cli.program_id;
    let escrow = cli.escrow;

    match cli.command {
        Commands::Exhibit {
            price,
            duration,
            exhibitor,
            nft_account,
            nft_mint,
            ft_receiving,
        } => {
            process_exhibit(ExhibitArgs {
                rpc_url,
                keys_dir,
                program_id,
                price,
                duration,
                exhibitor,
                nft_account,
                nft_mint,
                ft_receiving,
            })
            .await?
        }
        Commands::Bid {
            price,
            bidder,
            ft_account,
            ft_mint,
        } => {
            process_bid(BidArgs {
                rpc_url,
                keys_dir,
                program_id,
                escrow,
                price,
                bidder,
                ft_account,
                ft_mint,
            })
            .await?
        }
        Commands::Cancel {
            exhibitor,
            nft_account,
        } => {
            process_cancel(CancelArgs {
                rpc_url,
                keys_dir,
                program_id,
                escrow,
                exhibitor,
                nft_account,
            })
            .await?
        }
        Commands::Close { bidder, nft_mint } => {
            process_close(CloseArgs {
                rpc_url,
                keys_dir,
                program_id,
                escrow,
                bidder,
                nft_mint,
            })
            .await?
        }
        Commands::Show => {
            process_show(ShowArgs {
                rpc_url,
                keys_dir,
                program_id,
                escrow,
            })
            .await?
        }
    }

    Ok(())
}
