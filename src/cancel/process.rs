use console::style;

use crate::{common::*, errors::AuctionClientError};

pub struct CancelArgs {
    pub rpc_url: Option<String>,
    pub keys_dir: Option<String>,
    pub program_id: Option<String>,
    pub escrow: Option<String>,
    pub exhibitor: String,
    pub nft_account: String,
}

pub async fn process_cancel(args: CancelArgs) -> Result<()> {
    println!(
        "{} {}Initializing connection",
        style("[1/3]").bold().dim(),
        COMPUTER_EMOJI
    );

    let auction_config = auction_setup(args.rpc_url, args.keys_dir, args.program_id)?;
    let key_store = KeyStore::new(&auction_config.keys_dir);
    let client = setup_client(&auction_config);

    let escrow = resolve_escrow(&key_store, args.escrow)?;
    let exhibitor = key_store.keypair(&args.exhibitor)?;
    let exhibitor_nft_account = key_store.resolve(&args.nft_account)?;

    println!(
        "\n{} {}Cancelling auction {}",
        style("[2/3]").bold().dim(),
        CROSS_EMOJI,
        escrow
    );

    let pb = spinner_with_style();
    pb.set_message("Sending transaction...");
    let signature = client
        .cancel(&escrow, &exhibitor, &exhibitor_nft_account)
        .await;
    pb.finish_and_clear();

    match signature {
        Ok(signature) => {
            info!("Cancel signature: {}", signature);
            println!(
                "\n{} {}Auction cancelled",
                style("[3/3]").bold().dim(),
                COMPLETE_EMOJI
            );
            println!("{} {}", style("Signature:").dim(), signature);
        }
        Err(err @ AuctionClientError::AlreadyApplied(_)) => {
            println!("{}{}", WARNING_EMOJI, style(&err).yellow());
        }
        Err(err) => return Err(err.into()),
    }

    let auction = wait_for_state(client.ledger(), &escrow, "Waiting for escrow to close...", |a| {
        a.is_none()
    })
    .await?;

    let (authority, _) = client.escrow_authority();
    print_auction(&escrow, &authority, auction.as_ref());
    print_balances(client.ledger(), &[("exhibitor nft", exhibitor_nft_account, None)]).await?;

    Ok(())
}
