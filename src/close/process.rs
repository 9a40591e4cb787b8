use console::style;

use crate::{common::*, errors::AuctionClientError, reader::require_auction};

pub struct CloseArgs {
    pub rpc_url: Option<String>,
    pub keys_dir: Option<String>,
    pub program_id: Option<String>,
    pub escrow: Option<String>,
    pub bidder: String,
    pub nft_mint: String,
}

pub async fn process_close(args: CloseArgs) -> Result<()> {
    println!(
        "{} {}Initializing connection",
        style("[1/3]").bold().dim(),
        COMPUTER_EMOJI
    );

    let auction_config = auction_setup(args.rpc_url, args.keys_dir, args.program_id)?;
    let key_store = KeyStore::new(&auction_config.keys_dir);
    let client = setup_client(&auction_config);

    let escrow = resolve_escrow(&key_store, args.escrow)?;
    let bidder = key_store.keypair(&args.bidder)?;
    let nft_mint = key_store.resolve(&args.nft_mint)?;

    // kept for the balance report, the record is gone once the close lands
    let auction = require_auction(client.ledger(), &escrow).await?;

    println!(
        "\n{} {}Settling auction {}",
        style("[2/3]").bold().dim(),
        HAMMER_EMOJI,
        escrow
    );

    let pb = spinner_with_style();
    pb.set_message("Preparing NFT account...");
    let bidder_nft_receiving = client
        .ensure_associated_token_account(&bidder, &nft_mint)
        .await;
    let bidder_nft_receiving = match bidder_nft_receiving {
        Ok(address) => address,
        Err(err) => {
            pb.finish_and_clear();
            return Err(err.into());
        }
    };

    pb.set_message("Sending transaction...");
    let signature = client.close(&escrow, &bidder, &bidder_nft_receiving).await;
    pb.finish_and_clear();

    match signature {
        Ok(signature) => {
            info!("Close signature: {}", signature);
            println!(
                "\n{} {}Auction settled",
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

    let remaining = wait_for_state(client.ledger(), &escrow, "Waiting for escrow to close...", |a| {
        a.is_none()
    })
    .await?;

    let (authority, _) = client.escrow_authority();
    print_auction(&escrow, &authority, remaining.as_ref());
    print_balances(
        client.ledger(),
        &[
            ("bidder nft", bidder_nft_receiving, None),
            ("exhibitor ft", auction.exhibitor_ft_receiving_pubkey, None),
        ],
    )
    .await?;

    Ok(())
}
