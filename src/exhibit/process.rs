use console::style;

use crate::{
    common::*,
    instruction::parse_amount,
    lifecycle::ExhibitParams,
};

pub struct ExhibitArgs {
    pub rpc_url: Option<String>,
    pub keys_dir: Option<String>,
    pub program_id: Option<String>,
    pub price: String,
    pub duration: String,
    pub exhibitor: String,
    pub nft_account: String,
    pub nft_mint: String,
    pub ft_receiving: String,
}

pub async fn process_exhibit(args: ExhibitArgs) -> Result<()> {
    let price = parse_amount(&args.price, "price")?;
    let duration_seconds = parse_amount(&args.duration, "duration")?;

    println!(
        "{} {}Initializing connection",
        style("[1/3]").bold().dim(),
        COMPUTER_EMOJI
    );

    let auction_config = auction_setup(args.rpc_url, args.keys_dir, args.program_id)?;
    let key_store = KeyStore::new(&auction_config.keys_dir);
    let client = setup_client(&auction_config);

    let exhibitor = key_store.keypair(&args.exhibitor)?;
    let params = ExhibitParams {
        exhibitor_nft_account: key_store.resolve(&args.nft_account)?,
        nft_mint: key_store.resolve(&args.nft_mint)?,
        exhibitor_ft_receiving: key_store.resolve(&args.ft_receiving)?,
        price,
        duration_seconds,
    };
    let exhibitor_nft_account = params.exhibitor_nft_account;
    let exhibitor_ft_receiving = params.exhibitor_ft_receiving;

    println!(
        "\n{} {}Exhibiting NFT {} for {} seconds at {}",
        style("[2/3]").bold().dim(),
        HAMMER_EMOJI,
        exhibitor_nft_account,
        duration_seconds,
        price
    );

    let pb = spinner_with_style();
    pb.set_message("Sending transaction...");
    let outcome = client.exhibit(&exhibitor, params).await;
    pb.finish_and_clear();
    let outcome = outcome?;

    key_store.write_public_key(ESCROW_KEY_NAME, &outcome.escrow)?;
    info!("Exhibit signature: {}", outcome.signature);

    println!(
        "\n{} {}Auction opened",
        style("[3/3]").bold().dim(),
        COMPLETE_EMOJI
    );
    println!("{} {}", style("Signature:").dim(), outcome.signature);

    let auction = wait_for_state(client.ledger(), &outcome.escrow, "Waiting for auction...", |a| {
        a.is_some()
    })
    .await?;
    if auction.is_none() {
        warn!("Escrow {} not visible yet", outcome.escrow);
    }

    let (authority, _) = client.escrow_authority();
    print_auction(&outcome.escrow, &authority, auction.as_ref());
    print_balances(
        client.ledger(),
        &[
            ("exhibitor nft", exhibitor_nft_account, Some(outcome.nft_custody)),
            ("exhibitor ft", exhibitor_ft_receiving, None),
        ],
    )
    .await?;

    Ok(())
}
