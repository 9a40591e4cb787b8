use console::style;

use crate::{
    common::*,
    errors::AuctionClientError,
    instruction::parse_amount,
    lifecycle::BidParams,
};

pub struct BidArgs {
    pub rpc_url: Option<String>,
    pub keys_dir: Option<String>,
    pub program_id: Option<String>,
    pub escrow: Option<String>,
    pub price: String,
    pub bidder: String,
    pub ft_account: Option<String>,
    pub ft_mint: String,
}

pub async fn process_bid(args: BidArgs) -> Result<()> {
    let price = parse_amount(&args.price, "price")?;

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
    let ft_account = args
        .ft_account
        .unwrap_or_else(|| format!("{}_ft_nao", args.bidder));
    let bidder_ft_account = key_store.resolve(&ft_account)?;
    let ft_mint = key_store.resolve(&args.ft_mint)?;

    println!(
        "\n{} {}Bidding {} on auction {}",
        style("[2/3]").bold().dim(),
        MONEY_BAG_EMOJI,
        price,
        escrow
    );

    let pb = spinner_with_style();
    pb.set_message("Sending transaction...");
    let outcome = client
        .bid(
            &escrow,
            &bidder,
            BidParams {
                bidder_ft_account,
                ft_mint,
                price,
            },
        )
        .await;
    pb.finish_and_clear();

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) if err.is_retryable() => {
            println!(
                "{}{}",
                WARNING_EMOJI,
                style("Another bid landed first; re-run to bid against the current price.").yellow()
            );
            return Err(err.into());
        }
        Err(err @ AuctionClientError::AlreadyApplied(_)) => {
            println!("{}{}", WARNING_EMOJI, style(&err).yellow());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    info!("Bid signature: {}", outcome.signature);
    println!(
        "\n{} {}Bid placed",
        style("[3/3]").bold().dim(),
        COMPLETE_EMOJI
    );
    println!("{} {}", style("Signature:").dim(), outcome.signature);

    let custody = outcome.bidder_ft_custody;
    let auction = wait_for_state(client.ledger(), &escrow, "Waiting for bid...", |a| {
        matches!(a, Some(a) if a.highest_bidder_ft_temp_pubkey == custody)
    })
    .await?;

    let (authority, _) = client.escrow_authority();
    print_auction(&escrow, &authority, auction.as_ref());

    let mut rows = vec![("bidder ft", bidder_ft_account, Some(custody))];
    if outcome.previous.has_bid() {
        rows.push((
            "previous bidder ft",
            outcome.previous.highest_bidder_ft_returning_pubkey,
            Some(outcome.previous.highest_bidder_ft_temp_pubkey),
        ));
    }
    print_balances(client.ledger(), &rows).await?;

    Ok(())
}
