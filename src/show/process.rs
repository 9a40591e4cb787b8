use console::style;

use crate::common::*;

pub struct ShowArgs {
    pub rpc_url: Option<String>,
    pub keys_dir: Option<String>,
    pub program_id: Option<String>,
    pub escrow: Option<String>,
}

pub async fn process_show(args: ShowArgs) -> Result<()> {
    println!(
        "{} {}Looking up auction",
        style("[1/1]").bold().dim(),
        LOOKING_GLASS_EMOJI
    );

    let pb = spinner_with_style();
    pb.set_message("Connecting...");

    let auction_config = auction_setup(args.rpc_url, args.keys_dir, args.program_id)?;
    let key_store = KeyStore::new(&auction_config.keys_dir);
    let client = setup_client(&auction_config);
    let escrow = resolve_escrow(&key_store, args.escrow)?;

    let auction = client.read_auction(&escrow).await;
    pb.finish_and_clear();
    let auction = auction?;

    println!(
        "\n{}{} {}",
        PAPER_EMOJI,
        style("Program ID:").dim(),
        client.program_id()
    );

    let (authority, _) = client.escrow_authority();
    print_auction(&escrow, &authority, auction.as_ref());

    if let Some(auction) = auction {
        let now = client.now().await?;
        let remaining = auction.seconds_remaining(now);
        let status = if remaining > 0 {
            format!("open, {} seconds left", remaining)
        } else {
            "ended".to_string()
        };
        print_with_style("", "status", status);
    }

    Ok(())
}
