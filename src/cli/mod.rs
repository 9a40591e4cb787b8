use clap::{AppSettings, Parser, Subcommand};

#[derive(Parser)]
#[clap(author, version, about)]
#[clap(setting(AppSettings::SubcommandRequiredElseHelp))]
pub struct Cli {
    /// Log level: trace, debug, info, warn, error, off
    #[clap(short, long, global = true)]
    pub log_level: Option<String>,

    /// RPC Url, falls back to $NETWORK, the Solana CLI config and then "http://localhost:8899"
    #[clap(long, global = true)]
    pub rpc_url: Option<String>,

    /// Directory holding the named key files, defaults to "./keys"
    #[clap(long, global = true)]
    pub keys_dir: Option<String>,

    /// Address of the auction program, defaults to the "program" key
    #[clap(long, global = true)]
    pub program_id: Option<String>,

    /// Escrow account of the auction, defaults to the "escrow" key
    #[clap(long, global = true)]
    pub escrow: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Put an NFT up for auction
    Exhibit {
        /// Initial price in the payment token's base units
        price: String,

        /// Auction duration in seconds
        duration: String,

        /// Key name of the exhibitor's keypair
        #[clap(long, default_value = "exhibitor")]
        exhibitor: String,

        /// Exhibitor's NFT account (key name or address)
        #[clap(long, default_value = "exhibitor_nft_x")]
        nft_account: String,

        /// Mint of the exhibited NFT (key name or address)
        #[clap(long, default_value = "mint_nft_x")]
        nft_mint: String,

        /// Exhibitor's payment token account receiving the winning bid (key name or address)
        #[clap(long, default_value = "exhibitor_ft_nao")]
        ft_receiving: String,
    },

    /// Outbid the current highest bidder
    Bid {
        /// Bid price in the payment token's base units
        price: String,

        /// Key name of the bidder's keypair
        #[clap(long, default_value = "bidder1")]
        bidder: String,

        /// Bidder's payment token account, defaults to the "<bidder>_ft_nao" key
        #[clap(long)]
        ft_account: Option<String>,

        /// Mint of the payment token (key name or address)
        #[clap(long, default_value = "mint_ft_nao")]
        ft_mint: String,
    },

    /// Cancel an auction nobody has bid on
    Cancel {
        /// Key name of the exhibitor's keypair
        #[clap(long, default_value = "exhibitor")]
        exhibitor: String,

        /// Exhibitor's NFT account getting the token back (key name or address)
        #[clap(long, default_value = "exhibitor_nft_x")]
        nft_account: String,
    },

    /// Settle an ended auction
    Close {
        /// Key name of the highest bidder's keypair
        #[clap(long, default_value = "bidder1")]
        bidder: String,

        /// Mint of the auctioned NFT (key name or address)
        #[clap(long, default_value = "mint_nft_x")]
        nft_mint: String,
    },

    /// Show the auction stored in the escrow account
    Show,
}
