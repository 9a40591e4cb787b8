use console::Emoji;

/// Seed of the program-derived address that owns every custody account.
pub const ESCROW_SEED: &[u8] = b"escrow";

pub const AUCTION_LEN: usize = 1 + // is initialized
32 + // exhibitor
32 + // exhibiting nft temp account
32 + // exhibitor ft receiving account
8 + // price
8 + // end at
32 + // highest bidder
32 + // highest bidder ft temp account
32 // highest bidder ft returning account
;

pub const DEFAULT_RPC_URL: &str = "http://localhost:8899";
pub const DEFAULT_KEYS_DIR: &str = "./keys";
pub const NETWORK_ENV: &str = "NETWORK";

pub const PROGRAM_KEY_NAME: &str = "program";
pub const ESCROW_KEY_NAME: &str = "escrow";

/// Upper bound on how long commands wait for a submitted change to become visible.
pub const STATE_WAIT_TIMEOUT_SECS: u64 = 30;
pub const STATE_POLL_INTERVAL_MILLIS: u64 = 500;

pub const COMPUTER_EMOJI: Emoji<'_, '_> = Emoji("🖥  ", "");
pub const HAMMER_EMOJI: Emoji<'_, '_> = Emoji("🔨 ", "");
pub const MONEY_BAG_EMOJI: Emoji<'_, '_> = Emoji("💰 ", "");
pub const LOOKING_GLASS_EMOJI: Emoji<'_, '_> = Emoji("🔍 ", "");
pub const PAPER_EMOJI: Emoji<'_, '_> = Emoji("📝 ", "");
pub const CROSS_EMOJI: Emoji<'_, '_> = Emoji("🚫 ", "");
pub const COMPLETE_EMOJI: Emoji<'_, '_> = Emoji("✅ ", "");
pub const ERROR_EMOJI: Emoji<'_, '_> = Emoji("🛑 ", "");
pub const WARNING_EMOJI: Emoji<'_, '_> = Emoji("⚠️ ", "");
