pub mod bid;
pub mod cancel;
pub mod client;
pub mod close;
pub mod exhibit;

pub use bid::*;
pub use cancel::*;
pub use client::*;
pub use close::*;
pub use exhibit::*;
