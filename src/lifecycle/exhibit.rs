use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey, sysvar};

use crate::{
    errors::{AuctionClientError, Precondition, Result},
    instruction::{AuctionInstruction, Request},
};

pub struct ExhibitAccounts {
    pub exhibitor: Pubkey,
    pub exhibitor_nft_account: Pubkey,
    /// Freshly allocated token account that will hold the NFT
    pub nft_custody: Pubkey,
    pub exhibitor_ft_receiving: Pubkey,
    /// Freshly allocated account for the auction record
    pub escrow: Pubkey,
}

pub struct ExhibitData {
    pub price: u64,
    pub duration_seconds: u64,
}

pub fn exhibit(
    ExhibitAccounts {
        exhibitor,
        exhibitor_nft_account,
        nft_custody,
        exhibitor_ft_receiving,
        escrow,
    }: ExhibitAccounts,
    ExhibitData {
        price,
        duration_seconds,
    }: ExhibitData,
) -> Result<Request> {
    if price == 0 {
        return Err(AuctionClientError::PreconditionFailed(Precondition::ZeroPrice));
    }
    if duration_seconds == 0 {
        return Err(AuctionClientError::PreconditionFailed(
            Precondition::ZeroDuration,
        ));
    }
    // the program adds the duration to a signed clock value
    if i64::try_from(duration_seconds).is_err() {
        return Err(AuctionClientError::Encoding {
            field: "duration",
            reason: format!("{} exceeds {}", duration_seconds, i64::MAX),
        });
    }

    let accounts = vec![
        AccountMeta::new_readonly(exhibitor, true),
        AccountMeta::new(exhibitor_nft_account, false),
        AccountMeta::new(nft_custody, false),
        AccountMeta::new(exhibitor_ft_receiving, false),
        AccountMeta::new(escrow, false),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(spl_token::id(), false),
    ];

    Ok(Request {
        instruction: AuctionInstruction::Exhibit {
            initial_price: price,
            seconds: duration_seconds,
        },
        accounts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> ExhibitAccounts {
        ExhibitAccounts {
            exhibitor: Pubkey::new_unique(),
            exhibitor_nft_account: Pubkey::new_unique(),
            nft_custody: Pubkey::new_unique(),
            exhibitor_ft_receiving: Pubkey::new_unique(),
            escrow: Pubkey::new_unique(),
        }
    }

    #[test]
    fn builds_exhibit_request() {
        let accs = accounts();
        let (exhibitor, escrow) = (accs.exhibitor, accs.escrow);
        let request = exhibit(
            accs,
            ExhibitData {
                price: 200,
                duration_seconds: 3600,
            },
        )
        .unwrap();

        assert_eq!(
            request.data(),
            vec![0x00, 0xC8, 0, 0, 0, 0, 0, 0, 0, 0x10, 0x0E, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(request.accounts.len(), 8);
        assert_eq!(request.accounts[0], AccountMeta::new_readonly(exhibitor, true));
        assert_eq!(request.accounts[4], AccountMeta::new(escrow, false));
        assert_eq!(request.accounts[5].pubkey, sysvar::rent::id());
        assert_eq!(request.accounts[6].pubkey, sysvar::clock::id());
        assert_eq!(request.accounts[7].pubkey, spl_token::id());
        assert!(request.accounts[1..5].iter().all(|meta| meta.is_writable && !meta.is_signer));
    }

    #[test]
    fn rejects_zero_price_and_duration() {
        assert!(matches!(
            exhibit(
                accounts(),
                ExhibitData {
                    price: 0,
                    duration_seconds: 10
                }
            ),
            Err(AuctionClientError::PreconditionFailed(Precondition::ZeroPrice))
        ));
        assert!(matches!(
            exhibit(
                accounts(),
                ExhibitData {
                    price: 10,
                    duration_seconds: 0
                }
            ),
            Err(AuctionClientError::PreconditionFailed(Precondition::ZeroDuration))
        ));
    }

    #[test]
    fn rejects_duration_beyond_signed_range() {
        assert!(matches!(
            exhibit(
                accounts(),
                ExhibitData {
                    price: 10,
                    duration_seconds: u64::MAX
                }
            ),
            Err(AuctionClientError::Encoding {
                field: "duration",
                ..
            })
        ));
    }
}
