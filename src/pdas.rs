use solana_sdk::pubkey::Pubkey;

use crate::constants::ESCROW_SEED;

pub type PdaInfo<T> = (Pubkey, T);

/// Derives the escrow authority: the program address that owns every custody
/// account and signs their transfers. It lies off the ed25519 curve, so no
/// private key exists for it.
pub fn find_escrow_authority(program_id: &Pubkey) -> PdaInfo<u8> {
    Pubkey::find_program_address(&[ESCROW_SEED], program_id)
}

pub fn find_escrow_authority_pda(program_id: &Pubkey) -> Pubkey {
    let (pda, _bump) = find_escrow_authority(program_id);

    pda
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let program_id = Pubkey::new_unique();
        assert_eq!(
            find_escrow_authority(&program_id),
            find_escrow_authority(&program_id)
        );
    }

    #[test]
    fn programs_get_distinct_authorities() {
        let a = find_escrow_authority_pda(&Pubkey::new_unique());
        let b = find_escrow_authority_pda(&Pubkey::new_unique());
        assert_ne!(a, b);
    }

    #[test]
    fn authority_is_off_curve_and_reproducible_from_bump() {
        let program_id = Pubkey::new_unique();
        let (pda, bump) = find_escrow_authority(&program_id);

        assert!(!pda.is_on_curve());
        assert_eq!(
            Pubkey::create_program_address(&[ESCROW_SEED, &[bump]], &program_id).unwrap(),
            pda
        );
    }
}
