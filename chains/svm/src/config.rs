use anchor_lang::prelude::Pubkey;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::constants::{DST_ESCROW_PROGRAM_ID, SRC_ESCROW_PROGRAM_ID};

/// Deployed programs an SDK instance talks to.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvmProgramConfig {
    #[serde_as(as = "DisplayFromStr")]
    pub src_escrow_program: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    pub dst_escrow_program: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    pub whitelist_program: Pubkey,
}

impl SvmProgramConfig {
    /// Mainnet escrow programs with the given resolver whitelist.
    pub fn with_whitelist(whitelist_program: Pubkey) -> Self {
        Self {
            src_escrow_program: SRC_ESCROW_PROGRAM_ID,
            dst_escrow_program: DST_ESCROW_PROGRAM_ID,
            whitelist_program,
        }
    }
}
