use anchor_lang::prelude::{AccountMeta, Pubkey};
use anchor_lang::solana_program::instruction::Instruction;
use borsh::{BorshDeserialize, BorshSerialize};
use common::constants::DISCRIMINATOR_BYTES;
use common::error::{EscrowError, Result};
use tracing::debug;

pub mod dst;
pub mod src;

/// Anchor instruction arguments: an 8-byte discriminator followed by Borsh fields.
pub trait InstructionArgs: BorshSerialize + BorshDeserialize {
    const NAME: &'static str;
    const DISCRIMINATOR: [u8; DISCRIMINATOR_BYTES];

    fn data(&self) -> Result<Vec<u8>> {
        let mut data = Self::DISCRIMINATOR.to_vec();
        self.serialize(&mut data)?;
        Ok(data)
    }

    fn from_data(data: &[u8]) -> Result<Self> {
        if data.len() < DISCRIMINATOR_BYTES || data[..DISCRIMINATOR_BYTES] != Self::DISCRIMINATOR {
            return Err(EscrowError::InvalidInstruction(format!(
                "data is not a {} instruction",
                Self::NAME
            )));
        }
        Self::try_from_slice(&data[DISCRIMINATOR_BYTES..]).map_err(|e| {
            EscrowError::InvalidInstruction(format!("{} arguments: {e}", Self::NAME))
        })
    }
}

/// Ordered account list of one instruction.
pub trait InstructionAccounts: Sized {
    const LEN: usize;

    fn to_account_metas(&self, program_id: &Pubkey) -> Vec<AccountMeta>;

    fn from_account_metas(metas: &[AccountMeta], program_id: &Pubkey) -> Result<Self>;
}

/// An account slot; absent optional accounts are filled with the program id.
pub trait AccountKey: Sized {
    fn to_meta(&self, program_id: &Pubkey, writable: bool, signer: bool) -> AccountMeta;

    fn from_meta(meta: &AccountMeta, program_id: &Pubkey, writable: bool, signer: bool) -> Result<Self>;
}

impl AccountKey for Pubkey {
    fn to_meta(&self, _program_id: &Pubkey, writable: bool, signer: bool) -> AccountMeta {
        AccountMeta {
            pubkey: *self,
            is_signer: signer,
            is_writable: writable,
        }
    }

    fn from_meta(meta: &AccountMeta, _program_id: &Pubkey, writable: bool, signer: bool) -> Result<Self> {
        if meta.is_signer != signer || meta.is_writable != writable {
            return Err(EscrowError::InvalidInstruction(format!(
                "account {} has flags signer={} writable={}, expected signer={signer} writable={writable}",
                meta.pubkey, meta.is_signer, meta.is_writable
            )));
        }
        Ok(meta.pubkey)
    }
}

impl AccountKey for Option<Pubkey> {
    fn to_meta(&self, program_id: &Pubkey, writable: bool, signer: bool) -> AccountMeta {
        match self {
            Some(key) => key.to_meta(program_id, writable, signer),
            None => AccountMeta::new_readonly(*program_id, false),
        }
    }

    fn from_meta(meta: &AccountMeta, program_id: &Pubkey, writable: bool, signer: bool) -> Result<Self> {
        if meta.pubkey == *program_id {
            return Ok(None);
        }
        Pubkey::from_meta(meta, program_id, writable, signer).map(Some)
    }
}

/// Declares an account list with its `(writable, signer)` flags in instruction order.
macro_rules! instruction_accounts {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($(#[$field_meta:meta])* $field:ident: $ty:ty => ($writable:expr, $signer:expr)),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub struct $name {
            $($(#[$field_meta])* pub $field: $ty,)*
        }

        impl $crate::instructions::InstructionAccounts for $name {
            const LEN: usize = [$(stringify!($field)),*].len();

            fn to_account_metas(
                &self,
                program_id: &anchor_lang::prelude::Pubkey,
            ) -> Vec<anchor_lang::prelude::AccountMeta> {
                vec![$(
                    $crate::instructions::AccountKey::to_meta(&self.$field, program_id, $writable, $signer)
                ),*]
            }

            fn from_account_metas(
                metas: &[anchor_lang::prelude::AccountMeta],
                program_id: &anchor_lang::prelude::Pubkey,
            ) -> common::Result<Self> {
                if metas.len() != Self::LEN {
                    return Err(common::EscrowError::InvalidInstruction(format!(
                        "{} expects {} accounts, got {}",
                        stringify!($name),
                        Self::LEN,
                        metas.len()
                    )));
                }
                let mut metas = metas.iter();
                Ok(Self {
                    $($field: {
                        let meta = metas.next().ok_or_else(|| {
                            common::EscrowError::InvalidInstruction(stringify!($field).to_string())
                        })?;
                        $crate::instructions::AccountKey::from_meta(meta, program_id, $writable, $signer)?
                    },)*
                })
            }
        }
    };
}

pub(crate) use instruction_accounts;

/// Anchor instruction arguments with a fixed discriminator.
macro_rules! instruction_args {
    (
        $(#[$meta:meta])*
        pub struct $name:ident as $ix:literal = $disc:expr;
        { $($(#[$field_meta:meta])* pub $field:ident: $ty:ty),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
        pub struct $name {
            $($(#[$field_meta])* pub $field: $ty,)*
        }

        impl $crate::instructions::InstructionArgs for $name {
            const NAME: &'static str = $ix;
            const DISCRIMINATOR: [u8; common::constants::DISCRIMINATOR_BYTES] = $disc;
        }
    };
}

pub(crate) use instruction_args;

pub fn build_instruction<A: InstructionAccounts, D: InstructionArgs>(
    program_id: &Pubkey,
    accounts: &A,
    args: &D,
) -> Result<Instruction> {
    let instruction = Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(program_id),
        data: args.data()?,
    };
    debug!(program_id = %program_id, instruction = D::NAME, "encoded instruction");
    Ok(instruction)
}

/// Inverse of [`build_instruction`].
pub fn parse_instruction<A: InstructionAccounts, D: InstructionArgs>(
    program_id: &Pubkey,
    instruction: &Instruction,
) -> Result<(A, D)> {
    if instruction.program_id != *program_id {
        return Err(EscrowError::InvalidInstruction(format!(
            "instruction targets {}, expected {program_id}",
            instruction.program_id
        )));
    }
    let args = D::from_data(&instruction.data)?;
    let accounts = A::from_account_metas(&instruction.accounts, program_id)?;
    Ok((accounts, args))
}

instruction_args! {
    pub struct Withdraw as "withdraw" = [183, 18, 70, 156, 148, 109, 161, 34];
    { pub secret: [u8; 32] }
}

instruction_args! {
    pub struct PublicWithdraw as "public_withdraw" = [152, 57, 240, 192, 82, 35, 150, 11];
    { pub secret: [u8; 32] }
}
