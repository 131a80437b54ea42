use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::{EscrowError, Result};
use crate::u256::U256;

/// Lane of a stage delay inside the packed value.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    SrcWithdrawal = 0,
    SrcPublicWithdrawal = 1,
    SrcCancellation = 2,
    SrcPublicCancellation = 3,
    DstWithdrawal = 4,
    DstPublicWithdrawal = 5,
    DstCancellation = 6,
}

/// Window an escrow is in at a given moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscrowStage {
    FinalityLock,
    PrivateWithdrawal,
    PublicWithdrawal,
    PrivateCancellation,
    PublicCancellation,
}

const DEPLOYED_AT_OFFSET: usize = 224;
const STAGE_BIT_SIZE: usize = 32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SrcTimeLockDelays {
    pub withdrawal: u64,
    pub public_withdrawal: u64,
    pub cancellation: u64,
    pub public_cancellation: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DstTimeLockDelays {
    pub withdrawal: u64,
    pub public_withdrawal: u64,
    pub cancellation: u64,
}

/// Escrow stage delays relative to `deployed_at`, packed on chain into one `uint256`:
/// stage `i` lives in bits `[32i, 32i + 32)` and `deployed_at` in the top lane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TimeLocks {
    deployed_at: u32,
    delays: [u32; 7],
}

impl TimeLocks {
    pub fn new(src: SrcTimeLockDelays, dst: DstTimeLockDelays) -> Result<Self> {
        let delays = [
            to_lane("srcWithdrawal", src.withdrawal)?,
            to_lane("srcPublicWithdrawal", src.public_withdrawal)?,
            to_lane("srcCancellation", src.cancellation)?,
            to_lane("srcPublicCancellation", src.public_cancellation)?,
            to_lane("dstWithdrawal", dst.withdrawal)?,
            to_lane("dstPublicWithdrawal", dst.public_withdrawal)?,
            to_lane("dstCancellation", dst.cancellation)?,
        ];
        let time_locks = Self {
            deployed_at: 0,
            delays,
        };
        time_locks.validate()?;
        Ok(time_locks)
    }

    pub fn from_packed(value: U256) -> Result<Self> {
        let lane = |i: usize| value.get_bits(i * STAGE_BIT_SIZE, (i + 1) * STAGE_BIT_SIZE).low_u64() as u32;
        let mut delays = [0u32; 7];
        for (i, delay) in delays.iter_mut().enumerate() {
            *delay = lane(i);
        }
        let time_locks = Self {
            deployed_at: lane(DEPLOYED_AT_OFFSET / STAGE_BIT_SIZE),
            delays,
        };
        time_locks.validate()?;
        Ok(time_locks)
    }

    pub fn from_limbs(limbs: [u64; 4]) -> Result<Self> {
        Self::from_packed(U256::from_limbs(limbs))
    }

    pub fn pack(&self) -> U256 {
        let packed = self
            .delays
            .iter()
            .enumerate()
            .fold(U256::zero(), |acc, (i, delay)| {
                acc | (U256::from(*delay as u64) << (i * STAGE_BIT_SIZE))
            });
        packed | (U256::from(self.deployed_at as u64) << DEPLOYED_AT_OFFSET)
    }

    /// Packed value as the `[u64; 4]` argument Solana programs expect.
    pub fn to_limbs(&self) -> [u64; 4] {
        self.pack().limbs()
    }

    pub fn deployed_at(&self) -> u32 {
        self.deployed_at
    }

    pub fn delay(&self, stage: Stage) -> u32 {
        self.delays[stage as usize]
    }

    pub fn set_deployed_at(&mut self, value: u32) {
        self.deployed_at = value;
    }

    pub fn with_deployed_at(mut self, value: u32) -> Self {
        self.set_deployed_at(value);
        self
    }

    /// Absolute timestamp at which `stage` starts.
    pub fn get(&self, stage: Stage) -> Result<u32> {
        self.deployed_at
            .checked_add(self.delay(stage))
            .ok_or_else(|| EscrowError::Config(format!("{stage:?} timestamp overflows u32")))
    }

    pub fn to_src_time_locks(&self, deployed_at: Option<u32>) -> SrcTimeLocks {
        let deployed_at = deployed_at.unwrap_or(self.deployed_at) as u64;
        SrcTimeLocks {
            deployed_at,
            private_withdrawal: deployed_at + self.delay(Stage::SrcWithdrawal) as u64,
            public_withdrawal: deployed_at + self.delay(Stage::SrcPublicWithdrawal) as u64,
            private_cancellation: deployed_at + self.delay(Stage::SrcCancellation) as u64,
            public_cancellation: deployed_at + self.delay(Stage::SrcPublicCancellation) as u64,
        }
    }

    pub fn to_dst_time_locks(&self, deployed_at: Option<u32>) -> DstTimeLocks {
        let deployed_at = deployed_at.unwrap_or(self.deployed_at) as u64;
        DstTimeLocks {
            deployed_at,
            private_withdrawal: deployed_at + self.delay(Stage::DstWithdrawal) as u64,
            public_withdrawal: deployed_at + self.delay(Stage::DstPublicWithdrawal) as u64,
            private_cancellation: deployed_at + self.delay(Stage::DstCancellation) as u64,
        }
    }

    fn validate(&self) -> Result<()> {
        let d = |stage| self.delay(stage);
        let ordered = |stages: &[Stage]| stages.windows(2).all(|w| d(w[0]) < d(w[1]));

        if !ordered(&[
            Stage::SrcWithdrawal,
            Stage::SrcPublicWithdrawal,
            Stage::SrcCancellation,
            Stage::SrcPublicCancellation,
        ]) {
            return Err(EscrowError::Config(format!(
                "src time locks must be strictly increasing, got {:?}",
                &self.delays[..4]
            )));
        }
        if !ordered(&[
            Stage::DstWithdrawal,
            Stage::DstPublicWithdrawal,
            Stage::DstCancellation,
        ]) {
            return Err(EscrowError::Config(format!(
                "dst time locks must be strictly increasing, got {:?}",
                &self.delays[4..]
            )));
        }
        Ok(())
    }
}

fn to_lane(name: &str, value: u64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| EscrowError::Config(format!("{name} = {value} does not fit into u32")))
}

impl BorshSerialize for TimeLocks {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.pack().serialize(writer)
    }
}

impl BorshDeserialize for TimeLocks {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let packed = U256::deserialize_reader(reader)?;
        Self::from_packed(packed)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }
}

/// Absolute source escrow boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SrcTimeLocks {
    pub deployed_at: u64,
    pub private_withdrawal: u64,
    pub public_withdrawal: u64,
    pub private_cancellation: u64,
    pub public_cancellation: u64,
}

impl SrcTimeLocks {
    pub fn stage_at(&self, time: u64) -> EscrowStage {
        if time < self.private_withdrawal {
            EscrowStage::FinalityLock
        } else if time < self.public_withdrawal {
            EscrowStage::PrivateWithdrawal
        } else if time < self.private_cancellation {
            EscrowStage::PublicWithdrawal
        } else if time < self.public_cancellation {
            EscrowStage::PrivateCancellation
        } else {
            EscrowStage::PublicCancellation
        }
    }

    pub fn is_finality_lock(&self, time: u64) -> bool {
        self.stage_at(time) == EscrowStage::FinalityLock
    }

    /// Seconds left until the finality lock ends.
    pub fn remaining_finality_lock(&self, time: u64) -> u64 {
        self.private_withdrawal.saturating_sub(time)
    }
}

/// Absolute destination escrow boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DstTimeLocks {
    pub deployed_at: u64,
    pub private_withdrawal: u64,
    pub public_withdrawal: u64,
    pub private_cancellation: u64,
}

impl DstTimeLocks {
    pub fn stage_at(&self, time: u64) -> EscrowStage {
        if time < self.private_withdrawal {
            EscrowStage::FinalityLock
        } else if time < self.public_withdrawal {
            EscrowStage::PrivateWithdrawal
        } else if time < self.private_cancellation {
            EscrowStage::PublicWithdrawal
        } else {
            EscrowStage::PrivateCancellation
        }
    }

    pub fn is_finality_lock(&self, time: u64) -> bool {
        self.stage_at(time) == EscrowStage::FinalityLock
    }

    pub fn remaining_finality_lock(&self, time: u64) -> u64 {
        self.private_withdrawal.saturating_sub(time)
    }
}
