pub mod config;
pub mod constants;
pub mod escrow_factory;
pub mod instructions;
pub mod order;
pub mod pda;

pub use common::{EscrowError, Result};
pub use config::SvmProgramConfig;
pub use escrow_factory::{SvmDstEscrowFactory, SvmSrcEscrowFactory};
pub use order::{ResolverCancellationConfig, SvmCrossChainOrder, SvmEscrowParams, SvmExtra, SvmOrderInfo};
