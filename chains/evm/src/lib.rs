pub mod constants;
pub mod escrow_extension;
pub mod escrow_factory;
pub mod extension;
pub mod fusion_extension;
pub mod limit_order;
pub mod maker_traits;
pub mod order;
pub mod whitelist;

pub use common::{EscrowError, Result};
pub use escrow_extension::EscrowExtension;
pub use escrow_factory::{
    EscrowAddressFactory, EscrowFactory, EscrowFactoryConfig, EscrowFactoryFacade,
    EscrowFactoryZkSync,
};
pub use extension::{Extension, Interaction};
pub use order::{Details, EscrowParams, EvmCrossChainOrder, Extra, OrderInfo};
