use alloy_primitives::Address;
use common::auction::AuctionDetails;
use common::bytes_iter::BytesIter;
use common::error::{EscrowError, Result};
use tracing::trace;

use crate::extension::{Extension, Interaction};
use crate::whitelist::Whitelist;

/// Post-interaction flag: escrow extra data follows the whitelist.
pub const HAS_ESCROW_DATA_FLAG: u8 = 0x01;

/// Auction, resolver whitelist and settlement post-interaction of a Fusion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FusionExtension {
    pub settlement: Address,
    pub auction: AuctionDetails,
    pub whitelist: Whitelist,
    pub maker_permit: Option<Interaction>,
}

impl FusionExtension {
    pub fn new(
        settlement: Address,
        auction: AuctionDetails,
        whitelist: Whitelist,
        maker_permit: Option<Interaction>,
    ) -> Self {
        Self {
            settlement,
            auction,
            whitelist,
            maker_permit,
        }
    }

    /// `settlement ‖ auction ‖ whitelist halves`, used for both amount getters.
    fn amount_data(&self) -> Vec<u8> {
        [
            self.settlement.as_slice(),
            &self.auction.encode(),
            &self.whitelist.encode_halves(),
        ]
        .concat()
    }

    /// Post-interaction payload, parsed back by [`FusionExtension::from_extension`]:
    ///
    /// ```text
    /// settlement (20) ‖ flags (1) ‖ resolving start (4) ‖ count (1) ‖ (address half (10) ‖ delay (2))* ‖ extra
    /// ```
    ///
    /// The resolver count keeps its own byte so every flag bit stays free for extra data kinds;
    /// only [`HAS_ESCROW_DATA_FLAG`] is defined.
    pub(crate) fn post_interaction(&self, flags: u8, extra: &[u8]) -> Vec<u8> {
        [
            self.settlement.as_slice(),
            &[flags],
            &self.whitelist.encode(),
            extra,
        ]
        .concat()
    }

    pub(crate) fn build_with(&self, flags: u8, extra: &[u8], custom_data: Vec<u8>) -> Extension {
        let amount_data = self.amount_data();
        Extension {
            making_amount_data: amount_data.clone(),
            taking_amount_data: amount_data,
            maker_permit: self
                .maker_permit
                .as_ref()
                .map(Interaction::encode)
                .unwrap_or_default(),
            post_interaction: self.post_interaction(flags, extra),
            custom_data,
            ..Extension::default()
        }
    }

    pub fn build(&self) -> Extension {
        self.build_with(0, &[], Vec::new())
    }

    pub fn from_extension(extension: &Extension) -> Result<Self> {
        if extension.making_amount_data != extension.taking_amount_data {
            return Err(EscrowError::InvalidExtension(
                "making and taking amount data differ".to_string(),
            ));
        }

        let mut amount = BytesIter::new(&extension.making_amount_data);
        let settlement = amount.next_address()?;
        let auction = AuctionDetails::decode_from(&mut amount)?;
        let halves = Whitelist::decode_halves(&mut amount)?;
        if !amount.is_empty() {
            return Err(EscrowError::InvalidExtension(format!(
                "{} unexpected bytes in amount data",
                amount.remaining()
            )));
        }

        let mut post = BytesIter::new(&extension.post_interaction);
        let post_settlement = post.next_address()?;
        if post_settlement != settlement {
            return Err(EscrowError::InvalidExtension(format!(
                "post-interaction targets {post_settlement}, amount getters use {settlement}"
            )));
        }
        let flags = post.next_u8()?;
        if flags != 0 {
            return Err(EscrowError::InvalidExtension(format!(
                "unknown post-interaction flags {flags:#04x}"
            )));
        }
        let whitelist = Whitelist::decode(&mut post)?;
        if !post.is_empty() {
            return Err(EscrowError::InvalidExtension(format!(
                "{} unexpected bytes in post-interaction",
                post.remaining()
            )));
        }

        let whitelisted: Vec<_> = whitelist.entries().iter().map(|e| e.address_half).collect();
        if whitelisted != halves {
            return Err(EscrowError::InvalidExtension(
                "amount getter whitelist differs from post-interaction whitelist".to_string(),
            ));
        }

        let maker_permit = if extension.has_maker_permit() {
            Some(Interaction::decode(&extension.maker_permit)?)
        } else {
            None
        };

        trace!(%settlement, resolvers = whitelist.len(), "decoded fusion extension");
        Ok(Self {
            settlement,
            auction,
            whitelist,
            maker_permit,
        })
    }
}
