use commons::{ContractTokenAmount, PrizeToken};
use concordium_std::*;

use crate::pricing::PriceDiscovery;
use crate::state::{Phase, Settlement};

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct InitParams {
    /// CIS-2 token used as prize.
    pub token: PrizeToken,
    /// Prize amount escrowed for every round.
    pub prize_amount: ContractTokenAmount,
}

/// How the prize of a new round gets into escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SchemaType, Serialize)]
pub enum PrizeFunding {
    /// The contract transfers the prize from the owner. The owner must have added the contract
    /// as an operator in the token contract beforehand.
    Pull,
    /// The owner already transferred the prize to the contract.
    Deposit,
}

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct ResetParams {
    pub funding: PrizeFunding,
    /// New prize amount. The previous amount is kept by default.
    pub prize_amount: Option<ContractTokenAmount>,
}

/// Auction configuration as returned by `viewConfig`.
#[derive(Debug, Clone, PartialEq, Eq, SchemaType, Serialize)]
pub struct ConfigView {
    pub owner: AccountAddress,
    pub token: PrizeToken,
    pub prize_amount: ContractTokenAmount,
    pub bidding_window: Duration,
}

/// Full auction summary as returned by `view`.
#[derive(Debug, Clone, PartialEq, Eq, SchemaType, Serialize)]
pub struct AuctionView {
    pub initialized: bool,
    pub deadline: Timestamp,
    pub phase: Phase,
    pub settlement: Option<Settlement>,
    pub discovery: PriceDiscovery,
    pub bidder_count: u32,
    pub owner_proceeds_withdrawn: bool,
    pub prize_claimed: bool,
    pub owner_prize_reclaimed: bool,
    /// CCD held on behalf of bidders and the owner.
    pub escrow: Amount,
    /// Prize tokens committed to the current round.
    pub prize_escrow: ContractTokenAmount,
    /// Prize tokens deposited and not committed yet.
    pub prize_deposit: ContractTokenAmount,
}

/// Payouts carried over from finished rounds, as returned by `viewPending`.
#[derive(Debug, Clone, PartialEq, Eq, SchemaType, Serialize)]
pub struct PendingView {
    pub amount: Amount,
    pub prize_amount: ContractTokenAmount,
}
