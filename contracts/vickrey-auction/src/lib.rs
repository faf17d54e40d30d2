//! Second-price (Vickrey) auction with public bids for a fungible CIS-2 prize.
//!
//! Bidders lock CCD with their bids until the bidding deadline. The owner settles the auction
//! once enough bidders took part: the highest bidder wins the prize and pays the second highest
//! bid. Every payout is pulled by its recipient after settlement or expiry. Payouts still owed
//! when the owner resets the auction are kept aside and pulled with `claimPending`.
#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod events;
mod external;
mod pricing;
mod state;

/// Minimum number of distinct bidders required to settle.
pub const QUORUM: u32 = 3;

/// Bidding stays open for this many days after a round is opened.
pub const BIDDING_WINDOW_DAYS: u64 = 7;

/// Receive name of the CIS-2 hook of this contract.
pub const RECEIVE_HOOK: &str = "VickreyAuction.onReceivingCIS2";
