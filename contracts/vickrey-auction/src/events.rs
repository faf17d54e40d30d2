use commons::{
    ContractTokenAmount, PrizeToken, BIDING_TAG, CLAIM_PENDING_TAG, CLAIM_PRIZE_TAG, DEPOSIT_TAG,
    EXPIRE_TAG, INITIALIZE_TAG, OWNER_WITHDRAW_TAG, RECLAIM_DEPOSIT_TAG, RECLAIM_PRIZE_TAG,
    REFUND_TAG, RESET_TAG, SETTLE_TAG, WITHDRAW_TAG,
};
use concordium_std::*;

/// Round opening event data. Logged by `initialize` and `reset`.
#[derive(Debug, Serial)]
pub struct RoundEvent<'a> {
    /// Prize token.
    pub token: &'a PrizeToken,
    /// Escrowed prize amount.
    pub prize_amount: ContractTokenAmount,
    /// Bidding deadline.
    pub deadline: Timestamp,
}

/// Bid event data.
#[derive(Debug, Serial)]
pub struct BidEvent<'a> {
    /// Bidder account address.
    pub bidder: &'a AccountAddress,
    /// Recorded bid amount.
    pub amount: Amount,
    /// Replaced and refunded bid, if any.
    pub replaced: Option<Amount>,
}

/// Settlement event data.
#[derive(Debug, Serial)]
pub struct SettleEvent<'a> {
    /// Address of the auction winner.
    pub winner: &'a AccountAddress,
    /// Price paid by the winner.
    pub price: Amount,
}

/// CCD payout event data.
#[derive(Debug, Serial)]
pub struct PayoutEvent<'a> {
    pub account: &'a AccountAddress,
    pub amount: Amount,
}

/// Prize movement event data.
#[derive(Debug, Serial)]
pub struct PrizeEvent<'a> {
    pub account: &'a AccountAddress,
    pub amount: ContractTokenAmount,
}

/// Carried over payout event data.
#[derive(Debug, Serial)]
pub struct PendingEvent<'a> {
    pub account: &'a AccountAddress,
    /// CCD paid out, zero if none was pending.
    pub amount: Amount,
    /// Prize tokens paid out, zero if none were pending.
    pub prize_amount: ContractTokenAmount,
}

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug)]
pub enum AuctionEvents<'a> {
    Initialize(RoundEvent<'a>),
    Bid(BidEvent<'a>),
    Settle(SettleEvent<'a>),
    Expire(Timestamp),
    Withdraw(PayoutEvent<'a>),
    OwnerWithdraw(PayoutEvent<'a>),
    ClaimPrize(PrizeEvent<'a>),
    Refund(PayoutEvent<'a>),
    ReclaimPrize(PrizeEvent<'a>),
    Reset(RoundEvent<'a>),
    Deposit(PrizeEvent<'a>),
    ClaimPending(PendingEvent<'a>),
    ReclaimDeposit(PrizeEvent<'a>),
}

impl<'a> AuctionEvents<'a> {
    pub fn bid(bidder: &'a AccountAddress, amount: Amount, replaced: Option<Amount>) -> Self {
        Self::Bid(BidEvent {
            bidder,
            amount,
            replaced,
        })
    }

    pub fn settle(winner: &'a AccountAddress, price: Amount) -> Self {
        Self::Settle(SettleEvent { winner, price })
    }

    pub fn withdraw(account: &'a AccountAddress, amount: Amount) -> Self {
        Self::Withdraw(PayoutEvent { account, amount })
    }

    pub fn owner_withdraw(account: &'a AccountAddress, amount: Amount) -> Self {
        Self::OwnerWithdraw(PayoutEvent { account, amount })
    }

    pub fn refund(account: &'a AccountAddress, amount: Amount) -> Self {
        Self::Refund(PayoutEvent { account, amount })
    }

    pub fn claim_prize(account: &'a AccountAddress, amount: ContractTokenAmount) -> Self {
        Self::ClaimPrize(PrizeEvent { account, amount })
    }

    pub fn reclaim_prize(account: &'a AccountAddress, amount: ContractTokenAmount) -> Self {
        Self::ReclaimPrize(PrizeEvent { account, amount })
    }

    pub fn deposit(account: &'a AccountAddress, amount: ContractTokenAmount) -> Self {
        Self::Deposit(PrizeEvent { account, amount })
    }

    pub fn claim_pending(
        account: &'a AccountAddress,
        amount: Amount,
        prize_amount: ContractTokenAmount,
    ) -> Self {
        Self::ClaimPending(PendingEvent {
            account,
            amount,
            prize_amount,
        })
    }

    pub fn reclaim_deposit(account: &'a AccountAddress, amount: ContractTokenAmount) -> Self {
        Self::ReclaimDeposit(PrizeEvent { account, amount })
    }
}

impl<'a> Serial for AuctionEvents<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            AuctionEvents::Initialize(event) => {
                out.write_u8(INITIALIZE_TAG)?;
                event.serial(out)
            }
            AuctionEvents::Bid(event) => {
                out.write_u8(BIDING_TAG)?;
                event.serial(out)
            }
            AuctionEvents::Settle(event) => {
                out.write_u8(SETTLE_TAG)?;
                event.serial(out)
            }
            AuctionEvents::Expire(deadline) => {
                out.write_u8(EXPIRE_TAG)?;
                deadline.serial(out)
            }
            AuctionEvents::Withdraw(event) => {
                out.write_u8(WITHDRAW_TAG)?;
                event.serial(out)
            }
            AuctionEvents::OwnerWithdraw(event) => {
                out.write_u8(OWNER_WITHDRAW_TAG)?;
                event.serial(out)
            }
            AuctionEvents::ClaimPrize(event) => {
                out.write_u8(CLAIM_PRIZE_TAG)?;
                event.serial(out)
            }
            AuctionEvents::Refund(event) => {
                out.write_u8(REFUND_TAG)?;
                event.serial(out)
            }
            AuctionEvents::ReclaimPrize(event) => {
                out.write_u8(RECLAIM_PRIZE_TAG)?;
                event.serial(out)
            }
            AuctionEvents::Reset(event) => {
                out.write_u8(RESET_TAG)?;
                event.serial(out)
            }
            AuctionEvents::Deposit(event) => {
                out.write_u8(DEPOSIT_TAG)?;
                event.serial(out)
            }
            AuctionEvents::ClaimPending(event) => {
                out.write_u8(CLAIM_PENDING_TAG)?;
                event.serial(out)
            }
            AuctionEvents::ReclaimDeposit(event) => {
                out.write_u8(RECLAIM_DEPOSIT_TAG)?;
                event.serial(out)
            }
        }
    }
}
