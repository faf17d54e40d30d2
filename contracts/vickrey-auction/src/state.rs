use commons::{ContractTokenAmount, CustomContractError, PrizeToken};
use concordium_cis2::TokenAmountU64;
use concordium_std::*;

use crate::external::InitParams;
use crate::pricing::{BidEntry, PriceDiscovery};
use crate::{BIDDING_WINDOW_DAYS, QUORUM};

/// Outcome of a settled auction. Fixed once the auction enters [Phase::Settled].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub struct Settlement {
    /// Participant holding the highest bid.
    pub winner: AccountAddress,
    /// Second highest bid, the price the winner pays.
    pub winning_bid_price: Amount,
}

/// Top level auction phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub enum Phase {
    /// Bids are accepted until the deadline.
    Active,
    /// Winner and price are determined, payouts are pulled by the participants.
    Settled(Settlement),
    /// Deadline passed without settlement, every bid and the prize are refunded.
    Expired,
}

/// CCD payout owed to a caller. It MUST be transferred by the caller of the state method.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub struct Payout {
    pub account: AccountAddress,
    pub amount: Amount,
}

/// Token payout owed to a caller. It MUST be transferred by the caller of the state method.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub struct PrizePayout {
    pub account: AccountAddress,
    pub token: PrizeToken,
    pub amount: ContractTokenAmount,
}

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Account that created the instance. Receives proceeds and reclaims the prize.
    pub owner: AccountAddress,
    /// CIS-2 token used as prize.
    pub token: PrizeToken,
    /// Prize amount escrowed for every round.
    pub prize_amount: ContractTokenAmount,
    /// Whether the first round was opened.
    pub initialized: bool,
    /// Bids placed after this time are rejected.
    pub deadline: Timestamp,
    /// Current auction phase.
    pub phase: Phase,
    /// Running price discovery trackers.
    pub discovery: PriceDiscovery,
    /// Recorded bids. The last submission of every participant is authoritative.
    pub bids: StateMap<AccountAddress, BidEntry, S>,
    /// Number of distinct bidders.
    pub bidder_count: u32,
    /// Sequence number of the next recorded bid.
    pub next_sequence: u32,
    /// Bidders that withdrew after settlement.
    pub settled_withdrawals: StateSet<AccountAddress, S>,
    /// Bidders refunded after expiry.
    pub expired_refunds: StateSet<AccountAddress, S>,
    pub owner_proceeds_withdrawn: bool,
    pub prize_claimed: bool,
    pub owner_prize_reclaimed: bool,
    /// CCD still owed from finished rounds, carried over by `reset`.
    pub pending_claims: StateMap<AccountAddress, Amount, S>,
    /// Prize tokens still owed from finished rounds, carried over by `reset`.
    pub pending_prizes: StateMap<AccountAddress, ContractTokenAmount, S>,
    /// CCD held on behalf of claimants, including carried over claims.
    pub escrow: Amount,
    /// Prize tokens committed to the current round.
    pub prize_escrow: ContractTokenAmount,
    /// Prize tokens received from the owner and not yet committed to a round.
    pub prize_deposit: ContractTokenAmount,
}

impl<S: HasStateApi> State<S> {
    /// Create an uninitialized auction. No bids are accepted until a round is opened.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        params: InitParams,
        origin: AccountAddress,
    ) -> Self {
        State {
            owner: origin,
            token: params.token,
            prize_amount: params.prize_amount,
            initialized: false,
            deadline: Timestamp::from_timestamp_millis(0),
            phase: Phase::Active,
            discovery: PriceDiscovery::default(),
            bids: state_builder.new_map(),
            bidder_count: 0,
            next_sequence: 0,
            settled_withdrawals: state_builder.new_set(),
            expired_refunds: state_builder.new_set(),
            owner_proceeds_withdrawn: false,
            prize_claimed: false,
            owner_prize_reclaimed: false,
            pending_claims: state_builder.new_map(),
            pending_prizes: state_builder.new_map(),
            escrow: Amount::zero(),
            prize_escrow: TokenAmountU64(0),
            prize_deposit: TokenAmountU64(0),
        }
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        address.matches_account(&self.owner)
    }

    pub fn ensure_initialized(&self) -> Result<(), CustomContractError> {
        ensure!(self.initialized, CustomContractError::NotInitialized);
        Ok(())
    }

    pub fn bid_of(&self, bidder: &AccountAddress) -> Option<Amount> {
        self.bids.get(bidder).map(|entry| entry.amount)
    }

    pub fn settlement(&self) -> Option<Settlement> {
        match self.phase {
            Phase::Settled(settlement) => Some(settlement),
            _ => None,
        }
    }

    /// Credit prize tokens received through the CIS-2 receive hook.
    pub fn deposit_prize(&mut self, amount: ContractTokenAmount) -> Result<(), CustomContractError> {
        self.prize_deposit = self
            .prize_deposit
            .0
            .checked_add(amount.0)
            .map(TokenAmountU64)
            .ok_or(CustomContractError::Overflow)?;
        Ok(())
    }

    /// Commit the prize of a new round from the deposited tokens.
    pub fn commit_prize(&mut self) -> Result<(), CustomContractError> {
        let remaining = self
            .prize_deposit
            .0
            .checked_sub(self.prize_amount.0)
            .ok_or(CustomContractError::InsufficientDeposit)?;
        self.prize_deposit = TokenAmountU64(remaining);
        self.prize_escrow = self.prize_amount;
        Ok(())
    }

    /// Open the first round. The prize must be committed separately with [State::commit_prize].
    pub fn initialize(&mut self, slot_time: Timestamp) -> Result<Timestamp, CustomContractError> {
        ensure!(!self.initialized, CustomContractError::AlreadyInitialized);
        self.initialized = true;
        self.open_round(slot_time)
    }

    /// Clear every ledger of a finished round and open a new one.
    ///
    /// Unpaid bids, proceeds and the unclaimed prize of the finished round are moved to the
    /// pending ledgers, where their owners pull them with [State::claim_pending].
    pub fn reset(
        &mut self,
        slot_time: Timestamp,
        prize_amount: Option<ContractTokenAmount>,
    ) -> Result<Timestamp, CustomContractError> {
        self.ensure_initialized()?;
        ensure!(
            self.phase != Phase::Active,
            CustomContractError::WrongPhase
        );
        if let Some(prize_amount) = prize_amount {
            ensure!(prize_amount.0 > 0, CustomContractError::InvalidPrize);
        }

        self.carry_over_entitlements()?;

        if let Some(prize_amount) = prize_amount {
            self.prize_amount = prize_amount;
        }

        self.bids.clear();
        self.settled_withdrawals.clear();
        self.expired_refunds.clear();
        self.bidder_count = 0;
        self.next_sequence = 0;
        self.discovery = PriceDiscovery::default();
        self.owner_proceeds_withdrawn = false;
        self.prize_claimed = false;
        self.owner_prize_reclaimed = false;

        self.open_round(slot_time)
    }

    /// Move every unpaid entitlement of a finished round to the pending ledgers.
    fn carry_over_entitlements(&mut self) -> Result<(), CustomContractError> {
        let mut owed: Vec<(AccountAddress, Amount)> = Vec::new();
        let prize_owner = match self.phase {
            Phase::Settled(settlement) => {
                for (bidder, entry) in self.bids.iter() {
                    if self.settled_withdrawals.contains(&*bidder) {
                        continue;
                    }
                    let amount = if *bidder == settlement.winner {
                        subtract(entry.amount, settlement.winning_bid_price)?
                    } else {
                        entry.amount
                    };
                    owed.push((*bidder, amount));
                }
                if !self.owner_proceeds_withdrawn {
                    owed.push((self.owner, settlement.winning_bid_price));
                }
                if self.prize_claimed {
                    None
                } else {
                    Some(settlement.winner)
                }
            }
            Phase::Expired => {
                for (bidder, entry) in self.bids.iter() {
                    if !self.expired_refunds.contains(&*bidder) {
                        owed.push((*bidder, entry.amount));
                    }
                }
                if self.owner_prize_reclaimed {
                    None
                } else {
                    Some(self.owner)
                }
            }
            Phase::Active => bail!(CustomContractError::WrongPhase),
        };

        for (account, amount) in owed {
            if amount == Amount::zero() {
                continue;
            }
            let pending = self.pending_claims.get(&account).map(|claim| *claim);
            self.pending_claims
                .insert(account, pending.unwrap_or_else(Amount::zero) + amount);
        }

        if let Some(account) = prize_owner {
            let prize = self.prize_escrow;
            if prize.0 > 0 {
                let pending = self.pending_prizes.get(&account).map(|claim| claim.0);
                let total = pending
                    .unwrap_or(0)
                    .checked_add(prize.0)
                    .ok_or(CustomContractError::Overflow)?;
                self.pending_prizes.insert(account, TokenAmountU64(total));
            }
            self.prize_escrow = TokenAmountU64(0);
        }

        Ok(())
    }

    fn open_round(&mut self, slot_time: Timestamp) -> Result<Timestamp, CustomContractError> {
        self.deadline = slot_time
            .checked_add(Duration::from_days(BIDDING_WINDOW_DAYS))
            .ok_or(CustomContractError::Overflow)?;
        self.phase = Phase::Active;
        Ok(self.deadline)
    }

    fn ensure_bidding_open(&self, slot_time: Timestamp) -> Result<(), CustomContractError> {
        self.ensure_initialized()?;
        ensure_eq!(self.phase, Phase::Active, CustomContractError::WrongPhase);
        ensure!(
            slot_time <= self.deadline,
            CustomContractError::DeadlinePassed
        );
        Ok(())
    }

    /// Record `amount` as the bid of `bidder`, replacing any previous bid.
    ///
    /// Returns the replaced bid that MUST be refunded to the bidder.
    pub fn bid(
        &mut self,
        slot_time: Timestamp,
        bidder: AccountAddress,
        amount: Amount,
    ) -> Result<Option<Payout>, CustomContractError> {
        self.ensure_bidding_open(slot_time)?;
        // Owner is not allowed to raise the price
        ensure_ne!(bidder, self.owner, CustomContractError::OwnerForbidden);
        ensure!(amount > Amount::zero(), CustomContractError::BidTooLow);

        let entry = BidEntry {
            amount,
            sequence: self.next_sequence,
        };
        self.next_sequence = self
            .next_sequence
            .checked_add(1)
            .ok_or(CustomContractError::Overflow)?;

        let replaced = self.bids.insert(bidder, entry);
        self.escrow += amount;

        match replaced {
            None => {
                self.bidder_count += 1;
                self.discovery.observe(bidder, entry);
                Ok(None)
            }
            Some(previous) => {
                // A replaced entry may have been counted by the trackers
                self.discovery = self.snapshot_discovery();
                self.escrow = self.release(previous.amount)?;
                Ok(Some(Payout {
                    account: bidder,
                    amount: previous.amount,
                }))
            }
        }
    }

    fn snapshot_discovery(&self) -> PriceDiscovery {
        PriceDiscovery::from_bids(self.bids.iter().map(|(bidder, entry)| (*bidder, *entry)))
    }

    fn release(&self, amount: Amount) -> Result<Amount, CustomContractError> {
        subtract(self.escrow, amount)
    }

    /// Determine winner and price from the full bid ledger.
    pub fn settle(&mut self, slot_time: Timestamp) -> Result<Settlement, CustomContractError> {
        self.ensure_initialized()?;
        ensure_eq!(self.phase, Phase::Active, CustomContractError::WrongPhase);
        ensure!(slot_time <= self.deadline, CustomContractError::Timeout);
        ensure!(
            self.bidder_count >= QUORUM,
            CustomContractError::QuorumNotReached
        );

        let discovery = self.snapshot_discovery();
        let leader = discovery
            .highest
            .ok_or(CustomContractError::QuorumNotReached)?;
        let settlement = Settlement {
            winner: leader.bidder,
            winning_bid_price: discovery.second_amount,
        };

        self.discovery = discovery;
        self.phase = Phase::Settled(settlement);
        Ok(settlement)
    }

    /// Close an auction that was not settled before its deadline.
    pub fn expire(&mut self, slot_time: Timestamp) -> Result<(), CustomContractError> {
        self.ensure_initialized()?;
        ensure_eq!(self.phase, Phase::Active, CustomContractError::WrongPhase);
        ensure!(
            slot_time > self.deadline,
            CustomContractError::DeadlineNotReached
        );
        self.phase = Phase::Expired;
        Ok(())
    }

    /// Post-settlement withdrawal. The winner gets the overpayment back, everybody else the
    /// full bid.
    pub fn withdraw(&mut self, bidder: AccountAddress) -> Result<Payout, CustomContractError> {
        self.ensure_initialized()?;
        let settlement = self.settlement().ok_or(CustomContractError::NotSettled)?;
        let bid = self
            .bid_of(&bidder)
            .ok_or(CustomContractError::NotABidder)?;
        ensure!(
            !self.settled_withdrawals.contains(&bidder),
            CustomContractError::AlreadyWithdrawn
        );

        let amount = if bidder == settlement.winner {
            subtract(bid, settlement.winning_bid_price)?
        } else {
            bid
        };

        self.settled_withdrawals.insert(bidder);
        self.escrow = self.release(amount)?;
        Ok(Payout {
            account: bidder,
            amount,
        })
    }

    /// Post-settlement owner proceeds: the winning bid price.
    pub fn owner_withdraw(&mut self) -> Result<Payout, CustomContractError> {
        self.ensure_initialized()?;
        let settlement = self.settlement().ok_or(CustomContractError::NotSettled)?;
        ensure!(
            !self.owner_proceeds_withdrawn,
            CustomContractError::AlreadySettledWithdrawn
        );

        self.owner_proceeds_withdrawn = true;
        self.escrow = self.release(settlement.winning_bid_price)?;
        Ok(Payout {
            account: self.owner,
            amount: settlement.winning_bid_price,
        })
    }

    /// Post-settlement prize delivery to the winner.
    pub fn claim_prize(&mut self, sender: AccountAddress) -> Result<PrizePayout, CustomContractError> {
        self.ensure_initialized()?;
        let settlement = self.settlement().ok_or(CustomContractError::NotSettled)?;
        ensure_eq!(sender, settlement.winner, CustomContractError::NotWinner);
        ensure!(!self.prize_claimed, CustomContractError::AlreadyClaimed);

        self.prize_claimed = true;
        Ok(self.release_prize(sender))
    }

    /// Post-expiry refund of the full bid.
    pub fn refund_bid(&mut self, bidder: AccountAddress) -> Result<Payout, CustomContractError> {
        self.ensure_initialized()?;
        ensure_eq!(self.phase, Phase::Expired, CustomContractError::NotExpired);
        let amount = self
            .bid_of(&bidder)
            .ok_or(CustomContractError::NotABidder)?;
        ensure!(
            self.expired_refunds.insert(bidder),
            CustomContractError::AlreadyRefunded
        );

        self.escrow = self.release(amount)?;
        Ok(Payout {
            account: bidder,
            amount,
        })
    }

    /// Post-expiry prize return to the owner.
    pub fn reclaim_prize(&mut self) -> Result<PrizePayout, CustomContractError> {
        self.ensure_initialized()?;
        ensure_eq!(self.phase, Phase::Expired, CustomContractError::NotExpired);
        ensure!(
            !self.owner_prize_reclaimed,
            CustomContractError::AlreadyReclaimed
        );

        self.owner_prize_reclaimed = true;
        Ok(self.release_prize(self.owner))
    }

    /// Pay out everything carried over to `account` from finished rounds.
    pub fn claim_pending(
        &mut self,
        account: AccountAddress,
    ) -> Result<(Option<Payout>, Option<PrizePayout>), CustomContractError> {
        let ccd = self.pending_claims.remove_and_get(&account);
        let prize = self.pending_prizes.remove_and_get(&account);
        ensure!(
            ccd.is_some() || prize.is_some(),
            CustomContractError::NothingPending
        );

        let payout = match ccd {
            Some(amount) => {
                self.escrow = self.release(amount)?;
                Some(Payout { account, amount })
            }
            None => None,
        };
        let prize_payout = prize.map(|amount| PrizePayout {
            account,
            token: self.token.clone(),
            amount,
        });

        Ok((payout, prize_payout))
    }

    /// Return prize tokens deposited and not committed to a round to the owner.
    pub fn reclaim_deposit(&mut self) -> Result<PrizePayout, CustomContractError> {
        ensure!(self.prize_deposit.0 > 0, CustomContractError::NothingPending);

        let amount = self.prize_deposit;
        self.prize_deposit = TokenAmountU64(0);
        Ok(PrizePayout {
            account: self.owner,
            token: self.token.clone(),
            amount,
        })
    }

    fn release_prize(&mut self, account: AccountAddress) -> PrizePayout {
        let amount = self.prize_escrow;
        self.prize_escrow = TokenAmountU64(0);
        PrizePayout {
            account,
            token: self.token.clone(),
            amount,
        }
    }
}

fn subtract(a: Amount, b: Amount) -> Result<Amount, CustomContractError> {
    a.micro_ccd
        .checked_sub(b.micro_ccd)
        .map(Amount::from_micro_ccd)
        .ok_or(CustomContractError::Underflow)
}
