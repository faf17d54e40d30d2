use concordium_std::*;

/// A recorded bid of a single participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub struct BidEntry {
    /// Bid amount, held in escrow by the contract.
    pub amount: Amount,
    /// Global order in which the bid was recorded. Lower wins ties.
    pub sequence: u32,
}

/// Current leader of the auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub struct Leader {
    pub bidder: AccountAddress,
    pub amount: Amount,
    pub sequence: u32,
}

/// Running highest and second highest bid trackers.
///
/// Every participant must be observed at most once. Replacing a participant's bid requires
/// rebuilding the trackers with [PriceDiscovery::from_bids].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub struct PriceDiscovery {
    /// Highest bid, earliest recorded on ties.
    pub highest: Option<Leader>,
    /// Highest bid among all participants except the leader.
    pub second_amount: Amount,
}

impl Default for PriceDiscovery {
    fn default() -> Self {
        Self {
            highest: None,
            second_amount: Amount::zero(),
        }
    }
}

impl PriceDiscovery {
    /// Rebuild trackers from a full snapshot of the bid ledger.
    pub fn from_bids<I: IntoIterator<Item = (AccountAddress, BidEntry)>>(bids: I) -> Self {
        let mut discovery = Self::default();
        for (bidder, entry) in bids {
            discovery.observe(bidder, entry);
        }
        discovery
    }

    /// Fold a participant that was not observed before into the trackers.
    pub fn observe(&mut self, bidder: AccountAddress, entry: BidEntry) {
        match self.highest {
            None => {
                self.highest = Some(Leader {
                    bidder,
                    amount: entry.amount,
                    sequence: entry.sequence,
                })
            }
            Some(leader) => {
                let takes_lead = entry.amount > leader.amount
                    || (entry.amount == leader.amount && entry.sequence < leader.sequence);
                if takes_lead {
                    self.second_amount = max_amount(self.second_amount, leader.amount);
                    self.highest = Some(Leader {
                        bidder,
                        amount: entry.amount,
                        sequence: entry.sequence,
                    });
                } else {
                    self.second_amount = max_amount(self.second_amount, entry.amount);
                }
            }
        }
    }
}

fn max_amount(a: Amount, b: Amount) -> Amount {
    if a >= b {
        a
    } else {
        b
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    const BIDDER_1: AccountAddress = AccountAddress([1; 32]);
    const BIDDER_2: AccountAddress = AccountAddress([2; 32]);
    const BIDDER_3: AccountAddress = AccountAddress([3; 32]);
    const BIDDER_4: AccountAddress = AccountAddress([4; 32]);

    fn entry(ccd: u64, sequence: u32) -> BidEntry {
        BidEntry {
            amount: Amount::from_ccd(ccd),
            sequence,
        }
    }

    #[concordium_test]
    fn test_ascending_bids() {
        let discovery = PriceDiscovery::from_bids(vec![
            (BIDDER_1, entry(1, 0)),
            (BIDDER_2, entry(2, 1)),
            (BIDDER_3, entry(3, 2)),
            (BIDDER_4, entry(4, 3)),
        ]);

        claim_eq!(
            discovery.highest,
            Some(Leader {
                bidder: BIDDER_4,
                amount: Amount::from_ccd(4),
                sequence: 3,
            })
        );
        claim_eq!(discovery.second_amount, Amount::from_ccd(3));
    }

    #[concordium_test]
    fn test_result_does_not_depend_on_iteration_order() {
        // Ledger iteration follows key order, not recording order
        let discovery = PriceDiscovery::from_bids(vec![
            (BIDDER_4, entry(7, 0)),
            (BIDDER_1, entry(9, 3)),
            (BIDDER_3, entry(2, 1)),
            (BIDDER_2, entry(5, 2)),
        ]);

        claim_eq!(discovery.highest.map(|leader| leader.bidder), Some(BIDDER_1));
        claim_eq!(discovery.second_amount, Amount::from_ccd(7));
    }

    #[concordium_test]
    fn test_tied_highest_bid() {
        let discovery = PriceDiscovery::from_bids(vec![
            (BIDDER_3, entry(5, 2)),
            (BIDDER_1, entry(1, 0)),
            (BIDDER_2, entry(5, 1)),
        ]);

        // Earliest recorded bidder wins and pays the tied value
        claim_eq!(discovery.highest.map(|leader| leader.bidder), Some(BIDDER_2));
        claim_eq!(discovery.second_amount, Amount::from_ccd(5));
    }

    #[concordium_test]
    fn test_empty_and_single_bid() {
        let discovery = PriceDiscovery::from_bids(Vec::<(AccountAddress, BidEntry)>::new());
        claim_eq!(discovery.highest, None);
        claim_eq!(discovery.second_amount, Amount::zero());

        let mut discovery = PriceDiscovery::default();
        discovery.observe(BIDDER_1, entry(3, 0));
        claim_eq!(discovery.highest.map(|leader| leader.amount), Some(Amount::from_ccd(3)));
        claim_eq!(discovery.second_amount, Amount::zero());
    }

    #[concordium_test]
    fn test_incremental_matches_rebuild() {
        let bids = vec![
            (BIDDER_2, entry(4, 0)),
            (BIDDER_1, entry(6, 1)),
            (BIDDER_4, entry(6, 2)),
            (BIDDER_3, entry(1, 3)),
        ];

        let mut incremental = PriceDiscovery::default();
        for (bidder, bid) in bids.iter() {
            incremental.observe(*bidder, *bid);
        }

        let mut reversed = bids.clone();
        reversed.reverse();

        claim_eq!(incremental, PriceDiscovery::from_bids(reversed));
        claim_eq!(incremental.highest.map(|leader| leader.bidder), Some(BIDDER_1));
        claim_eq!(incremental.second_amount, Amount::from_ccd(6));
    }
}
