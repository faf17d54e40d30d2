/// Tag for the Initialize event.
pub const INITIALIZE_TAG: u8 = u8::MAX - 5;

/// Tag for the Custom Biding event.
pub const BIDING_TAG: u8 = u8::MAX - 6;

/// Tag for the Settle event.
pub const SETTLE_TAG: u8 = u8::MAX - 7;

/// Tag for the Expire event.
pub const EXPIRE_TAG: u8 = u8::MAX - 8;

/// Tag for the bidder Withdraw event.
pub const WITHDRAW_TAG: u8 = u8::MAX - 9;

/// Tag for the Owner Withdraw event.
pub const OWNER_WITHDRAW_TAG: u8 = u8::MAX - 10;

/// Tag for the Claim Prize event.
pub const CLAIM_PRIZE_TAG: u8 = u8::MAX - 11;

/// Tag for the Refund Bid event.
pub const REFUND_TAG: u8 = u8::MAX - 12;

/// Tag for the Reclaim Prize event.
pub const RECLAIM_PRIZE_TAG: u8 = u8::MAX - 13;

/// Tag for the Reset event.
pub const RESET_TAG: u8 = u8::MAX - 14;

/// Tag for the prize Deposit event.
pub const DEPOSIT_TAG: u8 = u8::MAX - 15;

/// Tag for the Claim Pending event.
pub const CLAIM_PENDING_TAG: u8 = u8::MAX - 16;

/// Tag for the Reclaim Deposit event.
pub const RECLAIM_DEPOSIT_TAG: u8 = u8::MAX - 17;
