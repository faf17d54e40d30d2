use super::*;

/// The custom errors the contract can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Failed to invoke a contract (Error code: -4).
    InvokeContractError,
    /// Failed to invoke a transfer (Error code: -5).
    InvokeTransferError,
    /// Only account addresses can perform this action (Error code: -6).
    OnlyAccountAddress,
    /// Unauthorized (Error code: -7)
    Unauthorized,
    /// Owner is not allowed to perform this action (Error code: -8)
    OwnerForbidden,
    /// Attempt to call function on an uninitialized contract (Error code: -9)
    NotInitialized,
    /// Contract was already initialized (Error code: -10)
    AlreadyInitialized,
    /// Operation is not valid in the current auction phase (Error code: -11)
    WrongPhase,
    // Raised if bid is placed after the bidding deadline (Error code: -12)
    DeadlinePassed,
    // Raised if settlement is attempted after the bidding deadline (Error code: -13)
    Timeout,
    // Raised if the auction is expired before its deadline (Error code: -14)
    DeadlineNotReached,
    /// Not enough distinct bidders to settle the auction (Error code: -15)
    QuorumNotReached,
    // Raised if bid amount is zero (Error code: -16)
    BidTooLow,
    /// Sender never placed a bid (Error code: -17)
    NotABidder,
    /// Sender is not the auction winner (Error code: -18)
    NotWinner,
    /// Auction is not settled (Error code: -19)
    NotSettled,
    /// Auction is not expired (Error code: -20)
    NotExpired,
    /// Bid was already withdrawn after settlement (Error code: -21)
    AlreadyWithdrawn,
    /// Owner proceeds were already withdrawn (Error code: -22)
    AlreadySettledWithdrawn,
    /// Prize was already claimed (Error code: -23)
    AlreadyClaimed,
    /// Bid was already refunded after expiry (Error code: -24)
    AlreadyRefunded,
    /// Prize was already reclaimed by the owner (Error code: -25)
    AlreadyReclaimed,
    /// Prize amount must be positive (Error code: -26)
    InvalidPrize,
    /// Deposited prize tokens do not cover the prize amount (Error code: -27)
    InsufficientDeposit,
    /// Nothing is owed to the sender (Error code: -28)
    NothingPending,
    /// Unknown token (Error code: -29).
    UnknownToken,
    /// Incompatible contract (Error code: -30)
    Incompatible,
    /// Arithmetic overflow (Error code: -31)
    Overflow,
    /// Arithmetic underflow (Error code: -32)
    Underflow,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to contract invocations to CustomContractError.
impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(cce: CallContractError<T>) -> Self {
        match cce {
            CallContractError::MissingContract
            | CallContractError::MissingEntrypoint
            | CallContractError::MessageFailed => Self::Incompatible,
            _ => Self::InvokeContractError,
        }
    }
}

/// Mapping errors related to transfer invocations to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_call_errors() {
        claim_eq!(
            CustomContractError::from(CallContractError::<()>::MissingEntrypoint),
            CustomContractError::Incompatible
        );
        claim_eq!(
            CustomContractError::from(CallContractError::<()>::Trap),
            CustomContractError::InvokeContractError
        );
        claim_eq!(
            CustomContractError::from(TransferError::AmountTooLarge),
            CustomContractError::InvokeTransferError
        );
        claim_eq!(
            CustomContractError::from(LogError::Full),
            CustomContractError::LogFull
        );
    }
}
