use super::*;

pub type ContractResult<A> = Result<A, CustomContractError>;

/// Token ID type of the prize token.
/// CIS-2 fungible tokens commonly use an empty id, so a variable length id is accepted.
pub type ContractTokenId = TokenIdVec;

/// Token amount type of the prize token.
pub type ContractTokenAmount = TokenAmountU64;

/// Parameter of the CIS-2 `transfer` entrypoint specialized to the prize token types.
pub type TransferParameter = TransferParams<ContractTokenId, ContractTokenAmount>;

/// Parameter the CIS-2 token contract sends to the `onReceivingCIS2` hook.
pub type OnReceivingParameter = OnReceivingCis2Params<ContractTokenId, ContractTokenAmount>;

/// A CIS-2 token held in escrow: the token contract together with the token id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SchemaType)]
pub struct PrizeToken {
    /// Address of the CIS-2 token contract.
    pub contract: ContractAddress,
    /// Token identifier inside the token contract.
    pub id: ContractTokenId,
}
