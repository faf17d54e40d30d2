use commons::{ContractResult, CustomContractError, HostCis2TokenExt, OnReceivingParameter};
use concordium_cis2::{Receiver, TokenAmountU64};
use concordium_std::*;

use crate::events::*;
use crate::external::*;
use crate::state::{Payout, Phase, PrizePayout, State};
use crate::{BIDDING_WINDOW_DAYS, RECEIVE_HOOK};

/// Initialize an auction owned by the invoker. Bidding starts with `initialize`.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Prize amount is zero.
#[init(contract = "VickreyAuction", parameter = "InitParams")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params = InitParams::deserial(&mut ctx.parameter_cursor())?;
    ensure!(
        params.prize_amount.0 > 0,
        CustomContractError::InvalidPrize.into()
    );

    Ok(State::new(state_builder, params, ctx.init_origin()))
}

fn sender_account(ctx: &impl HasReceiveContext) -> ContractResult<AccountAddress> {
    match ctx.sender() {
        Address::Account(account) => Ok(account),
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress),
    }
}

fn ensure_owner<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    state: &State<S>,
) -> ContractResult<()> {
    ensure!(
        state.is_owner(&ctx.sender()),
        CustomContractError::Unauthorized
    );
    Ok(())
}

/// Move the prize of a new round into escrow.
fn fund_prize<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    funding: PrizeFunding,
) -> ContractResult<()> {
    if funding == PrizeFunding::Pull {
        let state = host.state();
        let token = state.token.clone();
        let amount = state.prize_amount;
        let owner = state.owner;

        // Tokens arrive through `onReceivingCIS2` and are credited to the deposit
        host.cis2_transfer(
            &token,
            amount,
            Address::Account(owner),
            Receiver::Contract(
                ctx.self_address(),
                OwnedReceiveName::new_unchecked(String::from(RECEIVE_HOOK)),
            ),
        )?;
    }

    host.state_mut().commit_prize()
}

fn transfer_payout<S: HasStateApi>(
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    payout: &Payout,
) -> ContractResult<()> {
    if payout.amount != Amount::zero() {
        host.invoke_transfer(&payout.account, payout.amount)?;
    }
    Ok(())
}

fn transfer_prize<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    payout: &PrizePayout,
) -> ContractResult<()> {
    if payout.amount.0 != 0 {
        host.cis2_transfer(
            &payout.token,
            payout.amount,
            Address::Contract(ctx.self_address()),
            Receiver::Account(payout.account),
        )?;
    }
    Ok(())
}

/// Open the first round and escrow the prize.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Sender is not the owner.
/// - Auction was already initialized.
/// - Prize could not be escrowed.
#[receive(
    mutable,
    contract = "VickreyAuction",
    name = "initialize",
    parameter = "PrizeFunding",
    enable_logger
)]
fn contract_initialize<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let funding: PrizeFunding = ctx.parameter_cursor().get()?;
    ensure_owner(ctx, host.state())?;

    let deadline = host.state_mut().initialize(ctx.metadata().slot_time())?;
    fund_prize(ctx, host, funding)?;

    let state = host.state();
    logger.log(&AuctionEvents::Initialize(RoundEvent {
        token: &state.token,
        prize_amount: state.prize_amount,
        deadline,
    }))?;

    Ok(())
}

/// Place or replace the bid of the sender. The attached CCD is the bid.
///
/// A replaced bid is refunded in the same call.
#[receive(
    mutable,
    payable,
    contract = "VickreyAuction",
    name = "bid",
    enable_logger
)]
fn contract_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let bidder = sender_account(ctx)?;

    let replaced = host
        .state_mut()
        .bid(ctx.metadata().slot_time(), bidder, amount)?;

    logger.log(&AuctionEvents::bid(
        &bidder,
        amount,
        replaced.as_ref().map(|refund| refund.amount),
    ))?;

    if let Some(refund) = replaced {
        transfer_payout(host, &refund)?;
    }

    Ok(())
}

/// Determine the winner and the price.
///
/// It rejects if:
/// - Sender is not the owner.
/// - Auction is not active or the deadline passed.
/// - Fewer than three distinct bidders took part.
#[receive(
    mutable,
    contract = "VickreyAuction",
    name = "settle",
    enable_logger
)]
fn contract_settle<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    ensure_owner(ctx, host.state())?;

    let settlement = host.state_mut().settle(ctx.metadata().slot_time())?;

    logger.log(&AuctionEvents::settle(
        &settlement.winner,
        settlement.winning_bid_price,
    ))?;

    Ok(())
}

/// Close an unsettled auction after its deadline. Anyone can call it.
#[receive(
    mutable,
    contract = "VickreyAuction",
    name = "expire",
    enable_logger
)]
fn contract_expire<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let state = host.state_mut();
    state.expire(ctx.metadata().slot_time())?;

    logger.log(&AuctionEvents::Expire(state.deadline))?;

    Ok(())
}

/// Withdraw the bid after settlement. The winner gets back the amount above the price.
#[receive(
    mutable,
    contract = "VickreyAuction",
    name = "withdraw",
    enable_logger
)]
fn contract_withdraw<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let bidder = sender_account(ctx)?;
    let payout = host.state_mut().withdraw(bidder)?;

    logger.log(&AuctionEvents::withdraw(&payout.account, payout.amount))?;

    transfer_payout(host, &payout)
}

/// Withdraw the winning bid price to the owner.
#[receive(
    mutable,
    contract = "VickreyAuction",
    name = "ownerWithdraw",
    enable_logger
)]
fn contract_owner_withdraw<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    ensure_owner(ctx, host.state())?;
    let payout = host.state_mut().owner_withdraw()?;

    logger.log(&AuctionEvents::owner_withdraw(
        &payout.account,
        payout.amount,
    ))?;

    transfer_payout(host, &payout)
}

/// Transfer the prize to the winner.
#[receive(
    mutable,
    contract = "VickreyAuction",
    name = "claimPrize",
    enable_logger
)]
fn contract_claim_prize<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let sender = sender_account(ctx)?;
    let prize = host.state_mut().claim_prize(sender)?;

    logger.log(&AuctionEvents::claim_prize(&prize.account, prize.amount))?;

    transfer_prize(ctx, host, &prize)
}

/// Refund the full bid of the sender after expiry.
#[receive(
    mutable,
    contract = "VickreyAuction",
    name = "refundBids",
    enable_logger
)]
fn contract_refund_bids<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let bidder = sender_account(ctx)?;
    let payout = host.state_mut().refund_bid(bidder)?;

    logger.log(&AuctionEvents::refund(&payout.account, payout.amount))?;

    transfer_payout(host, &payout)
}

/// Return the prize to the owner after expiry.
#[receive(
    mutable,
    contract = "VickreyAuction",
    name = "ownerReclaimPrize",
    enable_logger
)]
fn contract_owner_reclaim_prize<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    ensure_owner(ctx, host.state())?;
    let prize = host.state_mut().reclaim_prize()?;

    logger.log(&AuctionEvents::reclaim_prize(&prize.account, prize.amount))?;

    transfer_prize(ctx, host, &prize)
}

/// Start a new round once the previous one is settled or expired.
///
/// Payouts of the finished round that were not pulled yet stay claimable through
/// `claimPending`.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Sender is not the owner.
/// - Auction is still active.
/// - New prize amount is zero or the prize could not be escrowed.
#[receive(
    mutable,
    contract = "VickreyAuction",
    name = "reset",
    parameter = "ResetParams",
    enable_logger
)]
fn contract_reset<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: ResetParams = ctx.parameter_cursor().get()?;
    ensure_owner(ctx, host.state())?;

    let deadline = host
        .state_mut()
        .reset(ctx.metadata().slot_time(), params.prize_amount)?;
    fund_prize(ctx, host, params.funding)?;

    let state = host.state();
    logger.log(&AuctionEvents::Reset(RoundEvent {
        token: &state.token,
        prize_amount: state.prize_amount,
        deadline,
    }))?;

    Ok(())
}

/// Pay out CCD and prize tokens the sender was owed when a finished round was reset.
///
/// It rejects if:
/// - Sender is a contract.
/// - Nothing is pending for the sender.
/// - A transfer fails.
#[receive(
    mutable,
    contract = "VickreyAuction",
    name = "claimPending",
    enable_logger
)]
fn contract_claim_pending<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let account = sender_account(ctx)?;
    let (payout, prize) = host.state_mut().claim_pending(account)?;

    logger.log(&AuctionEvents::claim_pending(
        &account,
        payout.as_ref().map_or(Amount::zero(), |payout| payout.amount),
        prize.as_ref().map_or(TokenAmountU64(0), |prize| prize.amount),
    ))?;

    if let Some(payout) = payout {
        transfer_payout(host, &payout)?;
    }
    if let Some(prize) = prize {
        transfer_prize(ctx, host, &prize)?;
    }
    Ok(())
}

/// Return deposited prize tokens not committed to any round to the owner.
#[receive(
    mutable,
    contract = "VickreyAuction",
    name = "ownerReclaimDeposit",
    enable_logger
)]
fn contract_owner_reclaim_deposit<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    ensure_owner(ctx, host.state())?;
    let deposit = host.state_mut().reclaim_deposit()?;

    logger.log(&AuctionEvents::reclaim_deposit(
        &deposit.account,
        deposit.amount,
    ))?;

    transfer_prize(ctx, host, &deposit)
}

/// CIS-2 receive hook. Credits prize tokens sent by the owner.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Sender is not the prize token contract or the token id differs.
/// - Tokens do not come from the owner.
#[receive(
    mutable,
    contract = "VickreyAuction",
    name = "onReceivingCIS2",
    parameter = "OnReceivingParameter",
    enable_logger
)]
fn contract_on_receiving_cis2<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: OnReceivingParameter = ctx.parameter_cursor().get()?;
    let state = host.state();

    ensure!(
        ctx.sender() == Address::Contract(state.token.contract) && params.token_id == state.token.id,
        CustomContractError::UnknownToken
    );

    let from = match params.from {
        Address::Account(from) if from == state.owner => from,
        _ => bail!(CustomContractError::Unauthorized),
    };

    host.state_mut().deposit_prize(params.amount)?;

    logger.log(&AuctionEvents::deposit(&from, params.amount))?;

    Ok(())
}

#[receive(contract = "VickreyAuction", name = "viewPhase", return_value = "Phase")]
fn contract_view_phase<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Phase> {
    let state = host.state();
    state.ensure_initialized()?;
    Ok(state.phase)
}

#[receive(
    contract = "VickreyAuction",
    name = "viewWinner",
    return_value = "AccountAddress"
)]
fn contract_view_winner<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<AccountAddress> {
    host.state()
        .settlement()
        .map(|settlement| settlement.winner)
        .ok_or(CustomContractError::NotSettled)
}

#[receive(
    contract = "VickreyAuction",
    name = "viewWinningBidPrice",
    return_value = "Amount"
)]
fn contract_view_winning_bid_price<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Amount> {
    host.state()
        .settlement()
        .map(|settlement| settlement.winning_bid_price)
        .ok_or(CustomContractError::NotSettled)
}

/// Recorded bid of the given account in the current round.
#[receive(
    contract = "VickreyAuction",
    name = "viewBid",
    parameter = "AccountAddress",
    return_value = "Amount"
)]
fn contract_view_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Amount> {
    let bidder: AccountAddress = ctx.parameter_cursor().get()?;
    host.state()
        .bid_of(&bidder)
        .ok_or(CustomContractError::NotABidder)
}

/// Payouts of the given account carried over from finished rounds.
#[receive(
    contract = "VickreyAuction",
    name = "viewPending",
    parameter = "AccountAddress",
    return_value = "PendingView"
)]
fn contract_view_pending<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<PendingView> {
    let account: AccountAddress = ctx.parameter_cursor().get()?;
    let state = host.state();

    Ok(PendingView {
        amount: state
            .pending_claims
            .get(&account)
            .map_or(Amount::zero(), |amount| *amount),
        prize_amount: state
            .pending_prizes
            .get(&account)
            .map_or(TokenAmountU64(0), |amount| *amount),
    })
}

#[receive(contract = "VickreyAuction", name = "view", return_value = "AuctionView")]
fn contract_view<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<AuctionView> {
    let state = host.state();

    Ok(AuctionView {
        initialized: state.initialized,
        deadline: state.deadline,
        phase: state.phase,
        settlement: state.settlement(),
        discovery: state.discovery,
        bidder_count: state.bidder_count,
        owner_proceeds_withdrawn: state.owner_proceeds_withdrawn,
        prize_claimed: state.prize_claimed,
        owner_prize_reclaimed: state.owner_prize_reclaimed,
        escrow: state.escrow,
        prize_escrow: state.prize_escrow,
        prize_deposit: state.prize_deposit,
    })
}

#[receive(
    contract = "VickreyAuction",
    name = "viewConfig",
    return_value = "ConfigView"
)]
fn contract_view_config<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ConfigView> {
    let state = host.state();

    Ok(ConfigView {
        owner: state.owner,
        token: state.token.clone(),
        prize_amount: state.prize_amount,
        bidding_window: Duration::from_days(BIDDING_WINDOW_DAYS),
    })
}

#[concordium_cfg_test]
mod tests {
    use commons::{
        ContractTokenAmount, PrizeToken, TransferParameter, BIDING_TAG, CLAIM_PENDING_TAG,
        DEPOSIT_TAG, INITIALIZE_TAG, RECLAIM_DEPOSIT_TAG, RESET_TAG, SETTLE_TAG,
    };
    use concordium_cis2::{AdditionalData, TokenAmountU64, TokenIdVec, TransferParams};
    use test_infrastructure::*;

    use super::*;
    use crate::pricing::Leader;
    use crate::state::Settlement;

    const OWNER: AccountAddress = AccountAddress([0; 32]);
    const BIDDER_1: AccountAddress = AccountAddress([1; 32]);
    const BIDDER_2: AccountAddress = AccountAddress([2; 32]);
    const BIDDER_3: AccountAddress = AccountAddress([3; 32]);
    const BIDDER_4: AccountAddress = AccountAddress([4; 32]);

    const TOKEN_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const OTHER_CONTRACT: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };
    const SELF_ADDRESS: ContractAddress = ContractAddress {
        index: 10,
        subindex: 0,
    };

    const PRIZE: ContractTokenAmount = TokenAmountU64(1_000);

    const START_MILLIS: u64 = 1_000;
    const WINDOW_MILLIS: u64 = 7 * 24 * 60 * 60 * 1_000;

    fn start_time() -> Timestamp {
        Timestamp::from_timestamp_millis(START_MILLIS)
    }

    fn deadline() -> Timestamp {
        Timestamp::from_timestamp_millis(START_MILLIS + WINDOW_MILLIS)
    }

    fn after_deadline() -> Timestamp {
        Timestamp::from_timestamp_millis(START_MILLIS + WINDOW_MILLIS + 1)
    }

    fn prize_token() -> PrizeToken {
        PrizeToken {
            contract: TOKEN_CONTRACT,
            id: TokenIdVec(vec![]),
        }
    }

    fn init_params() -> InitParams {
        InitParams {
            token: prize_token(),
            prize_amount: PRIZE,
        }
    }

    fn default_host() -> TestHost<State<TestStateApi>> {
        let mut state_builder = TestStateBuilder::new();
        let state = State::new(&mut state_builder, init_params(), OWNER);
        TestHost::new(state, state_builder)
    }

    fn receive_ctx<'a>(sender: Address, slot_time: Timestamp) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender)
            .set_self_address(SELF_ADDRESS)
            .set_metadata_slot_time(slot_time);
        ctx
    }

    fn deposit(
        host: &mut TestHost<State<TestStateApi>>,
        sender: ContractAddress,
        from: Address,
        amount: ContractTokenAmount,
    ) -> ContractResult<()> {
        let params = OnReceivingParameter {
            token_id: TokenIdVec(vec![]),
            amount,
            from,
            data: AdditionalData::empty(),
        };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Contract(sender), start_time());
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();

        contract_on_receiving_cis2(&ctx, host, &mut logger)
    }

    fn initialize(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
        funding: PrizeFunding,
    ) -> ContractResult<()> {
        let bytes = to_bytes(&funding);
        let mut ctx = receive_ctx(Address::Account(sender), start_time());
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();

        contract_initialize(&ctx, host, &mut logger)
    }

    fn initialized_host() -> TestHost<State<TestStateApi>> {
        let mut host = default_host();
        claim_eq!(
            deposit(&mut host, TOKEN_CONTRACT, Address::Account(OWNER), PRIZE),
            Ok(())
        );
        claim_eq!(initialize(&mut host, OWNER, PrizeFunding::Deposit), Ok(()));
        host
    }

    fn bid(
        host: &mut TestHost<State<TestStateApi>>,
        bidder: Address,
        amount: Amount,
        slot_time: Timestamp,
    ) -> ContractResult<()> {
        let ctx = receive_ctx(bidder, slot_time);
        let balance = host.self_balance();
        host.set_self_balance(balance + amount);
        let mut logger = TestLogger::init();

        contract_bid(&ctx, host, amount, &mut logger)
    }

    fn bid_ccd(host: &mut TestHost<State<TestStateApi>>, bidder: AccountAddress, ccd: u64) {
        claim_eq!(
            bid(host, Address::Account(bidder), Amount::from_ccd(ccd), start_time()),
            Ok(())
        );
    }

    type Entrypoint = fn(
        &TestReceiveContext<'static>,
        &mut TestHost<State<TestStateApi>>,
        &mut TestLogger,
    ) -> ContractResult<()>;

    fn call(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
        slot_time: Timestamp,
        entrypoint: Entrypoint,
    ) -> ContractResult<()> {
        let ctx = receive_ctx(Address::Account(sender), slot_time);
        let mut logger = TestLogger::init();
        entrypoint(&ctx, host, &mut logger)
    }

    /// Bidders 1 to 4 bid 1, 2, 3 and 4 CCD and the owner settles.
    fn settled_host() -> TestHost<State<TestStateApi>> {
        let mut host = initialized_host();
        bid_ccd(&mut host, BIDDER_1, 1);
        bid_ccd(&mut host, BIDDER_2, 2);
        bid_ccd(&mut host, BIDDER_3, 3);
        bid_ccd(&mut host, BIDDER_4, 4);
        claim_eq!(
            call(&mut host, OWNER, start_time(), contract_settle),
            Ok(())
        );
        host
    }

    fn expect_prize_transfer(host: &mut TestHost<State<TestStateApi>>, to: AccountAddress) {
        expect_token_transfer(host, to, PRIZE)
    }

    fn expect_token_transfer(
        host: &mut TestHost<State<TestStateApi>>,
        to: AccountAddress,
        amount: ContractTokenAmount,
    ) {
        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(move |parameter, _, _, _: &mut State<TestStateApi>| {
                let TransferParams(transfers) =
                    TransferParameter::deserial(&mut Cursor::new(parameter))
                        .map_err(|_| CallContractError::Trap)?;
                let valid = transfers.len() == 1
                    && transfers[0].amount == amount
                    && transfers[0].from == Address::Contract(SELF_ADDRESS)
                    && transfers[0].to.address() == Address::Account(to);
                if !valid {
                    return Err(CallContractError::Trap);
                }
                Ok((false, ()))
            }),
        );
    }

    /// Token contract pulling the prize from the owner and calling back the receive hook.
    fn pull_prize(host: &mut TestHost<State<TestStateApi>>) {
        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(
                |parameter, _amount, _balance, state: &mut State<TestStateApi>| {
                    let TransferParams(transfers) =
                        TransferParameter::deserial(&mut Cursor::new(parameter))
                            .map_err(|_| CallContractError::Trap)?;
                    let valid = transfers.len() == 1
                        && transfers[0].from == Address::Account(OWNER)
                        && transfers[0].to.address() == Address::Contract(SELF_ADDRESS)
                        && transfers[0].amount == PRIZE;
                    if !valid {
                        return Err(CallContractError::Trap);
                    }
                    state.prize_deposit = TokenAmountU64(state.prize_deposit.0 + PRIZE.0);
                    Ok((true, ()))
                },
            ),
        );
    }

    fn pending_of(host: &TestHost<State<TestStateApi>>, account: AccountAddress) -> PendingView {
        let bytes = to_bytes(&account);
        let mut ctx = receive_ctx(Address::Account(account), start_time());
        ctx.set_parameter(&bytes);
        contract_view_pending(&ctx, host).expect_report("Pending view failed")
    }

    fn reject_token_transfer(host: &mut TestHost<State<TestStateApi>>) {
        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(|_, _, _, _: &mut State<TestStateApi>| {
                Err::<(bool, ()), _>(CallContractError::Trap)
            }),
        );
    }

    fn total_transfers(host: &TestHost<State<TestStateApi>>) -> Amount {
        host.get_transfers()
            .iter()
            .fold(Amount::zero(), |total, (_, amount)| total + *amount)
    }

    #[concordium_test]
    fn test_init() {
        let params = init_params();
        let bytes = to_bytes(&params);
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(OWNER);
        ctx.set_parameter(&bytes);
        let mut state_builder = TestStateBuilder::new();

        let state = contract_init(&ctx, &mut state_builder).expect_report("Init failed");

        claim_eq!(state.owner, OWNER);
        claim_eq!(state.token, prize_token());
        claim_eq!(state.prize_amount, PRIZE);
        claim!(!state.initialized);
        claim_eq!(state.escrow, Amount::zero());
    }

    #[concordium_test]
    fn test_init_zero_prize() {
        let params = InitParams {
            token: prize_token(),
            prize_amount: TokenAmountU64(0),
        };
        let bytes = to_bytes(&params);
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(OWNER);
        ctx.set_parameter(&bytes);
        let mut state_builder = TestStateBuilder::new();

        let result = contract_init(&ctx, &mut state_builder).map(|_| ());

        claim_eq!(result, Err(CustomContractError::InvalidPrize.into()));
    }

    #[concordium_test]
    fn test_initialize_with_deposit() {
        let mut host = default_host();
        claim_eq!(
            deposit(&mut host, TOKEN_CONTRACT, Address::Account(OWNER), PRIZE),
            Ok(())
        );

        let bytes = to_bytes(&PrizeFunding::Deposit);
        let mut ctx = receive_ctx(Address::Account(OWNER), start_time());
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_initialize(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        let state = host.state();
        claim!(state.initialized);
        claim_eq!(state.phase, Phase::Active);
        claim_eq!(state.deadline, deadline());
        claim_eq!(state.prize_escrow, PRIZE);
        claim_eq!(state.prize_deposit, TokenAmountU64(0));
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(logger.logs[0][0], INITIALIZE_TAG);
    }

    #[concordium_test]
    fn test_initialize_with_pull() {
        let mut host = default_host();
        pull_prize(&mut host);

        claim_eq!(initialize(&mut host, OWNER, PrizeFunding::Pull), Ok(()));
        claim_eq!(host.state().prize_escrow, PRIZE);
        claim_eq!(host.state().prize_deposit, TokenAmountU64(0));
    }

    #[concordium_test]
    fn test_initialize_pull_rejected() {
        let mut host = default_host();
        reject_token_transfer(&mut host);

        claim_eq!(
            initialize(&mut host, OWNER, PrizeFunding::Pull),
            Err(CustomContractError::InvokeContractError)
        );
    }

    #[concordium_test]
    fn test_initialize_without_deposit() {
        let mut host = default_host();
        claim_eq!(
            deposit(
                &mut host,
                TOKEN_CONTRACT,
                Address::Account(OWNER),
                TokenAmountU64(999)
            ),
            Ok(())
        );

        claim_eq!(
            initialize(&mut host, OWNER, PrizeFunding::Deposit),
            Err(CustomContractError::InsufficientDeposit)
        );
    }

    #[concordium_test]
    fn test_initialize_unauthorized() {
        let mut host = default_host();

        claim_eq!(
            initialize(&mut host, BIDDER_1, PrizeFunding::Deposit),
            Err(CustomContractError::Unauthorized)
        );
    }

    #[concordium_test]
    fn test_initialize_twice() {
        let mut host = initialized_host();

        claim_eq!(
            initialize(&mut host, OWNER, PrizeFunding::Deposit),
            Err(CustomContractError::AlreadyInitialized)
        );
    }

    #[concordium_test]
    fn test_bid_not_initialized() {
        let mut host = default_host();

        claim_eq!(
            bid(
                &mut host,
                Address::Account(BIDDER_1),
                Amount::from_ccd(1),
                start_time()
            ),
            Err(CustomContractError::NotInitialized)
        );
    }

    #[concordium_test]
    fn test_bid() {
        let mut host = initialized_host();
        let ctx = receive_ctx(Address::Account(BIDDER_1), start_time());
        host.set_self_balance(Amount::from_ccd(5));
        let mut logger = TestLogger::init();

        let result = contract_bid(&ctx, &mut host, Amount::from_ccd(5), &mut logger);

        claim_eq!(result, Ok(()));
        let state = host.state();
        claim_eq!(state.bid_of(&BIDDER_1), Some(Amount::from_ccd(5)));
        claim_eq!(state.bidder_count, 1);
        claim_eq!(state.escrow, Amount::from_ccd(5));
        claim_eq!(
            state.discovery.highest,
            Some(Leader {
                bidder: BIDDER_1,
                amount: Amount::from_ccd(5),
                sequence: 0,
            })
        );
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(logger.logs[0][0], BIDING_TAG);
        claim!(host.get_transfers().is_empty());
    }

    #[concordium_test]
    fn test_bid_rejections() {
        let mut host = initialized_host();

        claim_eq!(
            bid(
                &mut host,
                Address::Account(OWNER),
                Amount::from_ccd(1),
                start_time()
            ),
            Err(CustomContractError::OwnerForbidden)
        );
        claim_eq!(
            bid(
                &mut host,
                Address::Account(BIDDER_1),
                Amount::zero(),
                start_time()
            ),
            Err(CustomContractError::BidTooLow)
        );
        claim_eq!(
            bid(
                &mut host,
                Address::Contract(OTHER_CONTRACT),
                Amount::from_ccd(1),
                start_time()
            ),
            Err(CustomContractError::OnlyAccountAddress)
        );
    }

    #[concordium_test]
    fn test_bid_at_deadline() {
        let mut host = initialized_host();

        claim_eq!(
            bid(
                &mut host,
                Address::Account(BIDDER_1),
                Amount::from_ccd(1),
                deadline()
            ),
            Ok(())
        );
        claim_eq!(
            bid(
                &mut host,
                Address::Account(BIDDER_2),
                Amount::from_ccd(1),
                after_deadline()
            ),
            Err(CustomContractError::DeadlinePassed)
        );
    }

    #[concordium_test]
    fn test_rebid_refunds_previous_bid() {
        let mut host = initialized_host();
        bid_ccd(&mut host, BIDDER_1, 5);
        bid_ccd(&mut host, BIDDER_2, 3);

        // Lowering the leading bid hands the lead to the second bidder
        bid_ccd(&mut host, BIDDER_1, 2);

        claim!(host.transfer_occurred(&BIDDER_1, Amount::from_ccd(5)));
        let state = host.state();
        claim_eq!(state.bid_of(&BIDDER_1), Some(Amount::from_ccd(2)));
        claim_eq!(state.bidder_count, 2);
        claim_eq!(state.escrow, Amount::from_ccd(5));
        claim_eq!(
            state.discovery.highest.map(|leader| leader.bidder),
            Some(BIDDER_2)
        );
        claim_eq!(state.discovery.second_amount, Amount::from_ccd(2));
        claim_eq!(host.self_balance(), Amount::from_ccd(5));
    }

    #[concordium_test]
    fn test_settle_four_bidders() {
        let mut host = initialized_host();
        bid_ccd(&mut host, BIDDER_1, 1);
        bid_ccd(&mut host, BIDDER_2, 2);
        bid_ccd(&mut host, BIDDER_3, 3);
        bid_ccd(&mut host, BIDDER_4, 4);

        let ctx = receive_ctx(Address::Account(OWNER), start_time());
        let mut logger = TestLogger::init();
        let result = contract_settle(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(
            host.state().phase,
            Phase::Settled(Settlement {
                winner: BIDDER_4,
                winning_bid_price: Amount::from_ccd(3),
            })
        );
        claim_eq!(logger.logs[0][0], SETTLE_TAG);
        claim_eq!(
            contract_view_winner(&ctx, &host),
            Ok(BIDDER_4)
        );
        claim_eq!(
            contract_view_winning_bid_price(&ctx, &host),
            Ok(Amount::from_ccd(3))
        );
    }

    #[concordium_test]
    fn test_full_settlement_payouts() {
        let mut host = settled_host();

        for bidder in [BIDDER_1, BIDDER_2, BIDDER_3, BIDDER_4].iter() {
            claim_eq!(
                call(&mut host, *bidder, start_time(), contract_withdraw),
                Ok(())
            );
        }
        claim_eq!(
            call(&mut host, OWNER, start_time(), contract_owner_withdraw),
            Ok(())
        );
        expect_prize_transfer(&mut host, BIDDER_4);
        claim_eq!(
            call(&mut host, BIDDER_4, start_time(), contract_claim_prize),
            Ok(())
        );

        claim!(host.transfer_occurred(&BIDDER_1, Amount::from_ccd(1)));
        claim!(host.transfer_occurred(&BIDDER_2, Amount::from_ccd(2)));
        claim!(host.transfer_occurred(&BIDDER_3, Amount::from_ccd(3)));
        claim!(host.transfer_occurred(&BIDDER_4, Amount::from_ccd(1)));
        claim!(host.transfer_occurred(&OWNER, Amount::from_ccd(3)));

        // Everything that came in went out
        claim_eq!(total_transfers(&host), Amount::from_ccd(10));
        claim_eq!(host.self_balance(), Amount::zero());
        claim_eq!(host.state().escrow, Amount::zero());
        claim_eq!(host.state().prize_escrow, TokenAmountU64(0));
        claim!(host.state().prize_claimed);
        claim!(host.state().owner_proceeds_withdrawn);
    }

    #[concordium_test]
    fn test_settlement_replays() {
        let mut host = settled_host();
        expect_prize_transfer(&mut host, BIDDER_4);

        claim_eq!(
            call(&mut host, BIDDER_2, start_time(), contract_withdraw),
            Ok(())
        );
        claim_eq!(
            call(&mut host, BIDDER_2, start_time(), contract_withdraw),
            Err(CustomContractError::AlreadyWithdrawn)
        );
        claim_eq!(
            call(&mut host, OWNER, start_time(), contract_owner_withdraw),
            Ok(())
        );
        claim_eq!(
            call(&mut host, OWNER, start_time(), contract_owner_withdraw),
            Err(CustomContractError::AlreadySettledWithdrawn)
        );
        claim_eq!(
            call(&mut host, BIDDER_4, start_time(), contract_claim_prize),
            Ok(())
        );
        claim_eq!(
            call(&mut host, BIDDER_4, start_time(), contract_claim_prize),
            Err(CustomContractError::AlreadyClaimed)
        );

        claim_eq!(host.get_transfers().len(), 2);
    }

    #[concordium_test]
    fn test_settlement_payout_rejections() {
        let mut host = settled_host();

        claim_eq!(
            call(&mut host, OWNER, start_time(), contract_withdraw),
            Err(CustomContractError::NotABidder)
        );
        claim_eq!(
            call(&mut host, BIDDER_3, start_time(), contract_claim_prize),
            Err(CustomContractError::NotWinner)
        );
        claim_eq!(
            call(&mut host, BIDDER_4, start_time(), contract_owner_withdraw),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(
            call(&mut host, BIDDER_1, start_time(), contract_refund_bids),
            Err(CustomContractError::NotExpired)
        );
        claim_eq!(
            call(&mut host, OWNER, after_deadline(), contract_expire),
            Err(CustomContractError::WrongPhase)
        );
        claim_eq!(
            bid(
                &mut host,
                Address::Account(BIDDER_1),
                Amount::from_ccd(9),
                start_time()
            ),
            Err(CustomContractError::WrongPhase)
        );
    }

    #[concordium_test]
    fn test_payouts_before_settlement() {
        let mut host = initialized_host();
        bid_ccd(&mut host, BIDDER_1, 1);

        claim_eq!(
            call(&mut host, BIDDER_1, start_time(), contract_withdraw),
            Err(CustomContractError::NotSettled)
        );
        claim_eq!(
            call(&mut host, OWNER, start_time(), contract_owner_withdraw),
            Err(CustomContractError::NotSettled)
        );
        claim_eq!(
            call(&mut host, BIDDER_1, start_time(), contract_claim_prize),
            Err(CustomContractError::NotSettled)
        );
        claim_eq!(
            contract_view_winner(&receive_ctx(Address::Account(OWNER), start_time()), &host),
            Err(CustomContractError::NotSettled)
        );
    }

    #[concordium_test]
    fn test_tied_winner_pays_tied_value() {
        let mut host = initialized_host();
        bid_ccd(&mut host, BIDDER_1, 5);
        bid_ccd(&mut host, BIDDER_2, 5);
        bid_ccd(&mut host, BIDDER_3, 1);

        claim_eq!(
            call(&mut host, OWNER, start_time(), contract_settle),
            Ok(())
        );
        claim_eq!(
            host.state().settlement(),
            Some(Settlement {
                winner: BIDDER_1,
                winning_bid_price: Amount::from_ccd(5),
            })
        );

        // Nothing left above the price, no transfer is made
        claim_eq!(
            call(&mut host, BIDDER_1, start_time(), contract_withdraw),
            Ok(())
        );
        claim!(host.get_transfers().is_empty());
    }

    #[concordium_test]
    fn test_quorum() {
        let mut host = initialized_host();
        bid_ccd(&mut host, BIDDER_1, 1);
        bid_ccd(&mut host, BIDDER_2, 2);

        claim_eq!(
            call(&mut host, OWNER, start_time(), contract_settle),
            Err(CustomContractError::QuorumNotReached)
        );

        // Rebidding does not add a participant
        bid_ccd(&mut host, BIDDER_2, 3);
        claim_eq!(
            call(&mut host, OWNER, start_time(), contract_settle),
            Err(CustomContractError::QuorumNotReached)
        );

        bid_ccd(&mut host, BIDDER_3, 3);
        claim_eq!(
            call(&mut host, OWNER, start_time(), contract_settle),
            Ok(())
        );
        claim_eq!(
            host.state().settlement(),
            Some(Settlement {
                winner: BIDDER_2,
                winning_bid_price: Amount::from_ccd(3),
            })
        );
    }

    #[concordium_test]
    fn test_settle_rejections() {
        let mut host = initialized_host();
        bid_ccd(&mut host, BIDDER_1, 1);
        bid_ccd(&mut host, BIDDER_2, 2);
        bid_ccd(&mut host, BIDDER_3, 3);

        claim_eq!(
            call(&mut host, BIDDER_1, start_time(), contract_settle),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(
            call(&mut host, OWNER, after_deadline(), contract_settle),
            Err(CustomContractError::Timeout)
        );
    }

    #[concordium_test]
    fn test_settle_at_deadline() {
        let mut host = initialized_host();
        bid_ccd(&mut host, BIDDER_1, 1);
        bid_ccd(&mut host, BIDDER_2, 2);
        bid_ccd(&mut host, BIDDER_3, 3);

        claim_eq!(call(&mut host, OWNER, deadline(), contract_settle), Ok(()));
        claim_eq!(
            host.state().settlement(),
            Some(Settlement {
                winner: BIDDER_3,
                winning_bid_price: Amount::from_ccd(2),
            })
        );
    }

    #[concordium_test]
    fn test_expiry_scenario() {
        let mut host = initialized_host();
        bid_ccd(&mut host, BIDDER_1, 7);

        claim_eq!(
            bid(
                &mut host,
                Address::Account(BIDDER_2),
                Amount::from_ccd(8),
                after_deadline()
            ),
            Err(CustomContractError::DeadlinePassed)
        );
        // Rejected bid is bounced back by the chain
        host.set_self_balance(Amount::from_ccd(7));

        claim_eq!(
            call(&mut host, BIDDER_2, deadline(), contract_expire),
            Err(CustomContractError::DeadlineNotReached)
        );
        claim_eq!(
            call(&mut host, BIDDER_2, after_deadline(), contract_expire),
            Ok(())
        );
        claim_eq!(host.state().phase, Phase::Expired);

        claim_eq!(
            call(&mut host, BIDDER_1, after_deadline(), contract_refund_bids),
            Ok(())
        );
        claim!(host.transfer_occurred(&BIDDER_1, Amount::from_ccd(7)));

        expect_prize_transfer(&mut host, OWNER);
        claim_eq!(
            call(
                &mut host,
                OWNER,
                after_deadline(),
                contract_owner_reclaim_prize
            ),
            Ok(())
        );

        let state = host.state();
        claim_eq!(state.escrow, Amount::zero());
        claim_eq!(state.prize_escrow, TokenAmountU64(0));
        claim!(state.owner_prize_reclaimed);
        claim_eq!(host.self_balance(), Amount::zero());
    }

    #[concordium_test]
    fn test_expiry_replays() {
        let mut host = initialized_host();
        bid_ccd(&mut host, BIDDER_1, 7);
        claim_eq!(
            call(&mut host, BIDDER_1, after_deadline(), contract_expire),
            Ok(())
        );
        expect_prize_transfer(&mut host, OWNER);

        claim_eq!(
            call(&mut host, BIDDER_1, after_deadline(), contract_refund_bids),
            Ok(())
        );
        claim_eq!(
            call(&mut host, BIDDER_1, after_deadline(), contract_refund_bids),
            Err(CustomContractError::AlreadyRefunded)
        );
        claim_eq!(
            call(&mut host, BIDDER_2, after_deadline(), contract_refund_bids),
            Err(CustomContractError::NotABidder)
        );
        claim_eq!(
            call(
                &mut host,
                BIDDER_1,
                after_deadline(),
                contract_owner_reclaim_prize
            ),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(
            call(
                &mut host,
                OWNER,
                after_deadline(),
                contract_owner_reclaim_prize
            ),
            Ok(())
        );
        claim_eq!(
            call(
                &mut host,
                OWNER,
                after_deadline(),
                contract_owner_reclaim_prize
            ),
            Err(CustomContractError::AlreadyReclaimed)
        );
        claim_eq!(
            call(&mut host, BIDDER_1, after_deadline(), contract_withdraw),
            Err(CustomContractError::NotSettled)
        );
        claim_eq!(
            call(&mut host, OWNER, after_deadline(), contract_settle),
            Err(CustomContractError::WrongPhase)
        );
    }

    #[concordium_test]
    fn test_failed_transfer() {
        let mut host = settled_host();
        host.set_self_balance(Amount::zero());

        claim_eq!(
            call(&mut host, BIDDER_1, start_time(), contract_withdraw),
            Err(CustomContractError::InvokeTransferError)
        );
    }

    #[concordium_test]
    fn test_escrow_underflow() {
        let mut host = settled_host();
        host.state_mut().escrow = Amount::from_ccd(1);

        claim_eq!(
            call(&mut host, BIDDER_2, start_time(), contract_withdraw),
            Err(CustomContractError::Underflow)
        );
    }

    #[concordium_test]
    fn test_failed_prize_claim() {
        let mut host = settled_host();
        reject_token_transfer(&mut host);

        claim_eq!(
            call(&mut host, BIDDER_4, start_time(), contract_claim_prize),
            Err(CustomContractError::InvokeContractError)
        );
    }

    fn reset(
        host: &mut TestHost<State<TestStateApi>>,
        slot_time: Timestamp,
        params: &ResetParams,
    ) -> ContractResult<()> {
        let bytes = to_bytes(params);
        let mut ctx = receive_ctx(Address::Account(OWNER), slot_time);
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_reset(&ctx, host, &mut logger);
        if result.is_ok() {
            claim_eq!(logger.logs[0][0], RESET_TAG);
        }
        result
    }

    #[concordium_test]
    fn test_reset() {
        let mut host = settled_host();
        let params = ResetParams {
            funding: PrizeFunding::Deposit,
            prize_amount: Some(TokenAmountU64(500)),
        };

        claim_eq!(
            call(&mut host, BIDDER_2, start_time(), contract_withdraw),
            Ok(())
        );
        claim_eq!(
            deposit(
                &mut host,
                TOKEN_CONTRACT,
                Address::Account(OWNER),
                TokenAmountU64(500)
            ),
            Ok(())
        );
        claim_eq!(reset(&mut host, after_deadline(), &params), Ok(()));

        let state = host.state();
        claim_eq!(state.phase, Phase::Active);
        claim_eq!(
            state.deadline,
            Timestamp::from_timestamp_millis(START_MILLIS + 2 * WINDOW_MILLIS + 1)
        );
        claim_eq!(state.prize_amount, TokenAmountU64(500));
        claim_eq!(state.prize_escrow, TokenAmountU64(500));
        claim_eq!(state.bidder_count, 0);
        claim_eq!(state.bid_of(&BIDDER_4), None);
        claim_eq!(state.discovery.highest, None);
        claim!(!state.prize_claimed);
        claim!(!state.owner_proceeds_withdrawn);
        claim_eq!(state.settlement(), None);
        // Unpaid bids and proceeds of the settled round stay escrowed
        claim_eq!(state.escrow, Amount::from_ccd(8));

        claim_eq!(
            pending_of(&host, BIDDER_1),
            PendingView {
                amount: Amount::from_ccd(1),
                prize_amount: TokenAmountU64(0),
            }
        );
        claim_eq!(
            pending_of(&host, BIDDER_2),
            PendingView {
                amount: Amount::zero(),
                prize_amount: TokenAmountU64(0),
            }
        );
        claim_eq!(
            pending_of(&host, BIDDER_4),
            PendingView {
                amount: Amount::from_ccd(1),
                prize_amount: PRIZE,
            }
        );
        claim_eq!(pending_of(&host, OWNER).amount, Amount::from_ccd(3));

        // Previous bidders take part again
        claim_eq!(
            bid(
                &mut host,
                Address::Account(BIDDER_1),
                Amount::from_ccd(2),
                after_deadline()
            ),
            Ok(())
        );
        claim_eq!(
            call(&mut host, BIDDER_1, after_deadline(), contract_withdraw),
            Err(CustomContractError::NotSettled)
        );
    }

    #[concordium_test]
    fn test_reset_pays_previous_claimants() {
        let mut host = settled_host();
        claim_eq!(
            deposit(&mut host, TOKEN_CONTRACT, Address::Account(OWNER), PRIZE),
            Ok(())
        );
        let params = ResetParams {
            funding: PrizeFunding::Deposit,
            prize_amount: None,
        };
        claim_eq!(reset(&mut host, after_deadline(), &params), Ok(()));

        for (bidder, ccd) in [(BIDDER_1, 1), (BIDDER_2, 2), (BIDDER_3, 3)].iter() {
            claim_eq!(
                call(&mut host, *bidder, after_deadline(), contract_claim_pending),
                Ok(())
            );
            claim!(host.transfer_occurred(bidder, Amount::from_ccd(*ccd)));
        }
        claim_eq!(
            call(&mut host, OWNER, after_deadline(), contract_claim_pending),
            Ok(())
        );
        claim!(host.transfer_occurred(&OWNER, Amount::from_ccd(3)));

        expect_prize_transfer(&mut host, BIDDER_4);
        let ctx = receive_ctx(Address::Account(BIDDER_4), after_deadline());
        let mut logger = TestLogger::init();
        claim_eq!(
            contract_claim_pending(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim!(host.transfer_occurred(&BIDDER_4, Amount::from_ccd(1)));
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(logger.logs[0][0], CLAIM_PENDING_TAG);

        claim_eq!(
            call(&mut host, BIDDER_4, after_deadline(), contract_claim_pending),
            Err(CustomContractError::NothingPending)
        );
        claim_eq!(
            call(&mut host, OWNER, after_deadline(), contract_claim_pending),
            Err(CustomContractError::NothingPending)
        );

        // Everything that came in went out, the new prize stays escrowed
        claim_eq!(total_transfers(&host), Amount::from_ccd(10));
        claim_eq!(host.self_balance(), Amount::zero());
        claim_eq!(host.state().escrow, Amount::zero());
        claim_eq!(host.state().prize_escrow, PRIZE);
    }

    #[concordium_test]
    fn test_reset_after_expiry_accumulates_pending() {
        let mut host = initialized_host();
        let params = ResetParams {
            funding: PrizeFunding::Deposit,
            prize_amount: None,
        };
        bid_ccd(&mut host, BIDDER_1, 7);
        bid_ccd(&mut host, BIDDER_2, 3);
        claim_eq!(
            call(&mut host, BIDDER_1, after_deadline(), contract_expire),
            Ok(())
        );
        claim_eq!(
            call(&mut host, BIDDER_2, after_deadline(), contract_refund_bids),
            Ok(())
        );

        claim_eq!(
            deposit(&mut host, TOKEN_CONTRACT, Address::Account(OWNER), PRIZE),
            Ok(())
        );
        claim_eq!(reset(&mut host, after_deadline(), &params), Ok(()));
        claim_eq!(
            pending_of(&host, OWNER),
            PendingView {
                amount: Amount::zero(),
                prize_amount: PRIZE,
            }
        );
        claim_eq!(pending_of(&host, BIDDER_1).amount, Amount::from_ccd(7));
        claim_eq!(pending_of(&host, BIDDER_2).amount, Amount::zero());

        expect_prize_transfer(&mut host, OWNER);
        claim_eq!(
            call(&mut host, OWNER, after_deadline(), contract_claim_pending),
            Ok(())
        );
        claim_eq!(pending_of(&host, OWNER).prize_amount, TokenAmountU64(0));

        // Second round expires as well
        let second_expiry = Timestamp::from_timestamp_millis(START_MILLIS + 2 * WINDOW_MILLIS + 2);
        claim_eq!(
            bid(
                &mut host,
                Address::Account(BIDDER_1),
                Amount::from_ccd(1),
                after_deadline()
            ),
            Ok(())
        );
        claim_eq!(
            call(&mut host, BIDDER_1, second_expiry, contract_expire),
            Ok(())
        );
        claim_eq!(
            deposit(&mut host, TOKEN_CONTRACT, Address::Account(OWNER), PRIZE),
            Ok(())
        );
        claim_eq!(reset(&mut host, second_expiry, &params), Ok(()));
        claim_eq!(pending_of(&host, BIDDER_1).amount, Amount::from_ccd(8));

        claim_eq!(
            call(&mut host, BIDDER_1, second_expiry, contract_claim_pending),
            Ok(())
        );
        claim!(host.transfer_occurred(&BIDDER_1, Amount::from_ccd(8)));
        claim_eq!(
            call(&mut host, BIDDER_1, second_expiry, contract_claim_pending),
            Err(CustomContractError::NothingPending)
        );
        claim_eq!(host.state().escrow, Amount::zero());
        claim_eq!(host.self_balance(), Amount::zero());
    }

    #[concordium_test]
    fn test_reset_with_pull() {
        let mut host = settled_host();
        pull_prize(&mut host);
        let params = ResetParams {
            funding: PrizeFunding::Pull,
            prize_amount: None,
        };

        claim_eq!(reset(&mut host, after_deadline(), &params), Ok(()));

        let state = host.state();
        claim_eq!(state.phase, Phase::Active);
        claim_eq!(state.prize_escrow, PRIZE);
        claim_eq!(state.prize_deposit, TokenAmountU64(0));
        claim_eq!(pending_of(&host, BIDDER_4).prize_amount, PRIZE);
    }

    #[concordium_test]
    fn test_excess_deposit_funds_next_round() {
        let mut host = default_host();
        claim_eq!(
            deposit(
                &mut host,
                TOKEN_CONTRACT,
                Address::Account(OWNER),
                TokenAmountU64(2_500)
            ),
            Ok(())
        );
        claim_eq!(initialize(&mut host, OWNER, PrizeFunding::Deposit), Ok(()));
        claim_eq!(host.state().prize_deposit, TokenAmountU64(1_500));

        claim_eq!(
            call(&mut host, OWNER, after_deadline(), contract_expire),
            Ok(())
        );
        let params = ResetParams {
            funding: PrizeFunding::Deposit,
            prize_amount: None,
        };
        claim_eq!(reset(&mut host, after_deadline(), &params), Ok(()));

        let state = host.state();
        claim_eq!(state.prize_escrow, PRIZE);
        claim_eq!(state.prize_deposit, TokenAmountU64(500));
        claim_eq!(pending_of(&host, OWNER).prize_amount, PRIZE);
    }

    #[concordium_test]
    fn test_owner_reclaim_deposit() {
        let mut host = default_host();
        claim_eq!(
            deposit(
                &mut host,
                TOKEN_CONTRACT,
                Address::Account(OWNER),
                TokenAmountU64(1_200)
            ),
            Ok(())
        );
        claim_eq!(initialize(&mut host, OWNER, PrizeFunding::Deposit), Ok(()));

        claim_eq!(
            call(&mut host, BIDDER_1, start_time(), contract_owner_reclaim_deposit),
            Err(CustomContractError::Unauthorized)
        );

        expect_token_transfer(&mut host, OWNER, TokenAmountU64(200));
        let ctx = receive_ctx(Address::Account(OWNER), start_time());
        let mut logger = TestLogger::init();
        claim_eq!(
            contract_owner_reclaim_deposit(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim_eq!(logger.logs[0][0], RECLAIM_DEPOSIT_TAG);

        // Committed prize is untouched
        claim_eq!(host.state().prize_deposit, TokenAmountU64(0));
        claim_eq!(host.state().prize_escrow, PRIZE);
        claim_eq!(
            call(&mut host, OWNER, start_time(), contract_owner_reclaim_deposit),
            Err(CustomContractError::NothingPending)
        );
    }

    #[concordium_test]
    fn test_reset_rejections() {
        let mut host = initialized_host();
        let params = ResetParams {
            funding: PrizeFunding::Deposit,
            prize_amount: None,
        };

        claim_eq!(
            reset(&mut host, start_time(), &params),
            Err(CustomContractError::WrongPhase)
        );

        claim_eq!(
            call(&mut host, BIDDER_1, after_deadline(), contract_expire),
            Ok(())
        );
        expect_prize_transfer(&mut host, OWNER);
        claim_eq!(
            call(
                &mut host,
                OWNER,
                after_deadline(),
                contract_owner_reclaim_prize
            ),
            Ok(())
        );

        let zero_prize = ResetParams {
            funding: PrizeFunding::Deposit,
            prize_amount: Some(TokenAmountU64(0)),
        };
        claim_eq!(
            reset(&mut host, after_deadline(), &zero_prize),
            Err(CustomContractError::InvalidPrize)
        );

        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Account(BIDDER_1), after_deadline());
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();
        claim_eq!(
            contract_reset(&ctx, &mut host, &mut logger),
            Err(CustomContractError::Unauthorized)
        );
    }

    #[concordium_test]
    fn test_receive_hook() {
        let mut host = default_host();

        let params = OnReceivingParameter {
            token_id: TokenIdVec(vec![]),
            amount: TokenAmountU64(40),
            from: Address::Account(OWNER),
            data: AdditionalData::empty(),
        };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Contract(TOKEN_CONTRACT), start_time());
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();

        claim_eq!(
            contract_on_receiving_cis2(&ctx, &mut host, &mut logger),
            Ok(())
        );
        claim_eq!(host.state().prize_deposit, TokenAmountU64(40));
        claim_eq!(logger.logs[0][0], DEPOSIT_TAG);

        claim_eq!(
            deposit(&mut host, TOKEN_CONTRACT, Address::Account(OWNER), TokenAmountU64(2)),
            Ok(())
        );
        claim_eq!(host.state().prize_deposit, TokenAmountU64(42));
    }

    #[concordium_test]
    fn test_receive_hook_rejections() {
        let mut host = default_host();

        claim_eq!(
            deposit(&mut host, OTHER_CONTRACT, Address::Account(OWNER), PRIZE),
            Err(CustomContractError::UnknownToken)
        );
        claim_eq!(
            deposit(&mut host, TOKEN_CONTRACT, Address::Account(BIDDER_1), PRIZE),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(
            deposit(
                &mut host,
                TOKEN_CONTRACT,
                Address::Contract(OTHER_CONTRACT),
                PRIZE
            ),
            Err(CustomContractError::Unauthorized)
        );

        let params = OnReceivingParameter {
            token_id: TokenIdVec(vec![7]),
            amount: PRIZE,
            from: Address::Account(OWNER),
            data: AdditionalData::empty(),
        };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Contract(TOKEN_CONTRACT), start_time());
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();
        claim_eq!(
            contract_on_receiving_cis2(&ctx, &mut host, &mut logger),
            Err(CustomContractError::UnknownToken)
        );

        claim_eq!(host.state().prize_deposit, TokenAmountU64(0));
    }

    #[concordium_test]
    fn test_views() {
        let mut host = default_host();
        let ctx = receive_ctx(Address::Account(BIDDER_1), start_time());

        claim_eq!(
            contract_view_phase(&ctx, &host),
            Err(CustomContractError::NotInitialized)
        );
        claim_eq!(
            contract_view_config(&ctx, &host),
            Ok(ConfigView {
                owner: OWNER,
                token: prize_token(),
                prize_amount: PRIZE,
                bidding_window: Duration::from_millis(WINDOW_MILLIS),
            })
        );

        claim_eq!(
            deposit(&mut host, TOKEN_CONTRACT, Address::Account(OWNER), PRIZE),
            Ok(())
        );
        claim_eq!(initialize(&mut host, OWNER, PrizeFunding::Deposit), Ok(()));
        bid_ccd(&mut host, BIDDER_2, 2);
        bid_ccd(&mut host, BIDDER_3, 6);

        claim_eq!(contract_view_phase(&ctx, &host), Ok(Phase::Active));

        let bytes = to_bytes(&BIDDER_2);
        let mut bid_ctx = receive_ctx(Address::Account(BIDDER_1), start_time());
        bid_ctx.set_parameter(&bytes);
        claim_eq!(
            contract_view_bid(&bid_ctx, &host),
            Ok(Amount::from_ccd(2))
        );

        let bytes = to_bytes(&BIDDER_1);
        let mut bid_ctx = receive_ctx(Address::Account(BIDDER_1), start_time());
        bid_ctx.set_parameter(&bytes);
        claim_eq!(
            contract_view_bid(&bid_ctx, &host),
            Err(CustomContractError::NotABidder)
        );

        let view = contract_view(&ctx, &host).expect_report("View failed");
        claim!(view.initialized);
        claim_eq!(view.deadline, deadline());
        claim_eq!(view.settlement, None);
        claim_eq!(view.bidder_count, 2);
        claim_eq!(view.escrow, Amount::from_ccd(8));
        claim_eq!(view.prize_escrow, PRIZE);
        claim_eq!(
            view.discovery.highest.map(|leader| leader.bidder),
            Some(BIDDER_3)
        );
        claim_eq!(view.discovery.second_amount, Amount::from_ccd(2));
    }
}
