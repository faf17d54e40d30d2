use super::*;

/// Host extension for moving CIS-2 tokens held in escrow.
pub trait HostCis2TokenExt<S>: HasHost<S> {
    /// Transfer `amount` of `token` from `from` to `to` with a single CIS-2 `transfer` call.
    ///
    /// The sender of the call is this contract, so `from` must either be this contract or an
    /// address that made this contract its operator.
    fn cis2_transfer(
        &mut self,
        token: &PrizeToken,
        amount: ContractTokenAmount,
        from: Address,
        to: Receiver,
    ) -> Result<(), CallContractError<Self::ReturnValueType>> {
        let params: TransferParameter = TransferParams(vec![Transfer {
            token_id: token.id.clone(),
            amount,
            from,
            to,
            data: AdditionalData::empty(),
        }]);

        self.invoke_contract(
            &token.contract,
            &params,
            EntrypointName::new_unchecked("transfer"),
            Amount::zero(),
        )?;

        Ok(())
    }
}

impl<S, H: HasHost<S>> HostCis2TokenExt<S> for H {}

#[concordium_cfg_test]
mod tests {
    use concordium_std::test_infrastructure::*;

    use super::*;
    use crate::test::*;

    const TOKEN_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };

    const USER_1: AccountAddress = AccountAddress([1; 32]);

    fn prize_token() -> PrizeToken {
        PrizeToken {
            contract: TOKEN_CONTRACT,
            id: TokenIdVec(vec![]),
        }
    }

    #[concordium_test]
    fn test_transfer() {
        let state = ();
        let state_builder = TestStateBuilder::new();
        let mut host = TestHost::new(state, state_builder);

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_check_mock::<TransferParameter, _>(|TransferParams(transfers)| {
                transfers.len() == 1
                    && transfers[0].amount == TokenAmountU64(100)
                    && transfers[0].to.address() == Address::Account(USER_1)
            }),
        );

        let response = host.cis2_transfer(
            &prize_token(),
            TokenAmountU64(100),
            Address::Contract(ContractAddress {
                index: 2,
                subindex: 0,
            }),
            Receiver::Account(USER_1),
        )
        .map_err(CustomContractError::from);

        claim_eq!(response, Ok(()));
    }

    #[concordium_test]
    fn test_transfer_rejected() {
        let state = ();
        let state_builder = TestStateBuilder::new();
        let mut host = TestHost::new(state, state_builder);

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            reject_mock(),
        );

        let response = host
            .cis2_transfer(
                &prize_token(),
                TokenAmountU64(100),
                Address::Account(USER_1),
                Receiver::Account(USER_1),
            )
            .map_err(CustomContractError::from);

        claim_eq!(response, Err(CustomContractError::InvokeContractError));
    }
}
