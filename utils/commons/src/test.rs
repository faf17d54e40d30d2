use concordium_std::concordium_cfg_test;

#[concordium_cfg_test]
pub use inner::*;

#[concordium_cfg_test]
mod inner {
    use concordium_std::test_infrastructure::MockFn;
    use concordium_std::*;

    /// Mock entrypoint that parses the parameter and traps unless `check` holds.
    pub fn parse_and_check_mock<D: Deserial, S>(check: impl Fn(&D) -> bool + 'static) -> MockFn<S> {
        MockFn::new_v1(move |parameter, _, _, _state| {
            let value = D::deserial(&mut Cursor::new(parameter))
                .map_err(|_| CallContractError::Trap)?;
            if !check(&value) {
                return Err(CallContractError::Trap);
            };
            Ok((false, ()))
        })
    }

    /// Mock entrypoint that always rejects, simulating a failing token contract.
    pub fn reject_mock<S>() -> MockFn<S> {
        MockFn::new_v1(|_, _, _, _state| Err::<(bool, ()), _>(CallContractError::Trap))
    }
}
