//! Contract interfaces for the protocol host and the constant flow agreement.

use alloy::sol;

sol! {
    /// Protocol host. Agreement calls are routed through it so it can inject
    /// the call context.
    #[derive(Debug)]
    interface ISuperfluid {
        function callAgreement(
            address agreementClass,
            bytes callData,
            bytes userData
        ) external returns (bytes returnedData);
    }

    /// Constant flow agreement, version 1.
    #[derive(Debug)]
    interface IConstantFlowAgreementV1 {
        function createFlow(
            address token,
            address receiver,
            int96 flowRate,
            bytes ctx
        ) external returns (bytes newCtx);

        function getFlow(
            address token,
            address sender,
            address receiver
        ) external view returns (
            uint256 timestamp,
            int96 flowRate,
            uint256 deposit,
            uint256 owedDeposit
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, Bytes};
    use alloy::sol_types::SolCall;

    #[test]
    fn test_selectors() {
        // keccak256("createFlow(address,address,int96,bytes)")[..4]
        assert_eq!(
            IConstantFlowAgreementV1::createFlowCall::SELECTOR,
            [0x62, 0xfc, 0x30, 0x5e]
        );
        // keccak256("callAgreement(address,bytes,bytes)")[..4]
        assert_eq!(ISuperfluid::callAgreementCall::SELECTOR, [0x39, 0x25, 0x5d, 0x5b]);
    }

    #[test]
    fn test_call_agreement_wraps_inner_call() {
        let inner = Bytes::from_static(&[1, 2, 3, 4]);
        let call = ISuperfluid::callAgreementCall {
            agreementClass: Address::repeat_byte(0xcf),
            callData: inner.clone(),
            userData: Bytes::new(),
        };
        let encoded = call.abi_encode();
        let decoded = ISuperfluid::callAgreementCall::abi_decode(&encoded).unwrap();
        assert_eq!(decoded.agreementClass, Address::repeat_byte(0xcf));
        assert_eq!(decoded.callData, inner);
        assert!(decoded.userData.is_empty());
    }
}
