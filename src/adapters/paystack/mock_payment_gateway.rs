//! Mock payment gateway for testing.
//!
//! Records every request and answers from pre-configured state:
//! - Transactions known by reference (for `verify_transaction`)
//! - Error injection per method
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::ports::{
    CreateSubaccountRequest, GatewayError, InitializeTransactionRequest, PaymentGateway,
    Subaccount, TransactionAuthorization, TransactionVerification,
};

#[derive(Default, Clone)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    transactions: HashMap<String, TransactionVerification>,
    method_errors: HashMap<&'static str, GatewayError>,
    initialize_requests: Vec<InitializeTransactionRequest>,
    subaccount_requests: Vec<CreateSubaccountRequest>,
    verify_calls: Vec<String>,
    next_subaccount: u32,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Makes `verify_transaction(reference)` return this transaction.
    pub fn add_transaction(&self, transaction: TransactionVerification) {
        self.state()
            .transactions
            .insert(transaction.reference.clone(), transaction);
    }

    /// Fails every call to `method` with `error`.
    ///
    /// `method` is one of `initialize_transaction`, `create_subaccount`,
    /// `verify_transaction`.
    pub fn fail(&self, method: &'static str, error: GatewayError) {
        self.state().method_errors.insert(method, error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertions
    // ════════════════════════════════════════════════════════════════════════════

    pub fn initialize_requests(&self) -> Vec<InitializeTransactionRequest> {
        self.state().initialize_requests.clone()
    }

    pub fn subaccount_requests(&self) -> Vec<CreateSubaccountRequest> {
        self.state().subaccount_requests.clone()
    }

    pub fn verify_calls(&self) -> Vec<String> {
        self.state().verify_calls.clone()
    }

    fn injected(&self, method: &'static str) -> Result<(), GatewayError> {
        match self.state().method_errors.get(method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn initialize_transaction(
        &self,
        request: InitializeTransactionRequest,
    ) -> Result<TransactionAuthorization, GatewayError> {
        self.state().initialize_requests.push(request.clone());
        self.injected("initialize_transaction")?;
        Ok(TransactionAuthorization {
            authorization_url: format!("https://checkout.paystack.test/{}", request.reference),
            access_code: Some(format!("ac_{}", request.reference)),
            reference: request.reference,
        })
    }

    async fn create_subaccount(
        &self,
        request: CreateSubaccountRequest,
    ) -> Result<Subaccount, GatewayError> {
        let sequence = {
            let mut state = self.state();
            state.subaccount_requests.push(request);
            state.next_subaccount += 1;
            state.next_subaccount
        };
        self.injected("create_subaccount")?;
        Ok(Subaccount {
            subaccount_code: format!("ACCT_mock{:04}", sequence),
        })
    }

    async fn verify_transaction(&self, reference: &str) -> Result<TransactionVerification, GatewayError> {
        self.state().verify_calls.push(reference.to_string());
        self.injected("verify_transaction")?;
        self.state()
            .transactions
            .get(reference)
            .cloned()
            .ok_or_else(|| GatewayError::Rejected("Transaction reference not found".into()))
    }
}
