use {
    async_trait::async_trait,
    mint_machine_batch_tx::{BundleSubmitter, TxBatchError},
    solana_sdk::{
        instruction::Instruction,
        message::Message,
        native_token::LAMPORTS_PER_SOL,
        pubkey::Pubkey,
        signature::{Keypair, Signature},
        signer::Signer,
    },
    std::{
        collections::HashSet,
        sync::{Mutex, MutexGuard},
    },
};

/// Rent-exempt minimum for an 82-byte mint account
pub const MOCK_RENT_EXEMPT_LAMPORTS: u64 = 1_461_600;

/// One call to `submit`, successful or not
#[derive(Debug, Clone)]
pub struct Submission {
    pub instructions: Vec<Instruction>,
    /// Payer first, then the extra signers in call order
    pub signers: Vec<Pubkey>,
    pub signature: Option<Signature>,
}

impl Submission {
    pub fn succeeded(&self) -> bool {
        self.signature.is_some()
    }
}

/// In-memory stand-in for the RPC-backed submitter.
///
/// Records every bundle it is handed, checks that all required signers are
/// present and can be told to fail specific calls (0-based call index).
pub struct MockSubmitter {
    payer: Keypair,
    balance: u64,
    submissions: Mutex<Vec<Submission>>,
    failing_calls: Mutex<HashSet<usize>>,
}

impl Default for MockSubmitter {
    fn default() -> Self {
        Self::new(Keypair::new())
    }
}

impl MockSubmitter {
    pub fn new(payer: Keypair) -> Self {
        Self {
            payer,
            balance: 10 * LAMPORTS_PER_SOL,
            submissions: Mutex::new(Vec::new()),
            failing_calls: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_balance(mut self, lamports: u64) -> Self {
        self.balance = lamports;
        self
    }

    /// Make the `call_index`-th call to `submit` fail with a send error
    pub fn fail_call(&self, call_index: usize) {
        lock(&self.failing_calls).insert(call_index);
    }

    pub fn submissions(&self) -> Vec<Submission> {
        lock(&self.submissions).clone()
    }

    pub fn submission_count(&self) -> usize {
        lock(&self.submissions).len()
    }

    /// Instructions of every successful submission, in order
    pub fn confirmed_bundles(&self) -> Vec<Vec<Instruction>> {
        lock(&self.submissions)
            .iter()
            .filter(|submission| submission.succeeded())
            .map(|submission| submission.instructions.clone())
            .collect()
    }
}

#[async_trait]
impl BundleSubmitter for MockSubmitter {
    fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    async fn submit(
        &self,
        instructions: Vec<Instruction>,
        extra_signers: &[&Keypair],
    ) -> Result<Signature, TxBatchError> {
        if instructions.is_empty() {
            return Err(TxBatchError::NoInstructions);
        }

        let mut signers = vec![self.payer.pubkey()];
        signers.extend(extra_signers.iter().map(|signer| signer.pubkey()));

        let payer = self.payer.pubkey();
        let message = Message::new(&instructions, Some(&payer));
        let required = message.header.num_required_signatures as usize;
        if let Some(missing) = message.account_keys[..required]
            .iter()
            .find(|key| !signers.contains(key))
        {
            return Err(TxBatchError::Signing(format!("missing signature for {missing}")));
        }

        let mut submissions = lock(&self.submissions);
        let call_index = submissions.len();
        let fails = lock(&self.failing_calls).contains(&call_index);
        let signature = (!fails).then(Signature::new_unique);

        submissions.push(Submission {
            instructions,
            signers,
            signature,
        });

        signature.ok_or_else(|| {
            TxBatchError::SendFailed(format!("simulated failure of call {call_index}"))
        })
    }

    async fn balance(&self, _address: &Pubkey) -> Result<u64, TxBatchError> {
        Ok(self.balance)
    }

    async fn minimum_balance_for_rent_exemption(
        &self,
        _data_len: usize,
    ) -> Result<u64, TxBatchError> {
        Ok(MOCK_RENT_EXEMPT_LAMPORTS)
    }
}

// A panicking test elsewhere must not hide this mock's records
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
