use {
    crate::{MockSubmitter, RecordingNotifier},
    mint_machine_client::{MachineSettings, MemoryMetadataStore, MintMachine},
    solana_sdk::pubkey::Pubkey,
    std::sync::Arc,
};

/// A machine wired to in-memory collaborators, plus handles to inspect them
pub struct TestFixture {
    pub submitter: Arc<MockSubmitter>,
    pub notifier: Arc<RecordingNotifier>,
    pub metadata_store: Arc<MemoryMetadataStore>,
    pub settings: MachineSettings,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new(MachineSettings::default())
    }
}

impl TestFixture {
    pub fn new(settings: MachineSettings) -> Self {
        Self {
            submitter: Arc::new(MockSubmitter::default()),
            notifier: Arc::new(RecordingNotifier::new()),
            metadata_store: Arc::new(MemoryMetadataStore::new()),
            settings,
        }
    }

    pub fn payer(&self) -> Pubkey {
        use mint_machine_batch_tx::BundleSubmitter as _;
        self.submitter.payer()
    }

    /// No wallet connected, no mint
    pub fn disconnected_machine(&self) -> MintMachine {
        MintMachine::new(
            self.metadata_store.clone(),
            self.notifier.clone(),
            self.settings.clone(),
        )
    }

    /// Wallet connected, no mint
    pub fn machine(&self) -> MintMachine {
        self.disconnected_machine()
            .with_wallet(self.submitter.clone())
    }

    /// Wallet connected and operating on an existing mint
    pub fn machine_with_mint(&self) -> (MintMachine, Pubkey) {
        let mint = Pubkey::new_unique();
        (self.machine().with_mint(mint), mint)
    }
}
