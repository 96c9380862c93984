use {
    mint_machine_client::{
        notifications::WALLETS_CREATED, BatchState, ClientError, MachineSettings, ValidationError,
    },
    mint_machine_sdk::{
        build_provisioning_bundle, derive_keypair, InstructionKind, ProvisioningBundleParams,
        DEFAULT_FEE_RECIPIENT, WALLET_FUNDING_LAMPORTS,
    },
    mint_machine_testing::{checked_token_amount, is_create_token_account_ix, TestFixture},
    solana_sdk::{pubkey::Pubkey, signer::Signer, system_instruction},
};

/// 10 wallets with 5 tokens each: two batches of 7 and 3, each bundle ordered
/// fee transfer, then (create account + mint, fund) per wallet
#[tokio::test]
async fn test_provision_ten_wallets_in_two_batches() {
    let fixture = TestFixture::default();
    let (machine, mint) = fixture.machine_with_mint();
    let payer = fixture.payer();

    let report = machine.provision_wallets(10, 5).await.unwrap();

    assert_eq!(report.wallets.len(), 10);
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.outcomes[0].plan.wallet_count(), 7);
    assert_eq!(report.outcomes[1].plan.wallet_count(), 3);
    assert!(report.is_complete());

    let bundles = fixture.submitter.confirmed_bundles();
    assert_eq!(bundles.len(), 2);

    // 100 lamports per token: 7 * 5 tokens, then 3 * 5 tokens
    let expected_fees = [3_500, 1_500];

    let mut wallet_index = 0;
    for (bundle, (outcome, fee)) in bundles
        .iter()
        .zip(report.outcomes.iter().zip(expected_fees))
    {
        let wallet_count = outcome.plan.wallet_count();
        assert_eq!(bundle.len(), 1 + 3 * wallet_count);
        assert_eq!(
            bundle[0],
            system_instruction::transfer(&payer, &DEFAULT_FEE_RECIPIENT, fee)
        );

        for (i, record) in outcome.wallets.iter().enumerate() {
            let owner = record.public_address;
            assert_eq!(report.wallets[wallet_index].public_address, owner);
            wallet_index += 1;

            assert!(is_create_token_account_ix(&bundle[1 + 3 * i], &mint, &owner));
            assert_eq!(checked_token_amount(&bundle[2 + 3 * i]), Some((5_000, 3)));
            assert_eq!(
                bundle[3 + 3 * i],
                system_instruction::transfer(&payer, &owner, WALLET_FUNDING_LAMPORTS)
            );
        }
    }

    assert_eq!(
        fixture.notifier.messages(),
        vec![WALLETS_CREATED.to_string(), WALLETS_CREATED.to_string()]
    );
}

#[tokio::test]
async fn test_recovery_phrases_rederive_provisioned_addresses() {
    let fixture = TestFixture::default();
    let (machine, _mint) = fixture.machine_with_mint();

    let report = machine.provision_wallets(3, 1).await.unwrap();

    for record in &report.wallets {
        assert_eq!(record.recovery_phrase.split_whitespace().count(), 12);
        let keypair = derive_keypair(&record.recovery_phrase).unwrap();
        assert_eq!(keypair.pubkey(), record.public_address);
    }
}

#[test]
fn test_full_batch_fits_in_one_bundle() {
    let params =
        ProvisioningBundleParams::new(Pubkey::new_unique(), Pubkey::new_unique(), 5);
    let wallets: Vec<Pubkey> = (0..7).map(|_| Pubkey::new_unique()).collect();

    let bundle = build_provisioning_bundle(&params, &wallets).unwrap();

    assert_eq!(bundle.len(), 15);
    let kinds = bundle.kinds();
    assert_eq!(kinds[0], InstructionKind::FeeTransfer);
    for pair in kinds[1..].chunks(2) {
        assert_eq!(pair, [InstructionKind::Mint, InstructionKind::Fund]);
    }
}

#[tokio::test]
async fn test_zero_wallets_submits_nothing() {
    let fixture = TestFixture::default();
    let (machine, _mint) = fixture.machine_with_mint();

    let report = machine.provision_wallets(0, 5).await.unwrap();

    assert!(report.outcomes.is_empty());
    assert!(report.wallets.is_empty());
    assert_eq!(fixture.submitter.submission_count(), 0);
}

#[tokio::test]
async fn test_provisioning_requires_wallet_and_mint() {
    let fixture = TestFixture::default();

    let result = fixture.disconnected_machine().provision_wallets(5, 1).await;
    assert!(matches!(
        result,
        Err(ClientError::Validation(ValidationError::WalletNotLoaded))
    ));

    let result = fixture.machine().provision_wallets(5, 1).await;
    assert!(matches!(
        result,
        Err(ClientError::Validation(ValidationError::NoMint))
    ));

    assert_eq!(fixture.submitter.submission_count(), 0);
}

/// A batch of 8 needs 17 bundle entries, one more than allowed
#[tokio::test]
async fn test_oversized_batch_fails_without_submitting() {
    let fixture = TestFixture::new(MachineSettings {
        batch_size: 8,
        ..MachineSettings::default()
    });
    let (machine, _mint) = fixture.machine_with_mint();

    let report = machine.provision_wallets(8, 1).await.unwrap();

    assert_eq!(report.outcomes.len(), 1);
    match &report.outcomes[0].state {
        BatchState::Failed { reason } => assert!(reason.contains("over capacity")),
        other => panic!("expected failed batch, got {other:?}"),
    }
    assert!(report.wallets.is_empty());
    assert_eq!(fixture.submitter.submission_count(), 0);
    assert_eq!(fixture.notifier.errors().len(), 1);
}

/// The largest representable request is planned without allocating per batch,
/// and batches still run one at a time
#[cfg(target_pointer_width = "64")]
#[tokio::test]
async fn test_max_wallet_count_plans_lazily() {
    let fixture = TestFixture::default();
    let (machine, _mint) = fixture.machine_with_mint();

    let mut provisioner = machine.provisioner(u64::MAX, 1).unwrap();

    assert_eq!(provisioner.schedule().len(), (u64::MAX as usize).div_ceil(7));
    assert_eq!(provisioner.state(0), Some(BatchState::Pending));
    assert_eq!(fixture.submitter.submission_count(), 0);

    let first = provisioner.next_batch().await.unwrap();
    assert!(first.state.is_submitted());
    assert_eq!(first.wallets.len(), 7);
    assert_eq!(provisioner.state(1), Some(BatchState::Pending));
    assert!(!provisioner.is_finished());
    assert_eq!(fixture.submitter.submission_count(), 1);
}
