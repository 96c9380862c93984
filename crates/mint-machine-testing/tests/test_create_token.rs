use {
    mint_machine_client::{
        notifications::{METADATA_UPLOADED, TOKEN_CREATED, TOKEN_MINTED},
        ClientError, TokenMetadata, ValidationError,
    },
    mint_machine_sdk::MINT_ACCOUNT_LEN,
    mint_machine_testing::{
        checked_token_amount, is_create_token_account_ix, MockSubmitter, TestFixture,
    },
    solana_sdk::{native_token::LAMPORTS_PER_SOL, system_instruction},
    spl_token::instruction::TokenInstruction,
    std::sync::Arc,
};

#[tokio::test]
async fn test_create_token_uploads_metadata_then_creates_mint() {
    let fixture = TestFixture::default();
    let mut machine = fixture.machine();
    let payer = fixture.payer();

    let created = machine
        .create_token(" Gold ", "GLD", "A shiny token")
        .await
        .unwrap();

    assert_eq!(machine.mint(), Some(created.mint));
    assert_eq!(
        fixture.metadata_store.get(&created.metadata_uri),
        Some(TokenMetadata {
            token_name: "Gold".to_string(),
            token_symbol: "GLD".to_string(),
            token_description: "A shiny token".to_string(),
        })
    );
    assert_eq!(
        fixture.notifier.messages(),
        vec![METADATA_UPLOADED.to_string(), TOKEN_CREATED.to_string()]
    );

    let submissions = fixture.submitter.submissions();
    assert_eq!(submissions.len(), 1);
    let submission = &submissions[0];
    assert_eq!(submission.signers, vec![payer, created.mint]);

    let ixs = &submission.instructions;
    assert_eq!(ixs.len(), 3);
    assert_eq!(
        ixs[0],
        system_instruction::create_account(
            &payer,
            &created.mint,
            mint_machine_testing::MOCK_RENT_EXEMPT_LAMPORTS,
            MINT_ACCOUNT_LEN as u64,
            &spl_token::ID,
        )
    );
    match TokenInstruction::unpack(&ixs[1].data).unwrap() {
        TokenInstruction::InitializeMint2 {
            decimals,
            mint_authority,
            ..
        } => {
            assert_eq!(decimals, 3);
            assert_eq!(mint_authority, payer);
        }
        other => panic!("expected InitializeMint2, got {other:?}"),
    }
    assert!(is_create_token_account_ix(&ixs[2], &created.mint, &payer));
}

#[tokio::test]
async fn test_create_token_requires_name_and_symbol() {
    let fixture = TestFixture::default();
    let mut machine = fixture.machine();

    let result = machine.create_token("", "GLD", "").await;
    assert!(matches!(
        result,
        Err(ClientError::Validation(ValidationError::MissingTokenField("name")))
    ));

    let result = machine.create_token("Gold", " ", "").await;
    assert!(matches!(
        result,
        Err(ClientError::Validation(ValidationError::MissingTokenField("symbol")))
    ));

    assert!(fixture.metadata_store.is_empty());
    assert_eq!(fixture.submitter.submission_count(), 0);
}

#[tokio::test]
async fn test_mint_tokens_to_authority() {
    let fixture = TestFixture::default();
    let (machine, mint) = fixture.machine_with_mint();
    let payer = fixture.payer();

    machine.mint_tokens(100).await.unwrap();

    let bundles = fixture.submitter.confirmed_bundles();
    assert_eq!(bundles.len(), 1);
    assert!(is_create_token_account_ix(&bundles[0][0], &mint, &payer));
    assert_eq!(checked_token_amount(&bundles[0][1]), Some((100_000, 3)));
    assert_eq!(fixture.notifier.messages(), vec![TOKEN_MINTED.to_string()]);
}

#[tokio::test]
async fn test_reset_token_forgets_mint() {
    let fixture = TestFixture::default();
    let (mut machine, _mint) = fixture.machine_with_mint();

    machine.reset_token();

    assert_eq!(machine.mint(), None);
    assert!(matches!(
        machine.mint_tokens(1).await,
        Err(ClientError::Validation(ValidationError::NoMint))
    ));
}

#[tokio::test]
async fn test_wallet_balance() {
    let fixture = TestFixture::default();

    assert_eq!(
        fixture.machine().wallet_balance().await.unwrap(),
        10 * LAMPORTS_PER_SOL
    );
    assert!(matches!(
        fixture.disconnected_machine().wallet_balance().await,
        Err(ClientError::Validation(ValidationError::WalletNotLoaded))
    ));

    let funded = TestFixture {
        submitter: Arc::new(MockSubmitter::default().with_balance(2_500_000)),
        ..TestFixture::default()
    };
    assert_eq!(funded.machine().wallet_balance().await.unwrap(), 2_500_000);
}
