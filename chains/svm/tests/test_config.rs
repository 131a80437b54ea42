use anchor_lang::prelude::Pubkey;
use cross_chain_svm::constants::{DST_ESCROW_PROGRAM_ID, SRC_ESCROW_PROGRAM_ID};
use cross_chain_svm::{SvmDstEscrowFactory, SvmProgramConfig, SvmSrcEscrowFactory};

#[test]
fn test_config_from_json() {
    let whitelist = Pubkey::new_unique();
    let json = format!(
        r#"{{"srcEscrowProgram":"{SRC_ESCROW_PROGRAM_ID}","dstEscrowProgram":"{DST_ESCROW_PROGRAM_ID}","whitelistProgram":"{whitelist}"}}"#
    );
    let config: SvmProgramConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, SvmProgramConfig::with_whitelist(whitelist));
    assert_eq!(
        serde_json::from_str::<SvmProgramConfig>(&serde_json::to_string(&config).unwrap()).unwrap(),
        config
    );

    assert_eq!(SvmSrcEscrowFactory::new(&config).program_id(), SRC_ESCROW_PROGRAM_ID);
    assert_eq!(SvmDstEscrowFactory::new(&config).program_id(), DST_ESCROW_PROGRAM_ID);
}

#[test]
fn test_config_rejects_invalid_pubkey() {
    let json = r#"{"srcEscrowProgram":"not-a-key","dstEscrowProgram":"11111111111111111111111111111111","whitelistProgram":"11111111111111111111111111111111"}"#;
    assert!(serde_json::from_str::<SvmProgramConfig>(json).is_err());
}
