use cachain_core::{BlockValidator, Blockchain, ChainError, FailureKind, IntegrityFailure, Seal, GENESIS_PAYLOAD};
use cachain_crypto::HashMethod;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn network(chain: &mut Blockchain) {
    for (address, stake) in [("Alice", 100.0), ("Bob", 50.0), ("Charlie", 250.0), ("David", 20.0)] {
        chain.register_validator(address, stake).unwrap();
    }
}

#[test]
fn automaton_chain_survives_mixed_appends() {
    init_logger();
    let mut chain = Blockchain::new(HashMethod::automaton(30, 128));
    network(&mut chain);
    let mut rng = StdRng::seed_from_u64(77);

    for i in 0..3 {
        chain.append_proof_of_work(format!("Donnees de transaction {}", i), 1).unwrap();
        chain
            .append_proof_of_stake_with(format!("Transaction Data PoS {}", i), &mut rng)
            .unwrap();
    }

    assert_eq!(chain.len(), 7);
    assert_eq!(chain.blocks()[0].payload, GENESIS_PAYLOAD.as_bytes());
    for pair in chain.blocks().windows(2) {
        assert_eq!(pair[1].previous_hash, pair[0].hash);
        assert_eq!(pair[1].method, chain.hash_method());
    }
    assert!(chain.is_valid());
}

#[test]
fn sha256_and_automaton_chains_differ_but_both_validate() {
    let mut sha = Blockchain::new(HashMethod::Sha256);
    let mut ac = Blockchain::new(HashMethod::default());
    sha.append_proof_of_work("Bloc de test", 2).unwrap();
    ac.append_proof_of_work("Bloc de test", 2).unwrap();

    assert_ne!(sha.latest_block().hash, ac.latest_block().hash);
    assert!(sha.latest_block().hash.starts_with("00"));
    assert!(ac.latest_block().hash.starts_with("00"));
    assert!(sha.is_valid() && ac.is_valid());
}

#[test]
fn serialized_chain_blocks_revalidate() {
    let mut chain = Blockchain::new(HashMethod::default());
    network(&mut chain);
    chain.append_proof_of_stake_with("pos", &mut StdRng::seed_from_u64(1)).unwrap();
    chain.append_proof_of_work("pow", 1).unwrap();

    let json = serde_json::to_string(chain.blocks()).unwrap();
    let restored: Vec<cachain_core::Block> = serde_json::from_str(&json).unwrap();
    for block in &restored {
        assert_eq!(block.hash, block.recompute_hash());
    }
}

#[test]
fn stake_append_without_positive_stake_fails() {
    let mut chain = Blockchain::new(HashMethod::Sha256);
    chain.register_validator("idle", 0.0).unwrap();
    assert_eq!(
        chain.append_proof_of_stake("never sealed").unwrap_err(),
        ChainError::DegenerateStake { total: 0.0 }
    );
    assert_eq!(chain.len(), 1);
    assert!(chain.is_valid());
}

#[test]
fn integrity_failure_reports_position_and_hashes() {
    init_logger();
    let mut chain = Blockchain::new(HashMethod::Sha256);
    chain.append_proof_of_work("block 1", 1).unwrap();
    chain.append_proof_of_work("block 2", 1).unwrap();

    let prev = &chain.blocks()[1];
    let mut forged = chain.latest_block().clone();
    forged.seal = Seal::Work {
        nonce: forged.nonce().unwrap() + 1,
    };
    let recomputed = forged.recompute_hash();

    assert_eq!(
        BlockValidator::validate_full_block(2, prev, &forged),
        Err(IntegrityFailure::HashMismatch {
            index: 2,
            stored: forged.hash.clone(),
            recomputed,
        })
    );
    let failure = BlockValidator::validate_full_block(2, prev, &forged).unwrap_err();
    assert_eq!(failure.kind(), FailureKind::HashMismatch);
    assert_eq!(failure.index(), 2);
}
