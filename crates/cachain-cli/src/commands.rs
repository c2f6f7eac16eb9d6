// Subcommand bodies. Each returns once its report has been printed; chain
// integrity failures are surfaced as errors rather than printed verdicts.

use std::hint::black_box;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use cachain_core::Blockchain;
use cachain_crypto::{
    automaton_hash, avalanche, bit_distribution, BitField, CellularAutomaton, HashMethod, DEFAULT_RULE,
    DEFAULT_STEPS, STATE_BITS,
};
use tracing::info;

use crate::settings::Settings;

pub const AVALANCHE_INPUT: &str = "Bonjour le monde de la blockchain.";

/// Rules compared by the `rules` subcommand.
pub const COMPARED_RULES: [u8; 3] = [30, 90, 110];

pub fn hash(input: &str, method: HashMethod) {
    println!("{}: {}", method, method.digest_hex(input.as_bytes()));
}

/// Renders a generation as one character per cell.
pub fn render_generation(state: &BitField) -> String {
    state.iter().map(|bit| if bit { '#' } else { ' ' }).collect()
}

pub fn trace(rule: u8, generations: usize) {
    let mut automaton = CellularAutomaton::new(rule);
    automaton.seed_field(BitField::with_single_bit((STATE_BITS / 2) as isize));

    println!("=== Rule {} from a single centred cell ===", rule);
    println!("{}", render_generation(automaton.state()));
    for _ in 0..generations {
        automaton.step();
        println!("{}", render_generation(automaton.state()));
    }
}

pub fn run_avalanche(input: &str, rule: u8, steps: usize) {
    let report = avalanche(input.as_bytes(), rule, steps);
    println!("Message 1: {:?}", String::from_utf8_lossy(&report.original));
    println!("Message 2: {:?}", String::from_utf8_lossy(&report.flipped));
    println!("Hash 1:    {}", report.original_digest);
    println!("Hash 2:    {}", report.flipped_digest);
    println!(
        "Differing bits: {} / {} ({:.2}%) -> {:?}",
        report.differing_bits, STATE_BITS, report.percentage, report.grade
    );
}

pub fn distribution(samples: usize, rule: u8, steps: usize) {
    let started = Instant::now();
    let report = bit_distribution(samples, rule, steps);
    info!("Hashed {} samples in {:?}", samples, started.elapsed());
    println!("Samples:      {}", report.samples);
    println!("Total bits:   {}", report.total_bits);
    println!("Bits set:     {}", report.ones);
    println!("Ones:         {:.4}% -> {:?}", report.percentage, report.grade);
}

/// Times `count` digests of distinct inputs under `rule`.
pub fn time_rule(rule: u8, count: usize) -> Duration {
    let started = Instant::now();
    for i in 0..count {
        let input = format!("message_test_{}", i);
        black_box(automaton_hash(input.as_bytes(), rule, DEFAULT_STEPS));
    }
    started.elapsed()
}

pub fn rules(count: usize) {
    println!("+----------+---------------------+");
    println!("| Rule     | Time ({} hashes)", count);
    println!("+----------+---------------------+");
    for rule in COMPARED_RULES {
        let elapsed = time_rule(rule, count);
        println!("| Rule {:<3} | {:>17.4} s |", rule, elapsed.as_secs_f64());
    }
    println!("+----------+---------------------+");
}

/// Totals gathered while mining a run of proof-of-work blocks.
#[derive(Debug, Clone, Copy)]
pub struct MiningStats {
    pub blocks: usize,
    pub elapsed: Duration,
    pub total_nonces: u64,
}

impl MiningStats {
    pub fn average_time(&self) -> Duration {
        if self.blocks == 0 {
            return Duration::ZERO;
        }
        self.elapsed.div_f64(self.blocks as f64)
    }

    pub fn average_nonce(&self) -> f64 {
        if self.blocks == 0 {
            return 0.0;
        }
        self.total_nonces as f64 / self.blocks as f64
    }
}

/// Mines `blocks` proof-of-work blocks on a fresh chain and validates it.
pub fn mine_chain(method: HashMethod, blocks: usize, difficulty: usize) -> Result<(Blockchain, MiningStats)> {
    let mut chain = Blockchain::new(method);
    let started = Instant::now();
    let mut total_nonces = 0u64;
    for i in 0..blocks {
        info!("Mining block {} with {} (difficulty {})", i + 1, method, difficulty);
        total_nonces += chain
            .append_proof_of_work(format!("Bloc de test {}", method), difficulty)
            .with_context(|| format!("mining block {} with {}", i + 1, method))?;
    }
    let elapsed = started.elapsed();
    chain
        .validate()
        .with_context(|| format!("{} chain failed validation", method))?;

    Ok((
        chain,
        MiningStats {
            blocks,
            elapsed,
            total_nonces,
        },
    ))
}

/// Automaton variant to compare against SHA-256; falls back to the default
/// parameters when the configured method is SHA-256 itself.
pub fn comparison_method(configured: HashMethod) -> HashMethod {
    match configured {
        HashMethod::Automaton { .. } => configured,
        HashMethod::Sha256 => HashMethod::default(),
    }
}

pub fn mine(settings: &Settings) -> Result<()> {
    let methods = [HashMethod::Sha256, comparison_method(settings.hash)];
    println!(
        "Parameters: {} blocks, difficulty {}",
        settings.blocks, settings.difficulty
    );
    println!("{:<28} {:>12} {:>14} {:>14}", "Method", "Total (s)", "Avg/block (s)", "Avg nonce");
    for method in methods {
        let (_, stats) = mine_chain(method, settings.blocks, settings.difficulty)?;
        println!(
            "{:<28} {:>12.4} {:>14.4} {:>14.1}",
            method.label(),
            stats.elapsed.as_secs_f64(),
            stats.average_time().as_secs_f64(),
            stats.average_nonce()
        );
    }
    Ok(())
}

fn register_all(chain: &mut Blockchain, settings: &Settings) -> Result<()> {
    for validator in &settings.validators {
        chain
            .register_validator(validator.address.clone(), validator.stake)
            .with_context(|| format!("registering validator {}", validator.address))?;
    }
    Ok(())
}

pub fn stake(settings: &Settings) -> Result<()> {
    let mut chain = Blockchain::new(settings.hash);
    register_all(&mut chain, settings)?;

    let started = Instant::now();
    let validator = chain
        .append_proof_of_stake("Transaction Data PoS")
        .context("appending proof-of-stake block")?
        .validator()
        .unwrap_or_default()
        .to_string();
    let pos_time = started.elapsed();

    let started = Instant::now();
    let nonce = chain
        .append_proof_of_work("Transaction Data PoW", settings.difficulty)
        .context("appending proof-of-work block")?;
    let pow_time = started.elapsed();

    chain.validate().context("stake chain failed validation")?;

    println!("Hash method: {}", settings.hash);
    println!("PoS block sealed by {} in {:?}", validator, pos_time);
    println!(
        "PoW block mined at difficulty {} (nonce {}) in {:?}",
        settings.difficulty, nonce, pow_time
    );
    println!("{}", seal_comparison(pos_time, pow_time));
    Ok(())
}

/// One-line verdict on which seal finished first.
pub fn seal_comparison(pos_time: Duration, pow_time: Duration) -> String {
    if pos_time < pow_time {
        format!(
            "Conclusion: proof-of-stake sealed {:.1}x faster than proof-of-work",
            pow_time.as_secs_f64() / pos_time.as_secs_f64().max(f64::MIN_POSITIVE)
        )
    } else {
        "Conclusion: proof-of-work finished first in this run, which is unusual".to_string()
    }
}

/// Builds a chain alternating proof-of-work and proof-of-stake blocks. With
/// no validators configured every block is mined.
pub fn build_mixed_chain(settings: &Settings) -> Result<Blockchain> {
    let mut chain = Blockchain::new(settings.hash);
    register_all(&mut chain, settings)?;

    for i in 1..=settings.blocks {
        if i % 2 == 0 && !chain.validators().is_empty() {
            chain
                .append_proof_of_stake(format!("Transaction {}", i))
                .with_context(|| format!("appending stake block {}", i))?;
        } else {
            chain
                .append_proof_of_work(format!("Transaction {}", i), settings.difficulty)
                .with_context(|| format!("mining block {}", i))?;
        }
    }
    Ok(chain)
}

pub fn chain(settings: &Settings) -> Result<()> {
    let chain = build_mixed_chain(settings)?;
    if let Err(failure) = chain.validate() {
        bail!("chain of {} blocks is invalid: {}", chain.len(), failure);
    }
    info!("Chain of {} blocks validated", chain.len());
    let json = serde_json::to_string_pretty(chain.blocks()).context("serializing chain")?;
    println!("{}", json);
    Ok(())
}

pub fn default_automaton(rule: Option<u8>, steps: Option<usize>, configured: HashMethod) -> HashMethod {
    let (base_rule, base_steps) = match configured {
        HashMethod::Automaton { rule, steps } => (rule, steps),
        HashMethod::Sha256 => (DEFAULT_RULE, DEFAULT_STEPS),
    };
    HashMethod::automaton(rule.unwrap_or(base_rule), steps.unwrap_or(base_steps))
}
