use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};
use num_bigint::BigUint;

use super::selector::find_prime_chain;
use super::{HeaderDigest, PRIMORIAL, Proof};

/// Anything that can hash its non-proof fields for a given nonce.
pub trait HeaderSource {
    fn digest_with_nonce(&self, nonce: u64) -> HeaderDigest;
}

/// Shared flag asking a running search to start over.
///
/// Only looked at between rounds, never inside a chain walk.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears the flag, returning whether it was set.
    fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    SearchingNonce,
    SearchingMultiplier { digest: BigUint },
    ProofFound(Proof),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Budget spent, nothing found yet.
    Pending,
    Found(Proof),
    /// Cancellation was seen; nonce and multiplier were reset.
    Restarted,
}

/// Mining loop for one block candidate.
///
/// Work is done in rounds of at most `round_size` attempts so the host can
/// handle events between them. Once a proof is found the search is spent;
/// start a new one for the next block.
pub struct ProofSearch<H> {
    header: H,
    target: u32,
    nonce: u64,
    multiplier: u64,
    state: SearchState,
    attempts: u64,
}

impl<H: HeaderSource> ProofSearch<H> {
    pub fn new(header: H, target: u32) -> Self {
        Self::with_nonce(header, target, random_seed())
    }

    /// Starts from a fixed nonce instead of a random seed.
    pub fn with_nonce(header: H, target: u32, nonce: u64) -> Self {
        Self {
            header,
            target: target.max(1),
            nonce,
            multiplier: 1,
            state: SearchState::SearchingNonce,
            attempts: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn header(&self) -> &H {
        &self.header
    }

    /// Multiplier attempts made so far, across restarts.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Swaps the block candidate and starts over from a fresh nonce seed.
    pub fn replace_header(&mut self, header: H) {
        self.header = header;
        self.restart();
    }

    fn restart(&mut self) {
        self.nonce = random_seed();
        self.multiplier = 1;
        self.state = SearchState::SearchingNonce;
        debug!("proof search restarted at nonce {}", self.nonce);
    }

    /// Runs at most `round_size` nonce or multiplier attempts.
    pub fn run_round(&mut self, round_size: u32, cancel: &CancelToken) -> RoundOutcome {
        if let SearchState::ProofFound(proof) = &self.state {
            return RoundOutcome::Found(proof.clone());
        }
        if cancel.take() {
            self.restart();
            return RoundOutcome::Restarted;
        }

        for _ in 0..round_size.max(1) {
            match &self.state {
                SearchState::SearchingNonce => {
                    let digest = self.header.digest_with_nonce(self.nonce);
                    if digest.is_proof_eligible() {
                        debug!("nonce {} gives eligible digest {}", self.nonce, digest);
                        self.multiplier = 1;
                        self.state = SearchState::SearchingMultiplier {
                            digest: digest.to_biguint(),
                        };
                    } else {
                        self.nonce = self.nonce.wrapping_add(1);
                    }
                }
                SearchState::SearchingMultiplier { digest } => {
                    self.attempts += 1;
                    let multiplier = &*PRIMORIAL * BigUint::from(self.multiplier);
                    let origin = digest * &multiplier;
                    let found = find_prime_chain(&origin, self.target);
                    if found.length >= self.target {
                        let proof = Proof {
                            nonce: self.nonce,
                            multiplier,
                            chain_length: found.length,
                            chain_type: found.chain_type,
                        };
                        info!(
                            "proof found: nonce={} multiplier={} length={} type={}",
                            proof.nonce, proof.multiplier, proof.chain_length, proof.chain_type
                        );
                        self.state = SearchState::ProofFound(proof.clone());
                        return RoundOutcome::Found(proof);
                    }
                    self.multiplier += 1;
                }
                SearchState::ProofFound(proof) => return RoundOutcome::Found(proof.clone()),
            }
        }
        RoundOutcome::Pending
    }

    /// Runs rounds until a proof is found or `keep_going` returns false.
    ///
    /// `keep_going` is called after every unsuccessful round and is where the
    /// host processes its own events (and may trigger `cancel`). The HTTP
    /// miner drives `run_round` itself so it can yield to the runtime.
    #[cfg(test)]
    pub fn run(
        &mut self,
        round_size: u32,
        cancel: &CancelToken,
        mut keep_going: impl FnMut(&Self) -> bool,
    ) -> Option<Proof> {
        loop {
            match self.run_round(round_size, cancel) {
                RoundOutcome::Found(proof) => return Some(proof),
                RoundOutcome::Pending | RoundOutcome::Restarted => {
                    if !keep_going(self) {
                        return None;
                    }
                }
            }
        }
    }
}

fn random_seed() -> u64 {
    u64::from(rand::random::<u32>())
}
