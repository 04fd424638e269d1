use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::mining::prune_stale_templates;
use super::models::{
    AppState, ChainPrimesResponse, ChainResponse, MineRequest, MineResponse, TargetResponse,
    ValidateResponse,
};
use crate::blockchain::{Block, BlockError};
use crate::pow::{CancelToken, ProofSearch, RoundOutcome, expand_chain};

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let resp = ChainResponse {
        length: bc.len(),
        target: bc.target(),
        chain: &bc.chain,
    };
    HttpResponse::Ok().json(resp)
}

/// Validate the whole chain, re-walking every proof.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let resp = ValidateResponse {
        valid: bc.is_valid_chain(),
        length: bc.len(),
        target: bc.target(),
    };
    HttpResponse::Ok().json(resp)
}

/// Mine a new block on top of the current head:
/// - Run the proof search in bounded rounds, yielding between them
/// - If the head moves (a submitted proof won), cancel and restart on the new head
/// - Append once a proof is found, then drop templates left on the old head
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>, req: web::Json<MineRequest>) -> impl Responder {
    let payload = req.into_inner().payload;

    let (template, target) = {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        (bc.next_template(payload.clone()), bc.target())
    };
    debug!(
        "MINER - searching block #{} (target={}, round_size={})",
        template.index, target, state.round_size
    );

    let cancel = CancelToken::new();
    let mut search = ProofSearch::new(template, target);
    let mut restarts = 0u32;

    loop {
        match search.run_round(state.round_size, &cancel) {
            RoundOutcome::Found(proof) => {
                let block = Block::seal(search.header().clone(), proof.clone());
                let mut bc = state.blockchain.lock().expect("mutex poisoned");
                match bc.append_premined_block(block) {
                    Ok(()) => {
                        let sealed = bc.last_block();
                        let resp = MineResponse {
                            mined_index: sealed.index,
                            hash: sealed.hash.clone(),
                            proof,
                            restarts,
                            attempts: search.attempts(),
                        };
                        drop(bc);
                        info!(
                            "MINER - sealed block #{} (hash={}, {} length {}, {} attempts)",
                            resp.mined_index,
                            resp.hash,
                            resp.proof.chain_type,
                            resp.proof.chain_length,
                            resp.attempts
                        );
                        prune_stale_templates(&state, &resp.hash);
                        return HttpResponse::Ok().json(resp);
                    }
                    Err(BlockError::StaleParent) => {
                        // lost the race right at the finish line
                        let next = bc.next_template(payload.clone());
                        drop(bc);
                        warn!("MINER - proof went stale, restarting on #{}", next.index);
                        search.replace_header(next);
                        restarts += 1;
                    }
                    Err(e) => {
                        warn!("MINER - own block rejected: {e}");
                        return HttpResponse::InternalServerError().body(e.to_string());
                    }
                }
            }
            RoundOutcome::Restarted => {
                let next = {
                    let bc = state.blockchain.lock().expect("mutex poisoned");
                    bc.next_template(payload.clone())
                };
                debug!("MINER - head moved, restarting on #{}", next.index);
                search.replace_header(next);
                restarts += 1;
            }
            RoundOutcome::Pending => {
                actix_web::rt::task::yield_now().await;
                let head_moved = {
                    let bc = state.blockchain.lock().expect("mutex poisoned");
                    bc.last_block().hash != search.header().previous_hash
                };
                if head_moved {
                    cancel.trigger();
                }
            }
        }
    }
}

/// Get the fixed target chain length.
#[get("/target/")]
pub async fn get_target(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(TargetResponse {
        target: bc.target(),
    })
}

/// List the primes of a sealed block's chain as decimal strings.
#[get("/chain/{index}/primes/")]
pub async fn get_chain_primes(
    state: web::Data<AppState>,
    path: web::Path<(u64,)>,
) -> impl Responder {
    let index = path.into_inner().0;
    let block = {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        match bc.chain.get(index as usize) {
            Some(b) => b.clone(),
            None => return HttpResponse::NotFound().body("no block at that index"),
        }
    };
    let Some(proof) = block.proof.as_ref() else {
        return HttpResponse::BadRequest().body("block has no proof");
    };

    let origin = proof.origin(&block.header_digest().to_biguint());
    match expand_chain(&origin, proof.chain_length, proof.chain_type) {
        Ok(primes) => HttpResponse::Ok().json(ChainPrimesResponse {
            index,
            origin: origin.to_string(),
            chain_type: proof.chain_type,
            chain_length: proof.chain_length,
            primes: primes.iter().map(|p| p.to_string()).collect(),
        }),
        Err(e) => {
            warn!("expand block #{index}: {e}");
            HttpResponse::UnprocessableEntity().body(e.to_string())
        }
    }
}
