use std::collections::HashMap;

use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};
use crate::blockchain::STATS_WINDOW;

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let (height, target, last_interval, avg_interval, chain_types) = {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        let height = bc.len();

        let last_interval_secs = if height >= 2 {
            let newer = &bc.chain[height - 1];
            let older = &bc.chain[height - 2];
            Some((newer.timestamp - older.timestamp).max(0))
        } else {
            None
        };

        // average over the most recent window
        let avg_secs = if height > STATS_WINDOW {
            let start = height - (STATS_WINDOW + 1);
            let total: i64 = (start + 1..height)
                .map(|i| (bc.chain[i].timestamp - bc.chain[i - 1].timestamp).max(1))
                .sum();
            Some(total as f64 / STATS_WINDOW as f64)
        } else {
            None
        };

        let mut chain_types: HashMap<String, usize> = HashMap::new();
        for proof in bc.chain.iter().filter_map(|b| b.proof.as_ref()) {
            *chain_types.entry(proof.chain_type.to_string()).or_default() += 1;
        }

        (height, bc.target(), last_interval_secs, avg_secs, chain_types)
    };

    let pending_templates = {
        let map = state.mining_templates.lock().expect("mutex poisoned");
        map.len()
    };

    HttpResponse::Ok().json(StatsResponse {
        height,
        target,
        round_size: state.round_size,
        stats_window: STATS_WINDOW,
        last_interval_secs: last_interval,
        avg_interval_secs: avg_interval,
        pending_templates,
        chain_types,
    })
}
