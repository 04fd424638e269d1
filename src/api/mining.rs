use actix_web::{HttpResponse, Responder, post, web};
use log::{debug, info, warn};
use uuid::Uuid;

use super::models::{
    AppState, MiningTemplate, SubmitRequest, SubmitResponse, TemplateRequest, TemplateResponse,
};
use crate::blockchain::Block;

/// Hand out a template (fixed timestamp, parent and payload) for an
/// external miner to search a proof against.
#[post("/mining/template/")]
pub async fn get_template(
    state: web::Data<AppState>,
    req: web::Json<TemplateRequest>,
) -> impl Responder {
    let payload = req.into_inner().payload;

    // snapshot head/target
    let (template, target) = {
        let bc = state.blockchain.lock().expect("mutex");
        (bc.next_template(payload), bc.target())
    };

    let template_id = Uuid::new_v4().to_string();
    {
        let mut map = state.mining_templates.lock().expect("mutex");
        map.insert(
            template_id.clone(),
            MiningTemplate {
                template_id: template_id.clone(),
                template: template.clone(),
                target,
            },
        );
    }

    debug!(
        "TEMPLATE id={} height={} entries={} target={}",
        &template_id,
        template.index,
        template.payload.len(),
        target
    );

    HttpResponse::Ok().json(TemplateResponse {
        template_id,
        index: template.index,
        previous_hash: template.previous_hash,
        timestamp: template.timestamp,
        target,
        payload: template.payload,
    })
}

/// Submit a proof for a template. The node rebuilds the header from the
/// stored template and verifies the chain itself before appending.
#[post("/mining/submit/")]
pub async fn submit_solution(
    state: web::Data<AppState>,
    req: web::Json<SubmitRequest>,
) -> impl Responder {
    let SubmitRequest { template_id, proof } = req.into_inner();

    // single use
    let template = {
        let mut map = state.mining_templates.lock().expect("mutex");
        match map.remove(&template_id) {
            Some(t) => t,
            None => {
                return HttpResponse::BadRequest()
                    .json(SubmitResponse::rejected("unknown template"));
            }
        }
    };

    let block = Block::seal(template.template, proof);
    let mut bc = state.blockchain.lock().expect("mutex");
    if let Err(e) = bc.append_premined_block(block) {
        warn!("REJECTED template {}: {}", template.template_id, e);
        return HttpResponse::BadRequest().json(SubmitResponse::rejected(e.to_string()));
    }

    let (mined_index, hash) = {
        let sealed = bc.last_block();
        (sealed.index, sealed.hash.clone())
    };
    drop(bc);
    info!(
        "ACCEPTED template {} -> block#{} hash={} target={}",
        template.template_id, mined_index, hash, template.target
    );
    prune_stale_templates(&state, &hash);

    HttpResponse::Ok().json(SubmitResponse {
        accepted: true,
        mined_index: Some(mined_index),
        hash: Some(hash),
        reason: None,
    })
}

/// Drops every template not built on `head_hash`; they can no longer be
/// appended.
pub(super) fn prune_stale_templates(state: &AppState, head_hash: &str) {
    let mut map = state.mining_templates.lock().expect("mutex");
    let before = map.len();
    map.retain(|_, t| t.template.previous_hash == head_hash);
    if map.len() < before {
        debug!("TEMPLATE pruned {} stale entries", before - map.len());
    }
}
