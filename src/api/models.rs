use crate::blockchain::{Block, BlockTemplate, Blockchain};
use crate::config::Config;
use crate::pow::{ChainType, Proof};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Clone)]
pub struct MiningTemplate {
    pub template_id: String,
    pub template: BlockTemplate,
    pub target: u32,
}

/// Shared application state with an in-memory blockchain and the
/// templates handed out to external miners.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
    pub mining_templates: Mutex<HashMap<String, MiningTemplate>>,
    pub round_size: u32,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            blockchain: Mutex::new(Blockchain::new(config.chain_target)),
            mining_templates: Mutex::new(HashMap::new()),
            round_size: config.round_size,
        }
    }
}

/* ---------- Mining API Models ---------- */

#[derive(Deserialize)]
pub struct TemplateRequest {
    #[serde(default)]
    pub payload: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct TemplateResponse {
    pub template_id: String,
    pub index: u64,
    pub previous_hash: String,
    pub timestamp: i64,
    pub target: u32,
    pub payload: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SubmitRequest {
    pub template_id: String,
    pub proof: Proof,
}

#[derive(Serialize, Deserialize)]
pub struct SubmitResponse {
    pub accepted: bool,
    pub mined_index: Option<u64>,
    pub hash: Option<String>,
    pub reason: Option<String>,
}

impl SubmitResponse {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            mined_index: None,
            hash: None,
            reason: Some(reason.into()),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub target: u32,
    pub chain: &'a [Block],
}

#[derive(Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub target: u32,
}

#[derive(Deserialize)]
pub struct MineRequest {
    #[serde(default)]
    pub payload: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct MineResponse {
    pub mined_index: u64,
    pub hash: String,
    pub proof: Proof,
    pub restarts: u32,
    pub attempts: u64,
}

#[derive(Serialize, Deserialize)]
pub struct TargetResponse {
    pub target: u32,
}

#[derive(Serialize, Deserialize)]
pub struct ChainPrimesResponse {
    pub index: u64,
    pub origin: String,
    pub chain_type: ChainType,
    pub chain_length: u32,
    pub primes: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub height: usize,
    pub target: u32,
    pub round_size: u32,
    pub stats_window: usize,
    pub last_interval_secs: Option<i64>,
    pub avg_interval_secs: Option<f64>,
    pub pending_templates: usize,
    pub chain_types: HashMap<String, usize>,
}
