//! Chat assistant over the cached asset data
//!
//! Stateless: every message is answered from a fresh search of the cache.

pub mod intent;
pub mod llm;

use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;

use crate::db::assistant::{AssetSearch, search_assets};
use crate::error::ServiceResult;
use intent::AssetFilters;
use llm::LlmClient;

pub const SYSTEM_PROMPT: &str = "You are an IT asset assistant for an HR and device management team. \
Answer questions using only the JSON context provided with each message. \
The context holds the filters derived from the question, the number of matching assets, \
a breakdown by status and a sample of matching assets. \
If the context does not contain the answer, say so. Never invent assets, people or numbers. \
Keep answers short and factual.";

#[derive(Debug, Serialize)]
pub struct ChatReply {
    /// Model output, verbatim
    pub reply: String,
    pub filters: AssetFilters,
    /// Assets matching the filters
    pub matched: i64,
}

/// User turn: the JSON context followed by the question.
pub fn build_user_prompt(message: &str, filters: &AssetFilters, search: &AssetSearch) -> String {
    let context = json!({
        "filters": filters,
        "matched_assets": search.total,
        "by_status": search.by_status,
        "samples": search.samples,
    });
    format!("Context:\n{context}\n\nQuestion:\n{message}")
}

pub async fn chat(
    pool: &PgPool,
    llm: &dyn LlmClient,
    message: &str,
    sample_limit: i64,
) -> ServiceResult<ChatReply> {
    let filters = intent::extract_filters(message);
    let search = search_assets(pool, &filters, sample_limit).await?;
    tracing::debug!(?filters, matched = search.total, "Assistant context built");

    let prompt = build_user_prompt(message, &filters, &search);
    let reply = llm.complete(SYSTEM_PROMPT, &prompt).await?;

    Ok(ChatReply {
        reply,
        filters,
        matched: search.total,
    })
}
