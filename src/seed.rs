//! Sample data for demos and first runs.
//!
//! [`seed_if_empty`] fills an empty table with a handful of random but valid
//! interactions so the web client has something to show. A populated table
//! is left untouched.

use anyhow::Result;
use chrono::{Duration, Timelike, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use customer_workbench_core::csv_format;
use customer_workbench_core::models::{InteractionDto, InteractionType};
use customer_workbench_core::store::InteractionStore;
use customer_workbench_core::InteractionService;

const FEEDBACK: &[&str] = &[
    "Quick answer, problem solved on the first try.",
    "Had to explain the issue twice before anyone understood it.",
    "Friendly agent but the fix did not stick.",
    "Documentation link was exactly what I needed.",
    "Waited three days for a reply.",
    "Refund processed without any hassle.",
];

const RESPONSES: &[&str] = &[
    "Thanks for reaching out, we have escalated this to the product team.",
    "Glad we could help! Let us know if anything else comes up.",
    "Sorry for the delay, a replacement is on its way.",
    "We have reset your account settings, please try again.",
    "A specialist will follow up by email within 24 hours.",
];

/// A random interaction with every field populated and no id.
pub fn random_interaction() -> InteractionDto {
    let mut rng = rand::thread_rng();
    let days_ago = rng.gen_range(1..=60);
    let when = (Utc::now() - Duration::days(days_ago)).naive_utc();

    InteractionDto {
        id: None,
        product_id: Some(rng.gen_range(10_000_000..100_000_000)),
        customer_id: Some(rng.gen_range(10_000_000..100_000_000)),
        interaction_type: InteractionType::ALL.choose(&mut rng).copied(),
        customer_rating: Some(rng.gen_range(1..=5)),
        feedback: FEEDBACK.choose(&mut rng).map(|s| s.to_string()),
        interaction_date: when.with_nanosecond(0),
        responses_from_customer_support: RESPONSES.choose(&mut rng).map(|s| s.to_string()),
    }
}

/// A random interaction rendered as one CSV data row, in header order.
pub fn random_interaction_csv_row() -> Result<String> {
    let text = csv_format::write(&[random_interaction()])?;
    Ok(text.lines().nth(1).unwrap_or_default().to_string())
}

/// Inserts `count` random interactions when the store is empty.
///
/// Returns the ids that were created; empty when the store already held
/// data.
pub async fn seed_if_empty<S: InteractionStore>(
    service: &InteractionService<S>,
    count: usize,
) -> Result<Vec<i64>> {
    let existing = service.count().await?;
    if existing > 0 {
        info!(count = existing, "interaction data already present, skipping seed");
        return Ok(Vec::new());
    }

    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let created = service.create(Some(random_interaction())).await?;
        ids.extend(created.id);
    }
    info!(?ids, "seeded interaction data");
    Ok(ids)
}
