//! Interaction search for `cwb search`.
//!
//! Flags are turned into the same name/value pairs the HTTP query string
//! carries and parsed by [`parse_search_query`], so the CLI and the API
//! accept exactly the same inputs.

use anyhow::{anyhow, Result};

use customer_workbench_core::models::InteractionDto;

use crate::config::Config;
use crate::db;
use crate::server::parse_search_query;

/// Flags of `cwb search`, as typed on the command line.
#[derive(Debug, Default, Clone)]
pub struct SearchArgs {
    pub customer_id: Option<i32>,
    pub product_id: Option<i32>,
    pub interaction_type: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub page: u32,
    pub size: Option<u32>,
    pub sort: Vec<String>,
}

impl SearchArgs {
    fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(v) = value {
                pairs.push((key.to_string(), v));
            }
        };
        push("customerId", self.customer_id.map(|v| v.to_string()));
        push("productId", self.product_id.map(|v| v.to_string()));
        push("interactionType", self.interaction_type.clone());
        push("startDate", self.start.clone());
        push("endDate", self.end.clone());
        push("page", Some(self.page.to_string()));
        push("size", self.size.map(|v| v.to_string()));
        for s in &self.sort {
            push("sort", Some(s.clone()));
        }
        pairs
    }
}

pub async fn run_search(config: &Config, args: &SearchArgs) -> Result<()> {
    let query = parse_search_query(&args.to_pairs(), &config.paging).map_err(|e| anyhow!(e))?;

    let service = db::open_service(config).await?;
    let page = service.search(Some(&query.criteria), &query.page).await?;

    if page.empty {
        println!("No results.");
        return Ok(());
    }

    println!(
        "{:>8}  {:>10}  {:>10}  {:<7}  {:>6}  {:<19}  {}",
        "ID", "CUSTOMER", "PRODUCT", "TYPE", "RATING", "DATE", "FEEDBACK"
    );
    println!("{}", "-".repeat(96));
    for dto in &page.content {
        println!("{}", format_row(dto));
    }
    println!();
    println!(
        "page {} of {} ({} of {} interactions)",
        page.number + 1,
        page.total_pages,
        page.number_of_elements,
        page.total_elements
    );

    Ok(())
}

fn format_row(dto: &InteractionDto) -> String {
    let feedback = dto.feedback.as_deref().unwrap_or("");
    let feedback: String = if feedback.chars().count() > 30 {
        let cut: String = feedback.chars().take(29).collect();
        format!("{}…", cut)
    } else {
        feedback.to_string()
    };

    format!(
        "{:>8}  {:>10}  {:>10}  {:<7}  {:>6}  {:<19}  {}",
        dto.id.map(|v| v.to_string()).unwrap_or_default(),
        dto.customer_id.map(|v| v.to_string()).unwrap_or_default(),
        dto.product_id.map(|v| v.to_string()).unwrap_or_default(),
        dto.interaction_type
            .map(|t| t.to_string())
            .unwrap_or_default(),
        dto.customer_rating
            .map(|v| v.to_string())
            .unwrap_or_default(),
        dto.interaction_date
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        feedback
    )
}
