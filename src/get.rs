//! Interaction lookup for `cwb get`.

use anyhow::Result;

use customer_workbench_core::models::InteractionDto;
use customer_workbench_core::ServiceError;

use crate::config::Config;
use crate::db;

fn or_dash<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Prints one interaction. An unknown id prints `Error: …` and exits 1.
pub async fn run_get(config: &Config, id: i64) -> Result<()> {
    let service = db::open_service(config).await?;

    let dto = match service.find_by_id(Some(id)).await {
        Ok(dto) => dto,
        Err(ServiceError::Storage(e)) => return Err(e),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    print_interaction(&dto);
    Ok(())
}

fn print_interaction(dto: &InteractionDto) {
    println!("--- Interaction ---");
    println!("id:               {}", or_dash(&dto.id));
    println!("customer_id:      {}", or_dash(&dto.customer_id));
    println!("product_id:       {}", or_dash(&dto.product_id));
    println!("interaction_type: {}", or_dash(&dto.interaction_type));
    println!("customer_rating:  {}", or_dash(&dto.customer_rating));
    println!("interaction_date: {}", or_dash(&dto.interaction_date));
    println!();

    println!("--- Feedback ---");
    println!("{}", dto.feedback.as_deref().unwrap_or(""));
    println!();

    println!("--- Support Response ---");
    println!(
        "{}",
        dto.responses_from_customer_support.as_deref().unwrap_or("")
    );
}
