//! Conversion between [`InteractionRecord`] and [`InteractionDto`].
//!
//! Both directions are straight field-by-field copies. The record→DTO
//! direction drops `version`, `date_created` and `date_updated`; the
//! DTO→record direction leaves them unset for the store to assign.

use crate::error::{Result, ServiceError};
use crate::models::{InteractionDto, InteractionRecord};

pub fn to_dto(record: &InteractionRecord) -> InteractionDto {
    InteractionDto {
        id: record.id,
        product_id: Some(record.product_id),
        customer_id: Some(record.customer_id),
        interaction_type: Some(record.interaction_type),
        customer_rating: record.customer_rating,
        feedback: record.feedback.clone(),
        interaction_date: record.interaction_date,
        responses_from_customer_support: record.responses_from_customer_support.clone(),
    }
}

/// Builds a record from a DTO, failing when a required field is missing.
pub fn to_record(dto: &InteractionDto) -> Result<InteractionRecord> {
    let product_id = dto
        .product_id
        .ok_or_else(|| ServiceError::invalid("productId is required"))?;
    let customer_id = dto
        .customer_id
        .ok_or_else(|| ServiceError::invalid("customerId is required"))?;
    let interaction_type = dto
        .interaction_type
        .ok_or_else(|| ServiceError::invalid("interactionType is required"))?;

    Ok(InteractionRecord {
        id: dto.id,
        product_id,
        customer_id,
        interaction_type,
        customer_rating: dto.customer_rating,
        feedback: dto.feedback.clone(),
        interaction_date: dto.interaction_date,
        responses_from_customer_support: dto.responses_from_customer_support.clone(),
        version: None,
        date_created: None,
        date_updated: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InteractionType;
    use chrono::NaiveDate;

    fn when() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn full_dto() -> InteractionDto {
        InteractionDto {
            id: Some(42),
            product_id: Some(10),
            customer_id: Some(20),
            interaction_type: Some(InteractionType::Email),
            customer_rating: Some(5),
            feedback: Some("Great support!".to_string()),
            interaction_date: Some(when()),
            responses_from_customer_support: Some("You're welcome".to_string()),
        }
    }

    #[test]
    fn test_to_record_copies_fields_and_leaves_storage_fields_unset() {
        let record = to_record(&full_dto()).unwrap();
        assert_eq!(record.id, Some(42));
        assert_eq!(record.product_id, 10);
        assert_eq!(record.customer_id, 20);
        assert_eq!(record.interaction_type, InteractionType::Email);
        assert_eq!(record.customer_rating, Some(5));
        assert_eq!(record.feedback.as_deref(), Some("Great support!"));
        assert_eq!(record.interaction_date, Some(when()));
        assert_eq!(
            record.responses_from_customer_support.as_deref(),
            Some("You're welcome")
        );
        assert!(record.version.is_none());
        assert!(record.date_created.is_none());
        assert!(record.date_updated.is_none());
    }

    #[test]
    fn test_to_dto_copies_shared_fields() {
        let mut record = to_record(&full_dto()).unwrap();
        record.id = Some(7);
        record.version = Some(3);
        record.date_created = Some(when());
        let dto = to_dto(&record);
        assert_eq!(dto.id, Some(7));
        assert_eq!(dto.product_id, Some(10));
        assert_eq!(dto.interaction_type, Some(InteractionType::Email));
        assert_eq!(dto.interaction_date, Some(when()));
    }

    #[test]
    fn test_round_trip_preserves_business_fields() {
        let original = to_record(&full_dto()).unwrap();
        let again = to_record(&to_dto(&original)).unwrap();
        assert_eq!(again, original);

        let sparse = InteractionDto {
            product_id: Some(1),
            customer_id: Some(2),
            interaction_type: Some(InteractionType::Form),
            ..Default::default()
        };
        let record = to_record(&sparse).unwrap();
        assert_eq!(to_record(&to_dto(&record)).unwrap(), record);
    }

    #[test]
    fn test_missing_required_field_is_invalid_input() {
        let mut dto = full_dto();
        dto.interaction_type = None;
        match to_record(&dto) {
            Err(ServiceError::InvalidInput(msg)) => assert!(msg.contains("interactionType")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        let mut dto = full_dto();
        dto.customer_id = None;
        assert!(matches!(to_record(&dto), Err(ServiceError::InvalidInput(_))));
    }
}
