//! Delimited-text format for bulk interaction uploads.
//!
//! Columns are bound by header name through the [`COLUMNS`] table, so a
//! file with the known headers in any order parses the same way. Columns
//! not listed there (an `id` column, for instance) are ignored. Empty cells
//! become `None`; required fields are validated later by the service.

use anyhow::Context;
use chrono::NaiveDateTime;

use crate::error::{Result, ServiceError};
use crate::models::InteractionDto;

/// Format of the `timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// DTO field a CSV column binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvField {
    ProductId,
    CustomerId,
    InteractionType,
    CustomerRating,
    Feedback,
    InteractionDate,
    ResponsesFromCustomerSupport,
}

/// Header name → field binding, in canonical column order.
pub const COLUMNS: [(&str, CsvField); 7] = [
    ("product_id", CsvField::ProductId),
    ("customer_id", CsvField::CustomerId),
    ("interaction_type", CsvField::InteractionType),
    ("customer_rating", CsvField::CustomerRating),
    ("feedback", CsvField::Feedback),
    ("timestamp", CsvField::InteractionDate),
    (
        "responses_from_customer_support",
        CsvField::ResponsesFromCustomerSupport,
    ),
];

/// The canonical header line.
pub fn header() -> String {
    COLUMNS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses CSV bytes into transport objects.
///
/// Returns an empty vector when the file has a header but no rows, or when
/// the header names none of the known columns.
pub fn parse(bytes: &[u8]) -> Result<Vec<InteractionDto>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader.headers().map_err(parse_error)?.clone();
    let bindings: Vec<(usize, CsvField)> = COLUMNS
        .iter()
        .filter_map(|(name, field)| {
            headers
                .iter()
                .position(|h| h == *name)
                .map(|idx| (idx, *field))
        })
        .collect();

    if bindings.is_empty() {
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(parse_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let mut dto = InteractionDto::default();
        for (idx, field) in &bindings {
            let cell = record.get(*idx).map(str::trim_start).unwrap_or_default();
            if cell.trim().is_empty() {
                continue;
            }
            bind_cell(&mut dto, *field, cell).map_err(|msg| {
                ServiceError::invalid(format!("Failed to parse CSV file: line {}: {}", line, msg))
            })?;
        }
        rows.push(dto);
    }

    Ok(rows)
}

fn bind_cell(
    dto: &mut InteractionDto,
    field: CsvField,
    cell: &str,
) -> std::result::Result<(), String> {
    match field {
        CsvField::ProductId => dto.product_id = Some(parse_int("product_id", cell)?),
        CsvField::CustomerId => dto.customer_id = Some(parse_int("customer_id", cell)?),
        CsvField::CustomerRating => {
            dto.customer_rating = Some(parse_int("customer_rating", cell)?)
        }
        CsvField::InteractionType => {
            dto.interaction_type = Some(cell.trim_end().parse().map_err(|e| format!("{}", e))?)
        }
        CsvField::Feedback => dto.feedback = Some(cell.to_string()),
        CsvField::InteractionDate => {
            let ts = NaiveDateTime::parse_from_str(cell.trim_end(), TIMESTAMP_FORMAT).map_err(
                |_| format!("invalid timestamp '{}' (expected yyyy-MM-dd HH:mm:ss)", cell),
            )?;
            dto.interaction_date = Some(ts);
        }
        CsvField::ResponsesFromCustomerSupport => {
            dto.responses_from_customer_support = Some(cell.to_string())
        }
    }
    Ok(())
}

fn parse_int(column: &str, cell: &str) -> std::result::Result<i32, String> {
    cell.trim_end()
        .parse::<i32>()
        .map_err(|_| format!("invalid {} '{}'", column, cell))
}

fn parse_error(err: csv::Error) -> ServiceError {
    ServiceError::invalid(format!("Failed to parse CSV file: {}", err))
}

/// Renders transport objects as CSV, header first, in canonical column order.
pub fn write(dtos: &[InteractionDto]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS.iter().map(|(name, _)| *name))?;
    for dto in dtos {
        writer.write_record(row_cells(dto))?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
    Ok(String::from_utf8(bytes)?)
}

fn row_cells(dto: &InteractionDto) -> [String; 7] {
    [
        opt_to_string(dto.product_id),
        opt_to_string(dto.customer_id),
        opt_to_string(dto.interaction_type),
        opt_to_string(dto.customer_rating),
        dto.feedback.clone().unwrap_or_default(),
        dto.interaction_date
            .map(|d| d.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default(),
        dto.responses_from_customer_support.clone().unwrap_or_default(),
    ]
}

fn opt_to_string<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
