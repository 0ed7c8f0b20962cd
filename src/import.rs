//! One-shot CSV bulk import run before the server starts accepting traffic.
//!
//! Records have no header and exactly four columns: lastname, name, a combined
//! "zipcode city" field and the colour code. Bad lines are reported and
//! skipped; good lines are inserted one by one.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::logging::SanitizedName;
use crate::models::{NewPerson, validate_person};
use crate::store::PersonStore;
use crate::validator::Validator;

const FIELDS_PER_RECORD: usize = 4;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub rejected: usize,
}

/// Imports every valid record of the file at `path` into `store`.
///
/// Failures land in `v` under `csv` (unreadable file, malformed or invalid
/// record) or `db` (insert failure). `v` keeps one message per key, so each
/// failure is logged as it happens as well.
#[tracing::instrument(name = "csv_import", skip(store, v))]
pub async fn load_from_csv(
    store: &dyn PersonStore,
    v: &mut Validator,
    path: &Path,
) -> ImportSummary {
    let mut summary = ImportSummary::default();

    let mut reader = match ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(err) => {
            tracing::error!(error = %err, "Failed to open CSV file");
            v.add_error("csv", err.to_string());
            return summary;
        }
    };

    for (index, result) in reader.records().enumerate() {
        let line = index + 1;

        let record = match result.and_then(|record| check_field_count(record, line)) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(line, error = %err, "Unreadable CSV record");
                v.add_error("csv", err.to_string());
                summary.rejected += 1;
                continue;
            }
        };

        let person = parse_record(&record);
        let mut record_errors = Validator::new();
        validate_person(&mut record_errors, &person);
        if !record_errors.is_valid() {
            tracing::warn!(
                line,
                fields = ?record_errors.errors().keys().collect::<Vec<_>>(),
                "Invalid CSV data record"
            );
            v.add_error("csv", format!("line {line}: invalid data record"));
            summary.rejected += 1;
            continue;
        }

        match store.insert(person).await {
            Ok(stored) => {
                tracing::debug!(
                    line,
                    person_id = stored.id,
                    lastname = %SanitizedName::new(&stored.lastname),
                    "Imported person"
                );
                summary.imported += 1;
            }
            Err(err) => {
                tracing::error!(line, error = %err, "Failed to store CSV record");
                v.add_error("db", err.to_string());
                summary.rejected += 1;
            }
        }
    }

    tracing::info!(
        imported = summary.imported,
        rejected = summary.rejected,
        "CSV import finished"
    );
    summary
}

fn check_field_count(record: StringRecord, line: usize) -> csv::Result<StringRecord> {
    if record.len() == FIELDS_PER_RECORD {
        return Ok(record);
    }
    Err(csv::Error::from(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!(
            "record on line {line}: wrong number of fields (expected {FIELDS_PER_RECORD}, found {})",
            record.len()
        ),
    )))
}

/// Maps a four-column record onto a person. Never fails; bad values surface
/// during validation instead.
pub fn parse_record(record: &StringRecord) -> NewPerson {
    let field = |index: usize| record.get(index).unwrap_or_default().trim();

    let (zipcode, city) = split_zip_city(field(2));
    NewPerson {
        lastname: field(0).to_string(),
        name: field(1).to_string(),
        zipcode,
        city,
        color: field(3).parse::<i32>().unwrap_or(0),
    }
}

/// Splits "67742 Lauterecken" into zip code and city.
///
/// The zip code is the run of leading digits. Without a leading digit, or
/// without any non-digit at all, the whole field is the city.
pub fn split_zip_city(field: &str) -> (String, String) {
    match field.find(|c: char| !c.is_ascii_digit()) {
        Some(split) if split > 0 => (
            field[..split].to_string(),
            field[split..].trim().to_string(),
        ),
        _ => (String::new(), field.to_string()),
    }
}
