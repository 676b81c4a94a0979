// csv.rs - Canonical 19-column CSV reader and writer

use crate::core::Method;
use crate::data::record::{CanonicalRecord, StructureMeta, CANONICAL_COLUMNS};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Token written for missing values
pub const NAN_TOKEN: &str = "";

fn float_field(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:?}", v),
        _ => NAN_TOKEN.to_string(),
    }
}

fn count_field(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NAN_TOKEN.to_string())
}

fn meta_fields(meta: &Option<StructureMeta>) -> [String; 4] {
    match meta {
        Some(m) => [m.name.clone(), m.group.clone(), m.species.clone(), m.chain.clone()],
        None => Default::default(),
    }
}

/// Render one record as its 19 CSV fields
pub fn record_to_fields(record: &CanonicalRecord) -> Vec<String> {
    let mut fields = vec![
        record.reference_id.clone(),
        record.mobile_id.clone(),
        record.method.to_string(),
        float_field(record.rmsd),
        count_field(record.coverage),
        count_field(record.reference_size),
        count_field(record.mobile_size),
        float_field(record.time),
        float_field(record.si),
        float_field(record.mi),
        float_field(record.sas),
    ];
    fields.extend(meta_fields(&record.reference_meta));
    fields.extend(meta_fields(&record.mobile_meta));
    fields
}

fn is_missing(field: &str) -> bool {
    let field = field.trim();
    field.is_empty() || field.eq_ignore_ascii_case("nan") || field == "NA"
}

fn parse_float(field: &str, column: &str) -> Result<Option<f64>, String> {
    if is_missing(field) {
        return Ok(None);
    }
    field
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("Failed to parse '{}' in column {} as a number", field, column))
}

/// Counts may have been written as floats (e.g. `250.0`) by other tools
fn parse_count(field: &str, column: &str) -> Result<Option<u64>, String> {
    if is_missing(field) {
        return Ok(None);
    }
    let cleaned = field.trim();
    if let Ok(v) = cleaned.parse::<u64>() {
        return Ok(Some(v));
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.fract() == 0.0 => Ok(Some(v as u64)),
        _ => Err(format!("Failed to parse '{}' in column {} as a count", field, column)),
    }
}

fn parse_meta(fields: &[&str]) -> Option<StructureMeta> {
    if fields.iter().all(|f| f.is_empty()) {
        return None;
    }
    Some(StructureMeta {
        name: fields[0].to_string(),
        group: fields[1].to_string(),
        species: fields[2].to_string(),
        chain: fields[3].to_string(),
    })
}

/// Parse one 19-field row
pub fn record_from_fields(fields: &[&str]) -> Result<CanonicalRecord, String> {
    if fields.len() != CANONICAL_COLUMNS.len() {
        return Err(format!(
            "row has {} columns, expected {}",
            fields.len(),
            CANONICAL_COLUMNS.len()
        ));
    }
    Ok(CanonicalRecord {
        reference_id: fields[0].to_string(),
        mobile_id: fields[1].to_string(),
        method: Method::from_str(fields[2])?,
        rmsd: parse_float(fields[3], CANONICAL_COLUMNS[3])?,
        coverage: parse_count(fields[4], CANONICAL_COLUMNS[4])?,
        reference_size: parse_count(fields[5], CANONICAL_COLUMNS[5])?,
        mobile_size: parse_count(fields[6], CANONICAL_COLUMNS[6])?,
        time: parse_float(fields[7], CANONICAL_COLUMNS[7])?,
        si: parse_float(fields[8], CANONICAL_COLUMNS[8])?,
        mi: parse_float(fields[9], CANONICAL_COLUMNS[9])?,
        sas: parse_float(fields[10], CANONICAL_COLUMNS[10])?,
        reference_meta: parse_meta(&fields[11..15]),
        mobile_meta: parse_meta(&fields[15..19]),
    })
}

/// Write records without a header row
pub fn write_records<W: Write>(writer: W, records: &[CanonicalRecord]) -> Result<(), String> {
    let mut csv_writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for record in records {
        csv_writer
            .write_record(record_to_fields(record))
            .map_err(|e| format!("Write error: {}", e))?;
    }
    csv_writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    Ok(())
}

/// Read header-less canonical rows
pub fn read_records<R: Read>(reader: R) -> Result<Vec<CanonicalRecord>, String> {
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row_num, row) in csv_reader.records().enumerate() {
        let row = row.map_err(|e| format!("Failed to read CSV row {}: {}", row_num + 1, e))?;
        let fields: Vec<&str> = row.iter().collect();
        let record = record_from_fields(&fields)
            .map_err(|e| format!("CSV row {}: {}", row_num + 1, e))?;
        records.push(record);
    }
    Ok(records)
}

/// Write records to a file, creating its parent directory
pub fn write_records_to_path<P: AsRef<Path>>(path: P, records: &[CanonicalRecord]) -> Result<(), String> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| {
            format!("Failed to create parent directory '{}': {}", parent.display(), e)
        })?;
    }
    let file = File::create(path)
        .map_err(|e| format!("Failed to create output file '{}': {}", path.display(), e))?;
    write_records(file, records)?;
    println!("✅ {} records written to: {}", records.len(), path.display());
    Ok(())
}

/// Load a canonical CSV file
pub fn read_records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CanonicalRecord>, String> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| format!("Failed to open CSV file '{}': {}", path.display(), e))?;
    let records = read_records(file).map_err(|e| format!("{}: {}", path.display(), e))?;
    println!("✅ CSV loaded: {} records from {}", records.len(), path.display());
    Ok(records)
}
