//! Maps MAF repository simple variants onto the fields of the molecular genetics
//! documentation form.
//!
//! String fields are null-safe (null becomes ""), the numeric ones are required:
//! a record without positions, depth or allelic frequency can't be documented and
//! fails the whole request.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::catalog::{
    BatchVersionResolver, VersionResolver, CHROMOSOME_CATALOG, DOKUMENTATION_CATALOG,
    ERGEBNIS_CATALOG, MOLEKULARGENETIK_CATALOG,
};
use crate::data_types::{OutputRecord, VariantRecord, VersionedValue};

/// "Erweiterte Dokumentation"
pub const DOKUMENTATION_ERWEITERT: &str = "ERW";
/// "Pathogen"
pub const ERGEBNIS_PATHOGEN: &str = "P";

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Simple variant is missing required field {field:?}")]
    MissingRequiredField { field: &'static str },
}

pub type MappingResult<T, E = MappingError> = Result<T, E>;

fn or_empty(value: Option<String>) -> String {
    value.unwrap_or_default()
}

fn required<T>(value: Option<T>, field: &'static str) -> MappingResult<T> {
    value.ok_or(MappingError::MissingRequiredField { field })
}

/// Percentage with three decimals and a decimal comma: 0.123456 becomes "12,346".
///
/// Rounds the shortest decimal form of the percentage half away from zero, so
/// 0.123455 becomes "12,346" even though its binary value sits just below the midpoint.
pub fn format_allelic_frequency(allelic_frequency: f64) -> String {
    let percentage = allelic_frequency * 100.0;

    match Decimal::from_str(&percentage.to_string()) {
        Ok(decimal) => format!(
            "{:.3}",
            decimal.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        ),
        // Not finite, or beyond what a Decimal holds
        Err(_) => format!("{percentage:.3}"),
    }
    .replace('.', ",")
}

pub async fn map_variant(
    record: VariantRecord,
    versions: &mut BatchVersionResolver<'_>,
) -> MappingResult<OutputRecord> {
    let start_position = required(record.start_position, "startPosition")?;
    let end_position = required(record.end_position, "endPosition")?;
    let tdepth = required(record.tdepth, "tdepth")?;
    let allelic_frequency = required(record.allelic_frequency, "allelicFrequency")?;

    let hugo_symbol = or_empty(record.hugo_symbol);
    let exon = or_empty(record.exon);

    Ok(OutputRecord {
        dokumentation: VersionedValue::new(
            DOKUMENTATION_ERWEITERT,
            versions.find_version(DOKUMENTATION_CATALOG).await,
        ),
        ergebnis: VersionedValue::new(
            ERGEBNIS_PATHOGEN,
            versions.find_version(ERGEBNIS_CATALOG).await,
        ),
        ev_chromosom: VersionedValue::new(
            or_empty(record.chromosome),
            versions.find_version(CHROMOSOME_CATALOG).await,
        ),
        untersucht: VersionedValue::new(
            hugo_symbol.clone(),
            versions.find_version(MOLEKULARGENETIK_CATALOG).await,
        ),
        cdna_nomenklatur: or_empty(record.hgvsc),
        proteinebene_nomenklatur: or_empty(record.hgvsp),
        exon_int: exon.clone(),
        exon_text: exon,
        ev_ensembl_id: or_empty(record.gene),
        ev_hgnc_id: or_empty(record.hgnc_id),
        ev_hgnc_symbol: hugo_symbol,
        ev_hgnc_name: or_empty(record.gene_name),
        ev_start: start_position.to_string(),
        ev_ende: end_position.to_string(),
        ev_alt_nucleotide: or_empty(record.tumor_seq_allele2),
        ev_ref_nucleotide: or_empty(record.reference_allele),
        ev_nm_nummer: or_empty(record.nm_number),
        coverage: tdepth.to_string(),
        allelfrequenz: format_allelic_frequency(allelic_frequency),
        ev_dbsnp_id: or_empty(record.db_snp_rs),
    })
}

/// One output record per input record, in input order. Catalog versions are looked up
/// once per catalog for the whole batch.
pub async fn map_variants(
    records: Vec<VariantRecord>,
    resolver: &VersionResolver,
) -> MappingResult<Vec<OutputRecord>> {
    let mut versions = resolver.batch();
    let mut mapped = Vec::with_capacity(records.len());

    for record in records {
        mapped.push(map_variant(record, &mut versions).await?);
    }

    debug!("Mapped {} simple variants", mapped.len());
    Ok(mapped)
}
