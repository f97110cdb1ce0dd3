//! Jet catalog CSV import and export.
//!
//! The format is `model,type,seatCapacity,hourlyRate` with one header line.
//! Fields are split on commas without any quoting support.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
    catalog::JetCatalog,
    models::{Jet, JetType},
};

/// Header written by [`write_catalog`].
pub const CSV_HEADER: &str = "model,type,seatCapacity,hourlyRate";

/// Outcome of parsing a catalog file.
#[derive(Debug, Clone, Default)]
pub struct CatalogImport {
    /// Successfully parsed jets, all available.
    pub jets: Vec<Jet>,
    /// Rows that were skipped, with the 1-based line number and reason.
    pub skipped: Vec<(usize, String)>,
}

/// Where the startup catalog came from.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    /// Parsed from the given CSV file.
    File(PathBuf),
    /// The built-in fleet, used when the file could not be read.
    Defaults,
}

/// The built-in five-jet fleet.
pub fn default_fleet() -> JetCatalog {
    [
        Jet::new("Gulfstream G650", JetType::UltraLongRange, 18, 12_000.0),
        Jet::new("Cessna Citation X", JetType::SuperMidSize, 8, 5_500.0),
        Jet::new("Embraer Phenom 300", JetType::LightJet, 6, 3_200.0),
        Jet::new("Bombardier Global 7500", JetType::UltraLongRange, 14, 15_000.0),
        Jet::new("Dassault Falcon 8X", JetType::LargeJet, 16, 9_800.0),
    ]
    .into_iter()
    .collect()
}

/// Parse catalog CSV text. Malformed rows are skipped, never fatal.
pub fn parse_catalog(content: &str) -> CatalogImport {
    let mut import = CatalogImport::default();
    // First line is the header.
    for (idx, line) in content.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Ok(jet) => import.jets.push(jet),
            Err(reason) => {
                warn!(line = line_no, %reason, "Skipping catalog row: {line}");
                import.skipped.push((line_no, reason));
            }
        }
    }
    import
}

fn parse_row(line: &str) -> Result<Jet, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 4 {
        return Err(format!("expected 4 fields, found {}", fields.len()));
    }
    let jet_type = fields[1]
        .parse::<JetType>()
        .map_err(|err| err.to_string())?;
    let seats = fields[2]
        .parse::<u32>()
        .map_err(|_| format!("invalid seat capacity '{}'", fields[2]))?;
    let rate = fields[3]
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite())
        .ok_or_else(|| format!("invalid hourly rate '{}'", fields[3]))?;
    Ok(Jet::new(fields[0], jet_type, seats, rate))
}

/// Read and parse a catalog file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogImport> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read jet catalog {}", path.display()))?;
    let import = parse_catalog(&content);
    info!(
        path = %path.display(),
        jets = import.jets.len(),
        skipped = import.skipped.len(),
        "Jet catalog loaded"
    );
    Ok(import)
}

/// Load the catalog file, falling back to [`default_fleet`] when it cannot be read.
pub fn load_or_default(path: impl AsRef<Path>) -> (JetCatalog, CatalogSource) {
    let path = path.as_ref();
    match load_catalog(path) {
        Ok(import) => (
            import.jets.into_iter().collect(),
            CatalogSource::File(path.to_path_buf()),
        ),
        Err(err) => {
            warn!("Using default fleet: {err:#}");
            (default_fleet(), CatalogSource::Defaults)
        }
    }
}

/// Write the catalog in import format, creating parent directories if needed.
pub fn write_catalog(path: impl AsRef<Path>, catalog: &JetCatalog) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for jet in catalog.iter() {
        let _ = writeln!(
            out,
            "{},{},{},{:.1}",
            jet.model, jet.jet_type, jet.seat_capacity, jet.hourly_rate
        );
    }
    fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn skips_bad_rows_and_keeps_going() {
        let content = "\
model,type,seatCapacity,hourlyRate
Gulfstream G650,Ultra Long Range,18,12000.0
Broken Jet,Light Jet,many,3000.0
Cessna Citation CJ4,Light Jet,7,3700.0
Short Row,Light Jet
Cheap Jet,Light Jet,4,free
Blimp,Airship,40,900
Embraer Legacy 500,Mid-Size,9,4800.0
";
        let import = parse_catalog(content);
        let models: Vec<_> = import.jets.iter().map(|jet| jet.model.as_str()).collect();
        assert_eq!(
            models,
            vec!["Gulfstream G650", "Cessna Citation CJ4", "Embraer Legacy 500"]
        );
        let skipped: Vec<_> = import.skipped.iter().map(|(line, _)| *line).collect();
        assert_eq!(skipped, vec![3, 5, 6, 7]);
        assert!(import.jets.iter().all(Jet::is_available));
    }

    #[test]
    fn header_is_ignored_even_if_it_looks_like_data() {
        let import = parse_catalog("A,Light Jet,4,1000\nB,Light Jet,4,2000\n");
        assert_eq!(import.jets.len(), 1);
        assert_eq!(import.jets[0].model, "B");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let (catalog, source) = load_or_default(dir.path().join("absent.csv"));
        assert_eq!(source, CatalogSource::Defaults);
        assert_eq!(catalog.count(), 5);
        assert!(load_catalog(dir.path().join("absent.csv")).is_err());
        Ok(())
    }

    #[test]
    fn written_catalog_loads_back() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data").join("jets_data.csv");
        write_catalog(&path, &default_fleet())?;

        let (catalog, source) = load_or_default(&path);
        assert_eq!(source, CatalogSource::File(path.clone()));
        assert_eq!(catalog.count(), 5);
        let g650 = catalog.by_index(0).expect("first jet");
        assert_eq!(g650.model, "Gulfstream G650");
        assert_eq!(g650.jet_type, JetType::UltraLongRange);
        assert_eq!(g650.hourly_rate, 12_000.0);
        Ok(())
    }
}
