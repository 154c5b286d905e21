use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::super::domain::MarketComparable;

/// Errors raised while loading a comparable-sales sheet.
#[derive(Debug)]
pub enum ComparableImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ComparableImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparableImportError::Io(err) => {
                write!(f, "failed to read comparable sheet: {}", err)
            }
            ComparableImportError::Csv(err) => {
                write!(f, "invalid comparable CSV data: {}", err)
            }
        }
    }
}

impl std::error::Error for ComparableImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComparableImportError::Io(err) => Some(err),
            ComparableImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ComparableImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ComparableImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads market comparables from the CSV sheet format the survey teams
/// export (one row per observed transaction).
pub struct ComparableCsvImporter;

impl ComparableCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<MarketComparable>, ComparableImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<MarketComparable>, ComparableImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut comparables = Vec::new();

        for record in csv_reader.deserialize::<ComparableRow>() {
            comparables.push(record?.into_comparable());
        }

        Ok(comparables)
    }
}

#[derive(Debug, Deserialize)]
struct ComparableRow {
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Distance", default, deserialize_with = "empty_string_as_none")]
    distance: Option<String>,
    #[serde(rename = "Land Area", default, deserialize_with = "empty_string_as_none")]
    land_area: Option<String>,
    #[serde(
        rename = "Building Area",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    building_area: Option<String>,
    #[serde(rename = "Price", default, deserialize_with = "empty_string_as_none")]
    price: Option<String>,
    #[serde(rename = "Weight", default, deserialize_with = "empty_string_as_none")]
    weight: Option<String>,
}

impl ComparableRow {
    fn into_comparable(self) -> MarketComparable {
        MarketComparable {
            source: self.source,
            address: self.address,
            distance_meters: self.distance.as_deref().and_then(parse_number),
            land_area: self.land_area.as_deref().and_then(parse_number).unwrap_or(0.0),
            building_area: self
                .building_area
                .as_deref()
                .and_then(parse_number)
                .unwrap_or(0.0),
            price: self.price.as_deref().and_then(parse_number).unwrap_or(0.0),
            adjustments: Vec::new(),
            weight: self.weight.as_deref().and_then(parse_number),
            adjusted_price: None,
            final_price_per_square: None,
        }
    }
}

// Sheets exported from spreadsheets frequently carry thousands separators.
fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").trim().parse().ok()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|raw| !raw.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn importer_parses_rows_with_blank_numerics() {
        let csv = "Source,Address,Distance,Land Area,Building Area,Price,Weight\n\
Listing portal,Jl. Melati 4,350,120,0,\"950,000,000\",40\n\
Broker call,Jl. Kenanga 9,,100,70,1200000000,\n";

        let comparables =
            ComparableCsvImporter::from_reader(Cursor::new(csv)).expect("sheet parses");

        assert_eq!(comparables.len(), 2);
        assert_eq!(comparables[0].source, "Listing portal");
        assert_eq!(comparables[0].price, 950_000_000.0);
        assert_eq!(comparables[0].weight, Some(40.0));
        assert_eq!(comparables[1].distance_meters, None);
        assert_eq!(comparables[1].weight, None);
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = ComparableCsvImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            ComparableImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn importer_rejects_malformed_sheets() {
        let csv = "Source,Address\n\"unterminated,Jl. Mawar\n";

        let error = ComparableCsvImporter::from_reader(Cursor::new(csv))
            .expect_err("expected csv error");

        match error {
            ComparableImportError::Csv(_) => {}
            other => panic!("expected csv error, got {other:?}"),
        }
    }
}
