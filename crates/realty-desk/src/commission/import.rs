use super::domain::{AgentLevel, CommissionInput, DealType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug)]
pub enum CommissionImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, reason: String },
}

impl std::fmt::Display for CommissionImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommissionImportError::Io(err) => write!(f, "failed to read deal export: {}", err),
            CommissionImportError::Csv(err) => write!(f, "invalid deal CSV data: {}", err),
            CommissionImportError::InvalidRow { line, reason } => {
                write!(f, "deal on line {} rejected: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for CommissionImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommissionImportError::Io(err) => Some(err),
            CommissionImportError::Csv(err) => Some(err),
            CommissionImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for CommissionImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CommissionImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One imported deal ready for the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchDeal {
    pub deal_id: String,
    pub input: CommissionInput,
}

#[derive(Debug, Deserialize)]
struct DealRow {
    #[serde(rename = "Deal ID")]
    deal_id: String,
    #[serde(rename = "Property Value")]
    property_value: String,
    #[serde(rename = "Deal Type")]
    deal_type: String,
    #[serde(rename = "Agent Level")]
    agent_level: String,
    #[serde(
        rename = "Override Rate",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    override_rate: Option<String>,
}

impl DealRow {
    fn into_deal(self, line: usize) -> Result<BatchDeal, CommissionImportError> {
        let invalid = |reason: String| CommissionImportError::InvalidRow { line, reason };

        let property_value = parse_decimal(&self.property_value)
            .map_err(|err| invalid(format!("property value '{}': {err}", self.property_value)))?;
        let deal_type = DealType::from_str(&self.deal_type).map_err(|err| invalid(err.to_string()))?;
        let agent_level =
            AgentLevel::from_str(&self.agent_level).map_err(|err| invalid(err.to_string()))?;
        let override_rate = self
            .override_rate
            .as_deref()
            .map(parse_rate)
            .transpose()
            .map_err(|err| invalid(format!("override rate: {err}")))?;

        Ok(BatchDeal {
            deal_id: self.deal_id,
            input: CommissionInput {
                property_value,
                deal_type,
                agent_level,
                override_rate,
            },
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Parses an amount, ignoring `_` and space digit separators.
pub fn parse_decimal(raw: &str) -> Result<Decimal, rust_decimal::Error> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '_' | ' '))
        .collect();
    Decimal::from_str(&cleaned)
}

/// Accepts fractions (`0.05`) or percentages (`5%`).
pub fn parse_rate(raw: &str) -> Result<Decimal, rust_decimal::Error> {
    let trimmed = raw.trim();
    match trimmed.strip_suffix('%') {
        Some(percent) => parse_decimal(percent).map(|value| value / Decimal::ONE_HUNDRED),
        None => parse_decimal(trimmed),
    }
}

pub struct CommissionImporter;

impl CommissionImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<BatchDeal>, CommissionImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<BatchDeal>, CommissionImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut deals = Vec::new();
        for (index, record) in csv_reader.deserialize::<DealRow>().enumerate() {
            let row = record?;
            deals.push(row.into_deal(index + 1)?);
        }

        Ok(deals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "Deal ID,Property Value,Deal Type,Agent Level,Override Rate\n";

    #[test]
    fn imports_rows_with_optional_override() {
        let csv = format!(
            "{HEADER}D-1, 500000 ,sale,Senior,\nD-2,200000.50,Rent,junior,5%\nD-3,1_000_000,sale,master,0.04\n"
        );

        let deals = CommissionImporter::from_reader(csv.as_bytes()).expect("csv imports");

        assert_eq!(deals.len(), 3);
        assert_eq!(deals[0].deal_id, "D-1");
        assert_eq!(deals[0].input.property_value, dec!(500000));
        assert_eq!(deals[0].input.override_rate, None);
        assert_eq!(deals[1].input.deal_type, DealType::Rent);
        assert_eq!(deals[1].input.override_rate, Some(dec!(0.05)));
        assert_eq!(deals[2].input.property_value, dec!(1000000));
        assert_eq!(deals[2].input.agent_level, AgentLevel::Master);
    }

    #[test]
    fn rejects_unknown_level_with_line_number() {
        let csv = format!("{HEADER}D-1,500000,sale,senior,\nD-2,100,sale,partner,\n");

        let err = CommissionImporter::from_reader(csv.as_bytes()).unwrap_err();

        match err {
            CommissionImportError::InvalidRow { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("partner"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_amounts() {
        let csv = format!("{HEADER}D-1,five hundred,sale,senior,\n");
        let err = CommissionImporter::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn negative_values_are_imported_unchanged() {
        let csv = format!("{HEADER}D-9,-100,sale,junior,1.5\n");
        let deals = CommissionImporter::from_reader(csv.as_bytes()).expect("csv imports");
        assert_eq!(deals[0].input.property_value, dec!(-100));
        assert_eq!(deals[0].input.override_rate, Some(dec!(1.5)));
    }

    #[test]
    fn rate_parser_accepts_percent_and_fraction() {
        assert_eq!(parse_rate(" 3.5% "), Ok(dec!(0.035)));
        assert_eq!(parse_rate("0.035"), Ok(dec!(0.035)));
        assert_eq!(parse_decimal("2_500 000"), Ok(dec!(2500000)));
        assert!(parse_rate("%").is_err());
    }
}
