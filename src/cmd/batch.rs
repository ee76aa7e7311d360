//! Batch command - stamp duty for many purchases read from CSV or JSON

use crate::tax::region::deserialize_region_lenient;
use crate::tax::{compute_duty, BuyerStatus, CalculationInput, Region};
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use schemars::{schema_for, JsonSchema};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV or JSON file of purchases. Reads CSV from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Describe the input columns instead of calculating
    #[arg(long, conflicts_with = "json_schema")]
    describe: bool,

    /// Print the JSON Schema of the input instead of calculating
    #[arg(long)]
    json_schema: bool,
}

/// One purchase to price
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct BatchRecord {
    /// Property price in pounds, e.g. 300000 or "300000.50"
    #[serde(deserialize_with = "deserialize_price")]
    #[schemars(with = "String")]
    pub price: Decimal,
    /// england, scotland, wales or northern-ireland. Empty or unknown uses England/NI rates.
    #[serde(default, deserialize_with = "deserialize_region_lenient")]
    #[schemars(with = "Option<Region>")]
    pub region: Option<Region>,
    /// first-time, sole-property or additional
    pub status: BuyerStatus,
}

#[derive(Debug, Serialize)]
struct BatchResult {
    price: String,
    region: String,
    status: BuyerStatus,
    duty: String,
}

/// A CSV row before the price text is parsed
#[derive(Debug, Deserialize)]
struct CsvRecord {
    price: String,
    #[serde(default, deserialize_with = "deserialize_region_lenient")]
    region: Option<Region>,
    status: BuyerStatus,
}

impl TryFrom<CsvRecord> for BatchRecord {
    type Error = rust_decimal::Error;

    fn try_from(row: CsvRecord) -> Result<Self, Self::Error> {
        Ok(BatchRecord {
            price: parse_price(&row.price)?,
            region: row.region,
            status: row.status,
        })
    }
}

fn parse_price(s: &str) -> Result<Decimal, rust_decimal::Error> {
    Decimal::from_str_exact(s.trim())
}

/// Read a price without passing decimal text through a float.
/// Strings and integers are exact; JSON fractional numbers use their shortest decimal form.
fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    struct PriceVisitor;

    impl<'de> Visitor<'de> for PriceVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a price as a number or decimal string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
            parse_price(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
            Decimal::from_str(&v.to_string()).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(PriceVisitor)
}

/// Column of the batch input, taken from the `BatchRecord` schema
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
struct InputField {
    #[tabled(rename = "Column")]
    name: String,
    #[tabled(rename = "Required")]
    required: bool,
    #[tabled(rename = "Description")]
    description: String,
}

fn input_fields() -> anyhow::Result<Vec<InputField>> {
    let schema = serde_json::to_value(schema_for!(BatchRecord))?;
    let properties = schema["properties"]
        .as_object()
        .context("batch record schema has no properties")?;
    let required: Vec<&str> = schema["required"]
        .as_array()
        .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    Ok(properties
        .iter()
        .map(|(name, property)| InputField {
            name: name.clone(),
            required: required.contains(&name.as_str()),
            description: property["description"].as_str().unwrap_or_default().to_string(),
        })
        .collect())
}

impl BatchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        if self.json_schema {
            println!("{}", serde_json::to_string_pretty(&schema_for!(Vec<BatchRecord>))?);
            return Ok(());
        }
        if self.describe {
            let fields = input_fields()?;
            let header: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
            println!("{}", header.join(","));
            println!();
            println!("{}", Table::new(fields).with(Style::rounded()));
            return Ok(());
        }

        let records = read_records(&self.file)?;
        log::info!("Calculating stamp duty for {} purchase(s)", records.len());
        let results = calculate_all(&records)?;
        write_csv(results, io::stdout())
    }
}

fn read_records(path: &Path) -> anyhow::Result<Vec<BatchRecord>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
        return read_csv(buffer.as_slice());
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Ok(serde_json::from_reader(reader)?),
        _ => read_csv(reader),
    }
}

fn read_csv<R: Read>(reader: R) -> anyhow::Result<Vec<BatchRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let row: CsvRecord = result.with_context(|| format!("Invalid record on row {}", i + 1))?;
        let record = BatchRecord::try_from(row)
            .with_context(|| format!("Invalid price on row {}", i + 1))?;
        records.push(record);
    }
    Ok(records)
}

fn calculate_all(records: &[BatchRecord]) -> anyhow::Result<Vec<BatchResult>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| -> anyhow::Result<BatchResult> {
            let input = CalculationInput::new(record.price, record.region, record.status);
            let result = compute_duty(&input).with_context(|| format!("Row {}", i + 1))?;
            Ok(BatchResult {
                price: format!("{:.2}", record.price),
                region: record.region.map_or("unset".to_string(), |r| r.to_string()),
                status: record.status,
                duty: format!("{:.2}", result.duty_owed.round_dp(2)),
            })
        })
        .collect()
}

fn write_csv<I, R, W>(records: I, writer: W) -> anyhow::Result<()>
where
    I: IntoIterator<Item = R>,
    R: Serialize,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records.into_iter() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
