use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use lotofacil_core::models::{Draw, DRAW_SIZE};

/// First CSV column holding a drawn number (after `concurso` and `data`).
const CSV_FIRST_NUMBER: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "csv" => Some(InputFormat::Csv),
            "json" => Some(InputFormat::Json),
            _ => None,
        }
    }
}

/// One entry of the results API payload; only `dezenas` matters here. Entries stay
/// loosely typed so a bad number is reported against its own record.
#[derive(Debug, Deserialize)]
struct ApiResult {
    dezenas: Vec<serde_json::Value>,
}

fn number_text(value: &serde_json::Value) -> Result<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(i.to_string()),
            None => bail!("'{}' is not a whole number", n),
        },
        other => bail!("'{}' is not a number", other),
    }
}

fn parse_api_record(record: serde_json::Value) -> Result<Draw> {
    let result: ApiResult = serde_json::from_value(record).context("Unexpected record shape")?;
    let raw = result
        .dezenas
        .iter()
        .map(number_text)
        .collect::<Result<Vec<String>>>()?;
    Ok(Draw::parse(&raw)?)
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub total_records: u32,
    pub accepted: u32,
    pub rejected: u32,
}

#[derive(Debug, Default)]
pub struct LoadedHistory {
    pub draws: Vec<Draw>,
    pub summary: ImportSummary,
}

impl LoadedHistory {
    fn push(&mut self, parsed: Result<Draw>, skip_invalid: bool) -> Result<()> {
        self.summary.total_records += 1;
        let record = self.summary.total_records;
        match parsed {
            Ok(draw) => {
                self.draws.push(draw);
                self.summary.accepted += 1;
            }
            Err(e) if skip_invalid => {
                log::warn!("Skipping record {}: {:#}", record, e);
                self.summary.rejected += 1;
            }
            Err(e) => return Err(e.context(format!("Invalid record {}", record))),
        }
        Ok(())
    }
}

pub fn load_history(path: &Path, format: Option<InputFormat>, skip_invalid: bool) -> Result<LoadedHistory> {
    let format = match format.or_else(|| InputFormat::from_path(path)) {
        Some(f) => f,
        None => bail!("Cannot infer input format of {:?}, pass --format", path),
    };
    match format {
        InputFormat::Csv => load_csv(path, skip_invalid),
        InputFormat::Json => load_json(path, skip_invalid),
    }
}

pub fn load_json(path: &Path, skip_invalid: bool) -> Result<LoadedHistory> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {:?}", path))?;
    parse_json(&content).with_context(|| format!("Invalid JSON in {:?}", path))
        .and_then(|results| collect_json(results, skip_invalid))
}

fn parse_json(content: &str) -> Result<Vec<serde_json::Value>> {
    let records: Vec<serde_json::Value> = serde_json::from_str(content)?;
    Ok(records)
}

fn collect_json(records: Vec<serde_json::Value>, skip_invalid: bool) -> Result<LoadedHistory> {
    let mut history = LoadedHistory::default();
    for record in records {
        history.push(parse_api_record(record), skip_invalid)?;
    }
    Ok(history)
}

pub fn load_csv(path: &Path, skip_invalid: bool) -> Result<LoadedHistory> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Cannot open {:?}", path))?;
    read_csv(file, skip_invalid).with_context(|| format!("Failed to import {:?}", path))
}

fn read_csv<R: Read>(input: R, skip_invalid: bool) -> Result<LoadedHistory> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(input);

    let mut history = LoadedHistory::default();
    for record_result in reader.records() {
        let parsed = record_result
            .context("Unreadable CSV line")
            .and_then(|record| parse_record(&record));
        history.push(parsed, skip_invalid)?;
    }
    Ok(history)
}

fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let raw: Vec<&str> = (CSV_FIRST_NUMBER..CSV_FIRST_NUMBER + DRAW_SIZE)
        .map(|idx| {
            record
                .get(idx)
                .with_context(|| format!("Missing field at index {}", idx))
        })
        .collect::<Result<_>>()?;
    Ok(Draw::parse(&raw)?)
}
