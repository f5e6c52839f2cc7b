use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Token closing the definitely-similar section of a golden row.
pub const DEFINITELY_END: &str = "0";
/// Token closing the maybe-similar section of a golden row.
pub const MAYBE_END: &str = "1";

/// One curated judgment: a query item and the items a human grouped with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenRow {
    pub query: String,
    pub definitely_similar: Vec<String>,
    pub maybe_similar: Vec<String>,
}

impl GoldenRow {
    /// Parse `[query, definitely..., "0", maybe..., "1"]`.
    ///
    /// The delimiters are located by value, so sections may be any length.
    pub fn parse(fields: &[String]) -> Result<Self> {
        let (query, rest) = fields
            .split_first()
            .ok_or_else(|| Error::GoldenValidation("empty golden row".into()))?;
        if query.is_empty() {
            return Err(Error::GoldenValidation("golden row without a query name".into()));
        }
        let idx0 = rest.iter().position(|f| f == DEFINITELY_END).ok_or_else(|| {
            Error::GoldenValidation(format!("row for {query} has no \"{DEFINITELY_END}\" delimiter"))
        })?;
        let idx1 = rest[idx0 + 1..]
            .iter()
            .position(|f| f == MAYBE_END)
            .map(|i| i + idx0 + 1)
            .ok_or_else(|| {
                Error::GoldenValidation(format!("row for {query} has no \"{MAYBE_END}\" delimiter"))
            })?;
        Ok(Self {
            query: query.clone(),
            definitely_similar: rest[..idx0].to_vec(),
            maybe_similar: rest[idx0 + 1..idx1].to_vec(),
        })
    }
}

/// Golden search results, one row per query item, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenTable {
    pub rows: Vec<GoldenRow>,
}

impl GoldenTable {
    pub fn new(rows: Vec<GoldenRow>) -> Self {
        Self { rows }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows = read_records(reader)?
            .iter()
            .map(|fields| GoldenRow::parse(fields))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(std::fs::File::open(path)?)
    }
}

/// Names allowed to appear anywhere in a golden table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovedNames {
    pub names: Vec<String>,
}

impl ApprovedNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// First column of every row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let names = read_records(reader)?
            .into_iter()
            .filter_map(|fields| fields.into_iter().next())
            .collect();
        Ok(Self { names })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(std::fs::File::open(path)?)
    }
}

/// Headerless, ragged, comma-delimited records with `"` quoting.
pub(crate) fn read_records<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .quote(b'"')
        .from_reader(reader);
    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record?;
        out.push(record.iter().map(str::to_string).collect());
    }
    Ok(out)
}
