//! JSON and JSONL (JSON Lines) export for Sheet
//!
//! A sheet with a header row becomes an array of objects keyed by column
//! name, `[{"name": "Alice", "age": "30"}, ...]`. A headerless sheet becomes
//! an array of row arrays. Cell values stay strings.

use crate::error::Result;
use crate::sheet::Sheet;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

impl Sheet {
    /// Data rows as records keyed by column name, in column order
    pub fn to_records(&self) -> Result<Vec<IndexMap<String, String>>> {
        let names = self.column_names()?;
        Ok(self
            .rows()
            .map(|row| {
                names
                    .iter()
                    .cloned()
                    .zip(row.into_iter().map(str::to_string))
                    .collect()
            })
            .collect())
    }

    fn json_rows(&self) -> Result<JsonRows<'_>> {
        if self.has_header_row() {
            Ok(JsonRows::Records(self.to_records()?))
        } else {
            Ok(JsonRows::Rows(self.rows().collect()))
        }
    }

    /// Save the sheet to a JSON file
    pub fn save_as_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.write_json(writer, false)
    }

    /// Write the sheet to a writer as JSON
    pub fn write_json<W: Write>(&self, mut writer: W, pretty: bool) -> Result<()> {
        let value = self.json_rows()?;
        if pretty {
            serde_json::to_writer_pretty(&mut writer, &value)?;
        } else {
            serde_json::to_writer(&mut writer, &value)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Convert the sheet to a JSON string
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.json_rows()?)?)
    }

    /// Convert the sheet to a pretty-printed JSON string
    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.json_rows()?)?)
    }

    /// Write one JSON value per data row
    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> Result<()> {
        if self.has_header_row() {
            for record in self.to_records()? {
                serde_json::to_writer(&mut writer, &record)?;
                writeln!(writer)?;
            }
        } else {
            for row in self.rows() {
                serde_json::to_writer(&mut writer, &row)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

/// Serialized shape of a sheet; records keep their column order
#[derive(Serialize)]
#[serde(untagged)]
enum JsonRows<'a> {
    Records(Vec<IndexMap<String, String>>),
    Rows(Vec<Vec<&'a str>>),
}
