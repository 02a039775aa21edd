//! Rendering report sections as coloured text or JSON.

use colored::Colorize;
use ranking::RankedResult;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

/// One titled block of report output, in rank order
#[derive(Debug, Serialize)]
pub struct Section {
    pub title: String,
    /// Column names for tabular sections, key column first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct Item {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Section {
    /// A ranked mapping; `limit` only trims what is shown
    pub fn ranked<K, V>(title: impl Into<String>, ranked: &RankedResult<K, V>, limit: Option<usize>) -> Self
    where
        K: Display,
        V: Serialize,
    {
        let items = ranked
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(key, value)| Item {
                key: key.to_string(),
                value: serde_json::to_value(value).ok(),
            })
            .collect();
        Self {
            title: title.into(),
            columns: Vec::new(),
            items,
        }
    }

    /// A plain list of keys
    pub fn list(title: impl Into<String>, keys: impl IntoIterator<Item = impl Display>) -> Self {
        Self {
            title: title.into(),
            columns: Vec::new(),
            items: keys
                .into_iter()
                .map(|key| Item {
                    key: key.to_string(),
                    value: None,
                })
                .collect(),
        }
    }

    /// Rows of text columns; the first column of each row is its key
    pub fn table(title: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let items = rows
            .into_iter()
            .filter_map(|row| {
                let mut cells = row.into_iter();
                let key = cells.next()?;
                Some(Item {
                    key,
                    value: Some(Value::Array(cells.map(Value::String).collect())),
                })
            })
            .collect();
        Self {
            title: title.into(),
            columns,
            items,
        }
    }

    fn print(&self) {
        println!("{}", self.title.bold().blue());
        if !self.columns.is_empty() {
            println!("   {}", self.columns.join(" | ").dimmed());
        }
        if self.items.is_empty() {
            println!("  {}", "(no data)".dimmed());
        }
        for (rank, item) in self.items.iter().enumerate() {
            let rank = (rank + 1).to_string();
            match &item.value {
                Some(Value::Array(cells)) => {
                    let rendered = cells
                        .iter()
                        .map(|cell| cell.as_str().unwrap_or_default())
                        .collect::<Vec<_>>()
                        .join(" | ");
                    println!("{}. {} | {}", rank.green(), item.key, rendered);
                }
                Some(value) => println!("{}. {}: {}", rank.green(), item.key, value),
                None => println!("{}. {}", rank.green(), item.key),
            }
        }
        println!();
    }
}

/// Print every section, as text or as one pretty JSON array
pub fn emit(sections: &[Section], json: bool) -> anyhow::Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(sections)?;
        println!("{}", rendered);
    } else {
        for section in sections {
            section.print();
        }
    }
    Ok(())
}
