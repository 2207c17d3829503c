//! Settings of the limit engine.
//!
//! Read from a `[gruntz]` table of a toml document:
//! ```toml
//! [gruntz]
//! max_depth = 200
//! series_orders = [2, 4, 6, 8]
//! trace = false
//! loglevel = "info"
//! ```
//! Missing keys keep their defaults, unknown keys are ignored.
use crate::limits::limit_error::{LimitError, LimitResult};
use std::fs;
use std::path::Path;
use toml::{Table, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct GruntzConfig {
    /// ceiling on nested limitinf/mrv_leadterm calls
    pub max_depth: usize,
    /// truncation orders tried in turn until the expansion has a term
    pub series_orders: Vec<u32>,
    /// build the execution tree of every call
    pub trace: bool,
    pub loglevel: Option<String>,
}

impl Default for GruntzConfig {
    fn default() -> Self {
        GruntzConfig {
            max_depth: 200,
            series_orders: vec![2, 4, 6, 8],
            trace: false,
            loglevel: None,
        }
    }
}

impl GruntzConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_series_orders(mut self, orders: Vec<u32>) -> Self {
        self.series_orders = orders;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_loglevel(mut self, loglevel: &str) -> Self {
        self.loglevel = Some(loglevel.to_string());
        self
    }

    pub fn from_toml_str(content: &str) -> LimitResult<Self> {
        let table: Table = content
            .parse()
            .map_err(|e: toml::de::Error| LimitError::Config(e.to_string()))?;
        let mut config = GruntzConfig::default();
        let Some(section) = table.get("gruntz") else {
            return Ok(config);
        };
        let section = section
            .as_table()
            .ok_or_else(|| LimitError::Config("[gruntz] must be a table".to_string()))?;

        if let Some(value) = section.get("max_depth") {
            let depth = value
                .as_integer()
                .filter(|d| *d > 0)
                .ok_or_else(|| wrong_type("max_depth", "a positive integer"))?;
            config.max_depth = depth as usize;
        }
        if let Some(value) = section.get("series_orders") {
            config.series_orders = parse_orders(value)?;
        }
        if let Some(value) = section.get("trace") {
            config.trace = value
                .as_bool()
                .ok_or_else(|| wrong_type("trace", "a boolean"))?;
        }
        if let Some(value) = section.get("loglevel") {
            let level = value
                .as_str()
                .ok_or_else(|| wrong_type("loglevel", "a string"))?;
            config.loglevel = Some(level.to_string());
        }
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> LimitResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            LimitError::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

fn wrong_type(key: &str, expected: &str) -> LimitError {
    LimitError::Config(format!("gruntz.{} must be {}", key, expected))
}

fn parse_orders(value: &Value) -> LimitResult<Vec<u32>> {
    let items = value
        .as_array()
        .ok_or_else(|| wrong_type("series_orders", "an array of positive integers"))?;
    let orders = items
        .iter()
        .map(|item| {
            item.as_integer()
                .filter(|n| *n > 0 && *n <= i64::from(u32::MAX))
                .map(|n| n as u32)
                .ok_or_else(|| wrong_type("series_orders", "an array of positive integers"))
        })
        .collect::<LimitResult<Vec<u32>>>()?;
    if orders.is_empty() {
        return Err(wrong_type("series_orders", "a non-empty array"));
    }
    Ok(orders)
}
