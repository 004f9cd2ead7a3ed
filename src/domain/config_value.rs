// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value type with type-safe conversions.
//!
//! This module provides the `ConfigValue` type, a nested value tree that
//! configuration documents are made of, and the `ConfigMap` ordered mapping
//! used at every level of nesting.

use crate::domain::errors::{ConfigError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ordered key to value mapping, one level of a configuration document.
pub type ConfigMap = IndexMap<String, ConfigValue>;

/// A configuration value: a scalar, a list, or a nested mapping.
///
/// Parsers produce `String` scalars for most entries; the typed accessors
/// convert on demand and name the path in their errors so a bad value can be
/// traced back to its source.
///
/// # Examples
///
/// ```
/// use layercfg::domain::ConfigValue;
///
/// let value = ConfigValue::from("42");
/// assert_eq!(value.as_str(), Some("42"));
/// assert_eq!(value.as_i64("db/port").unwrap(), 42);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// An explicit null.
    #[default]
    Null,
    /// A boolean literal.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A text scalar.
    String(String),
    /// An ordered list of values.
    List(Vec<ConfigValue>),
    /// A nested mapping.
    Map(ConfigMap),
}

impl ConfigValue {
    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns true for nested mappings.
    pub fn is_map(&self) -> bool {
        matches!(self, ConfigValue::Map(_))
    }

    /// Returns the text of a `String` scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested mapping, if this value is one.
    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the nested mapping mutably, if this value is one.
    pub fn as_map_mut(&mut self) -> Option<&mut ConfigMap> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the list items, if this value is a list.
    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts the value to a boolean.
    ///
    /// Recognizes the following text values (case-insensitive):
    /// - `true`: "true", "yes", "1", "on"
    /// - `false`: "false", "no", "0", "off", ""
    ///
    /// # Examples
    ///
    /// ```
    /// use layercfg::domain::ConfigValue;
    ///
    /// assert!(ConfigValue::from("yes").as_bool("debug").unwrap());
    /// assert!(!ConfigValue::Bool(false).as_bool("debug").unwrap());
    /// ```
    pub fn as_bool(&self, path: &str) -> Result<bool> {
        match self {
            ConfigValue::Bool(b) => Ok(*b),
            ConfigValue::Integer(n) => Ok(*n != 0),
            ConfigValue::Null => Ok(false),
            _ => {
                let text = self.scalar_text(path, "boolean")?;
                match text.to_lowercase().as_str() {
                    "true" | "yes" | "1" | "on" => Ok(true),
                    "false" | "no" | "0" | "off" | "" => Ok(false),
                    _ => text
                        .parse::<bool>()
                        .map_err(|e| ConfigError::from_parse_bool_error(path.to_string(), e)),
                }
            }
        }
    }

    /// Converts the value to an `i64`.
    pub fn as_i64(&self, path: &str) -> Result<i64> {
        match self {
            ConfigValue::Integer(n) => Ok(*n),
            _ => self
                .scalar_text(path, "integer")?
                .trim()
                .parse::<i64>()
                .map_err(|e| ConfigError::from_parse_int_error(path.to_string(), e)),
        }
    }

    /// Converts the value to a `u64`.
    pub fn as_u64(&self, path: &str) -> Result<u64> {
        self.scalar_text(path, "integer")?
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::from_parse_int_error(path.to_string(), e))
    }

    /// Converts the value to an `f64`.
    pub fn as_f64(&self, path: &str) -> Result<f64> {
        match self {
            ConfigValue::Float(f) => Ok(*f),
            ConfigValue::Integer(n) => Ok(*n as f64),
            _ => self
                .scalar_text(path, "float")?
                .trim()
                .parse::<f64>()
                .map_err(|e| ConfigError::from_parse_float_error(path.to_string(), e)),
        }
    }

    /// Parses a scalar value into any type that implements `FromStr`.
    ///
    /// # Examples
    ///
    /// ```
    /// use layercfg::domain::ConfigValue;
    /// use std::net::IpAddr;
    ///
    /// let value = ConfigValue::from("127.0.0.1");
    /// let ip: IpAddr = value.parse("db/host").unwrap();
    /// assert_eq!(ip.to_string(), "127.0.0.1");
    /// ```
    pub fn parse<T>(&self, path: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.scalar_text(path, std::any::type_name::<T>())?
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversionError {
                path: path.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }

    /// Renders a scalar as text; lists and maps cannot be converted.
    fn scalar_text(&self, path: &str, target_type: &str) -> Result<String> {
        match self {
            ConfigValue::List(_) | ConfigValue::Map(_) => Err(ConfigError::TypeConversionError {
                path: path.to_string(),
                target_type: target_type.to_string(),
                source: "value is not a scalar".into(),
            }),
            scalar => Ok(scalar.to_string()),
        }
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Integer(n)
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        ConfigValue::Integer(n.into())
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        ConfigValue::Float(f)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Map(map)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        ConfigValue::List(items)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, Into::into)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => Ok(()),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Integer(n) => write!(f, "{}", n),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::String(s) => write!(f, "{}", s),
            nested => {
                let json = serde_json::to_string(nested).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}
