//! SQL data type definitions.

use core::fmt;

/// PostgreSQL data types as they appear in casts and typed literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    // Integer types
    /// `smallint` / `int2`.
    Smallint,
    /// `integer` / `int` / `int4`.
    Integer,
    /// `bigint` / `int8`.
    Bigint,

    // Floating point and arbitrary precision
    /// `real` / `float4`.
    Real,
    /// `double precision` / `float8`.
    DoublePrecision,
    /// `numeric` / `decimal` with optional precision and scale.
    Numeric {
        /// Total number of digits.
        precision: Option<u32>,
        /// Number of digits after the decimal point.
        scale: Option<u32>,
    },

    // Character types
    /// `char(n)` / `character(n)`.
    Char(Option<u32>),
    /// `varchar(n)` / `character varying(n)`.
    Varchar(Option<u32>),
    /// `text`.
    Text,

    /// `bytea`.
    Bytea,
    /// `boolean` / `bool`.
    Boolean,

    // Date/time types
    /// `date`.
    Date,
    /// `time [without time zone]`.
    Time,
    /// `timestamp [without time zone]`.
    Timestamp,
    /// `timestamp with time zone` / `timestamptz`.
    TimestampTz,
    /// `interval`.
    Interval,

    /// `json`.
    Json,
    /// `jsonb`.
    Jsonb,
    /// `uuid`.
    Uuid,

    /// An array of the element type (`int[]`).
    Array(Box<DataType>),

    /// Any other type name, as written.
    Custom(String),
}

impl DataType {
    /// Maps a lowercase single-word type name to a data type.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "smallint" | "int2" => Self::Smallint,
            "integer" | "int" | "int4" => Self::Integer,
            "bigint" | "int8" => Self::Bigint,
            "real" | "float4" => Self::Real,
            "float8" | "float" => Self::DoublePrecision,
            "numeric" | "decimal" => Self::Numeric {
                precision: None,
                scale: None,
            },
            "char" | "character" | "bpchar" => Self::Char(None),
            "varchar" => Self::Varchar(None),
            "text" => Self::Text,
            "bytea" => Self::Bytea,
            "boolean" | "bool" => Self::Boolean,
            "date" => Self::Date,
            "time" => Self::Time,
            "timestamp" => Self::Timestamp,
            "timestamptz" => Self::TimestampTz,
            "interval" => Self::Interval,
            "json" => Self::Json,
            "jsonb" => Self::Jsonb,
            "uuid" => Self::Uuid,
            other => Self::Custom(String::from(other)),
        }
    }

    /// Returns the SQL representation of the data type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Smallint => String::from("SMALLINT"),
            Self::Integer => String::from("INTEGER"),
            Self::Bigint => String::from("BIGINT"),
            Self::Real => String::from("REAL"),
            Self::DoublePrecision => String::from("DOUBLE PRECISION"),
            Self::Numeric { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("NUMERIC({p}, {s})"),
                (Some(p), None) => format!("NUMERIC({p})"),
                _ => String::from("NUMERIC"),
            },
            Self::Char(len) => match len {
                Some(n) => format!("CHAR({n})"),
                None => String::from("CHAR"),
            },
            Self::Varchar(len) => match len {
                Some(n) => format!("VARCHAR({n})"),
                None => String::from("VARCHAR"),
            },
            Self::Text => String::from("TEXT"),
            Self::Bytea => String::from("BYTEA"),
            Self::Boolean => String::from("BOOLEAN"),
            Self::Date => String::from("DATE"),
            Self::Time => String::from("TIME"),
            Self::Timestamp => String::from("TIMESTAMP"),
            Self::TimestampTz => String::from("TIMESTAMP WITH TIME ZONE"),
            Self::Interval => String::from("INTERVAL"),
            Self::Json => String::from("JSON"),
            Self::Jsonb => String::from("JSONB"),
            Self::Uuid => String::from("UUID"),
            Self::Array(element) => format!("{}[]", element.to_sql()),
            Self::Custom(name) => name.clone(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(DataType::from_name("int4"), DataType::Integer);
        assert_eq!(DataType::from_name("bool"), DataType::Boolean);
        assert_eq!(
            DataType::from_name("hstore"),
            DataType::Custom(String::from("hstore"))
        );
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::Varchar(Some(10)).to_string(), "VARCHAR(10)");
        assert_eq!(
            DataType::Array(Box::new(DataType::Integer)).to_string(),
            "INTEGER[]"
        );
        assert_eq!(
            DataType::Numeric {
                precision: Some(10),
                scale: Some(2)
            }
            .to_string(),
            "NUMERIC(10, 2)"
        );
    }
}
