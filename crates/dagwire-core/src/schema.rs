//! Logical schema types. Pure data; backends map these onto their own types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int64,
    Float64,
    Utf8,
    Binary,
}

impl DataType {
    /// Lenient name parsing used by the YAML DSL; unknown names map to `Utf8`.
    pub fn parse(s: &str) -> DataType {
        match s {
            "Boolean" | "bool" => DataType::Boolean,
            "Int32" | "Int64" | "i32" | "i64" => DataType::Int64,
            "Float32" | "Float64" | "f32" | "f64" => DataType::Float64,
            "Binary" | "bytes" => DataType::Binary,
            _ => DataType::Utf8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }
}
