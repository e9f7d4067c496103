#![warn(missing_docs)]
//! # phish-guard-contract-tests
//!
//! Helpers for validating wire fixtures against the frozen JSON schemas in
//! the workspace `contracts/` directory.

use std::path::PathBuf;

use jsonschema::JSONSchema;
use serde_json::Value;

/// Absolute path of a file under `contracts/`.
pub fn contract_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../contracts")
        .join(relative)
}

/// Reads and parses a JSON file under `contracts/`.
///
/// # Panics
/// Panics when the file is missing or not valid JSON; intended for tests.
pub fn load_json(relative: &str) -> Value {
    let path = contract_path(relative);
    let raw = std::fs::read_to_string(&path)
        .unwrap_or_else(|error| panic!("cannot read {}: {error}", path.display()));
    serde_json::from_str(&raw)
        .unwrap_or_else(|error| panic!("invalid json in {}: {error}", path.display()))
}

/// Compiles a schema under `contracts/`.
///
/// # Panics
/// Panics when the schema does not compile; intended for tests.
pub fn compile_schema(relative: &str) -> JSONSchema {
    let schema = load_json(relative);
    JSONSchema::compile(&schema)
        .unwrap_or_else(|error| panic!("schema {relative} should compile: {error}"))
}
