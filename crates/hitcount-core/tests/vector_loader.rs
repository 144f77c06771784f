//! JSON test vector loader for request body tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::fs;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BodyVector {
    pub description: String,
    pub body: String,
    #[serde(default)]
    pub expect_referrer: Option<String>,
    #[serde(default)]
    pub expect_error: bool,
}

pub fn load(name: &str) -> Vec<BodyVector> {
    let s = fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).expect("invalid vector file")
}
