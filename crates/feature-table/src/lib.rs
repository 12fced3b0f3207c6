//! Feature Tables
//!
//! Explicit column schemas, CSV persistence for labeled feature vectors, and
//! the label encoder shared by the training and test splits.

mod encoder;
mod error;
mod schema;
mod table;

pub use encoder::LabelEncoder;
pub use error::{Result, TableError};
pub use schema::{FeatureSchema, LABEL_COLUMN};
pub use table::{FeatureTable, Record};
