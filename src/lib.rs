//! Parser for Latin scientific names of organisms.
//!
//! ```
//! use sciname::ScientificNameParser;
//!
//! let parsed = ScientificNameParser::new().from_string("Homo sapiens L.");
//! assert_eq!(parsed.canonical(), Some("Homo sapiens"));
//! let json = parsed.render_json(true).unwrap();
//! assert!(json.contains("\"Homo sapiens\""));
//! ```

pub mod dictionaries;
pub mod error;
pub mod formatters;
pub mod id;
pub mod input;
pub mod logger;
pub mod parser;
pub mod preprocess;
pub mod render;
pub mod tokenizer;
pub mod types;

pub use error::{Error, Result};
pub use parser::{PARSER_VERSION, ScientificNameParser};
pub use types::ParsedName;
