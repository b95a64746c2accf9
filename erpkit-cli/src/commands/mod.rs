//! Subcommand implementations.

mod create;
mod options;
mod table;

pub use create::create;
pub use options::options;
pub use table::{TableView, table};

use erpkit_lib::model::FilterParams;

use crate::error::CliError;

/// Parse repeated `--param key=value` flags.
fn parse_params(pairs: &[String]) -> Result<FilterParams, CliError> {
    let mut params = FilterParams::new();
    for pair in pairs {
        let parsed = FilterParams::parse_pairs([pair.as_str()])
            .ok_or_else(|| CliError::InvalidParam(pair.clone()))?;
        for (key, value) in parsed.iter() {
            params.insert(key, value);
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_params() {
        let params = parse_params(&["category=tools".to_string(), "site = 2".to_string()]).unwrap();
        assert_eq!(params.get("category"), Some("tools"));
        assert_eq!(params.get("site"), Some("2"));
        assert!(matches!(
            parse_params(&["nope".to_string()]),
            Err(CliError::InvalidParam(_))
        ));
    }
}
