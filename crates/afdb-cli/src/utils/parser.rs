use afdb_clusters::core::taxonomy::TaxId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE (e.g., 'query.suggestion-cap=20').")]
    InvalidSetFormat(String),

    #[error("Component '{component}' cannot be empty in '{input}'.")]
    EmptyComponent {
        component: &'static str,
        input: String,
    },

    #[error("Invalid taxonomy id '{0}'. Expected a positive integer (e.g., '9606').")]
    InvalidTaxId(String),
}

/// Splits a `-S key=value` override at the first `=`.
pub fn parse_set_value(input: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidSetFormat(input.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "key",
            input: input.to_string(),
        });
    }
    Ok((key, value.trim()))
}

/// Clap value parser for NCBI taxonomy ids; 0 is never a valid taxon.
pub fn parse_tax_id(input: &str) -> Result<TaxId, ParseError> {
    match input.trim().parse::<TaxId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ParseError::InvalidTaxId(input.to_string())),
    }
}
