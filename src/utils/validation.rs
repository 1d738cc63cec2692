use crate::utils::error::{Result, SmokeError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_redis_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SmokeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "redis" | "rediss" => Ok(()),
            scheme => Err(SmokeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SmokeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Key prefixes travel inside key names, so the charset is restricted to
/// what slots hash predictably: alphanumerics plus `:`, `_`, `-`, `.`.
pub fn validate_key_prefix(field_name: &str, prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Ok(());
    }

    let re = regex::Regex::new(r"^[A-Za-z0-9:_.-]+$").expect("static pattern");
    if !re.is_match(prefix) {
        return Err(SmokeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: prefix.to_string(),
            reason: "Prefix may only contain alphanumerics, ':', '_', '-' and '.'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(SmokeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SmokeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_redis_url() {
        assert!(validate_redis_url("redis_url", "redis://localhost:16379/0").is_ok());
        assert!(validate_redis_url("redis_url", "rediss://node-1:6379").is_ok());
        assert!(validate_redis_url("redis_url", "").is_err());
        assert!(validate_redis_url("redis_url", "not-a-url").is_err());
        assert!(validate_redis_url("redis_url", "http://localhost:6379").is_err());
    }

    #[test]
    fn test_validate_key_prefix() {
        assert!(validate_key_prefix("key_prefix", "").is_ok());
        assert!(validate_key_prefix("key_prefix", "smoke:run-1").is_ok());
        assert!(validate_key_prefix("key_prefix", "has space").is_err());
        assert!(validate_key_prefix("key_prefix", "no\nnewline").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("batches", 2, 1).is_ok());
        assert!(validate_positive_number("batches", 0, 1).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("batch.name", "warmup").is_ok());
        assert!(validate_non_empty_string("batch.name", "   ").is_err());
    }
}
