use axum::http::HeaderMap;

use crate::error::AppError;

pub const MAX_VIBE_CHARS: usize = 100;

pub fn validate_vibe_text(text: &str) -> Result<(), AppError> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(AppError::Invalid("Please describe your vibe".to_string()));
    }

    if trimmed.chars().count() > MAX_VIBE_CHARS {
        return Err(AppError::Invalid(format!(
            "Vibe text is limited to {MAX_VIBE_CHARS} characters"
        )));
    }

    Ok(())
}

/// Rate-limit identity: first X-Forwarded-For value. The reverse proxy is
/// the only ingress, so the header is always present in deployment.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Score shown on business cards, derived from the vote count. No recorded
/// votes means no score; clients fall back to their own tiers.
pub fn derive_score(vote_count: Option<i64>) -> (Option<i64>, &'static str) {
    match vote_count {
        Some(count) if count > 0 => (Some((45 + count).min(100)), "votes"),
        _ => (None, "none"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_vibe_text_bounds() {
        assert!(validate_vibe_text("the rooftop bar on Main").is_ok());
        assert!(validate_vibe_text("   ").is_err());
        assert!(validate_vibe_text(&"x".repeat(MAX_VIBE_CHARS)).is_ok());
        assert!(validate_vibe_text(&"x".repeat(MAX_VIBE_CHARS + 1)).is_err());
    }

    #[test]
    fn test_client_ip_first_forwarded_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );

        assert_eq!(client_ip(&headers), "203.0.113.9");
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn test_derive_score() {
        assert_eq!(derive_score(None), (None, "none"));
        assert_eq!(derive_score(Some(0)), (None, "none"));
        assert_eq!(derive_score(Some(5)), (Some(50), "votes"));
        assert_eq!(derive_score(Some(500)), (Some(100), "votes"));
    }
}
