use actix_web::http::Uri;
use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

/// 用户名格式：1~64 个字母、数字、下划线、点或连字符
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.is_empty() || username.len() > 64 {
        return Err("Username length must be between 1 and 64 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, dots, underscores or hyphens");
    }
    Ok(())
}

/// 绝对 URL：协议与主机名都必须可解析，不限定具体协议
pub fn is_absolute_url(raw: &str) -> bool {
    let Ok(uri) = raw.parse::<Uri>() else {
        return false;
    };
    uri.scheme_str().is_some_and(|s| !s.is_empty()) && uri.host().is_some_and(|h| !h.is_empty())
}
