//! HTTP Basic authentication against stored user credentials.

mod extractor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::SecretString;

pub use extractor::BasicAuth;

/// Credentials carried by an `Authorization: Basic ...` header.
///
/// `Debug` never prints the password.
pub struct BasicCredentials {
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Parse an `Authorization` header value of the form `Basic base64(email:password)`.
///
/// Returns `None` for any other scheme or a malformed payload.
pub fn parse_basic_header(value: &str) -> Option<BasicCredentials> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    if email.is_empty() {
        return None;
    }

    Some(BasicCredentials {
        email: email.to_string(),
        password: SecretString::from(password.to_string()),
    })
}

/// Build an `Authorization` header value for the given credentials.
pub fn basic_header_value(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", email, password)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_parse_valid_header() {
        let header = basic_header_value("ada@example.com", "pa:ss");
        let creds = parse_basic_header(&header).unwrap();
        assert_eq!(creds.email, "ada@example.com");
        assert_eq!(creds.password.expose_secret(), "pa:ss");
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert!(parse_basic_header("Bearer abc.def").is_none());
        assert!(parse_basic_header("Basic").is_none());
        assert!(parse_basic_header("Basic not-base64!!").is_none());
        // "nocolon" has no separator
        assert!(parse_basic_header("Basic bm9jb2xvbg==").is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = parse_basic_header(&basic_header_value("a@b.c", "secret")).unwrap();
        assert!(!format!("{:?}", creds).contains("secret"));
    }
}
