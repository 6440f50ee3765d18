//! OAuth 1.0a request signing (HMAC-SHA1), as required by the Twitter v1.1 API.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::models::Credentials;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const VERSION: &str = "1.0";

/// RFC 3986 percent-encoding; only `A-Z a-z 0-9 - . _ ~` pass through
#[inline]
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Build the `Authorization` header for a request with a fresh nonce and timestamp
///
/// `params` are the query (or form body) parameters that will be sent with
/// the request; they take part in the signature.
pub fn authorization_header(
    method: &str,
    url: &str,
    params: &[(&str, String)],
    credentials: &Credentials,
) -> String {
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    let timestamp = chrono::Utc::now().timestamp().to_string();

    authorization_header_with(method, url, params, credentials, &nonce, &timestamp)
}

/// Deterministic variant of [`authorization_header`]
pub fn authorization_header_with(
    method: &str,
    url: &str,
    params: &[(&str, String)],
    credentials: &Credentials,
    nonce: &str,
    timestamp: &str,
) -> String {
    let mut oauth_params = oauth_params(credentials, nonce, timestamp);
    let signature = sign(method, url, params, &oauth_params, credentials);
    oauth_params.push(("oauth_signature", signature));
    oauth_params.sort();

    let fields = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("OAuth {}", fields)
}

fn oauth_params(
    credentials: &Credentials,
    nonce: &str,
    timestamp: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("oauth_consumer_key", credentials.consumer_key.clone()),
        ("oauth_nonce", nonce.to_string()),
        ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
        ("oauth_timestamp", timestamp.to_string()),
        ("oauth_token", credentials.access_token.clone()),
        ("oauth_version", VERSION.to_string()),
    ]
}

/// Signature base string: `METHOD&url&params`, each part percent-encoded
fn base_string(
    method: &str,
    url: &str,
    params: &[(&str, String)],
    oauth_params: &[(&str, String)],
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .chain(oauth_params.iter())
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&parameter_string)
    )
}

fn sign(
    method: &str,
    url: &str,
    params: &[(&str, String)],
    oauth_params: &[(&str, String)],
    credentials: &Credentials,
) -> String {
    let key = format!(
        "{}&{}",
        encode(&credentials.consumer_secret),
        encode(&credentials.access_token_secret)
    );
    let base = base_string(method, url, params, oauth_params);

    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(base.as_bytes());

    STANDARD.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference request from Twitter's "Creating a signature" guide
    fn reference_credentials() -> Credentials {
        Credentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        )
    }

    fn reference_params() -> Vec<(&'static str, String)> {
        vec![
            ("status", "Hello Ladies + Gentlemen, a signed OAuth request!".to_string()),
            ("include_entities", "true".to_string()),
        ]
    }

    const NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
    const TIMESTAMP: &str = "1318622958";
    const URL: &str = "https://api.twitter.com/1.1/statuses/update.json";

    #[test]
    fn test_encode_reserved_characters() {
        assert_eq!(encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(encode("!*'()"), "%21%2A%27%28%29");
    }

    #[test]
    fn test_base_string_matches_reference() {
        let credentials = reference_credentials();
        let base = base_string(
            "post",
            URL,
            &reference_params(),
            &oauth_params(&credentials, NONCE, TIMESTAMP),
        );

        assert!(base.starts_with("POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&"));
        assert!(base.contains("include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog"));
        assert!(base.ends_with("status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"));
    }

    #[test]
    fn test_signature_matches_reference() {
        let credentials = reference_credentials();
        let signature = sign(
            "POST",
            URL,
            &reference_params(),
            &oauth_params(&credentials, NONCE, TIMESTAMP),
            &credentials,
        );

        assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn test_header_layout() {
        let header = authorization_header_with(
            "POST",
            URL,
            &reference_params(),
            &reference_credentials(),
            NONCE,
            TIMESTAMP,
        );

        assert!(header.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", "));
        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
        assert!(header.ends_with("oauth_version=\"1.0\""));
    }

    #[test]
    fn test_fresh_nonce_per_header() {
        let credentials = reference_credentials();
        let a = authorization_header("GET", URL, &[], &credentials);
        let b = authorization_header("GET", URL, &[], &credentials);
        assert_ne!(a, b);
    }
}
