// Request signature engine
//
// The GWN open API authenticates each call with a SHA-256 over a canonical
// parameter string:
//
//   &access_token=..&appID=..&secretKey=..&timestamp=..&[sha256(body)&]
//
// Parameter names are sorted lexicographically. The secret key travels
// inside the hashed string as a plain value, not as an HMAC key; the scheme
// is reproduced byte for byte for interoperability only.

use sha2::{Digest, Sha256};

/// Inputs to a request signature.
#[derive(Debug, Clone, Copy)]
pub struct SigningParams<'a> {
    pub access_token: &'a str,
    pub app_id: &'a str,
    pub secret: &'a str,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Compute the lowercase hex SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Whether a serialized JSON body counts as "no body" for signing.
///
/// Empty documents are signed exactly like a bodiless GET.
fn is_empty_body(body: &str) -> bool {
    matches!(body.trim(), "" | "{}" | "[]" | "null")
}

/// Build the canonical string that gets hashed into the signature.
///
/// `body` must be the exact compact JSON text sent on the wire.
pub fn signing_string(params: &SigningParams<'_>, body: Option<&str>) -> String {
    let timestamp = params.timestamp.to_string();
    let mut pairs = [
        ("access_token", params.access_token),
        ("appID", params.app_id),
        ("secretKey", params.secret),
        ("timestamp", timestamp.as_str()),
    ];
    pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut out = String::new();
    for (key, value) in pairs {
        out.push('&');
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }

    match body.filter(|b| !is_empty_body(b)) {
        Some(body) => {
            out.push('&');
            out.push_str(&sha256_hex(body.as_bytes()));
            out.push('&');
        }
        None => out.push('&'),
    }
    out
}

/// Compute the request signature.
pub fn sign(params: &SigningParams<'_>, body: Option<&str>) -> String {
    sha256_hex(signing_string(params, body).as_bytes())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BODY: &str = r#"{"pageNum":1,"pageSize":100}"#;

    fn params() -> SigningParams<'static> {
        SigningParams {
            access_token: "tok-123",
            app_id: "app-1",
            secret: "s3cret",
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn signing_string_without_body_ends_with_single_ampersand() {
        let s = signing_string(&params(), None);
        assert_eq!(
            s,
            "&access_token=tok-123&appID=app-1&secretKey=s3cret&timestamp=1700000000000&"
        );
        assert!(!s.ends_with("&&"));
    }

    #[test]
    fn signing_string_with_body_embeds_body_digest() {
        let s = signing_string(&params(), Some(BODY));
        let digest = sha256_hex(BODY.as_bytes());
        assert_eq!(
            digest,
            "7d1f6dc954dbcd13059f383de85754c6ce516cb28c0aa64709bbbe925b24449c"
        );
        assert!(s.ends_with(&format!("&{digest}&")));
    }

    #[test]
    fn known_vectors() {
        assert_eq!(
            sign(&params(), None),
            "28ea0a15edb16b7588a0eb2fda351dbe628f6a6cd5dcddc5b97b8ababf5ae4de"
        );
        assert_eq!(
            sign(&params(), Some(BODY)),
            "6387b8bfc32b7bbd84e0a65e5d4c0ac16c2309a8297ec4630ad6ed810bb92600"
        );
    }

    #[test]
    fn signature_is_deterministic() {
        assert_eq!(sign(&params(), Some(BODY)), sign(&params(), Some(BODY)));
        assert_eq!(sign(&params(), None), sign(&params(), None));
    }

    #[test]
    fn every_input_changes_the_signature() {
        let base = sign(&params(), Some(BODY));
        let variants = [
            sign(
                &SigningParams {
                    access_token: "tok-124",
                    ..params()
                },
                Some(BODY),
            ),
            sign(
                &SigningParams {
                    app_id: "app-2",
                    ..params()
                },
                Some(BODY),
            ),
            sign(
                &SigningParams {
                    secret: "s3cret!",
                    ..params()
                },
                Some(BODY),
            ),
            sign(
                &SigningParams {
                    timestamp: 1_700_000_000_001,
                    ..params()
                },
                Some(BODY),
            ),
            sign(&params(), Some(r#"{"pageNum":2,"pageSize":100}"#)),
            sign(&params(), None),
        ];
        for (i, v) in variants.iter().enumerate() {
            assert_ne!(&base, v, "variant {i} collided with base signature");
        }
        for (i, a) in variants.iter().enumerate() {
            for b in &variants[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn empty_object_body_signs_like_no_body() {
        assert_eq!(sign(&params(), Some("{}")), sign(&params(), None));
        assert_eq!(sign(&params(), Some("")), sign(&params(), None));
    }
}
