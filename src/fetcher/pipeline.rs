use crate::fetcher::{
    errors::FetchError,
    types::{Charset, FetchedPage},
};
use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Bytes scanned for a `<meta>` charset declaration.
const SNIFF_LEN: usize = 4096;

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    body_bytes: Bytes,
    content_type: &str,
) -> Result<FetchedPage, FetchError> {
    let declared = detect_charset(content_type, &body_bytes);
    let (body_utf8, charset) = decode_to_utf8(&body_bytes, declared, url_final.as_str());

    Ok(FetchedPage {
        url_final,
        status,
        body_raw: body_bytes,
        body_utf8,
        charset,
        fetched_at: Utc::now(),
    })
}

/// Encoding named by the first capture of `regex` in `haystack`, if known.
fn declared_encoding(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

/// Header charset, then `<meta>` declarations, then a statistical guess.
fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    if let Some(encoding) = declared_encoding(&CHARSET_REGEX, content_type) {
        return Charset::from_encoding(encoding);
    }

    let head = &body_bytes[..body_bytes.len().min(SNIFF_LEN)];
    let head_str = String::from_utf8_lossy(head);

    if let Some(encoding) = declared_encoding(&META_CHARSET_REGEX, &head_str)
        .or_else(|| declared_encoding(&META_HTTP_EQUIV_REGEX, &head_str))
    {
        return Charset::from_encoding(encoding);
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body_bytes, true);
    Charset::from_encoding(detector.guess(None, true))
}

/// Decode with the detected charset, or as windows-1252 when that fails.
///
/// Every byte maps to a character in windows-1252, so the fallback never
/// loses a page.
fn decode_to_utf8(body_bytes: &[u8], charset: Charset, url: &str) -> (String, Charset) {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);
    if !had_errors {
        return (decoded.into_owned(), charset);
    }

    warn!(
        url,
        declared = encoding.name(),
        "content does not decode with declared charset, falling back to windows-1252"
    );
    let (decoded, _encoding, _) = encoding_rs::WINDOWS_1252.decode(body_bytes);
    (decoded.into_owned(), Charset::Windows1252)
}
