//! FFI interface for the host pipeline
//!
//! Provides a C-compatible entry point running a batch of extractions over
//! one HTML document. Requests and results travel as JSON.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use crate::error::{ExtractError, Result};
use crate::extractors::{extract_all, ExtractionRequest};

/// Outcome of one batch extraction, handed across the C boundary.
///
/// Exactly one pointer is set. Both strings are allocated here and go back
/// through [`free_extraction_result`].
#[repr(C)]
pub struct ExtractionResultFFI {
    /// `{"values": [{"alias": ..., "value": ...}, ...]}`, NUL-terminated
    pub json_ptr: *mut c_char,
    /// Human-readable failure, NUL-terminated
    pub error_ptr: *mut c_char,
}

/// Parse `html_len` bytes of HTML once and run every spec of the JSON
/// `ExtractionRequest` against it, in request order.
///
/// A spec whose selector matches nothing contributes a `null` value. A bad
/// request, a selector that does not parse or HTML that is not UTF-8 fails
/// the whole batch and sets `error_ptr`. A null or zero-length HTML buffer is
/// an empty document.
///
/// # Safety
/// `html_ptr` must be readable for `html_len` bytes and `request_json` must be
/// a NUL-terminated string. The result belongs to the caller until it is
/// passed to [`free_extraction_result`].
#[no_mangle]
pub unsafe extern "C" fn extract_from_html(
    html_ptr: *const c_char,
    html_len: usize,
    request_json: *const c_char,
) -> ExtractionResultFFI {
    let outcome = read_html(html_ptr, html_len).and_then(|html| {
        let request = ExtractionRequest::from_json(read_c_str(request_json, "request JSON")?)?;
        let result = extract_all(html, &request)?;
        serde_json::to_string(&result).map_err(|source| ExtractError::Serialize {
            context: "extraction result".to_owned(),
            source,
        })
    });

    match outcome {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => ExtractionResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("extraction result contains a NUL byte"),
        },
        Err(err) => {
            tracing::debug!(error = %err, "extraction request failed");
            make_error_result(&err.to_string())
        }
    }
}

/// Release both strings of a batch result.
///
/// # Safety
/// `result` must come from [`extract_from_html`] and be released once.
#[no_mangle]
pub unsafe extern "C" fn free_extraction_result(result: ExtractionResultFFI) {
    for owned in [result.json_ptr, result.error_ptr] {
        if !owned.is_null() {
            drop(CString::from_raw(owned));
        }
    }
}

/// A null or empty buffer reads as an empty document.
unsafe fn read_html<'a>(html_ptr: *const c_char, html_len: usize) -> Result<&'a str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok("");
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice).map_err(|_| ExtractError::InvalidUtf8("HTML content"))
}

unsafe fn read_c_str<'a>(ptr: *const c_char, what: &'static str) -> Result<&'a str> {
    if ptr.is_null() {
        return Err(ExtractError::NullPointer(what));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| ExtractError::InvalidUtf8(what))
}

fn make_error_result(msg: &str) -> ExtractionResultFFI {
    let error_cstr = CString::new(msg.replace('\0', "")).unwrap_or_default();
    ExtractionResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Call through the C ABI and copy out (json, error).
    fn call(html: &[u8], request: Option<&str>) -> (Option<String>, Option<String>) {
        let request = request.map(|r| CString::new(r).unwrap());
        let request_ptr = request.as_ref().map_or(ptr::null(), |r| r.as_ptr());

        unsafe {
            let result = extract_from_html(html.as_ptr() as *const c_char, html.len(), request_ptr);
            let read = |p: *mut c_char| {
                (!p.is_null()).then(|| CStr::from_ptr(p).to_string_lossy().into_owned())
            };
            let out = (read(result.json_ptr), read(result.error_ptr));
            free_extraction_result(result);
            out
        }
    }

    #[test]
    fn test_extract_from_html() {
        let html = br#"<div class="reviews">23 Reviews</div><p id="isbn">ISBN: 978-1-62544-175-1</p>"#;
        let request = r##"{"specs": [
            {"field": "review_count", "selector": ".reviews", "alias": "reviews"},
            {"field": "gtin", "selector": "#isbn", "alias": "isbn"}
        ]}"##;

        let (json, error) = call(html, Some(request));
        assert_eq!(error, None);

        let value: serde_json::Value = serde_json::from_str(&json.unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"values": [
                {"alias": "reviews", "value": 23},
                {"alias": "isbn", "value": {"type": "isbn13", "value": "9781625441751"}}
            ]})
        );
    }

    #[test]
    fn test_errors_are_reported() {
        let (json, error) = call(b"<p></p>", None);
        assert_eq!(json, None);
        assert_eq!(error.as_deref(), Some("request JSON is null"));

        let (_, error) = call(&[0xff, 0xfe], Some(r#"{"specs": []}"#));
        assert_eq!(error.as_deref(), Some("invalid UTF-8 in HTML content"));

        let (_, error) = call(b"<p></p>", Some("{"));
        assert!(error.unwrap().starts_with("failed to parse request JSON"));

        let (_, error) = call(
            b"<p></p>",
            Some(r#"{"specs": [{"field": "price", "selector": "p[", "alias": "price"}]}"#),
        );
        assert_eq!(error.as_deref(), Some("invalid CSS selector \"p[\" for price"));
    }

    #[test]
    fn test_empty_html() {
        let (json, error) = call(b"", Some(r#"{"specs": [{"field": "brand", "alias": "brand"}]}"#));
        assert_eq!(error, None);
        assert_eq!(json.as_deref(), Some(r#"{"values":[{"alias":"brand","value":null}]}"#));
    }
}
