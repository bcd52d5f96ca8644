use std::path::Path;

use anyhow::Context;
use encoding_rs::{Encoding, UTF_8};
use reqwest::Url;

/// The text of a schema document and the file name it came from
#[derive(Debug)]
pub struct Source {
    pub file_name: String,
    pub text: String,
}

/// Reads a schema from a file path or an `http(s)` URL.
pub fn load(input: &str) -> anyhow::Result<Source> {
    match Url::parse(input) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => fetch(url),
        _ => read_file(Path::new(input)),
    }
}

fn read_file(path: &Path) -> anyhow::Result<Source> {
    let buf = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Source {
        file_name,
        text: decode(&buf),
    })
}

fn fetch(url: Url) -> anyhow::Result<Source> {
    let response = reqwest::blocking::get(url.clone())
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("failed to fetch {url}"))?;
    let buf = response
        .bytes()
        .with_context(|| format!("failed to fetch {url}"))?;
    let file_name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string();
    Ok(Source {
        file_name,
        text: decode(&buf),
    })
}

/// Decodes as UTF-8 unless a byte order mark says otherwise.
fn decode(buf: &[u8]) -> String {
    let (decoded, _, _) = Encoding::decode(UTF_8, buf);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_file_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Order.v1.xsd");
        std::fs::write(&path, "<xs:schema/>").unwrap();

        let source = load(path.to_str().unwrap()).unwrap();
        assert_eq!(source.file_name, "Order.v1.xsd");
        assert_eq!(source.text, "<xs:schema/>");
    }

    #[test]
    fn strips_byte_order_mark() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBF<schema/>").unwrap();

        let source = load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(source.text, "<schema/>");
    }

    #[test]
    fn decodes_utf16_with_bom() {
        let mut buf = vec![0xFF, 0xFE];
        for unit in "<a/>".encode_utf16() {
            buf.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode(&buf), "<a/>");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.xsd");
        let error = load(path.to_str().unwrap()).unwrap_err();
        assert!(error.to_string().contains("failed to read"));
    }
}
