use encoding_rs::WINDOWS_1251;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Which decoding path produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Windows1251,
    /// Nothing matched cleanly; undecodable bytes were replaced.
    LossyUtf8,
}

impl TextEncoding {
    pub fn is_degraded(&self) -> bool {
        matches!(self, TextEncoding::LossyUtf8)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Windows1251 => "Windows-1251",
            TextEncoding::LossyUtf8 => "UTF-8 (lossy)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Decodes an uploaded plan file. Never fails: UTF-8 (BOM optional) is tried
/// first, then Windows-1251, then lossy UTF-8.
pub fn decode_plan_bytes(bytes: &[u8]) -> DecodedText {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(body) {
        return DecodedText {
            text: text.to_string(),
            encoding: TextEncoding::Utf8,
        };
    }

    if let Some(text) = WINDOWS_1251.decode_without_bom_handling_and_without_replacement(body) {
        return DecodedText {
            text: text.into_owned(),
            encoding: TextEncoding::Windows1251,
        };
    }

    tracing::warn!(
        "Plan file is neither UTF-8 nor Windows-1251, decoding {} bytes lossily",
        body.len()
    );
    DecodedText {
        text: String::from_utf8_lossy(body).into_owned(),
        encoding: TextEncoding::LossyUtf8,
    }
}
