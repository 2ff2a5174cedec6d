/// Base64 image payload extracted from a data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

/// Split a `data:<mime>;base64,<payload>` URL into its mime type and
/// base64 payload.
///
/// Inputs without the data-URL prefix are passed through untouched with an
/// `image/jpeg` default, matching what cameras on the client side produce.
pub fn parse_data_url(image: &str) -> InlineImage {
    let mime_type = image
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64"))
        .map(|(mime, _)| mime.to_string())
        .unwrap_or_else(|| "image/jpeg".to_string());

    let data = image
        .split_once(',')
        .map(|(_, payload)| payload)
        .unwrap_or(image)
        .to_string();

    InlineImage { mime_type, data }
}
