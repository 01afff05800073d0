use crate::utils::text::truncate_with_ellipsis;
use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;

const SECRET_PREFIXES: [&str; 2] = ["sk-ant-", "sk-"];
const SECRET_MARKERS: [&str; 5] = [
    "x-api-key: ",
    "Authorization: Bearer ",
    "\"api_key\":\"",
    "\"access_token\":\"",
    "access_token=",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|(_, c)| !is_secret_char(*c))
        .map_or(input.len(), |(i, _)| from + i)
}

fn redact_after(scrubbed: &mut String, marker: &str, min_token_len: usize) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let content_start = start + marker.len();
        let end = token_end(scrubbed, content_start);

        if end - content_start < min_token_len {
            search_from = content_start;
            continue;
        }

        scrubbed.replace_range(start..end, "[REDACTED]");
        search_from = start + "[REDACTED]".len();
    }
}

/// Redact API keys and bearer tokens from text bound for logs or errors.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let needs_scrub = SECRET_PREFIXES
        .iter()
        .chain(SECRET_MARKERS.iter())
        .any(|pattern| input.contains(pattern));
    if !needs_scrub {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in SECRET_MARKERS {
        redact_after(&mut scrubbed, marker, 1);
    }
    // Bare prefixes only count when followed by a token-sized run, so prose
    // like "sk-" in an error message survives.
    for prefix in SECRET_PREFIXES {
        redact_after(&mut scrubbed, prefix, 16);
    }
    Cow::Owned(scrubbed)
}

/// Sanitize API error text by scrubbing secrets and truncating length.
pub fn sanitize_api_error(input: &str) -> String {
    truncate_with_ellipsis(&scrub_secret_patterns(input), MAX_API_ERROR_CHARS)
}

/// Build a sanitized provider error from a failed HTTP response.
pub async fn api_error(provider: &str, response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
    let sanitized = sanitize_api_error(&body);
    anyhow::anyhow!("{provider} API error ({status}): {sanitized}")
}
