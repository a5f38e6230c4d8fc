//! Intent classifier — picks a routing intent from keywords in the prompt.

use metarouter_core::types::RoutingIntent;

/// Substrings that send a prompt to image generation.
pub const IMAGE_KEYWORDS: &[&str] = &[
    "imagen",
    "foto",
    "dibuja",
    "logo",
    "creativo visual",
    "dragon",
    "gato",
];

/// Substrings that send a prompt to the code-tier model.
pub const CODE_KEYWORDS: &[&str] = &[
    "código",
    "python",
    "javascript",
    "programar",
    "bug",
    "script",
    "función",
];

/// Classify a prompt.
///
/// Comparison is case-insensitive. Image keywords are checked before code
/// keywords, so a prompt with both is an image prompt. Anything else,
/// including empty input, is text.
pub fn classify(query: &str) -> RoutingIntent {
    let query = query.to_lowercase();

    if IMAGE_KEYWORDS.iter().any(|k| query.contains(k)) {
        RoutingIntent::Image
    } else if CODE_KEYWORDS.iter().any(|k| query.contains(k)) {
        RoutingIntent::Code
    } else {
        RoutingIntent::Text
    }
}
