// src/utils/html.rs

/// Cleans quiz titles and descriptions with ammonia.
///
/// Safe formatting tags (<b>, <p>, ...) are kept; <script>/<style> are
/// removed together with their content, as are event-handler attributes.
/// Text is trimmed first.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input.trim())
}
