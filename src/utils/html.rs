use ammonia;

/// Clean operator-entered text using the ammonia library.
///
/// This employs a whitelist-based sanitization strategy: it preserves safe tags
/// (like <b>, <p>) while stripping dangerous tags (like <script>, <iframe>)
/// and malicious attributes (like onclick).
///
/// Subject names are authored once and redisplayed as markup in every
/// admin panel afterwards, so this is the fail-safe against Stored XSS.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
