//! Построение URL удалённого источника.

/// Склеить базовый URL и путь без двойных слешей
///
/// # Пример
/// ```rust
/// use frontend::shared::api_utils::api_url;
/// assert_eq!(api_url("https://host/", "/posts"), "https://host/posts");
/// ```
pub fn api_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// URL начальной партии: `<base>/posts?_limit=<limit>`
pub fn seed_url(base: &str, limit: u32) -> String {
    format!("{}?_limit={}", api_url(base, "/posts"), limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_without_doubled_slashes() {
        assert_eq!(api_url("http://a", "b"), "http://a/b");
        assert_eq!(api_url("http://a/", "/b"), "http://a/b");
    }

    #[test]
    fn seed_url_carries_limit() {
        assert_eq!(
            seed_url("https://jsonplaceholder.typicode.com", 12),
            "https://jsonplaceholder.typicode.com/posts?_limit=12"
        );
    }
}
