//! Asset file naming.

/// Number of title characters kept in a per-title file name.
pub const TITLE_SLUG_CHARS: usize = 20;

/// Replace every whitespace run with a single underscore.
fn underscore_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Topic with whitespace runs collapsed to underscores.
///
/// Leading and trailing whitespace is dropped.
pub fn sanitize_topic(topic: &str) -> String {
    underscore_whitespace(topic.trim())
}

/// File name of the title list asset.
pub fn title_list_name(sanitized_topic: &str) -> String {
    format!("{sanitized_topic}_titles.txt")
}

/// Shared prefix for a title's assets: `{topic}_{index}_{slug}`.
///
/// `index` is 1-based. The slug is the first twenty characters of the
/// title, with whitespace runs replaced by underscores.
pub fn asset_prefix(sanitized_topic: &str, index: usize, title: &str) -> String {
    let head: String = title.chars().take(TITLE_SLUG_CHARS).collect();
    let slug = underscore_whitespace(&head);
    format!("{sanitized_topic}_{index}_{slug}")
}

/// Full asset file name for a title: `{prefix}_{suffix}`.
pub fn asset_name(prefix: &str, suffix: &str) -> String {
    format!("{prefix}_{suffix}")
}

/// File extension and MIME type for encoded image bytes. Unknown formats are
/// reported as PNG.
pub fn image_file_type(bytes: &[u8]) -> (&'static str, &'static str) {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => ("jpg", "image/jpeg"),
        Ok(image::ImageFormat::WebP) => ("webp", "image/webp"),
        Ok(image::ImageFormat::Gif) => ("gif", "image/gif"),
        _ => ("png", "image/png"),
    }
}

/// Replace characters that cannot appear in a single path component.
pub fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_topic() {
        assert_eq!(sanitize_topic("home  coffee\troasting"), "home_coffee_roasting");
        assert_eq!(sanitize_topic("  padded "), "padded");
        assert_eq!(sanitize_topic("single"), "single");
    }

    #[test]
    fn test_title_list_name() {
        assert_eq!(title_list_name("coffee"), "coffee_titles.txt");
    }

    #[test]
    fn test_asset_prefix_truncates_title() {
        let prefix = asset_prefix("coffee", 1, "Why Your Coffee Tastes Bitter");
        // "Why Your Coffee Tast" is the 20-character head
        assert_eq!(prefix, "coffee_1_Why_Your_Coffee_Tast");
    }

    #[test]
    fn test_asset_prefix_short_title() {
        assert_eq!(asset_prefix("t", 3, "T1"), "t_3_T1");
    }

    #[test]
    fn test_asset_prefix_trailing_space_in_head() {
        // The 20th character is a space
        assert_eq!(
            asset_prefix("t", 1, "abcdefghijklmnopqrs tail"),
            "t_1_abcdefghijklmnopqrs_"
        );
    }

    #[test]
    fn test_shared_heads_stay_unique() {
        let a = asset_prefix("t", 1, "The Same Twenty Chars and then A");
        let b = asset_prefix("t", 2, "The Same Twenty Chars and then B");
        assert_ne!(asset_name(&a, "script.txt"), asset_name(&b, "script.txt"));
    }

    #[test]
    fn test_image_file_type() {
        assert_eq!(image_file_type(&[0xFF, 0xD8, 0xFF, 0xE0]), ("jpg", "image/jpeg"));
        assert_eq!(
            image_file_type(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
            ("png", "image/png")
        );
        assert_eq!(image_file_type(b"??"), ("png", "image/png"));
    }

    #[test]
    fn test_file_safe() {
        assert_eq!(file_safe("a/b:c"), "a_b_c");
    }
}
