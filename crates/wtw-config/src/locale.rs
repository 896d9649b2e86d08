//! Region detection from POSIX locale variables.

pub const DEFAULT_REGION: &str = "US";

/// Locale variables in the order the C library consults them
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

pub fn is_region_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Extract the upper-cased region from a locale tag.
///
/// Accepts `en_GB.UTF-8`, `en-GB`, `pt_BR@euro`; `C`, `POSIX` and bare
/// languages yield `None`.
pub fn region_from_locale(tag: &str) -> Option<String> {
    let base = tag.split(['.', '@']).next().unwrap_or_default();
    let region = base.split(['_', '-']).nth(1)?;
    is_region_code(region).then(|| region.to_uppercase())
}

/// Region of the first locale variable that names one
pub fn region_from_env() -> Option<String> {
    LOCALE_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|tag| region_from_locale(&tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_locale() {
        assert_eq!(region_from_locale("en_GB.UTF-8"), Some("GB".to_string()));
        assert_eq!(region_from_locale("en-us"), Some("US".to_string()));
        assert_eq!(region_from_locale("pt_BR@euro"), Some("BR".to_string()));
        assert_eq!(region_from_locale("C"), None);
        assert_eq!(region_from_locale("C.UTF-8"), None);
        assert_eq!(region_from_locale("en"), None);
        assert_eq!(region_from_locale("zh_Hans_CN"), None);
    }

    #[test]
    fn test_is_region_code() {
        assert!(is_region_code("US"));
        assert!(is_region_code("gb"));
        assert!(!is_region_code("USA"));
        assert!(!is_region_code("1A"));
    }
}
