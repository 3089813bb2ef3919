//! Environment variable parsing shared by every configuration struct.

use std::env;
use std::str::FromStr;

/// Parses a boolean environment variable with a default fallback.
///
/// Recognizes "true", "1", "yes", "on" as true and "false", "0", "no", "off"
/// as false (case-insensitive). Any other value or a missing variable returns
/// the default.
pub fn parse_bool_env(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|val| match val.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

/// Parses a typed environment variable, falling back to `default` when the
/// variable is missing or does not parse.
pub fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|val| val.trim().parse().ok())
        .unwrap_or(default)
}

/// A non-empty, trimmed string variable.
pub fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global, so tests must not run in parallel.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_parse_bool_env_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let key = "DOSSIER_TEST_BOOL";

        for truthy in ["true", "1", "YES", "On"] {
            env::set_var(key, truthy);
            assert!(parse_bool_env(key, false), "{} should be true", truthy);
        }
        for falsy in ["false", "0", "no", "OFF"] {
            env::set_var(key, falsy);
            assert!(!parse_bool_env(key, true), "{} should be false", falsy);
        }

        env::set_var(key, "maybe");
        assert!(parse_bool_env(key, true));
        env::remove_var(key);
        assert!(!parse_bool_env(key, false));
    }

    #[test]
    fn test_parse_env_numbers() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let key = "DOSSIER_TEST_NUM";

        env::set_var(key, " 300 ");
        assert_eq!(parse_env::<u32>(key, 200), 300);
        env::set_var(key, "abc");
        assert_eq!(parse_env::<u32>(key, 200), 200);
        env::remove_var(key);
        assert_eq!(parse_env::<u64>(key, 10), 10);
    }

    #[test]
    fn test_non_empty_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let key = "DOSSIER_TEST_STR";

        env::set_var(key, "   ");
        assert_eq!(non_empty_env(key), None);
        env::set_var(key, " http://localhost:9200 ");
        assert_eq!(non_empty_env(key).as_deref(), Some("http://localhost:9200"));
        env::remove_var(key);
        assert_eq!(non_empty_env(key), None);
    }
}
