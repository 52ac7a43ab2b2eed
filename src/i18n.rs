//! UI strings in English and Russian.
//!
//! Key→string tables are embedded from `locales/*.txt`. The `t!("key")`
//! macro looks up the current language, falling back to English and then
//! to the key itself. Language can be switched at runtime via `set_language()`.

use std::collections::HashMap;
use std::sync::Mutex;

static I18N: Mutex<Option<I18nState>> = Mutex::new(None);

struct I18nState {
    current_lang: String,
    /// lang_code → (key → translated_string)
    translations: HashMap<String, HashMap<String, String>>,
}

impl I18nState {
    fn lookup(&self, key: &str) -> Option<&str> {
        let find = |lang: &str| {
            self.translations
                .get(lang)
                .and_then(|map| map.get(key))
                .map(String::as_str)
        };
        find(&self.current_lang).or_else(|| find(FALLBACK))
    }
}

const FALLBACK: &str = "en";

/// Supported languages: (code, native_name)
pub const LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("ru", "Русский")];

/// Load the embedded tables. Call once at startup.
pub fn init() {
    let mut translations = HashMap::new();
    translations.insert(
        "en".to_string(),
        parse_translations(include_str!("../locales/en.txt")),
    );
    translations.insert(
        "ru".to_string(),
        parse_translations(include_str!("../locales/ru.txt")),
    );

    if let Ok(mut guard) = I18N.lock() {
        *guard = Some(I18nState {
            current_lang: FALLBACK.to_string(),
            translations,
        });
    }
}

/// Set the active language. Unknown codes select English.
pub fn set_language(code: &str) {
    if let Ok(mut guard) = I18N.lock() {
        if let Some(state) = guard.as_mut() {
            state.current_lang = if state.translations.contains_key(code) {
                code.to_string()
            } else {
                FALLBACK.to_string()
            };
        }
    }
}

pub fn current_language() -> String {
    I18N.lock()
        .ok()
        .and_then(|guard| guard.as_ref().map(|s| s.current_lang.clone()))
        .unwrap_or_else(|| FALLBACK.to_string())
}

/// Look up a key in the current language, then English, then echo the key.
pub fn translate(key: &str) -> String {
    if let Ok(guard) = I18N.lock() {
        if let Some(val) = guard.as_ref().and_then(|state| state.lookup(key)) {
            return val.to_string();
        }
    }
    key.to_string()
}

/// Best supported language for the environment's locale variables.
pub fn detect_system_language() -> String {
    for var in ["LC_ALL", "LC_MESSAGES", "LANG", "LANGUAGE"] {
        if let Ok(val) = std::env::var(var) {
            if let Some(lang) = match_system_locale(&val) {
                return lang;
            }
        }
    }
    FALLBACK.to_string()
}

/// Match a locale string ("ru_RU.UTF-8", "en-US", "ru") to a supported code.
fn match_system_locale(locale: &str) -> Option<String> {
    let normalized = locale.to_lowercase().replace('_', "-");
    let lang_part = normalized.split(['.', '@']).next().unwrap_or(&normalized);
    let primary = lang_part.split('-').next().unwrap_or(lang_part);

    LANGUAGES
        .iter()
        .find(|(code, _)| *code == primary)
        .map(|(code, _)| code.to_string())
}

/// One `key=value` per line; `#` starts a comment line.
fn parse_translations(data: &str) -> HashMap<String, String> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, val)| (key.trim().to_string(), val.trim().replace("\\n", "\n")))
        .collect()
}

/// Translation macro. Usage: `t!("menu.file")` or `t!("status.size", w = 640, h = 480)`
#[macro_export]
macro_rules! t {
    ($key:expr) => {
        $crate::i18n::translate($key)
    };
    ($key:expr, $($name:ident = $val:expr),+ $(,)?) => {{
        let mut s = $crate::i18n::translate($key);
        $(
            s = s.replace(concat!("{", stringify!($name), "}"), &format!("{}", $val));
        )+
        s
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(lang: &str) -> I18nState {
        let mut translations = HashMap::new();
        translations.insert(
            "en".to_string(),
            parse_translations(include_str!("../locales/en.txt")),
        );
        translations.insert(
            "ru".to_string(),
            parse_translations(include_str!("../locales/ru.txt")),
        );
        I18nState {
            current_lang: lang.to_string(),
            translations,
        }
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let map = parse_translations("# header\n\na = b \n c=d=e\nbroken line\nmulti=x\\ny");
        assert_eq!(map.len(), 3);
        assert_eq!(map["a"], "b");
        assert_eq!(map["c"], "d=e");
        assert_eq!(map["multi"], "x\ny");
    }

    #[test]
    fn every_english_key_has_a_russian_entry() {
        let s = state("ru");
        let en = &s.translations["en"];
        let ru = &s.translations["ru"];
        let missing: Vec<_> = en.keys().filter(|k| !ru.contains_key(*k)).collect();
        assert!(missing.is_empty(), "missing ru keys: {:?}", missing);
    }

    #[test]
    fn lookup_falls_back_to_english() {
        let mut s = state("ru");
        s.translations
            .get_mut("en")
            .unwrap()
            .insert("only.english".into(), "Only English".into());
        assert_eq!(s.lookup("only.english"), Some("Only English"));
        assert_eq!(s.lookup("menu.file"), Some("Файл"));
        assert_eq!(s.lookup("no.such.key"), None);
    }

    #[test]
    fn locale_matching() {
        assert_eq!(match_system_locale("ru_RU.UTF-8").as_deref(), Some("ru"));
        assert_eq!(match_system_locale("en-GB").as_deref(), Some("en"));
        assert_eq!(match_system_locale("de_DE@euro"), None);
    }
}
