//! Searchable target-language picker.
//!
//! Only mounted for tools whose config sets `needs_target_language`. The
//! selected language's *name* (not its code) is what the backend receives.

use serde::Serialize;

/// One selectable language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub name: &'static str,
    pub code: &'static str,
}

const fn lang(name: &'static str, code: &'static str) -> Language {
    Language { name, code }
}

/// Languages offered by the picker.
pub static LANGUAGES: &[Language] = &[
    lang("Arabic", "ar"),
    lang("Bengali", "bn"),
    lang("Bulgarian", "bg"),
    lang("Chinese (Simplified)", "zh-CN"),
    lang("Chinese (Traditional)", "zh-TW"),
    lang("Croatian", "hr"),
    lang("Czech", "cs"),
    lang("Danish", "da"),
    lang("Dutch", "nl"),
    lang("English", "en"),
    lang("Estonian", "et"),
    lang("Finnish", "fi"),
    lang("French", "fr"),
    lang("German", "de"),
    lang("Greek", "el"),
    lang("Hebrew", "he"),
    lang("Hindi", "hi"),
    lang("Hungarian", "hu"),
    lang("Indonesian", "id"),
    lang("Italian", "it"),
    lang("Japanese", "ja"),
    lang("Korean", "ko"),
    lang("Latvian", "lv"),
    lang("Lithuanian", "lt"),
    lang("Malay", "ms"),
    lang("Norwegian", "no"),
    lang("Persian", "fa"),
    lang("Polish", "pl"),
    lang("Portuguese", "pt"),
    lang("Romanian", "ro"),
    lang("Russian", "ru"),
    lang("Serbian", "sr"),
    lang("Slovak", "sk"),
    lang("Slovenian", "sl"),
    lang("Spanish", "es"),
    lang("Swahili", "sw"),
    lang("Swedish", "sv"),
    lang("Tagalog", "tl"),
    lang("Tamil", "ta"),
    lang("Thai", "th"),
    lang("Turkish", "tr"),
    lang("Ukrainian", "uk"),
    lang("Urdu", "ur"),
    lang("Vietnamese", "vi"),
];

/// Case-insensitive substring match against name or code. Empty query
/// matches everything.
pub fn search(query: &str) -> Vec<&'static Language> {
    let q = query.to_lowercase();
    LANGUAGES
        .iter()
        .filter(|l| {
            q.is_empty()
                || l.name.to_lowercase().contains(&q)
                || l.code.to_lowercase().contains(&q)
        })
        .collect()
}

/// Exact (case-insensitive) lookup by name or code.
pub fn find(name_or_code: &str) -> Option<&'static Language> {
    let needle = name_or_code.trim();
    LANGUAGES
        .iter()
        .find(|l| l.name.eq_ignore_ascii_case(needle) || l.code.eq_ignore_ascii_case(needle))
}

/// Dropdown state: open flag, search query and current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePicker {
    value: String,
    query: String,
    open: bool,
}

impl LanguagePicker {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            value: initial.into(),
            query: String::new(),
            open: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open = true;
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Entries matching the current query.
    pub fn filtered(&self) -> Vec<&'static Language> {
        search(&self.query)
    }

    /// Pick a language and close the list.
    pub fn select(&mut self, language: &Language) {
        self.value = language.name.to_string();
        self.close();
    }

    /// A click landed outside the control: close, keep the value.
    pub fn click_outside(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.open = false;
        self.query.clear();
    }
}

impl Default for LanguagePicker {
    fn default() -> Self {
        Self::new("Spanish")
    }
}
