// Country whitelist value object
// Immutable once built; injected wherever filtering happens

use std::collections::BTreeSet;

pub const DEFAULT_COUNTRY_CODES: [&str; 9] = ["AF", "AM", "AZ", "KG", "KZ", "TM", "UZ", "MN", "TR"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryWhitelist {
    codes: BTreeSet<String>,
}

impl CountryWhitelist {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes = codes
            .into_iter()
            .map(|code| normalize_code(code.as_ref()))
            .filter(|code| !code.is_empty())
            .collect();
        Self { codes }
    }

    pub fn contains(&self, country: &str) -> bool {
        self.codes.contains(&normalize_code(country))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for CountryWhitelist {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRY_CODES)
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
