use serde::{Deserialize, Serialize};

/// Ordered model id substrings, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceList(Vec<String>);

impl PreferenceList {
    pub const DEFAULT: [&'static str; 5] = [
        "gemini-2.5-flash",
        "gemini-2.5",
        "gemini-2",
        "gemini-1.5",
        "gemini",
    ];

    pub fn new<I, S>(substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(substrings.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Default for PreferenceList {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}
