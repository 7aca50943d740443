// file: src/crawler/filter.rs
// description: Extension include/exclude filtering

use crate::error::{CrawlError, Result};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl FilterSpec {
    /// Builds a filter from bare extensions (`py`, not `.py`). A leading dot is
    /// tolerated and stripped. Giving both lists is a usage error.
    pub fn new<I, E>(include: I, exclude: E) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let include = normalize(include);
        let exclude = normalize(exclude);

        if !include.is_empty() && !exclude.is_empty() {
            return Err(CrawlError::usage(
                "--include and --exclude cannot be used together",
            ));
        }

        Ok(Self { include, exclude })
    }

    pub fn include<I>(extensions: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            include: normalize(extensions),
            exclude: BTreeSet::new(),
        }
    }

    pub fn exclude<E>(extensions: E) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            include: BTreeSet::new(),
            exclude: normalize(extensions),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn accepts(&self, path: &str) -> bool {
        let extension = extension_of(path);

        if !self.include.is_empty() {
            return extension.is_some_and(|ext| self.include.contains(ext));
        }

        if !self.exclude.is_empty() {
            return !extension.is_some_and(|ext| self.exclude.contains(ext));
        }

        true
    }
}

/// Text after the final `.` of the last path component. `None` when there is
/// no dot or nothing follows it.
pub fn extension_of(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

fn normalize<I>(extensions: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_string())
        .filter(|ext| !ext.is_empty())
        .collect()
}
