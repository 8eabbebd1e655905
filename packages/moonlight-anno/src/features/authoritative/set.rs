use rayon::prelude::*;
use regex::bytes::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::Result;
use crate::shared::utils::{discover_files, read_file};

/// Class names declared outside the corpus
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthoritativeSet {
    names: BTreeSet<String>,
}

impl AuthoritativeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Collect every `<marker> <Name>` declaration under `dir`
    ///
    /// A missing directory yields an empty set. Read failures abort.
    pub fn scan(dir: &Path, marker: &str, extension: &str) -> Result<Self> {
        if !dir.exists() {
            debug!("No authoritative annotations at {}", dir.display());
            return Ok(Self::new());
        }

        let regex = Regex::new(&format!(r"{}\s+([\w]+)", regex::escape(marker)))?;
        let files = discover_files(dir, extension)?;

        let parts: Vec<BTreeSet<String>> = files
            .par_iter()
            .map(|path| {
                let content = read_file(path)?;
                Ok(Self::declared_in(&regex, &content))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut names = BTreeSet::new();
        for part in parts {
            names.extend(part);
        }
        info!(
            "Loaded {} authoritative classes from {} files",
            names.len(),
            files.len()
        );
        Ok(Self { names })
    }

    fn declared_in(regex: &Regex, content: &[u8]) -> BTreeSet<String> {
        regex
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
