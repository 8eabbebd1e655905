//! XML relation scanner
//!
//! Streams every markup file with `quick-xml`, one rayon task per file.
//! Tasks return local [`MarkupRelations`]; the serial merge happens in path
//! order, so duplicate declarations resolve the same way on every run.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::errors::{AnnoError, Result};
use crate::features::markup_scan::domain::{ElementFacts, MarkupRelations};
use crate::shared::models::Diagnostic;
use crate::shared::utils::{discover_files, read_file};

/// Relations of a whole markup tree
#[derive(Debug, Clone, Default)]
pub struct MarkupScan {
    pub relations: MarkupRelations,
    pub files_scanned: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of one markup file
#[derive(Debug, Clone, Default)]
pub struct FileMarkup {
    pub relations: MarkupRelations,
    pub recovered: Option<Diagnostic>,
}

/// Markup relation scanner
pub struct MarkupScanner {
    config: ScanConfig,
}

impl MarkupScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan every markup file under `root`
    ///
    /// Runs in the current rayon pool. The first hard failure aborts the
    /// phase; no partial relations are returned.
    pub fn scan(&self, root: &Path) -> Result<MarkupScan> {
        let files = discover_files(root, &self.config.markup_extension)?;
        info!("Scanning {} markup files for mixins", files.len());

        let results: Vec<FileMarkup> = files
            .par_iter()
            .map(|path| self.scan_file(path))
            .collect::<Result<Vec<_>>>()?;

        let mut diagnostics = Vec::new();
        let relations = MarkupRelations::merge_all(results.into_iter().map(|r| {
            if let Some(diag) = r.recovered {
                diagnostics.push(diag);
            }
            r.relations
        }));

        debug!(
            "Markup relations: {} mixins, {} inherits, {} frames",
            relations.bundle_to_name.len(),
            relations.name_to_inherits.len(),
            relations.frames.len()
        );

        Ok(MarkupScan {
            relations,
            files_scanned: files.len(),
            diagnostics,
        })
    }

    /// Scan one markup file
    pub fn scan_file(&self, path: &Path) -> Result<FileMarkup> {
        let bytes = read_file(path)?;
        self.parse(path, &bytes)
    }

    /// Parse markup bytes attributed to `path`
    pub fn parse(&self, path: &Path, bytes: &[u8]) -> Result<FileMarkup> {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(true);

        let mut relations = MarkupRelations::new();
        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    let message = format!("{} at byte {}", e, reader.buffer_position());
                    return self.recover(path, relations, message);
                }
            };

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => match element_facts(e) {
                    Ok(facts) => relations.record(&facts, &self.config.frame_tags),
                    Err(message) => return self.recover(path, relations, message),
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(FileMarkup {
            relations,
            recovered: None,
        })
    }

    /// Strict mode fails the file; lenient mode keeps what was read so far
    fn recover(
        &self,
        path: &Path,
        relations: MarkupRelations,
        message: String,
    ) -> Result<FileMarkup> {
        if self.config.strict_markup {
            return Err(AnnoError::markup(path, message));
        }
        let diag = Diagnostic::MarkupRecovered {
            path: PathBuf::from(path),
            message,
        };
        diag.log();
        Ok(FileMarkup {
            relations,
            recovered: Some(diag),
        })
    }
}

/// Pull `name`, `mixin` and `inherits` out of a start tag
fn element_facts(e: &BytesStart<'_>) -> std::result::Result<ElementFacts, String> {
    let mut facts = ElementFacts {
        tag: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        ..ElementFacts::default()
    };

    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let slot = match attr.key.local_name().as_ref() {
            b"name" => &mut facts.name,
            b"mixin" => &mut facts.mixin,
            b"inherits" => &mut facts.inherits,
            _ => continue,
        };
        *slot = attr
            .unescape_value()
            .map_err(|err| err.to_string())?
            .into_owned();
    }

    Ok(facts)
}
