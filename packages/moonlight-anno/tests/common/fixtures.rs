//! Temporary corpus fixtures

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A corpus, an authoritative annotation dir and an output dir under one tempdir
pub struct Corpus {
    dir: TempDir,
}

impl Corpus {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("corpus")).expect("corpus dir");
        Self { dir }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("corpus")
    }

    pub fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    pub fn authoritative(&self) -> PathBuf {
        self.dir.path().join("annotations")
    }

    /// Write a corpus file at `rel`
    pub fn file(&self, rel: &str, content: &str) -> &Self {
        write(&self.root().join(rel), content);
        self
    }

    /// Write an authoritative annotation file at `rel`
    pub fn annotation(&self, rel: &str, content: &str) -> &Self {
        write(&self.authoritative().join(rel), content);
        self
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.root().join(rel)).expect("read corpus file")
    }

    pub fn aggregate(&self) -> String {
        std::fs::read_to_string(self.out().join("generated/generated.lua")).expect("read aggregate")
    }

    /// Relative path → content of every corpus file
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        let root = self.root();
        WalkDir::new(&root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let rel = e
                    .path()
                    .strip_prefix(&root)
                    .expect("under root")
                    .to_string_lossy()
                    .replace('\\', "/");
                let content = std::fs::read_to_string(e.path()).expect("read");
                (rel, content)
            })
            .collect()
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, content).expect("write fixture");
}

/// `<Frame name=".." mixin=".."/>` wrapped in a `<Ui>` root
pub fn frame_xml(frames: &[(&str, &str)]) -> String {
    let body: String = frames
        .iter()
        .map(|(name, mixin)| format!("  <Frame name=\"{}\" mixin=\"{}\"/>\n", name, mixin))
        .collect();
    format!("<Ui>\n{}</Ui>\n", body)
}

/// The sample addon used by most scenarios
pub fn sample_corpus() -> Corpus {
    let corpus = Corpus::new();
    corpus
        .file(
            "Addon/Frames.xml",
            &frame_xml(&[("MyFrame", "MyMixin"), ("ChildFrame", "ChildMixin")]),
        )
        .file(
            "Addon/Templates.xml",
            r#"<Ui><Button name="FancyButton" inherits="UIPanelButtonTemplate, $PrivateTemplate"/></Ui>"#,
        )
        .file("Addon/MyMixin.lua", "MyMixin = {}\n\nfunction MyMixin:OnLoad() end\n")
        .file("Addon/Child.lua", "ChildMixin = CreateFromMixins(ParentMixin)\n")
        .file("Addon/Parent.lua", "ParentMixin =\n{\n  value = 1,\n}\n");
    corpus
}
