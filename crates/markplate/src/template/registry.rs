//! Where template sources come from.
//!
//! A [`TemplateRegistry`] maps element names (`p`, `em`, `h2`, ...) to
//! template sources. Sources are collected from:
//!
//! - strings added with [`TemplateRegistry::add_inline`]
//! - YAML bundles ([`TemplateRegistry::add_bundle`]), a mapping of name to
//!   source so a whole template set fits in one file
//! - template directories ([`TemplateRegistry::add_template_dir`])
//!
//! In-memory sources (inline and bundle) shadow files of the same name.
//!
//! Inside a directory the name of `quote/blockquote.html` is
//! `quote/blockquote`; the file is also reachable as `quote/blockquote.html`.
//! When one directory has several files for a name, the extension listed
//! first in [`TEMPLATE_EXTENSIONS`] takes the bare name:
//!
//! | Rank | Extension |
//! |------|-----------|
//! | 0 | `.jinja` |
//! | 1 | `.jinja2` |
//! | 2 | `.j2` |
//! | 3 | `.html` |
//! | 4 | `.txt` |
//!
//! Two directories defining the same name is a [`RegistryError::Collision`].
//!
//! ```yaml
//! # bundle
//! p: "<p{{ Attrs }}>{{ Content }}</p>\n"
//! em: "<i>{{ Content }}</i>"
//! hr: "<hr/>\n"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// File extensions recognized as templates, best first.
pub const TEMPLATE_EXTENSIONS: &[&str] = &[".jinja", ".jinja2", ".j2", ".html", ".txt"];

/// A template file found under a template directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Element name: relative path, `/`-separated, extension stripped.
    pub name: String,
    /// Relative path including the extension.
    pub file_name: String,
    pub path: PathBuf,
    /// Directory the file was found under.
    pub root: PathBuf,
}

impl TemplateFile {
    pub fn new(
        name: impl Into<String>,
        file_name: impl Into<String>,
        path: impl Into<PathBuf>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            path: path.into(),
            root: root.into(),
        }
    }

    /// Builds the entry for `path` under `root`, or `None` if the file is
    /// not a template.
    fn discover(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        let file_name = relative
            .components()
            .map(|part| part.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let ext = TEMPLATE_EXTENSIONS
            .iter()
            .find(|ext| file_name.ends_with(*ext))?;
        let name = file_name.strip_suffix(ext)?;
        if name.is_empty() || name.ends_with('/') {
            return None;
        }

        Some(Self::new(name, file_name.as_str(), path, root))
    }

    /// Position of the file's extension in [`TEMPLATE_EXTENSIONS`];
    /// `usize::MAX` for anything else.
    pub fn rank(&self) -> usize {
        TEMPLATE_EXTENSIONS
            .iter()
            .position(|ext| self.file_name.ends_with(ext))
            .unwrap_or(usize::MAX)
    }
}

/// Where a registered template's source lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Held in memory (inline strings and bundle entries).
    Memory(String),
    /// Read from disk when requested.
    File(PathBuf),
}

/// Failure to collect or look up template sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two template directories define the same element name.
    Collision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// No template is registered under the name.
    NotFound { name: String },

    /// A template file or directory could not be read.
    ReadError { path: PathBuf, message: String },

    /// A bundle is not a mapping of names to template sources.
    Bundle { origin: String, message: String },

    /// A template does not compile.
    Invalid { name: String, message: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Collision {
                name,
                first,
                second,
            } => write!(
                f,
                "template \"{}\" is defined twice:\n  - {}\n  - {}",
                name,
                first.display(),
                second.display()
            ),
            RegistryError::NotFound { name } => write!(f, "no template named \"{}\"", name),
            RegistryError::ReadError { path, message } => {
                write!(f, "cannot read {}: {}", path.display(), message)
            }
            RegistryError::Bundle { origin, message } => {
                write!(f, "bad template bundle {}: {}", origin, message)
            }
            RegistryError::Invalid { name, message } => {
                write!(f, "template \"{}\" does not compile: {}", name, message)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Element name → template source.
///
/// ```rust,ignore
/// let mut registry = TemplateRegistry::new();
/// registry.add_template_dir("./theme")?;
/// registry.add_inline("hr", "<hr/>\n");
///
/// let engine = MiniJinjaEngine::from_registry(&registry)?;
/// ```
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    memory: BTreeMap<String, String>,
    files: BTreeMap<String, PathBuf>,
    /// Directory each file-backed element name came from.
    roots: HashMap<String, PathBuf>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source` under `name`, replacing any earlier in-memory
    /// source of that name.
    pub fn add_inline(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.memory.insert(name.into(), source.into());
    }

    /// Registers every template file under `dir`.
    ///
    /// # Errors
    ///
    /// Fails if `dir` is not a readable directory, or if one of its names is
    /// already provided by a different directory.
    pub fn add_template_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<(), RegistryError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(RegistryError::ReadError {
                path: dir.to_path_buf(),
                message: "not a directory".to_string(),
            });
        }
        let files = walk_template_dir(dir)?;
        tracing::debug!(dir = %dir.display(), files = files.len(), "template directory scanned");
        self.add_from_files(files)
    }

    /// Registers already discovered template files.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Collision`] when a name is already provided
    /// by a different directory.
    pub fn add_from_files(&mut self, mut files: Vec<TemplateFile>) -> Result<(), RegistryError> {
        // Best extension first, so it claims the bare name
        files.sort_by_key(TemplateFile::rank);

        for file in files {
            match self.roots.get(&file.name).cloned() {
                Some(root) if root != file.root => {
                    let first = self.files.get(&file.name).cloned().unwrap_or(root);
                    return Err(RegistryError::Collision {
                        name: file.name,
                        first,
                        second: file.path,
                    });
                }
                Some(_) => {}
                None => {
                    self.roots.insert(file.name.clone(), file.root.clone());
                    self.files.insert(file.name.clone(), file.path.clone());
                }
            }
            self.files.insert(file.file_name, file.path);
        }

        Ok(())
    }

    /// Registers the entries of a YAML bundle file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a mapping of names to
    /// strings.
    pub fn add_bundle<P: AsRef<Path>>(&mut self, path: P) -> Result<(), RegistryError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|err| RegistryError::ReadError {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        self.merge_bundle(&yaml, &path.display().to_string())
    }

    /// Registers the entries of a YAML bundle held in memory.
    pub fn add_bundle_str(&mut self, yaml: &str) -> Result<(), RegistryError> {
        self.merge_bundle(yaml, "<string>")
    }

    fn merge_bundle(&mut self, yaml: &str, origin: &str) -> Result<(), RegistryError> {
        let bundle: BTreeMap<String, String> =
            serde_yaml::from_str(yaml).map_err(|err| RegistryError::Bundle {
                origin: origin.to_string(),
                message: err.to_string(),
            })?;
        tracing::debug!(origin, templates = bundle.len(), "template bundle loaded");
        self.memory.extend(bundle);
        Ok(())
    }

    /// Registers a template directory or a bundle file, depending on what
    /// `path` points at.
    pub fn add_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), RegistryError> {
        let path = path.as_ref();
        if path.is_dir() {
            self.add_template_dir(path)
        } else {
            self.add_bundle(path)
        }
    }

    /// Where the template for `name` comes from.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unknown names.
    pub fn get(&self, name: &str) -> Result<TemplateSource, RegistryError> {
        if let Some(source) = self.memory.get(name) {
            Ok(TemplateSource::Memory(source.clone()))
        } else if let Some(path) = self.files.get(name) {
            Ok(TemplateSource::File(path.clone()))
        } else {
            Err(RegistryError::NotFound {
                name: name.to_string(),
            })
        }
    }

    /// The source text of the template for `name`, read from disk for file
    /// templates.
    pub fn get_content(&self, name: &str) -> Result<String, RegistryError> {
        match self.get(name)? {
            TemplateSource::Memory(source) => Ok(source),
            TemplateSource::File(path) => {
                fs::read_to_string(&path).map_err(|err| RegistryError::ReadError {
                    message: err.to_string(),
                    path,
                })
            }
        }
    }

    /// Every registered name, sorted, each once.
    ///
    /// File templates appear both with and without extension.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .memory
            .keys()
            .chain(self.files.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory.is_empty() && self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.memory.clear();
        self.files.clear();
        self.roots.clear();
    }
}

/// Lists the template files under `root` in file-name order.
///
/// Symlinks are followed. Files without a template extension are skipped.
///
/// # Errors
///
/// Returns [`RegistryError::ReadError`] for the first entry that cannot be
/// read.
pub fn walk_template_dir(root: impl AsRef<Path>) -> Result<Vec<TemplateFile>, RegistryError> {
    let root = root.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|err| RegistryError::ReadError {
            path: err.path().unwrap_or(root).to_path_buf(),
            message: err.to_string(),
        })?;
        if entry.file_type().is_file() {
            files.extend(TemplateFile::discover(root, entry.path()));
        }
    }

    Ok(files)
}
