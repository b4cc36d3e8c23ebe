//
// compiler.rs
// The RIDL Compiler
//

//! The compilation driver. `Compiler::process()` loads the main
//! configuration document, assembles the ordered source list
//! (configuration `includes` first, then the files supplied on the
//! command line, then configuration `sources`), and runs each file
//! through the pipeline: content-hash de-duplication, JSON
//! detection (further configuration documents merge into the
//! project), tokenization, alias replacement, and parsing into the
//! project's global namespace. On success the populated project
//! graph is handed back on the configuration for downstream code
//! generation.

use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use std::fs::File;
use std::io::Read;
use std::mem;
use serde_json;
use serde_json::Value;
use error::{ Error, Result };
use lexer;
use model::{ self, RcContext };
use parser;
use util::{ Diagnostic, DiagnosticKind };


/// Everything a single compiler invocation needs, and where it
/// leaves its result.
#[derive(Debug, Default)]
pub struct Config {
    /// Path of the main project configuration document.
    pub config_file: String,
    /// Ordered list of source paths. On entry: the files supplied
    /// on the command line; after processing: the full ordered list
    /// including configuration-declared includes and sources.
    pub source_files: Vec<String>,
    /// Base name for generated artifacts; consumed by downstream
    /// code generators, not by the core.
    pub output_name: String,
    /// The project graph. Usually created from the configuration
    /// document; a caller may pre-seed it to merge several runs.
    pub project: Option<RcContext>,
}

/// A single compilation invocation. Owns its configuration for the
/// duration of `process()` and returns it with the populated
/// project graph.
#[derive(Debug)]
pub struct Compiler {
    config: Config,
}

impl Compiler {
    /// Wraps a configuration for processing.
    pub fn create(config: Config) -> Compiler {
        Compiler { config }
    }

    /// Runs the full pipeline; either succeeds, or reports the
    /// first failure.
    pub fn process(mut self) -> Result<Config> {
        self.read()?;
        self.validate()?;
        Ok(self.config)
    }

    fn read(&mut self) -> Result<()> {
        let mut processed_hashes = BTreeSet::new();

        let config_raw = load_file(&self.config.config_file)?;
        processed_hashes.insert(hash_as_string(&config_raw));

        let config_root: Value = serde_json::from_slice(&config_raw).map_err(|error| Error::Failure {
            message: format!(
                "Failed to parse main configuration file {}: {}",
                self.config.config_file, error
            ),
        })?;
        self.merge_configuration(&config_root)?;

        // configuration includes come first, then the files supplied
        // on the command line, then configuration sources
        let supplied = mem::replace(&mut self.config.source_files, Vec::new());
        push_config_paths(&mut self.config.source_files, &config_root, "includes");
        self.config.source_files.extend(supplied);
        push_config_paths(&mut self.config.source_files, &config_root, "sources");

        let source_files = self.config.source_files.clone();
        for file_name in &source_files {
            let raw = load_file(file_name)?;

            if !processed_hashes.insert(hash_as_string(&raw)) {
                println!(
                    "{}",
                    Diagnostic::new(
                        format!("[Info] Duplicate file found thus ignoring: {}", file_name),
                        DiagnosticKind::Info,
                    )
                );
                continue;
            }

            let text = String::from_utf8_lossy(&raw).into_owned();

            if is_likely_json(&text) {
                println!(
                    "{}",
                    Diagnostic::new(
                        format!("[Info] Reading configuration document: {}", file_name),
                        DiagnosticKind::Info,
                    )
                );

                let root: Value = serde_json::from_slice(&raw).map_err(|error| Error::Failure {
                    message: format!("Failed to parse configuration document {}: {}", file_name, error),
                })?;
                self.merge_configuration(&root)?;
                continue;
            }

            let project = match self.config.project {
                Some(ref project) => project.clone(),
                None => return Err(Error::Failure {
                    message: "Project configuration is missing".to_owned(),
                }),
            };

            println!(
                "{}",
                Diagnostic::new(
                    format!("[Info] Reading IDL source file: {}", file_name),
                    DiagnosticKind::Info,
                )
            );

            let mut tokens = lexer::tokenize(&text, 1)?;
            {
                let ptr = project.borrow()?;
                let root = ptr.as_project().ok_or_else(lazy_bug!("project root is not a project"))?;
                lexer::replace_aliases(&mut tokens, &root.aliases)?;
            }

            parser::parse_source(&project, tokens)?;
        }

        Ok(())
    }

    fn merge_configuration(&mut self, root: &Value) -> Result<()> {
        let existing = self.config.project.clone();
        match existing {
            Some(project) => model::parse_project_config(&project, root)?,
            None => self.config.project = Some(model::create_project(root)?),
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.config.project.is_none() {
            return Err(Error::Failure {
                message: "Project configuration is missing".to_owned(),
            });
        }
        Ok(())
    }
}


/// Whether a source blob is a configuration document rather than
/// IDL text: the first non-whitespace byte opens a JSON object or
/// array.
pub fn is_likely_json(text: &str) -> bool {
    for ch in text.chars() {
        if ch.is_whitespace() {
            continue;
        }
        return ch == '{' || ch == '[';
    }
    false
}

/// Content hash used for de-duplicating input files, rendered as a
/// hex string.
pub fn hash_as_string(bytes: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    hasher.write(bytes);
    format!("{:016x}", hasher.finish())
}

fn load_file(path: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();

    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut buf))
        .map_err(|error| Error::Failure {
            message: format!("Failed to load file {}: {}", path, error),
        })?;

    Ok(buf)
}

fn push_config_paths(list: &mut Vec<String>, root: &Value, key: &str) {
    if let Some(paths) = root.get(key).and_then(Value::as_array) {
        for path in paths {
            if let Some(path) = path.as_str() {
                if !path.is_empty() {
                    list.push(path.to_owned());
                }
            }
        }
    }
}
