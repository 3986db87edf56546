//! JUnit test scaffolding.
//!
//! Reads a source file, discovers its public methods through a
//! [`MethodExtractor`], and writes `<Class>Test.<ext>` next to it with one
//! empty `@Test` stub per method. The generated file is overwritten on every
//! run. Overloaded methods produce duplicate stub names; this is not checked.

pub mod extract;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

pub use extract::{extractor_for, public_methods, MethodExtractor, RegexExtractor, SyntaxExtractor};

use crate::error::{Result, TesterError};

/// What a scaffolding run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldOutcome {
    /// A test file was written.
    Written {
        test_file: PathBuf,
        test_names: Vec<String>,
    },
    /// The source has no public methods; nothing was written.
    NoMethods,
}

impl ScaffoldOutcome {
    /// Human-readable summary for `source`.
    pub fn describe(&self, source: &Path) -> String {
        match self {
            Self::Written {
                test_file,
                test_names,
            } => format!(
                "Generated {} tests in {}",
                test_names.len(),
                test_file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            ),
            Self::NoMethods => format!("No public methods found in {}", source.display()),
        }
    }
}

fn package_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").expect("package pattern is valid")
    })
}

/// Path of the test file generated for `source`.
pub fn test_file_for(source: &Path) -> Option<PathBuf> {
    let stem = source.file_stem()?.to_str()?;
    let file_name = match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}Test.{ext}"),
        None => format!("{stem}Test"),
    };
    Some(source.with_file_name(file_name))
}

/// Render a JUnit 4 test class with one empty stub per method name.
pub fn render_test_class(class_name: &str, package: Option<&str>, methods: &[String]) -> String {
    let mut out = String::new();
    if let Some(pkg) = package {
        out.push_str(&format!("package {pkg};\n\n"));
    }
    out.push_str("import org.junit.Test;\n\n");
    out.push_str(&format!("public class {class_name}Test {{\n"));
    for m in methods {
        out.push_str(&format!("\n    @Test\n    public void test{m}() {{\n    }}\n"));
    }
    out.push_str("}\n");
    out
}

/// Scaffold tests for the source file at `source`.
pub fn generate_tests(source: &Path, extractor: &dyn MethodExtractor) -> Result<ScaffoldOutcome> {
    if !source.is_file() {
        return Err(TesterError::NotFound(source.display().to_string()));
    }
    let code = std::fs::read_to_string(source)?;
    let class_name = source
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| TesterError::Other(format!("no file name in {}", source.display())))?;

    let methods = public_methods(extractor, &code, class_name)?;
    if methods.is_empty() {
        tracing::info!("No public methods in {}", source.display());
        return Ok(ScaffoldOutcome::NoMethods);
    }

    let package = package_regex()
        .captures(&code)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());
    let test_file = test_file_for(source)
        .ok_or_else(|| TesterError::Other(format!("no file name in {}", source.display())))?;
    std::fs::write(&test_file, render_test_class(class_name, package, &methods))?;
    tracing::info!(
        "Wrote {} test stubs to {}",
        methods.len(),
        test_file.display()
    );

    Ok(ScaffoldOutcome::Written {
        test_file,
        test_names: methods.into_iter().map(|m| format!("test{m}")).collect(),
    })
}
