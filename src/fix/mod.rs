//! Automated bug fixing.
//!
//! Builds a prompt from a failing test name and the full source of the
//! suspected file, asks a [`FixSuggester`] for a replacement, and swaps the
//! file in place. Model output is untrusted: an empty answer is rejected and
//! the replacement goes through a temp file in the same directory so the
//! target is never left half-written.

pub mod model;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use model::{ChatCompletionSuggester, FixSuggester};

use crate::error::{Result, TesterError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    Applied { file: PathBuf, failing_test: String },
    /// The model answered with nothing usable; the file was not touched.
    EmptyResponse { file: PathBuf },
}

impl fmt::Display for FixOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied { file, failing_test } => {
                write!(f, "Applied fix to {} for {failing_test}", file.display())
            }
            Self::EmptyResponse { file } => write!(
                f,
                "Error: model returned an empty fix; {} left unchanged",
                file.display()
            ),
        }
    }
}

/// Prompt asking for a corrected version of `source`.
pub fn build_prompt(failing_test: &str, file_name: &str, source: &str) -> String {
    format!(
        "The test `{failing_test}` is failing.\n\
         Fix the bug in `{file_name}` so that it passes.\n\
         Return the complete corrected file only, with no explanations and no markdown fences.\n\n\
         {source}"
    )
}

/// Remove one surrounding markdown code fence, if present. A fenced body
/// keeps at most one trailing newline.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (```java).
    let body = rest.split_once('\n').map_or("", |(_, b)| b);
    let body = body.strip_suffix("```").unwrap_or(body);
    let content = body.trim_end_matches('\n');
    if body.len() > content.len() {
        &body[..content.len() + 1]
    } else {
        content
    }
}

/// Replace `path` with `contents` via a sibling temp file. An existing
/// target's permissions carry over to the replacement.
pub fn replace_file(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| TesterError::Io(e.error))?;
    Ok(())
}

/// Ask `suggester` to fix `path` for `failing_test` and apply the answer.
pub async fn fix_bug(
    path: &Path,
    failing_test: &str,
    suggester: &dyn FixSuggester,
) -> Result<FixOutcome> {
    if !path.is_file() {
        return Err(TesterError::NotFound(path.display().to_string()));
    }
    let source = std::fs::read_to_string(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let prompt = build_prompt(failing_test, &file_name, &source);
    let answer = suggester.suggest_fix(&prompt).await?;
    let fixed = strip_code_fence(&answer);

    if fixed.trim().is_empty() {
        tracing::warn!("Empty fix for {} from model", path.display());
        return Ok(FixOutcome::EmptyResponse {
            file: path.to_path_buf(),
        });
    }

    replace_file(path, fixed)?;
    tracing::info!("Applied fix to {} for {}", path.display(), failing_test);
    Ok(FixOutcome::Applied {
        file: path.to_path_buf(),
        failing_test: failing_test.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a canned answer and records the prompt it was given.
    struct CannedSuggester {
        answer: std::result::Result<String, String>,
        seen: Mutex<Vec<String>>,
    }

    impl CannedSuggester {
        fn ok(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(msg: &str) -> Self {
            Self {
                answer: Err(msg.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FixSuggester for CannedSuggester {
        async fn suggest_fix(&self, prompt: &str) -> Result<String> {
            self.seen.lock().unwrap().push(prompt.to_string());
            self.answer.clone().map_err(TesterError::Model)
        }
    }

    fn write_source(dir: &Path) -> PathBuf {
        let path = dir.join("Calculator.java");
        std::fs::write(&path, "public class Calculator { int add(int a, int b) { return a - b; } }\n").unwrap();
        path
    }

    #[tokio::test]
    async fn applies_model_answer_and_embeds_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(dir.path());
        let fixed = "public class Calculator { int add(int a, int b) { return a + b; } }\n";
        let suggester = CannedSuggester::ok(fixed);

        let outcome = fix_bug(&path, "CalculatorTest", &suggester).await.unwrap();
        assert_eq!(
            outcome.to_string(),
            format!("Applied fix to {} for CalculatorTest", path.display())
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), fixed);

        let prompts = suggester.seen.lock().unwrap();
        assert!(prompts[0].contains("CalculatorTest"));
        assert!(prompts[0].contains("return a - b;"));
    }

    #[tokio::test]
    async fn empty_answer_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(dir.path());
        let before = std::fs::read_to_string(&path).unwrap();

        let outcome = fix_bug(&path, "CalculatorTest", &CannedSuggester::ok("  \n"))
            .await
            .unwrap();
        assert!(matches!(outcome, FixOutcome::EmptyResponse { .. }));
        assert!(outcome.to_string().starts_with("Error: model returned an empty fix"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn model_error_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(dir.path());
        let before = std::fs::read_to_string(&path).unwrap();

        let err = fix_bug(&path, "CalculatorTest", &CannedSuggester::failing("rate limited"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("rate limited"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let suggester = CannedSuggester::ok("x");
        let err = fix_bug(&dir.path().join("Nope.java"), "NopeTest", &suggester)
            .await
            .unwrap_err();
        assert!(matches!(err, TesterError::NotFound(_)));
        assert!(suggester.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn strips_fenced_answers() {
        assert_eq!(strip_code_fence("```java\nclass A {}\n```"), "class A {}\n");
        assert_eq!(strip_code_fence("```\nclass A {}\n```\n"), "class A {}\n");
        assert_eq!(strip_code_fence("```java\nclass A {}\n\n\n```"), "class A {}\n");
        assert_eq!(strip_code_fence("```\nclass A {}```"), "class A {}");
        assert_eq!(strip_code_fence("class A {}\n"), "class A {}\n");
        assert_eq!(strip_code_fence("```"), "");
    }

    #[test]
    fn replace_file_overwrites_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.java");
        std::fs::write(&path, "old").unwrap();
        replace_file(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn replace_file_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradlew");
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        replace_file(&path, "#!/bin/sh\nexec java\n").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[tokio::test]
    async fn fenced_fix_keeps_final_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(dir.path());
        let fixed = "public class Calculator { int add(int a, int b) { return a + b; } }\n";
        let suggester = CannedSuggester::ok(&format!("```java\n{fixed}```"));

        fix_bug(&path, "CalculatorTest", &suggester).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), fixed);
    }
}
