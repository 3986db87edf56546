//! Mapping build output to fix targets.
//!
//! [`FailureExtractor`] pulls failing test identifiers out of raw build
//! output; [`locate_source`] turns one identifier into the source file it
//! most likely tests, by naming convention.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Pulls failing test identifiers out of build output.
pub trait FailureExtractor: Send + Sync {
    /// Identifiers in first-seen order, without duplicates.
    fn failing_tests(&self, build_output: &str) -> Vec<String>;
}

/// Takes the second whitespace-separated token of every line containing one
/// of the markers. Matches Maven's `[ERROR] CalculatorTest.testAdd:12 ...`
/// and plain `FAIL CalculatorTest` style output.
#[derive(Debug, Clone)]
pub struct MarkerFailureExtractor {
    markers: Vec<String>,
}

impl MarkerFailureExtractor {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }
}

impl FailureExtractor for MarkerFailureExtractor {
    fn failing_tests(&self, build_output: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for line in build_output.lines() {
            if !self.markers.iter().any(|m| line.contains(m.as_str())) {
                continue;
            }
            let Some(token) = line.split_whitespace().nth(1) else {
                continue;
            };
            let id = token.trim_matches(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'));
            if !id.is_empty() && !found.iter().any(|f| f == id) {
                found.push(id.to_string());
            }
        }
        found
    }
}

/// Class name a test identifier refers to, with any `Test` suffix removed.
///
/// `com.acme.CalculatorTest.testAdd:12` → `Calculator`
/// `CalculatorTest#testAdd` → `Calculator`
/// `testAdd(com.acme.CalculatorTest)` → `Calculator`
pub fn source_class_for(test_id: &str) -> Option<String> {
    // Surefire prints `method(fully.qualified.Class)`.
    let base = match test_id.split_once('(') {
        Some((_, inner)) => inner.trim_end_matches(')'),
        None => test_id,
    };
    let base = base.split(['#', ':']).next().unwrap_or(base);
    let segments: Vec<&str> = base.split('.').filter(|s| !s.is_empty()).collect();
    // Prefer the last segment that looks like a class (upper-case initial);
    // `CalculatorTest.testAdd` ends in a method name.
    let class = segments
        .iter()
        .rev()
        .find(|s| s.chars().next().is_some_and(char::is_uppercase))
        .or_else(|| segments.last())?;
    let class: &str = class;
    let class = class.strip_suffix("Test").unwrap_or(class);
    if class.is_empty() {
        None
    } else {
        Some(class.to_string())
    }
}

/// First file named `<class>.<extension>` under `source_root`, walking in
/// file-name order.
pub fn locate_source(source_root: &Path, test_id: &str, extension: &str) -> Option<PathBuf> {
    let class = source_class_for(test_id)?;
    let wanted = format!("{class}.{extension}");
    WalkDir::new(source_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| e.file_type().is_file() && e.file_name().to_string_lossy() == wanted)
        .map(|e| e.into_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn extractor() -> MarkerFailureExtractor {
        MarkerFailureExtractor::new(vec!["FAIL".to_string(), "Exception".to_string()])
    }

    #[test]
    fn picks_second_token_of_marked_lines() {
        let output = "\
[INFO] Running com.acme.CalculatorTest
[ERROR] CalculatorTest.testDivide:14 expected:<2> but was:<0> FAIL
[INFO] Tests run: 3, Failures: 1
FAIL GreeterTest
java.lang.NullPointerException at Greeter.hello(Greeter.java:5)
";
        assert_eq!(
            extractor().failing_tests(output),
            vec!["CalculatorTest.testDivide:14", "GreeterTest", "at"]
        );
    }

    #[test]
    fn duplicates_are_dropped() {
        let output = "FAIL CalcTest\nFAIL CalcTest\nFAIL OtherTest\n";
        assert_eq!(extractor().failing_tests(output), vec!["CalcTest", "OtherTest"]);
    }

    #[test]
    fn single_token_lines_are_ignored() {
        assert!(extractor().failing_tests("FAIL\nException\n").is_empty());
    }

    #[test]
    fn custom_markers() {
        let ex = MarkerFailureExtractor::new(vec!["<<< FAILURE!".to_string()]);
        let output = "[ERROR] testAdd(com.acme.CalculatorTest)  Time elapsed: 0.01 s  <<< FAILURE!";
        assert_eq!(ex.failing_tests(output), vec!["testAdd(com.acme.CalculatorTest"]);
    }

    #[test_case("CalculatorTest", Some("Calculator") ; "plain")]
    #[test_case("com.acme.CalculatorTest", Some("Calculator") ; "qualified")]
    #[test_case("CalculatorTest.testAdd:12", Some("Calculator") ; "surefire method")]
    #[test_case("CalculatorTest#testAdd", Some("Calculator") ; "junit5 style")]
    #[test_case("testAdd(com.acme.CalculatorTest", Some("Calculator") ; "surefire parenthesised")]
    #[test_case("Calculator", Some("Calculator") ; "no suffix")]
    #[test_case("Test", None ; "bare suffix")]
    #[test_case("", None ; "empty")]
    fn maps_test_ids_to_classes(id: &str, expected: Option<&str>) {
        assert_eq!(source_class_for(id).as_deref(), expected);
    }

    #[test]
    fn locates_first_match_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a/com");
        let b = dir.path().join("b");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        std::fs::write(a.join("Calculator.java"), "class Calculator {}").unwrap();
        std::fs::write(b.join("Calculator.java"), "class Calculator {}").unwrap();

        let found = locate_source(dir.path(), "CalculatorTest", "java").unwrap();
        assert_eq!(found, a.join("Calculator.java"));
    }

    #[test]
    fn locate_returns_none_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(locate_source(dir.path(), "GhostTest", "java").is_none());
        assert!(locate_source(&dir.path().join("missing"), "GhostTest", "java").is_none());
    }
}
