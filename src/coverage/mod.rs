//! JaCoCo coverage report reading.
//!
//! Two questions are answered from the XML report:
//! - which methods still have missed instructions ([`uncovered_methods`]);
//! - what the overall instruction coverage is ([`coverage_percentage`]).
//!
//! Method entries may carry a `missed` attribute directly. Real JaCoCo
//! reports instead nest `<counter type="INSTRUCTION" .../>` children under
//! each `<method>`; both shapes are accepted.

use std::path::Path;

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{Result, TesterError};

/// Result text when no method has missed instructions.
pub const ALL_COVERED: &str = "All covered";

/// Rendered percentage when no report can be read.
pub const NO_REPORT: &str = "No coverage report found";

/// Rendered percentage when the report has no instructions at all.
pub const UNKNOWN: &str = "unknown";

/// A method with at least one missed instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncoveredMethod {
    pub name: String,
    pub missed: u64,
    /// Owning source file relative to the source root (`com/acme/Calc.java`),
    /// when the report nests the method under a package and class.
    pub source_file: Option<String>,
}

fn parse_document(xml: &str) -> Result<Document<'_>> {
    // JaCoCo reports start with a DOCTYPE declaration.
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    Document::parse_with_options(xml, options)
        .map_err(|e| TesterError::InvalidReport(e.to_string()))
}

fn read_report(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TesterError::NotFound(path.display().to_string()),
        _ => TesterError::InvalidReport(format!("{}: {e}", path.display())),
    })
}

fn parse_count(node: Node<'_, '_>, attr: &str) -> Result<u64> {
    let raw = node.attribute(attr).unwrap_or("0");
    raw.trim().parse().map_err(|_| {
        TesterError::InvalidReport(format!(
            "<{}> has non-numeric {attr}=\"{raw}\"",
            node.tag_name().name()
        ))
    })
}

fn instruction_counter<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.has_tag_name("counter") && c.attribute("type") == Some("INSTRUCTION"))
}

fn method_missed(method: Node<'_, '_>) -> Result<u64> {
    if method.has_attribute("missed") {
        return parse_count(method, "missed");
    }
    match instruction_counter(method) {
        Some(counter) => parse_count(counter, "missed"),
        None => Ok(0),
    }
}

fn owning_source_file(method: Node<'_, '_>) -> Option<String> {
    let class = method.ancestors().find(|n| n.has_tag_name("class"))?;
    let file_name = class.attribute("sourcefilename")?;
    let package = method
        .ancestors()
        .find(|n| n.has_tag_name("package"))
        .and_then(|p| p.attribute("name"))
        .unwrap_or("");
    if package.is_empty() {
        Some(file_name.to_string())
    } else {
        Some(format!("{package}/{file_name}"))
    }
}

/// Collect every method with `missed > 0`, in document order.
pub fn uncovered_methods(xml: &str) -> Result<Vec<UncoveredMethod>> {
    let doc = parse_document(xml)?;
    let mut uncovered = Vec::new();
    for method in doc.descendants().filter(|n| n.has_tag_name("method")) {
        let missed = method_missed(method)?;
        if missed == 0 {
            continue;
        }
        uncovered.push(UncoveredMethod {
            name: method.attribute("name").unwrap_or_default().to_string(),
            missed,
            source_file: owning_source_file(method),
        });
    }
    Ok(uncovered)
}

/// Read the report at `path` and collect its uncovered methods.
pub fn read_uncovered(path: &Path) -> Result<Vec<UncoveredMethod>> {
    let xml = read_report(path)?;
    uncovered_methods(&xml)
}

/// Render uncovered methods as the tool result: [`ALL_COVERED`] or one name
/// per line.
pub fn format_uncovered(methods: &[UncoveredMethod]) -> String {
    if methods.is_empty() {
        return ALL_COVERED.to_string();
    }
    methods
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Overall instruction coverage as a percentage rounded to two decimals.
///
/// Uses the report-level counter (a direct child of the root) and falls back
/// to the first instruction counter anywhere in the document. Returns
/// `Ok(None)` when the counter has no instructions.
pub fn instruction_coverage(xml: &str) -> Result<Option<f64>> {
    let doc = parse_document(xml)?;
    let root = doc.root_element();
    let counter = instruction_counter(root)
        .or_else(|| {
            root.descendants().find(|n| {
                n.has_tag_name("counter") && n.attribute("type") == Some("INSTRUCTION")
            })
        })
        .ok_or_else(|| TesterError::InvalidReport("no INSTRUCTION counter".into()))?;

    let missed = parse_count(counter, "missed")?;
    let covered = parse_count(counter, "covered")?;
    let total = missed.checked_add(covered).ok_or_else(|| {
        TesterError::InvalidReport(format!("instruction total overflows: {missed} + {covered}"))
    })?;
    if total == 0 {
        return Ok(None);
    }
    let pct = covered as f64 / total as f64 * 100.0;
    Ok(Some((pct * 100.0).round() / 100.0))
}

/// Coverage of the report at `path`, rendered for commit messages.
///
/// Never fails: an unreadable report renders as [`NO_REPORT`].
pub fn coverage_percentage(path: &Path) -> String {
    let result = read_report(path).and_then(|xml| instruction_coverage(&xml));
    match result {
        Ok(Some(pct)) => render_percentage(pct),
        Ok(None) => UNKNOWN.to_string(),
        Err(e) => {
            tracing::debug!("No coverage percentage from {}: {e}", path.display());
            NO_REPORT.to_string()
        }
    }
}

/// Whole percentages keep one decimal place (`75.0%`).
fn render_percentage(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("{pct:.1}%")
    } else {
        format!("{pct}%")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const JACOCO: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<!DOCTYPE report PUBLIC "-//JACOCO//DTD Report 1.1//EN" "report.dtd">
<report name="calc">
  <package name="com/acme">
    <class name="com/acme/Calculator" sourcefilename="Calculator.java">
      <method name="&lt;init&gt;" desc="()V" line="3">
        <counter type="INSTRUCTION" missed="0" covered="3"/>
      </method>
      <method name="add" desc="(II)I" line="5">
        <counter type="INSTRUCTION" missed="0" covered="4"/>
      </method>
      <method name="divide" desc="(II)I" line="9">
        <counter type="INSTRUCTION" missed="6" covered="0"/>
        <counter type="LINE" missed="2" covered="0"/>
      </method>
      <counter type="INSTRUCTION" missed="6" covered="7"/>
    </class>
  </package>
  <counter type="INSTRUCTION" missed="6" covered="7"/>
  <counter type="LINE" missed="2" covered="2"/>
</report>
"#;

    #[test]
    fn flat_method_attributes() {
        let xml = r#"<report><method name="foo" missed="1"/><method name="bar" missed="0"/></report>"#;
        let methods = uncovered_methods(xml).unwrap();
        assert_eq!(format_uncovered(&methods), "foo");
        assert_eq!(methods[0].source_file, None);
    }

    #[test]
    fn all_covered_sentinel() {
        let xml = r#"<report><method name="foo" missed="0"/><method name="bar"/></report>"#;
        let methods = uncovered_methods(xml).unwrap();
        assert!(methods.is_empty());
        assert_eq!(format_uncovered(&methods), ALL_COVERED);
    }

    #[test]
    fn document_order_is_kept() {
        let xml = r#"<report>
            <method name="zeta" missed="2"/>
            <method name="alpha" missed="1"/>
            <method name="mid" missed="0"/>
            <method name="beta" missed="5"/>
        </report>"#;
        let methods = uncovered_methods(xml).unwrap();
        assert_eq!(format_uncovered(&methods), "zeta\nalpha\nbeta");
    }

    #[test]
    fn nested_jacoco_counters_and_owner() {
        let methods = uncovered_methods(JACOCO).unwrap();
        assert_eq!(
            methods,
            vec![UncoveredMethod {
                name: "divide".to_string(),
                missed: 6,
                source_file: Some("com/acme/Calculator.java".to_string()),
            }]
        );
    }

    #[test]
    fn default_package_owner_is_bare_file_name() {
        let xml = r#"<report><package name=""><class name="Calc" sourcefilename="Calc.java">
            <method name="sub" missed="1"/></class></package></report>"#;
        let methods = uncovered_methods(xml).unwrap();
        assert_eq!(methods[0].source_file.as_deref(), Some("Calc.java"));
    }

    #[test]
    fn malformed_xml_is_invalid_report() {
        let err = uncovered_methods("<report><method name=").unwrap_err();
        assert!(matches!(err, TesterError::InvalidReport(_)));
    }

    #[test]
    fn non_numeric_missed_is_invalid_report() {
        let err = uncovered_methods(r#"<report><method name="a" missed="lots"/></report>"#)
            .unwrap_err();
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_uncovered(&dir.path().join("jacoco.xml")).unwrap_err();
        assert!(matches!(err, TesterError::NotFound(_)));
    }

    #[test]
    fn report_level_counter_is_preferred() {
        // 7 / 13 = 53.846...
        assert_eq!(instruction_coverage(JACOCO).unwrap(), Some(53.85));
    }

    #[test]
    fn falls_back_to_first_nested_counter() {
        let xml = r#"<report><package name="p">
            <counter type="LINE" missed="9" covered="9"/>
            <counter type="INSTRUCTION" missed="1" covered="3"/>
        </package></report>"#;
        assert_eq!(instruction_coverage(xml).unwrap(), Some(75.0));
    }

    #[test]
    fn empty_counter_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jacoco.xml");
        std::fs::write(
            &path,
            r#"<report><counter type="INSTRUCTION" missed="0" covered="0"/></report>"#,
        )
        .unwrap();
        assert_eq!(coverage_percentage(&path), UNKNOWN);
    }

    #[test]
    fn percentage_renders_with_percent_sign() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jacoco.xml");
        std::fs::write(&path, JACOCO).unwrap();
        assert_eq!(coverage_percentage(&path), "53.85%");
    }

    #[test]
    fn whole_percentages_keep_one_decimal() {
        assert_eq!(render_percentage(100.0), "100.0%");
        assert_eq!(render_percentage(75.0), "75.0%");
        assert_eq!(render_percentage(0.0), "0.0%");
        assert_eq!(render_percentage(53.85), "53.85%");
    }

    #[test]
    fn overflowing_counter_is_invalid_report() {
        let xml = r#"<report><counter type="INSTRUCTION" missed="18446744073709551615" covered="1"/></report>"#;
        let err = instruction_coverage(xml).unwrap_err();
        assert!(matches!(err, TesterError::InvalidReport(_)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jacoco.xml");
        std::fs::write(&path, xml).unwrap();
        assert_eq!(coverage_percentage(&path), NO_REPORT);
    }

    #[test]
    fn missing_report_renders_no_report() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(coverage_percentage(&dir.path().join("missing.xml")), NO_REPORT);
    }

    #[test]
    fn report_without_counter_renders_no_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jacoco.xml");
        std::fs::write(&path, "<report/>").unwrap();
        assert_eq!(coverage_percentage(&path), NO_REPORT);
    }
}
