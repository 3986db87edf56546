//! Public method discovery for Java sources.
//!
//! [`RegexExtractor`] is a heuristic: it matches `public [static] <type> name(`
//! textually and knows nothing about comments, strings or generics with
//! spaces. [`SyntaxExtractor`] walks a tree-sitter-java syntax tree instead.
//! Both return names in source order and keep duplicates (overloads).

use std::sync::OnceLock;

use regex::Regex;

use crate::config::schema::ExtractorKind;
use crate::error::{Result, TesterError};

/// Finds the names of public methods declared in a source text.
pub trait MethodExtractor: Send + Sync {
    /// Method names in source order, duplicates included.
    fn extract(&self, source: &str) -> Result<Vec<String>>;
}

/// Build the extractor selected in config.
pub fn extractor_for(kind: ExtractorKind) -> Box<dyn MethodExtractor> {
    match kind {
        ExtractorKind::Regex => Box::new(RegexExtractor),
        ExtractorKind::Syntax => Box::new(SyntaxExtractor),
    }
}

/// Public method names in `source`, excluding `class_name` (the constructor).
pub fn public_methods(
    extractor: &dyn MethodExtractor,
    source: &str,
    class_name: &str,
) -> Result<Vec<String>> {
    Ok(extractor
        .extract(source)?
        .into_iter()
        .filter(|name| name != class_name)
        .collect())
}

// ---------------------------------------------------------------------------
// Regex
// ---------------------------------------------------------------------------

fn signature_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"public\s+(?:static\s+)?[\w<>\[\],?]+\s+(\w+)\s*\(")
            .expect("signature pattern is valid")
    })
}

/// Textual `public [static] <type> <name>(` matcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexExtractor;

impl MethodExtractor for RegexExtractor {
    fn extract(&self, source: &str) -> Result<Vec<String>> {
        Ok(signature_regex()
            .captures_iter(source)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// tree-sitter
// ---------------------------------------------------------------------------

/// `method_declaration` nodes with a `public` modifier, from tree-sitter-java.
///
/// A fresh parser is created per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntaxExtractor;

impl MethodExtractor for SyntaxExtractor {
    fn extract(&self, source: &str) -> Result<Vec<String>> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| TesterError::Other(format!("Language version mismatch: {e}")))?;
        let tree = parser.parse(source, None).ok_or_else(|| {
            TesterError::Other("tree-sitter returned None (timeout or cancellation)".into())
        })?;

        let mut names = Vec::new();
        collect_public_methods(tree.root_node(), source.as_bytes(), &mut names);
        Ok(names)
    }
}

fn collect_public_methods(node: tree_sitter::Node<'_>, src: &[u8], out: &mut Vec<String>) {
    if node.kind() == "method_declaration" && has_public_modifier(node) {
        if let Some(name) = node
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(src).ok())
        {
            out.push(name.to_string());
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_public_methods(child, src, out);
    }
}

fn has_public_modifier(method: tree_sitter::Node<'_>) -> bool {
    let mut cursor = method.walk();
    let modifiers = method
        .children(&mut cursor)
        .find(|c| c.kind() == "modifiers");
    let Some(modifiers) = modifiers else {
        return false;
    };
    let mut cursor = modifiers.walk();
    let is_public = modifiers
        .children(&mut cursor)
        .any(|c| c.kind() == "public");
    is_public
}
