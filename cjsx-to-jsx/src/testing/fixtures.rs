//! Deterministic stand-ins for the four transformers.
//!
//! These imitate just enough of each tool to exercise the pipeline: the
//! macro stripper understands self-closing elements with simple attributes,
//! the dialect converter only knows `Name = ->`, and so on.

use std::sync::Arc;

use crate::convert::StageBackends;
use crate::execution::InProcessBackend;
use crate::options::StageOptions;
use crate::stages::Stage;

/// Fixture transform functions.
pub mod transforms {
    use crate::execution::TransformRequest;
    use crate::options::OptionValue;

    const CREATE_ELEMENT: &str = "React.createElement(";

    /// `<Tag a="b" />` becomes `React.createElement(Tag, {a: "b"})`.
    ///
    /// An element without `/>` is a parse error.
    pub fn macro_strip(request: &TransformRequest) -> Result<String, String> {
        let text = request.text.as_str();
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find('<') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after.find("/>").ok_or_else(|| {
                let offset = text.len() - rest.len() + start;
                format!("Parse error at offset {offset}: unterminated element")
            })?;
            out.push_str(&create_element(after[..end].trim()));
            rest = &after[end + 2..];
        }

        out.push_str(rest);
        Ok(out)
    }

    fn create_element(element: &str) -> String {
        let (tag, attrs) = element
            .split_once(char::is_whitespace)
            .unwrap_or((element, ""));
        let props: Vec<String> = attrs
            .split_whitespace()
            .filter_map(|pair| pair.split_once('='))
            .map(|(key, value)| format!("{key}: {value}"))
            .collect();

        if props.is_empty() {
            format!("{CREATE_ELEMENT}{tag})")
        } else {
            format!("{CREATE_ELEMENT}{tag}, {{{}}})", props.join(", "))
        }
    }

    /// `Name = ->` becomes `const Name = () =>`; other lines gain a `;`.
    ///
    /// Honors `preferLet`.
    pub fn dialect_convert(request: &TransformRequest) -> Result<String, String> {
        let keyword = match request.options.get("preferLet") {
            Some(OptionValue::Bool(true)) => "let",
            _ => "const",
        };

        let mut out = String::with_capacity(request.text.len() + 16);
        for line in request.text.lines() {
            let trimmed = line.trim_end();
            if trimmed.trim().is_empty() {
                out.push('\n');
                continue;
            }
            if let Some(name) = trimmed.strip_suffix("= ->") {
                out.push_str(&format!("{keyword} {} = () =>\n", name.trim()));
            } else {
                out.push_str(trimmed);
                out.push_str(";\n");
            }
        }
        Ok(out)
    }

    /// `React.createElement(Tag, {a: "b"})` becomes `<Tag a="b" />`.
    pub fn ast_rewrite(request: &TransformRequest) -> Result<String, String> {
        let text = request.text.as_str();
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(CREATE_ELEMENT) {
            out.push_str(&rest[..start]);
            let after = &rest[start + CREATE_ELEMENT.len()..];
            let end = after
                .find(')')
                .ok_or_else(|| "SyntaxError: Unexpected token, expected \")\"".to_string())?;
            out.push_str(&jsx_element(&after[..end]));
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }

    fn jsx_element(args: &str) -> String {
        let (tag, props) = args.split_once(',').unwrap_or((args, ""));
        let props = props.trim().trim_start_matches('{').trim_end_matches('}');
        let mut element = format!("<{}", tag.trim());

        for prop in props.split(',').filter(|p| !p.trim().is_empty()) {
            if let Some((key, value)) = prop.split_once(':') {
                let value = value.trim();
                if value.starts_with('"') {
                    element.push_str(&format!(" {}={value}", key.trim()));
                } else {
                    element.push_str(&format!(" {}={{{value}}}", key.trim()));
                }
            }
        }

        element.push_str(" />");
        element
    }

    /// Re-indents by `tabWidth` (default 2), strips trailing whitespace and
    /// ends the text with exactly one newline.
    pub fn format(request: &TransformRequest) -> Result<String, String> {
        let width = match request.options.get("tabWidth") {
            Some(OptionValue::Int(width)) => usize::try_from(*width).map_err(|e| e.to_string())?,
            _ => 2,
        };

        let mut lines: Vec<String> = request
            .text
            .lines()
            .map(|line| {
                let content = line.trim();
                let level = (line.len() - line.trim_start().len()) / 2;
                if content.is_empty() {
                    String::new()
                } else {
                    format!("{}{content}", " ".repeat(level * width))
                }
            })
            .collect();

        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }
}

/// In-process backends running the fixture transforms.
#[must_use]
pub fn fixture_backends() -> StageBackends {
    StageBackends {
        macro_strip: Arc::new(InProcessBackend::new("cjsx-transform", transforms::macro_strip)),
        dialect_convert: Arc::new(InProcessBackend::new("decaffeinate", transforms::dialect_convert)),
        ast_rewrite: Arc::new(InProcessBackend::new("babel", transforms::ast_rewrite)),
        format: Arc::new(InProcessBackend::new("prettier", transforms::format)),
    }
}

/// The four stages on fixture backends, with no options set.
#[must_use]
pub fn fixture_stages() -> [Arc<dyn Stage>; 4] {
    fixture_backends().stages(&StageOptions::default())
}
