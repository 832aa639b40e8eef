//! Parsing of action trigger identifiers
//!
//! A trigger identifier is a dotted path with an optional inline argument
//! block, e.g. `menu.file.save("format": "pdf")`. The argument block is
//! the body of a JSON object; it is wrapped in braces and decoded with
//! serde. Malformed arguments are ignored rather than reported, so a bad
//! identifier degrades to a plain dispatch instead of failing.

use tracing::debug;

/// The result of parsing a raw trigger identifier.
#[derive(Debug, Clone, Default)]
pub struct ParsedIdentifier {
    /// Path components, split on `.`, empty components removed.
    pub components: Vec<String>,
    /// Key/value arguments from the inline parenthesized block.
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

impl ParsedIdentifier {
    /// Parse a raw identifier string.
    ///
    /// The path is everything before the first `(`. The argument block
    /// runs to the *last* `)` rather than a matched one, so that `)`
    /// inside JSON string values survives; anything after that is
    /// ignored. The trade-off: trailing garbage that itself contains a
    /// `)` lands inside the block and is rejected as malformed, yielding
    /// empty arguments. There is no nested-paren support.
    pub fn parse(identifier: &str) -> Self {
        let (path, arguments) = match identifier.split_once('(') {
            Some((path, rest)) => {
                let body = match rest.rfind(')') {
                    Some(close) => &rest[..close],
                    None => rest,
                };
                (path, parse_arguments(body))
            }
            None => (identifier, serde_json::Map::new()),
        };

        let components = path
            .split('.')
            .filter(|component| !component.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            components,
            arguments,
        }
    }
}

fn parse_arguments(body: &str) -> serde_json::Map<String, serde_json::Value> {
    let wrapped = format!("{{{body}}}");
    match serde_json::from_str(&wrapped) {
        Ok(arguments) => arguments,
        Err(error) => {
            debug!(%error, "ignoring malformed action arguments");
            serde_json::Map::new()
        }
    }
}

/// Derive an action identifier from a Rust type name.
///
/// Strips any module path and generic suffix, then removes the last
/// occurrence of `"Action"`, so `app::actions::DoStuffAction` becomes
/// `"DoStuff"` and `DoActionStuffAction` becomes `"DoActionStuff"`.
pub fn derived_identifier(type_name: &str) -> String {
    let name = type_name.split('<').next().unwrap_or(type_name);
    let name = name.rsplit("::").next().unwrap_or(name);
    match name.rfind("Action") {
        Some(index) => {
            let mut stripped = String::with_capacity(name.len() - "Action".len());
            stripped.push_str(&name[..index]);
            stripped.push_str(&name[index + "Action".len()..]);
            stripped
        }
        None => name.to_string(),
    }
}
