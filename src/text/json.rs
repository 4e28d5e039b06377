//! JSON text components (`{"text":"hi","color":"red","extra":[...]}`).
//!
//! Accepted input:
//! - JSON string `"hello"` or any primitive → a single unstyled node
//! - JSON object → a node with its style, children taken from `"extra"`
//! - JSON array → the first element is the node, the rest are appended to its children
//!   and therefore inherit its style

use super::component::{NodeId, TextComponent};
use super::style::{Decoration, Style, TextColor};
use crate::error::TextError;
use crate::key::ResourceKey;
use serde_json::{Map, Value};

/// Parse a JSON component from a string.
pub fn from_json_str(input: &str) -> Result<TextComponent, TextError> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| TextError::InvalidJson(e.to_string()))?;
    from_json(&value)
}

/// Parse JSON if possible, otherwise treat the whole input as plain text.
pub fn parse_lenient(input: &str) -> TextComponent {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return TextComponent::empty();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => from_json(&value).unwrap_or_else(|_| TextComponent::text(input)),
        Err(_) => TextComponent::text(input),
    }
}

const NO_CHILDREN: &[Value] = &[];

/// Pending node: the value to convert, where to attach it, and any trailing siblings from
/// an array that become its children.
struct Work<'a> {
    value: &'a Value,
    parent: Option<NodeId>,
    tail: Vec<&'a Value>,
}

/// Convert a JSON value into a component tree.
pub fn from_json(value: &Value) -> Result<TextComponent, TextError> {
    let mut component = TextComponent::unrooted();
    let mut stack = vec![Work {
        value,
        parent: None,
        tail: Vec::new(),
    }];

    while let Some(work) = stack.pop() {
        let (content, style, extra): (String, Style, &[Value]) = match work.value {
            Value::Array(items) => {
                let (first, rest) = items
                    .split_first()
                    .ok_or_else(|| TextError::InvalidJson("empty component array".into()))?;
                let mut tail: Vec<&Value> = rest.iter().collect();
                tail.extend(work.tail);
                stack.push(Work {
                    value: first,
                    parent: work.parent,
                    tail,
                });
                continue;
            }
            Value::Object(object) => {
                let extra = match object.get("extra") {
                    Some(Value::Array(extra)) => extra.as_slice(),
                    Some(_) => return Err(TextError::InvalidJson("'extra' must be an array".into())),
                    None => NO_CHILDREN,
                };
                (object_content(object), parse_style(object)?, extra)
            }
            Value::String(text) => (text.clone(), Style::default(), NO_CHILDREN),
            Value::Number(number) => (number.to_string(), Style::default(), NO_CHILDREN),
            Value::Bool(flag) => (flag.to_string(), Style::default(), NO_CHILDREN),
            Value::Null => return Err(TextError::InvalidJson("null component".into())),
        };

        let id = component.push_node(work.parent, content, style);
        let children: Vec<&Value> = extra.iter().chain(work.tail).collect();
        stack.extend(children.into_iter().rev().map(|child| Work {
            value: child,
            parent: Some(id),
            tail: Vec::new(),
        }));
    }

    Ok(component)
}

fn object_content(object: &Map<String, Value>) -> String {
    match object.get("text") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn parse_style(object: &Map<String, Value>) -> Result<Style, TextError> {
    let mut style = Style::default();

    if let Some(color) = object.get("color") {
        let raw = color
            .as_str()
            .ok_or_else(|| TextError::InvalidJson("'color' must be a string".into()))?;
        let color = TextColor::parse(raw)
            .ok_or_else(|| TextError::InvalidJson(format!("unknown color '{}'", raw)))?;
        style.color = Some(color);
    }

    for decoration in Decoration::ALL {
        match object.get(decoration.name()) {
            None => {}
            Some(Value::Bool(flag)) => style.set_decoration(decoration, Some(*flag)),
            Some(_) => {
                return Err(TextError::InvalidJson(format!(
                    "'{}' must be a boolean",
                    decoration.name()
                )))
            }
        }
    }

    if let Some(font) = object.get("font") {
        let raw = font
            .as_str()
            .ok_or_else(|| TextError::InvalidJson("'font' must be a string".into()))?;
        let key = ResourceKey::parse(raw).map_err(|e| TextError::InvalidJson(e.to_string()))?;
        style.font = Some(key);
    }

    Ok(style)
}

/// Deepest tree [`to_json`] will turn into a [`Value`].
///
/// Building, serializing and dropping a `Value` all recurse once per level.
pub const MAX_VALUE_DEPTH: usize = 256;

/// Convert a component tree into JSON. Unstyled leaves become plain strings.
///
/// Trees deeper than [`MAX_VALUE_DEPTH`] fail with [`TextError::TooDeep`]; use
/// [`to_json_string`] for those.
pub fn to_json(component: &TextComponent) -> Result<Value, TextError> {
    let depth = tree_depth(component);
    if depth > MAX_VALUE_DEPTH {
        return Err(TextError::TooDeep {
            depth,
            max: MAX_VALUE_DEPTH,
        });
    }

    // Children always sit after their parent in the arena, so walking backwards builds
    // every child value before its parent needs it.
    let mut built: Vec<Option<Value>> = vec![None; component.node_count()];

    for id in component.node_ids().rev() {
        let index = id.index();
        let node = component.node(id);
        let children: Vec<Value> = node
            .children()
            .iter()
            .filter_map(|child| built[child.index()].take())
            .collect();

        let style = node.style();
        let value = if style.is_empty() && children.is_empty() {
            Value::String(node.content().to_string())
        } else {
            let mut object = Map::new();
            object.insert("text".into(), Value::String(node.content().to_string()));
            for (name, field) in style_fields(style) {
                object.insert(name.into(), field);
            }
            if !children.is_empty() {
                object.insert("extra".into(), Value::Array(children));
            }
            Value::Object(object)
        };
        built[index] = Some(value);
    }

    Ok(built
        .first_mut()
        .and_then(Option::take)
        .unwrap_or_else(|| Value::String(String::new())))
}

enum Emit {
    Node(NodeId),
    Raw(&'static str),
}

/// Write a component tree as compact JSON text, in the same shape [`to_json`] builds.
///
/// Uses an explicit stack, so any depth the arena can hold is fine.
pub fn to_json_string(component: &TextComponent) -> String {
    let mut out = String::new();
    if component.node_count() == 0 {
        push_json_string(&mut out, "");
        return out;
    }

    let mut stack = vec![Emit::Node(component.root())];
    while let Some(emit) = stack.pop() {
        let id = match emit {
            Emit::Raw(text) => {
                out.push_str(text);
                continue;
            }
            Emit::Node(id) => id,
        };
        let node = component.node(id);
        let style = node.style();
        if style.is_empty() && node.children().is_empty() {
            push_json_string(&mut out, node.content());
            continue;
        }

        out.push_str("{\"text\":");
        push_json_string(&mut out, node.content());
        for (name, field) in style_fields(style) {
            out.push(',');
            push_json_string(&mut out, name);
            out.push(':');
            out.push_str(&field.to_string());
        }
        if node.children().is_empty() {
            out.push('}');
            continue;
        }

        out.push_str(",\"extra\":[");
        stack.push(Emit::Raw("]}"));
        for (i, child) in node.children().iter().enumerate().rev() {
            stack.push(Emit::Node(*child));
            if i > 0 {
                stack.push(Emit::Raw(","));
            }
        }
    }
    out
}

fn push_json_string(out: &mut String, text: &str) {
    out.push_str(&Value::from(text).to_string());
}

/// Style keys in the order they are written, skipping unset properties.
fn style_fields(style: &Style) -> Vec<(&'static str, Value)> {
    let mut fields = Vec::new();
    if let Some(color) = style.color {
        fields.push(("color", Value::String(color.to_string())));
    }
    for decoration in Decoration::ALL {
        if let Some(flag) = style.decoration(decoration) {
            fields.push((decoration.name(), Value::Bool(flag)));
        }
    }
    if let Some(font) = &style.font {
        fields.push(("font", Value::String(font.to_string())));
    }
    fields
}

/// Number of levels from the root to the deepest node.
fn tree_depth(component: &TextComponent) -> usize {
    let mut depths = vec![0usize; component.node_count()];
    let mut deepest = 0;
    for id in component.node_ids() {
        let depth = depths[id.index()].max(1);
        deepest = deepest.max(depth);
        for child in component.node(id).children() {
            depths[child.index()] = depth + 1;
        }
    }
    deepest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::style::NamedColor;

    #[test]
    fn test_parse_plain_string() {
        let component = from_json_str(r#""Hello""#).unwrap();
        assert_eq!(component.plain_text(), "Hello");
        assert!(component.style().is_empty());
    }

    #[test]
    fn test_parse_json_object() {
        let component = from_json_str(r#"{"text":"Hello","color":"red","bold":true}"#).unwrap();
        assert_eq!(component.content(), "Hello");
        assert_eq!(component.style().color, Some(TextColor::Named(NamedColor::Red)));
        assert_eq!(component.style().bold, Some(true));
    }

    #[test]
    fn test_parse_nested_extra_inherits() {
        let component = from_json_str(
            r#"{"text":"A","color":"red","extra":[{"text":"B","color":"green"},{"text":"C"}]}"#,
        )
        .unwrap();
        let runs = component.flatten();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].1.color, Some(TextColor::Named(NamedColor::Green)));
        // C inherits parent color "red"
        assert_eq!(runs[2].1.color, Some(TextColor::Named(NamedColor::Red)));
    }

    #[test]
    fn test_parse_array_tail_inherits_first() {
        let component = from_json_str(r#"[{"text":"A","color":"gold"},"B",{"text":"C","italic":true}]"#).unwrap();
        assert_eq!(component.plain_text(), "ABC");
        let resolved = component.resolved_styles();
        assert!(resolved.iter().all(|s| s.color == Some(TextColor::Named(NamedColor::Gold))));
        assert_eq!(component.node(component.root()).children().len(), 2);
    }

    #[test]
    fn test_parse_errors() {
        assert!(from_json_str("[]").is_err());
        assert!(from_json_str("null").is_err());
        assert!(from_json_str(r#"{"text":"x","color":"crimson"}"#).is_err());
        assert!(from_json_str(r#"{"text":"x","bold":"yes"}"#).is_err());
        assert!(from_json_str(r#"{"text":"x","font":"Bad Font"}"#).is_err());
        assert!(from_json_str("{not json").is_err());
    }

    #[test]
    fn test_parse_lenient_fallback() {
        let component = parse_lenient("Not {valid json");
        assert_eq!(component.plain_text(), "Not {valid json");
        assert_eq!(parse_lenient("  ").node_count(), 1);
        assert_eq!(parse_lenient(r#"{"text":"ok"}"#).plain_text(), "ok");
    }

    #[test]
    fn test_to_json_shapes() {
        assert_eq!(to_json(&TextComponent::text("plain")).unwrap(), Value::String("plain".into()));

        let component = TextComponent::text("A")
            .color(TextColor::Hex(0x123456))
            .append(TextComponent::text("B").bold(false));
        let value = to_json(&component).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"text": "A", "color": "#123456", "extra": [{"text": "B", "bold": false}]})
        );
        assert_eq!(from_json(&value).unwrap(), component);
    }

    #[test]
    fn test_json_string_matches_value() {
        let component = TextComponent::text("say \"hi\"")
            .color(NamedColor::Gold)
            .append(TextComponent::text("plain"))
            .append(
                TextComponent::text("deep")
                    .italic(true)
                    .font(ResourceKey::parse("uniform").unwrap())
                    .append(TextComponent::text("er").bold(true)),
            );
        let written = to_json_string(&component);
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, to_json(&component).unwrap());
        assert_eq!(to_json_string(&TextComponent::text("x")), r#""x""#);
    }

    #[test]
    fn test_deep_tree_writes_without_recursion() {
        let mut component = TextComponent::text("0");
        let mut parent = component.root();
        for _ in 1..200_000 {
            parent = component.push_child(parent, "a", Style::new());
        }

        assert!(matches!(
            to_json(&component),
            Err(TextError::TooDeep { depth: 200_000, max: MAX_VALUE_DEPTH })
        ));

        let written = to_json_string(&component);
        assert!(written.starts_with(r#"{"text":"0","extra":[{"text":"a","extra":["#));
        assert!(written.ends_with(r#""a"]}]}"#));
        assert_eq!(written.matches("\"a\"").count(), 199_999);
    }

    #[test]
    fn test_signed_hex_color_rejected() {
        assert!(from_json_str(r##"{"text":"x","color":"#+fffff"}"##).is_err());
    }
}
