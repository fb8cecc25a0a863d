//! View hand-off for controllers.
//!
//! A [`View`] turns a template identifier plus the controller's view data into
//! text. Template semantics belong to the view: the dispatch core only picks
//! the template name and appends whatever comes back to the response body.
//!
//! Two views ship with the crate:
//! - [`FileView`] - templates on disk, searched across view paths
//! - [`MemoryView`] - templates registered in memory (tests, embedded apps)
//!
//! Both understand flat substitution tags:
//! - `<%= key %>` - HTML-escaped value
//! - `<%- key %>` - raw value
//!
//! Keys may be dotted (`user.name`) to reach into nested objects.

pub mod file;
pub mod memory;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ViewError;

pub use file::FileView;
pub use memory::MemoryView;

/// Data handed to a template. Later writes to the same key overwrite.
pub type ViewData = IndexMap<String, Value>;

/// Renders a template identifier with view data.
pub trait View: Send + Sync {
    fn render(&self, template: &str, data: &ViewData) -> Result<String, ViewError>;
}

/// Substitute `<%= %>` / `<%- %>` tags in `source` with values from `data`.
pub fn interpolate(template: &str, source: &str, data: &ViewData) -> Result<String, ViewError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    let mut offset = 0;

    while let Some(start) = rest.find("<%") {
        out.push_str(&rest[..start]);
        let tag = &rest[start + 2..];
        let Some(end) = tag.find("%>") else {
            return Err(ViewError::UnterminatedTag {
                template: template.to_string(),
                offset: offset + start,
            });
        };

        let inner = &tag[..end];
        let (escape, key) = match inner.chars().next() {
            Some('=') => (true, inner[1..].trim()),
            Some('-') => (false, inner[1..].trim()),
            _ => {
                return Err(ViewError::general(format!(
                    "Unsupported tag '<%{}%>' in template {}",
                    inner, template
                )))
            }
        };

        let text = lookup(data, key).map(value_to_text).unwrap_or_default();
        if escape {
            out.push_str(&html_escape(&text));
        } else {
            out.push_str(&text);
        }

        let consumed = start + 2 + end + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }

    out.push_str(rest);
    Ok(out)
}

fn lookup<'a>(data: &'a ViewData, key: &str) -> Option<&'a Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
