//! Inline style properties
//!
//! Mirrors an element's `style` attribute: an ordered map of CSS property
//! names to raw values. Resize, alignment and transform writes all land here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InlineStyle(BTreeMap<String, String>);

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute string (`"width: 40px; float: left"`)
    pub fn parse(attr: &str) -> Self {
        let mut style = Self::new();
        for decl in attr.split(';') {
            if let Some((name, value)) = decl.split_once(':') {
                let name = name.trim();
                let value = value.trim();
                if !name.is_empty() && !value.is_empty() {
                    style.set(name, value);
                }
            }
        }
        style
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        self.0.insert(property.to_ascii_lowercase(), value.into());
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        self.0.remove(property)
    }

    /// Read a pixel length (`"120px"` or bare `"120"`)
    pub fn px(&self, property: &str) -> Option<f64> {
        let raw = self.get(property)?;
        raw.strip_suffix("px").unwrap_or(raw).trim().parse().ok()
    }

    pub fn set_px(&mut self, property: &str, value: f64) {
        self.set(property, format!("{}px", round_px(value)));
    }

    /// Copy every property of `other` over this one
    pub fn extend(&mut self, other: &InlineStyle) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize back to a `style` attribute string
    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// Two decimals are plenty for layout and keep the attribute stable across drags
fn round_px(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
