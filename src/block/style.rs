use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Overrides applied while the pointer hovers a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HoverStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

/// Presentation overrides for a block.
///
/// Orthogonal to content: only the preview uses it, Markdown export never
/// looks at it. `None` means "inherit".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<HoverStyle>,
    /// Per-breakpoint overrides, keyed by breakpoint name ("mobile", "tablet").
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responsive: BTreeMap<String, Self>,
}

macro_rules! merge_fields {
    ($target:expr, $patch:expr, $($field:ident),* $(,)?) => {
        $(
            if $patch.$field.is_some() {
                $target.$field.clone_from(&$patch.$field);
            }
        )*
    };
}

impl Style {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow merge: every field set in `patch` overwrites this style.
    ///
    /// Hover overrides are replaced as a whole; responsive entries are
    /// replaced per breakpoint.
    pub fn merge(&mut self, patch: &Self) {
        merge_fields!(
            self,
            patch,
            color,
            background_color,
            font_size,
            font_weight,
            text_align,
            width,
            height,
            padding,
            margin,
            border,
            border_radius,
            opacity,
            class_name,
            hover,
        );
        for (breakpoint, style) in &patch.responsive {
            self.responsive.insert(breakpoint.clone(), style.clone());
        }
    }
}
