//! Menu configuration documents.
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::open_state::FocusTiming;
use crate::policy::{BlurPolicy, HoverPolicy, MenuVariant, VariantPolicy};

/// Per-field overrides applied on top of the variant preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<HoverPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<BlurPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escape_cancels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_notifies: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_focus: Option<FocusTiming>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_from_none: Option<bool>,
}

impl PolicyOverrides {
    #[must_use]
    pub fn apply(&self, mut policy: VariantPolicy) -> VariantPolicy {
        if let Some(hover) = self.hover {
            policy.hover = hover;
        }
        if let Some(blur) = self.blur {
            policy.blur = blur;
        }
        if let Some(escape_cancels) = self.escape_cancels {
            policy.escape_cancels = escape_cancels;
        }
        if let Some(focus_notifies) = self.focus_notifies {
            policy.focus_notifies = focus_notifies;
        }
        if let Some(open_focus) = self.open_focus {
            policy.open_focus = open_focus;
        }
        if let Some(down_from_none) = self.down_from_none {
            policy.down_from_none = down_from_none;
        }
        policy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuConfig {
    #[serde(default)]
    pub variant: MenuVariant,
    #[serde(default)]
    pub overrides: PolicyOverrides,
    /// The controller commits focus itself before notifying `focus-item`.
    /// When `false`, navigation only reports intent and the host commits it.
    #[serde(default = "MenuConfig::default_commit_focus")]
    pub commit_focus: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            variant: MenuVariant::default(),
            overrides: PolicyOverrides::default(),
            commit_focus: Self::default_commit_focus(),
        }
    }
}

impl MenuConfig {
    const fn default_commit_focus() -> bool {
        true
    }

    #[must_use]
    pub fn for_variant(variant: MenuVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Parse a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Resolved policy: variant preset plus overrides.
    #[must_use]
    pub fn policy(&self) -> VariantPolicy {
        self.overrides.apply(self.variant.policy())
    }
}
