use serde::{Deserialize, Serialize};

/// A named alternative look for a speaker (expression, pose, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualVariant {
    pub name: String,
    /// Opaque asset handle understood by the renderer (path, atlas key, ...).
    pub asset: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub name: String,
    #[serde(default = "default_has_portrait")]
    pub has_portrait: bool,
    #[serde(default)]
    pub variants: Vec<VisualVariant>,
}

fn default_has_portrait() -> bool {
    true
}

impl Speaker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            has_portrait: true,
            variants: Vec::new(),
        }
    }

    pub fn with_variant(mut self, name: impl Into<String>, asset: impl Into<String>) -> Self {
        self.variants.push(VisualVariant {
            name: name.into(),
            asset: asset.into(),
        });
        self
    }

    pub fn without_portrait(mut self) -> Self {
        self.has_portrait = false;
        self
    }
}

/// What the renderer receives for a resolved portrait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualVariantRef {
    pub speaker: String,
    pub variant: String,
    pub asset: String,
}

impl VisualVariantRef {
    pub fn of(speaker: &Speaker, variant: &VisualVariant) -> Self {
        Self {
            speaker: speaker.name.clone(),
            variant: variant.name.clone(),
            asset: variant.asset.clone(),
        }
    }
}
