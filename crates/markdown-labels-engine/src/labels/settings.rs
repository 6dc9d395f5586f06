use serde::{Deserialize, Serialize};

/// How list labels are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// Label text is computed here and inserted into the document.
    #[default]
    Text,
    /// Lists get CSS counter rules; headings are still labelled as text.
    Css,
}

/// Default templates applied where no directive says otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Template for headings at `h_level`.
    pub h_labels: Option<String>,
    pub h_level: u8,
    /// Template for top-level ordered lists.
    pub ol_labels: Option<String>,
    /// Template for top-level unordered lists.
    pub ul_labels: Option<String>,
    pub mode: LabelMode,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            h_labels: None,
            h_level: 1,
            ol_labels: None,
            ul_labels: None,
            mode: LabelMode::default(),
        }
    }
}
