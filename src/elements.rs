//! Element listing model and JSON persistence.
//!
//! The listing is the stage 1 artifact: a structured dump of a page's
//! interactive controls, consumed verbatim by the test-case stage.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Structured dump of a web page's interactive controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementListing {
    pub source_url: String,
    pub scraped_at: DateTime<Utc>,
    pub buttons: Vec<ButtonElement>,
    pub links: Vec<LinkElement>,
    pub inputs: Vec<InputElement>,
    pub forms: Vec<FormElement>,
}

/// A `<button>` or `<input type="button">` control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonElement {
    pub text: String,
    pub id: String,
    pub class: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// An `<a>` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkElement {
    pub text: String,
    pub href: String,
    pub id: String,
    pub class: Vec<String>,
}

/// An `<input>` element that is not a button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub id: String,
    pub placeholder: String,
}

/// A `<form>` element with the type/name of each nested input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormElement {
    pub action: String,
    pub method: String,
    pub id: String,
    pub inputs: Vec<FormInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

impl ElementListing {
    /// Empty listing stamped with the source URL and the current time.
    pub fn new(source_url: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            scraped_at: Utc::now(),
            buttons: Vec::new(),
            links: Vec::new(),
            inputs: Vec::new(),
            forms: Vec::new(),
        }
    }

    /// Total number of recorded elements across all four classes.
    pub fn len(&self) -> usize {
        self.buttons.len() + self.links.len() + self.inputs.len() + self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the listing as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Read a listing written by [`ElementListing::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Element listing not found at {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed element listing at {}", path.display()))
    }
}
