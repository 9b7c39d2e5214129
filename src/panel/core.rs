use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;

use crate::error::{LatticeError, Result};

/// Common representation of one renderable map widget.
///
/// The payload is owned by the caller and treated as opaque; the normalizer
/// only ever attaches an element id, never touches the content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapWidget {
    pub element_id: Option<String>,
    pub content: Value,
}

impl MapWidget {
    pub fn new(content: Value) -> Self {
        Self {
            element_id: None,
            content,
        }
    }

    pub fn with_id(id: impl Into<String>, content: Value) -> Self {
        Self {
            element_id: Some(id.into()),
            content,
        }
    }
}

/// Conversion seam for inputs arriving in alternate compatible forms.
///
/// Higher-level wrappers around the base widget implement this to opt into
/// lattice composition; the conversion itself is the caller's concern.
pub trait IntoMapWidget {
    fn into_map_widget(self) -> MapWidget;
}

impl IntoMapWidget for MapWidget {
    fn into_map_widget(self) -> MapWidget {
        self
    }
}

impl IntoMapWidget for Value {
    fn into_map_widget(self) -> MapWidget {
        MapWidget::new(self)
    }
}

/// One widget placed in the lattice, addressable by input-order index and by
/// unique element id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelDescriptor {
    pub index: usize,
    pub id: String,
    pub content: Value,
}

/// Ordered, uniquely identified panel collection for a single invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PanelSet {
    panels: Vec<PanelDescriptor>,
}

impl PanelSet {
    /// Normalize an arbitrary collection of widget-like inputs.
    ///
    /// Every widget lacking an element id receives a generated token, unique
    /// within the process. Caller-supplied ids are kept verbatim; a duplicate
    /// among them is a configuration error since the runtime registry keys
    /// instances by id.
    pub fn from_widgets<I, W>(widgets: I) -> Result<Self>
    where
        I: IntoIterator<Item = W>,
        W: IntoMapWidget,
    {
        let mut seen = HashSet::new();
        let mut panels = Vec::new();
        for (index, widget) in widgets.into_iter().enumerate() {
            let widget = widget.into_map_widget();
            let id = widget.element_id.unwrap_or_else(next_panel_id);
            if !seen.insert(id.clone()) {
                return Err(LatticeError::DuplicatePanelId(id));
            }
            panels.push(PanelDescriptor {
                index,
                id,
                content: widget.content,
            });
        }
        Ok(Self { panels })
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PanelDescriptor> {
        self.panels.iter()
    }

    pub fn id_of(&self, index: usize) -> Option<&str> {
        self.panels.get(index).map(|panel| panel.id.as_str())
    }

    pub fn ids(&self) -> Vec<String> {
        self.panels.iter().map(|panel| panel.id.clone()).collect()
    }

    pub fn into_panels(self) -> Vec<PanelDescriptor> {
        self.panels
    }
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate an opaque element id, unique within the process.
///
/// The monotonic counter guarantees uniqueness; hashing it keeps the token
/// opaque so callers cannot read input order out of the id.
fn next_panel_id() -> String {
    let token = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let digest = blake3::hash(&token.to_le_bytes());
    let hex = digest.to_hex();
    format!("map-{}", &hex.as_str()[..12])
}
