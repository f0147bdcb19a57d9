use crate::frame::FrameContext;

/// Drawable layer consumed by the frame drawing pipeline
///
/// Layers receive the frame context for exactly one `render` call per frame
/// and must not retain it past that call. A layer that needs a resource that
/// is not ready yet calls [`FrameContext::request_render`] and draws what it
/// can; the host schedules a follow-up frame.
pub trait Layer {
    /// Human-readable name for debugging
    fn display_name(&self) -> &str {
        "Layer"
    }

    /// Disabled layers are skipped by the drawing pipeline
    fn is_enabled(&self) -> bool {
        true
    }

    /// Draw this layer's contribution to the current frame
    fn render(&self, context: &mut FrameContext);
}

/// Ordered collection of layers; position in the list is paint order
#[derive(Default)]
pub struct LayerList {
    layers: Vec<Box<dyn Layer>>,
}

impl LayerList {
    /// Create an empty layer list
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Append a layer, painting it above all existing layers
    pub fn add(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    /// Insert a layer at the given paint position
    ///
    /// # Panics
    /// Panics if `index > len`, matching `Vec::insert`.
    pub fn insert(&mut self, index: usize, layer: Box<dyn Layer>) {
        self.layers.insert(index, layer);
    }

    /// Remove and return the layer at the given position, if any
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn Layer>> {
        if index < self.layers.len() {
            Some(self.layers.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&dyn Layer> {
        self.layers.get(index).map(|layer| &**layer)
    }

    /// Iterate layers in paint order (first = bottom)
    pub fn iter(&self) -> impl Iterator<Item = &dyn Layer> {
        self.layers.iter().map(|layer| &**layer)
    }
}
