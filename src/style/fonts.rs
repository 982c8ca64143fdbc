use std::collections::HashMap;

/// Maps LRF font face names to CSS `font-family` values.
///
/// The defaults cover the three faces built into the PRS-500 reader.
/// Faces not in the map fall back to [`fallback`](Self::fallback).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFaceMap {
    faces: HashMap<String, String>,
    fallback: String,
}

impl Default for FontFaceMap {
    fn default() -> Self {
        let mut map = Self::empty("serif");
        map.insert("Dutch801 Rm BT Roman", "serif");
        map.insert("Swis721 BT Roman", "sans-serif");
        map.insert("Courier10 BT Roman", "monospace");
        map
    }
}

impl FontFaceMap {
    /// A map with no faces that resolves everything to `fallback`.
    pub fn empty(fallback: impl Into<String>) -> Self {
        Self {
            faces: HashMap::new(),
            fallback: fallback.into(),
        }
    }

    pub fn insert(&mut self, face: impl Into<String>, family: impl Into<String>) {
        self.faces.insert(face.into(), family.into());
    }

    pub fn set_fallback(&mut self, family: impl Into<String>) {
        self.fallback = family.into();
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn family(&self, face: &str) -> &str {
        self.faces.get(face).map_or(&self.fallback, String::as_str)
    }
}
