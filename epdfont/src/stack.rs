//! An ordered list of faces with per code point fallback.

use crate::face::{Face, RasterizedGlyph};

/// Faces consulted in priority order.
///
/// The first face that maps a code point to a non-zero glyph is the only
/// face asked to render it; when that rendering fails the code point is
/// absent, later faces are not tried.
#[derive(Clone, Debug, Default)]
pub struct FontStack<F> {
    faces: Vec<F>,
}

impl<F: Face> FontStack<F> {
    pub fn new(faces: Vec<F>) -> Self {
        Self { faces }
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn faces(&self) -> &[F] {
        &self.faces
    }

    pub fn set_pixel_size(&mut self, size_px: u32) {
        for face in &mut self.faces {
            face.set_pixel_size(size_px);
        }
    }

    /// Index of the first face that maps `code_point`.
    pub fn face_for(&self, code_point: u32) -> Option<usize> {
        self.faces
            .iter()
            .position(|face| face.glyph_index(code_point) != 0)
    }

    /// Render `code_point` with the first face that maps it, returning the
    /// index of that face along with the glyph.
    pub fn resolve(&mut self, code_point: u32) -> Option<(usize, RasterizedGlyph)> {
        let index = self.face_for(code_point)?;
        let face = &mut self.faces[index];
        let glyph_index = face.glyph_index(code_point);
        match face.rasterize(glyph_index) {
            Some(glyph) => Some((index, glyph)),
            None => {
                log::warn!("U+{code_point:04X} maps to glyph {glyph_index} in face {index} but did not render");
                None
            }
        }
    }

    /// The face whose vertical metrics describe the stack: the one that
    /// renders `|`, falling back to the first face when `|` does not resolve.
    pub fn reference_face(&mut self) -> Option<&F> {
        let index = self.resolve('|' as u32).map_or(0, |(index, _)| index);
        self.faces.get(index)
    }
}
