mod termcolor;

pub use termcolor::RenderTermcolor;

use crate::types::Builder;

/// Render a document without colors into the given buffer.
pub fn render_plain(doc: &Builder<'_>, width: usize, buf: &mut Vec<u8>) {
    doc.1.render(width, buf).expect("Failed to render document");
}
