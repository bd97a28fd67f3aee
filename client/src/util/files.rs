//! File-input helpers.
//!
//! Browser files are read fully into memory as [`Attachment`]s when picked;
//! the documents involved are a few megabytes at most.

#[cfg(test)]
#[path = "files_test.rs"]
mod files_test;

use portal::attachment::{Attachment, content_type_for};

/// Short description shown next to a file input, e.g. `sheet.pdf (1.5 MB)`.
#[must_use]
pub fn describe(file: &Attachment) -> String {
    format!("{} ({})", file.file_name, human_size(file.size))
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// The browser's MIME type, or a guess from the extension when it is blank.
#[must_use]
pub fn resolve_content_type(file_name: &str, reported: &str) -> String {
    if reported.trim().is_empty() { content_type_for(file_name).to_owned() } else { reported.to_owned() }
}

/// Read the first selected file of an `<input type="file">`.
#[cfg(feature = "hydrate")]
pub async fn read_input_file(input: &web_sys::HtmlInputElement) -> Option<Attachment> {
    let file = input.files()?.get(0)?;
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await.ok()?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    let name = file.name();
    let content_type = resolve_content_type(&name, &file.type_());
    Some(Attachment::new(name, content_type, bytes))
}
