//! JSON loading, saving and pretty-printing of annotation documents.

use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::AnnotationDocument;

/// Load an annotation document from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// document has no `images` list.
///
/// # Example
///
/// ```no_run
/// use axle_eval::loader::load_from_file;
///
/// let document = load_from_file("annotations.json").unwrap();
/// println!("Loaded {} images", document.images().unwrap().len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<AnnotationDocument> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let document: AnnotationDocument = serde_json::from_reader(reader)?;

    validate_document(&document)?;
    log::debug!("loaded {} image(s) from {}", image_count(&document), path.display());

    Ok(document)
}

/// Load an annotation document from a JSON string.
///
/// # Example
///
/// ```
/// use axle_eval::loader::load_from_string;
///
/// let json = r#"{
///     "images": [
///         {
///             "location": "truck.jpg",
///             "annotated_regions": [
///                 {
///                     "tags": ["single_axle"],
///                     "region_type": "Box",
///                     "region": {"xmin": 10, "ymin": 20, "xmax": 30, "ymax": 40}
///                 }
///             ]
///         }
///     ]
/// }"#;
/// let document = load_from_string(json).unwrap();
/// assert_eq!(document.images().unwrap()[0].annotated_regions[0].bbox().unwrap().xmax, 30.0);
/// ```
pub fn load_from_string(json_str: &str) -> Result<AnnotationDocument> {
    let document: AnnotationDocument = serde_json::from_str(json_str)?;
    validate_document(&document)?;
    Ok(document)
}

/// Save a document to a JSON file in compact form.
pub fn save_to_file<P: AsRef<Path>>(document: &AnnotationDocument, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, document)?;
    writer.flush()?;
    log::debug!("saved {} image(s) to {}", image_count(document), path.display());
    Ok(())
}

/// Render any serializable value as 4-space indented JSON with sorted keys.
pub fn to_pretty_string<T: Serialize>(value: &T) -> Result<String> {
    // serde_json's default `Map` is ordered by key.
    let value = serde_json::to_value(value)?;

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Only the top-level image list is checked; region corners are read, and
/// checked, where an engine uses them.
fn validate_document(document: &AnnotationDocument) -> Result<()> {
    document.images()?;
    Ok(())
}

fn image_count(document: &AnnotationDocument) -> usize {
    document.images.as_ref().map_or(0, Vec::len)
}
