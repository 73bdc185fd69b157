//! Image variant generation
//!
//! Produces the fixed set of resized JPEG derivatives for an uploaded image
//! and persists them under `processed/<variant>/<original-key>`.

pub mod generator;

pub use generator::VariantGenerator;

/// One entry of the fixed variant table: a name and the bounding box the
/// resized image must fit within.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    pub name: &'static str,
    pub max_width: u32,
    pub max_height: u32,
}

impl VariantSpec {
    pub const fn new(name: &'static str, max_width: u32, max_height: u32) -> Self {
        Self {
            name,
            max_width,
            max_height,
        }
    }

    /// The process-wide variant table, in the order variants are produced.
    pub fn defaults() -> Vec<VariantSpec> {
        vec![
            VariantSpec::new("thumbnail", 150, 150),
            VariantSpec::new("mobile", 480, 480),
            VariantSpec::new("web", 1024, 1024),
        ]
    }
}

/// Outcome of resizing one source image against one [`VariantSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantResult {
    pub variant: String,
    pub width: u32,
    pub height: u32,
    pub key: String,
}

/// Destination key for variant `variant` of `original_key`.
pub fn destination_key(variant: &str, original_key: &str) -> String {
    format!("processed/{}/{}", variant, original_key)
}
