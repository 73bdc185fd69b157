use super::{destination_key, VariantResult, VariantSpec};
use crate::store::ObjectStore;
use crate::{Error, Result};
use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

const JPEG_QUALITY: u8 = 85;

/// Decodes an uploaded image and produces one resized JPEG per entry of the
/// variant table, writing each to the processed bucket.
pub struct VariantGenerator {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    specs: Vec<VariantSpec>,
}

impl VariantGenerator {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: String) -> Self {
        Self {
            store,
            bucket,
            specs: VariantSpec::defaults(),
        }
    }

    pub fn with_specs(mut self, specs: Vec<VariantSpec>) -> Self {
        self.specs = specs;
        self
    }

    pub fn specs(&self) -> &[VariantSpec] {
        &self.specs
    }

    /// Produce every variant of `image_data`, in table order.
    ///
    /// A failure on any single variant aborts the whole call; on success the
    /// returned results always cover the full table.
    pub async fn generate(
        &self,
        image_data: &[u8],
        original_key: &str,
    ) -> Result<Vec<VariantResult>> {
        let format = image::guess_format(image_data).ok();
        let image = image::load_from_memory(image_data).map_err(Error::Decode)?;

        let original_width = image.width();
        let original_height = image.height();
        info!(
            "Original image: {}x{}, format: {:?}",
            original_width, original_height, format
        );

        let mut results = Vec::with_capacity(self.specs.len());

        for spec in &self.specs {
            let (encoded, width, height) =
                Self::render_variant(image.clone(), spec.clone()).await?;

            let key = destination_key(spec.name, original_key);
            let metadata = HashMap::from([
                (
                    "original-size".to_string(),
                    format!("{}x{}", original_width, original_height),
                ),
                ("processed-size".to_string(), format!("{}x{}", width, height)),
                ("variant".to_string(), spec.name.to_string()),
                ("processed-date".to_string(), Utc::now().to_rfc3339()),
            ]);

            self.store
                .put_object(&self.bucket, &key, &encoded, "image/jpeg", &metadata)
                .await?;

            info!("Created {} variant: {}x{}", spec.name, width, height);
            results.push(VariantResult {
                variant: spec.name.to_string(),
                width,
                height,
                key,
            });
        }

        Ok(results)
    }

    async fn render_variant(
        image: DynamicImage,
        spec: VariantSpec,
    ) -> Result<(Vec<u8>, u32, u32)> {
        tokio::task::spawn_blocking(move || Self::render_variant_sync(image, &spec))
            .await
            .map_err(|e| Error::Invariant(format!("Image processing task join error: {}", e)))?
    }

    fn render_variant_sync(image: DynamicImage, spec: &VariantSpec) -> Result<(Vec<u8>, u32, u32)> {
        let resized = fit_within(flatten_onto_white(image), spec.max_width, spec.max_height);
        let width = resized.width();
        let height = resized.height();

        let mut buffer = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
        resized.write_with_encoder(encoder).map_err(Error::Encode)?;

        Ok((buffer.into_inner(), width, height))
    }
}

/// Composite images with transparency onto an opaque white background.
///
/// JPEG has no transparency, so flattening replaces silent channel loss with
/// a controlled white-background render. Opaque images pass through as-is.
fn flatten_onto_white(image: DynamicImage) -> DynamicImage {
    if !image.color().has_alpha() {
        return image;
    }

    let mut background = RgbaImage::from_pixel(
        image.width(),
        image.height(),
        Rgba([255, 255, 255, 255]),
    );
    imageops::overlay(&mut background, &image.to_rgba8(), 0, 0);
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(background).to_rgb8())
}

/// Scale `image` down so it fits within `max_width` x `max_height` while
/// preserving aspect ratio. Images already inside the box are never enlarged.
fn fit_within(image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    if image.width() <= max_width && image.height() <= max_height {
        return image;
    }
    image.resize(max_width, max_height, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockObjectStore;
    use image::ImageFormat;
    use pretty_assertions::assert_eq;

    fn png_bytes(width: u32, height: u32, pixel: Rgba<u8>) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, pixel);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn generator(store: &MockObjectStore) -> VariantGenerator {
        VariantGenerator::new(Arc::new(store.clone()), "processed-bucket".to_string())
    }

    #[tokio::test]
    async fn test_generate_covers_full_variant_table() {
        let store = MockObjectStore::new();
        let data = png_bytes(2000, 1000, Rgba([10, 120, 200, 255]));

        let results = generator(&store)
            .generate(&data, "vacation.png")
            .await
            .unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.variant.as_str()).collect();
        assert_eq!(names, vec!["thumbnail", "mobile", "web"]);
        assert_eq!(store.put_count(), 3);
    }

    #[tokio::test]
    async fn test_generate_preserves_aspect_ratio() {
        let store = MockObjectStore::new();
        let data = png_bytes(2000, 1000, Rgba([10, 120, 200, 255]));

        let results = generator(&store)
            .generate(&data, "vacation.png")
            .await
            .unwrap();

        assert_eq!((results[0].width, results[0].height), (150, 75));
        assert_eq!((results[1].width, results[1].height), (480, 240));
        assert_eq!((results[2].width, results[2].height), (1024, 512));
    }

    #[tokio::test]
    async fn test_generate_never_upscales() {
        let store = MockObjectStore::new();
        let data = png_bytes(100, 60, Rgba([0, 0, 0, 255]));

        let results = generator(&store).generate(&data, "tiny.png").await.unwrap();

        for result in &results {
            assert_eq!((result.width, result.height), (100, 60));
        }
    }

    #[tokio::test]
    async fn test_generate_writes_expected_keys_and_metadata() {
        let store = MockObjectStore::new();
        let data = png_bytes(400, 200, Rgba([50, 50, 50, 255]));

        generator(&store)
            .generate(&data, "albums/trip.png")
            .await
            .unwrap();

        let stored = store
            .stored("processed-bucket", "processed/thumbnail/albums/trip.png")
            .unwrap();
        assert_eq!(stored.content_type, "image/jpeg");
        assert_eq!(stored.metadata["original-size"], "400x200");
        assert_eq!(stored.metadata["processed-size"], "150x75");
        assert_eq!(stored.metadata["variant"], "thumbnail");
        chrono::DateTime::parse_from_rfc3339(&stored.metadata["processed-date"]).unwrap();
    }

    #[tokio::test]
    async fn test_generate_output_is_decodable_jpeg() {
        let store = MockObjectStore::new();
        let data = png_bytes(800, 600, Rgba([200, 30, 30, 255]));

        generator(&store).generate(&data, "photo.png").await.unwrap();

        let stored = store
            .stored("processed-bucket", "processed/mobile/photo.png")
            .unwrap();
        assert_eq!(
            image::guess_format(&stored.body).unwrap(),
            ImageFormat::Jpeg
        );
        let decoded = image::load_from_memory(&stored.body).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (480, 360));
    }

    #[tokio::test]
    async fn test_transparent_pixels_flatten_to_white() {
        let store = MockObjectStore::new();
        // Fully transparent source; a naive channel drop would yield black.
        let data = png_bytes(20, 20, Rgba([255, 0, 0, 0]));

        generator(&store).generate(&data, "ghost.png").await.unwrap();

        let stored = store
            .stored("processed-bucket", "processed/thumbnail/ghost.png")
            .unwrap();
        let decoded = image::load_from_memory(&stored.body).unwrap().to_rgb8();
        let pixel = decoded.get_pixel(10, 10);
        // JPEG is lossy; allow a small tolerance around pure white.
        assert!(pixel[0] > 250 && pixel[1] > 250 && pixel[2] > 250);
    }

    #[test]
    fn test_opaque_image_is_not_flattened_away() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            10,
            10,
            image::Rgb([1, 2, 3]),
        ));
        let flattened = flatten_onto_white(img);
        assert_eq!(flattened.to_rgb8().get_pixel(5, 5), &image::Rgb([1, 2, 3]));
    }

    #[tokio::test]
    async fn test_generate_rejects_non_image_bytes() {
        let store = MockObjectStore::new();

        let result = generator(&store).generate(b"not an image", "bad.txt").await;

        assert!(matches!(result, Err(Error::Decode(_))));
        assert_eq!(store.put_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_aborts_whole_call() {
        let store = MockObjectStore::new().with_put_failure(true);
        let data = png_bytes(100, 100, Rgba([0, 0, 0, 255]));

        let result = generator(&store).generate(&data, "photo.png").await;

        assert!(matches!(result, Err(Error::StoreWrite(_))));
        assert!(store.keys_in("processed-bucket").is_empty());
    }

    #[tokio::test]
    async fn test_custom_spec_table_is_honored() {
        let store = MockObjectStore::new();
        let custom = vec![VariantSpec::new("banner", 300, 100)];
        let generator = generator(&store).with_specs(custom.clone());
        assert_eq!(generator.specs(), custom.as_slice());

        let data = png_bytes(600, 600, Rgba([0, 0, 0, 255]));
        let results = generator.generate(&data, "square.png").await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].variant, "banner");
        assert_eq!((results[0].width, results[0].height), (100, 100));
        assert_eq!(results[0].key, "processed/banner/square.png");
    }

    #[test]
    fn test_fit_within_portrait_source() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(1000, 2000));
        let resized = fit_within(img, 150, 150);
        assert_eq!((resized.width(), resized.height()), (75, 150));
    }
}
