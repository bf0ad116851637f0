//! Image-to-text seam.
//!
//! Extraction only ever sees text; anything that can read a prescription
//! image implements [`TextRecognizer`].

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use tracing::debug;

use crate::error::OcrError;
use crate::extraction::{ExtractionResult, MedicineExtractor};

/// Something that turns an image into raw text.
pub trait TextRecognizer {
    /// Recognize all text in `image`, lines separated by `\n`.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// Run OCR on `image` and extract medicine names from the recognized text.
pub fn extract_from_image(
    recognizer: &dyn TextRecognizer,
    extractor: &dyn MedicineExtractor,
    image: &DynamicImage,
) -> Result<ExtractionResult, OcrError> {
    let text = recognizer.recognize(image)?;
    debug!("OCR produced {} characters", text.len());
    Ok(extractor.extract(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::TieredExtractor;
    use pretty_assertions::assert_eq;

    struct FixedText(&'static str);

    impl TextRecognizer for FixedText {
        fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    struct Broken;

    impl TextRecognizer for Broken {
        fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
            Err(OcrError::Recognition("no model".to_string()))
        }
    }

    #[test]
    fn test_extract_from_image() {
        let image = DynamicImage::new_rgb8(8, 8);
        let result = extract_from_image(
            &FixedText("Tab. Lisinopril 10 mg\nOD"),
            &TieredExtractor::new(),
            &image,
        )
        .unwrap();

        assert_eq!(result.medicines, vec!["lisinopril"]);
    }

    #[test]
    fn test_extract_from_image_propagates_ocr_failure() {
        let image = DynamicImage::new_rgb8(8, 8);
        assert!(extract_from_image(&Broken, &TieredExtractor::new(), &image).is_err());
    }
}
