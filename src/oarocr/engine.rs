//! [`OcrEngine`] implementation backed by the oar-ocr detection and recognition models.

use crate::core::errors::OcrEngineError;
use crate::core::traits::OcrEngine;
use crate::oarocr::RecognizedLine;
use crate::processors::{BoundingBox, Point};
use image::RgbImage;
use oar_ocr::core::config::OrtSessionConfig;
use oar_ocr::oarocr::{OAROCR, OAROCRBuilder, OAROCRResult};
use std::path::PathBuf;

/// Model files and device of an [`OarOcrEngine`].
#[derive(Debug, Clone)]
pub struct OcrModelConfig {
    pub det_model: PathBuf,
    pub rec_model: PathBuf,
    pub dict_path: PathBuf,
    pub device: String,
}

/// Text detection and recognition over a single page image.
pub struct OarOcrEngine {
    ocr: OAROCR,
}

impl OarOcrEngine {
    /// Create a new OCR engine with the given configuration
    pub fn new(config: &OcrModelConfig) -> Result<Self, OcrEngineError> {
        // Validate model files exist
        if !config.det_model.exists() {
            return Err(OcrEngineError::ModelNotFound(format!(
                "Detection model not found: {}",
                config.det_model.display()
            )));
        }
        if !config.rec_model.exists() {
            return Err(OcrEngineError::ModelNotFound(format!(
                "Recognition model not found: {}",
                config.rec_model.display()
            )));
        }
        if !config.dict_path.exists() {
            return Err(OcrEngineError::ModelNotFound(format!(
                "Dictionary file not found: {}",
                config.dict_path.display()
            )));
        }

        let ort_config = parse_device_config(&config.device)?;

        let mut builder =
            OAROCRBuilder::new(&config.det_model, &config.rec_model, &config.dict_path);

        if let Some(config) = ort_config {
            builder = builder.ort_session(config);
        }

        let ocr = builder
            .build()
            .map_err(|e| OcrEngineError::Config(e.to_string()))?;

        Ok(Self { ocr })
    }
}

impl OcrEngine for OarOcrEngine {
    fn recognize(&self, page: &RgbImage) -> Result<Vec<RecognizedLine>, OcrEngineError> {
        let result = self
            .ocr
            .predict(vec![page.clone()])
            .map_err(|e| OcrEngineError::Recognition(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| OcrEngineError::Recognition("No results returned".to_string()))?;

        Ok(recognized_lines(&result))
    }

    fn name(&self) -> &str {
        "oar-ocr"
    }
}

/// Regions without recognized text are skipped.
fn recognized_lines(result: &OAROCRResult) -> Vec<RecognizedLine> {
    result
        .text_regions
        .iter()
        .filter_map(|region| {
            let text = region.text.as_ref()?;
            let points = region
                .bounding_box
                .points
                .iter()
                .map(|p| Point::new(p.x, p.y))
                .collect();
            Some(RecognizedLine::new(
                text.to_string(),
                BoundingBox::new(points),
                region.confidence.unwrap_or(0.0),
            ))
        })
        .collect()
}

/// Parse device string and create OrtSessionConfig
///
/// Only the CPU execution provider is available to this crate.
fn parse_device_config(device: &str) -> Result<Option<OrtSessionConfig>, OcrEngineError> {
    let device_lower = device.to_lowercase();

    if device_lower == "cpu" {
        return Ok(None);
    }

    if device_lower.starts_with("cuda") {
        return Err(OcrEngineError::Config(format!(
            "CUDA device '{}' requested but only the CPU device is supported",
            device
        )));
    }

    Err(OcrEngineError::Config(format!("Unsupported device: {}", device)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_config() {
        assert!(parse_device_config("cpu").unwrap().is_none());
        assert!(parse_device_config("CPU").unwrap().is_none());
        assert!(matches!(
            parse_device_config("cuda:0"),
            Err(OcrEngineError::Config(_))
        ));
        assert!(matches!(
            parse_device_config("tpu"),
            Err(OcrEngineError::Config(_))
        ));
    }

    #[test]
    fn test_missing_model_is_reported() {
        let config = OcrModelConfig {
            det_model: PathBuf::from("/nonexistent/det.onnx"),
            rec_model: PathBuf::from("/nonexistent/rec.onnx"),
            dict_path: PathBuf::from("/nonexistent/dict.txt"),
            device: "cpu".to_string(),
        };

        match OarOcrEngine::new(&config) {
            Err(OcrEngineError::ModelNotFound(message)) => {
                assert!(message.contains("Detection model not found"), "{message}");
            }
            Err(other) => panic!("Expected ModelNotFound, got {other:?}"),
            Ok(_) => panic!("Expected ModelNotFound, got an engine"),
        }
    }
}
