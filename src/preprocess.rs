use image::imageops::{self, FilterType};
use ndarray::Array4;

use crate::errors::ServiceError;

pub const INPUT_SIZE: u32 = 48;
pub const INPUT_SHAPE: [usize; 4] = [1, INPUT_SIZE as usize, INPUT_SIZE as usize, 1];

/// Turns encoded image bytes into the NHWC tensor the model expects:
/// grayscale, 48x48, intensities scaled to [0, 1].
pub fn preprocess(bytes: &[u8]) -> Result<Array4<f32>, ServiceError> {
    if bytes.is_empty() {
        return Err(ServiceError::Decode("empty upload".to_string()));
    }

    let img = image::load_from_memory(bytes)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(ServiceError::Decode(format!(
            "image has no pixels ({}x{})",
            img.width(),
            img.height()
        )));
    }

    let gray = img.to_luma8();
    let resized = imageops::resize(&gray, INPUT_SIZE, INPUT_SIZE, FilterType::CatmullRom);

    let tensor = Array4::from_shape_fn(
        (INPUT_SHAPE[0], INPUT_SHAPE[1], INPUT_SHAPE[2], INPUT_SHAPE[3]),
        |(_, y, x, _)| f32::from(resized[(x as u32, y as u32)][0]) / 255.0,
    );

    Ok(tensor)
}
