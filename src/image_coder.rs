use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};

pub struct ImageCoder;

impl ImageCoder {
   /// The prefix of every data URL produced by [`ImageCoder::encode_data_url`].
   pub const PNG_DATA_URL_PREFIX: &'static str = "data:image/png;base64,";

   /// Encodes an image to PNG data.
   pub fn encode_png_data(image: &RgbaImage) -> crate::Result<Vec<u8>> {
      let mut bytes: Vec<u8> = Vec::new();
      match PngEncoder::new(Cursor::new(&mut bytes)).write_image(
         image,
         image.width(),
         image.height(),
         ColorType::Rgba8,
      ) {
         Ok(()) => (),
         Err(error) => {
            log::error!("error while encoding: {}", error);
            return Err(error.into());
         }
      }
      Ok(bytes)
   }

   /// Encodes an image to a base64 PNG data URL.
   pub fn encode_data_url(image: &RgbaImage) -> crate::Result<String> {
      let png = Self::encode_png_data(image)?;
      Ok(format!("{}{}", Self::PNG_DATA_URL_PREFIX, base64::encode(&png)))
   }
}
