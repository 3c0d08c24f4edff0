use image::{Rgba, RgbaImage};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::theme::Theme;

use super::input::Point;

/// The surface's backing pixels.
///
/// The pixmap is `ratio` times larger than the logical size, and every drawing operation is scaled
/// by `ratio`, so callers work in logical pixels only.
pub(crate) struct Raster {
   pixmap: Pixmap,
   ratio: f32,
   theme: Theme,
   /// The stroke being drawn, if any.
   stroke: Option<PenStroke>,
}

/// A stroke in progress. The whole path is stroked again over `base` on every new point, so joins
/// between segments are blended once, like a single canvas path.
struct PenStroke {
   path: PathBuilder,
   /// The pixels as they were when the stroke began.
   base: Pixmap,
}

impl Raster {
   pub(crate) const LINE_WIDTH: f32 = 2.0;

   /// Allocates a raster for the given logical size and pixel ratio, filled with the theme's paper
   /// color. Returns `None` if a pixmap of that size cannot be created.
   pub(crate) fn new(width: u32, height: u32, ratio: f32, theme: Theme) -> Option<Self> {
      let (physical_width, physical_height) = Self::physical_size(width, height, ratio)?;
      let pixmap = Pixmap::new(physical_width, physical_height)?;
      let mut raster = Self {
         pixmap,
         ratio,
         theme,
         stroke: None,
      };
      raster.fill_paper();
      Some(raster)
   }

   fn physical_size(width: u32, height: u32, ratio: f32) -> Option<(u32, u32)> {
      let scale = |size: u32| {
         let scaled = (size as f64 * ratio as f64).floor();
         (scaled >= 1.0 && scaled <= u32::MAX as f64).then(|| scaled as u32)
      };
      Some((scale(width)?, scale(height)?))
   }

   /// The size of the pixmap in physical pixels.
   pub(crate) fn size(&self) -> (u32, u32) {
      (self.pixmap.width(), self.pixmap.height())
   }

   pub(crate) fn fill_paper(&mut self) {
      self.pixmap.fill(self.theme.paper);
   }

   pub(crate) fn begin_path(&mut self, point: Point) {
      let mut path = PathBuilder::new();
      path.move_to(point.x, point.y);
      self.stroke = Some(PenStroke {
         path,
         base: self.pixmap.clone(),
      });
   }

   /// Extends the path to `point` and redraws it. Does nothing if no path has been begun.
   pub(crate) fn line_to(&mut self, point: Point) {
      let stroke = match self.stroke.as_mut() {
         Some(stroke) => stroke,
         None => return,
      };
      stroke.path.line_to(point.x, point.y);
      let path = match stroke.path.clone().finish() {
         Some(path) => path,
         None => return,
      };

      let mut paint = Paint::default();
      paint.set_color(self.theme.ink);
      paint.anti_alias = true;

      let style = Stroke {
         width: Self::LINE_WIDTH,
         line_cap: LineCap::Round,
         line_join: LineJoin::Round,
         ..Default::default()
      };

      self.pixmap.data_mut().copy_from_slice(stroke.base.data());
      self.pixmap.stroke_path(
         &path,
         &paint,
         &style,
         Transform::from_scale(self.ratio, self.ratio),
         None,
      );
   }

   /// Ends the path in progress, keeping what was drawn of it.
   pub(crate) fn close_path(&mut self) {
      self.stroke = None;
   }

   /// Forgets the path in progress without drawing anything more of it.
   pub(crate) fn abandon_path(&mut self) {
      self.stroke = None;
   }

   /// Copies the pixels out as a straight-alpha RGBA image at physical size.
   pub(crate) fn download_rgba(&self) -> RgbaImage {
      let (width, height) = self.size();
      let mut image = RgbaImage::new(width, height);
      for (dest, pixel) in image.pixels_mut().zip(self.pixmap.pixels()) {
         let color = pixel.demultiply();
         *dest = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
      }
      image
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   fn ink_pixels(raster: &Raster) -> usize {
      raster.download_rgba().pixels().filter(|p| p.0 != [255, 255, 255, 255]).count()
   }

   #[test]
   fn new_raster_is_scaled_and_filled_with_paper() {
      let raster = Raster::new(40, 20, 2.0, Theme::default()).unwrap();
      assert_eq!(raster.size(), (80, 40));
      assert_eq!(ink_pixels(&raster), 0);
   }

   #[test]
   fn fractional_ratios_round_down() {
      let raster = Raster::new(10, 10, 1.5, Theme::default()).unwrap();
      assert_eq!(raster.size(), (15, 15));
      let raster = Raster::new(3, 3, 1.3, Theme::default()).unwrap();
      assert_eq!(raster.size(), (3, 3));
   }

   #[test]
   fn segments_leave_ink_in_logical_space() {
      let mut raster = Raster::new(40, 40, 2.0, Theme::default()).unwrap();
      raster.begin_path(Point::new(5.0, 20.0));
      raster.line_to(Point::new(35.0, 20.0));
      let image = raster.download_rgba();
      // The middle of the stroke lies at physical (40, 40) with a ratio of 2.
      assert_eq!(image.get_pixel(40, 40).0, [0, 0, 0, 255]);
      assert_eq!(image.get_pixel(40, 10).0, [255, 255, 255, 255]);
   }

   #[test]
   fn line_without_begin_draws_nothing() {
      let mut raster = Raster::new(20, 20, 1.0, Theme::default()).unwrap();
      raster.line_to(Point::new(10.0, 10.0));
      assert_eq!(ink_pixels(&raster), 0);
   }

   #[test]
   fn out_of_bounds_segments_are_clipped() {
      let mut raster = Raster::new(20, 20, 1.0, Theme::default()).unwrap();
      raster.begin_path(Point::new(-100.0, -100.0));
      raster.line_to(Point::new(-50.0, -80.0));
      assert_eq!(ink_pixels(&raster), 0);
   }

   #[test]
   fn joined_segments_match_one_continuous_stroke() {
      let points = [Point::new(5.0, 5.0), Point::new(30.0, 8.0), Point::new(12.0, 35.0)];
      let mut raster = Raster::new(40, 40, 1.0, Theme::default()).unwrap();
      raster.begin_path(points[0]);
      for &point in &points[1..] {
         raster.line_to(point);
      }
      raster.close_path();

      let mut expected = Pixmap::new(40, 40).unwrap();
      expected.fill(tiny_skia::Color::WHITE);
      let mut path = PathBuilder::new();
      path.move_to(points[0].x, points[0].y);
      for point in &points[1..] {
         path.line_to(point.x, point.y);
      }
      let mut paint = Paint::default();
      paint.set_color(tiny_skia::Color::BLACK);
      paint.anti_alias = true;
      let stroke = Stroke {
         width: Raster::LINE_WIDTH,
         line_cap: LineCap::Round,
         line_join: LineJoin::Round,
         ..Default::default()
      };
      expected.stroke_path(&path.finish().unwrap(), &paint, &stroke, Transform::identity(), None);

      assert_eq!(raster.pixmap.data(), expected.data());
   }

   #[test]
   fn earlier_strokes_survive_the_next_one() {
      let mut raster = Raster::new(40, 40, 1.0, Theme::default()).unwrap();
      raster.begin_path(Point::new(5.0, 10.0));
      raster.line_to(Point::new(35.0, 10.0));
      raster.close_path();
      raster.begin_path(Point::new(5.0, 30.0));
      raster.line_to(Point::new(35.0, 30.0));

      let image = raster.download_rgba();
      assert_eq!(image.get_pixel(20, 10).0, [0, 0, 0, 255]);
      assert_eq!(image.get_pixel(20, 30).0, [0, 0, 0, 255]);
   }

   #[test]
   fn theme_colors_are_used_for_paper_and_ink() {
      let theme = Theme {
         ink: tiny_skia::Color::from_rgba8(200, 30, 40, 255),
         paper: tiny_skia::Color::from_rgba8(2, 8, 23, 255),
      };
      let mut raster = Raster::new(40, 40, 1.0, theme).unwrap();
      raster.begin_path(Point::new(5.0, 20.0));
      raster.line_to(Point::new(35.0, 20.0));

      let image = raster.download_rgba();
      assert_eq!(image.get_pixel(0, 0).0, [2, 8, 23, 255]);
      assert_eq!(image.get_pixel(20, 20).0, [200, 30, 40, 255]);
   }

   #[test]
   fn unallocatable_sizes_yield_none() {
      assert!(Raster::new(0, 10, 1.0, Theme::default()).is_none());
      assert!(Raster::new(600_000_000, 1, 1.0, Theme::default()).is_none());
   }
}
