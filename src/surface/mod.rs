//! The signature surface: a freehand drawing area that reports its contents as a single string.
//!
//! The surface is driven by input events from its host. It keeps track of whether anything has
//! been drawn and reports through its change callback:
//!
//! - an empty string when it is mounted, cleared, or re-initialized after a size change,
//! - a `data:image/png;base64,...` URL of its pixels whenever a stroke ends and something has been
//!   drawn, or an empty string if nothing has.
//!
//! If the backing raster cannot be allocated, the surface is inert: every operation is a no-op and
//! the callback is never called.

mod input;
mod machine;
mod raster;

use image::RgbaImage;

use crate::image_coder::ImageCoder;
use crate::theme::Theme;
use crate::Error;

pub use self::input::{InputEvent, Layout, Point};
use self::input::Gesture;
use self::machine::{Action, Effect, Emission, State};
use self::raster::Raster;

/// Size and density of a signature surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceOptions {
   /// Logical width in pixels.
   pub width: u32,
   /// Logical height in pixels.
   pub height: u32,
   /// Physical pixels per logical pixel. Values below 1 are treated as 1.
   pub pixel_ratio: f32,
}

impl Default for SurfaceOptions {
   fn default() -> Self {
      Self {
         width: 400,
         height: 200,
         pixel_ratio: 1.0,
      }
   }
}

/// What the host should do with an input event after the surface has handled it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventResponse {
   /// Suppress the platform's default action (scrolling and panning) for this event.
   pub prevent_default: bool,
}

pub type ChangeCallback = Box<dyn FnMut(String)>;

pub struct SignatureSurface {
   width: u32,
   height: u32,
   pixel_ratio: f32,
   theme: Theme,
   raster: Option<Raster>,
   state: State,
   /// The encoded raster, kept until the pixels change.
   snapshot: Option<String>,
   on_change: ChangeCallback,
}

impl SignatureSurface {
   /// Mounts a new surface. The theme is captured once; a theme change requires a new surface.
   ///
   /// Reports an empty value through `on_change` right away, unless the raster could not be
   /// allocated.
   pub fn new(
      options: SurfaceOptions,
      theme: Theme,
      on_change: impl FnMut(String) + 'static,
   ) -> crate::Result<Self> {
      check_size(options.width, options.height)?;
      let pixel_ratio = if options.pixel_ratio.is_finite() {
         options.pixel_ratio.max(1.0)
      } else {
         1.0
      };

      let raster = Raster::new(options.width, options.height, pixel_ratio, theme);
      match &raster {
         Some(raster) => log::info!(
            "mounted {}x{} signature surface ({}x{} physical)",
            options.width,
            options.height,
            raster.size().0,
            raster.size().1
         ),
         None => log::warn!(
            "cannot allocate a {}x{} raster at ratio {}, signature surface is disabled",
            options.width,
            options.height,
            pixel_ratio
         ),
      }

      let mut surface = Self {
         width: options.width,
         height: options.height,
         pixel_ratio,
         theme,
         raster,
         state: State::default(),
         snapshot: None,
         on_change: Box::new(on_change),
      };
      surface.run(Effect::Emit(Emission::Empty));
      Ok(surface)
   }

   /// Feeds an input event to the surface. `layout` is asked for the surface's current position so
   /// that client coordinates can be made local.
   pub fn handle_event(&mut self, event: &InputEvent, layout: &dyn Layout) -> EventResponse {
      if self.is_inert() {
         return EventResponse::default();
      }

      let response = EventResponse {
         prevent_default: self.state.drawing && event.is_touch_move(),
      };
      match event.gesture(layout) {
         Gesture::Press(Some(point)) => self.apply(Action::Press(point)),
         Gesture::Drag(Some(point)) => self.apply(Action::Drag(point)),
         Gesture::Release => self.apply(Action::Release),
         Gesture::Press(None) | Gesture::Drag(None) => (),
      }
      response
   }

   /// Erases everything, abandoning any stroke in progress, and reports an empty value.
   pub fn clear(&mut self) {
      if !self.is_inert() {
         self.apply(Action::Clear);
      }
   }

   /// Changes the logical size. A different size re-initializes the raster, which leaves the surface
   /// empty and reports an empty value once. Setting the current size again does nothing.
   pub fn set_size(&mut self, width: u32, height: u32) -> crate::Result<()> {
      check_size(width, height)?;
      if self.is_inert() || (width, height) == (self.width, self.height) {
         return Ok(());
      }
      log::info!("resizing signature surface to {}x{}", width, height);
      self.width = width;
      self.height = height;
      self.apply(Action::Reinitialize);
      Ok(())
   }

   pub fn is_empty(&self) -> bool {
      self.state.empty
   }

   pub fn is_drawing(&self) -> bool {
      self.state.drawing
   }

   /// Returns whether the raster could not be allocated.
   pub fn is_inert(&self) -> bool {
      self.raster.is_none()
   }

   /// The logical size, which the host should lay the surface out with.
   pub fn css_size(&self) -> (u32, u32) {
      (self.width, self.height)
   }

   /// The size of the backing raster.
   pub fn physical_size(&self) -> Option<(u32, u32)> {
      self.raster.as_ref().map(Raster::size)
   }

   pub fn pixel_ratio(&self) -> f32 {
      self.pixel_ratio
   }

   /// Copies the current pixels out.
   pub fn to_image(&self) -> crate::Result<RgbaImage> {
      self.raster.as_ref().map(Raster::download_rgba).ok_or(Error::SurfaceUnavailable)
   }

   fn apply(&mut self, action: Action) {
      let (next, effects) = self.state.step(action);
      log::trace!("{:?}: {:?} -> {:?}", action, self.state, next);
      self.state = next;
      for effect in effects {
         self.run(effect);
      }
   }

   fn run(&mut self, effect: Effect) {
      match effect {
         Effect::BeginPath(point) => self.draw(|raster| raster.begin_path(point)),
         Effect::LineTo(point) => self.draw(|raster| raster.line_to(point)),
         Effect::ClosePath => self.draw(Raster::close_path),
         Effect::AbandonPath => self.draw(Raster::abandon_path),
         Effect::FillPaper => self.draw(Raster::fill_paper),
         Effect::RebuildRaster => {
            self.snapshot = None;
            self.raster = Raster::new(self.width, self.height, self.pixel_ratio, self.theme);
            if self.raster.is_none() {
               log::warn!(
                  "cannot allocate a {}x{} raster, signature surface is disabled",
                  self.width,
                  self.height
               );
            }
         }
         Effect::Emit(_) if self.is_inert() => (),
         Effect::Emit(Emission::Empty) => (self.on_change)(String::new()),
         Effect::Emit(Emission::Snapshot) => {
            let value = self.encode_snapshot();
            (self.on_change)(value);
         }
      }
   }

   /// Runs a drawing operation on the raster, if there is one.
   fn draw(&mut self, operation: impl FnOnce(&mut Raster)) {
      if let Some(raster) = self.raster.as_mut() {
         self.snapshot = None;
         operation(raster);
      }
   }

   /// Returns the encoded raster, encoding it only if it changed since the last time. Falls back to
   /// the empty value if encoding fails.
   fn encode_snapshot(&mut self) -> String {
      if let Some(snapshot) = &self.snapshot {
         return snapshot.clone();
      }
      let encoded = self.to_image().and_then(|image| ImageCoder::encode_data_url(&image));
      match encoded {
         Ok(url) => {
            self.snapshot = Some(url.clone());
            url
         }
         Err(error) => {
            log::error!("cannot encode signature: {}", error);
            String::new()
         }
      }
   }
}

fn check_size(width: u32, height: u32) -> crate::Result<()> {
   if width == 0 || height == 0 {
      return Err(Error::InvalidSurfaceSize { width, height });
   }
   Ok(())
}
