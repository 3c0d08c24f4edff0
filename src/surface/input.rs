//! Input events and coordinate extraction.

use serde::Deserialize;

/// A point in surface-local logical pixels, or in device client space before extraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Point {
   pub x: f32,
   pub y: f32,
}

impl Point {
   pub fn new(x: f32, y: f32) -> Self {
      Self { x, y }
   }

   fn is_finite(self) -> bool {
      self.x.is_finite() && self.y.is_finite()
   }
}

impl std::ops::Sub for Point {
   type Output = Point;

   fn sub(self, rhs: Point) -> Point {
      Point::new(self.x - rhs.x, self.y - rhs.y)
   }
}

/// Where the surface currently is on screen.
///
/// The origin is queried once per input event, as the layout around the surface may shift between
/// events.
pub trait Layout {
   /// The top-left corner of the surface's bounding box, in client coordinates.
   fn origin(&self) -> Point;
}

/// A surface that never moves.
impl Layout for Point {
   fn origin(&self) -> Point {
      *self
   }
}

/// An input event delivered to the surface by the host.
///
/// Mouse events carry the pointer's client position. Touch events carry every active touch point;
/// only the first one is used.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
   MouseDown { client: Point },
   MouseMove { client: Point },
   MouseUp,
   MouseLeave,
   TouchStart { touches: Vec<Point> },
   TouchMove { touches: Vec<Point> },
   TouchEnd,
}

/// What the surface does with an event once its coordinates have been resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Gesture {
   Press(Option<Point>),
   Drag(Option<Point>),
   Release,
}

impl InputEvent {
   /// Resolves the event into a gesture in surface-local coordinates.
   pub(crate) fn gesture(&self, layout: &dyn Layout) -> Gesture {
      match self {
         InputEvent::MouseDown { client } => Gesture::Press(local(Some(*client), layout)),
         InputEvent::MouseMove { client } => Gesture::Drag(local(Some(*client), layout)),
         InputEvent::TouchStart { touches } => {
            Gesture::Press(local(touches.first().copied(), layout))
         }
         InputEvent::TouchMove { touches } => Gesture::Drag(local(touches.first().copied(), layout)),
         InputEvent::MouseUp | InputEvent::MouseLeave | InputEvent::TouchEnd => Gesture::Release,
      }
   }

   pub fn is_touch_move(&self) -> bool {
      matches!(self, InputEvent::TouchMove { .. })
   }
}

/// Converts a client point to surface-local coordinates. Non-finite points are dropped.
fn local(client: Option<Point>, layout: &dyn Layout) -> Option<Point> {
   let point = client? - layout.origin();
   point.is_finite().then(|| point)
}

#[cfg(test)]
mod tests {
   use std::cell::Cell;

   use super::*;

   /// A layout that moves down by 10 pixels every time it is queried.
   struct Scrolling {
      top: Cell<f32>,
   }

   impl Layout for Scrolling {
      fn origin(&self) -> Point {
         let top = self.top.get();
         self.top.set(top + 10.0);
         Point::new(5.0, top)
      }
   }

   #[test]
   fn mouse_coordinates_are_relative_to_the_origin() {
      let event = InputEvent::MouseDown {
         client: Point::new(110.0, 60.0),
      };
      assert_eq!(
         event.gesture(&Point::new(100.0, 50.0)),
         Gesture::Press(Some(Point::new(10.0, 10.0)))
      );
   }

   #[test]
   fn origin_is_queried_per_event() {
      let layout = Scrolling { top: Cell::new(0.0) };
      let event = InputEvent::MouseMove {
         client: Point::new(25.0, 40.0),
      };
      assert_eq!(event.gesture(&layout), Gesture::Drag(Some(Point::new(20.0, 40.0))));
      assert_eq!(event.gesture(&layout), Gesture::Drag(Some(Point::new(20.0, 30.0))));
   }

   #[test]
   fn first_touch_point_wins() {
      let event = InputEvent::TouchStart {
         touches: vec![Point::new(3.0, 4.0), Point::new(100.0, 100.0)],
      };
      assert_eq!(event.gesture(&Point::default()), Gesture::Press(Some(Point::new(3.0, 4.0))));
   }

   #[test]
   fn touch_without_points_has_no_coordinate() {
      let event = InputEvent::TouchMove { touches: vec![] };
      assert_eq!(event.gesture(&Point::default()), Gesture::Drag(None));
   }

   #[test]
   fn non_finite_points_are_dropped() {
      let event = InputEvent::MouseDown {
         client: Point::new(f32::NAN, 1.0),
      };
      assert_eq!(event.gesture(&Point::default()), Gesture::Press(None));
   }

   #[test]
   fn events_deserialize_from_tagged_json() {
      let event: InputEvent =
         serde_json::from_str(r#"{ "type": "touch_start", "touches": [{ "x": 1, "y": 2 }] }"#)
            .unwrap();
      assert_eq!(
         event,
         InputEvent::TouchStart {
            touches: vec![Point::new(1.0, 2.0)]
         }
      );
   }
}
