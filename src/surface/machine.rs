//! The surface's drawing state machine.
//!
//! Every action maps the current state to the next one plus a list of effects. The surface runs the
//! effects exactly once per transition, so the change callback fires once per state change and
//! never as a side effect of re-rendering.

use smallvec::SmallVec;

use super::input::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct State {
   /// A stroke is in progress.
   pub drawing: bool,
   /// No stroke has been started since the last clear or re-initialization.
   pub empty: bool,
}

impl Default for State {
   fn default() -> Self {
      Self {
         drawing: false,
         empty: true,
      }
   }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Action {
   Press(Point),
   Drag(Point),
   Release,
   Clear,
   Reinitialize,
}

/// The value reported to the change callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Emission {
   /// The empty string: no signature.
   Empty,
   /// The encoded image of the current raster.
   Snapshot,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Effect {
   BeginPath(Point),
   LineTo(Point),
   ClosePath,
   AbandonPath,
   FillPaper,
   RebuildRaster,
   Emit(Emission),
}

pub(crate) type Effects = SmallVec<[Effect; 3]>;

impl State {
   pub(crate) fn step(self, action: Action) -> (State, Effects) {
      let mut effects = Effects::new();
      let next = match action {
         Action::Press(point) => {
            effects.push(Effect::BeginPath(point));
            State {
               drawing: true,
               empty: false,
            }
         }
         Action::Drag(point) => {
            if self.drawing {
               effects.push(Effect::LineTo(point));
            }
            self
         }
         Action::Release => {
            if self.drawing {
               effects.push(Effect::ClosePath);
            }
            effects.push(Effect::Emit(if self.empty {
               Emission::Empty
            } else {
               Emission::Snapshot
            }));
            State {
               drawing: false,
               ..self
            }
         }
         Action::Clear => {
            effects.extend([Effect::AbandonPath, Effect::FillPaper, Effect::Emit(Emission::Empty)]);
            State::default()
         }
         Action::Reinitialize => {
            effects.extend([Effect::RebuildRaster, Effect::Emit(Emission::Empty)]);
            State::default()
         }
      };
      (next, effects)
   }
}
