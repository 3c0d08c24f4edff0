//! Surface colors and where they come from.

use tiny_skia::Color;

/// A source of named color tokens, such as a stylesheet's custom properties or a config file.
pub trait ThemeSource {
   /// Returns the raw value of the token, or `None` if the token is not defined.
   fn token(&self, name: &str) -> Option<String>;
}

/// The pair of colors a signature surface is drawn with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
   /// Stroke color.
   pub ink: Color,
   /// Background color the surface is filled with on initialization and clear.
   pub paper: Color,
}

impl Theme {
   pub const INK_TOKEN: &'static str = "foreground";
   pub const PAPER_TOKEN: &'static str = "card";

   /// Resolves the theme from the given source. Tokens that are missing or cannot be parsed fall
   /// back to the defaults of black ink on white paper.
   pub fn resolve(source: &dyn ThemeSource) -> Self {
      let fallback = Self::default();
      Self {
         ink: resolve_token(source, Self::INK_TOKEN).unwrap_or(fallback.ink),
         paper: resolve_token(source, Self::PAPER_TOKEN).unwrap_or(fallback.paper),
      }
   }
}

impl Default for Theme {
   fn default() -> Self {
      Self {
         ink: Color::BLACK,
         paper: Color::WHITE,
      }
   }
}

fn resolve_token(source: &dyn ThemeSource, name: &str) -> Option<Color> {
   let value = source.token(name)?;
   let color = parse_color(&value);
   if color.is_none() {
      log::warn!("theme token '{}' has unusable value {:?}, using fallback", name, value);
   }
   color
}

/// Parses a color token.
///
/// Bare HSL components (`222.2 84% 4.9%`) are accepted as well as any CSS color string.
pub fn parse_color(value: &str) -> Option<Color> {
   let value = value.trim();
   if value.is_empty() {
      return None;
   }
   let parsed = csscolorparser::parse(value)
      .or_else(|_| csscolorparser::parse(&format!("hsl({})", value)))
      .ok()?;
   let [r, g, b, a] = parsed.to_rgba8();
   Some(Color::from_rgba8(r, g, b, a))
}

/// A fixed set of tokens.
impl ThemeSource for std::collections::HashMap<String, String> {
   fn token(&self, name: &str) -> Option<String> {
      self.get(name).cloned()
   }
}
