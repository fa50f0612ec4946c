use derive_more::{Display, From};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::iter::FromIterator;

use crate::error::{Error, ErrorKind, Result};
use crate::event::ColorKey;

const DEFAULT_COLORS: &[&str] = &[
    "#3f51b5", "#e91e63", "#009688", "#ff9800", "#9c27b0", "#4caf50", "#795548", "#607d8b",
];

pub static DEFAULT_PALETTE: Lazy<Palette> = Lazy::new(|| Palette {
    colors: DEFAULT_COLORS.iter().map(|&c| Color::from(c)).collect(),
});

/// A display color as understood by the presentation layer (usually a CSS color).
#[derive(Clone, Debug, Display, From, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(color: &str) -> Self {
        Color(color.to_owned())
    }
}

/// Non-empty, ordered list of colors handed out to category keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new<C: Into<Color>, I: IntoIterator<Item = C>>(colors: I) -> Result<Self> {
        let colors: Vec<Color> = colors.into_iter().map(Into::into).collect();

        if colors.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidConfiguration,
                "color palette must contain at least one color",
            ));
        }

        Ok(Palette { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Color for the `n`-th distinct key, wrapping around at the end of the palette.
    pub fn nth(&self, n: usize) -> &Color {
        &self.colors[n % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        (*DEFAULT_PALETTE).clone()
    }
}

/// Append-only assignment of colors to category keys, in order of first appearance.
///
/// Colors are only stable for as long as the same map is threaded through: rebuilding from
/// an empty map with keys arriving in a different order may hand out different colors.
#[derive(Clone, Debug, Default)]
pub struct ColorMap {
    entries: Vec<(ColorKey, Color)>,
    lookup: HashMap<ColorKey, usize>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &ColorKey) -> Option<&Color> {
        self.lookup.get(key).map(|&idx| &self.entries[idx].1)
    }

    pub fn contains(&self, key: &ColorKey) -> bool {
        self.lookup.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColorKey, &Color)> + '_ {
        self.entries.iter().map(|(key, color)| (key, color))
    }

    /// Returns the color of `key`, assigning the next palette color if the key is new.
    pub fn assign(mut self, key: &ColorKey, palette: &Palette) -> (Color, Self) {
        if let Some(color) = self.get(key).cloned() {
            return (color, self);
        }

        let color = palette.nth(self.entries.len()).clone();
        self.lookup.insert(key.clone(), self.entries.len());
        self.entries.push((key.clone(), color.clone()));

        (color, self)
    }
}

impl PartialEq for ColorMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ColorMap {}

impl FromIterator<(ColorKey, Color)> for ColorMap {
    fn from_iter<I: IntoIterator<Item = (ColorKey, Color)>>(iter: I) -> Self {
        let mut map = ColorMap::new();
        for (key, color) in iter {
            if !map.contains(&key) {
                map.lookup.insert(key.clone(), map.entries.len());
                map.entries.push((key, color));
            }
        }
        map
    }
}

pub fn color_for(key: &ColorKey, map: ColorMap, palette: &Palette) -> (Color, ColorMap) {
    map.assign(key, palette)
}
