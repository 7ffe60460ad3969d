//! Result representation normalizer
//!
//! Callers hand the widget a heterogeneous sequence of entries: plain values,
//! or cards with title/description/image fields. The normalizer produces two
//! index-aligned sequences from that input: a boundary-facing shape with every
//! field stringified and `id = index`, and a caller-facing shape holding the
//! original typed values. Index correspondence between the two is what makes
//! index-form submission round-trip back to the caller-supplied value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One caller-supplied option entry, before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum OptionInput<V> {
    /// A bare value; its boundary title is the stringified value
    Plain(V),
    /// A value with explicit presentational fields
    Card {
        value: V,
        title: String,
        description: Option<String>,
        image: Option<String>,
    },
}

impl<V> OptionInput<V> {
    /// Create a card entry
    #[must_use]
    pub fn card(
        value: V,
        title: impl Into<String>,
        description: Option<String>,
        image: Option<String>,
    ) -> Self {
        Self::Card {
            value,
            title: title.into(),
            description,
            image,
        }
    }

    /// The caller-facing value of this entry
    #[must_use]
    pub const fn value(&self) -> &V {
        match self {
            Self::Plain(value) | Self::Card { value, .. } => value,
        }
    }
}

/// Boundary-facing option shape: all fields stringified, id = index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOption {
    /// Position of the entry in the result set, as a string
    pub id: String,
    /// Primary text shown in the list
    pub title: String,
    /// Secondary text (empty when not supplied)
    #[serde(default)]
    pub description: String,
    /// Image reference (empty when not supplied)
    #[serde(default)]
    pub image: String,
}

/// The most recent search results, in relevance order
///
/// Holds the boundary representation and the caller representation side by
/// side. The fields are private so the index-alignment invariant cannot be
/// broken from outside: `display()[i]` and `values()[i]` always describe the
/// same logical entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet<V> {
    display: Vec<DisplayOption>,
    values: Vec<V>,
}

impl<V: Serialize> ResultSet<V> {
    /// An empty result set
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            display: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Normalize caller-supplied entries into the two aligned representations
    ///
    /// Preserves the original ordering exactly; the boundary `id` of each
    /// entry is its index in the input sequence.
    #[must_use]
    pub fn normalize(entries: Vec<OptionInput<V>>) -> Self {
        let mut display = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());

        for (index, entry) in entries.into_iter().enumerate() {
            match entry {
                OptionInput::Plain(value) => {
                    display.push(DisplayOption {
                        id: index.to_string(),
                        title: stringify(&value),
                        description: String::new(),
                        image: String::new(),
                    });
                    values.push(value);
                }
                OptionInput::Card {
                    value,
                    title,
                    description,
                    image,
                } => {
                    display.push(DisplayOption {
                        id: index.to_string(),
                        title,
                        description: description.unwrap_or_default(),
                        image: image.unwrap_or_default(),
                    });
                    values.push(value);
                }
            }
        }

        Self { display, values }
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the result set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Boundary representation, in relevance order
    #[must_use]
    pub fn display(&self) -> &[DisplayOption] {
        &self.display
    }

    /// Caller representation, in relevance order
    #[must_use]
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Caller value at `index`, for index-form submit resolution
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<&V> {
        self.values.get(index)
    }
}

/// Stringify a caller value for boundary display
///
/// JSON strings are shown without quotes; everything else uses its compact
/// JSON rendering. Unserializable values degrade to an empty title rather
/// than failing the render.
fn stringify<V: Serialize>(value: &V) -> String {
    match serde_json::to_value(value) {
        Ok(Value::String(text)) => text,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_preserves_order_and_index_alignment() {
        let entries = vec![
            OptionInput::card("us", "United States", Some("country".into()), None),
            OptionInput::Plain("fr"),
            OptionInput::card("de", "Germany", None, Some("de.png".into())),
        ];
        let set = ResultSet::normalize(entries);

        assert_eq!(set.len(), 3);
        for (i, option) in set.display().iter().enumerate() {
            assert_eq!(option.id, i.to_string());
        }
        assert_eq!(set.display()[0].title, "United States");
        assert_eq!(set.values()[0], "us");
        assert_eq!(set.display()[1].title, "fr");
        assert_eq!(set.values()[1], "fr");
        assert_eq!(set.display()[2].image, "de.png");
        assert_eq!(set.value_at(2), Some(&"de"));
    }

    #[test]
    fn test_plain_non_string_values_get_json_titles() {
        let set = ResultSet::normalize(vec![OptionInput::Plain(7), OptionInput::Plain(13)]);
        assert_eq!(set.display()[0].title, "7");
        assert_eq!(set.display()[1].title, "13");
        assert_eq!(set.value_at(1), Some(&13));
    }

    #[test]
    fn test_missing_card_fields_are_empty_strings() {
        let set = ResultSet::normalize(vec![OptionInput::card("x", "X", None, None)]);
        assert_eq!(set.display()[0].description, "");
        assert_eq!(set.display()[0].image, "");
    }

    #[test]
    fn test_value_at_out_of_range_is_none() {
        let set: ResultSet<String> = ResultSet::empty();
        assert_eq!(set.value_at(0), None);
    }
}
