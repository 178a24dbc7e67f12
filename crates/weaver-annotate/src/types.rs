use smol_str::SmolStr;
use std::ops::Range;

/// A caller-supplied text position, before validation.
///
/// Positions count characters. Integer inputs convert as-is (saturating at the
/// `i64` bounds); floating point inputs are truncated toward zero, NaN becomes
/// zero and infinities saturate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Offset(i64);

impl Offset {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

macro_rules! offset_from_lossless {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Offset {
            fn from(value: $ty) -> Self {
                Self(i64::from(value))
            }
        })*
    };
}

macro_rules! offset_from_saturating {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Offset {
            fn from(value: $ty) -> Self {
                Self(i64::try_from(value).unwrap_or(i64::MAX))
            }
        })*
    };
}

macro_rules! offset_from_float {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Offset {
            fn from(value: $ty) -> Self {
                // `as` truncates toward zero and saturates
                Self(value as i64)
            }
        })*
    };
}

offset_from_lossless!(i8, i16, i32, i64, u8, u16, u32);
offset_from_saturating!(u64, usize, isize);
offset_from_float!(f32, f64);

/// Tag attributes, kept in insertion order.
///
/// Re-inserting a key replaces its value without moving it. The key `_class`
/// is stored as `class`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(SmolStr, SmolStr)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Option<SmolStr> {
        let key = normalize_key(key.into());
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn with(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = if key == "_class" { "class" } else { key };
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn normalize_key(key: SmolStr) -> SmolStr {
    if key.as_str() == "_class" {
        SmolStr::new_static("class")
    } else {
        key
    }
}

impl<K: Into<SmolStr>, V: Into<SmolStr>> Extend<(K, V)> for Attributes {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Into<SmolStr>, V: Into<SmolStr>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        attrs.extend(iter);
        attrs
    }
}

/// A validated tag span over a text, in character positions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    pub tag: SmolStr,
    pub start: usize,
    pub end: usize,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Attributes::is_empty")
    )]
    pub attributes: Attributes,
}

impl Annotation {
    pub fn new(tag: impl Into<SmolStr>, start: usize, end: usize) -> Self {
        Self {
            tag: tag.into(),
            start,
            end,
            attributes: Attributes::new(),
        }
    }

    /// An annotation that opens and closes at the same position.
    pub fn zero_width(tag: impl Into<SmolStr>, at: usize) -> Self {
        Self::new(tag, at, at)
    }

    pub fn with_attribute(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn is_zero_width(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Everything about an annotation besides its tag and start.
///
/// `end` defaults to the start position, giving a zero-width annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnnotationOptions {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub end: Option<Offset>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Attributes::is_empty"))]
    pub attributes: Attributes,
}

impl AnnotationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for an annotation ending at `end`.
    pub fn until(end: impl Into<Offset>) -> Self {
        Self::new().end(end)
    }

    pub fn end(mut self, end: impl Into<Offset>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn attribute(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Merge `attributes` in; keys already present take the new value.
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes.extend(attributes.entries);
        self
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::{Attributes, Offset};
    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use smol_str::SmolStr;
    use std::fmt;

    impl Serialize for Attributes {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (k, v) in self.iter() {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
    }

    impl<'de> Deserialize<'de> for Attributes {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct AttributesVisitor;

            impl<'de> Visitor<'de> for AttributesVisitor {
                type Value = Attributes;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a map of attribute names to string values")
                }

                fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Attributes, A::Error> {
                    let mut attrs = Attributes::new();
                    while let Some((k, v)) = access.next_entry::<SmolStr, SmolStr>()? {
                        attrs.insert(k, v);
                    }
                    Ok(attrs)
                }
            }

            deserializer.deserialize_map(AttributesVisitor)
        }
    }

    impl Serialize for Offset {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_i64(self.get())
        }
    }

    impl<'de> Deserialize<'de> for Offset {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct OffsetVisitor;

            impl Visitor<'_> for OffsetVisitor {
                type Value = Offset;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a numeric text position")
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> Result<Offset, E> {
                    Ok(Offset::from(v))
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> Result<Offset, E> {
                    Ok(Offset::from(v))
                }

                fn visit_f64<E: de::Error>(self, v: f64) -> Result<Offset, E> {
                    Ok(Offset::from(v))
                }
            }

            deserializer.deserialize_any(OffsetVisitor)
        }
    }
}
