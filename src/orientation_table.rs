//! The fixed set of target orientations an [`Orientation`](crate::Orientation)
//! can animate between.

use glam::Quat;

use crate::error::{Error, Result};

/// A target orientation with a display name and the key that selects it.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedOrientation {
    pub name: String,
    pub key: char,
    /// Always unit length once inside an [`OrientationTable`].
    pub rotation: Quat,
}

impl NamedOrientation {
    pub fn new(name: impl Into<String>, key: char, rotation: Quat) -> Self {
        Self {
            name: name.into(),
            key,
            rotation,
        }
    }

    /// Build from `(w, x, y, z)` components, the order quaternions are usually
    /// written in.
    pub fn from_wxyz(name: impl Into<String>, key: char, [w, x, y, z]: [f32; 4]) -> Self {
        Self::new(name, key, Quat::from_xyzw(x, y, z, w))
    }
}

/// Ordered, validated, immutable list of [`NamedOrientation`]s.
///
/// Indices into the table are stable for its lifetime. Construction
/// normalises every rotation and rejects tables that could not be driven from
/// a keyboard (empty, duplicate keys) or rendered (degenerate quaternions).
#[derive(Clone, Debug, PartialEq)]
pub struct OrientationTable {
    entries: Vec<NamedOrientation>,
}

impl OrientationTable {
    pub fn new(entries: Vec<NamedOrientation>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyTable);
        }

        let mut validated: Vec<NamedOrientation> = Vec::with_capacity(entries.len());
        for mut entry in entries {
            if !entry.rotation.is_finite() || entry.rotation.length_squared() <= f32::EPSILON {
                return Err(Error::InvalidOrientation { name: entry.name });
            }
            entry.rotation = entry.rotation.normalize();

            let key = entry.key.to_ascii_lowercase();
            if validated
                .iter()
                .any(|existing| existing.key.to_ascii_lowercase() == key)
            {
                return Err(Error::DuplicateKey { key: entry.key });
            }
            validated.push(entry);
        }

        Ok(Self { entries: validated })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; an empty table cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NamedOrientation> {
        self.entries.get(index)
    }

    /// Rotation at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. Use [`OrientationTable::check_index`]
    /// first when the index comes from outside.
    pub fn rotation(&self, index: usize) -> Quat {
        self.entries[index].rotation
    }

    pub fn check_index(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    /// Index of the entry bound to `key`, ignoring ASCII case.
    pub fn index_for_key(&self, key: char) -> Option<usize> {
        let key = key.to_ascii_lowercase();
        self.entries
            .iter()
            .position(|entry| entry.key.to_ascii_lowercase() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedOrientation> {
        self.entries.iter()
    }
}

impl Default for OrientationTable {
    /// The seven presets of the classic interpolation demo, keys `1`-`7`.
    ///
    /// Entries 2 and 3 are negatives of each other: the same rotation on
    /// opposite sides of the quaternion sphere.
    fn default() -> Self {
        Self {
            entries: default_entries()
                .into_iter()
                .map(|mut entry| {
                    entry.rotation = entry.rotation.normalize();
                    entry
                })
                .collect(),
        }
    }
}

pub(crate) fn default_entries() -> Vec<NamedOrientation> {
    vec![
        NamedOrientation::from_wxyz("nose up", '1', [0.7071, 0.7071, 0.0, 0.0]),
        NamedOrientation::from_wxyz("banked", '2', [0.5, 0.5, -0.5, 0.5]),
        NamedOrientation::from_wxyz("tumble", '3', [-0.4895, -0.7892, -0.3700, -0.02514]),
        NamedOrientation::from_wxyz("tumble (negated)", '4', [0.4895, 0.7892, 0.3700, 0.02514]),
        NamedOrientation::from_wxyz("corkscrew", '5', [0.3840, -0.1591, -0.7991, -0.4344]),
        NamedOrientation::from_wxyz("dive", '6', [0.5537, 0.5208, 0.6483, 0.0410]),
        NamedOrientation::from_wxyz("about face", '7', [0.0, 0.0, 1.0, 0.0]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_table_is_normalised() {
        let table = OrientationTable::default();
        assert_eq!(table.len(), 7);
        for entry in table.iter() {
            assert_relative_eq!(entry.rotation.length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn default_table_contains_a_double_cover_pair() {
        let table = OrientationTable::default();
        let a = table.rotation(2);
        let b = table.rotation(3);
        assert!(a.abs_diff_eq(-b, 1e-6));
    }

    #[test]
    fn default_matches_validated_construction() {
        let built = OrientationTable::new(default_entries()).unwrap();
        assert_eq!(built, OrientationTable::default());
    }

    #[test]
    fn from_wxyz_puts_w_last_in_glam_order() {
        let entry = NamedOrientation::from_wxyz("x", 'x', [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(entry.rotation, Quat::from_xyzw(2.0, 3.0, 4.0, 1.0));
    }

    #[test]
    fn rejects_empty_table() {
        assert!(matches!(OrientationTable::new(vec![]), Err(Error::EmptyTable)));
    }

    #[test]
    fn rejects_degenerate_rotation() {
        let entries = vec![NamedOrientation::from_wxyz("zero", 'z', [0.0; 4])];
        assert!(matches!(
            OrientationTable::new(entries),
            Err(Error::InvalidOrientation { name }) if name == "zero"
        ));

        let entries = vec![NamedOrientation::from_wxyz("nan", 'n', [f32::NAN, 0.0, 0.0, 1.0])];
        assert!(OrientationTable::new(entries).is_err());
    }

    #[test]
    fn rejects_duplicate_keys_ignoring_case() {
        let entries = vec![
            NamedOrientation::new("a", 'q', Quat::IDENTITY),
            NamedOrientation::new("b", 'Q', Quat::from_rotation_x(1.0)),
        ];
        assert!(matches!(
            OrientationTable::new(entries),
            Err(Error::DuplicateKey { key: 'Q' })
        ));
    }

    #[test]
    fn looks_up_by_key_and_index() {
        let table = OrientationTable::new(vec![
            NamedOrientation::new("level", 'q', Quat::IDENTITY),
            NamedOrientation::new("rolled", 'w', Quat::from_rotation_z(2.0) * 3.0),
        ])
        .unwrap();

        assert_eq!(table.index_for_key('W'), Some(1));
        assert_eq!(table.index_for_key('e'), None);
        assert_relative_eq!(table.rotation(1).length(), 1.0, epsilon = 1e-6);
        assert_eq!(table.get(0).map(|e| e.name.as_str()), Some("level"));
        assert!(table.check_index(1).is_ok());
        assert!(matches!(
            table.check_index(2),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        ));
    }
}
