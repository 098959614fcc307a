use std::fmt;

use serde::Serialize;

/// The structural address of a descriptor inside its file: alternating
/// container tags and sibling indices, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourcePath(Vec<i32>);

impl SourcePath {
    pub fn new() -> SourcePath {
        SourcePath(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// Append one `[tag, index]` hop.
    pub fn push_pair(&mut self, tag: i32, index: i32) {
        self.0.push(tag);
        self.0.push(index);
    }

    pub fn key(&self) -> PathKey {
        PathKey::new(&self.0)
    }
}

impl From<Vec<i32>> for SourcePath {
    fn from(path: Vec<i32>) -> Self {
        SourcePath(path)
    }
}

impl From<&[i32]> for SourcePath {
    fn from(path: &[i32]) -> Self {
        SourcePath(path.to_vec())
    }
}

impl Extend<i32> for SourcePath {
    fn extend<T: IntoIterator<Item = i32>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", element)?;
        }
        write!(f, "]")
    }
}

/// Lookup key for a path. Every element takes exactly four little-endian
/// bytes, so two keys are equal iff their paths are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey(Vec<u8>);

impl PathKey {
    pub fn new(path: &[i32]) -> PathKey {
        let mut buf = Vec::with_capacity(4 * path.len());
        for element in path {
            buf.extend_from_slice(&element.to_le_bytes());
        }
        PathKey(buf)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_path(rng: &mut StdRng, len: usize) -> Vec<i32> {
        (0..len)
            .map(|_| {
                // Mostly small values, like real paths, with the odd extreme.
                if rng.random_bool(0.8) {
                    rng.random_range(0..8)
                } else {
                    rng.random::<i32>()
                }
            })
            .collect()
    }

    #[test]
    fn test_key_layout_is_fixed_width_little_endian() {
        let key = PathKey::new(&[4, 0, 2, 1]);
        assert_eq!(key.len(), 16);
        assert_eq!(
            key.as_bytes(),
            &[4, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0]
        );
        assert_eq!(PathKey::new(&[-1]).as_bytes(), &[255, 255, 255, 255]);
        assert!(PathKey::new(&[]).is_empty());
    }

    #[test]
    fn test_key_distinguishes_lengths() {
        assert_ne!(PathKey::new(&[8]), PathKey::new(&[4, 4]));
        assert_ne!(PathKey::new(&[0]), PathKey::new(&[0, 0]));
        assert_ne!(PathKey::new(&[]), PathKey::new(&[0]));
        assert_ne!(PathKey::new(&[4, 0]), PathKey::new(&[4, 0, 2, 0]));
    }

    #[test]
    fn test_key_is_injective_over_random_paths() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..2000 {
            let len_a = rng.random_range(0..8);
            let len_b = if rng.random_bool(0.5) { len_a } else { rng.random_range(0..8) };
            let a = random_path(&mut rng, len_a);
            let mut b = random_path(&mut rng, len_b);
            if rng.random_bool(0.25) {
                b = a.clone();
            }
            assert_eq!(
                PathKey::new(&a) == PathKey::new(&b),
                a == b,
                "key equality disagrees with path equality for {:?} and {:?}",
                a,
                b
            );
        }
    }

    #[test]
    fn test_push_pair_and_display() {
        let mut path = SourcePath::new();
        assert!(path.is_empty());
        path.push_pair(4, 0);
        path.push_pair(2, 1);
        assert_eq!(path.as_slice(), &[4, 0, 2, 1]);
        assert_eq!(path.len(), 4);
        assert_eq!(path.to_string(), "[4, 0, 2, 1]");
        assert_eq!(SourcePath::new().to_string(), "[]");
        assert_eq!(path.key(), PathKey::new(&[4, 0, 2, 1]));
    }
}
