//! `Face` and `FaceKey`: oriented faces and their order-independent identity.
//!
//! A [`Face`] stores up to four point indices in the orientation of the cell
//! that produced it, padding triangular faces with [`NO_POINT`] in the last
//! slot. A [`FaceKey`] is the deduplication key: the set of the face's point
//! indices without the sentinel, kept as a sorted fixed-size array so it can
//! be hashed and compared by value without allocating.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use static_assertions::{assert_eq_size, assert_impl_all};
use std::fmt;

/// Padding value for the unused fourth slot of a triangular face.
pub const NO_POINT: i64 = -1;

/// Oriented face: four point-index slots, `NO_POINT`-padded for triangles.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct Face(pub [i64; 4]);

assert_eq_size!(Face, [i64; 4]);

impl Face {
    #[inline]
    pub const fn tri(a: i64, b: i64, c: i64) -> Self {
        Face([a, b, c, NO_POINT])
    }

    #[inline]
    pub const fn quad(a: i64, b: i64, c: i64, d: i64) -> Self {
        Face([a, b, c, d])
    }

    /// The four raw slots, sentinel included.
    #[inline]
    pub const fn slots(&self) -> &[i64; 4] {
        &self.0
    }

    /// Point indices in stored order, sentinel excluded.
    pub fn points(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied().filter(|&p| p != NO_POINT)
    }

    /// Number of non-sentinel slots.
    pub fn len(&self) -> usize {
        self.points().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_triangle(&self) -> bool {
        self.len() == 3
    }

    pub fn is_quad(&self) -> bool {
        self.len() == 4
    }

    /// Order-independent identity of this face.
    #[inline]
    pub fn key(&self) -> FaceKey {
        FaceKey::from(*self)
    }
}

impl fmt::Debug for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Face").field(&self.0).finish()
    }
}

impl From<[i64; 4]> for Face {
    fn from(slots: [i64; 4]) -> Self {
        Face(slots)
    }
}

impl From<[i64; 3]> for Face {
    fn from([a, b, c]: [i64; 3]) -> Self {
        Face::tri(a, b, c)
    }
}

/// Order-independent face identity.
///
/// Holds the distinct non-sentinel indices in ascending order followed by
/// `NO_POINT` padding. Repeated indices collapse, so a degenerate quad with a
/// doubled corner has the same identity as the triangle it spans.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceKey {
    points: [i64; 4],
    len: u8,
}

assert_impl_all!(FaceKey: Copy, Eq, std::hash::Hash, Send, Sync);

impl FaceKey {
    const EMPTY: FaceKey = FaceKey {
        points: [NO_POINT; 4],
        len: 0,
    };

    /// Build a key from any arrangement of point indices.
    ///
    /// `NO_POINT` entries are ignored. Returns `None` when more than four
    /// distinct indices are given, since no supported face has that many.
    pub fn from_points(points: &[i64]) -> Option<Self> {
        let mut key = Self::EMPTY;
        for &p in points {
            if !key.insert(p) {
                return None;
            }
        }
        key.points[..key.len as usize].sort_unstable();
        Some(key)
    }

    /// Sorted distinct point indices of the face.
    #[inline]
    pub fn points(&self) -> &[i64] {
        &self.points[..self.len as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // false only when a fifth distinct index would be needed
    fn insert(&mut self, p: i64) -> bool {
        if p == NO_POINT || self.points().contains(&p) {
            return true;
        }
        if self.len as usize == self.points.len() {
            return false;
        }
        self.points[self.len as usize] = p;
        self.len += 1;
        true
    }
}

impl From<Face> for FaceKey {
    fn from(face: Face) -> Self {
        let mut key = Self::EMPTY;
        // four slots can never overflow four entries
        for p in face.0 {
            key.insert(p);
        }
        key.points[..key.len as usize].sort_unstable();
        key
    }
}

impl fmt::Debug for FaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.points()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_order_and_sentinel() {
        let a = Face::quad(4, 1, 9, 7).key();
        let b = Face::quad(9, 7, 4, 1).key();
        assert_eq!(a, b);
        assert_eq!(a.points(), &[1, 4, 7, 9]);

        let t = Face::tri(5, 2, 8).key();
        assert_eq!(t.points(), &[2, 5, 8]);
        assert_eq!(FaceKey::from_points(&[8, 5, 2]), Some(t));
        assert_eq!(FaceKey::from_points(&[NO_POINT, 2, 8, 5]), Some(t));
    }

    #[test]
    fn triangle_and_quad_keys_differ() {
        assert_ne!(Face::tri(1, 2, 3).key(), Face::quad(1, 2, 3, 4).key());
    }

    #[test]
    fn repeated_points_collapse() {
        let degenerate = Face::quad(3, 1, 1, 2).key();
        assert_eq!(degenerate, Face::tri(1, 2, 3).key());
        assert_eq!(degenerate.len(), 3);
    }

    #[test]
    fn too_many_points_rejected() {
        assert!(FaceKey::from_points(&[1, 2, 3, 4, 5]).is_none());
        assert!(FaceKey::from_points(&[1, 2, 3, 4, 4, 1]).is_some());
    }

    #[test]
    fn face_shape_queries() {
        let t = Face::from([0, 2, 1]);
        assert!(t.is_triangle());
        assert_eq!(t.points().collect::<Vec<_>>(), vec![0, 2, 1]);
        assert!(Face::quad(0, 1, 2, 3).is_quad());
    }
}
