use std::ops::Range;

/// Groups an ascending list of line numbers into ranges of consecutive lines.
pub(crate) fn make_ranges(mut slice: &[usize]) -> Vec<Range<usize>> {
    let mut ranges = Vec::with_capacity(slice.len());

    while let Some(&first) = slice.first() {
        let head_len = slice
            .windows(2)
            .take_while(|w| w[0] + 1 == w[1])
            .count()
            + 1;

        let (head, tail) = slice.split_at(head_len);
        slice = tail;

        ranges.push(first..first + head.len());
    }

    ranges
}

/// Whether an element of the working content can still be traced back to a
/// line of the blamed snapshot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Link {
    /// The element is line `k` of the blamed snapshot.
    Linked(usize),
    /// The element was brought in by an older revision and has no counterpart
    /// in the blamed snapshot.
    Unlinked,
}

/// A map from a position in the working content to the line of the blamed
/// snapshot it came from.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct PositionMap(Vec<Link>);

impl PositionMap {
    /// Every position linked to the line with the same number.
    pub fn identity(len: usize) -> Self {
        Self((0..len).map(Link::Linked).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<Link> {
        self.0.get(position).copied()
    }

    /// Removes `count` entries starting at `position` and returns them.
    pub fn remove(&mut self, position: usize, count: usize) -> impl Iterator<Item = Link> + '_ {
        self.0.drain(position..position + count)
    }

    /// Inserts `count` unlinked entries at `position`.
    pub fn insert_unlinked(&mut self, position: usize, count: usize) {
        self.0
            .splice(position..position, std::iter::repeat(Link::Unlinked).take(count));
    }

    /// Iterates over `(position, line)` for all linked positions.
    pub fn linked(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().enumerate().filter_map(|(pos, link)| match link {
            Link::Linked(k) => Some((pos, *k)),
            Link::Unlinked => None,
        })
    }
}

impl std::fmt::Debug for PositionMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionMap")
            .field("length", &self.0.len())
            .field("linked", &self.linked().count())
            .field("map", &self.0)
            .finish()
    }
}
