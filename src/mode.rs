//! Statistical mode of a string sequence, counted with a [`ChainedMap`].

use log::trace;

use crate::chained::ChainedMap;

/// Most frequent elements of a sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mode {
    /// Every element sharing the highest count, in order of first appearance.
    pub elements: Vec<String>,
    /// How often each of `elements` occurs.
    pub frequency: usize,
}

/// Returns the mode(s) of `sequence`, or `None` when it is empty.
///
/// Counts go into a default-sized `ChainedMap` in one pass. A second pass
/// over the sequence reads each element's count once (the key is removed
/// after it has been looked at), so ties come out in order of first
/// appearance.
///
/// ```
/// use prime_hashmap::find_mode;
///
/// let mode = find_mode(&["apple", "apple", "grape", "melon", "melon", "peach"]).unwrap();
/// assert_eq!(mode.elements, vec!["apple", "melon"]);
/// assert_eq!(mode.frequency, 2);
/// ```
pub fn find_mode<S: AsRef<str>>(sequence: &[S]) -> Option<Mode> {
    let mut counts: ChainedMap<usize> = ChainedMap::default();
    for item in sequence {
        let key = item.as_ref();
        let seen = counts.get(key).copied().unwrap_or(0);
        counts.put(key, seen + 1);
    }
    trace!(
        "counted {} distinct elements in a sequence of {} (load {:.2})",
        counts.len(),
        sequence.len(),
        counts.table_load()
    );

    let mut elements = Vec::new();
    // Every stored count is at least 1, so 0 means nothing has been seen.
    let mut frequency = 0;
    for item in sequence {
        let key = item.as_ref();
        let Some(&count) = counts.get(key) else {
            continue;
        };
        if count > frequency {
            elements.clear();
            elements.push(key.to_owned());
            frequency = count;
        } else if count == frequency {
            elements.push(key.to_owned());
        }
        counts.remove(key);
    }

    if elements.is_empty() {
        None
    } else {
        Some(Mode {
            elements,
            frequency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode_of(items: &[&str]) -> (Vec<String>, usize) {
        let m = find_mode(items).expect("non-empty input has a mode");
        (m.elements, m.frequency)
    }

    #[test]
    fn ties_keep_first_appearance_order() {
        let (elements, frequency) =
            mode_of(&["apple", "apple", "grape", "melon", "melon", "peach"]);
        assert_eq!(elements, vec!["apple", "melon"]);
        assert_eq!(frequency, 2);
    }

    /// Invariant: a strictly higher count later in the sequence replaces the
    /// earlier candidates.
    #[test]
    fn later_higher_count_wins() {
        let (elements, frequency) = mode_of(&["one", "two", "two", "three", "three", "three"]);
        assert_eq!(elements, vec!["three"]);
        assert_eq!(frequency, 3);
    }

    #[test]
    fn clear_winner_and_all_distinct() {
        let (elements, frequency) = mode_of(&[
            "Arch", "Manjaro", "Manjaro", "Mint", "Mint", "Mint", "Ubuntu", "Ubuntu", "Ubuntu",
            "Ubuntu",
        ]);
        assert_eq!(elements, vec!["Ubuntu"]);
        assert_eq!(frequency, 4);

        let (elements, frequency) = mode_of(&["one", "two", "three", "four", "five"]);
        assert_eq!(elements, vec!["one", "two", "three", "four", "five"]);
        assert_eq!(frequency, 1);
    }

    /// Invariant: repeats are reported once even when interleaved.
    #[test]
    fn interleaved_repeats_reported_once() {
        let (elements, frequency) = mode_of(&[
            "2", "4", "2", "6", "8", "4", "1", "3", "4", "5", "7", "3", "3", "2",
        ]);
        assert_eq!(elements, vec!["2", "4", "3"]);
        assert_eq!(frequency, 3);
    }

    #[test]
    fn empty_sequence_has_no_mode() {
        let empty: [&str; 0] = [];
        assert_eq!(find_mode(&empty), None);
    }

    /// Invariant: many distinct keys overload the fixed-size counter table
    /// without affecting the result.
    #[test]
    fn large_input_on_small_table() {
        let mut items: Vec<String> = (0..500).map(|i| format!("item{i}")).collect();
        items.push("item250".to_string());
        items.push("item7".to_string());
        let m = find_mode(&items).unwrap();
        assert_eq!(m.elements, vec!["item7", "item250"]);
        assert_eq!(m.frequency, 2);
    }
}
