//! Pure helpers over the ordered source list
//!
//! Each helper returns a fresh `Vec` and leaves its input alone.

use super::state::{AudioSource, SourceId};

/// Index of the source with `id`, if present
pub fn position(sources: &[AudioSource], id: &SourceId) -> Option<usize> {
    sources.iter().position(|s| &s.id == id)
}

pub fn contains(sources: &[AudioSource], id: &SourceId) -> bool {
    position(sources, id).is_some()
}

/// Clamp a caller-supplied index into `[0, len - 1]`
///
/// An empty list clamps everything to 0.
pub fn clamp_index(index: i64, len: usize) -> usize {
    if len == 0 || index <= 0 {
        return 0;
    }
    let last = len - 1;
    usize::try_from(index).map(|i| i.min(last)).unwrap_or(last)
}

pub fn appended(sources: &[AudioSource], source: AudioSource) -> Vec<AudioSource> {
    let mut next = Vec::with_capacity(sources.len() + 1);
    next.extend_from_slice(sources);
    next.push(source);
    next
}

pub fn without(sources: &[AudioSource], index: usize) -> Vec<AudioSource> {
    sources
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, s)| s.clone())
        .collect()
}

pub fn with_muted(sources: &[AudioSource], index: usize, muted: bool) -> Vec<AudioSource> {
    let mut next = sources.to_vec();
    if let Some(source) = next.get_mut(index) {
        source.muted = muted;
    }
    next
}

/// Move the entry at `from` so that it ends up at `to_index` (clamped),
/// shifting the entries in between by one.
pub fn moved(sources: &[AudioSource], from: usize, to_index: i64) -> Vec<AudioSource> {
    let mut next = sources.to_vec();
    if from >= next.len() {
        return next;
    }
    let to = clamp_index(to_index, next.len());
    let source = next.remove(from);
    next.insert(to, source);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(ids: &[&str]) -> Vec<AudioSource> {
        ids.iter().map(|id| AudioSource::new(*id)).collect()
    }

    fn ids(sources: &[AudioSource]) -> Vec<String> {
        sources.iter().map(|s| s.id.to_string()).collect()
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(-5, 3), 0);
        assert_eq!(clamp_index(0, 3), 0);
        assert_eq!(clamp_index(2, 3), 2);
        assert_eq!(clamp_index(3, 3), 2);
        assert_eq!(clamp_index(i64::MAX, 3), 2);
        assert_eq!(clamp_index(4, 0), 0);
    }

    #[test]
    fn test_moved_forward_and_back() {
        let sources = list(&["a", "b", "c", "d"]);

        assert_eq!(ids(&moved(&sources, 0, 2)), ["b", "c", "a", "d"]);
        assert_eq!(ids(&moved(&sources, 3, 1)), ["a", "d", "b", "c"]);
        assert_eq!(ids(&moved(&sources, 1, 1)), ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_moved_clamps() {
        let sources = list(&["a", "b", "c"]);

        assert_eq!(ids(&moved(&sources, 0, 99)), ["b", "c", "a"]);
        assert_eq!(ids(&moved(&sources, 2, -1)), ["c", "a", "b"]);
    }

    #[test]
    fn test_without_preserves_order() {
        let sources = list(&["a", "b", "c"]);
        assert_eq!(ids(&without(&sources, 1)), ["a", "c"]);
        // input untouched
        assert_eq!(ids(&sources), ["a", "b", "c"]);
    }

    #[test]
    fn test_with_muted_only_touches_target() {
        let sources = list(&["a", "b"]);
        let next = with_muted(&sources, 1, true);

        assert!(!next[0].muted);
        assert!(next[1].muted);
        assert!(!sources[1].muted);
    }

    #[test]
    fn test_position() {
        let sources = list(&["a", "b"]);
        assert_eq!(position(&sources, &"b".into()), Some(1));
        assert_eq!(position(&sources, &"z".into()), None);
        assert!(!contains(&sources, &SourceId::Index(1)));
    }
}
