use mc_api::methods::player::ListItem;

/// One non-empty play queue
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistSnapshot {
    pub playlistid: i32,
    pub kind: String,
    pub items: Vec<ListItem>,
}

/// Cached playlists
///
/// `None` is unknown; an empty list means every queue is known to be empty.
pub type PlaylistState = Option<Vec<PlaylistSnapshot>>;

/// Ids in `previous` that are absent from `next`
pub(crate) fn removed_ids(previous: &[PlaylistSnapshot], next: &[PlaylistSnapshot]) -> Vec<i32> {
    previous
        .iter()
        .map(|p| p.playlistid)
        .filter(|id| !next.iter().any(|n| n.playlistid == *id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn list(id: i32) -> PlaylistSnapshot {
        PlaylistSnapshot {
            playlistid: id,
            kind: "audio".to_string(),
            items: vec![ListItem::default()],
        }
    }

    #[test]
    fn test_removed_ids() {
        assert_eq!(removed_ids(&[list(0), list(1)], &[list(1)]), vec![0]);
        assert_eq!(removed_ids(&[list(0), list(1)], &[]), vec![0, 1]);
        assert!(removed_ids(&[], &[list(2)]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_removed_ids_are_previous_minus_next(
            previous in proptest::collection::btree_set(0i32..8, 0..8),
            next in proptest::collection::btree_set(0i32..8, 0..8),
        ) {
            let previous_lists: Vec<_> = previous.iter().map(|id| list(*id)).collect();
            let next_lists: Vec<_> = next.iter().map(|id| list(*id)).collect();
            let expected: Vec<i32> = previous.difference(&next).copied().collect();
            prop_assert_eq!(removed_ids(&previous_lists, &next_lists), expected);
        }
    }
}
