use super::OrderingError;

/// Moves the element at `from` so that it ends up at index `to`.
///
/// This is list-splice reordering, not a swap: the element is removed and
/// reinserted, shifting everything between the two positions by one. The
/// input is never modified; a new sequence is returned.
///
/// `from == to` returns an identical copy. Either index being out of range
/// is an error and nothing should be applied.
///
/// ```
/// use folio::move_item;
///
/// let moved = move_item(&["a", "b", "c"], 0, 2).unwrap();
/// assert_eq!(moved, vec!["b", "c", "a"]);
/// ```
pub fn move_item<T: Clone>(seq: &[T], from: usize, to: usize) -> Result<Vec<T>, OrderingError> {
    let len = seq.len();
    for index in [from, to] {
        if index >= len {
            return Err(OrderingError::IndexOutOfRange { index, len });
        }
    }

    let mut out = seq.to_vec();
    if from != to {
        let item = out.remove(from);
        out.insert(to, item);
    }
    Ok(out)
}
