// Collapses a viewport listing to one representative comment per point.

use std::collections::HashSet;

use crate::domain::entities::Comment;

/// Keeps the first comment seen at each distinct point, in encounter order.
///
/// The input is expected oldest-first, so each survivor is the earliest
/// comment at its location.
pub fn dedupe_by_location(comments: Vec<Comment>) -> Vec<Comment> {
    let mut seen = HashSet::with_capacity(comments.len());
    comments
        .into_iter()
        .filter(|comment| seen.insert(comment.point.location_key()))
        .collect()
}
