use serde::Serialize;

use crate::vectorizer::SparseVector;

/// One entry of a ranking result.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedDocument {
    pub id: String,
    pub score: f32,
}

/// Scores every row of the matrix against the query and returns the full
/// corpus ordered by descending cosine similarity. The sort is stable, so
/// equal scores keep their original corpus order.
///
/// Rows and queries are unit length (or zero), so the sparse dot product is
/// the cosine; a zero vector on either side scores 0 for every pairing.
pub fn rank(
    query: &SparseVector,
    matrix: &[SparseVector],
    ids: &[String],
) -> Vec<RankedDocument> {
    let mut ranked: Vec<RankedDocument> = ids
        .iter()
        .zip(matrix)
        .map(|(id, row)| RankedDocument {
            id: id.clone(),
            score: dot(query, row),
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Dot product of two sparse vectors via a merge walk over their strictly
/// ascending column indices.
fn dot(a: &SparseVector, b: &SparseVector) -> f32 {
    let mut sum = 0.0;
    let mut a_iter = a.iter().peekable();
    let mut b_iter = b.iter().peekable();

    while let (Some(&&(a_column, a_weight)), Some(&&(b_column, b_weight))) =
        (a_iter.peek(), b_iter.peek())
    {
        match a_column.cmp(&b_column) {
            std::cmp::Ordering::Less => {
                a_iter.next();
            }
            std::cmp::Ordering::Greater => {
                b_iter.next();
            }
            std::cmp::Ordering::Equal => {
                sum += a_weight * b_weight;
                a_iter.next();
                b_iter.next();
            }
        }
    }

    sum
}
