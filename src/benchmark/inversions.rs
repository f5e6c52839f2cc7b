//! Inversion counting: the minimum number of adjacent swaps that sorts a list.

/// Pairs `i < j` with `values[i] > values[j]`, by merge sort in O(n log n).
///
/// Equal keys are not inversions.
pub fn count_inversions<T: PartialOrd + Copy>(values: &[T]) -> u64 {
    let mut buf = values.to_vec();
    let mut scratch = Vec::with_capacity(buf.len());
    sort_and_count(&mut buf, &mut scratch)
}

/// Quadratic reference count, kept for cross-checking.
pub fn count_inversions_naive<T: PartialOrd>(values: &[T]) -> u64 {
    let mut count = 0;
    for i in 0..values.len() {
        for j in i + 1..values.len() {
            if values[i] > values[j] {
                count += 1;
            }
        }
    }
    count
}

/// Largest possible inversion count for `n` items.
pub fn max_inversions(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}

fn sort_and_count<T: PartialOrd + Copy>(values: &mut [T], scratch: &mut Vec<T>) -> u64 {
    if values.len() < 2 {
        return 0;
    }
    let mid = values.len() / 2;
    let mut count = sort_and_count(&mut values[..mid], scratch);
    count += sort_and_count(&mut values[mid..], scratch);

    scratch.clear();
    let (mut i, mut j) = (0, mid);
    while i < mid && j < values.len() {
        if values[i] <= values[j] {
            scratch.push(values[i]);
            i += 1;
        } else {
            scratch.push(values[j]);
            count += (mid - i) as u64;
            j += 1;
        }
    }
    scratch.extend_from_slice(&values[i..mid]);
    scratch.extend_from_slice(&values[j..]);
    values.copy_from_slice(&scratch[..]);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_and_reversed_extremes() {
        assert_eq!(count_inversions(&[1, 2, 2, 3]), 0);
        assert_eq!(count_inversions(&[5, 4, 3, 2, 1]), max_inversions(5));
        assert_eq!(count_inversions::<u32>(&[]), 0);
        assert_eq!(max_inversions(0), 0);
        assert_eq!(max_inversions(1), 0);
    }

    #[test]
    fn merge_count_agrees_with_naive() {
        let mut state = 0x2545_f491_u64;
        for len in 0..40 {
            let values: Vec<u32> = (0..len)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    (state % 7) as u32
                })
                .collect();
            assert_eq!(
                count_inversions(&values),
                count_inversions_naive(&values),
                "values={values:?}"
            );
        }
    }
}
