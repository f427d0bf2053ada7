/// Category labels for quartile charts.
pub const QUARTILE_LABELS: [&str; 4] = [
    "Quartile One",
    "Quartile Two",
    "Quartile Three",
    "Quartile Four",
];

/// Sizes of four contiguous groups covering `len` items.
///
/// Sizes differ by at most one; the `len % 4` remainder goes to the earliest groups.
pub fn quartile_sizes(len: usize) -> [usize; 4] {
    let base = len / 4;
    let remainder = len % 4;
    let mut sizes = [base; 4];
    for size in sizes.iter_mut().take(remainder) {
        *size += 1;
    }
    sizes
}

/// Splits a slice, already sorted by the comparison value, into four quartiles.
pub fn quartiles<T>(sorted: &[T]) -> [&[T]; 4] {
    let sizes = quartile_sizes(sorted.len());
    let (first, rest) = sorted.split_at(sizes[0]);
    let (second, rest) = rest.split_at(sizes[1]);
    let (third, fourth) = rest.split_at(sizes[2]);
    [first, second, third, fourth]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_goes_to_earliest_groups() {
        assert_eq!(quartile_sizes(10), [3, 3, 2, 2]);
        assert_eq!(quartile_sizes(8), [2, 2, 2, 2]);
        assert_eq!(quartile_sizes(3), [1, 1, 1, 0]);
        assert_eq!(quartile_sizes(0), [0, 0, 0, 0]);
    }

    #[test]
    fn quartiles_keep_order() {
        let records: Vec<u32> = (1..=10).collect();
        let [q1, q2, q3, q4] = quartiles(&records);
        assert_eq!(q1, &[1, 2, 3]);
        assert_eq!(q2, &[4, 5, 6]);
        assert_eq!(q3, &[7, 8]);
        assert_eq!(q4, &[9, 10]);
    }
}
