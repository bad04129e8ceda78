use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

/// Contiguous share of `num_neurons` handled by thread `thread_id`. The first
/// `num_neurons % num_threads` partitions get one extra neuron.
pub fn get_partition_range(
    num_threads: usize,
    thread_id: usize,
    num_neurons: usize,
) -> Range<usize> {
    let min_partition_size = num_neurons / num_threads;
    let remainder = num_neurons % num_threads;

    let start = if thread_id < remainder {
        (min_partition_size + 1) * thread_id
    } else {
        (min_partition_size + 1) * remainder + min_partition_size * (thread_id - remainder)
    };

    let partition_size = if thread_id < remainder {
        min_partition_size + 1
    } else {
        min_partition_size
    };

    start..start + partition_size
}

pub fn calculate_hash<T: Hash>(t: &T) -> u64 {
    let mut s = DefaultHasher::new();
    t.hash(&mut s);
    s.finish()
}

pub fn is_strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

#[cfg(test)]
pub mod test_util {
    use float_cmp::{assert_approx_eq, ApproxEq};
    use std::fmt::Debug;

    pub fn assert_approx_eq_slice<T>(left: &[T], right: &[T])
    where
        T: ApproxEq + Debug + Copy,
    {
        assert_eq!(left.len(), right.len());

        for item in left.iter().zip(right) {
            assert_approx_eq!(T, *item.0, *item.1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_range() {
        assert_eq!(get_partition_range(1, 0, 784), 0..784);

        assert_eq!(get_partition_range(3, 0, 784), 0..262);
        assert_eq!(get_partition_range(3, 1, 784), 262..523);
        assert_eq!(get_partition_range(3, 2, 784), 523..784);

        assert_eq!(get_partition_range(4, 0, 2), 0..1);
        assert_eq!(get_partition_range(4, 1, 2), 1..2);
        assert_eq!(get_partition_range(4, 2, 2), 2..2);
        assert_eq!(get_partition_range(4, 3, 2), 2..2);
    }

    #[test]
    fn partitions_cover_all_neurons() {
        for num_threads in 1..9 {
            let mut next_start = 0;
            for thread_id in 0..num_threads {
                let range = get_partition_range(num_threads, thread_id, 100);
                assert_eq!(range.start, next_start);
                next_start = range.end;
            }
            assert_eq!(next_start, 100);
        }
    }

    #[test]
    fn strictly_increasing() {
        assert!(is_strictly_increasing(&[]));
        assert!(is_strictly_increasing(&[1.0]));
        assert!(is_strictly_increasing(&[1.0, 1.5, 3.0]));
        assert!(!is_strictly_increasing(&[1.0, 1.0]));
        assert!(!is_strictly_increasing(&[2.0, 1.0]));
    }

    #[test]
    fn hash_is_deterministic() {
        let key = (0u64, 1usize, 2usize);
        assert_eq!(calculate_hash(&key), calculate_hash(&(0u64, 1usize, 2usize)));
        assert_ne!(calculate_hash(&key), calculate_hash(&(0u64, 2usize, 1usize)));
    }
}
