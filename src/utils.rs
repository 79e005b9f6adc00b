/// Elementwise, unweighted mean of a set of equally long value vectors.
///
/// Returns an empty vector if `values` is empty.
pub fn mean_of_values(values: &[&[f64]]) -> Vec<f64> {
    let Some(first) = values.first() else {
        return Vec::new();
    };
    let mut acc = vec![0.0_f64; first.len()];
    for v in values {
        for (a, x) in acc.iter_mut().zip(v.iter()) {
            *a += *x;
        }
    }
    let n = values.len() as f64;
    acc.iter_mut().for_each(|a| *a /= n);
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_values() {
        let a = [1.0, 10.0];
        let b = [9.0, 20.0];
        let c = [2.0, 0.0];
        assert_eq!(mean_of_values(&[&a, &b, &c]), vec![4.0, 10.0]);
        assert_eq!(mean_of_values(&[&a]), vec![1.0, 10.0]);
        assert!(mean_of_values(&[]).is_empty());
    }
}
