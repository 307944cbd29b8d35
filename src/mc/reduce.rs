// src/mc/reduce.rs
//! Axis reductions over sample arrays
//!
//! Reductions follow the usual array-framework conventions: axes may be
//! negative (counted from the back), reduced axes are dropped unless
//! `keep_dims` retains them with length 1, and a mean over zero elements is
//! NaN.

use crate::autodiff::Scalar;
use crate::error::{validation::normalize_axis, McError, McResult};
use ndarray::{ArrayD, Axis};
use serde::{Deserialize, Serialize};

/// Axes a reduction runs over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axes {
    /// Every axis
    All,
    /// The listed axes; negative values count from the back
    Indices(Vec<isize>),
}

impl Axes {
    /// The leading sample axis
    pub fn sample() -> Self {
        Axes::Indices(vec![0])
    }

    /// Resolve against an array rank into sorted, distinct axis indices
    pub fn resolve(&self, ndim: usize) -> McResult<Vec<usize>> {
        match self {
            Axes::All => Ok((0..ndim).collect()),
            Axes::Indices(indices) => {
                let mut resolved = Vec::with_capacity(indices.len());
                for &axis in indices {
                    let a = normalize_axis(axis, ndim)?;
                    if resolved.contains(&a) {
                        return Err(McError::InvalidAxis {
                            axis,
                            ndim,
                            reason: "axis listed more than once".to_string(),
                        });
                    }
                    resolved.push(a);
                }
                resolved.sort_unstable();
                Ok(resolved)
            }
        }
    }
}

impl Default for Axes {
    fn default() -> Self {
        Axes::sample()
    }
}

impl From<isize> for Axes {
    fn from(axis: isize) -> Self {
        Axes::Indices(vec![axis])
    }
}

impl From<Vec<isize>> for Axes {
    fn from(axes: Vec<isize>) -> Self {
        Axes::Indices(axes)
    }
}

fn restore_axes<S: Scalar>(mut out: ArrayD<S>, resolved: &[usize], keep_dims: bool) -> ArrayD<S> {
    if keep_dims {
        // Ascending order so each index refers to the final layout
        for &a in resolved {
            out.insert_axis_inplace(Axis(a));
        }
    }
    out
}

/// Mean over `axes`
pub fn reduce_mean<S: Scalar>(values: &ArrayD<S>, axes: &Axes, keep_dims: bool) -> McResult<ArrayD<S>> {
    let resolved = axes.resolve(values.ndim())?;
    let count: usize = resolved.iter().map(|&a| values.len_of(Axis(a))).product();

    let mut out = values.clone();
    for &a in resolved.iter().rev() {
        out = out.sum_axis(Axis(a));
    }

    let inv_count = S::from_f64(1.0 / count as f64);
    out.mapv_inplace(|v| v * inv_count);

    Ok(restore_axes(out, &resolved, keep_dims))
}

/// Max over `axes`; an empty reduction yields `-inf`
///
/// The selected element is returned as is, so its tangent is the tangent of
/// the max. A NaN anywhere along the reduced axes makes the result NaN.
pub fn reduce_max<S: Scalar>(values: &ArrayD<S>, axes: &Axes, keep_dims: bool) -> McResult<ArrayD<S>> {
    let resolved = axes.resolve(values.ndim())?;

    let mut out = values.clone();
    for &a in resolved.iter().rev() {
        out = out.fold_axis(Axis(a), S::from_f64(f64::NEG_INFINITY), |acc, &x| {
            if acc.value().is_nan() {
                *acc
            } else if x.value().is_nan() || x.value() > acc.value() {
                x
            } else {
                *acc
            }
        });
    }

    Ok(restore_axes(out, &resolved, keep_dims))
}

/// Mean over the sample index axis 0
pub fn sample_mean<S: Scalar>(values: &ArrayD<S>) -> McResult<ArrayD<S>> {
    reduce_mean(values, &Axes::sample(), false)
}

/// Max over the sample index axis 0
pub fn sample_max<S: Scalar>(values: &ArrayD<S>) -> McResult<ArrayD<S>> {
    reduce_max(values, &Axes::sample(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autodiff::Dual;
    use ndarray::{arr1, arr2, ArrayD, IxDyn};
    use proptest::prelude::*;

    #[test]
    fn test_sample_mean_and_max() {
        let v = arr2(&[[1.0, 5.0], [3.0, -1.0], [2.0, 2.0]]).into_dyn();
        assert_eq!(sample_mean(&v).unwrap(), arr1(&[2.0, 2.0]).into_dyn());
        assert_eq!(sample_max(&v).unwrap(), arr1(&[3.0, 5.0]).into_dyn());
    }

    #[test]
    fn test_negative_axis_and_keep_dims() {
        let v = arr2(&[[1.0, 3.0], [5.0, 7.0]]).into_dyn();
        let m = reduce_mean(&v, &Axes::from(-1), true).unwrap();
        assert_eq!(m.shape(), &[2, 1]);
        assert_eq!(m, arr2(&[[2.0], [6.0]]).into_dyn());
    }

    #[test]
    fn test_all_axes() {
        let v = arr2(&[[1.0, 2.0], [3.0, 6.0]]).into_dyn();
        let m = reduce_mean(&v, &Axes::All, false).unwrap();
        assert_eq!(m.ndim(), 0);
        assert_eq!(m[IxDyn(&[])], 3.0);

        let kept = reduce_max(&v, &Axes::All, true).unwrap();
        assert_eq!(kept.shape(), &[1, 1]);
        assert_eq!(kept[IxDyn(&[0, 0])], 6.0);
    }

    #[test]
    fn test_invalid_axes() {
        let v = arr1(&[1.0, 2.0]).into_dyn();
        assert!(matches!(
            reduce_mean(&v, &Axes::from(1), false),
            Err(McError::InvalidAxis { .. })
        ));
        assert!(matches!(
            reduce_mean(&v, &Axes::from(vec![0, -1]), false),
            Err(McError::InvalidAxis { .. })
        ));
    }

    #[test]
    fn test_empty_axis() {
        let v = ArrayD::<f64>::zeros(IxDyn(&[0, 3]));
        let m = sample_mean(&v).unwrap();
        assert!(m.iter().all(|x| x.is_nan()));
        let mx = sample_max(&v).unwrap();
        assert!(mx.iter().all(|&x| x == f64::NEG_INFINITY));
    }

    #[test]
    fn test_max_propagates_nan() {
        let v = arr2(&[[1.0, f64::NAN], [f64::NAN, f64::NAN], [3.0, 2.0]]).into_dyn();
        let mx = sample_max(&v).unwrap();
        assert!(mx.iter().all(|x| x.is_nan()));

        let with_nan = arr2(&[[1.0, 4.0], [3.0, f64::NAN]]).into_dyn();
        let mx = reduce_max(&with_nan, &Axes::from(-1), false).unwrap();
        assert_eq!(mx[IxDyn(&[0])], 4.0);
        assert!(mx[IxDyn(&[1])].is_nan());
    }

    #[test]
    fn test_max_tangent_follows_argmax() {
        let v = arr1(&[Dual::new(1.0, 10.0), Dual::new(4.0, 20.0), Dual::new(2.0, 30.0)]).into_dyn();
        let mx = sample_max(&v).unwrap();
        assert_eq!(mx[IxDyn(&[])], Dual::new(4.0, 20.0));
    }

    #[test]
    fn test_mean_tangent_is_mean_of_tangents() {
        let v = arr1(&[Dual::new(1.0, 1.0), Dual::new(3.0, 3.0)]).into_dyn();
        let m = sample_mean(&v).unwrap();
        assert_eq!(m[IxDyn(&[])], Dual::new(2.0, 2.0));
    }

    proptest! {
        #[test]
        fn prop_mean_of_constant_is_constant(
            rows in 1usize..8,
            cols in 1usize..8,
            c in -1.0e6f64..1.0e6,
        ) {
            let v = ArrayD::from_elem(IxDyn(&[rows, cols]), c);
            let m = reduce_mean(&v, &Axes::All, false).unwrap();
            let got = m[IxDyn(&[])];
            prop_assert!((got - c).abs() <= 1e-9 * c.abs().max(1.0));
        }

        #[test]
        fn prop_keep_dims_preserves_rank(
            shape in proptest::collection::vec(1usize..4, 1..4),
            axis_seed in 0usize..16,
        ) {
            let ndim = shape.len();
            let axis = (axis_seed % ndim) as isize;
            let v = ArrayD::from_elem(IxDyn(&shape), 1.0f64);

            let kept = reduce_mean(&v, &Axes::from(axis), true).unwrap();
            prop_assert_eq!(kept.ndim(), ndim);
            prop_assert_eq!(kept.len_of(Axis(axis as usize)), 1);

            let dropped = reduce_max(&v, &Axes::from(axis), false).unwrap();
            prop_assert_eq!(dropped.ndim(), ndim - 1);
        }
    }
}
