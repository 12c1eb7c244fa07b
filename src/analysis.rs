//! Plot preparation helpers over simulated trajectories.
//!
//! Rendering lives outside this crate; these functions produce the series a
//! plotting front end draws.

use ndarray::{Array2, Axis};

use crate::trajectory::TrajectoryResult;

/// Min–max rescale into `[-1, 1]`.
///
/// A constant (or empty) input has no range and maps to all `-1`.
pub fn normalize_unit_range(values: &[f64]) -> Vec<f64> {
    let (min, max) = bounds(values.iter().copied());
    values.iter().map(|&v| rescale(v, min, max)).collect()
}

/// Rescale every column of `matrix` into `[-1, 1]` independently.
pub fn normalize_columns(matrix: &Array2<f64>) -> Array2<f64> {
    let mut out = matrix.clone();
    for mut column in out.axis_iter_mut(Axis(1)) {
        let (min, max) = bounds(column.iter().copied());
        column.mapv_inplace(|v| rescale(v, min, max));
    }
    out
}

/// Rescale the whole matrix into `[-1, 1]` using its global range.
pub fn normalize_matrix(matrix: &Array2<f64>) -> Array2<f64> {
    let (min, max) = bounds(matrix.iter().copied());
    matrix.mapv(|v| rescale(v, min, max))
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn rescale(v: f64, min: f64, max: f64) -> f64 {
    if max > min {
        2.0 * ((v - min) / (max - min)) - 1.0
    } else {
        -1.0
    }
}

/// The dimension whose normalised series has the highest mean.
#[derive(Clone, Debug, PartialEq)]
pub struct DominantDimension {
    /// Column index in the trajectory's dimension ordering.
    pub index: usize,
    /// Display name: the dimension label up to its first `#`.
    pub name: String,
    /// Mean of the normalised column.
    pub mean: f64,
}

/// Find the dimension with the highest average after normalising the whole
/// matrix to `[-1, 1]`.
///
/// Returns `None` for an empty trajectory. Ties go to the first column.
pub fn highest_average_dimension(result: &TrajectoryResult) -> Option<DominantDimension> {
    if result.is_empty() || result.dimensions.is_empty() {
        return None;
    }
    let means = normalize_matrix(&result.simulation).mean_axis(Axis(0))?;

    let mut best: Option<(usize, f64)> = None;
    for (i, &m) in means.iter().enumerate() {
        match best {
            Some((_, b)) if m <= b => {}
            _ => best = Some((i, m)),
        }
    }
    let (index, mean) = best?;
    let label = result.dimensions.names().get(index)?;
    let name = label.split('#').next().unwrap_or(label).to_owned();
    Some(DominantDimension { index, name, mean })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::DimensionSet;
    use ndarray::array;

    fn approx(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-12)
    }

    #[test]
    fn unit_range_rescale() {
        assert!(approx(&normalize_unit_range(&[0.0, 5.0, 10.0]), &[-1.0, 0.0, 1.0]));
        assert!(approx(&normalize_unit_range(&[3.0, 3.0]), &[-1.0, -1.0]));
        assert!(normalize_unit_range(&[]).is_empty());
    }

    #[test]
    fn columns_rescale_independently() {
        let m = array![[0.0, 10.0], [1.0, 30.0]];
        let n = normalize_columns(&m);
        assert_eq!(n, array![[-1.0, -1.0], [1.0, 1.0]]);
    }

    #[test]
    fn dominant_dimension_strips_tag() {
        let result = TrajectoryResult {
            subject: "alice".into(),
            texts: vec!["a".into(), "a".into()],
            simulation: array![[0.0, 0.9], [0.1, 1.0]],
            dimensions: DimensionSet::from_names(["ATTITUDE#joy", "TEMPER#calmness"]),
            failure: None,
        };
        let dominant = highest_average_dimension(&result).unwrap();
        assert_eq!(dominant.index, 1);
        assert_eq!(dominant.name, "TEMPER");
        assert!(dominant.mean > 0.0);
    }

    #[test]
    fn empty_trajectory_has_no_dominant_dimension() {
        let result = TrajectoryResult {
            subject: "bob".into(),
            texts: Vec::new(),
            simulation: Array2::zeros((0, 2)),
            dimensions: DimensionSet::from_names(["A", "B"]),
            failure: None,
        };
        assert!(highest_average_dimension(&result).is_none());
    }
}
