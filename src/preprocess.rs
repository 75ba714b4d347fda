//! Column-wise input preprocessing. Rows are training examples, columns are
//! features; every column is handled independently on the rayon pool.
//!
//! Nothing here is applied by [`Network::learn`](crate::nn::Network::learn),
//! callers preprocess their own matrices.

use rayon::prelude::*;

use crate::error::{Error, Result};

/// Min-max scales every column into `[0, 1]`. Constant columns become 0.
pub fn scale<R: AsRef<[f64]> + Sync>(inputs: &[R]) -> Result<Vec<Vec<f64>>> {
  let width = row_width(inputs)?;

  let columns: Vec<Vec<f64>> = (0..width)
    .into_par_iter()
    .map(|col| {
      let (min, max) = column(inputs, col)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)));
      let range = max - min;

      column(inputs, col)
        .map(|x| if range > 0.0 { (x - min) / range } else { 0.0 })
        .collect()
    })
    .collect();

  Ok(transpose(columns, inputs.len()))
}

/// Standardizes every column to zero mean and unit (population) standard
/// deviation. Columns with no spread become 0.
pub fn normalize<R: AsRef<[f64]> + Sync>(inputs: &[R]) -> Result<Vec<Vec<f64>>> {
  let width = row_width(inputs)?;
  let rows = inputs.len() as f64;

  let columns: Vec<Vec<f64>> = (0..width)
    .into_par_iter()
    .map(|col| {
      let mean = column(inputs, col).sum::<f64>() / rows;
      let variance = column(inputs, col)
        .map(|x| (x - mean).powi(2))
        .sum::<f64>() / rows;
      let std_dev = variance.sqrt();

      column(inputs, col)
        .map(|x| if std_dev > 0.0 { (x - mean) / std_dev } else { 0.0 })
        .collect()
    })
    .collect();

  Ok(transpose(columns, inputs.len()))
}

fn row_width<R: AsRef<[f64]>>(inputs: &[R]) -> Result<usize> {
  let width = match inputs.first() {
    Some(row) => row.as_ref().len(),
    None => return Err(Error::invalid("input matrix cannot be empty"))
  };
  if width == 0 {
    return Err(Error::invalid("input rows cannot be empty"));
  }
  if inputs.iter().any(|row| row.as_ref().len() != width) {
    return Err(Error::invalid("input matrix must be rectangular"));
  }
  Ok(width)
}

#[inline]
fn column<R: AsRef<[f64]>>(inputs: &[R], col: usize) -> impl Iterator<Item = f64> + '_ {
  inputs.iter().map(move |row| row.as_ref()[col])
}

fn transpose(columns: Vec<Vec<f64>>, row_count: usize) -> Vec<Vec<f64>> {
  (0..row_count)
    .map(|row| columns.iter().map(|col| col[row]).collect())
    .collect()
}

#[cfg(test)]
mod test_preprocess {
  use super::*;

  const EPS: f64 = 1e-12;

  #[test]
  fn test_preprocess_scale() {
    let inputs = [[2.0, 10.0], [4.0, 10.0], [6.0, 10.0]];
    let scaled = scale(&inputs).unwrap();

    assert_eq!(scaled, vec![vec![0.0, 0.0], vec![0.5, 0.0], vec![1.0, 0.0]]);
  }

  #[test]
  fn test_preprocess_scale_keeps_first_row() {
    let inputs = vec![vec![5.0], vec![1.0], vec![3.0]];
    let scaled = scale(&inputs).unwrap();

    assert_eq!(scaled[0], vec![1.0]);
    assert_eq!(scaled[1], vec![0.0]);
  }

  #[test]
  fn test_preprocess_normalize() {
    let inputs = [[1.0, 7.0], [3.0, 7.0]];
    let normalized = normalize(&inputs).unwrap();

    assert!((normalized[0][0] + 1.0).abs() < EPS);
    assert!((normalized[1][0] - 1.0).abs() < EPS);
    assert_eq!(normalized[0][1], 0.0);
    assert_eq!(normalized[1][1], 0.0);
  }

  #[test]
  fn test_preprocess_normalize_zero_mean() {
    let inputs = [[0.0], [1.0], [1.0], [4.0], [9.0]];
    let normalized = normalize(&inputs).unwrap();
    let mean = normalized.iter().map(|row| row[0]).sum::<f64>() / 5.0;
    let variance = normalized.iter().map(|row| row[0].powi(2)).sum::<f64>() / 5.0;

    assert!(mean.abs() < EPS);
    assert!((variance - 1.0).abs() < 1e-9);
  }

  #[test]
  fn test_preprocess_rejects_bad_matrices() {
    let empty: [[f64; 2]; 0] = [];
    let ragged = vec![vec![1.0, 2.0], vec![3.0]];
    let no_columns: Vec<Vec<f64>> = vec![vec![]];

    assert!(matches!(scale(&empty), Err(Error::InvalidArgument(_))));
    assert!(matches!(normalize(&ragged), Err(Error::InvalidArgument(_))));
    assert!(matches!(scale(&no_columns), Err(Error::InvalidArgument(_))));
  }
}
