//! Small numeric helpers for post-aggregation columns.

use std::collections::HashMap;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// 1-based ranks with ties sharing the mean of their positions.
pub fn average_ranks(values: &[f64], ascending: bool) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|a, b| {
        let ordering = values[*a].total_cmp(&values[*b]);
        if ascending { ordering } else { ordering.reverse() }
    });
    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start+1 ..= end
        let rank = (start + 1 + end) as f64 / 2.0;
        for idx in &order[start..end] {
            ranks[*idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Row indices per group key, in first-seen key order.
pub fn group_indices(groups: &[Option<String>]) -> Vec<(Option<String>, Vec<usize>)> {
    let mut position: HashMap<Option<&str>, usize> = HashMap::new();
    let mut out: Vec<(Option<String>, Vec<usize>)> = Vec::new();
    for (idx, group) in groups.iter().enumerate() {
        let slot = *position.entry(group.as_deref()).or_insert_with(|| {
            out.push((group.clone(), Vec::new()));
            out.len() - 1
        });
        out[slot].1.push(idx);
    }
    out
}

/// Average ranks computed separately inside each group. Null values get no rank.
pub fn ranks_within(
    groups: &[Option<String>],
    values: &[Option<f64>],
    ascending: bool,
) -> Vec<Option<f64>> {
    let mut ranks = vec![None; values.len()];
    for (_, indices) in group_indices(groups) {
        let present: Vec<usize> = indices.into_iter().filter(|i| values[*i].is_some()).collect();
        let group_values: Vec<f64> = present.iter().filter_map(|i| values[*i]).collect();
        for (idx, rank) in present.iter().zip(average_ranks(&group_values, ascending)) {
            ranks[*idx] = Some(rank);
        }
    }
    ranks
}

/// Quantile with linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Pearson correlation; undefined below two points or with zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Percentage change from the previous value; the first value has none.
pub fn pct_change(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        let previous = idx.checked_sub(1).and_then(|p| values[p]);
        out.push(match (previous, value) {
            (Some(prev), Some(current)) if prev != 0.0 => Some((current - prev) / prev * 100.0),
            _ => None,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_share_average_rank() {
        assert_eq!(average_ranks(&[3.0, 1.0, 3.0, 2.0], true), vec![3.5, 1.0, 3.5, 2.0]);
        assert_eq!(average_ranks(&[3.0, 1.0, 2.0], false), vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn ranks_restart_per_group() {
        let groups = vec![
            Some("A".to_string()),
            Some("B".to_string()),
            Some("A".to_string()),
            Some("B".to_string()),
        ];
        let values = vec![Some(5.0), Some(1.0), Some(4.0), None];
        assert_eq!(
            ranks_within(&groups, &values, true),
            vec![Some(2.0), Some(1.0), Some(1.0), None]
        );
    }

    #[test]
    fn quantile_interpolates() {
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.5), Some(2.5));
        assert_eq!(quantile(&[7.0], 0.33), Some(7.0));
        assert_eq!(quantile(&[], 0.5), None);
        let q = quantile(&[1.0, 2.0, 3.0], 0.33).unwrap();
        assert!((q - 1.66).abs() < 1e-12);
    }

    #[test]
    fn pearson_detects_linear_relation() {
        let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[1.0, 1.0], &[2.0, 3.0]), None);
    }

    #[test]
    fn pct_change_skips_first_and_gaps() {
        assert_eq!(
            pct_change(&[Some(4.0), Some(5.0), None, Some(6.0)]),
            vec![None, Some(25.0), None, None]
        );
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(11.111_111, 3), 11.111);
        assert_eq!(round_to(2.345_6, 2), 2.35);
    }
}
