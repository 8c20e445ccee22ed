pub fn mean_ms(data: &[u64]) -> Option<f64> {
    let sum = data.iter().map(|&ms| ms as f64).sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

pub fn std_dev_ms(data: &[u64]) -> Option<f64> {
    match (mean_ms(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|&value| {
                    let diff = data_mean - value as f64;

                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}
