//! End-to-end properties of the three engines.

use approx::assert_relative_eq;
use edustat::EngineError;
use edustat::frequency::{Technique, build_frequency_table, sort_observations};
use edustat::linear::{
    CorrelationStrength, DataPoint, Direction, fit_linear, interpret_correlation, predict_y,
};
use edustat::logistic::{
    BinaryLabel, LabeledPoint, LogisticOptions, calculate_confusion_matrix, fit_logistic,
    predict_probability,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn points(data: &[(f64, f64)]) -> Vec<DataPoint> {
    data.iter().copied().map(DataPoint::from).collect()
}

fn separable() -> Vec<LabeledPoint> {
    (1..=10)
        .map(|x| LabeledPoint::new(x as f64, BinaryLabel::from(x >= 5)))
        .collect()
}

#[test]
fn linear_refit_is_deterministic() {
    init_tracing();
    let data = points(&[(1.2, 3.4), (2.5, 4.1), (3.1, 6.0), (4.8, 7.7), (5.0, 8.9)]);
    assert_eq!(fit_linear(&data).unwrap(), fit_linear(&data).unwrap());
}

#[test]
fn perfect_linear_fit() {
    init_tracing();
    let data = points(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
    let result = fit_linear(&data).unwrap();

    assert_eq!(result.b1, 2.0);
    assert_eq!(result.b0, 0.0);
    assert_eq!(result.r, 1.0);
    for p in &data {
        assert_relative_eq!(predict_y(p.x, result.b0, result.b1), p.y);
    }

    let reading = interpret_correlation(result.r);
    assert_eq!(reading.strength, CorrelationStrength::Perfect);
    assert_eq!(reading.direction, Direction::Positive);
}

#[test]
fn correlation_scale_readings() {
    let reading = interpret_correlation(-0.95);
    assert_eq!(reading.strength, CorrelationStrength::VeryStrong);
    assert_eq!(reading.direction, Direction::Negative);
}

#[test]
fn constant_x_is_degenerate() {
    let data = points(&[(5.0, 1.0), (5.0, 2.0), (5.0, 3.0)]);
    assert!(matches!(
        fit_linear(&data),
        Err(EngineError::DegenerateInput { .. })
    ));
}

#[test]
fn separable_logistic_fit() {
    init_tracing();
    let data = separable();
    let result = fit_logistic(&data, &LogisticOptions::default()).unwrap();

    assert!(result.b1 > 1.0, "b1 = {}", result.b1);
    // the 0.5 crossing lies between the last negative and the first positive
    // with some slack for the unconverged fit
    let boundary = -result.b0 / result.b1;
    assert!(boundary > 3.0 && boundary < 6.0, "boundary = {boundary}");
    assert!(predict_probability(4.0, result.b0, result.b1) < 0.5);
    assert!(predict_probability(6.0, result.b0, result.b1) > 0.5);
}

#[test]
fn all_positive_logistic_input_is_single_class() {
    let data: Vec<LabeledPoint> = (0..4)
        .map(|x| LabeledPoint::new(x as f64, BinaryLabel::Positive))
        .collect();
    assert_eq!(
        fit_logistic(&data, &LogisticOptions::default()),
        Err(EngineError::SingleClass { label: 1 })
    );
}

#[test]
fn confusion_counts_sum_to_n() {
    let data = separable();
    let result = fit_logistic(&data, &LogisticOptions::default()).unwrap();
    for step in 0..=20 {
        let threshold = step as f64 / 20.0;
        let matrix = calculate_confusion_matrix(&data, result.b0, result.b1, threshold);
        assert_eq!(matrix.total(), data.len());
    }
}

#[test]
fn simple_inspection_table() {
    init_tracing();
    let data = sort_observations(&[3.0, 1.0, 3.0, 2.0, 1.0, 3.0]).unwrap();
    let table = build_frequency_table(&data, Technique::SimpleInspection).unwrap();

    assert_eq!(table.len(), 3);
    let absolute: Vec<usize> = table.iter().map(|r| r.absolute_freq).collect();
    let cumulative: Vec<usize> = table.iter().map(|r| r.cumulative_absolute).collect();
    assert_eq!(absolute, vec![2, 1, 3]);
    assert_eq!(cumulative, vec![2, 3, 6]);
}

#[test]
fn grouped_tables_partition_the_data() {
    init_tracing();
    let raw = [
        12.0, 15.5, 9.25, 22.0, 18.75, 11.0, 14.5, 20.0, 16.25, 13.0, 17.5, 19.0, 10.5, 21.25,
        15.0, 12.75,
    ];
    let data = sort_observations(&raw).unwrap();
    let (min, max) = (data[0], data[data.len() - 1]);

    for technique in [
        Technique::Sturges,
        Technique::MaxInteger,
        Technique::Arbitrary { classes: 3 },
        Technique::Arbitrary { classes: 7 },
    ] {
        let table = build_frequency_table(&data, technique).unwrap();

        assert!(table[0].lim_inf <= min, "{technique:?}");
        assert!(table[table.len() - 1].lim_sup > max, "{technique:?}");
        for pair in table.windows(2) {
            assert_eq!(pair[0].lim_sup, pair[1].lim_inf, "{technique:?}");
        }
        let total: usize = table.iter().map(|r| r.absolute_freq).sum();
        assert_eq!(total, data.len(), "{technique:?}");
        let last = &table[table.len() - 1];
        assert_eq!(last.cumulative_absolute, data.len());
        assert_relative_eq!(last.cumulative_relative, 1.0, epsilon = 1e-4);
    }
}
