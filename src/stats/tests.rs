use super::*;

const SAMPLE: [f64; 17] = [
    20.69424224,
    82.70249213,
    15.97904565,
    62.43902949,
    64.58867298,
    46.06848044,
    66.44973931,
    94.01121918,
    8.814351706,
    16.35090148,
    77.28782068,
    92.77535333,
    52.02176958,
    5.203382676,
    58.98593825,
    4.340973592,
    24.36451039,
];

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-8,
        "expected {}, got {}",
        expected,
        actual
    );
}

fn feed<S: Statistic>(mut stat: S) -> S {
    stat.add_all(SAMPLE);
    stat
}

#[test]
fn test_sample_statistics() {
    assert_close(feed(Sum::new()).value(), 793.077923104);
    assert_close(feed(Mean::new()).value(), 46.65164253552941);
    assert_close(feed(Min::new()).value(), 4.340973592);
    assert_close(feed(Max::new()).value(), 94.01121918);
    assert_close(feed(Variance::new()).value(), 982.6299605689119);
    assert_close(feed(StdDev::new()).value(), 31.346929045265533);
    assert_close(feed(Median::new()).value(), 52.02176958);
}

#[test]
fn test_mean_abs_dev() {
    let mad = feed(MeanAbsDev::with_capacity(SAMPLE.len()));
    assert_eq!(mad.count(), 17);
    assert_close(mad.value(), 27.22320613);
}

#[test]
fn test_mean_abs_dev_grows_beyond_capacity() {
    let mut mad = MeanAbsDev::with_capacity(2);
    assert_eq!(mad.add_all(SAMPLE), 17);
    assert_close(mad.value(), 27.22320613);
}

#[test]
fn test_empty_and_single_value() {
    assert!(Mean::new().value().is_nan());
    assert!(Sum::new().value().is_nan());
    assert!(Median::new().value().is_nan());
    assert!(MeanAbsDev::new().value().is_nan());

    let mut mad = MeanAbsDev::new();
    mad.add(42.0);
    assert_eq!(mad.value(), 0.0);

    let mut variance = Variance::new();
    variance.add(42.0);
    assert!(variance.value().is_nan());
}

#[test]
fn test_nan_is_ignored() {
    let mut mean = Mean::new();
    assert_eq!(mean.add(1.0), 1);
    assert_eq!(mean.add(f64::NAN), 1);
    assert_eq!(mean.add(3.0), 2);
    assert_eq!(mean.value(), 2.0);
}

#[test]
fn test_median_even_count() {
    let mut median = Median::new();
    median.add_all([4.0, 1.0, 3.0, 2.0]);
    assert_eq!(median.value(), 2.5);
}

#[test]
fn test_reset() {
    let mut stat = feed(MeanAbsDev::new());
    stat.reset();
    assert_eq!(stat.count(), 0);
    assert!(stat.value().is_nan());

    let mut min = feed(Min::new());
    min.reset();
    min.add(100.0);
    assert_eq!(min.value(), 100.0);
}

#[test]
fn test_copy_is_independent() {
    let mut original = Mean::new();
    original.add_all([1.0, 2.0]);
    let mut copy = original.copy();
    copy.add(9.0);

    assert_eq!(original.count(), 2);
    assert_eq!(original.value(), 1.5);
    assert_eq!(copy.count(), 3);
    assert_eq!(copy.value(), 4.0);

    let mut mad = MeanAbsDev::new();
    mad.add_all([1.0, 3.0]);
    let mut mad_copy = mad.copy();
    mad_copy.reset();
    assert_eq!(mad.value(), 1.0);
}

#[test]
fn test_stat_types() {
    assert_eq!(Sum::new().stat_type(), StatType::Sum);
    assert_eq!(MeanAbsDev::new().stat_type(), StatType::Mad);
    assert_eq!(StatType::StdDev.to_string(), "STD_DEV");
}
