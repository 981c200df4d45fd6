use std::f64::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use approx::assert_relative_eq;
use tcseed_bandpass::{
    BandpassConfig, BandpassError, TimeGrid, apply_filter, bandpass, compute_bandpass,
    compute_variance, temporal_variance,
};
use tcseed_lanczos::low_pass_weights;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// `sin(2πt / period)` broadcast over a `ny x nx` grid.
fn sine_grid(nt: usize, ny: usize, nx: usize, period: f64) -> TimeGrid {
    TimeGrid::from_fn((nt, ny, nx), |t, _, _| (2.0 * PI * t as f64 / period).sin())
}

fn seed_index_weights() -> (tcseed_lanczos::FilterWeights, tcseed_lanczos::FilterWeights) {
    (
        low_pass_weights(50, 1.0 / 3.0).unwrap(),
        low_pass_weights(50, 1.0 / 10.0).unwrap(),
    )
}

#[test]
fn constant_grid_scales_by_weight_sum() {
    let c = 3.5;
    let grid = TimeGrid::constant((60, 2, 3), c);
    let w = low_pass_weights(50, 0.1).unwrap();
    let out = apply_filter(&grid, &w);

    let half = w.len() / 2;
    assert_eq!(out.valid_range(), half..60 - half);
    for t in 0..60 {
        for i in 0..2 {
            for j in 0..3 {
                if out.valid_range().contains(&t) {
                    assert_relative_eq!(out.get(t, i, j).unwrap(), c * w.sum(), epsilon = 1e-12);
                } else {
                    assert!(out.is_missing(t, i, j), "t={t} should be missing");
                }
            }
        }
    }
}

#[test]
fn identical_filters_give_zero_variance() {
    let grid = sine_grid(80, 2, 2, 7.0);
    let w = low_pass_weights(21, 0.2).unwrap();
    let band = bandpass(apply_filter(&grid, &w), &apply_filter(&grid, &w)).unwrap();

    for t in band.valid_range() {
        assert_eq!(band.get(t, 0, 0), Some(0.0));
    }
    assert!(band.is_missing(0, 1, 1));
    assert!(band.is_missing(79, 1, 1));

    let map = temporal_variance(&band, 0, false);
    for i in 0..2 {
        for j in 0..2 {
            assert_eq!(map.get(i, j), Some(0.0));
        }
    }
}

#[test]
fn extent_equal_to_window_leaves_one_step() {
    let (high, low) = seed_index_weights();
    let nt = high.len().max(low.len());
    let grid = sine_grid(nt, 2, 2, 5.0);

    let band = compute_bandpass(&grid, &high, &low, &BandpassConfig::default()).unwrap();
    assert_eq!(band.n_valid_times(), 1);
    assert_eq!(band.valid_range(), nt / 2..nt / 2 + 1);

    let map = compute_variance(&grid, &high, &low, &BandpassConfig::default()).unwrap();
    assert_eq!(map.n_valid(), 0);
    assert!(map.summary().is_none());
}

#[test]
fn extent_shorter_than_window_is_all_missing() {
    let (high, low) = seed_index_weights();
    let grid = sine_grid(30, 3, 2, 5.0);

    let map = compute_variance(&grid, &high, &low, &BandpassConfig::default()).unwrap();
    assert_eq!(map.shape(), (3, 2));
    assert!(map.missing_mask().iter().all(|&m| m));
}

/// Counts `WARN` events seen by the subscriber.
struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn short_extent_warns_once() {
    let (high, low) = seed_index_weights();
    let grid = sine_grid(30, 2, 2, 5.0);
    let config = BandpassConfig::default().with_parallel(false);

    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&warnings)));
    tracing::subscriber::with_default(subscriber, || {
        compute_bandpass(&grid, &high, &low, &config).unwrap();
    });
    assert_eq!(warnings.load(Ordering::SeqCst), 1);
}

#[test]
fn five_day_signal_passes_band() {
    let (high, low) = seed_index_weights();
    let config = BandpassConfig::default();
    let grid = sine_grid(100, 2, 2, 5.0);

    let band = compute_bandpass(&grid, &high, &low, &config).unwrap();
    assert_eq!(band.valid_range(), 24..76);
    let peak = band
        .valid_range()
        .filter_map(|t| band.get(t, 0, 0))
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    assert!(peak > 0.8 && peak < 1.2, "band-passed amplitude {peak}");

    let map = compute_variance(&grid, &high, &low, &config).unwrap();
    let reference = map.get(0, 0).unwrap();
    assert!(reference > 0.35 && reference < 0.65, "variance {reference}");
    for i in 0..2 {
        for j in 0..2 {
            assert_relative_eq!(map.get(i, j).unwrap(), reference, epsilon = 1e-12);
        }
    }
}

#[test]
fn signals_outside_band_are_suppressed() {
    let (high, low) = seed_index_weights();
    let config = BandpassConfig::default();

    let variance_at = |period: f64| {
        let grid = sine_grid(100, 1, 1, period);
        compute_variance(&grid, &high, &low, &config)
            .unwrap()
            .get(0, 0)
            .unwrap()
    };

    let in_band = variance_at(5.0);
    let too_slow = variance_at(20.0);
    let too_fast = variance_at(2.5);
    assert!(in_band > 10.0 * too_slow, "{in_band} vs {too_slow}");
    assert!(in_band > 10.0 * too_fast, "{in_band} vs {too_fast}");
}

#[test]
fn serial_and_parallel_agree() {
    let (high, low) = seed_index_weights();
    let grid = TimeGrid::from_fn((90, 3, 4), |t, i, j| {
        (2.0 * PI * t as f64 / 6.0).sin() * (1.0 + i as f64) + 0.1 * j as f64
    });

    let serial = compute_variance(
        &grid,
        &high,
        &low,
        &BandpassConfig::default().with_parallel(false),
    )
    .unwrap();
    let parallel = compute_variance(&grid, &high, &low, &BandpassConfig::default()).unwrap();
    assert_eq!(serial, parallel);
}

#[test]
fn sample_variance_scales_population() {
    let (high, low) = seed_index_weights();
    let grid = sine_grid(100, 1, 1, 6.0);

    let population = compute_variance(&grid, &high, &low, &BandpassConfig::default()).unwrap();
    let sample =
        compute_variance(&grid, &high, &low, &BandpassConfig::default().with_ddof(1)).unwrap();

    // 52 band-passed samples
    let n = 52.0;
    assert_relative_eq!(
        sample.get(0, 0).unwrap(),
        population.get(0, 0).unwrap() * n / (n - 1.0),
        max_relative = 1e-12
    );
}

#[test]
fn invalid_config_rejected() {
    let (high, low) = seed_index_weights();
    let grid = sine_grid(100, 1, 1, 5.0);
    let err = compute_variance(&grid, &high, &low, &BandpassConfig::default().with_ddof(3))
        .unwrap_err();
    assert!(matches!(err, BandpassError::InvalidConfig { .. }));
}
