use chrono::{Datelike, NaiveDate};
use crmsynth_generate::GenerationError;
use crmsynth_generate::distributions::{bounded_lognormal, date_in_range, weighted_choice};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn weighted_choice_rejects_malformed_tables() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let options = ["a", "b"];

    let mismatch = weighted_choice(&options, &[1.0], &mut rng);
    assert!(matches!(mismatch, Err(GenerationError::InvalidDistribution(_))));

    let zero = weighted_choice(&options, &[0.0, 0.0], &mut rng);
    assert!(matches!(zero, Err(GenerationError::InvalidDistribution(_))));

    let negative = weighted_choice(&options, &[-1.0, 0.5], &mut rng);
    assert!(matches!(negative, Err(GenerationError::InvalidDistribution(_))));

    let empty: [&str; 0] = [];
    let none = weighted_choice(&empty, &[], &mut rng);
    assert!(matches!(none, Err(GenerationError::InvalidDistribution(_))));
}

#[test]
fn weighted_choice_accepts_unnormalized_weights() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let options = ["never", "always"];
    for _ in 0..200 {
        let picked = weighted_choice(&options, &[0.0, 7.5], &mut rng).expect("choice");
        assert_eq!(*picked, "always");
    }

    let mut heavy = 0;
    for _ in 0..2_000 {
        if *weighted_choice(&options, &[1.0, 3.0], &mut rng).expect("choice") == "always" {
            heavy += 1;
        }
    }
    assert!((1_300..1_700).contains(&heavy), "heavy option drawn {heavy} times");
}

#[test]
fn bounded_lognormal_clamps_to_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..100 {
        assert_eq!(bounded_lognormal(40.0, 0.1, 10.0, 500.0, &mut rng).expect("draw"), 500.0);
        assert_eq!(bounded_lognormal(-40.0, 0.1, 10.0, 500.0, &mut rng).expect("draw"), 10.0);
    }
    for _ in 0..1_000 {
        let value = bounded_lognormal(5.0, 1.5, 10.0, 100_000.0, &mut rng).expect("draw");
        assert!((10.0..=100_000.0).contains(&value));
    }
}

#[test]
fn bounded_lognormal_rejects_invalid_parameters() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    assert!(matches!(
        bounded_lognormal(5.0, 1.0, 100.0, 10.0, &mut rng),
        Err(GenerationError::InvalidDistribution(_))
    ));
    assert!(matches!(
        bounded_lognormal(5.0, -1.0, 10.0, 100.0, &mut rng),
        Err(GenerationError::InvalidDistribution(_))
    ));
}

#[test]
fn date_in_range_handles_degenerate_and_inverted_ranges() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let day = date(2024, 2, 14);
    for _ in 0..50 {
        assert_eq!(date_in_range(day, day, false, &mut rng).expect("date"), day);
        assert_eq!(date_in_range(day, day, true, &mut rng).expect("date"), day);
    }

    let err = date_in_range(date(2024, 3, 1), date(2024, 2, 1), false, &mut rng)
        .expect_err("inverted range");
    assert!(matches!(err, GenerationError::InvalidRange { .. }));
}

#[test]
fn unbiased_dates_stay_within_range() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let (start, end) = (date(2023, 1, 1), date(2025, 1, 15));
    for _ in 0..2_000 {
        let value = date_in_range(start, end, false, &mut rng).expect("date");
        assert!(value >= start && value <= end);
    }
}

#[test]
fn quarter_end_bias_clusters_dates() {
    fn in_quarter_close(value: NaiveDate) -> bool {
        value.month() % 3 == 0 && value.day() >= 20
    }

    let (start, end) = (date(2024, 1, 1), date(2024, 12, 31));
    let samples = 4_000;
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let biased = (0..samples)
        .map(|_| date_in_range(start, end, true, &mut rng).expect("date"))
        .filter(|value| in_quarter_close(*value))
        .count();
    let plain = (0..samples)
        .map(|_| date_in_range(start, end, false, &mut rng).expect("date"))
        .filter(|value| in_quarter_close(*value))
        .count();

    let biased_share = biased as f64 / samples as f64;
    let plain_share = plain as f64 / samples as f64;
    assert!(biased_share > 0.30, "biased share {biased_share}");
    assert!(plain_share < 0.20, "plain share {plain_share}");
}

#[test]
fn quarter_end_relocation_can_move_dates_earlier_in_the_month() {
    let (start, end) = (date(2024, 3, 25), date(2024, 3, 31));
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let drawn: Vec<NaiveDate> = (0..500)
        .map(|_| date_in_range(start, end, true, &mut rng).expect("date"))
        .collect();
    assert!(drawn.iter().all(|value| value.month() == 3 && value.day() >= 20));
    assert!(drawn.iter().any(|value| *value < start));
}
