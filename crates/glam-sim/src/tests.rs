//! Unit tests for glam-sim.

use glam_core::{
    ErrorRange, GlamError, ParamName, Parameters, SimConfig, SimRng, StallPolicy, SubjectId, TrialId, TrialRng,
};

use crate::{ItemMatrix, OutcomeSource, SimError, TrialSimulator, simulate_trial};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn params() -> Parameters {
    Parameters::new(1.0, 0.2, 0.2, 0.5, 300.0)
}

fn race_only(seed: u64) -> SimConfig {
    SimConfig::default().with_error_weight(0.0).with_seed(seed)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

// ── Evidence rates ────────────────────────────────────────────────────────────

#[cfg(test)]
mod rate {
    use super::*;
    use crate::{attention_weighted, evidence_rates, relative_evidence};

    #[test]
    fn attention_discounts_unattended_value() {
        let a = attention_weighted(&[5.0, 3.0], &[0.8, 0.2], 0.2);
        assert!(close(a[0], 4.2));
        assert!(close(a[1], 1.08));
    }

    #[test]
    fn compares_against_best_other_item() {
        let r = relative_evidence(&[1.0, 5.0, 3.0]);
        assert_eq!(r, vec![-4.0, 2.0, -2.0]);
    }

    #[test]
    fn tied_maximum_gives_zero_evidence() {
        let r = relative_evidence(&[4.0, 2.0, 4.0]);
        assert_eq!(r, vec![0.0, -2.0, 0.0]);
    }

    #[test]
    fn symmetric_items_get_half_gain() {
        let p = Parameters::new(2.0, 0.3, 0.1, 1.5, 0.0);
        let r = evidence_rates(&p, &[4.0, 4.0], &[0.5, 0.5]);
        assert!(close(r[0], 1.0));
        assert!(close(r[1], 1.0));
    }

    #[test]
    fn gaze_favors_looked_at_item_when_gamma_below_one() {
        let p = Parameters::new(1.0, 0.2, 0.1, 1.0, 0.0);
        let r = evidence_rates(&p, &[3.0, 3.0], &[0.9, 0.1]);
        assert!(r[0] > r[1]);
    }

    #[test]
    fn gamma_one_removes_gaze_asymmetry() {
        let p = Parameters::new(1.0, 1.0, 0.1, 1.0, 0.0);
        let r = evidence_rates(&p, &[3.0, 3.0], &[0.9, 0.1]);
        assert!(close(r[0], r[1]));
        assert!(close(r[0], 0.5));
    }

    #[test]
    fn rates_stay_between_zero_and_gain() {
        let p = Parameters::new(0.7, 0.5, 0.1, 3.0, 0.0);
        let r = evidence_rates(&p, &[1.0, 9.0, 4.0, 6.0], &[0.1, 0.2, 0.3, 0.4]);
        assert!(r.iter().all(|&x| x > 0.0 && x < 0.7));
    }
}

// ── First-passage sampling ────────────────────────────────────────────────────

#[cfg(test)]
mod passage {
    use rand::distributions::Distribution;

    use super::*;
    use crate::FirstPassage;

    #[test]
    fn parameterization() {
        let fp = FirstPassage::new(1.0, 0.5, 0.2);
        assert!(close(fp.mean(), 2.0));
        assert!(close(fp.shape(), 25.0));
        assert!(fp.is_proper());
    }

    #[test]
    fn improper_arguments_sample_nan() {
        let mut rng = SimRng::new(1);
        for fp in [
            FirstPassage::new(1.0, 0.0, 0.2),
            FirstPassage::new(1.0, f64::NAN, 0.2),
            FirstPassage::new(1.0, 0.5, 0.0),
            FirstPassage::new(1.0, 0.5, f64::NAN),
        ] {
            assert!(!fp.is_proper());
            assert!(fp.sample(rng.inner()).is_nan());
        }
    }

    #[test]
    fn negative_rate_samples_nan() {
        let mut rng = SimRng::new(2);
        let fp = FirstPassage::new(1.0, -0.3, 0.2);
        assert!(fp.sample(rng.inner()).is_nan());
    }

    #[test]
    fn empirical_mean_matches_boundary_over_rate() {
        let mut rng = SimRng::new(3);
        let fp = FirstPassage::new(1.0, 0.5, 0.2);
        let n = 20_000;
        let draws: Vec<f64> = (0..n).map(|_| fp.sample(rng.inner())).collect();
        assert!(draws.iter().all(|&t| t.is_finite() && t > 0.0));
        let mean = draws.iter().sum::<f64>() / n as f64;
        assert!((mean - 2.0).abs() < 0.05, "mean {mean}");
    }

    #[test]
    fn empirical_variance_matches_mean_cubed_over_shape() {
        let mut rng = SimRng::new(4);
        // mean 2, shape 25: variance 8 / 25.
        let fp = FirstPassage::new(1.0, 0.5, 0.2);
        let n = 200_000;
        let draws: Vec<f64> = (0..n).map(|_| fp.sample(rng.inner())).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        assert!((var - 0.32).abs() < 0.015, "var {var}");

        // Same mean, a quarter of the shape: four times the spread.
        let wide = FirstPassage::new(1.0, 0.5, 0.4);
        let draws: Vec<f64> = (0..n).map(|_| wide.sample(rng.inner())).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        assert!((var - 1.28).abs() < 0.07, "var {var}");
    }
}

// ── Trial simulation ──────────────────────────────────────────────────────────

#[cfg(test)]
mod trial {
    use super::*;

    #[test]
    fn race_rts_are_finite_and_above_t0() {
        let sim = TrialSimulator::new(&race_only(0)).unwrap();
        let mut rng = SimRng::new(10);
        for _ in 0..2_000 {
            let out = sim
                .simulate(&params(), &[2.0, 6.0, 4.0], &[0.3, 0.3, 0.4], ErrorRange::default(), rng.inner())
                .unwrap();
            assert_eq!(out.source, OutcomeSource::Race);
            let rt = out.rt.unwrap();
            assert!(rt.is_finite() && rt >= 300.0);
            assert!(out.choice.unwrap() < 3);
        }
    }

    #[test]
    fn valued_and_gazed_item_wins_majority() {
        let sim = TrialSimulator::new(&race_only(0)).unwrap();
        let mut rng = SimRng::new(11);
        let n = 10_000;
        let mut wins = 0;
        let mut rt_sum = 0.0;
        for _ in 0..n {
            let out = sim
                .simulate(&params(), &[5.0, 3.0], &[0.8, 0.2], ErrorRange::default(), rng.inner())
                .unwrap();
            if out.choice == Some(0) {
                wins += 1;
            }
            let rt = out.rt.unwrap();
            assert!(rt > 300.0);
            rt_sum += rt;
        }
        assert!(wins as f64 / n as f64 > 0.6, "p(choice 0) = {}", wins as f64 / n as f64);
        assert!(rt_sum / n as f64 > 300.0);
    }

    #[test]
    fn identical_items_are_chosen_uniformly() {
        let sim = TrialSimulator::new(&race_only(0)).unwrap();
        let mut rng = SimRng::new(12);
        let n = 10_000;
        let zeros = (0..n)
            .filter(|_| {
                sim.simulate(&params(), &[4.0, 4.0], &[0.5, 0.5], ErrorRange::default(), rng.inner())
                    .unwrap()
                    .choice
                    == Some(0)
            })
            .count();
        let p = zeros as f64 / n as f64;
        assert!((p - 0.5).abs() < 0.03, "p(choice 0) = {p}");
    }

    #[test]
    fn full_error_weight_is_uniform_noise() {
        let config = SimConfig::default().with_error_weight(1.0);
        let sim = TrialSimulator::new(&config).unwrap();
        let range = ErrorRange::new(100.0, 900.0).unwrap();
        let mut rng = SimRng::new(13);
        let n = 30_000;
        let mut counts = [0usize; 3];
        let mut rt_sum = 0.0;
        for _ in 0..n {
            let out = sim.simulate(&params(), &[1.0, 2.0, 3.0], &[0.2, 0.3, 0.5], range, rng.inner()).unwrap();
            assert_eq!(out.source, OutcomeSource::Error);
            let rt = out.rt.unwrap();
            assert!(range.contains(rt));
            rt_sum += rt;
            counts[out.choice.unwrap()] += 1;
        }
        for c in counts {
            assert!((c as f64 / n as f64 - 1.0 / 3.0).abs() < 0.02, "counts {counts:?}");
        }
        assert!((rt_sum / n as f64 - 500.0).abs() < 10.0);
    }

    #[test]
    fn degenerate_error_range_returns_its_bound() {
        let config = SimConfig::default().with_error_weight(1.0);
        let range = ErrorRange::new(750.0, 750.0).unwrap();
        let mut rng = SimRng::new(14);
        let out = simulate_trial(&params(), &[1.0, 2.0], &[0.5, 0.5], range, &config, rng.inner()).unwrap();
        assert_eq!(out.rt, Some(750.0));
    }

    #[test]
    fn mixture_fraction_tracks_error_weight() {
        let config = SimConfig::default().with_error_weight(0.3);
        let sim = TrialSimulator::new(&config).unwrap();
        // Race rts sit just above t0 = 300; the error range lies far above.
        let range = ErrorRange::new(1_000.0, 5_000.0).unwrap();
        let mut rng = SimRng::new(15);
        let n = 20_000;
        let outcomes = sim
            .simulate_repeated(&params(), &[5.0, 3.0], &[0.6, 0.4], range, n, rng.inner())
            .unwrap();
        let slow = outcomes.iter().filter(|o| o.rt.unwrap() >= 1_000.0).count();
        let errors = outcomes.iter().filter(|o| o.source == OutcomeSource::Error).count();
        assert_eq!(slow, errors);
        assert!((slow as f64 / n as f64 - 0.3).abs() < 0.02);
    }

    #[test]
    fn negative_gain_stalls() {
        let config = SimConfig { max_retries: 25, ..race_only(0) };
        let bad = Parameters::new(-1.0, 0.5, 0.2, 1.0, 0.0);
        let mut rng = SimRng::new(16);
        let err = simulate_trial(&bad, &[1.0, 2.0], &[0.5, 0.5], ErrorRange::default(), &config, rng.inner())
            .unwrap_err();
        match err {
            SimError::Stalled { retries, n_items, parameters } => {
                assert_eq!(retries, 25);
                assert_eq!(n_items, 2);
                assert_eq!(parameters, bad);
            }
            other => panic!("expected Stalled, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        let config = SimConfig { max_retries: 5, ..race_only(0) };
        let bad = Parameters::new(f64::NAN, 0.5, 0.2, 1.0, 0.0);
        let mut rng = SimRng::new(17);
        let result = simulate_trial(&bad, &[1.0, 2.0], &[0.5, 0.5], ErrorRange::default(), &config, rng.inner());
        assert!(matches!(
            result,
            Err(SimError::Core(GlamError::InvalidParameter { name: ParamName::V, .. }))
        ));
    }

    #[test]
    fn bad_non_decision_time_never_reaches_an_rt() {
        let sim = TrialSimulator::new(&race_only(0)).unwrap();
        let mut rng = SimRng::new(20);
        for t0 in [f64::NAN, f64::INFINITY, -1_000.0] {
            let bad = Parameters { t0, ..params() };
            let single = sim.simulate(&bad, &[5.0, 3.0], &[0.8, 0.2], ErrorRange::default(), rng.inner());
            assert!(
                matches!(single, Err(SimError::Core(GlamError::InvalidParameter { name: ParamName::T0, .. }))),
                "t0 = {t0}: {single:?}"
            );
            let repeated =
                sim.simulate_repeated(&bad, &[5.0, 3.0], &[0.8, 0.2], ErrorRange::default(), 3, rng.inner());
            assert!(repeated.is_err(), "t0 = {t0}");
        }
    }

    #[test]
    fn emit_missing_policy_marks_row_missing() {
        let config = SimConfig {
            max_retries:  5,
            stall_policy: StallPolicy::EmitMissing,
            ..race_only(0)
        };
        let bad = Parameters::new(-1.0, 0.5, 0.2, 1.0, 0.0);
        let mut rng = SimRng::new(18);
        let out = simulate_trial(&bad, &[1.0, 2.0], &[0.5, 0.5], ErrorRange::default(), &config, rng.inner())
            .unwrap();
        assert_eq!(out.source, OutcomeSource::Stalled);
        assert_eq!(out.choice, None);
        assert_eq!(out.rt, None);
    }

    #[test]
    fn rejects_bad_shapes_and_config() {
        let mut rng = SimRng::new(19);
        let config = SimConfig::default();
        assert!(matches!(
            simulate_trial(&params(), &[1.0, 2.0], &[1.0], ErrorRange::default(), &config, rng.inner()),
            Err(SimError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            simulate_trial(&params(), &[1.0], &[1.0], ErrorRange::default(), &config, rng.inner()),
            Err(SimError::TooFewItems(1))
        ));
        let bad_range = ErrorRange { min: 10.0, max: 0.0 };
        assert!(simulate_trial(&params(), &[1.0, 2.0], &[0.5, 0.5], bad_range, &config, rng.inner()).is_err());
        assert!(TrialSimulator::new(&config.with_error_weight(2.0)).is_err());
    }
}

// ── Subject simulation ────────────────────────────────────────────────────────

#[cfg(test)]
mod subject {
    use super::*;
    use crate::{simulate_subject, simulate_subject_with_rng};

    fn design() -> (ItemMatrix, ItemMatrix) {
        let values = ItemMatrix::from_rows(&[vec![5.0, 3.0], vec![4.0, 4.0], vec![1.0, 6.0]]).unwrap();
        let gaze = ItemMatrix::from_rows(&[vec![0.8, 0.2], vec![0.5, 0.5], vec![0.4, 0.6]]).unwrap();
        (values, gaze)
    }

    #[test]
    fn one_row_per_trial_and_repeat_in_order() {
        let (values, gaze) = design();
        let table = simulate_subject(
            &params(), &values, &gaze, 4, SubjectId(9), ErrorRange::default(), &race_only(1),
        )
        .unwrap();

        assert_eq!(table.len(), 12);
        assert!(table.subject.iter().all(|&s| s == SubjectId(9)));
        let trials: Vec<u32> = table.trial.iter().map(|t| t.0).collect();
        assert_eq!(trials, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);
        let repeats: Vec<u32> = table.repeat.clone();
        assert_eq!(repeats, vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3]);
        assert_eq!(table.values_row(5), &[4.0, 4.0]);
        assert_eq!(table.gaze_row(11), &[0.4, 0.6]);
        assert_eq!(table.item_value_column(1), vec![3.0, 3.0, 3.0, 3.0, 4.0, 4.0, 4.0, 4.0, 6.0, 6.0, 6.0, 6.0]);
        assert!(table.rt.iter().all(|rt| rt.is_some_and(|x| x >= 300.0)));
    }

    #[test]
    fn schema_lists_item_columns() {
        let (values, gaze) = design();
        let table = simulate_subject(
            &params(), &values, &gaze, 1, SubjectId(0), ErrorRange::default(), &race_only(1),
        )
        .unwrap();
        assert_eq!(
            table.column_names(),
            ["subject", "trial", "repeat", "choice", "rt", "item_value_0", "gaze_0", "item_value_1", "gaze_1"]
        );
        assert_eq!(table.row(2).trial(), TrialId(2));
    }

    #[test]
    fn same_seed_same_table() {
        let (values, gaze) = design();
        let config = SimConfig::default().with_seed(77);
        let a = simulate_subject(&params(), &values, &gaze, 5, SubjectId(1), ErrorRange::default(), &config).unwrap();
        let b = simulate_subject(&params(), &values, &gaze, 5, SubjectId(1), ErrorRange::default(), &config).unwrap();
        assert_eq!(a, b);

        let c = simulate_subject(
            &params(), &values, &gaze, 5, SubjectId(1), ErrorRange::default(), &config.with_seed(78),
        )
        .unwrap();
        assert_ne!(a.rt, c.rt);
    }

    #[test]
    fn table_equals_per_trial_streams() {
        // Holds for the Rayon path too: run with `--features parallel`.
        let (values, gaze) = design();
        let config = SimConfig::default().with_error_weight(0.2).with_seed(31);
        let subject = SubjectId(4);
        let table = simulate_subject(&params(), &values, &gaze, 6, subject, ErrorRange::default(), &config).unwrap();

        let sim = TrialSimulator::new(&config).unwrap();
        let mut expected = Vec::new();
        for t in 0..values.n_trials() {
            let mut rng = TrialRng::new(31, 4, t as u64);
            let outcomes = sim
                .simulate_repeated(&params(), values.row(t), gaze.row(t), ErrorRange::default(), 6, rng.inner())
                .unwrap();
            expected.extend(outcomes);
        }
        let rts: Vec<Option<f64>> = expected.iter().map(|o| o.rt).collect();
        let choices: Vec<Option<usize>> = expected.iter().map(|o| o.choice).collect();
        assert_eq!(table.rt, rts);
        assert_eq!(table.choice, choices);
    }

    #[test]
    fn injected_rng_is_reproducible() {
        let (values, gaze) = design();
        let config = SimConfig::default();
        let run = |seed| {
            let mut rng = SimRng::new(seed);
            simulate_subject_with_rng(
                &params(), &values, &gaze, 3, SubjectId(0), ErrorRange::default(), &config, rng.inner(),
            )
            .unwrap()
        };
        assert_eq!(run(5), run(5));
        assert_eq!(run(5).len(), 9);
    }

    #[test]
    fn zero_repeats_gives_empty_table() {
        let (values, gaze) = design();
        let table = simulate_subject(
            &params(), &values, &gaze, 0, SubjectId(0), ErrorRange::default(), &race_only(1),
        )
        .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.mean_rt(), None);
    }

    #[test]
    fn mismatched_design_errors() {
        let (values, _) = design();
        let gaze = ItemMatrix::from_rows(&[vec![0.5, 0.5]]).unwrap();
        let result = simulate_subject(
            &params(), &values, &gaze, 1, SubjectId(0), ErrorRange::default(), &race_only(1),
        );
        assert!(matches!(result, Err(SimError::ShapeMismatch { what: "gaze matrix rows", .. })));
        assert!(ItemMatrix::from_rows(&[vec![1.0, 2.0], vec![1.0]]).is_err());
        assert!(ItemMatrix::from_flat(3, vec![1.0; 7]).is_err());
    }

    #[test]
    fn itemless_trials_are_rejected() {
        let empty: [Vec<f64>; 2] = [vec![], vec![]];
        let values = ItemMatrix::from_rows(&empty).unwrap();
        let gaze = ItemMatrix::from_rows(&empty).unwrap();
        assert_eq!(values.n_trials(), 2);
        assert_eq!(values.rows().count(), 2);
        let result = simulate_subject(
            &params(), &values, &gaze, 1, SubjectId(0), ErrorRange::default(), &race_only(1),
        );
        assert!(matches!(result, Err(SimError::TooFewItems(0))));
    }

    #[test]
    fn choice_counts_cover_all_rows() {
        let (values, gaze) = design();
        let table = simulate_subject(
            &params(), &values, &gaze, 50, SubjectId(0), ErrorRange::default(), &race_only(2),
        )
        .unwrap();
        assert_eq!(table.choice_counts().iter().sum::<usize>(), 150);
        assert_eq!(table.missing_count(), 0);
    }
}
