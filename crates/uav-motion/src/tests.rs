//! Unit tests for uav-motion.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use uav_core::{LatLng, Leg, MIN_DURATION};

use crate::{MotionTask, PositionHandle, Task, TaskKind, TrajectoryPhase, TrajectoryTask};

// ── Helpers ───────────────────────────────────────────────────────────────────

const STEP: Duration = Duration::from_millis(20);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn origin() -> PositionHandle {
    PositionHandle::new(LatLng::new(0.0, 0.0))
}

/// Shared counter a completion callback can bump.
fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    (count, move || c.set(c.get() + 1))
}

fn run<T: Task>(task: &mut T, ticks: usize) {
    for _ in 0..ticks {
        task.advance().unwrap();
    }
}

fn leg(lat: f64, lng: f64, duration_ms: f64) -> Leg {
    Leg { lat, lng, duration_ms }
}

// ── PositionHandle ────────────────────────────────────────────────────────────

#[cfg(test)]
mod handle {
    use super::*;

    #[test]
    fn link_writes_through() {
        let handle = origin();
        let link = handle.link();
        assert!(link.set(LatLng::new(1.0, 2.0)));
        assert_eq!(handle.get(), LatLng::new(1.0, 2.0));
        assert_eq!(link.get(), Some(LatLng::new(1.0, 2.0)));
    }

    #[test]
    fn link_dies_with_last_handle() {
        let handle = origin();
        let clone = handle.clone();
        let link = handle.link();
        drop(handle);
        assert!(link.is_live());
        drop(clone);
        assert!(!link.is_live());
        assert_eq!(link.get(), None);
        assert!(!link.set(LatLng::new(1.0, 1.0)));
    }
}

// ── MotionTask ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod motion {
    use super::*;

    #[test]
    fn reaches_target_exactly_after_fifty_ticks() {
        let handle = origin();
        let mut task = MotionTask::new(&handle, LatLng::new(10.0, 10.0), ms(1_000), STEP);

        run(&mut task, 49);
        assert!(!task.is_finished());
        assert_ne!(handle.get(), LatLng::new(10.0, 10.0));

        run(&mut task, 1);
        assert!(task.is_finished());
        assert_eq!(handle.get(), LatLng::new(10.0, 10.0));
    }

    #[test]
    fn moves_linearly_at_constant_rate() {
        let handle = origin();
        let mut task = MotionTask::new(&handle, LatLng::new(10.0, -20.0), ms(1_000), STEP);
        run(&mut task, 25);
        let p = handle.get();
        approx::assert_relative_eq!(p.lat, 5.0, epsilon = 1e-9);
        approx::assert_relative_eq!(p.lng, -10.0, epsilon = 1e-9);
        approx::assert_relative_eq!(task.progress(), 0.5);
    }

    #[test]
    fn velocity_is_per_second() {
        let handle = origin();
        let task = MotionTask::new(&handle, LatLng::new(10.0, 4.0), ms(2_000), STEP);
        let (v_lat, v_lng) = task.velocity();
        approx::assert_relative_eq!(v_lat, 5.0, epsilon = 1e-9);
        approx::assert_relative_eq!(v_lng, 2.0, epsilon = 1e-9);
        assert_eq!(task.start(), LatLng::new(0.0, 0.0));
    }

    #[test]
    fn exact_arrival_for_uneven_step_granularity() {
        let target = LatLng::new(39.933_4, 32.859_7);
        for (duration, step) in [(1_000, 30), (777, 20), (5, 20), (1_000, 1), (20, 20)] {
            let handle = PositionHandle::new(LatLng::new(-12.345, 101.25));
            let mut task = MotionTask::new(&handle, target, ms(duration), ms(step));
            let needed = duration.div_ceil(step) as usize;
            run(&mut task, needed - 1);
            assert!(!task.is_finished(), "{duration}/{step} finished early");
            run(&mut task, 1);
            assert!(task.is_finished(), "{duration}/{step} not finished");
            assert_eq!(handle.get().lat.to_bits(), target.lat.to_bits());
            assert_eq!(handle.get().lng.to_bits(), target.lng.to_bits());
        }
    }

    #[test]
    fn non_positive_duration_completes_in_one_tick() {
        for duration in [Duration::ZERO, MIN_DURATION] {
            let handle = origin();
            let mut task = MotionTask::new(&handle, LatLng::new(3.0, 4.0), duration, STEP);
            assert_eq!(task.duration(), MIN_DURATION);
            run(&mut task, 1);
            assert!(task.is_finished());
            assert_eq!(handle.get(), LatLng::new(3.0, 4.0));
        }
    }

    #[test]
    fn negative_leg_duration_still_terminates() {
        let handle = origin();
        let mut task = MotionTask::from_leg(&handle, &leg(1.0, 1.0, -500.0), STEP);
        run(&mut task, 1);
        assert!(task.is_finished());
    }

    #[test]
    fn finished_is_monotonic_and_callback_fires_once() {
        let handle = origin();
        let (count, cb) = counter();
        let mut task = MotionTask::new(&handle, LatLng::new(1.0, 1.0), ms(100), STEP).on_done(cb);

        run(&mut task, 4);
        assert_eq!(count.get(), 0);
        run(&mut task, 1);
        assert_eq!(count.get(), 1);

        for _ in 0..10 {
            task.advance().unwrap();
            assert!(task.is_finished());
        }
        assert_eq!(count.get(), 1);
        assert_eq!(handle.get(), LatLng::new(1.0, 1.0));
        assert_eq!(task.elapsed(), ms(100));
    }

    #[test]
    fn velocity_not_recomputed_after_external_perturbation() {
        let handle = origin();
        let mut task = MotionTask::new(&handle, LatLng::new(10.0, 0.0), ms(1_000), STEP);
        run(&mut task, 10);
        handle.set(LatLng::new(100.0, 100.0));
        task.advance().unwrap();
        let p = handle.get();
        approx::assert_relative_eq!(p.lat, 100.2, epsilon = 1e-9);
        approx::assert_relative_eq!(p.lng, 100.0, epsilon = 1e-9);
        run(&mut task, 39);
        assert_eq!(handle.get(), LatLng::new(10.0, 0.0));
    }

    #[test]
    fn non_finite_step_skips_write_but_time_runs() {
        let handle = origin();
        let mut task = MotionTask::new(&handle, LatLng::new(f64::NAN, 0.0), ms(100), STEP);
        for _ in 0..4 {
            assert!(task.advance().is_err());
            assert_eq!(handle.get(), LatLng::new(0.0, 0.0));
        }
        assert_eq!(task.elapsed(), ms(80));
        assert!(!task.is_finished());

        // The last step snaps to the target unchecked and completes.
        assert!(task.advance().is_ok());
        assert!(task.is_finished());
        assert!(handle.get().lat.is_nan());
    }

    #[test]
    fn huge_finite_span_still_arrives() {
        let handle = PositionHandle::new(LatLng::new(1e308, 0.0));
        let (count, cb) = counter();
        let mut task = MotionTask::new(&handle, LatLng::new(-1e308, 0.0), ms(1_000), STEP).on_done(cb);

        let failures = (0..50).filter(|_| task.advance().is_err()).count();
        assert_eq!(failures, 49);
        assert!(task.is_finished());
        assert_eq!(handle.get(), LatLng::new(-1e308, 0.0));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn panicking_callback_is_contained() {
        let handle = origin();
        let mut task = MotionTask::new(&handle, LatLng::new(1.0, 0.0), ms(20), STEP)
            .on_done(|| panic!("bookkeeping failed"));
        assert!(task.advance().is_ok());
        assert!(task.is_finished());
        assert!(task.advance().is_ok());
    }

    #[test]
    fn orphaned_motion_is_not_live_and_does_nothing() {
        let handle = origin();
        let (count, cb) = counter();
        let mut task = MotionTask::new(&handle, LatLng::new(1.0, 0.0), ms(20), STEP).on_done(cb);
        drop(handle);
        assert!(!task.is_live());
        task.advance().unwrap();
        assert!(!task.is_finished());
        assert_eq!(count.get(), 0);
    }
}

// ── TrajectoryTask ────────────────────────────────────────────────────────────

#[cfg(test)]
mod trajectory {
    use super::*;

    #[test]
    fn two_leg_scenario() {
        let handle = origin();
        let mut task = TrajectoryTask::new(
            &handle,
            vec![leg(5.0, 0.0, 500.0), leg(5.0, 5.0, 500.0)],
            STEP,
        );
        assert_eq!(task.phase(), TrajectoryPhase::NotStarted);

        run(&mut task, 25);
        assert_eq!(handle.get(), LatLng::new(5.0, 0.0));
        assert_eq!(task.phase(), TrajectoryPhase::RunningLeg(1));
        assert!(!task.is_finished());

        run(&mut task, 25);
        assert_eq!(handle.get(), LatLng::new(5.0, 5.0));
        assert!(task.is_finished());
        assert_eq!(task.phase(), TrajectoryPhase::AllComplete);
    }

    #[test]
    fn visits_legs_in_order_and_completes_once_at_the_end() {
        let handle = origin();
        let (count, cb) = counter();
        let legs = vec![leg(1.0, 0.0, 100.0), leg(1.0, 1.0, 100.0), leg(0.0, 1.0, 100.0)];
        let mut task = TrajectoryTask::new(&handle, legs.clone(), STEP).on_done(cb);

        let mut reached = Vec::new();
        for _ in 0..15 {
            task.advance().unwrap();
            if legs.iter().any(|l| l.target() == handle.get())
                && reached.last() != Some(&handle.get())
            {
                reached.push(handle.get());
            }
            if !task.is_finished() {
                assert_eq!(count.get(), 0, "callback fired before last leg");
            }
        }
        let expected: Vec<_> = legs.iter().map(Leg::target).collect();
        assert_eq!(reached, expected);
        assert!(task.is_finished());
        assert_eq!(count.get(), 1);

        run(&mut task, 5);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn empty_trajectory_completes_on_first_tick() {
        let handle = PositionHandle::new(LatLng::new(7.0, 7.0));
        let (count, cb) = counter();
        let mut task = TrajectoryTask::new(&handle, vec![], STEP).on_done(cb);
        assert!(!task.is_finished());
        assert_eq!(count.get(), 0);

        task.advance().unwrap();
        assert!(task.is_finished());
        assert_eq!(count.get(), 1);

        run(&mut task, 3);
        assert_eq!(count.get(), 1);
        assert_eq!(handle.get(), LatLng::new(7.0, 7.0));
    }

    #[test]
    fn each_leg_starts_from_previous_target() {
        let handle = origin();
        let mut task = TrajectoryTask::new(
            &handle,
            vec![leg(2.0, 0.0, 40.0), leg(2.0, 2.0, 40.0)],
            STEP,
        );
        run(&mut task, 2);
        assert_eq!(task.current_leg(), Some(1));
        task.advance().unwrap();
        let p = handle.get();
        approx::assert_relative_eq!(p.lat, 2.0);
        approx::assert_relative_eq!(p.lng, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn leg_with_unrepresentable_steps_completes() {
        let handle = PositionHandle::new(LatLng::new(1e308, 0.0));
        let mut task = TrajectoryTask::new(
            &handle,
            vec![leg(-1e308, 0.0, 100.0), leg(-1e308, 1.0, 100.0)],
            STEP,
        );
        for _ in 0..5 {
            assert!(task.advance().is_ok());
        }
        assert_eq!(task.current_leg(), Some(1));
        assert_eq!(handle.get(), LatLng::new(-1e308, 0.0));

        run(&mut task, 5);
        assert!(task.is_finished());
        assert_eq!(handle.get(), LatLng::new(-1e308, 1.0));
    }

    #[test]
    fn leg_step_contains_panics() {
        struct Exploding;

        impl Task for Exploding {
            fn advance(&mut self) -> crate::TaskResult<()> {
                panic!("inner step");
            }

            fn is_finished(&self) -> bool {
                false
            }
        }

        assert!(!crate::trajectory::step_leg(&mut Exploding, 0));

        let handle = origin();
        let mut ok = MotionTask::new(&handle, LatLng::new(1.0, 0.0), ms(20), STEP);
        assert!(crate::trajectory::step_leg(&mut ok, 0));
        assert!(ok.is_finished());
    }

    #[test]
    fn zero_duration_legs_take_one_tick_each() {
        let handle = origin();
        let mut task = TrajectoryTask::new(
            &handle,
            vec![leg(1.0, 0.0, 0.0), leg(2.0, 0.0, -1.0), leg(3.0, 0.0, f64::NAN)],
            STEP,
        );
        run(&mut task, 3);
        assert!(task.is_finished());
        assert_eq!(handle.get(), LatLng::new(3.0, 0.0));
    }

    #[test]
    fn leg_callback_reports_each_leg_in_order() {
        let handle = origin();
        let reached = Rc::new(std::cell::RefCell::new(Vec::new()));
        let r = Rc::clone(&reached);
        let (done, on_done) = counter();
        let mut task = TrajectoryTask::new(
            &handle,
            vec![leg(1.0, 0.0, 40.0), leg(1.0, 1.0, 40.0), leg(0.0, 1.0, 40.0)],
            STEP,
        )
        .on_leg(move |i| r.borrow_mut().push(i))
        .on_done(on_done);

        run(&mut task, 2);
        assert_eq!(*reached.borrow(), vec![0]);
        run(&mut task, 4);
        assert_eq!(*reached.borrow(), vec![0, 1, 2]);
        assert_eq!(done.get(), 1);
    }

    #[test]
    fn panicking_leg_callback_does_not_stop_trajectory() {
        let handle = origin();
        let mut task = TrajectoryTask::new(&handle, vec![leg(1.0, 0.0, 20.0), leg(2.0, 0.0, 20.0)], STEP)
            .on_leg(|_| panic!("leg callback"));
        run(&mut task, 2);
        assert!(task.is_finished());
        assert_eq!(handle.get(), LatLng::new(2.0, 0.0));
    }

    #[test]
    fn orphaned_trajectory_is_not_live() {
        let handle = origin();
        let task = TrajectoryTask::new(&handle, vec![leg(1.0, 0.0, 100.0)], STEP);
        drop(handle);
        assert!(!task.is_live());
    }
}

// ── TaskKind ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod task_kind {
    use super::*;

    #[test]
    fn dispatches_to_variant() {
        let handle = origin();
        let mut kinds: Vec<TaskKind> = vec![
            MotionTask::new(&handle, LatLng::new(1.0, 0.0), ms(20), STEP).into(),
            TrajectoryTask::new(&handle, vec![], STEP).into(),
        ];
        for kind in &mut kinds {
            assert!(kind.is_live());
            assert!(!kind.is_finished());
            kind.advance().unwrap();
            assert!(kind.is_finished());
        }
    }

    #[test]
    fn panic_message_extracts_text() {
        let payload = std::panic::catch_unwind(|| panic!("boom {}", 7)).unwrap_err();
        assert_eq!(crate::panic_message(payload.as_ref()), "boom 7");
    }
}
