//! Execution-time instrumentation.

use std::time::{Duration, Instant};

/// Run `f` once and log how long it took at INFO.
///
/// The value returned by `f` is passed through untouched.
///
/// # Examples
///
/// ```rust
/// use quas_utils::timed;
///
/// let total = timed("sum_rows", || (1..=10).sum::<u32>());
/// assert_eq!(total, 55);
/// ```
pub fn timed<T, F>(operation: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let (value, elapsed) = measure(f);
    tracing::info!(
        event_type = "INFO",
        operation,
        elapsed_ms = elapsed_millis(elapsed),
        "'{}()' took {:.3} seconds to execute",
        operation,
        elapsed.as_secs_f64()
    );
    value
}

/// Run `f` once and return its value together with the elapsed time.
pub fn measure<T, F>(f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tracing_test::traced_test;

    #[test]
    fn measure_reports_at_least_the_sleep() {
        let (value, elapsed) = measure(|| {
            thread::sleep(Duration::from_millis(5));
            "done"
        });
        assert_eq!(value, "done");
        assert!(elapsed >= Duration::from_millis(5));
    }

    #[test]
    #[traced_test]
    fn timed_logs_operation_name() {
        let value = timed("render_page", || 7);
        assert_eq!(value, 7);
        assert!(logs_contain("'render_page()' took"));
        assert!(logs_contain("seconds to execute"));
    }

    #[test]
    fn elapsed_millis_saturates() {
        assert_eq!(elapsed_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(elapsed_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    #[should_panic(expected = "inner panic")]
    fn timed_does_not_swallow_panics() {
        timed("explodes", || -> () { panic!("inner panic") });
    }
}
