#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::Time;
    use std::time::Duration;

    #[test]
    fn test_whole_milliseconds() {
        let mut time = Time::new();
        assert_eq!(time.take_millis(Duration::from_millis(16)), 16);
        assert_eq!(time.take_millis(Duration::ZERO), 0);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut time = Time::new();
        let step = Duration::from_micros(1500);

        assert_eq!(time.take_millis(step), 1);
        assert_eq!(time.take_millis(step), 2);

        let small = Duration::from_micros(400);
        assert_eq!(time.take_millis(small), 0);
        assert_eq!(time.take_millis(small), 0);
        assert_eq!(time.take_millis(small), 1);
    }

    #[test]
    fn test_update_measures_elapsed() {
        let mut time = Time::default();
        std::thread::sleep(Duration::from_millis(5));

        let elapsed = time.update();
        assert!(elapsed >= 5);
        assert!(time.update() < elapsed);
    }
}
