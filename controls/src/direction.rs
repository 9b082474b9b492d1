use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::input::{InputState, KEY_BACK, KEY_FORWARD, KEY_LEFT, KEY_RIGHT};

/// Angle (radians, about +Y) between camera-forward and the direction the
/// pressed keys ask for.
///
/// Forward wins over back, and left is checked before right, so opposing keys
/// never produce an in-between angle. Forward+back with no strafe key reads as
/// forward (offset 0).
pub fn direction_offset(input: &InputState) -> f32 {
    let left = input.is_pressed(KEY_LEFT);
    let right = input.is_pressed(KEY_RIGHT);

    if input.is_pressed(KEY_FORWARD) {
        if left {
            FRAC_PI_4
        } else if right {
            -FRAC_PI_4
        } else {
            0.0
        }
    } else if input.is_pressed(KEY_BACK) {
        if left {
            FRAC_PI_4 + FRAC_PI_2
        } else if right {
            -FRAC_PI_4 - FRAC_PI_2
        } else {
            PI
        }
    } else if left {
        FRAC_PI_2
    } else if right {
        -FRAC_PI_2
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KEY_SPACE;

    fn offset(keys: &[&str]) -> f32 {
        let mut input = InputState::new();
        for key in keys {
            input.set(key, true);
        }
        direction_offset(&input)
    }

    #[test]
    fn eight_way_table() {
        let cases: &[(&[&str], f32)] = &[
            (&["w", "a"], FRAC_PI_4),
            (&["w", "d"], -FRAC_PI_4),
            (&["w"], 0.0),
            (&["s", "a"], 3.0 * FRAC_PI_4),
            (&["s", "d"], -3.0 * FRAC_PI_4),
            (&["s"], PI),
            (&["a"], FRAC_PI_2),
            (&["d"], -FRAC_PI_2),
            (&[], 0.0),
        ];

        for (keys, expected) in cases {
            let got = offset(keys);
            assert!(
                (got - expected).abs() < 1.0e-6,
                "{keys:?}: expected {expected}, got {got}"
            );
        }
    }

    #[test]
    fn forward_beats_back() {
        assert_eq!(offset(&["w", "s"]), 0.0);
        assert_eq!(offset(&["w", "s", "a"]), FRAC_PI_4);
    }

    #[test]
    fn left_is_checked_before_right() {
        assert_eq!(offset(&["a", "d"]), FRAC_PI_2);
        assert_eq!(offset(&["w", "a", "d"]), FRAC_PI_4);
        assert_eq!(offset(&["s", "a", "d"]), FRAC_PI_4 + FRAC_PI_2);
    }

    #[test]
    fn released_keys_and_non_directions_are_ignored() {
        let mut input = InputState::new();
        input.set(KEY_LEFT, false);
        input.set(KEY_SPACE, true);
        assert_eq!(direction_offset(&input), 0.0);
    }
}
