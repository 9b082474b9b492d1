use crate::rig::Vec3;

/// Where a run currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CourseStatus {
    #[default]
    Playing,
    /// The character fell off the course.
    GameOver,
    /// The character reached the finish marker.
    Won,
}

impl CourseStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Finish marker and kill plane of a course.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CourseLayout {
    pub finish: Vec3,
    /// Planar (XZ) distance from `finish` that counts as reaching it (meters).
    pub finish_radius: f32,
    /// Falling below this height ends the run (meters).
    pub kill_plane_y: f32,
}

impl CourseLayout {
    /// Classify a character position. Falling is checked first.
    pub fn evaluate(&self, position: Vec3) -> CourseStatus {
        if position.y < self.kill_plane_y {
            return CourseStatus::GameOver;
        }

        let dx = position.x - self.finish.x;
        let dz = position.z - self.finish.z;
        if dx * dx + dz * dz <= self.finish_radius * self.finish_radius {
            return CourseStatus::Won;
        }

        CourseStatus::Playing
    }

    /// Advance `status` for this frame. Finished runs stay finished.
    pub fn advance(&self, status: CourseStatus, position: Vec3) -> CourseStatus {
        if status.is_finished() {
            return status;
        }
        self.evaluate(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> CourseLayout {
        CourseLayout {
            finish: Vec3::new(0.0, 3.0, -40.0),
            finish_radius: 1.5,
            kill_plane_y: -5.0,
        }
    }

    #[test]
    fn on_course_is_playing() {
        assert_eq!(layout().evaluate(Vec3::new(0.0, 0.5, 0.0)), CourseStatus::Playing);
    }

    #[test]
    fn falling_below_kill_plane_is_game_over() {
        assert_eq!(
            layout().evaluate(Vec3::new(0.0, -5.1, -40.0)),
            CourseStatus::GameOver
        );
    }

    #[test]
    fn reaching_finish_wins_regardless_of_height() {
        assert_eq!(layout().evaluate(Vec3::new(1.0, 3.5, -40.5)), CourseStatus::Won);
        assert_eq!(
            layout().evaluate(Vec3::new(2.0, 3.5, -40.0)),
            CourseStatus::Playing
        );
    }

    #[test]
    fn finished_runs_latch() {
        let layout = layout();
        let status = layout.advance(CourseStatus::Playing, Vec3::new(0.0, -10.0, 0.0));
        assert_eq!(status, CourseStatus::GameOver);

        let status = layout.advance(status, Vec3::new(0.0, 3.0, -40.0));
        assert_eq!(status, CourseStatus::GameOver);
    }
}
