//! Location-derived flags on StatsBomb's 120x80 pitch.
//! x runs along the long axis toward the attacking goal, y across it.

/// Minimum forward gain (x units) for a pass or carry to count as progressive.
pub const PROGRESSIVE_MIN_GAIN: f64 = 10.0;
/// Start of the attacking third on the long axis.
pub const FINAL_THIRD_X: f64 = 80.0;
/// Edge of the opponent's penalty area on the long axis.
pub const BOX_MIN_X: f64 = 102.0;
pub const BOX_MIN_Y: f64 = 18.0;
pub const BOX_MAX_Y: f64 = 62.0;

/// Flags for one ball movement, evaluated once and applied to the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveFlags {
    pub progressive: bool,
    pub final_third_entry: bool,
    pub box_entry: bool,
}

impl MoveFlags {
    pub fn classify(start_x: Option<f64>, end_x: Option<f64>, end_y: Option<f64>) -> Self {
        Self {
            progressive: is_progressive(start_x, end_x, PROGRESSIVE_MIN_GAIN),
            final_third_entry: is_final_third_entry(end_x),
            box_entry: is_box_entry(end_x, end_y),
        }
    }
}

pub fn is_progressive(start_x: Option<f64>, end_x: Option<f64>, min_gain: f64) -> bool {
    let (Some(start_x), Some(end_x)) = (start_x, end_x) else {
        return false;
    };
    end_x - start_x >= min_gain
}

pub fn is_final_third_entry(end_x: Option<f64>) -> bool {
    end_x.is_some_and(|x| x >= FINAL_THIRD_X)
}

pub fn is_box_entry(end_x: Option<f64>, end_y: Option<f64>) -> bool {
    let (Some(x), Some(y)) = (end_x, end_y) else {
        return false;
    };
    x >= BOX_MIN_X && (BOX_MIN_Y..=BOX_MAX_Y).contains(&y)
}
