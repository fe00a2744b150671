//! ASCII cassette for the now-playing screen.
//!
//! Both reels turn while playing and tape winds from the left reel onto the
//! right one as the track progresses.

const SPOKES: [char; 4] = ['|', '/', '-', '\\'];
const MAX_WIND: usize = 3;
const REEL_WIDTH: usize = 9;
const INNER_WIDTH: usize = 27;

/// Width in columns of every line returned by [`lines`].
pub const WIDTH: usize = INNER_WIDTH + 6;

/// Spoke glyph for animation step `frame`.
pub fn spoke(frame: usize) -> char {
    SPOKES[(frame / 2) % SPOKES.len()]
}

/// Layers of tape on the (left, right) reels at `progress` in `[0, 1]`.
pub fn winding(progress: f64) -> (usize, usize) {
    let p = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let right = (p * MAX_WIND as f64).round() as usize;
    (MAX_WIND - right, right)
}

fn reel(spoke: char, wind: usize) -> String {
    let tape = "@".repeat(wind);
    format!("{:^width$}", format!("{tape}({spoke}){tape}"), width = REEL_WIDTH)
}

/// Render the cassette.
pub fn lines(progress: f64, frame: usize) -> Vec<String> {
    let s = spoke(frame);
    let (left, right) = winding(progress);
    let window = format!("{:^width$}", "=====", width = REEL_WIDTH);
    let reels = format!("{}{window}{}", reel(s, left), reel(s, right));

    vec![
        format!(" {} ", "_".repeat(WIDTH - 2)),
        format!("|  {}  |", "_".repeat(INNER_WIDTH)),
        format!("| |{}| |", " ".repeat(INNER_WIDTH)),
        format!("| |{reels}| |"),
        format!("| |{}| |", "_".repeat(INNER_WIDTH)),
        format!("|{pad}{}{pad}|", "_".repeat(19), pad = " ".repeat(6)),
        format!("|{edge}/{}\\{edge}|", "_".repeat(19), edge = "_".repeat(5)),
    ]
}
