/// Score bands, highest first. The first band whose floor the score reaches wins.
const BANDS: [(u32, &str); 6] = [
    (95, "🎉 PERFECT! You absolute legend! This is a masterpiece of system design!"),
    (90, "🌟 Excellent work! Your architecture is solid and well-thought-out!"),
    (80, "👏 Great job! You've got a strong design with good practices!"),
    (70, "✅ You passed! Your design works, but there's room for improvement!"),
    (60, "🤔 So close! Review the failed tests and try again!"),
    (40, "😬 Not quite there yet! Focus on the basic components first!"),
];

const BASICS: &str =
    "🤦 Ouch! Let's start with the fundamentals - every system needs a web server and database!";

/// Feedback line for a rule-engine score.
pub fn feedback(score: u32) -> &'static str {
    BANDS
        .iter()
        .find(|(floor, _)| score >= *floor)
        .map_or(BASICS, |(_, message)| *message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_select_the_higher_band() {
        assert_eq!(feedback(95), BANDS[0].1);
        assert_eq!(feedback(96), BANDS[0].1);
        assert_eq!(feedback(94), BANDS[1].1);
        assert_eq!(feedback(90), BANDS[1].1);
        assert_eq!(feedback(80), BANDS[2].1);
        assert_eq!(feedback(70), BANDS[3].1);
        assert_eq!(feedback(69), BANDS[4].1);
        assert_eq!(feedback(60), BANDS[4].1);
        assert_eq!(feedback(40), BANDS[5].1);
    }

    #[test]
    fn low_scores_start_from_basics() {
        assert_eq!(feedback(39), BASICS);
        assert_eq!(feedback(0), BASICS);
    }

    #[test]
    fn scores_above_100_are_still_celebrated() {
        assert_eq!(feedback(140), BANDS[0].1);
    }
}
