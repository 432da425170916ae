#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tier {
    Master,
    Great,
    NotBad,
    KeepPracticing,
}

impl Tier {
    pub fn from_percentage(percentage: u32) -> Tier {
        match percentage {
            90.. => Tier::Master,
            70..=89 => Tier::Great,
            50..=69 => Tier::NotBad,
            _ => Tier::KeepPracticing,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Tier::Master => "Outstanding! You're a trivia master!",
            Tier::Great => "Great job! You really know your stuff!",
            Tier::NotBad => "Not bad! Room for improvement, but well done!",
            Tier::KeepPracticing => "Keep practicing! Every expert was once a beginner!",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Tier::Master => "🏆",
            Tier::Great => "👏",
            Tier::NotBad => "👍",
            Tier::KeepPracticing => "💪",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScoreSummary {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub tier: Tier,
}

impl ScoreSummary {
    pub fn new(score: usize, total: usize) -> Self {
        let percentage = rounded_percentage(score, total);
        Self {
            score,
            total,
            percentage,
            tier: Tier::from_percentage(percentage),
        }
    }

    pub fn fraction(&self) -> String {
        format!("{}/{}", self.score, self.total)
    }
}

/// `round(score / total * 100)`, halves rounded up.
fn rounded_percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score * 200 + total) / (total * 2)) as u32
}
