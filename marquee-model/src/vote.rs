/// Bucket of a catalog vote average, used to color the score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTier {
    Low,
    Medium,
    High,
}

impl VoteTier {
    pub fn for_average(vote: f32) -> Self {
        if vote < 5.0 {
            VoteTier::Low
        } else if vote < 7.0 {
            VoteTier::Medium
        } else {
            VoteTier::High
        }
    }

    pub fn hex_color(&self) -> &'static str {
        match self {
            VoteTier::Low => "#cc3232",
            VoteTier::Medium => "#e7b416",
            VoteTier::High => "#99c140",
        }
    }
}
