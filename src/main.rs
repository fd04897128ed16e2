use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use arith_pacer::logging::init_tracing;
use arith_pacer::{aptitude_from_accuracy, EngineConfig, Problem, SessionEngine, Tag, Tier, Topic};

const ROUNDS: usize = 3;
const DEFAULT_SESSION_SIZE: usize = 20;
const DEFAULT_TENURE_DAYS: u32 = 10;
const LEARNER_SEED: u64 = 7;
const DEFAULT_APTITUDE: u8 = 5;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Scripted learner: solid on the basics, slower and shakier on division and
/// fractions, and increasingly error-prone as tiers rise.
struct SyntheticLearner {
    rng: ChaCha8Rng,
}

impl SyntheticLearner {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn skill(problem: &Problem) -> f64 {
        let by_tier: f64 = match problem.tier {
            Tier::VeryEasy => 0.97,
            Tier::Easy => 0.9,
            Tier::Medium => 0.78,
            Tier::Hard => 0.62,
        };
        let penalty: f64 = match problem.primary_tag() {
            Tag::Division => 0.2,
            Tag::Fractions => 0.25,
            _ => 0.0,
        };
        (by_tier - penalty).max(0.05)
    }

    /// Returns `(submitted, elapsed)`
    fn answer(&mut self, problem: &Problem) -> (f64, f64) {
        let correct = self.rng.gen_bool(Self::skill(problem));
        let submitted = if correct {
            problem.answer
        } else {
            problem.answer + self.rng.gen_range(1..=3) as f64
        };
        let pace = if correct {
            self.rng.gen_range(0.3..1.0)
        } else {
            self.rng.gen_range(0.6..1.3)
        };
        (submitted, problem.time_allotted * pace)
    }
}

/// Accepts either an accuracy ratio below 1 or a 1-10 score
fn parse_aptitude(raw: &str) -> u8 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value < 1.0 => aptitude_from_accuracy(value),
        Ok(value) if value.is_finite() => value.round().clamp(1.0, 10.0) as u8,
        _ => DEFAULT_APTITUDE,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_level = std::env::var("PACER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    init_tracing(&log_level);

    let config = EngineConfig::from_env();
    let tenure_days = env_or("PACER_TENURE_DAYS", DEFAULT_TENURE_DAYS);
    let aptitude = std::env::var("PACER_APTITUDE")
        .map(|raw| parse_aptitude(&raw))
        .unwrap_or(DEFAULT_APTITUDE);
    let session_size = env_or("PACER_SESSION_SIZE", DEFAULT_SESSION_SIZE);
    let topic = match std::env::var("PACER_TOPIC") {
        Ok(raw) => match raw.parse::<Topic>() {
            Ok(topic) => Some(topic),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring topic, using mixed pools");
                None
            }
        },
        Err(_) => None,
    };

    let mut engine = SessionEngine::new(config);
    engine.initialize(tenure_days, aptitude);
    engine.set_topic(topic);

    let mut learner = SyntheticLearner::new(LEARNER_SEED);
    for round in 1..=ROUNDS {
        let problems = engine.generate(session_size);
        let mut correct = 0;

        for problem in &problems {
            let (submitted, elapsed) = learner.answer(problem);
            let is_correct = problem.check(submitted);
            if is_correct {
                correct += 1;
            }
            tracing::debug!(text = %problem.text(), submitted, elapsed, is_correct, "answered");
            engine.record_problem(problem, is_correct, elapsed);
        }

        tracing::info!(
            round,
            correct,
            total = problems.len(),
            tier_modifier = engine.tier_modifier(),
            weakest = ?engine.weakest_tag(),
            "round complete"
        );
    }

    println!("{}", serde_json::to_string_pretty(&engine.report())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arith_pacer::SessionEngine;

    #[test]
    fn test_parse_aptitude_scores_and_ratios() {
        assert_eq!(parse_aptitude("1"), 1);
        assert_eq!(parse_aptitude("1.0"), 1);
        assert_eq!(parse_aptitude("7"), 7);
        assert_eq!(parse_aptitude("42"), 10);
        assert_eq!(parse_aptitude("0.8"), 8);
        assert_eq!(parse_aptitude("0.0"), 1);
        assert_eq!(parse_aptitude("high"), DEFAULT_APTITUDE);
        assert_eq!(parse_aptitude("NaN"), DEFAULT_APTITUDE);
    }

    #[test]
    fn test_learner_skill_is_a_probability() {
        let mut engine = SessionEngine::with_seed(8);
        engine.initialize(30, 10);
        let mut learner = SyntheticLearner::new(LEARNER_SEED);
        for problem in engine.generate(100) {
            let skill = SyntheticLearner::skill(&problem);
            assert!((0.05..=1.0).contains(&skill), "skill {} for {:?}", skill, problem.tier);
            let (_, elapsed) = learner.answer(&problem);
            assert!(elapsed > 0.0);
        }
    }
}
